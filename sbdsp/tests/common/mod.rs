#![allow(dead_code)]

use std::{collections::VecDeque, sync::Once};

use fugit::MicrosDurationU32;
use sbdsp::{
    io::{IsaDma, Pic, PicEvent, SecondarySource},
    port::Port,
    Dsp,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Default)]
pub struct FakePic {
    /// Undelivered pacing events, oldest first.
    pub pending: Vec<MicrosDurationU32>,
    pub scheduled: Vec<MicrosDurationU32>,
    pub cancels: usize,
    pub irq_asserts: usize,
    pub irq_line: bool,
}

impl FakePic {
    /// Delivers the oldest pending event.
    pub fn fire(&mut self) -> Option<MicrosDurationU32> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl Pic for FakePic {
    fn schedule(&mut self, event: PicEvent, delay: MicrosDurationU32) {
        assert_eq!(event, PicEvent::DmaPacing);
        self.pending.push(delay);
        self.scheduled.push(delay);
    }

    fn cancel(&mut self, _event: PicEvent) {
        self.pending.clear();
        self.cancels += 1;
    }

    fn assert_irq(&mut self) {
        self.irq_asserts += 1;
        self.irq_line = true;
    }

    fn deassert_irq(&mut self) {
        self.irq_line = false;
    }
}

/// Hands out scripted bytes, then 0x80 (silence) once the script runs out.
#[derive(Debug, Default)]
pub struct FakeDma {
    pub bytes: VecDeque<u8>,
    pub begun: usize,
    pub completed: usize,
}

impl FakeDma {
    pub fn with_bytes(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            bytes: bytes.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl IsaDma for FakeDma {
    fn begin_transfer(&mut self) {
        self.begun += 1;
    }

    fn complete_transfer(&mut self) -> u8 {
        self.completed += 1;
        self.bytes.pop_front().unwrap_or(0x80)
    }
}

/// Secondary stream holding one value on both channels.
pub struct ConstSource(pub i16);

impl SecondarySource for ConstSource {
    fn fill(&mut self, samples: &mut [[i16; 2]]) {
        samples.fill([self.0, self.0]);
    }
}

/// Records how many samples the mixer asked for.
#[derive(Default)]
pub struct CountingSource {
    pub requests: Vec<usize>,
}

impl SecondarySource for CountingSource {
    fn fill(&mut self, samples: &mut [[i16; 2]]) {
        self.requests.push(samples.len());
        samples.fill([0, 0]);
    }
}

/// Writes `bytes` to the data port, running one protocol step after each.
pub fn send(dsp: &mut Dsp, pic: &mut FakePic, bytes: &[u8]) {
    for &byte in bytes {
        dsp.write(Port::Write, byte, pic);
        dsp.process(pic);
    }
}

/// Full reset handshake, including reading the acknowledge byte.
pub fn reset(dsp: &mut Dsp, pic: &mut FakePic) {
    dsp.write(Port::Reset, 1, pic);
    dsp.write(Port::Reset, 0, pic);
    assert_eq!(dsp.read(Port::Read, pic), 0xAA);
}

/// Runs `count` pacing event + completion pairs.
pub fn run_transfers(dsp: &Dsp, dma: &mut FakeDma, pic: &mut FakePic, count: usize) {
    for _ in 0..count {
        pic.fire();
        dsp.shared().pacing_event(dma);
        dsp.shared().dma_complete(dma, pic);
    }
}
