use std::collections::VecDeque;

use anyhow::bail;
use log::{debug, info};
use sbdsp::{port::Port, Dsp};

use crate::scheduler::VirtualPic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    ResetAck,
    VersionMajor,
    VersionMinor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Reset(u8),
    /// Waits for the write-status bit to clear, then writes the data port.
    Write(u8),
    /// Waits for the read-status bit, then reads the data port.
    Read(Reply),
}

/// Plays the part of a DOS sound driver: reset, identify, program the rate
/// and start auto-init playback, then acknowledge every block interrupt.
pub struct HostDriver {
    script: VecDeque<Action>,
    major: u8,
    blocks: u32,
}

impl HostDriver {
    pub fn new(time_constant: u8, block_size: u16) -> Self {
        let [low, high] = block_size.to_le_bytes();
        let script = [
            Action::Reset(1),
            Action::Reset(0),
            Action::Read(Reply::ResetAck),
            Action::Write(0xE1),
            Action::Read(Reply::VersionMajor),
            Action::Read(Reply::VersionMinor),
            Action::Write(0xD1),
            Action::Write(0x40),
            Action::Write(time_constant),
            Action::Write(0x48),
            Action::Write(low),
            Action::Write(high),
            Action::Write(0x1C),
        ];

        Self {
            script: script.into_iter().collect(),
            major: 0,
            blocks: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.script.is_empty()
    }

    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// One poll of the host side. Does at most one port access that changes
    /// DSP state.
    pub fn step(&mut self, dsp: &mut Dsp, pic: &mut VirtualPic) -> anyhow::Result<()> {
        let Some(&action) = self.script.front() else {
            if pic.irq_line() {
                dsp.read(Port::ReadStatus, pic);
                self.blocks += 1;
                debug!("block {} done at {}us", self.blocks, pic.now_us());
            }
            return Ok(());
        };

        let done = match action {
            Action::Reset(value) => {
                dsp.write(Port::Reset, value, pic);
                true
            }
            Action::Write(value) => {
                let ready = dsp.read(Port::WRITE_STATUS, pic) & 0x80 == 0;
                if ready {
                    dsp.write(Port::Write, value, pic);
                }
                ready
            }
            Action::Read(reply) => {
                let ready = dsp.read(Port::ReadStatus, pic) & 0x80 != 0;
                if ready {
                    let byte = dsp.read(Port::Read, pic);
                    self.accept(reply, byte)?;
                }
                ready
            }
        };

        if done {
            self.script.pop_front();
            if self.script.is_empty() {
                info!("playback started at {}us", pic.now_us());
            }
        }
        Ok(())
    }

    fn accept(&mut self, reply: Reply, byte: u8) -> anyhow::Result<()> {
        match reply {
            Reply::ResetAck if byte != 0xAA => bail!("bad reset acknowledge {:#04x}", byte),
            Reply::ResetAck => debug!("dsp reset ok"),
            Reply::VersionMajor => self.major = byte,
            Reply::VersionMinor => info!("dsp version {}.{:02}", self.major, byte),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sbdsp::{settings::DspSettings, SharedState};

    use super::*;

    #[test]
    fn test_script_starts_playback() {
        let shared = SharedState::new();
        let mut dsp = Dsp::new(&shared, DspSettings::default());
        let mut pic = VirtualPic::new();
        let mut driver = HostDriver::new(0xD4, 0x100);

        for _ in 0..64 {
            driver.step(&mut dsp, &mut pic).unwrap();
            dsp.process(&mut pic);
        }

        assert!(driver.is_playing());
        assert_eq!(driver.major, 2);
        assert!(dsp.speaker());
        assert_eq!(dsp.block_size(), 0x100);
        assert_eq!(dsp.rate().time_constant, 0xD4);
        assert!(shared.pacer().is_enabled());
        assert!(shared.pacer().autoinit());
    }

    #[test]
    fn test_irq_is_acknowledged() {
        let shared = SharedState::new();
        let mut dsp = Dsp::new(&shared, DspSettings::default());
        let mut pic = VirtualPic::new();
        let mut driver = HostDriver::new(0xD4, 0x100);
        driver.script.clear();

        sbdsp::io::Pic::assert_irq(&mut pic);
        driver.step(&mut dsp, &mut pic).unwrap();

        assert!(!pic.irq_line());
        assert_eq!(driver.blocks(), 1);
    }
}
