//! DMA pacing loop.
//!
//! There is no clock shared between the host DMA and the audio output, so
//! every sample is fetched by a one-shot event whose delay is the nominal
//! sample interval nudged by the FIFO level: above half full the next fetch
//! comes later, below it comes earlier.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use fugit::MicrosDurationU32;
#[cfg(feature = "defmt")]
use defmt::{debug, trace, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, trace, warn};

use crate::{
    consts::PACING_TRIM_US,
    diagnostics::{bump, Diagnostics},
    fifo::{Push, SampleFifo},
    io::{IsaDma, Pic, PicEvent},
};

/// What a completed transfer did to the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// Block still in progress, next sample scheduled.
    Continue,
    /// Block finished and auto-init restarted it.
    Looped,
    /// Block finished, pacing stopped.
    Stopped,
    /// The transfer belongs to an earlier enable, or pacing is off; the
    /// byte was dropped.
    Late,
}

pub struct DmaPacer {
    enabled: AtomicBool,
    autoinit: AtomicBool,
    interval_us: AtomicU32,
    trim_us: AtomicI32,
    sample_count: AtomicU32,
    sample_count_rx: AtomicU32,
    /// Bumped by every enable. Only the poll context writes it.
    epoch: AtomicU32,
    /// Epoch the in-flight transfer was started under. Only the interrupt
    /// context writes it.
    transfer_epoch: AtomicU32,
}

impl DmaPacer {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            autoinit: AtomicBool::new(false),
            interval_us: AtomicU32::new(0),
            trim_us: AtomicI32::new(0),
            sample_count: AtomicU32::new(0),
            sample_count_rx: AtomicU32::new(0),
            epoch: AtomicU32::new(0),
            transfer_epoch: AtomicU32::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn autoinit(&self) -> bool {
        self.autoinit.load(Ordering::Acquire)
    }

    pub fn set_autoinit(&self, autoinit: bool) {
        self.autoinit.store(autoinit, Ordering::Release);
    }

    pub fn interval(&self) -> MicrosDurationU32 {
        MicrosDurationU32::from_ticks(self.interval_us.load(Ordering::Relaxed))
    }

    pub fn set_interval(&self, interval: MicrosDurationU32) {
        self.interval_us.store(interval.ticks(), Ordering::Relaxed);
    }

    pub fn trim_us(&self) -> i32 {
        self.trim_us.load(Ordering::Relaxed)
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count.load(Ordering::Acquire)
    }

    pub fn set_sample_count(&self, count: u32) {
        self.sample_count.store(count, Ordering::Release);
    }

    pub fn sample_count_rx(&self) -> u32 {
        self.sample_count_rx.load(Ordering::Acquire)
    }

    pub fn reset_sample_count_rx(&self) {
        self.sample_count_rx.store(0, Ordering::Release);
    }

    /// Delay until the next sample fetch, never negative.
    pub fn next_delay(&self) -> MicrosDurationU32 {
        let interval = self.interval_us.load(Ordering::Relaxed) as i64;
        let delay = (interval + self.trim_us() as i64).clamp(0, u32::MAX as i64);
        MicrosDurationU32::from_ticks(delay as u32)
    }

    /// Starts pacing unless it is already running. Stale FIFO contents are
    /// dropped, and a transfer still in flight from before is completed as
    /// late. Returns true if pacing was started.
    pub fn enable<const N: usize>(&self, fifo: &SampleFifo<N>, pic: &mut impl Pic) -> bool {
        if self.is_enabled() {
            trace!("dma already enabled");
            return false;
        }

        fifo.clear();
        bump(&self.epoch);
        pic.cancel(PicEvent::DmaPacing);
        self.enabled.store(true, Ordering::Release);
        pic.schedule(PicEvent::DmaPacing, self.interval());
        debug!("dma enabled, interval {}us", self.interval().ticks());
        true
    }

    /// Stops pacing. The pending event is cancelled before the flag drops so
    /// no event can fire against the old state.
    pub fn disable(&self, pic: &mut impl Pic) {
        pic.cancel(PicEvent::DmaPacing);
        self.enabled.store(false, Ordering::Release);
        debug!("dma disabled");
    }

    /// Scheduled event: pick the trim for the next interval and fetch one
    /// byte. Returns false if pacing was disabled in the meantime.
    pub fn on_pacing_event<const N: usize>(
        &self,
        fifo: &SampleFifo<N>,
        dma: &mut impl IsaDma,
    ) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let trim = if fifo.is_at_least_half_full() {
            PACING_TRIM_US
        } else {
            -PACING_TRIM_US
        };
        self.trim_us.store(trim, Ordering::Relaxed);
        trace!("pacing: level {} trim {}", fifo.level(), trim);

        self.transfer_epoch
            .store(self.epoch.load(Ordering::Acquire), Ordering::Release);
        dma.begin_transfer();
        true
    }

    /// DMA completion interrupt.
    pub fn on_transfer_complete<const N: usize>(
        &self,
        fifo: &SampleFifo<N>,
        dma: &mut impl IsaDma,
        pic: &mut impl Pic,
        diagnostics: &Diagnostics,
    ) -> Completion {
        let byte = dma.complete_transfer();

        let epoch = self.epoch.load(Ordering::Acquire);
        let stale = self.transfer_epoch.load(Ordering::Acquire) != epoch;
        if stale || !self.is_enabled() {
            diagnostics.late_completion();
            return Completion::Late;
        }

        if let Push::Overran = fifo.push(byte) {
            diagnostics.overrun();
            warn!("dsp fifo overrun");
        }

        let received = self.sample_count_rx().wrapping_add(1);
        self.sample_count_rx.store(received, Ordering::Release);

        if received <= self.sample_count() {
            pic.schedule(PicEvent::DmaPacing, self.next_delay());
            return Completion::Continue;
        }

        let completion = if self.autoinit() {
            self.reset_sample_count_rx();
            pic.schedule(PicEvent::DmaPacing, self.next_delay());
            Completion::Looped
        } else {
            self.disable(pic);
            Completion::Stopped
        };

        pic.assert_irq();
        completion
    }
}

impl Default for DmaPacer {
    fn default() -> Self {
        Self::new()
    }
}
