//! Single byte mailboxes between the host and the DSP.
//!
//! `dav_dsp` publishes the inbox to the DSP, `dav_pc` publishes the outbox to
//! the host. Each byte is stored before its flag is raised.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

pub struct Handshake {
    inbox: AtomicU8,
    outbox: AtomicU8,
    dav_pc: AtomicBool,
    dav_dsp: AtomicBool,
    busy: AtomicBool,
}

impl Handshake {
    pub const fn new() -> Self {
        Self {
            inbox: AtomicU8::new(0),
            outbox: AtomicU8::new(0),
            dav_pc: AtomicBool::new(false),
            dav_dsp: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        }
    }

    /// Host writes the data port. Returns true if an unconsumed byte was
    /// overwritten.
    pub fn host_write(&self, value: u8) -> bool {
        let overwrote = self.dav_dsp.load(Ordering::Acquire);
        self.inbox.store(value, Ordering::Relaxed);
        self.dav_dsp.store(true, Ordering::Release);
        overwrote
    }

    /// Host reads the data port.
    pub fn host_read(&self) -> u8 {
        let value = self.outbox.load(Ordering::Acquire);
        self.dav_pc.store(false, Ordering::Release);
        value
    }

    /// Takes the pending inbox byte, if any.
    pub fn take_input(&self) -> Option<u8> {
        if !self.dav_dsp.load(Ordering::Acquire) {
            return None;
        }
        let value = self.inbox.load(Ordering::Relaxed);
        self.dav_dsp.store(false, Ordering::Release);
        Some(value)
    }

    /// Publishes `value` to the host.
    pub fn output(&self, value: u8) {
        self.outbox.store(value, Ordering::Relaxed);
        self.dav_pc.store(true, Ordering::Release);
    }

    pub fn outbox(&self) -> u8 {
        self.outbox.load(Ordering::Relaxed)
    }

    pub fn dav_pc(&self) -> bool {
        self.dav_pc.load(Ordering::Acquire)
    }

    pub fn dav_dsp(&self) -> bool {
        self.dav_dsp.load(Ordering::Acquire)
    }

    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Release);
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}
