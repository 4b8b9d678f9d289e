use core::sync::atomic::{AtomicU32, Ordering};

/// Increment for counters that only one context ever writes.
/// thumbv6m has no atomic read-modify-write, so this is a load and a store.
#[inline]
pub(crate) fn bump(counter: &AtomicU32) {
    let value = counter.load(Ordering::Relaxed);
    counter.store(value.wrapping_add(1), Ordering::Relaxed);
}

/// Non-fatal conditions seen by the DSP. None of these stop the device.
///
/// `overruns` and `late_completions` are written by the interrupt context,
/// the others by the poll context.
pub struct Diagnostics {
    overruns: AtomicU32,
    overwrites: AtomicU32,
    unknown_commands: AtomicU32,
    unsupported_commands: AtomicU32,
    stalls: AtomicU32,
    late_completions: AtomicU32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticsSnapshot {
    pub overruns: u32,
    pub overwrites: u32,
    pub unknown_commands: u32,
    pub unsupported_commands: u32,
    pub stalls: u32,
    pub late_completions: u32,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            overruns: AtomicU32::new(0),
            overwrites: AtomicU32::new(0),
            unknown_commands: AtomicU32::new(0),
            unsupported_commands: AtomicU32::new(0),
            stalls: AtomicU32::new(0),
            late_completions: AtomicU32::new(0),
        }
    }

    pub(crate) fn overrun(&self) {
        bump(&self.overruns);
    }

    pub(crate) fn overwrite(&self) {
        bump(&self.overwrites);
    }

    pub(crate) fn unknown_command(&self) {
        bump(&self.unknown_commands);
    }

    pub(crate) fn unsupported_command(&self) {
        bump(&self.unsupported_commands);
    }

    pub(crate) fn stall(&self) {
        bump(&self.stalls);
    }

    pub(crate) fn late_completion(&self) {
        bump(&self.late_completions);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            overruns: self.overruns.load(Ordering::Relaxed),
            overwrites: self.overwrites.load(Ordering::Relaxed),
            unknown_commands: self.unknown_commands.load(Ordering::Relaxed),
            unsupported_commands: self.unsupported_commands.load(Ordering::Relaxed),
            stalls: self.stalls.load(Ordering::Relaxed),
            late_completions: self.late_completions.load(Ordering::Relaxed),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
