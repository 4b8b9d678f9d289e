//! Collaborators the DSP core drives but does not own. The firmware wires
//! these to the PIO DMA program, the timer alarm and the FM synth.

use fugit::MicrosDurationU32;

/// Events the DSP asks the interrupt controller to deliver later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PicEvent {
    /// Time for the next DMA sample; delivered to `SharedState::pacing_event`.
    DmaPacing,
}

/// Interrupt controller and its one-shot event queue.
pub trait Pic {
    /// Deliver `event` once after `delay` of virtual time.
    fn schedule(&mut self, event: PicEvent, delay: MicrosDurationU32);
    /// Drop every pending delivery of `event`.
    fn cancel(&mut self, event: PicEvent);
    fn assert_irq(&mut self);
    fn deassert_irq(&mut self);
}

/// Host DMA channel, one byte per transfer.
pub trait IsaDma {
    /// Start reading one byte from host memory. Completion is signalled by
    /// the DMA interrupt, which then calls `complete_transfer`.
    fn begin_transfer(&mut self);
    fn complete_transfer(&mut self) -> u8;
}

/// Second audio stream mixed on top of the DSP output, usually the OPL synth.
pub trait SecondarySource {
    /// Overwrite every stereo sample in `samples`.
    fn fill(&mut self, samples: &mut [[i16; 2]]);
}

/// No second stream at all.
pub struct Silence;

impl SecondarySource for Silence {
    fn fill(&mut self, samples: &mut [[i16; 2]]) {
        samples.fill([0, 0]);
    }
}
