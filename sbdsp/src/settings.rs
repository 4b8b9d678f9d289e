use fugit::HertzU32;

use crate::consts::{
    DSP_VERSION_MAJOR, DSP_VERSION_MINOR, FIFO_PULL_SIZE, MAX_FIFO_PULL_SIZE, OUTPUT_SAMPLE_RATE,
};

/// How the secondary stream is added to the DSP output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixMode {
    /// Two's complement wraparound, as the hardware mixer does.
    #[default]
    Wrapping,
    Saturating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DspVersion {
    pub major: u8,
    pub minor: u8,
}

impl Default for DspVersion {
    fn default() -> Self {
        Self {
            major: DSP_VERSION_MAJOR,
            minor: DSP_VERSION_MINOR,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DspSettings {
    pub output_rate: HertzU32,
    /// How often the mixer polls an empty FIFO before giving up on the frame
    /// and emitting silence. 0 does not wait at all.
    pub fifo_wait_spins: u32,
    pub mix_mode: MixMode,
    pub version: DspVersion,
    /// Bytes taken from the FIFO per frame, clamped to `1..=MAX_FIFO_PULL_SIZE`.
    /// Slow rates take fewer so the frame has room for all of them.
    pub pull_size: usize,
}

impl DspSettings {
    pub fn pull_size(&self) -> usize {
        self.pull_size.clamp(1, MAX_FIFO_PULL_SIZE)
    }
}

impl Default for DspSettings {
    fn default() -> Self {
        Self {
            output_rate: OUTPUT_SAMPLE_RATE,
            fifo_wait_spins: 2048,
            mix_mode: MixMode::default(),
            version: DspVersion::default(),
            pull_size: FIFO_PULL_SIZE,
        }
    }
}
