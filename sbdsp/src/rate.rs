use fixed::types::U16F16;
use fugit::{HertzU32, MicrosDurationU32};

use crate::consts::TIME_CONSTANT_CLOCK_HZ;

/// Everything derived from the host's time constant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateParams {
    pub time_constant: u8,
    pub sample_rate: HertzU32,
    /// Delay between two DMA sample fetches.
    pub dma_interval: MicrosDurationU32,
    /// Input samples consumed per output sample.
    pub sample_step: U16F16,
    /// Estimate of how many output samples one input sample turns into, with
    /// some margin. Bounds the resampling loop.
    pub sample_factor: u32,
}

impl RateParams {
    /// State before the host ever sets a time constant: nothing is produced.
    pub const UNSET: RateParams = RateParams {
        time_constant: 0,
        sample_rate: HertzU32::from_raw(0),
        dma_interval: MicrosDurationU32::from_ticks(0),
        sample_step: U16F16::ZERO,
        sample_factor: 0,
    };

    pub fn from_time_constant(time_constant: u8, output_rate: HertzU32) -> Self {
        let sample_rate = TIME_CONSTANT_CLOCK_HZ / (256 - time_constant as u32);
        let dma_interval = TIME_CONSTANT_CLOCK_HZ / sample_rate;

        let step_bits = ((sample_rate as u64) << 16) / output_rate.raw().max(1) as u64;
        let sample_step = U16F16::from_bits(step_bits.min(u32::MAX as u64) as u32);

        let sample_factor = output_rate.raw() / sample_rate + 5;

        Self {
            time_constant,
            sample_rate: HertzU32::from_raw(sample_rate),
            dma_interval: MicrosDurationU32::from_ticks(dma_interval),
            sample_step,
            sample_factor,
        }
    }
}

impl Default for RateParams {
    fn default() -> Self {
        Self::UNSET
    }
}
