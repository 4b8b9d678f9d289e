//! Resampler and mixer, run once per output frame by the audio callback.
//!
//! FIFO bytes are 8-bit unsigned mono PCM at the rate the host programmed.
//! A 16.16 fixed point accumulator walks over them at `sample_step` input
//! samples per output sample, so every input byte is repeated (or skipped)
//! to land on the fixed output rate. The secondary stream is added on top.

use fixed::types::U48F16;
use heapless::Vec;
#[cfg(feature = "defmt")]
use defmt::warn;
#[cfg(not(feature = "defmt"))]
use log::warn;

use crate::{
    consts::{FRAME_CAPACITY, MAX_FIFO_PULL_SIZE, PCM_U8_BIAS},
    io::SecondarySource,
    rate::RateParams,
    settings::{DspSettings, MixMode},
    shared::SharedState,
};

/// Left and right channel.
pub type StereoSample = [i16; 2];

pub const SILENCE: StereoSample = [0, 0];

#[inline]
pub fn pcm_u8_to_i16(byte: u8) -> i16 {
    (byte as i16 - PCM_U8_BIAS) << 8
}

/// One frame of output, handed to the audio subsystem.
#[derive(Debug, Default, Clone)]
pub struct AudioFrame {
    samples: Vec<StereoSample, FRAME_CAPACITY>,
}

impl AudioFrame {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[StereoSample] {
        &self.samples
    }

    /// Left, right, left, right...
    pub fn interleaved(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.iter().flat_map(|sample| sample.iter().copied())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Returns false once the frame is full.
    pub fn push(&mut self, sample: StereoSample) -> bool {
        self.samples.push(sample).is_ok()
    }

    fn overlay(&mut self, other: &[StereoSample], mode: MixMode) {
        for (sample, extra) in self.samples.iter_mut().zip(other) {
            for (channel, extra) in sample.iter_mut().zip(extra) {
                *channel = match mode {
                    MixMode::Wrapping => channel.wrapping_add(*extra),
                    MixMode::Saturating => channel.saturating_add(*extra),
                };
            }
        }
    }
}

pub struct Resampler {
    offset: U48F16,
}

impl Resampler {
    pub const fn new() -> Self {
        Self {
            offset: U48F16::ZERO,
        }
    }

    /// Position in the input stream, in samples since power on.
    pub fn offset(&self) -> U48F16 {
        self.offset
    }

    fn whole(&self) -> u64 {
        self.offset.to_bits() >> 16
    }

    /// Appends the resampled `input` to `frame`, returning the number of
    /// output samples produced. The fractional position carries over into
    /// the next call.
    pub fn resample(
        &mut self,
        input: &[u8],
        rate: &RateParams,
        frame: &mut AudioFrame,
    ) -> usize {
        let start = self.whole();
        let step = U48F16::from_bits(rate.sample_step.to_bits() as u64);
        let limit = input.len() * rate.sample_factor as usize;
        let mut produced = 0;

        while produced < limit {
            let index = (self.whole() - start) as usize;
            let Some(&byte) = input.get(index) else {
                break;
            };

            let value = pcm_u8_to_i16(byte);
            if !frame.push([value, value]) {
                break;
            }

            self.offset += step;
            produced += 1;
        }

        produced
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Mixer {
    resampler: Resampler,
    secondary: [StereoSample; FRAME_CAPACITY],
    pull_size: usize,
    fifo_wait_spins: u32,
    mix_mode: MixMode,
}

impl Mixer {
    pub fn new(settings: &DspSettings) -> Self {
        Self {
            resampler: Resampler::new(),
            secondary: [SILENCE; FRAME_CAPACITY],
            pull_size: settings.pull_size(),
            fifo_wait_spins: settings.fifo_wait_spins,
            mix_mode: settings.mix_mode,
        }
    }

    pub fn resampler(&self) -> &Resampler {
        &self.resampler
    }

    /// Fills `frame` with the next stretch of DSP audio plus the secondary
    /// stream. The frame always holds at least one sample.
    pub fn mix(
        &mut self,
        shared: &SharedState,
        rate: &RateParams,
        frame: &mut AudioFrame,
        secondary: &mut impl SecondarySource,
    ) {
        frame.clear();

        if shared.pacer().is_enabled() {
            if self.wait_for_fifo(shared) {
                let mut pulled = [0u8; MAX_FIFO_PULL_SIZE];
                let len = shared.fifo().pop_into(&mut pulled[..self.pull_len(rate)]);
                self.resampler.resample(&pulled[..len], rate, frame);
            } else {
                shared.counters().stall();
                warn!("dsp fifo empty, emitting silence");
            }
        }

        if frame.is_empty() {
            frame.push(SILENCE);
        }

        let count = frame.sample_count();
        let extra = &mut self.secondary[..count];
        secondary.fill(extra);
        frame.overlay(extra, self.mix_mode);
    }

    /// Bytes to take from the FIFO this frame. `sample_factor` bounds the
    /// output of one byte, so the frame cannot fill up before every pulled
    /// byte has been played.
    fn pull_len(&self, rate: &RateParams) -> usize {
        let fits = FRAME_CAPACITY / rate.sample_factor.max(1) as usize;
        self.pull_size.min(fits.max(1))
    }

    fn wait_for_fifo(&self, shared: &SharedState) -> bool {
        let fifo = shared.fifo();
        let mut spins = 0;

        while fifo.is_empty() {
            if spins >= self.fifo_wait_spins {
                return false;
            }
            spins += 1;
            core::hint::spin_loop();
        }

        true
    }
}
