use std::f32::consts::TAU;

use log::warn;
use sbdsp::io::{IsaDma, SecondarySource};

/// Host memory behind the DMA channel: an 8-bit unsigned sine, read one byte
/// per transfer and wrapping at the end like an auto-init buffer.
pub struct VirtualDma {
    memory: Vec<u8>,
    position: usize,
    in_flight: bool,
    transfers: u64,
}

impl VirtualDma {
    pub fn sine(frequency: f32, sample_rate: u32, amplitude: f32) -> Self {
        let period = (sample_rate as f32 / frequency).round().max(1.0) as usize;
        let memory = (0..period)
            .map(|n| {
                let phase = TAU * n as f32 / period as f32;
                (128.0 + amplitude * 127.0 * phase.sin()).round() as u8
            })
            .collect();

        Self {
            memory,
            position: 0,
            in_flight: false,
            transfers: 0,
        }
    }

    pub fn transfers(&self) -> u64 {
        self.transfers
    }
}

impl IsaDma for VirtualDma {
    fn begin_transfer(&mut self) {
        if self.in_flight {
            warn!("dma transfer started twice");
        }
        self.in_flight = true;
    }

    fn complete_transfer(&mut self) -> u8 {
        self.in_flight = false;
        self.transfers += 1;

        let byte = self.memory[self.position];
        self.position = (self.position + 1) % self.memory.len();
        byte
    }
}

/// Stand-in for the FM synth: a quiet square wave on both channels.
pub struct SquareWave {
    half_period: u32,
    phase: u32,
    amplitude: i16,
}

impl SquareWave {
    pub fn new(frequency: f32, sample_rate: u32, amplitude: i16) -> Self {
        let half_period = (sample_rate as f32 / frequency / 2.0).round().max(1.0) as u32;
        Self {
            half_period,
            phase: 0,
            amplitude,
        }
    }
}

impl SecondarySource for SquareWave {
    fn fill(&mut self, samples: &mut [[i16; 2]]) {
        for sample in samples {
            let value = if self.phase < self.half_period {
                self.amplitude
            } else {
                -self.amplitude
            };
            *sample = [value, value];
            self.phase = (self.phase + 1) % (2 * self.half_period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dma_wraps_around_memory() {
        let mut dma = VirtualDma::sine(1000.0, 4000, 1.0);
        let first: Vec<u8> = (0..4).map(|_| dma.complete_transfer()).collect();
        let second: Vec<u8> = (0..4).map(|_| dma.complete_transfer()).collect();

        assert_eq!(first, second);
        assert_eq!(first, [128, 255, 128, 1]);
        assert_eq!(dma.transfers(), 8);
    }

    #[test]
    fn test_square_wave_alternates() {
        let mut square = SquareWave::new(1.0, 4, 100);
        let mut samples = [[0i16; 2]; 6];
        square.fill(&mut samples);

        let left: Vec<i16> = samples.iter().map(|sample| sample[0]).collect();
        assert_eq!(left, [100, 100, -100, -100, 100, 100]);
    }
}
