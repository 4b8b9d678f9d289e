//! Runs the DSP core against a virtual PC: a scripted host driver, a DMA
//! engine streaming a sine from host memory and a square wave standing in
//! for the FM synth. The mixed output is written to a stereo WAV file.

mod devices;
mod driver;
mod scheduler;

use std::env;

use anyhow::Context;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use sbdsp::{
    consts::{OUTPUT_SAMPLE_RATE, TIME_CONSTANT_CLOCK_HZ},
    io::PicEvent,
    mixer::AudioFrame,
    settings::DspSettings,
    Dsp, SharedState,
};

use crate::{
    devices::{SquareWave, VirtualDma},
    driver::HostDriver,
    scheduler::{SimEvent, VirtualPic},
};

const DEFAULT_SECONDS: u64 = 2;
const DEFAULT_TIME_CONSTANT: u8 = 0xD4;
const BLOCK_SIZE: u16 = 0x3FF;
/// Time the DMA engine needs for one byte.
const DMA_LATENCY_US: u64 = 1;

static DSP_SHARED: SharedState = SharedState::new();

fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or(LevelFilter::Info.to_string())).init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .context("usage: sim <output.wav> [seconds] [time-constant]")?;
    let seconds = match args.next() {
        Some(arg) => arg.parse().context("seconds must be a whole number")?,
        None => DEFAULT_SECONDS,
    };
    let time_constant = match args.next() {
        Some(arg) => parse_byte(&arg)?,
        None => DEFAULT_TIME_CONSTANT,
    };

    let output_rate = OUTPUT_SAMPLE_RATE.raw();
    let input_rate = TIME_CONSTANT_CLOCK_HZ / (256 - time_constant as u32);
    info!(
        "{}s at time constant {:#04x} ({} Hz) into {}",
        seconds, time_constant, input_rate, path
    );

    let settings = DspSettings {
        // Nothing else runs while the mixer spins, so waiting cannot help.
        fifo_wait_spins: 0,
        ..DspSettings::default()
    };
    let mut dsp = Dsp::new(&DSP_SHARED, settings);
    let mut pic = VirtualPic::new();
    let mut dma = VirtualDma::sine(440.0, input_rate, 0.8);
    let mut synth = SquareWave::new(110.0, output_rate, 1500);
    let mut driver = HostDriver::new(time_constant, BLOCK_SIZE);

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: output_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    let mut frame = AudioFrame::new();
    let mut written: u64 = 0;
    let end_us = seconds * 1_000_000;

    while pic.now_us() < end_us {
        for event in pic.drain_due_events() {
            match event {
                SimEvent::Pic(PicEvent::DmaPacing) => {
                    if DSP_SHARED.pacing_event(&mut dma) {
                        pic.schedule_in(DMA_LATENCY_US, SimEvent::DmaDone);
                    }
                }
                SimEvent::DmaDone => {
                    DSP_SHARED.dma_complete(&mut dma, &mut pic);
                }
            }
        }

        driver.step(&mut dsp, &mut pic)?;
        dsp.process(&mut pic);

        // The audio output pulls a frame whenever it has played the last one.
        while written * 1_000_000 <= pic.now_us() * output_rate as u64 {
            dsp.mix(&mut frame, &mut synth);
            for sample in frame.interleaved() {
                writer.write_sample(sample)?;
            }
            written += frame.sample_count() as u64;
        }

        pic.advance(1);
    }

    writer.finalize()?;

    let diagnostics = DSP_SHARED.diagnostics();
    info!(
        "{} output samples, {} dma transfers, {} blocks, {} irqs",
        written,
        dma.transfers(),
        driver.blocks(),
        pic.irq_count()
    );
    info!("fifo level {} at exit", DSP_SHARED.fifo().level());
    info!("{:?}", diagnostics);

    Ok(())
}

/// Accepts `0xD4` as well as `212`.
fn parse_byte(arg: &str) -> anyhow::Result<u8> {
    let value = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    value.with_context(|| format!("time constant {:?} is not a byte", arg))
}
