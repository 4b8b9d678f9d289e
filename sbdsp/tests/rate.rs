use fixed::types::U16F16;
use sbdsp::{consts::OUTPUT_SAMPLE_RATE, rate::RateParams};

#[test]
fn test_time_constant_0xd4() {
    let rate = RateParams::from_time_constant(0xD4, OUTPUT_SAMPLE_RATE);

    assert_eq!(rate.time_constant, 0xD4);
    assert_eq!(rate.sample_rate.raw(), 1_000_000 / 44);
    assert_eq!(rate.sample_rate.raw(), 22727);
    assert_eq!(rate.dma_interval.ticks(), 1_000_000 / 22727);
    assert_eq!(rate.dma_interval.ticks(), 44);

    let step_bits = (22727u64 * 65536 / 49716) as u32;
    assert_eq!(rate.sample_step, U16F16::from_bits(step_bits));
    assert_eq!(rate.sample_step.to_bits(), 29958);
    assert_eq!(rate.sample_factor, 49716 / 22727 + 5);
}

#[test]
fn test_time_constant_extremes() {
    let slowest = RateParams::from_time_constant(0x00, OUTPUT_SAMPLE_RATE);
    assert_eq!(slowest.sample_rate.raw(), 3906);
    assert_eq!(slowest.dma_interval.ticks(), 256);
    assert_eq!(slowest.sample_factor, 12 + 5);

    // Faster than the output: step above one, no overflow on the way.
    let fastest = RateParams::from_time_constant(0xFF, OUTPUT_SAMPLE_RATE);
    assert_eq!(fastest.sample_rate.raw(), 1_000_000);
    assert_eq!(fastest.dma_interval.ticks(), 1);
    assert_eq!(
        fastest.sample_step.to_bits() as u64,
        1_000_000u64 * 65536 / 49716
    );
    assert_eq!(fastest.sample_factor, 5);
}

#[test]
fn test_unset_produces_nothing() {
    let rate = RateParams::default();
    assert_eq!(rate, RateParams::UNSET);
    assert_eq!(rate.sample_factor, 0);
    assert_eq!(rate.sample_step, U16F16::ZERO);
}
