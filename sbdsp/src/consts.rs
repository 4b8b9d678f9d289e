use fugit::HertzU32;

/// Rate of the audio clock that pulls frames out of the mixer.
pub const OUTPUT_SAMPLE_RATE: HertzU32 = HertzU32::from_raw(49_716u32);

/// Time constants are expressed against a 1MHz reference.
pub const TIME_CONSTANT_CLOCK_HZ: u32 = 1_000_000;

pub const DSP_FIFO_SIZE: usize = 1024;

/// Block size after a reset, as documented for DSP 2.01.
pub const DEFAULT_BLOCK_SIZE: u16 = 0x7FF;

/// Microseconds added to or removed from the DMA interval by the pacing loop.
pub const PACING_TRIM_US: i32 = 5;

/// Bytes pulled out of the FIFO for every output frame.
pub const FIFO_PULL_SIZE: usize = 4;
pub const MAX_FIFO_PULL_SIZE: usize = 16;

/// Upper bound on stereo samples in one output frame.
pub const FRAME_CAPACITY: usize = 128;

pub const DSP_VERSION_MAJOR: u8 = 2;
pub const DSP_VERSION_MINOR: u8 = 1;

/// Written to the outbox once a reset is released.
pub const RESET_ACK: u8 = 0xAA;

/// Status registers report their flag in the MSB.
pub const STATUS_BIT: u8 = 7;

pub const UNMAPPED_READ: u8 = 0xFF;

/// 8-bit unsigned PCM is biased around this value.
pub const PCM_U8_BIAS: i16 = 0x80;
