use std::collections::VecDeque;

use rand::Rng;
use sbdsp::fifo::{Push, SampleFifo};

#[test]
fn test_level_follows_pushes_and_pops() {
    let fifo = SampleFifo::<1024>::new();

    for i in 0..300u32 {
        assert_eq!(fifo.push(i as u8), Push::Stored);
    }
    assert_eq!(fifo.level(), 300);

    let mut buffer = [0u8; 120];
    assert_eq!(fifo.pop_into(&mut buffer), 120);
    assert_eq!(fifo.level(), 180);
    assert_eq!(buffer[0], 0);
    assert_eq!(buffer[119], 119);
}

#[test]
fn test_overrun_drops_oldest_byte() {
    let fifo = SampleFifo::<1024>::new();

    let overruns = (0..1025u32)
        .map(|i| fifo.push(i as u8))
        .filter(|push| *push == Push::Overran)
        .count();

    assert_eq!(overruns, 1);
    assert_eq!(fifo.level(), 1024);

    let mut buffer = [0u8; 1024];
    assert_eq!(fifo.pop_into(&mut buffer), 1024);
    // Byte 0 was overwritten, the oldest survivor is byte 1.
    assert_eq!(buffer[0], 1);
    assert_eq!(buffer[1023], (1024 % 256) as u8);
    assert!(fifo.is_empty());
}

#[test]
fn test_pop_into_handles_wraparound() {
    let fifo = SampleFifo::<8>::new();
    let mut buffer = [0u8; 8];

    for i in 0..6 {
        fifo.push(i);
    }
    assert_eq!(fifo.pop_into(&mut buffer[..6]), 6);

    // Head sits at slot 6, these wrap around the end.
    for i in 10..15 {
        fifo.push(i);
    }
    assert_eq!(fifo.pop_into(&mut buffer), 5);
    assert_eq!(&buffer[..5], &[10, 11, 12, 13, 14]);
}

#[test]
fn test_pop_into_empty_or_zero_length() {
    let fifo = SampleFifo::<16>::new();
    let mut buffer = [0u8; 4];

    assert_eq!(fifo.pop_into(&mut buffer), 0);

    fifo.push(7);
    assert_eq!(fifo.pop_into(&mut buffer[..0]), 0);
    assert_eq!(fifo.level(), 1);
}

#[test]
fn test_pop_into_is_limited_by_level() {
    let fifo = SampleFifo::<16>::new();
    fifo.push(1);
    fifo.push(2);

    let mut buffer = [0u8; 4];
    assert_eq!(fifo.pop_into(&mut buffer), 2);
    assert_eq!(&buffer[..2], &[1, 2]);
}

#[test]
fn test_clear_drops_everything() {
    let fifo = SampleFifo::<16>::new();
    for i in 0..10 {
        fifo.push(i);
    }

    fifo.clear();
    assert_eq!(fifo.level(), 0);

    fifo.push(42);
    let mut buffer = [0u8; 4];
    assert_eq!(fifo.pop_into(&mut buffer), 1);
    assert_eq!(buffer[0], 42);
}

#[test]
fn test_half_full_threshold() {
    let fifo = SampleFifo::<1024>::new();
    for _ in 0..511 {
        fifo.push(0);
    }
    assert!(!fifo.is_at_least_half_full());

    fifo.push(0);
    assert!(fifo.is_at_least_half_full());
}

#[test]
fn test_random_sequences_match_model() {
    const N: usize = 64;
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let fifo = SampleFifo::<N>::new();
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut model_overruns = 0;
        let mut overruns = 0;

        for _ in 0..500 {
            if rng.gen_bool(0.55) {
                let value: u8 = rng.gen();
                if model.len() == N {
                    model.pop_front();
                    model_overruns += 1;
                }
                model.push_back(value);
                if fifo.push(value) == Push::Overran {
                    overruns += 1;
                }
            } else {
                let len = rng.gen_range(0..=N + 4);
                let mut buffer = vec![0u8; len];
                let popped = fifo.pop_into(&mut buffer);

                let expected: Vec<u8> = model.drain(..len.min(model.len())).collect();
                assert_eq!(&buffer[..popped], &expected[..]);
            }

            assert_eq!(fifo.level(), model.len());
        }

        assert_eq!(overruns, model_overruns);
    }
}
