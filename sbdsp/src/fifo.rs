//! Lock-free sample FIFO between the DMA completion interrupt (producer)
//! and the audio callback (consumer).
//!
//! Indices are free running and masked on access, so a full FIFO holds all
//! `N` bytes. The tail is only written by the producer and the head only by
//! the consumer.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Push {
    Stored,
    /// The FIFO was full. The byte was stored over the oldest one.
    Overran,
}

pub struct SampleFifo<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl<const N: usize> SampleFifo<N> {
    const MASK: usize = N - 1;

    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "FIFO size must be a power of 2") };

        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of buffered bytes, never more than `N`.
    #[inline]
    pub fn level(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head).min(N)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.level() == 0
    }

    #[inline]
    pub fn is_at_least_half_full(&self) -> bool {
        self.level() >= N / 2
    }

    /// Producer side. Never blocks: a full FIFO loses its oldest byte.
    #[inline]
    pub fn push(&self, byte: u8) -> Push {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        let overran = tail.wrapping_sub(head) >= N;

        self.slots[tail & Self::MASK].store(byte, Ordering::Relaxed);
        self.tail.store(tail.wrapping_add(1), Ordering::Release);

        if overran {
            Push::Overran
        } else {
            Push::Stored
        }
    }

    /// Consumer side. Copies up to `buffer.len()` bytes and returns how many
    /// were copied.
    pub fn pop_into(&self, buffer: &mut [u8]) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let mut head = self.head.load(Ordering::Relaxed);

        // Skip whatever the producer wrote over.
        if tail.wrapping_sub(head) > N {
            head = tail.wrapping_sub(N);
        }

        let level = tail.wrapping_sub(head);
        let len = level.min(buffer.len());
        if len == 0 {
            return 0;
        }

        let start = head & Self::MASK;
        let first = len.min(N - start);
        let (front, back) = buffer[..len].split_at_mut(first);

        for (out, slot) in front.iter_mut().zip(&self.slots[start..start + first]) {
            *out = slot.load(Ordering::Relaxed);
        }
        for (out, slot) in back.iter_mut().zip(&self.slots[..len - first]) {
            *out = slot.load(Ordering::Relaxed);
        }

        self.head.store(head.wrapping_add(len), Ordering::Release);
        len
    }

    /// Consumer side. Drops everything buffered so far.
    pub fn clear(&self) {
        let tail = self.tail.load(Ordering::Acquire);
        self.head.store(tail, Ordering::Release);
    }
}

impl<const N: usize> Default for SampleFifo<N> {
    fn default() -> Self {
        Self::new()
    }
}
