//! Shift registers recording recent branch outcomes.

use bitvec::prelude::*;
use std::ops::RangeInclusive;

use crate::branch::Outcome;

/// A fixed-length register of branch outcomes.
///
/// Bit 0 always holds the most recent outcome. Pushing a new outcome moves
/// every bit one position towards the end of the register, and the oldest
/// bit falls off silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the oldest (index n) and the rightmost bit is
// the newest (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn data(&self) -> &BitSlice<usize, Lsb0> { &self.data }

    /// Clear every bit in the register.
    pub fn clear(&mut self) {
        self.data.fill(false);
    }
}

impl HistoryRegister {
    /// Shift the register by 'n' bits.
    /// The bottom 'n' bits become zero, and the top 'n' bits are discarded.
    pub fn shift_by(&mut self, n: usize) {
        self.data.shift_right(n.min(self.len));
    }

    /// Record a new outcome as the most recent bit.
    pub fn push(&mut self, outcome: Outcome) {
        if self.len == 0 {
            return;
        }
        self.shift_by(1);
        self.data.set(0, outcome.into());
    }

    /// Return some slice of bits.
    pub fn read(&self, range: RangeInclusive<usize>) -> &BitSlice<usize, Lsb0> {
        &self.data[range]
    }

    /// Return the 'n' most recent bits (or the whole register when it is
    /// shorter than 'n').
    pub fn bits(&self, n: usize) -> &BitSlice<usize, Lsb0> {
        &self.data[..n.min(self.len)]
    }

    /// Return the 'n' most recent bits as an integer, with the newest
    /// outcome in the least-significant position.
    ///
    /// Only the low 64 bits can be represented.
    pub fn low_bits(&self, n: usize) -> u64 {
        let slice = self.bits(n.min(u64::BITS as usize));
        if slice.is_empty() {
            0
        } else {
            slice.load_le::<u64>()
        }
    }

    /// Return the whole register as an integer (see [HistoryRegister::low_bits]).
    pub fn value(&self) -> u64 {
        self.low_bits(self.len)
    }
}
