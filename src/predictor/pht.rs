//! Implementations of a pattern history table (PHT).

use log::debug;

use crate::branch::Outcome;
use crate::predictor::*;
use crate::predictor::counter::*;

/// A dense table of counters with a power-of-two number of entries.
///
/// Every index is masked on the way in, so any `usize` is a valid index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterTable<C> {
    /// Table of counters
    data: Vec<C>,

    /// Number of index bits
    index_bits: usize,
}
impl <C: Ladder + Default> CounterTable<C> {
    /// Create a table of `1 << index_bits` counters in their default state.
    pub fn new(index_bits: usize) -> Self {
        let size = 1usize << index_bits;
        debug!("allocating {} x {:?}", size, C::default());
        Self {
            data: vec![C::default(); size],
            index_bits,
        }
    }

    /// Number of bits used to index the table.
    pub fn index_bits(&self) -> usize { self.index_bits }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.data.iter()
    }

    /// Reset every entry to its default state.
    pub fn reset(&mut self) {
        self.data.fill(C::default());
    }
}

impl <C: DirectionCounter> CounterTable<C> {
    /// Return the direction predicted by some entry.
    pub fn predict(&self, idx: usize) -> Outcome {
        self.get_entry(idx).predict()
    }

    /// Move some entry one step towards the given outcome.
    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        let entry = self.get_entry_mut(idx);
        *entry = entry.update(outcome);
    }
}

impl <C> PredictorTable for CounterTable<C> {
    type Entry = C;

    fn size(&self) -> usize { self.data.len() }

    fn get_entry(&self, idx: usize) -> &C {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut C {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_are_masked() {
        let mut t: CounterTable<CounterState2> = CounterTable::new(2);
        assert_eq!(t.size(), 4);
        assert_eq!(t.index_mask(), 0b11);
        t.update(0b101, Outcome::T);
        assert_eq!(*t.get_entry(0b001), CounterState2::WT);
        assert_eq!(t.predict(0b1001), Outcome::T);
        assert_eq!(t.iter().filter(|c| **c == CounterState2::WN).count(), 3);
        t.reset();
        assert!(t.iter().all(|c| *c == CounterState2::WN));
    }
}
