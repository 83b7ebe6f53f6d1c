
use crate::branch::Outcome;
use crate::fold::*;
use crate::history::*;
use crate::predictor::*;

/// A base component in the TAGE predictor.
///
/// The base component is untagged and indexed directly by the low bits of
/// the program counter, so it always "hits".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TageBaseComponent {
    pub cfg: TageBaseConfig,

    /// A table of saturating counters
    pub data: CounterTable<CounterState3>,
}
impl TageBaseComponent {
    pub fn new(cfg: TageBaseConfig) -> Self {
        Self {
            data: CounterTable::new(cfg.index_bits),
            cfg,
        }
    }

    /// Given some program counter value, return the corresponding index.
    pub fn get_index(&self, pc: u32) -> usize {
        pc as usize & self.data.index_mask()
    }

    /// Get the current predicted outcome for some entry.
    pub fn predict(&self, idx: usize) -> Outcome {
        self.data.predict(idx)
    }

    /// Update the saturating counter for some entry.
    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        self.data.update(idx, outcome);
    }
}

/// A 2-bit saturating 'useful' counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Usefulness(u8);
impl Usefulness {
    pub const MAX: u8 = 0b11;
    const MSB: u8 = 0b10;
    const LSB: u8 = 0b01;

    /// Create a counter with some value (clamped to [Usefulness::MAX]).
    pub fn new(val: u8) -> Self {
        Self(val.min(Self::MAX))
    }

    pub fn value(&self) -> u8 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }

    /// Increment the counter (saturating).
    pub fn increment(&mut self) {
        self.0 = (self.0 + 1).min(Self::MAX);
    }

    /// Decrement the counter (saturating at zero).
    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    /// Clear the most-significant bit.
    pub fn clear_msb(&mut self) {
        self.0 &= !Self::MSB;
    }

    /// Clear the least-significant bit.
    pub fn clear_lsb(&mut self) {
        self.0 &= !Self::LSB;
    }
}

/// An entry in some [TageComponent].
///
/// An entry with a zero 'useful' counter may be claimed by a new branch,
/// whatever its tag currently holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TageEntry {
    /// State machine tracking a branch outcome
    pub ctr: CounterState3,

    /// Tag associated with this entry
    pub tag: u16,

    /// The 'useful' counter, used to determine when the entry is
    /// eligible to be replaced
    pub useful: Usefulness,
}
impl TageEntry {
    /// Get the current predicted outcome.
    pub fn predict(&self) -> Outcome {
        self.ctr.predict()
    }

    /// Update the saturating counter associated with this entry.
    pub fn update(&mut self, outcome: Outcome) {
        self.ctr = self.ctr.update(outcome);
    }

    /// Returns true if the provided tag matches this entry.
    pub fn tag_matches(&self, tag: u16) -> bool {
        self.tag == tag
    }

    /// Returns true if this entry looks like it was just allocated: it has
    /// never been useful and its counter has not moved.
    pub fn is_fresh(&self) -> bool {
        self.useful.is_zero() && self.ctr == CounterState3::INIT
    }

    /// Hand this entry over to a new branch.
    pub fn allocate(&mut self, tag: u16) {
        self.ctr = CounterState3::INIT;
        self.tag = tag;
        self.useful = Usefulness::default();
    }
}

/// A tagged component in the TAGE predictor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TageComponent {
    pub cfg: TageComponentConfig,

    /// Table of entries
    pub data: Vec<TageEntry>,
}
impl TageComponent {
    pub fn new(cfg: TageComponentConfig) -> Self {
        Self {
            data: vec![TageEntry::default(); 1 << cfg.index_bits],
            cfg,
        }
    }

    /// Given a program counter value and global history, return the
    /// corresponding index into the table.
    pub fn get_index(&self, pc: u32, ghr: &HistoryRegister) -> usize {
        let bits = self.cfg.index_bits;
        let pc_bits = fold_pc_index(pc, bits);
        let ghr_bits = fold_index(ghr.bits(self.cfg.history_len), bits);
        (pc_bits ^ ghr_bits) & self.index_mask()
    }

    /// Given a program counter value and global history, return the
    /// corresponding tag.
    pub fn get_tag(&self, pc: u32, ghr: &HistoryRegister) -> u16 {
        let bits = self.cfg.tag_bits;
        let pc_bits = fold_pc_tag(pc, bits);
        let ghr_bits = fold_history_tag(ghr.bits(self.cfg.history_len), bits);
        let mask = (1 << bits) - 1;
        ((pc_bits ^ ghr_bits) & mask) as u16
    }

    /// Returns the number of entries with a nonzero 'useful' counter.
    pub fn num_useful_entries(&self) -> usize {
        self.data.iter().filter(|e| !e.useful.is_zero()).count()
    }

    /// Clear the most-significant bit of every 'useful' counter.
    pub fn clear_useful_msb(&mut self) {
        for entry in self.data.iter_mut() {
            entry.useful.clear_msb();
        }
    }

    /// Clear the least-significant bit of every 'useful' counter.
    pub fn clear_useful_lsb(&mut self) {
        for entry in self.data.iter_mut() {
            entry.useful.clear_lsb();
        }
    }
}

impl PredictorTable for TageComponent {
    type Entry = TageEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_entry(&self, idx: usize) -> &TageEntry {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut TageEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
