//! Saturating counters used to follow the behavior of a branch.
//!
//! Every counter here is a small closed state machine. The states are listed
//! once, in counting order, and all transitions step along that list. There
//! is no raw integer to corrupt, so there is no invalid state to handle.

use crate::branch::Outcome;

/// A closed set of states arranged as a ladder.
///
/// Moving up or down the ladder is the only transition, and both ends
/// saturate.
pub trait Ladder: Copy + Eq + std::fmt::Debug + 'static {
    /// Every state, from the bottom rung to the top rung.
    const RUNGS: &'static [Self];

    /// Position of this state in [Ladder::RUNGS].
    fn rung(self) -> usize;

    /// Move one rung up (saturating at the top).
    fn raise(self) -> Self {
        let top = Self::RUNGS.len() - 1;
        Self::RUNGS[(self.rung() + 1).min(top)]
    }

    /// Move one rung down (saturating at the bottom).
    fn lower(self) -> Self {
        Self::RUNGS[self.rung().saturating_sub(1)]
    }

    /// Returns 'true' if this state sits in the top half of the ladder.
    fn upper_half(self) -> bool {
        self.rung() >= Self::RUNGS.len() / 2
    }

    /// Returns 'true' if this state is on the top or bottom rung.
    fn is_saturated(self) -> bool {
        let r = self.rung();
        r == 0 || r == Self::RUNGS.len() - 1
    }
}

/// A [Ladder] whose top half predicts 'taken'.
pub trait DirectionCounter: Ladder + Default {
    /// Return the predicted direction.
    fn predict(self) -> Outcome {
        Outcome::from(self.upper_half())
    }

    /// Return the state after observing an outcome.
    fn update(self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::T => self.raise(),
            Outcome::N => self.lower(),
        }
    }
}

/// A 2-bit counter with hysteresis.
///
/// The encodings are not in counting order: a weak state falls back to its
/// matching weak state on the other side before reaching a strong one.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CounterState2 {
    /// Weakly not-taken
    #[default]
    WN = 0,
    /// Strongly not-taken
    SN = 1,
    /// Weakly taken
    WT = 2,
    /// Strongly taken
    ST = 3,
}
impl CounterState2 {
    pub fn encoding(self) -> u8 { self as u8 }
}
impl Ladder for CounterState2 {
    const RUNGS: &'static [Self] = &[Self::SN, Self::WN, Self::WT, Self::ST];
    fn rung(self) -> usize {
        match self {
            Self::SN => 0,
            Self::WN => 1,
            Self::WT => 2,
            Self::ST => 3,
        }
    }
}
impl DirectionCounter for CounterState2 {}

/// A 3-bit symmetric up/down counter.
///
/// `Nxx` states predict not-taken and `Txx` states predict taken; the two
/// suffix bits give the strength, with `N00`/`T00` the weakest.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CounterState3 {
    N11 = 0,
    N10 = 1,
    N01 = 2,
    #[default]
    N00 = 3,
    T00 = 4,
    T01 = 5,
    T10 = 6,
    T11 = 7,
}
impl CounterState3 {
    /// The state a freshly-reset counter starts in (weakly not-taken).
    pub const INIT: Self = Self::N00;

    pub fn encoding(self) -> u8 { self as u8 }
}
impl Ladder for CounterState3 {
    const RUNGS: &'static [Self] = &[
        Self::N11, Self::N10, Self::N01, Self::N00,
        Self::T00, Self::T01, Self::T10, Self::T11,
    ];
    fn rung(self) -> usize { self as usize }
}
impl DirectionCounter for CounterState3 {}

/// Tournament chooser state.
///
/// Raising the state moves it towards the global predictor, lowering it
/// moves it towards the local predictor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChoiceState {
    /// Strongly prefer global
    SGP,
    /// Weakly prefer global
    WGP,
    /// Weakly prefer local
    #[default]
    WLP,
    /// Strongly prefer local
    SLP,
}
impl ChoiceState {
    /// Returns 'true' if the global predictor should be trusted.
    pub fn prefers_global(self) -> bool {
        self.upper_half()
    }

    /// Move one step towards whichever side was right.
    pub fn reward(self, global_was_right: bool) -> Self {
        if global_was_right { self.raise() } else { self.lower() }
    }
}
impl Ladder for ChoiceState {
    const RUNGS: &'static [Self] = &[Self::SLP, Self::WLP, Self::WGP, Self::SGP];
    fn rung(self) -> usize {
        match self {
            Self::SLP => 0,
            Self::WLP => 1,
            Self::WGP => 2,
            Self::SGP => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use CounterState2::*;
    use CounterState3::*;

    #[test]
    fn two_bit_transitions() {
        let cases = [
            (WN, Outcome::T, WT), (WN, Outcome::N, SN),
            (SN, Outcome::T, WN), (SN, Outcome::N, SN),
            (WT, Outcome::T, ST), (WT, Outcome::N, WN),
            (ST, Outcome::T, ST), (ST, Outcome::N, WT),
        ];
        for (from, outcome, to) in cases {
            assert_eq!(from.update(outcome), to, "{:?} on {:?}", from, outcome);
        }
        assert_eq!(CounterState2::default(), WN);
        assert_eq!(WN.predict(), Outcome::N);
        assert_eq!(SN.predict(), Outcome::N);
        assert_eq!(WT.predict(), Outcome::T);
        assert_eq!(ST.predict(), Outcome::T);
    }

    #[test]
    fn three_bit_transitions() {
        assert_eq!(N00.update(Outcome::T), T00);
        assert_eq!(T00.update(Outcome::N), N00);
        assert_eq!(N11.update(Outcome::N), N11);
        assert_eq!(T11.update(Outcome::T), T11);
        assert_eq!(N01.update(Outcome::N), N10);
        for s in CounterState3::RUNGS {
            let expect = Outcome::from(s.encoding() >= 4);
            assert_eq!(s.predict(), expect);
        }
        assert_eq!(CounterState3::default(), CounterState3::INIT);
        assert_eq!(CounterState3::INIT.predict(), Outcome::N);
    }

    #[test]
    fn chooser_moves_one_step_and_saturates() {
        let c = ChoiceState::default();
        assert_eq!(c, ChoiceState::WLP);
        assert!(!c.prefers_global());
        let c = c.reward(true);
        assert_eq!(c, ChoiceState::WGP);
        assert!(c.prefers_global());
        let c = c.reward(true).reward(true);
        assert_eq!(c, ChoiceState::SGP);
        assert!(c.is_saturated());
        let c = c.reward(false).reward(false).reward(false).reward(false);
        assert_eq!(c, ChoiceState::SLP);
    }

    #[test]
    fn rungs_are_consistent() {
        fn check<L: Ladder>() {
            for (i, s) in L::RUNGS.iter().enumerate() {
                assert_eq!(s.rung(), i);
            }
        }
        check::<CounterState2>();
        check::<CounterState3>();
        check::<ChoiceState>();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn counters_stay_in_range(seq in prop::collection::vec(any::<bool>(), 10_000)) {
            let mut c2 = CounterState2::default();
            let mut c3 = CounterState3::default();
            let mut ch = ChoiceState::default();
            for taken in seq {
                c2 = c2.update(Outcome::from(taken));
                c3 = c3.update(Outcome::from(taken));
                ch = ch.reward(taken);
                prop_assert!(c2.encoding() <= 3);
                prop_assert!(c3.encoding() <= 7);
                prop_assert!(ch.rung() <= 3);
            }
        }
    }
}
