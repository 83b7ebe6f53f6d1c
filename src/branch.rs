//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1
}

impl Outcome {
    pub fn from_bool(b: bool) -> Self {
        match b {
            true => Self::T,
            false => Self::N,
        }
    }

    /// Returns 'true' if this outcome is 'taken'.
    pub fn is_taken(self) -> bool {
        matches!(self, Self::T)
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        Self::from_bool(x)
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        x.is_taken()
    }
}

/// Properties of a retired control-flow instruction, as reported by the
/// simulator.
///
/// Only the conditional bit matters to direction prediction. The others are
/// carried so that a harness can pass its records through unchanged.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchFlags(pub u32);
impl BranchFlags {
    pub const BRN_FLAG: u32  = (1 << 0);
    pub const CALL_FLAG: u32 = (1 << 1);
    pub const RET_FLAG: u32  = (1 << 2);
    pub const IND_FLAG: u32  = (1 << 3);

    /// Flags for a direct conditional branch.
    pub const fn conditional() -> Self {
        Self(Self::BRN_FLAG)
    }

    pub const fn new(conditional: bool, call: bool, ret: bool, direct: bool)
        -> Self
    {
        let mut bits = 0;
        if conditional { bits |= Self::BRN_FLAG; }
        if call { bits |= Self::CALL_FLAG; }
        if ret { bits |= Self::RET_FLAG; }
        if !direct { bits |= Self::IND_FLAG; }
        Self(bits)
    }

    pub fn is_conditional(&self) -> bool { self.0 & Self::BRN_FLAG != 0 }
    pub fn is_call(&self) -> bool { self.0 & Self::CALL_FLAG != 0 }
    pub fn is_ret(&self) -> bool { self.0 & Self::RET_FLAG != 0 }
    pub fn is_direct(&self) -> bool { self.0 & Self::IND_FLAG == 0 }
    pub fn is_indirect(&self) -> bool { self.0 & Self::IND_FLAG != 0 }
}

/// A record of branch execution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: u32,

    /// The target address evaluated for this branch
    pub tgt: u32,

    /// The resolved direction of this branch
    pub outcome: Outcome,

    pub flags: BranchFlags,
}
impl BranchRecord {
    pub fn new(pc: u32, tgt: u32, outcome: Outcome, flags: BranchFlags)
        -> Self
    {
        Self { pc, tgt, outcome, flags }
    }

    /// A direct conditional branch.
    pub fn conditional(pc: u32, tgt: u32, outcome: Outcome) -> Self {
        Self::new(pc, tgt, outcome, BranchFlags::conditional())
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.flags.is_conditional()
    }

    /// Returns 'true' if this is an unconditional instruction.
    pub fn is_unconditional(&self) -> bool {
        !self.flags.is_conditional()
    }

    /// Returns 'true' if this is a "call" or "return".
    pub fn is_procedural(&self) -> bool {
        self.flags.is_call() || self.flags.is_ret()
    }
}
