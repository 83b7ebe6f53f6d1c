//! Errors reported while configuring a predictor.

use thiserror::Error;

/// A configuration that cannot be turned into a working predictor.
///
/// Every table and register is sized once, at configuration time, so these
/// are the only failures a predictor can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{what}: table index width must be at least 1 bit")]
    ZeroIndexWidth { what: &'static str },

    #[error("{what}: {bits}-bit table index exceeds the {max}-bit limit")]
    TableTooLarge { what: &'static str, bits: usize, max: usize },

    #[error("{what}: history length must be at least 1 bit")]
    ZeroHistoryLength { what: &'static str },

    #[error("tagged component {component}: {bits}-bit tags are too narrow (minimum {min})")]
    TagTooNarrow { component: usize, bits: usize, min: usize },

    #[error("tagged component {component}: {bits}-bit tags exceed the {max}-bit limit")]
    TagTooWide { component: usize, bits: usize, max: usize },

    #[error("tagged predictor needs at least one tagged component")]
    NoTaggedComponents,

    #[error("tagged components must have distinct history lengths ({0} is repeated)")]
    DuplicateHistoryLength(usize),

    #[error("usefulness reset period must be at least 2 training calls (got {0})")]
    ResetPeriodTooShort(u64),
}
