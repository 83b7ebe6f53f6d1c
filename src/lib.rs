//! Direction predictors for conditional branches.
//!
//! A simulator asks a [`Predictor`] for a guess with [`Predictor::predict`]
//! before a branch resolves, and hands it the resolved [`BranchRecord`] with
//! [`Predictor::train`] afterwards. The active scheme is picked once, at
//! configuration time, from a [`PredictorConfig`].

#![allow(unused_parens)]

pub mod branch;
pub mod config;
pub mod error;
pub mod fold;
pub mod history;
pub mod predictor;

pub use branch::*;
pub use config::*;
pub use error::*;
pub use history::*;
pub use predictor::*;
