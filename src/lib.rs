//! Reference-point-guided many-objective optimization.
//!
//! Provides a generic implementation of **NSGA-III** for continuous
//! decision vectors:
//!
//! - **Fast non-dominated sorting** partitions a population into Pareto fronts.
//! - **Das-Dennis reference points** fix a lattice of directions on the
//!   objective simplex.
//! - **Niching environmental selection** keeps survivors spread across
//!   those directions.
//! - **Binary tournament** mating with pluggable crossover and mutation.
//!
//! # Architecture
//!
//! The engine owns no global state: every run creates its own seeded
//! generator and discards all intermediate structures when it returns.
//! Objective functions, crossover and mutation are supplied by the caller
//! through [`nsga3::Nsga3Problem`]. Benchmark problems and quality
//! indicators live with the consumers.

pub mod error;
pub mod nsga3;
pub mod random;

pub use error::{Nsga3Error, Result};
