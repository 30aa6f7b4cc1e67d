//! The PLONK protocol over a sparse rank-1 constraint system.

/// Module for the constraint system.
pub mod constraint_system;

/// Module for help functions.
pub(crate) mod helpers;

/// Module for the indexer.
pub mod indexer;

/// Module for the prover.
pub mod prover;

/// Module for the transcript.
pub(crate) mod transcript;
