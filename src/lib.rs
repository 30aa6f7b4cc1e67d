//! A PLONK argument prover for circuits given as a sparse rank-1 constraint
//! system (SR1CS).
//!
//! The crate is split into two layers. [`poly_commit`] carries the polynomial
//! arithmetic (FFT-based basis conversion, evaluation domains) and the
//! polynomial commitment scheme abstraction with a KZG instantiation.
//! [`plonk`] carries the protocol itself: the constraint system, the indexer
//! that preprocesses a circuit into the prover's public reference, and the
//! round-by-round prover.

#![allow(clippy::upper_case_acronyms)]

/// Module for error handling.
pub mod errors;

/// Module for the PLONK protocol.
pub mod plonk;

/// Module for polynomials and polynomial commitments.
pub mod poly_commit;
