//! Polynomials, evaluation domains and polynomial commitments.

/// Module for polynomials over prime fields and FFT-based basis conversion.
pub mod field_polynomial;

/// Module for the KZG polynomial commitment scheme.
pub mod kzg_poly_com;

/// Module for the polynomial commitment scheme abstraction.
pub mod pcs;

/// Module for commitment-related transcript extensions.
pub mod transcript;
