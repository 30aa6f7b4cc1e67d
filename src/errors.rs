use noah_algebra::errors::AlgebraError;
use std::{error, fmt};

/// The `Result` type used throughout the crate.
pub type Result<T> = core::result::Result<T, PlonkError>;

/// Errors emitted by the prover and its supporting layers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlonkError {
    /// An error bubbled up from the algebra layer.
    Algebra(AlgebraError),
    /// No multiplicative subgroup of the requested order exists.
    GroupNotFound(usize),
    /// The witness does not satisfy the constraint system.
    ProofErrorInvalidWitness,
    /// The polynomial commitment scheme rejected a polynomial.
    CommitmentError,
    /// Error occurred during preprocessing.
    SetupError,
    /// A permutation denominator factor was zero.
    DivisionByZero,
    /// Function parameters are inconsistent.
    FuncParamsError,
    /// Challenges were derived or stored out of order.
    ChallengeError,
    /// The commitment scheme failed to open a polynomial.
    PCSProveEvalError,
    /// The degree of the polynomial is higher than the maximum degree supported.
    DegreeError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            GroupNotFound(n) => write!(f, "No group of order {} found.", n),
            ProofErrorInvalidWitness => f.write_str("Witness does not satisfy the constraints."),
            CommitmentError => f.write_str("Commitment error."),
            SetupError => f.write_str("Setup error."),
            DivisionByZero => f.write_str("Division by zero."),
            FuncParamsError => f.write_str("Function params error."),
            ChallengeError => f.write_str("Challenge error."),
            PCSProveEvalError => f.write_str("Cannot compute the opening proof."),
            DegreeError => {
                f.write_str("The degree of the polynomial is higher than the maximum supported.")
            }
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

impl From<Box<dyn noah_algebra::prelude::RucError>> for PlonkError {
    fn from(_e: Box<dyn noah_algebra::prelude::RucError>) -> PlonkError {
        PlonkError::DivisionByZero
    }
}
