use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use thiserror::Error;

/// Failures of the polynomial engine and of field inversion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgebraicError {
    #[error("division by the zero polynomial")]
    DivisionByZero,
    #[error("attempted to invert the additive identity")]
    ZeroInverse,
}

/// Circuit, witness or key data whose shape does not fit together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("circuit has no constraints")]
    EmptyCircuit,
    #[error("matrices disagree on the number of constraints: A={a}, B={b}, C={c}")]
    ConstraintCountMismatch { a: usize, b: usize, c: usize },
    #[error("row {row} of matrix {matrix} has {found} entries, expected {expected}")]
    RowLength {
        matrix: char,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{public} public and {private} private inputs do not fit in {wires} wires")]
    InputLayout {
        public: usize,
        private: usize,
        wires: usize,
    },
    #[error("witness has {found} values, circuit has {expected} wires")]
    WitnessLength { expected: usize, found: usize },
    #[error("expected {expected} {kind} inputs, got {found}")]
    InputCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("quotient polynomial has {found} coefficients, the key supports {supported}")]
    QuotientDegree { supported: usize, found: usize },
    #[error("verifying key is malformed: {0}")]
    MalformedVerifyingKey(&'static str),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// `P(x) = A(x)B(x) - C(x)` is not divisible by `Z(x)`.
    #[error("invalid witness: P(x) mod Z(x) is non-zero (remainder degree {remainder_degree})")]
    InvalidWitness { remainder_degree: usize },

    #[error("algebraic error: {0}")]
    Algebraic(#[from] AlgebraicError),

    #[error("circuit is unsatisfiable: no constraint determines wire {wire}")]
    Unsatisfiable { wire: usize },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("constraint synthesis failed: {0}")]
    Synthesis(SynthesisError),

    #[error("serialization error: {0}")]
    Serialization(SerializationError),
}

impl From<SynthesisError> for Error {
    fn from(e: SynthesisError) -> Self {
        Error::Synthesis(e)
    }
}

impl From<SerializationError> for Error {
    fn from(e: SerializationError) -> Self {
        Error::Serialization(e)
    }
}
