//! A toolchain for pairing-based zkSNARKs over quadratic arithmetic programs.
//!
//! A rank-1 constraint system is reduced to a QAP by interpolating its
//! columns, a witness is combined with the QAP into `A(x)`, `B(x)`, `C(x)`
//! and the quotient `H(x)`, and two protocols are built on top:
//! the original protocol of [`PGHR13`] and [`Groth16`].
//!
//! [`PGHR13`]: https://eprint.iacr.org/2013/279.pdf
//! [`Groth16`]: https://eprint.iacr.org/2016/260.pdf
#![warn(unused, future_incompatible, nonstandard_style, rust_2018_idioms)]
#![allow(clippy::many_single_char_names, clippy::op_ref)]
#![forbid(unsafe_code)]

/// Dense univariate polynomials over a field.
pub mod poly;

/// Rank-1 constraint systems and their witnesses.
pub mod r1cs;

/// JSON circuit descriptions over named signals.
pub mod circuit;

/// Reduce an R1CS instance to a *Quadratic Arithmetic Program* instance.
pub mod r1cs_to_qap;

/// The interface shared by both protocols.
pub mod snark;

/// The original QAP SNARK.
pub mod pinocchio;

/// The Groth16 zkSNARK.
pub mod groth16;

/// `serde` adapters for field and group elements.
pub mod serialization;

pub mod error;

pub type Result<T> = core::result::Result<T, error::Error>;


pub use self::{
    circuit::{CircuitDescription, CompiledCircuit},
    error::Error,
    groth16::Groth16,
    pinocchio::Pinocchio,
    poly::FieldPolynomial,
    r1cs::{ConstraintMatrix, R1cs, Witness},
    r1cs_to_qap::{CombinedPolynomials, Qap, R1CStoQAP},
    snark::{PreparedCircuit, Protocol, QapSnark},
};
