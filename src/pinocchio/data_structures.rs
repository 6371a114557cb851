use crate::serialization::{canonical, canonical_vec};
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// A proof in the original QAP SNARK: a knowledge-of-exponent pair for each
/// of `A`, `B` and `C`, the consistency term `K` and the quotient `H`.
///
/// `A`, `B`, `C` and `K` cover the private wires only. The verifier adds the
/// public part of `A`, `B` and `C` from the input commitments of its key.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct Proof<E: Pairing> {
    /// `rho_a * A_mid(tau)`.
    #[serde(with = "canonical")]
    pub a: E::G1Affine,
    #[serde(with = "canonical")]
    pub a_prime: E::G1Affine,
    #[serde(with = "canonical")]
    pub b: E::G2Affine,
    #[serde(with = "canonical")]
    pub b_prime: E::G1Affine,
    #[serde(with = "canonical")]
    pub c: E::G1Affine,
    #[serde(with = "canonical")]
    pub c_prime: E::G1Affine,
    #[serde(with = "canonical")]
    pub k: E::G1Affine,
    #[serde(with = "canonical")]
    pub h: E::G1Affine,
}

////////////////////////////////////////////////////////////////////////////////

/// A verification key in the original QAP SNARK.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct VerifyingKey<E: Pairing> {
    /// The generator `H` of `E::G2` used by the setup.
    #[serde(with = "canonical")]
    pub g2: E::G2Affine,
    /// `k_a * H`.
    #[serde(with = "canonical")]
    pub a_g2: E::G2Affine,
    /// `k_b * G`.
    #[serde(with = "canonical")]
    pub b_g1: E::G1Affine,
    /// `k_c * H`.
    #[serde(with = "canonical")]
    pub c_g2: E::G2Affine,
    /// `k_gamma * H`.
    #[serde(with = "canonical")]
    pub gamma_g2: E::G2Affine,
    /// `k_beta * k_gamma * G`.
    #[serde(with = "canonical")]
    pub beta_gamma_g1: E::G1Affine,
    /// `k_beta * k_gamma * H`.
    #[serde(with = "canonical")]
    pub beta_gamma_g2: E::G2Affine,
    /// `rho_c * Z(tau) * H`.
    #[serde(with = "canonical")]
    pub z_g2: E::G2Affine,
    /// `rho_a * a_i(tau) * G` for the constant wire and every public input.
    #[serde(with = "canonical_vec")]
    pub ic_a: Vec<E::G1Affine>,
    /// `rho_b * b_i(tau) * H`, same wires.
    #[serde(with = "canonical_vec")]
    pub ic_b: Vec<E::G2Affine>,
    /// `rho_c * c_i(tau) * G`, same wires.
    #[serde(with = "canonical_vec")]
    pub ic_c: Vec<E::G1Affine>,
}

impl<E: Pairing> VerifyingKey<E> {
    /// Public inputs plus the constant wire.
    pub fn num_instance_variables(&self) -> usize {
        self.ic_a.len()
    }
}

/// Multiples of `Z(tau)` that let the prover add `delta * Z(x)` to each of
/// `A(x)`, `B(x)` and `C(x)` without learning `tau`.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct BlindingBases<E: Pairing> {
    #[serde(with = "canonical")]
    pub a: E::G1Affine,
    #[serde(with = "canonical")]
    pub a_prime: E::G1Affine,
    #[serde(with = "canonical")]
    pub b: E::G2Affine,
    #[serde(with = "canonical")]
    pub b_prime: E::G1Affine,
    #[serde(with = "canonical")]
    pub c: E::G1Affine,
    #[serde(with = "canonical")]
    pub c_prime: E::G1Affine,
    /// `k_beta * rho_a * Z(tau) * G`, and likewise for `b` and `c`.
    #[serde(with = "canonical")]
    pub k_a: E::G1Affine,
    #[serde(with = "canonical")]
    pub k_b: E::G1Affine,
    #[serde(with = "canonical")]
    pub k_c: E::G1Affine,
}

////////////////////////////////////////////////////////////////////////////////

/// The prover key for the original QAP SNARK. The wire queries cover the
/// private wires, starting after the constant and the public inputs.
/// `h_query` holds `tau^i * G` for `i` in `0..=m`.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct ProvingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    #[serde(with = "canonical_vec")]
    pub a_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub a_prime_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub b_query: Vec<E::G2Affine>,
    #[serde(with = "canonical_vec")]
    pub b_prime_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub c_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub c_prime_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub k_query: Vec<E::G1Affine>,
    #[serde(with = "canonical_vec")]
    pub h_query: Vec<E::G1Affine>,
    pub blinding: BlindingBases<E>,
}

impl<E: Pairing> ProvingKey<E> {
    pub fn num_wires(&self) -> usize {
        self.num_instance_variables() + self.a_query.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.h_query.len().saturating_sub(1)
    }

    /// Public inputs plus the constant wire.
    pub fn num_instance_variables(&self) -> usize {
        self.vk.num_instance_variables()
    }
}
