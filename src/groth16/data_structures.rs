use crate::serialization::{canonical, canonical_vec};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// A proof in the Groth16 SNARK.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct Proof<E: Pairing> {
    /// The `A` element in `G1`.
    #[serde(with = "canonical")]
    pub a: E::G1Affine,
    /// The `B` element in `G2`.
    #[serde(with = "canonical")]
    pub b: E::G2Affine,
    /// The `C` element in `G1`.
    #[serde(with = "canonical")]
    pub c: E::G1Affine,
}

////////////////////////////////////////////////////////////////////////////////

/// A verification key in the Groth16 SNARK.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct VerifyingKey<E: Pairing> {
    /// The `alpha * G`, where `G` is the generator of `E::G1`.
    #[serde(with = "canonical")]
    pub alpha_g1: E::G1Affine,
    /// The `alpha * H`, where `H` is the generator of `E::G2`.
    #[serde(with = "canonical")]
    pub beta_g2: E::G2Affine,
    /// The `gamma * H`, where `H` is the generator of `E::G2`.
    #[serde(with = "canonical")]
    pub gamma_g2: E::G2Affine,
    /// The `delta * H`, where `H` is the generator of `E::G2`.
    #[serde(with = "canonical")]
    pub delta_g2: E::G2Affine,
    /// `(beta * a_i(tau) + alpha * b_i(tau) + c_i(tau)) / gamma` for the
    /// constant wire and every public input wire.
    #[serde(with = "canonical_vec")]
    pub gamma_abc_g1: Vec<E::G1Affine>,
}

/// Preprocessed verification key parameters that enable faster verification
/// at the expense of larger size in memory.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct PreparedVerifyingKey<E: Pairing> {
    /// The unprepared verification key.
    pub vk: VerifyingKey<E>,
    /// The element `e(alpha * G, beta * H)` in `E::GT`.
    pub alpha_g1_beta_g2: PairingOutput<E>,
    /// The element `- gamma * H` in `E::G2`, prepared for use in pairings.
    pub gamma_g2_neg_pc: E::G2Prepared,
    /// The element `- delta * H` in `E::G2`, prepared for use in pairings.
    pub delta_g2_neg_pc: E::G2Prepared,
}

impl<E: Pairing> From<PreparedVerifyingKey<E>> for VerifyingKey<E> {
    fn from(other: PreparedVerifyingKey<E>) -> Self {
        other.vk
    }
}

impl<E: Pairing> From<VerifyingKey<E>> for PreparedVerifyingKey<E> {
    fn from(other: VerifyingKey<E>) -> Self {
        crate::groth16::prepare_verifying_key(&other)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// The prover key for the Groth16 SNARK.
#[derive(Derivative, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
#[serde(bound = "")]
pub struct ProvingKey<E: Pairing> {
    /// The underlying verification key.
    pub vk: VerifyingKey<E>,
    /// The element `beta * G` in `E::G1`.
    #[serde(with = "canonical")]
    pub beta_g1: E::G1Affine,
    /// The element `delta * G` in `E::G1`.
    #[serde(with = "canonical")]
    pub delta_g1: E::G1Affine,
    /// `a_i(tau) * G` for every wire.
    #[serde(with = "canonical_vec")]
    pub a_query: Vec<E::G1Affine>,
    /// `b_i(tau) * G` for every wire.
    #[serde(with = "canonical_vec")]
    pub b_g1_query: Vec<E::G1Affine>,
    /// `b_i(tau) * H` for every wire.
    #[serde(with = "canonical_vec")]
    pub b_g2_query: Vec<E::G2Affine>,
    /// `tau^i * Z(tau) / delta * G` for `i` in `0..m`.
    #[serde(with = "canonical_vec")]
    pub h_query: Vec<E::G1Affine>,
    /// `(beta * a_i(tau) + alpha * b_i(tau) + c_i(tau)) / delta * G` for
    /// every private wire.
    #[serde(with = "canonical_vec")]
    pub l_query: Vec<E::G1Affine>,
}

impl<E: Pairing> ProvingKey<E> {
    pub fn num_wires(&self) -> usize {
        self.a_query.len()
    }

    /// Public inputs plus the constant wire.
    pub fn num_instance_variables(&self) -> usize {
        self.vk.gamma_abc_g1.len()
    }
}
