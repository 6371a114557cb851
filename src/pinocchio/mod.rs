//! The original QAP-based SNARK of [PGHR13] ("Pinocchio"), with the
//! zero-knowledge blinding of `A`, `B` and `C` by multiples of `Z(x)`.
//!
//! [PGHR13]: https://eprint.iacr.org/2013/279.pdf
use crate::{
    r1cs::Witness,
    r1cs_to_qap::{CombinedPolynomials, Qap},
    snark::{Protocol, QapSnark},
    Result,
};
use ark_ec::pairing::Pairing;
use ark_std::{marker::PhantomData, rand::Rng};

pub mod data_structures;

/// Generate public parameters for the original protocol.
pub mod generator;

/// Create blinded proofs for the original protocol.
pub mod prover;

/// The five pairing checks of the original protocol.
pub mod verifier;

pub use self::data_structures::*;
pub use self::{generator::*, prover::*, verifier::*};

/// The original protocol, instantiated over the pairing `E`.
pub struct Pinocchio<E: Pairing> {
    _p: PhantomData<E>,
}

impl<E: Pairing> QapSnark<E> for Pinocchio<E> {
    type ProvingKey = ProvingKey<E>;
    type VerifyingKey = VerifyingKey<E>;
    type Proof = Proof<E>;

    const PROTOCOL: Protocol = Protocol::Original;

    fn generate_setup<R: Rng>(
        qap: &Qap<E::ScalarField>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey)> {
        let pk = generate_random_parameters::<E, R>(qap, rng)?;
        let vk = pk.vk.clone();
        Ok((pk, vk))
    }

    fn generate_proof<R: Rng>(
        pk: &Self::ProvingKey,
        witness: &Witness<E::ScalarField>,
        combined: &CombinedPolynomials<E::ScalarField>,
        rng: &mut R,
    ) -> Result<Self::Proof> {
        create_random_proof(pk, witness, combined, rng)
    }

    fn verify_proof(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[E::ScalarField],
    ) -> Result<bool> {
        verifier::verify_proof(vk, proof, public_inputs)
    }
}
