//! The [`Groth16`] zkSNARK over an explicit QAP.
//!
//! [`Groth16`]: https://eprint.iacr.org/2016/260.pdf
use crate::{
    r1cs::Witness,
    r1cs_to_qap::{CombinedPolynomials, Qap},
    snark::{Protocol, QapSnark},
    Result,
};
use ark_ec::pairing::Pairing;
use ark_std::{marker::PhantomData, rand::Rng};

/// Data structures used by the prover, verifier, and generator.
pub mod data_structures;

/// Generate public parameters for the Groth16 zkSNARK construction.
pub mod generator;

/// Create proofs for the Groth16 zkSNARK construction.
pub mod prover;

/// Verify proofs for the Groth16 zkSNARK construction.
pub mod verifier;

pub use self::data_structures::*;
pub use self::{generator::*, prover::*, verifier::*};

/// The Groth16 protocol, instantiated over the pairing `E`.
pub struct Groth16<E: Pairing> {
    _p: PhantomData<E>,
}

impl<E: Pairing> QapSnark<E> for Groth16<E> {
    type ProvingKey = ProvingKey<E>;
    type VerifyingKey = VerifyingKey<E>;
    type Proof = Proof<E>;

    const PROTOCOL: Protocol = Protocol::Groth16;

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
        create_random_proof(pk, witness, &combined.h, rng)
    }

    fn verify_proof(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[E::ScalarField],
    ) -> Result<bool> {
        verifier::verify_proof(&prepare_verifying_key(vk), proof, public_inputs)
    }
}
