use crate::{
    error::Error,
    r1cs::{R1cs, Witness},
    r1cs_to_qap::{CombinedPolynomials, Qap, R1CStoQAP},
    Result,
};
use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::Rng;
use core::{fmt, str::FromStr};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A pairing-based SNARK over a quadratic arithmetic program.
///
/// Both protocols share the reduction and the witness combination and only
/// differ in the shape of their keys and proofs.
pub trait QapSnark<E: Pairing> {
    type ProvingKey: Clone + CanonicalSerialize + CanonicalDeserialize + Serialize + DeserializeOwned;
    type VerifyingKey: Clone + CanonicalSerialize + CanonicalDeserialize + Serialize + DeserializeOwned;
    type Proof: Clone + CanonicalSerialize + CanonicalDeserialize + Serialize + DeserializeOwned;

    const PROTOCOL: Protocol;

    /// Run the trusted setup for `qap`. The secret scalars sampled here do
    /// not outlive the call.
    fn generate_setup<R: Rng>(
        qap: &Qap<E::ScalarField>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey)>;

    fn generate_proof<R: Rng>(
        pk: &Self::ProvingKey,
        witness: &Witness<E::ScalarField>,
        combined: &CombinedPolynomials<E::ScalarField>,
        rng: &mut R,
    ) -> Result<Self::Proof>;

    /// `Ok(false)` is a rejected proof; `Err` means the inputs do not even
    /// fit the key.
    fn verify_proof(
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[E::ScalarField],
    ) -> Result<bool>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// The original QAP SNARK of Parno, Gentry, Howell and Raykova.
    #[default]
    Original,
    Groth16,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Original => write!(f, "original"),
            Protocol::Groth16 => write!(f, "groth16"),
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "pinocchio" | "pghr13" => Ok(Protocol::Original),
            "groth16" | "groth" => Ok(Protocol::Groth16),
            other => Err(Error::Parse(format!("unknown protocol {other:?}"))),
        }
    }
}

/// A validated R1CS with its QAP, computed once and shared by either
/// protocol.
#[derive(Clone, Debug)]
pub struct PreparedCircuit<F: PrimeField> {
    pub r1cs: R1cs<F>,
    pub qap: Qap<F>,
}

impl<F: PrimeField> PreparedCircuit<F> {
    pub fn new(r1cs: R1cs<F>) -> Result<Self> {
        let qap = R1CStoQAP::instance_map(&r1cs)?;
        Ok(Self { r1cs, qap })
    }

    /// Combine a witness with the QAP, failing with `InvalidWitness` unless
    /// it satisfies every constraint.
    pub fn combine(&self, witness: &Witness<F>) -> Result<CombinedPolynomials<F>> {
        self.r1cs.check_witness_length(witness)?;
        R1CStoQAP::witness_map(&self.qap, witness)
    }

    pub fn setup<E, S, R>(&self, rng: &mut R) -> Result<(S::ProvingKey, S::VerifyingKey)>
    where
        E: Pairing<ScalarField = F>,
        S: QapSnark<E>,
        R: Rng,
    {
        S::generate_setup(&self.qap, rng)
    }

    /// Check the witness and prove.
    pub fn prove<E, S, R>(&self, pk: &S::ProvingKey, witness: &Witness<F>, rng: &mut R) -> Result<S::Proof>
    where
        E: Pairing<ScalarField = F>,
        S: QapSnark<E>,
        R: Rng,
    {
        let combined = self.combine(witness)?;
        S::generate_proof(pk, witness, &combined, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_names_round_trip() {
        for p in [Protocol::Original, Protocol::Groth16] {
            assert_eq!(p.to_string().parse::<Protocol>().unwrap(), p);
        }
        assert_eq!("GROTH16".parse::<Protocol>().unwrap(), Protocol::Groth16);
        assert!("plonk".parse::<Protocol>().is_err());
        assert_eq!(
            serde_json::to_string(&Protocol::Groth16).unwrap(),
            "\"groth16\""
        );
    }
}
