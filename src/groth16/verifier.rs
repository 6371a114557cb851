use super::{PreparedVerifyingKey, Proof, VerifyingKey};
use crate::{error::StructuralError, Result};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};

use core::ops::{AddAssign, Neg};

/// Prepare the verifying key `vk` for use in proof verification.
pub fn prepare_verifying_key<E: Pairing>(vk: &VerifyingKey<E>) -> PreparedVerifyingKey<E> {
    PreparedVerifyingKey {
        vk: vk.clone(),
        alpha_g1_beta_g2: E::pairing(vk.alpha_g1, vk.beta_g2),
        gamma_g2_neg_pc: vk.gamma_g2.into_group().neg().into_affine().into(),
        delta_g2_neg_pc: vk.delta_g2.into_group().neg().into_affine().into(),
    }
}

/// Prepare proof inputs for use with [`verify_proof_with_prepared_inputs`], wrt the prepared
/// verification key `pvk` and instance public inputs.
pub fn prepare_inputs<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    public_inputs: &[E::ScalarField],
) -> Result<E::G1> {
    let (constant, bases) = pvk
        .vk
        .gamma_abc_g1
        .split_first()
        .ok_or(StructuralError::MalformedVerifyingKey("missing constant term of the input commitment"))?;
    if public_inputs.len() != bases.len() {
        return Err(StructuralError::InputCount {
            kind: "public",
            expected: bases.len(),
            found: public_inputs.len(),
        }
        .into());
    }

    let mut g_ic = constant.into_group();
    g_ic.add_assign(&<E::G1 as VariableBaseMSM>::msm_unchecked(bases, public_inputs));

    Ok(g_ic)
}

/// Verify a Groth16 proof `proof` against the prepared verification key `pvk` and prepared public
/// inputs. This should be used when the same set of public inputs is used to verify many proofs.
pub fn verify_proof_with_prepared_inputs<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    proof: &Proof<E>,
    prepared_inputs: &E::G1,
) -> Result<bool> {
    let qap = E::multi_miller_loop(
        [proof.a, prepared_inputs.into_affine(), proof.c],
        [
            proof.b.into(),
            pvk.gamma_g2_neg_pc.clone(),
            pvk.delta_g2_neg_pc.clone(),
        ],
    );

    // a non-invertible Miller loop output never equals e(alpha, beta)
    let verified = E::final_exponentiation(qap).map_or(false, |test| test == pvk.alpha_g1_beta_g2);
    tracing::debug!(verified, "Groth16 pairing check");
    Ok(verified)
}

/// Verify a Groth16 proof `proof` against the prepared verification key `pvk`,
/// with respect to the instance `public_inputs`.
#[tracing::instrument(skip_all, name = "Groth16::verify_proof")]
pub fn verify_proof<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    proof: &Proof<E>,
    public_inputs: &[E::ScalarField],
) -> Result<bool> {
    let prepared_inputs = prepare_inputs(pvk, public_inputs)?;
    verify_proof_with_prepared_inputs(pvk, proof, &prepared_inputs)
}
