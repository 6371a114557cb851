use super::{Proof, VerifyingKey};
use crate::{error::StructuralError, Result};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};

/// The public part of `A`, `B` and `C`: `Σ x_i * ic_i` over the constant
/// wire and the public inputs, for each of the three input commitments.
pub struct PreparedInputs<E: Pairing> {
    pub a: E::G1,
    pub b: E::G2,
    pub c: E::G1,
}

/// `ic_0 + Σ x_i * ic_{i+1}`.
fn commit<G: AffineRepr>(ic: &[G], public_inputs: &[G::ScalarField]) -> Result<G::Group> {
    let (constant, bases) = ic
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

    let mut acc = constant.into_group();
    acc += <G::Group as VariableBaseMSM>::msm_unchecked(bases, public_inputs);
    Ok(acc)
}

pub fn prepare_inputs<E: Pairing>(
    vk: &VerifyingKey<E>,
    public_inputs: &[E::ScalarField],
) -> Result<PreparedInputs<E>> {
    if vk.ic_b.len() != vk.ic_a.len() || vk.ic_c.len() != vk.ic_a.len() {
        return Err(StructuralError::MalformedVerifyingKey("input commitments differ in length").into());
    }
    Ok(PreparedInputs {
        a: commit(&vk.ic_a, public_inputs)?,
        b: commit(&vk.ic_b, public_inputs)?,
        c: commit(&vk.ic_c, public_inputs)?,
    })
}

/// Verify `proof` against `vk` with respect to `public_inputs`.
///
/// With `A*`, `B*`, `C*` the proof terms plus the public parts from
/// [`prepare_inputs`], five pairing equations must hold:
/// 1. `e(A, k_a H) = e(A', H)`
/// 2. `e(k_b G, B) = e(B', H)`
/// 3. `e(C, k_c H) = e(C', H)`
/// 4. `e(A*, B*) = e(H, rho_c Z(tau) H) * e(C*, H)`
/// 5. `e(A + C, k_beta k_gamma H) * e(k_beta k_gamma G, B) = e(K, k_gamma H)`
#[tracing::instrument(skip_all, name = "Pinocchio::verify_proof")]
pub fn verify_proof<E: Pairing>(
    vk: &VerifyingKey<E>,
    proof: &Proof<E>,
    public_inputs: &[E::ScalarField],
) -> Result<bool> {
    let inputs = prepare_inputs(vk, public_inputs)?;
    let full_a = (inputs.a + proof.a).into_affine();
    let full_b = (inputs.b + proof.b).into_affine();
    let full_c = (inputs.c + proof.c).into_affine();
    let a_plus_c = (proof.a.into_group() + proof.c).into_affine();

    let checks = [
        (
            "knowledge of A",
            E::pairing(proof.a, vk.a_g2) == E::pairing(proof.a_prime, vk.g2),
        ),
        (
            "knowledge of B",
            E::pairing(vk.b_g1, proof.b) == E::pairing(proof.b_prime, vk.g2),
        ),
        (
            "knowledge of C",
            E::pairing(proof.c, vk.c_g2) == E::pairing(proof.c_prime, vk.g2),
        ),
        (
            "QAP divisibility",
            E::pairing(full_a, full_b) == E::multi_pairing([proof.h, full_c], [vk.z_g2, vk.g2]),
        ),
        (
            "same coefficients",
            E::multi_pairing([a_plus_c, vk.beta_gamma_g1], [vk.beta_gamma_g2, proof.b])
                == E::pairing(proof.k, vk.gamma_g2),
        ),
    ];

    for (name, passed) in checks {
        if !passed {
            tracing::debug!(check = name, "pairing check failed");
            return Ok(false);
        }
    }
    Ok(true)
}
