use crate::{
    error::StructuralError,
    pinocchio::{Proof, ProvingKey},
    poly::FieldPolynomial,
    r1cs::Witness,
    r1cs_to_qap::CombinedPolynomials,
    Result,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{PrimeField, UniformRand};
use ark_std::rand::Rng;
use ark_std::{cfg_iter, end_timer, start_timer, vec::Vec};
use core::ops::Mul;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Create a zero-knowledge proof, sampling the blinding factors via `rng`.
#[inline]
pub fn create_random_proof<E, R>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    combined: &CombinedPolynomials<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>>
where
    E: Pairing,
    R: Rng,
{
    let delta_a = E::ScalarField::rand(rng);
    let delta_b = E::ScalarField::rand(rng);
    let delta_c = E::ScalarField::rand(rng);

    create_proof::<E>(pk, witness, combined, delta_a, delta_b, delta_c)
}

/// Create a proof whose `A`, `B` and `C` are shifted by `delta_a * Z(x)`,
/// `delta_b * Z(x)` and `delta_c * Z(x)`. The quotient absorbs the shift:
///
/// `H' = H + delta_b * A + delta_a * B + delta_a * delta_b * Z - delta_c`
#[tracing::instrument(skip_all, name = "Pinocchio::create_proof")]
pub fn create_proof<E>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    combined: &CombinedPolynomials<E::ScalarField>,
    delta_a: E::ScalarField,
    delta_b: E::ScalarField,
    delta_c: E::ScalarField,
) -> Result<Proof<E>>
where
    E: Pairing,
{
    let num_instance_variables = pk.num_instance_variables();
    if witness.len() != pk.num_wires() {
        return Err(StructuralError::WitnessLength {
            expected: pk.num_wires(),
            found: witness.len(),
        }
        .into());
    }
    if witness.num_public() + 1 != num_instance_variables {
        return Err(StructuralError::InputCount {
            kind: "public",
            expected: num_instance_variables.saturating_sub(1),
            found: witness.num_public(),
        }
        .into());
    }

    let prover_time = start_timer!(|| "Pinocchio::Prover");

    let quotient_time = start_timer!(|| "Blind quotient");
    let z = FieldPolynomial::vanishing(pk.num_constraints());
    let shift = &(&combined.a.scale(&delta_b) + &combined.b.scale(&delta_a))
        + &z.scale(&(delta_a * delta_b));
    let h = (&(&combined.h + &shift) - &FieldPolynomial::constant(delta_c)).trimmed();
    if h.len() > pk.h_query.len() {
        return Err(StructuralError::QuotientDegree {
            supported: pk.h_query.len(),
            found: h.len(),
        }
        .into());
    }
    end_timer!(quotient_time);

    // The public part of A, B and C comes from the verification key
    let private = cfg_iter!(witness.values()[num_instance_variables..])
        .map(|s| s.into_bigint())
        .collect::<Vec<_>>();
    let zk = &pk.blinding;

    let a_time = start_timer!(|| "Compute A");
    let g_a = blinded_msm(&pk.a_query, &private, zk.a, delta_a);
    let g_a_prime = blinded_msm(&pk.a_prime_query, &private, zk.a_prime, delta_a);
    end_timer!(a_time);

    let b_time = start_timer!(|| "Compute B");
    let g_b = blinded_msm(&pk.b_query, &private, zk.b, delta_b);
    let g_b_prime = blinded_msm(&pk.b_prime_query, &private, zk.b_prime, delta_b);
    end_timer!(b_time);

    let c_time = start_timer!(|| "Compute C");
    let g_c = blinded_msm(&pk.c_query, &private, zk.c, delta_c);
    let g_c_prime = blinded_msm(&pk.c_prime_query, &private, zk.c_prime, delta_c);
    end_timer!(c_time);

    let k_time = start_timer!(|| "Compute K");
    let mut g_k = <E::G1 as VariableBaseMSM>::msm_bigint(&pk.k_query, &private);
    g_k += zk.k_a.mul(delta_a);
    g_k += zk.k_b.mul(delta_b);
    g_k += zk.k_c.mul(delta_c);
    end_timer!(k_time);
    drop(private);

    let h_time = start_timer!(|| "Compute H");
    let g_h = <E::G1 as VariableBaseMSM>::msm_unchecked(&pk.h_query[..h.len()], h.coeffs());
    end_timer!(h_time);

    end_timer!(prover_time);

    Ok(Proof {
        a: g_a.into_affine(),
        a_prime: g_a_prime.into_affine(),
        b: g_b.into_affine(),
        b_prime: g_b_prime.into_affine(),
        c: g_c.into_affine(),
        c_prime: g_c_prime.into_affine(),
        k: g_k.into_affine(),
        h: g_h.into_affine(),
    })
}

/// `Σ w_i * query_i + delta * base`.
fn blinded_msm<G: AffineRepr>(
    query: &[G],
    assignment: &[<G::ScalarField as PrimeField>::BigInt],
    base: G,
    delta: G::ScalarField,
) -> G::Group {
    let mut res = <G::Group as VariableBaseMSM>::msm_bigint(query, assignment);
    res += base.mul(delta);
    res
}
