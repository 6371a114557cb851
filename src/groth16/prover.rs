use crate::{
    error::StructuralError,
    groth16::{Proof, ProvingKey},
    poly::FieldPolynomial,
    r1cs::Witness,
    Result,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{PrimeField, UniformRand, Zero};
use ark_std::rand::Rng;
use ark_std::{cfg_iter, end_timer, start_timer, vec::Vec};
use core::ops::{AddAssign, Mul};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Create a Groth16 proof that is zero-knowledge.
/// This method samples randomness for zero knowledges via `rng`.
#[inline]
pub fn create_random_proof<E, R>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    h: &FieldPolynomial<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>>
where
    E: Pairing,
    R: Rng,
{
    let r = E::ScalarField::rand(rng);
    let s = E::ScalarField::rand(rng);

    create_proof::<E>(pk, witness, h, r, s)
}

/// Create a Groth16 proof using randomness `r` and `s`, for a witness whose
/// quotient `H(x) = (A(x)B(x) - C(x)) / Z(x)` has already been computed.
#[tracing::instrument(skip_all, name = "Groth16::create_proof")]
pub fn create_proof<E>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    h: &FieldPolynomial<E::ScalarField>,
    r: E::ScalarField,
    s: E::ScalarField,
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
    let h = h.clone().trimmed();
    if h.len() > pk.h_query.len() {
        return Err(StructuralError::QuotientDegree {
            supported: pk.h_query.len(),
            found: h.len(),
        }
        .into());
    }

    let prover_time = start_timer!(|| "Groth16::Prover");

    let c_acc_time = start_timer!(|| "Compute C");
    let h_acc = <E::G1 as VariableBaseMSM>::msm_unchecked(&pk.h_query[..h.len()], h.coeffs());

    let assignment = cfg_iter!(witness.values())
        .map(|s| s.into_bigint())
        .collect::<Vec<_>>();

    let l_aux_acc =
        <E::G1 as VariableBaseMSM>::msm_bigint(&pk.l_query, &assignment[num_instance_variables..]);

    let r_s_delta_g1 = pk.delta_g1.into_group().mul(r).mul(s);

    end_timer!(c_acc_time);

    // Compute A
    let a_acc_time = start_timer!(|| "Compute A");
    let r_g1 = pk.delta_g1.mul(r);

    let g_a = calculate_coeff(r_g1, &pk.a_query, pk.vk.alpha_g1, &assignment);

    let s_g_a = g_a.mul(s);
    end_timer!(a_acc_time);

    // Compute B in G1 if needed
    let g1_b = if !r.is_zero() {
        let b_g1_acc_time = start_timer!(|| "Compute B in G1");
        let s_g1 = pk.delta_g1.mul(s);
        let g1_b = calculate_coeff(s_g1, &pk.b_g1_query, pk.beta_g1, &assignment);

        end_timer!(b_g1_acc_time);

        g1_b
    } else {
        E::G1::zero()
    };

    // Compute B in G2
    let b_g2_acc_time = start_timer!(|| "Compute B in G2");
    let s_g2 = pk.vk.delta_g2.mul(s);
    let g2_b = calculate_coeff(s_g2, &pk.b_g2_query, pk.vk.beta_g2, &assignment);
    let r_g1_b = g1_b.mul(r);
    drop(assignment);

    end_timer!(b_g2_acc_time);

    let c_time = start_timer!(|| "Finish C");
    let mut g_c = s_g_a;
    g_c += &r_g1_b;
    g_c -= &r_s_delta_g1;
    g_c += &l_aux_acc;
    g_c += &h_acc;
    end_timer!(c_time);

    end_timer!(prover_time);

    Ok(Proof {
        a: g_a.into_affine(),
        b: g2_b.into_affine(),
        c: g_c.into_affine(),
    })
}

fn calculate_coeff<G: AffineRepr>(
    initial: G::Group,
    query: &[G],
    vk_param: G,
    assignment: &[<G::ScalarField as PrimeField>::BigInt],
) -> G::Group {
    // the constant wire is part of the assignment
    let acc: <G as AffineRepr>::Group = <G::Group as VariableBaseMSM>::msm_bigint(query, assignment);

    let mut res: <G as AffineRepr>::Group = initial;
    res += &acc;
    res.add_assign(&vk_param);

    res
}
