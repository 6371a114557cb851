use core::ops::Mul;

use crate::{
    error::AlgebraicError,
    groth16::{ProvingKey, VerifyingKey},
    r1cs_to_qap::Qap,
    Result,
};
use ark_ec::{pairing::Pairing, scalar_mul::fixed_base::FixedBase, CurveGroup};
use ark_ff::{Field, PrimeField, UniformRand, Zero};
use ark_std::rand::Rng;
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer, vec::Vec};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The secret scalars of a Groth16 setup. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct ToxicWaste<F: PrimeField> {
    tau: F,
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    fn sample<R: Rng>(qap: &Qap<F>, rng: &mut R) -> Self {
        Self {
            tau: qap.sample_point_outside_roots(rng),
            alpha: F::rand(rng),
            beta: F::rand(rng),
            gamma: F::rand(rng),
            delta: F::rand(rng),
        }
    }
}

/// Generates a random common reference string for
/// a QAP.
#[inline]
#[tracing::instrument(skip_all, name = "Groth16::generate_random_parameters")]
pub fn generate_random_parameters<E, R>(qap: &Qap<E::ScalarField>, rng: &mut R) -> Result<ProvingKey<E>>
where
    E: Pairing,
    R: Rng,
{
    let toxic_waste = ToxicWaste::sample(qap, rng);
    generate_parameters::<E, R>(qap, &toxic_waste, rng)
}

/// Create parameters for a QAP, given some toxic waste.
fn generate_parameters<E, R>(
    qap: &Qap<E::ScalarField>,
    toxic_waste: &ToxicWaste<E::ScalarField>,
    rng: &mut R,
) -> Result<ProvingKey<E>>
where
    E: Pairing,
    R: Rng,
{
    let setup_time = start_timer!(|| "Groth16::Generator");

    let num_instance_variables = qap.num_public + 1;
    let num_wires = qap.num_wires();
    let num_constraints = qap.num_constraints();

    let evaluation_time = start_timer!(|| "Evaluate QAP at tau");
    let evaluations = qap.evaluate_at(&toxic_waste.tau);
    let (a, b, c, zt) = (&evaluations.a, &evaluations.b, &evaluations.c, &evaluations.z);
    end_timer!(evaluation_time);

    // Compute query densities
    let non_zero_a: usize = cfg_into_iter!(0..num_wires)
        .map(|i| usize::from(!a[i].is_zero()))
        .sum();

    let non_zero_b: usize = cfg_into_iter!(0..num_wires)
        .map(|i| usize::from(!b[i].is_zero()))
        .sum();

    let scalar_bits = E::ScalarField::MODULUS_BIT_SIZE as usize;

    let (alpha, beta) = (&toxic_waste.alpha, &toxic_waste.beta);
    let gamma_inverse = Zeroizing::new(toxic_waste.gamma.inverse().ok_or(AlgebraicError::ZeroInverse)?);
    let delta_inverse = Zeroizing::new(toxic_waste.delta.inverse().ok_or(AlgebraicError::ZeroInverse)?);

    let gamma_abc = Zeroizing::new(
        cfg_iter!(a[..num_instance_variables])
            .zip(&b[..num_instance_variables])
            .zip(&c[..num_instance_variables])
            .map(|((a, b), c)| (*beta * a + &(*alpha * b) + c) * &*gamma_inverse)
            .collect::<Vec<_>>(),
    );

    let l = Zeroizing::new(
        cfg_iter!(a[num_instance_variables..])
            .zip(&b[num_instance_variables..])
            .zip(&c[num_instance_variables..])
            .map(|((a, b), c)| (*beta * a + &(*alpha * b) + c) * &*delta_inverse)
            .collect::<Vec<_>>(),
    );

    let g1_generator = E::G1::rand(rng);
    let g2_generator = E::G2::rand(rng);

    // Compute B window table
    let g2_time = start_timer!(|| "Compute G2 table");
    let g2_window = FixedBase::get_mul_window_size(non_zero_b);
    let g2_table = FixedBase::get_window_table::<E::G2>(scalar_bits, g2_window, g2_generator);
    end_timer!(g2_time);

    // Compute the B-query in G2
    let b_g2_time = start_timer!(|| "Calculate B G2");
    let b_g2_query = FixedBase::msm::<E::G2>(scalar_bits, g2_window, &g2_table, b);
    drop(g2_table);
    end_timer!(b_g2_time);

    // Compute G window table
    let g1_window_time = start_timer!(|| "Compute G1 window table");
    let g1_window =
        FixedBase::get_mul_window_size(non_zero_a + non_zero_b + num_wires + num_constraints + 1);
    let g1_table = FixedBase::get_window_table::<E::G1>(scalar_bits, g1_window, g1_generator);
    end_timer!(g1_window_time);

    let proving_key_time = start_timer!(|| "Generate the R1CS proving key");

    let alpha_g1 = g1_generator.mul(*alpha);
    let beta_g1 = g1_generator.mul(*beta);
    let beta_g2 = g2_generator.mul(*beta);
    let delta_g1 = g1_generator.mul(toxic_waste.delta);
    let delta_g2 = g2_generator.mul(toxic_waste.delta);

    // Compute the A-query
    let a_time = start_timer!(|| "Calculate A");
    let a_query = FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, a);
    end_timer!(a_time);

    // Compute the B-query in G1
    let b_g1_time = start_timer!(|| "Calculate B G1");
    let b_g1_query = FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, b);
    end_timer!(b_g1_time);

    // Compute the H-query: deg H <= m - 2, one spare power for
    // trailing zeros in the quotient
    let h_time = start_timer!(|| "Calculate H");
    let h_scalars = Zeroizing::new(
        cfg_into_iter!(0..num_constraints)
            .map(|i| *zt * &*delta_inverse * &toxic_waste.tau.pow([i as u64]))
            .collect::<Vec<_>>(),
    );
    let h_query = FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, &h_scalars);
    drop(h_scalars);
    end_timer!(h_time);

    // Compute the L-query
    let l_time = start_timer!(|| "Calculate L");
    let l_query = FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, &l);
    drop(l);
    end_timer!(l_time);

    end_timer!(proving_key_time);

    // Generate R1CS verification key
    let verifying_key_time = start_timer!(|| "Generate the R1CS verification key");
    let gamma_g2 = g2_generator.mul(toxic_waste.gamma);
    let gamma_abc_g1 = FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, &gamma_abc);

    drop(g1_table);
    drop(evaluations);

    end_timer!(verifying_key_time);

    let vk = VerifyingKey::<E> {
        alpha_g1: alpha_g1.into_affine(),
        beta_g2: beta_g2.into_affine(),
        gamma_g2: gamma_g2.into_affine(),
        delta_g2: delta_g2.into_affine(),
        gamma_abc_g1: E::G1::normalize_batch(&gamma_abc_g1),
    };

    let batch_normalization_time = start_timer!(|| "Convert proving key elements to affine");
    let a_query = E::G1::normalize_batch(&a_query);
    let b_g1_query = E::G1::normalize_batch(&b_g1_query);
    let b_g2_query = E::G2::normalize_batch(&b_g2_query);
    let h_query = E::G1::normalize_batch(&h_query);
    let l_query = E::G1::normalize_batch(&l_query);
    end_timer!(batch_normalization_time);
    end_timer!(setup_time);

    tracing::debug!(
        wires = num_wires,
        public = qap.num_public,
        constraints = num_constraints,
        "generated Groth16 parameters"
    );

    Ok(ProvingKey {
        vk,
        beta_g1: beta_g1.into_affine(),
        delta_g1: delta_g1.into_affine(),
        a_query,
        b_g1_query,
        b_g2_query,
        h_query,
        l_query,
    })
}
