use core::ops::Mul;

use crate::{
    pinocchio::{BlindingBases, ProvingKey, VerifyingKey},
    r1cs_to_qap::Qap,
    Result,
};
use ark_ec::{pairing::Pairing, scalar_mul::fixed_base::FixedBase, CurveGroup};
use ark_ff::{Field, PrimeField, UniformRand};
use ark_std::rand::Rng;
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer, vec::Vec};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The secret scalars of an original-protocol setup. `rho_c` is always
/// `rho_a * rho_b`. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct ToxicWaste<F: PrimeField> {
    tau: F,
    rho_a: F,
    rho_b: F,
    rho_c: F,
    k_a: F,
    k_b: F,
    k_c: F,
    k_beta: F,
    k_gamma: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    fn sample<R: Rng>(qap: &Qap<F>, rng: &mut R) -> Self {
        let tau = qap.sample_point_outside_roots(rng);
        let rho_a = F::rand(rng);
        let rho_b = F::rand(rng);
        Self {
            tau,
            rho_a,
            rho_b,
            rho_c: rho_a * rho_b,
            k_a: F::rand(rng),
            k_b: F::rand(rng),
            k_c: F::rand(rng),
            k_beta: F::rand(rng),
            k_gamma: F::rand(rng),
        }
    }
}

/// Generates a random common reference string for
/// a QAP.
#[inline]
#[tracing::instrument(skip_all, name = "Pinocchio::generate_random_parameters")]
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
    tw: &ToxicWaste<E::ScalarField>,
    rng: &mut R,
) -> Result<ProvingKey<E>>
where
    E: Pairing,
    R: Rng,
{
    let setup_time = start_timer!(|| "Pinocchio::Generator");

    let num_instance_variables = qap.num_public + 1;
    let num_wires = qap.num_wires();
    let num_constraints = qap.num_constraints();

    let evaluation_time = start_timer!(|| "Evaluate QAP at tau");
    let evaluations = qap.evaluate_at(&tw.tau);
    let zt = &evaluations.z;
    end_timer!(evaluation_time);

    let scalar_bits = E::ScalarField::MODULUS_BIT_SIZE as usize;

    let scalars_time = start_timer!(|| "Scale QAP evaluations");
    let scale = |evals: &[E::ScalarField], by: &E::ScalarField| {
        Zeroizing::new(cfg_iter!(evals).map(|e| *by * e).collect::<Vec<_>>())
    };
    let a_scaled = scale(&evaluations.a, &tw.rho_a);
    let b_scaled = scale(&evaluations.b, &tw.rho_b);
    let c_scaled = scale(&evaluations.c, &tw.rho_c);

    let a_prime = scale(&a_scaled[num_instance_variables..], &tw.k_a);
    let b_prime = scale(&b_scaled[num_instance_variables..], &tw.k_b);
    let c_prime = scale(&c_scaled[num_instance_variables..], &tw.k_c);
    let k = Zeroizing::new(
        cfg_iter!(a_scaled[num_instance_variables..])
            .zip(&b_scaled[num_instance_variables..])
            .zip(&c_scaled[num_instance_variables..])
            .map(|((a, b), c)| (*a + b + c) * &tw.k_beta)
            .collect::<Vec<_>>(),
    );
    let powers_of_tau = Zeroizing::new(
        cfg_into_iter!(0..=num_constraints)
            .map(|i| tw.tau.pow([i as u64]))
            .collect::<Vec<_>>(),
    );
    end_timer!(scalars_time);

    let g1_generator = E::G1::rand(rng);
    let g2_generator = E::G2::rand(rng);

    // Compute B window table
    let g2_time = start_timer!(|| "Compute G2 table");
    let g2_window = FixedBase::get_mul_window_size(num_wires);
    let g2_table = FixedBase::get_window_table::<E::G2>(scalar_bits, g2_window, g2_generator);
    end_timer!(g2_time);

    let b_g2_time = start_timer!(|| "Calculate B G2");
    let mut b_g2 = E::G2::normalize_batch(&FixedBase::msm::<E::G2>(scalar_bits, g2_window, &g2_table, &b_scaled));
    drop(g2_table);
    end_timer!(b_g2_time);

    // Compute G window table
    let g1_window_time = start_timer!(|| "Compute G1 window table");
    let g1_window = FixedBase::get_mul_window_size(6 * num_wires + num_constraints + 1);
    let g1_table = FixedBase::get_window_table::<E::G1>(scalar_bits, g1_window, g1_generator);
    end_timer!(g1_window_time);

    let proving_key_time = start_timer!(|| "Generate the R1CS proving key");
    let g1_msm = |scalars: &[E::ScalarField]| {
        E::G1::normalize_batch(&FixedBase::msm::<E::G1>(scalar_bits, g1_window, &g1_table, scalars))
    };

    let a_time = start_timer!(|| "Calculate A");
    let mut a_query = g1_msm(&a_scaled);
    let a_prime_query = g1_msm(&a_prime);
    end_timer!(a_time);

    let b_time = start_timer!(|| "Calculate B G1");
    let b_prime_query = g1_msm(&b_prime);
    end_timer!(b_time);

    let c_time = start_timer!(|| "Calculate C");
    let mut c_query = g1_msm(&c_scaled);
    let c_prime_query = g1_msm(&c_prime);
    end_timer!(c_time);

    let k_time = start_timer!(|| "Calculate K");
    let k_query = g1_msm(&k);
    drop(k);
    end_timer!(k_time);

    let h_time = start_timer!(|| "Calculate H");
    let h_query = g1_msm(&powers_of_tau);
    drop(powers_of_tau);
    end_timer!(h_time);

    drop(g1_table);
    end_timer!(proving_key_time);

    let blinding = BlindingBases::<E> {
        a: g1_generator.mul(tw.rho_a * zt).into_affine(),
        a_prime: g1_generator.mul(tw.k_a * tw.rho_a * zt).into_affine(),
        b: g2_generator.mul(tw.rho_b * zt).into_affine(),
        b_prime: g1_generator.mul(tw.k_b * tw.rho_b * zt).into_affine(),
        c: g1_generator.mul(tw.rho_c * zt).into_affine(),
        c_prime: g1_generator.mul(tw.k_c * tw.rho_c * zt).into_affine(),
        k_a: g1_generator.mul(tw.k_beta * tw.rho_a * zt).into_affine(),
        k_b: g1_generator.mul(tw.k_beta * tw.rho_b * zt).into_affine(),
        k_c: g1_generator.mul(tw.k_beta * tw.rho_c * zt).into_affine(),
    };

    // The constant and public wires move into the verification key; the
    // prover only ever sums over the private ones.
    let verifying_key_time = start_timer!(|| "Generate the R1CS verification key");
    let b_query = b_g2.split_off(num_instance_variables);
    let a_query_private = a_query.split_off(num_instance_variables);
    let c_query_private = c_query.split_off(num_instance_variables);

    let beta_gamma = Zeroizing::new(tw.k_beta * tw.k_gamma);
    let vk = VerifyingKey::<E> {
        g2: g2_generator.into_affine(),
        a_g2: g2_generator.mul(tw.k_a).into_affine(),
        b_g1: g1_generator.mul(tw.k_b).into_affine(),
        c_g2: g2_generator.mul(tw.k_c).into_affine(),
        gamma_g2: g2_generator.mul(tw.k_gamma).into_affine(),
        beta_gamma_g1: g1_generator.mul(*beta_gamma).into_affine(),
        beta_gamma_g2: g2_generator.mul(*beta_gamma).into_affine(),
        z_g2: g2_generator.mul(tw.rho_c * zt).into_affine(),
        ic_a: a_query,
        ic_b: b_g2,
        ic_c: c_query,
    };
    drop(evaluations);
    end_timer!(verifying_key_time);
    end_timer!(setup_time);

    tracing::debug!(
        wires = num_wires,
        public = qap.num_public,
        constraints = num_constraints,
        "generated original-protocol parameters"
    );

    Ok(ProvingKey {
        vk,
        a_query: a_query_private,
        a_prime_query,
        b_query,
        b_prime_query,
        c_query: c_query_private,
        c_prime_query,
        k_query,
        h_query,
        blinding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{r1cs::tests::multiplication_r1cs, r1cs_to_qap::R1CStoQAP};
    use ark_bls12_381::Fr;
    use ark_ff::Zero;
    use ark_std::test_rng;

    #[test]
    fn toxic_waste_is_wiped() {
        let qap = R1CStoQAP::instance_map(&multiplication_r1cs()).unwrap();
        let mut tw = ToxicWaste::<Fr>::sample(&qap, &mut test_rng());
        assert_eq!(tw.rho_c, tw.rho_a * tw.rho_b);

        tw.zeroize();
        let secrets = [
            tw.tau, tw.rho_a, tw.rho_b, tw.rho_c, tw.k_a, tw.k_b, tw.k_c, tw.k_beta, tw.k_gamma,
        ];
        assert!(secrets.iter().all(Zero::is_zero));
    }
}
