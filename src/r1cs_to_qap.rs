use crate::{
    error::{Error, StructuralError},
    poly::FieldPolynomial,
    r1cs::{R1cs, Witness},
    Result,
};
use ark_ff::PrimeField;
use ark_std::{cfg_into_iter, cfg_iter, end_timer, rand::Rng, start_timer, vec::Vec};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Quadratic arithmetic program: per-wire polynomials interpolated through
/// the columns of `A`, `B`, `C` at `x = 1..=m`, and `Z(x) = ∏ (x - i)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qap<F: PrimeField> {
    pub alphas: Vec<FieldPolynomial<F>>,
    pub betas: Vec<FieldPolynomial<F>>,
    pub gammas: Vec<FieldPolynomial<F>>,
    pub z: FieldPolynomial<F>,
    pub num_public: usize,
}

/// The QAP polynomials evaluated at a single point. Wiped on drop, since the
/// point is usually secret.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct QapEvaluations<F: PrimeField> {
    pub a: Vec<F>,
    pub b: Vec<F>,
    pub c: Vec<F>,
    pub z: F,
}

impl<F: PrimeField> Qap<F> {
    pub fn num_wires(&self) -> usize {
        self.alphas.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.z.degree()
    }

    /// Sample a point outside the roots `1..=m` of `Z(x)`.
    pub(crate) fn sample_point_outside_roots<R: Rng>(&self, rng: &mut R) -> F {
        loop {
            let x = F::rand(rng);
            if !self.z.evaluate(&x).is_zero() {
                return x;
            }
        }
    }

    pub(crate) fn evaluate_at(&self, x: &F) -> QapEvaluations<F> {
        let eval = |polys: &[FieldPolynomial<F>]| {
            cfg_iter!(polys).map(|p| p.evaluate(x)).collect::<Vec<_>>()
        };
        QapEvaluations {
            a: eval(&self.alphas),
            b: eval(&self.betas),
            c: eval(&self.gammas),
            z: self.z.evaluate(x),
        }
    }
}

/// `A(x)`, `B(x)`, `C(x)` for one witness, with `P = AB - C` and the
/// quotient `H = P / Z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedPolynomials<F: PrimeField> {
    pub a: FieldPolynomial<F>,
    pub b: FieldPolynomial<F>,
    pub c: FieldPolynomial<F>,
    pub p: FieldPolynomial<F>,
    pub h: FieldPolynomial<F>,
}

pub struct R1CStoQAP;

impl R1CStoQAP {
    /// Interpolate every wire column of `A`, `B` and `C`.
    #[tracing::instrument(skip_all, name = "R1CStoQAP::instance_map")]
    pub fn instance_map<F: PrimeField>(r1cs: &R1cs<F>) -> Result<Qap<F>> {
        r1cs.validate()?;
        let reduction_time = start_timer!(|| "R1CS to QAP instance map");

        let interpolate_columns = |columns: Vec<Vec<F>>| {
            cfg_into_iter!(columns)
                .map(|column| FieldPolynomial::interpolate(&column))
                .collect::<core::result::Result<Vec<_>, _>>()
        };
        let alphas = interpolate_columns(r1cs.a.transpose())?;
        let betas = interpolate_columns(r1cs.b.transpose())?;
        let gammas = interpolate_columns(r1cs.c.transpose())?;
        let z = FieldPolynomial::vanishing(r1cs.num_constraints());

        end_timer!(reduction_time);
        tracing::debug!(
            wires = alphas.len(),
            constraints = r1cs.num_constraints(),
            "reduced R1CS to QAP"
        );

        Ok(Qap {
            alphas,
            betas,
            gammas,
            z,
            num_public: r1cs.num_public,
        })
    }

    /// Combine the QAP with a witness and divide out `Z(x)`.
    ///
    /// A non-zero remainder means the witness violates at least one
    /// constraint and is reported as [`Error::InvalidWitness`].
    #[tracing::instrument(skip_all, name = "R1CStoQAP::witness_map")]
    pub fn witness_map<F: PrimeField>(qap: &Qap<F>, witness: &Witness<F>) -> Result<CombinedPolynomials<F>> {
        if witness.len() != qap.num_wires() {
            return Err(StructuralError::WitnessLength {
                expected: qap.num_wires(),
                found: witness.len(),
            }
            .into());
        }
        let witness_map_time = start_timer!(|| "R1CS to QAP witness map");

        let a = combine(&qap.alphas, witness.values());
        let b = combine(&qap.betas, witness.values());
        let c = combine(&qap.gammas, witness.values());

        let p = &(&a * &b) - &c;
        let (h, remainder) = p.divide(&qap.z)?;
        end_timer!(witness_map_time);

        if !remainder.is_zero() {
            tracing::debug!(degree = remainder.degree(), "P(x) is not divisible by Z(x)");
            return Err(Error::InvalidWitness {
                remainder_degree: remainder.degree(),
            });
        }

        Ok(CombinedPolynomials { a, b, c, p, h })
    }
}

/// `Σ w_i · polys_i`, one output coefficient per task.
fn combine<F: PrimeField>(polys: &[FieldPolynomial<F>], witness: &[F]) -> FieldPolynomial<F> {
    let len = polys.iter().map(FieldPolynomial::len).max().unwrap_or(0);
    let coeffs = cfg_into_iter!(0..len)
        .map(|k| {
            polys
                .iter()
                .zip(witness)
                .map(|(p, w)| p.coeff(k) * w)
                .sum::<F>()
        })
        .collect();
    FieldPolynomial::from_coefficients(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::tests::{cubic_r1cs, multiplication_r1cs};
    use crate::test::ScriptedRng;
    use ark_bls12_381::Fr;
    use ark_ff::{One, Zero};

    fn fr(values: &[u64]) -> Vec<Fr> {
        values.iter().map(|&x| Fr::from(x)).collect()
    }

    #[test]
    fn single_gate_has_linear_vanishing_polynomial() {
        let qap = R1CStoQAP::instance_map(&multiplication_r1cs()).unwrap();
        assert_eq!(qap.num_wires(), 4);
        assert_eq!(qap.num_constraints(), 1);
        assert_eq!(
            qap.z,
            FieldPolynomial::from_coefficients(vec![-Fr::one(), Fr::one()])
        );
        // one constraint: every column interpolates to a constant
        assert_eq!(qap.alphas[2], FieldPolynomial::constant(Fr::one()));
        assert!(qap.alphas[0].is_zero());
    }

    #[test]
    fn columns_interpolate_through_matrix_entries() {
        let r1cs = cubic_r1cs();
        let qap = R1CStoQAP::instance_map(&r1cs).unwrap();
        for (polys, matrix) in [(&qap.alphas, &r1cs.a), (&qap.betas, &r1cs.b), (&qap.gammas, &r1cs.c)] {
            for (row, coeffs) in matrix.rows().iter().enumerate() {
                let x = Fr::from((row + 1) as u64);
                for (wire, coeff) in coeffs.iter().enumerate() {
                    assert_eq!(polys[wire].evaluate(&x), *coeff);
                }
            }
        }
        assert_eq!(qap, R1CStoQAP::instance_map(&r1cs).unwrap());
    }

    #[test]
    fn valid_witness_divides_exactly() {
        let r1cs = cubic_r1cs();
        let qap = R1CStoQAP::instance_map(&r1cs).unwrap();
        let witness = Witness::new(fr(&[1, 35, 3, 9, 27, 30]), 1);
        let combined = R1CStoQAP::witness_map(&qap, &witness).unwrap();

        assert_eq!(&(&combined.a * &combined.b) - &combined.c, combined.p);
        assert_eq!(&combined.h * &qap.z, combined.p);
        assert!(combined.h.degree() <= qap.num_constraints() - 2);
    }

    #[test]
    fn forged_public_input_is_an_invalid_witness() {
        let qap = R1CStoQAP::instance_map(&multiplication_r1cs()).unwrap();
        let witness = Witness::new(fr(&[1, 7, 2, 3]), 1);
        assert!(matches!(
            R1CStoQAP::witness_map(&qap, &witness),
            Err(Error::InvalidWitness { .. })
        ));

        let witness = Witness::new(fr(&[1, 6, 2, 3]), 1);
        let combined = R1CStoQAP::witness_map(&qap, &witness).unwrap();
        assert!(combined.h.is_zero());
        assert!(combined.p.coeffs().iter().all(Zero::is_zero));
    }

    #[test]
    fn sampled_point_skips_constraint_indices() {
        let qap = R1CStoQAP::instance_map(&cubic_r1cs()).unwrap();
        let roots = fr(&[1, 2, 3, 4]);
        let mut rng = ScriptedRng::starting_with(&roots);

        let x = qap.sample_point_outside_roots(&mut rng);
        assert!(!roots.contains(&x));
        assert!(!qap.z.evaluate(&x).is_zero());
    }

    #[test]
    fn witness_length_is_checked() {
        let qap = R1CStoQAP::instance_map(&multiplication_r1cs()).unwrap();
        assert!(matches!(
            R1CStoQAP::witness_map(&qap, &Witness::new(fr(&[1, 6, 2]), 1)),
            Err(Error::Structural(StructuralError::WitnessLength { expected: 4, found: 3 }))
        ));
    }
}
