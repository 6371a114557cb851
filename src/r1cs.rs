use crate::error::{Error, StructuralError};
use crate::serialization::{field_vec, field_matrix};
use crate::Result;
use ark_ff::PrimeField;
use ark_relations::r1cs::{
    ConstraintMatrices, ConstraintSynthesizer, ConstraintSystem, OptimizationGoal,
    SynthesisError, SynthesisMode,
};
use ark_std::{end_timer, start_timer, vec::Vec};
use serde::{Deserialize, Serialize};

/// One of the `A`, `B`, `C` matrices: a row of per-wire coefficients for
/// every constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ConstraintMatrix<F: PrimeField> {
    #[serde(with = "field_matrix")]
    rows: Vec<Vec<F>>,
}

impl<F: PrimeField> ConstraintMatrix<F> {
    pub fn new(rows: Vec<Vec<F>>) -> Self {
        Self { rows }
    }

    /// Densify an ark-relations sparse matrix.
    pub fn from_sparse(matrix: &ark_relations::r1cs::Matrix<F>, num_wires: usize) -> Self {
        let rows = matrix
            .iter()
            .map(|row| {
                let mut dense = vec![F::zero(); num_wires];
                for (coeff, wire) in row {
                    dense[*wire] += coeff;
                }
                dense
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<F>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Per-wire columns: entry `i` holds the coefficient of wire `i` in
    /// every constraint.
    pub fn transpose(&self) -> Vec<Vec<F>> {
        let num_wires = self.rows.first().map_or(0, Vec::len);
        (0..num_wires)
            .map(|wire| self.rows.iter().map(|row| row[wire]).collect())
            .collect()
    }

    fn row_dot(&self, row: usize, assignment: &[F]) -> F {
        self.rows[row]
            .iter()
            .zip(assignment)
            .map(|(c, w)| *c * w)
            .sum()
    }
}

/// Full assignment of values to wires, in the layout
/// `[one, public.., private.., intermediate..]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Witness<F: PrimeField> {
    #[serde(with = "field_vec")]
    assignment: Vec<F>,
    num_public: usize,
}

impl<F: PrimeField> Witness<F> {
    pub fn new(assignment: Vec<F>, num_public: usize) -> Self {
        Self {
            assignment,
            num_public,
        }
    }

    pub fn values(&self) -> &[F] {
        &self.assignment
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    pub fn num_public(&self) -> usize {
        self.num_public
    }

    /// Values of the public input wires, without the constant one.
    pub fn public_inputs(&self) -> &[F] {
        &self.assignment[1..=self.num_public]
    }
}

/// A rank-1 constraint system `(A·w) ∘ (B·w) = C·w`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct R1cs<F: PrimeField> {
    pub num_public: usize,
    pub num_private: usize,
    pub a: ConstraintMatrix<F>,
    pub b: ConstraintMatrix<F>,
    pub c: ConstraintMatrix<F>,
}

impl<F: PrimeField> R1cs<F> {
    pub fn new(
        a: ConstraintMatrix<F>,
        b: ConstraintMatrix<F>,
        c: ConstraintMatrix<F>,
        num_public: usize,
        num_private: usize,
    ) -> Result<Self> {
        let r1cs = Self {
            num_public,
            num_private,
            a,
            b,
            c,
        };
        r1cs.validate()?;
        Ok(r1cs)
    }

    pub fn validate(&self) -> core::result::Result<(), StructuralError> {
        let (ma, mb, mc) = (self.a.num_rows(), self.b.num_rows(), self.c.num_rows());
        if ma != mb || ma != mc {
            return Err(StructuralError::ConstraintCountMismatch { a: ma, b: mb, c: mc });
        }
        if ma == 0 {
            return Err(StructuralError::EmptyCircuit);
        }
        let wires = self.num_wires();
        for (name, matrix) in [('A', &self.a), ('B', &self.b), ('C', &self.c)] {
            for (row, coeffs) in matrix.rows().iter().enumerate() {
                if coeffs.len() != wires {
                    return Err(StructuralError::RowLength {
                        matrix: name,
                        row,
                        expected: wires,
                        found: coeffs.len(),
                    });
                }
            }
        }
        if 1 + self.num_public + self.num_private > wires {
            return Err(StructuralError::InputLayout {
                public: self.num_public,
                private: self.num_private,
                wires,
            });
        }
        Ok(())
    }

    pub fn num_constraints(&self) -> usize {
        self.a.num_rows()
    }

    pub fn num_wires(&self) -> usize {
        self.a.rows().first().map_or(0, Vec::len)
    }

    pub fn check_witness_length(&self, witness: &Witness<F>) -> core::result::Result<(), StructuralError> {
        if witness.len() != self.num_wires() {
            return Err(StructuralError::WitnessLength {
                expected: self.num_wires(),
                found: witness.len(),
            });
        }
        Ok(())
    }

    /// Row-by-row satisfaction check.
    pub fn is_satisfied(&self, witness: &Witness<F>) -> Result<bool> {
        self.check_witness_length(witness)?;
        let w = witness.values();
        Ok((0..self.num_constraints()).all(|row| {
            self.a.row_dot(row, w) * self.b.row_dot(row, w) == self.c.row_dot(row, w)
        }))
    }

    /// Solve for every wire given the explicit inputs.
    ///
    /// Each pass looks for constraints in which exactly one wire is still
    /// unknown and appears linearly, and solves for it. Already-known wires
    /// are not cross-checked here: an inconsistent assignment is caught by
    /// the QAP divisibility check.
    #[tracing::instrument(skip_all, name = "R1cs::evaluate_witness")]
    pub fn evaluate_witness(&self, private_inputs: &[F], public_inputs: &[F]) -> Result<Witness<F>> {
        self.validate()?;
        if public_inputs.len() != self.num_public {
            return Err(StructuralError::InputCount {
                kind: "public",
                expected: self.num_public,
                found: public_inputs.len(),
            }
            .into());
        }
        if private_inputs.len() != self.num_private {
            return Err(StructuralError::InputCount {
                kind: "private",
                expected: self.num_private,
                found: private_inputs.len(),
            }
            .into());
        }

        let mut values: Vec<Option<F>> = vec![None; self.num_wires()];
        values[0] = Some(F::one());
        for (slot, v) in values[1..]
            .iter_mut()
            .zip(public_inputs.iter().chain(private_inputs))
        {
            *slot = Some(*v);
        }

        loop {
            let mut progress = false;
            for row in 0..self.num_constraints() {
                if let Some((wire, value)) = self.solve_row(row, &values) {
                    tracing::trace!(row, wire, "solved wire");
                    values[wire] = Some(value);
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        let assignment = values
            .into_iter()
            .enumerate()
            .map(|(wire, v)| v.ok_or(Error::Unsatisfiable { wire }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Witness::new(assignment, self.num_public))
    }

    fn solve_row(&self, row: usize, values: &[Option<F>]) -> Option<(usize, F)> {
        let a = partial_dot(&self.a.rows()[row], values);
        let b = partial_dot(&self.b.rows()[row], values);
        let c = partial_dot(&self.c.rows()[row], values);

        match (a.unknown, b.unknown, c.unknown) {
            (Unknown::None, Unknown::None, Unknown::One(wire, coeff)) => {
                let x = (a.known * b.known - c.known) * coeff.inverse()?;
                Some((wire, x))
            },
            (Unknown::None, Unknown::One(wire, coeff), Unknown::None) if !a.known.is_zero() => {
                let target = c.known * a.known.inverse()?;
                Some((wire, (target - b.known) * coeff.inverse()?))
            },
            (Unknown::One(wire, coeff), Unknown::None, Unknown::None) if !b.known.is_zero() => {
                let target = c.known * b.known.inverse()?;
                Some((wire, (target - a.known) * coeff.inverse()?))
            },
            _ => None,
        }
    }

    /// Synthesize an ark-relations circuit with its assignment.
    #[tracing::instrument(skip_all, name = "R1cs::synthesize")]
    pub fn synthesize<C: ConstraintSynthesizer<F>>(circuit: C) -> Result<(Self, Witness<F>)> {
        let cs = ConstraintSystem::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);

        let synthesis_time = start_timer!(|| "Constraint synthesis");
        circuit.generate_constraints(cs.clone())?;
        end_timer!(synthesis_time);

        let lc_time = start_timer!(|| "Inlining LCs");
        cs.finalize();
        end_timer!(lc_time);

        let matrices = cs.to_matrices().ok_or(SynthesisError::MissingCS)?;
        let r1cs = Self::from_matrices(&matrices)?;

        let prover = cs.borrow().ok_or(SynthesisError::MissingCS)?;
        let assignment = [&prover.instance_assignment[..], &prover.witness_assignment[..]].concat();
        drop(prover);

        let witness = Witness::new(assignment, r1cs.num_public);
        r1cs.check_witness_length(&witness)?;
        Ok((r1cs, witness))
    }

    /// Synthesize only the shape of an ark-relations circuit; no assignment
    /// is evaluated.
    #[tracing::instrument(skip_all, name = "R1cs::synthesize_setup")]
    pub fn synthesize_setup<C: ConstraintSynthesizer<F>>(circuit: C) -> Result<Self> {
        let cs = ConstraintSystem::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        cs.set_mode(SynthesisMode::Setup);

        circuit.generate_constraints(cs.clone())?;
        cs.finalize();

        let matrices = cs.to_matrices().ok_or(SynthesisError::MissingCS)?;
        Self::from_matrices(&matrices)
    }

    pub fn from_matrices(matrices: &ConstraintMatrices<F>) -> Result<Self> {
        let num_wires = matrices.num_instance_variables + matrices.num_witness_variables;
        Self::new(
            ConstraintMatrix::from_sparse(&matrices.a, num_wires),
            ConstraintMatrix::from_sparse(&matrices.b, num_wires),
            ConstraintMatrix::from_sparse(&matrices.c, num_wires),
            matrices.num_instance_variables - 1,
            matrices.num_witness_variables,
        )
    }
}

enum Unknown<F> {
    None,
    One(usize, F),
    Many,
}

struct PartialDot<F> {
    known: F,
    unknown: Unknown<F>,
}

fn partial_dot<F: PrimeField>(row: &[F], values: &[Option<F>]) -> PartialDot<F> {
    let mut known = F::zero();
    let mut unknown = Unknown::None;
    for (wire, (coeff, value)) in row.iter().zip(values).enumerate() {
        if coeff.is_zero() {
            continue;
        }
        match value {
            Some(v) => known += *coeff * v,
            None => {
                unknown = match unknown {
                    Unknown::None => Unknown::One(wire, *coeff),
                    _ => Unknown::Many,
                }
            },
        }
    }
    PartialDot { known, unknown }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_relations::{
        lc,
        r1cs::{ConstraintSystemRef, SynthesisError},
    };

    /// `c = a * b` with `c` public: wires `(one, c, a, b)`.
    pub(crate) fn multiplication_r1cs() -> R1cs<Fr> {
        let row = |v: [u64; 4]| vec![v.iter().map(|&x| Fr::from(x)).collect::<Vec<_>>()];
        R1cs::new(
            ConstraintMatrix::new(row([0, 0, 1, 0])),
            ConstraintMatrix::new(row([0, 0, 0, 1])),
            ConstraintMatrix::new(row([0, 1, 0, 0])),
            1,
            2,
        )
        .unwrap()
    }

    /// `out = x^3 + x + 5` with public `out` and private `x`:
    /// wires `(one, out, x, sym_1, y, sym_2)`.
    pub(crate) fn cubic_r1cs() -> R1cs<Fr> {
        let rows = |rs: &[[u64; 6]]| {
            ConstraintMatrix::new(
                rs.iter()
                    .map(|r| r.iter().map(|&x| Fr::from(x)).collect())
                    .collect(),
            )
        };
        R1cs::new(
            rows(&[[0, 0, 1, 0, 0, 0], [0, 0, 0, 1, 0, 0], [0, 0, 1, 0, 1, 0], [5, 0, 0, 0, 0, 1]]),
            rows(&[[0, 0, 1, 0, 0, 0], [0, 0, 1, 0, 0, 0], [1, 0, 0, 0, 0, 0], [1, 0, 0, 0, 0, 0]]),
            rows(&[[0, 0, 0, 1, 0, 0], [0, 0, 0, 0, 1, 0], [0, 0, 0, 0, 0, 1], [0, 1, 0, 0, 0, 0]]),
            1,
            1,
        )
        .unwrap()
    }

    struct MultiplyCircuit {
        a: Option<Fr>,
        b: Option<Fr>,
    }

    impl ConstraintSynthesizer<Fr> for MultiplyCircuit {
        fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> core::result::Result<(), SynthesisError> {
            let a = cs.new_witness_variable(|| self.a.ok_or(SynthesisError::AssignmentMissing))?;
            let b = cs.new_witness_variable(|| self.b.ok_or(SynthesisError::AssignmentMissing))?;
            let c = cs.new_input_variable(|| {
                Ok(self.a.ok_or(SynthesisError::AssignmentMissing)?
                    * self.b.ok_or(SynthesisError::AssignmentMissing)?)
            })?;
            cs.enforce_constraint(lc!() + a, lc!() + b, lc!() + c)?;
            Ok(())
        }
    }

    #[test]
    fn evaluate_witness_places_inputs() {
        let r1cs = multiplication_r1cs();
        let w = r1cs
            .evaluate_witness(&[Fr::from(2u64), Fr::from(3u64)], &[Fr::from(6u64)])
            .unwrap();
        let expected: Vec<Fr> = [1u64, 6, 2, 3].iter().map(|&x| Fr::from(x)).collect();
        assert_eq!(w.values(), &expected[..]);
        assert_eq!(w.public_inputs(), &[Fr::from(6u64)]);
        assert!(r1cs.is_satisfied(&w).unwrap());
    }

    #[test]
    fn evaluate_witness_does_not_reject_forged_public_input() {
        let r1cs = multiplication_r1cs();
        let w = r1cs
            .evaluate_witness(&[Fr::from(2u64), Fr::from(3u64)], &[Fr::from(7u64)])
            .unwrap();
        assert!(!r1cs.is_satisfied(&w).unwrap());
    }

    #[test]
    fn evaluate_witness_solves_intermediates() {
        let r1cs = cubic_r1cs();
        let w = r1cs
            .evaluate_witness(&[Fr::from(3u64)], &[Fr::from(35u64)])
            .unwrap();
        let expected: Vec<Fr> = [1u64, 35, 3, 9, 27, 30].iter().map(|&x| Fr::from(x)).collect();
        assert_eq!(w.values(), &expected[..]);
        assert!(r1cs.is_satisfied(&w).unwrap());
    }

    #[test]
    fn evaluate_witness_checks_input_counts() {
        let r1cs = multiplication_r1cs();
        assert!(matches!(
            r1cs.evaluate_witness(&[Fr::from(2u64)], &[Fr::from(6u64)]),
            Err(Error::Structural(StructuralError::InputCount { kind: "private", .. }))
        ));
    }

    #[test]
    fn undetermined_wire_is_unsatisfiable() {
        // one constraint a * b = c where only c is known
        let row = |v: [u64; 4]| vec![v.iter().map(|&x| Fr::from(x)).collect::<Vec<_>>()];
        let r1cs = R1cs::new(
            ConstraintMatrix::new(row([0, 0, 1, 0])),
            ConstraintMatrix::new(row([0, 0, 0, 1])),
            ConstraintMatrix::new(row([0, 1, 0, 0])),
            1,
            0,
        )
        .unwrap();
        assert!(matches!(
            r1cs.evaluate_witness(&[], &[Fr::from(6u64)]),
            Err(Error::Unsatisfiable { wire: 2 })
        ));
    }

    #[test]
    fn malformed_matrices_are_structural_errors() {
        let one = vec![vec![Fr::from(1u64); 3]];
        let short = vec![vec![Fr::from(1u64); 2]];
        assert!(matches!(
            R1cs::new(
                ConstraintMatrix::new(one.clone()),
                ConstraintMatrix::new(short),
                ConstraintMatrix::new(one.clone()),
                1,
                1
            ),
            Err(Error::Structural(StructuralError::RowLength { matrix: 'B', .. }))
        ));
        assert!(matches!(
            R1cs::new(
                ConstraintMatrix::new(one.clone()),
                ConstraintMatrix::new(vec![]),
                ConstraintMatrix::new(one),
                1,
                1
            ),
            Err(Error::Structural(StructuralError::ConstraintCountMismatch { .. }))
        ));
    }

    #[test]
    fn synthesized_circuit_matches_hand_written_matrices() {
        let (r1cs, witness) = R1cs::synthesize(MultiplyCircuit {
            a: Some(Fr::from(2u64)),
            b: Some(Fr::from(3u64)),
        })
        .unwrap();
        assert_eq!(r1cs, multiplication_r1cs());
        let expected: Vec<Fr> = [1u64, 6, 2, 3].iter().map(|&x| Fr::from(x)).collect();
        assert_eq!(witness.values(), &expected[..]);

        let shape = R1cs::synthesize_setup(MultiplyCircuit { a: None, b: None }).unwrap();
        assert_eq!(shape, r1cs);
    }
}
