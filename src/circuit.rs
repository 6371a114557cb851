//! A JSON description of a constraint system over named signals.
//!
//! ```json
//! {
//!   "public": ["c"],
//!   "private": ["a", "b"],
//!   "constraints": [ { "a": { "a": "1" }, "b": { "b": "1" }, "c": { "c": "1" } } ]
//! }
//! ```
//!
//! `one` names the constant wire. Signals that are neither public nor private
//! are intermediates, numbered in order of first appearance.
use crate::{
    error::Error,
    r1cs::{ConstraintMatrix, R1cs, Witness},
    serialization::parse_field,
    Result,
};
use ark_ff::PrimeField;
use ark_std::{collections::BTreeMap, string::String, vec::Vec};
use serde::{Deserialize, Serialize};

pub const ONE: &str = "one";

/// Signal name to decimal coefficient.
pub type LinearCombination = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDescription {
    #[serde(default)]
    pub a: LinearCombination,
    #[serde(default)]
    pub b: LinearCombination,
    #[serde(default)]
    pub c: LinearCombination,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    #[serde(default)]
    pub public: Vec<String>,
    #[serde(default)]
    pub private: Vec<String>,
    pub constraints: Vec<ConstraintDescription>,
}

/// An R1CS together with the name of every wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CompiledCircuit<F: PrimeField> {
    pub signals: Vec<String>,
    pub r1cs: R1cs<F>,
}

impl CircuitDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse(format!("circuit description: {e}")))
    }

    /// Lower the description to constraint matrices.
    #[tracing::instrument(skip_all, name = "CircuitDescription::compile")]
    pub fn compile<F: PrimeField>(&self) -> Result<CompiledCircuit<F>> {
        let mut signals: Vec<String> = vec![ONE.into()];
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        index.insert(ONE.into(), 0);

        for name in self.public.iter().chain(&self.private) {
            if name == ONE {
                return Err(Error::Parse(format!("{ONE:?} is reserved for the constant wire")));
            }
            if index.insert(name.clone(), signals.len()).is_some() {
                return Err(Error::Parse(format!("signal {name:?} declared twice")));
            }
            signals.push(name.clone());
        }
        for constraint in &self.constraints {
            for name in constraint.a.keys().chain(constraint.b.keys()).chain(constraint.c.keys()) {
                if !index.contains_key(name) {
                    index.insert(name.clone(), signals.len());
                    signals.push(name.clone());
                }
            }
        }

        let num_wires = signals.len();
        let lower = |lc: &LinearCombination| -> Result<Vec<F>> {
            let mut row = vec![F::zero(); num_wires];
            for (name, coeff) in lc {
                row[index[name]] += parse_field::<F>(coeff)?;
            }
            Ok(row)
        };

        let mut a = Vec::with_capacity(self.constraints.len());
        let mut b = Vec::with_capacity(self.constraints.len());
        let mut c = Vec::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            a.push(lower(&constraint.a)?);
            b.push(lower(&constraint.b)?);
            c.push(lower(&constraint.c)?);
        }

        let r1cs = R1cs::new(
            ConstraintMatrix::new(a),
            ConstraintMatrix::new(b),
            ConstraintMatrix::new(c),
            self.public.len(),
            self.private.len(),
        )?;
        tracing::debug!(
            constraints = r1cs.num_constraints(),
            wires = num_wires,
            "compiled circuit"
        );
        Ok(CompiledCircuit { signals, r1cs })
    }
}

impl<F: PrimeField> CompiledCircuit<F> {
    pub fn evaluate_witness(&self, private_inputs: &[F], public_inputs: &[F]) -> Result<Witness<F>> {
        self.r1cs.evaluate_witness(private_inputs, public_inputs)
    }

    pub fn signal_index(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::tests::{cubic_r1cs, multiplication_r1cs};
    use ark_bls12_381::Fr;

    const MULTIPLY: &str = r#"{
        "public": ["c"],
        "private": ["a", "b"],
        "constraints": [ { "a": { "a": "1" }, "b": { "b": "1" }, "c": { "c": "1" } } ]
    }"#;

    const CUBIC: &str = r#"{
        "public": ["out"],
        "private": ["x"],
        "constraints": [
            { "a": { "x": "1" }, "b": { "x": "1" }, "c": { "sym_1": "1" } },
            { "a": { "sym_1": "1" }, "b": { "x": "1" }, "c": { "y": "1" } },
            { "a": { "x": "1", "y": "1" }, "b": { "one": "1" }, "c": { "sym_2": "1" } },
            { "a": { "sym_2": "1", "one": "5" }, "b": { "one": "1" }, "c": { "out": "1" } }
        ]
    }"#;

    #[test]
    fn compiles_multiplication_gate() {
        let compiled = CircuitDescription::from_json(MULTIPLY)
            .unwrap()
            .compile::<Fr>()
            .unwrap();
        assert_eq!(compiled.signals, vec!["one", "c", "a", "b"]);
        assert_eq!(compiled.r1cs, multiplication_r1cs());
    }

    #[test]
    fn intermediates_follow_first_appearance() {
        let compiled = CircuitDescription::from_json(CUBIC)
            .unwrap()
            .compile::<Fr>()
            .unwrap();
        assert_eq!(compiled.signals, vec!["one", "out", "x", "sym_1", "y", "sym_2"]);
        assert_eq!(compiled.r1cs, cubic_r1cs());

        let w = compiled
            .evaluate_witness(&[Fr::from(3u64)], &[Fr::from(35u64)])
            .unwrap();
        assert_eq!(w.values()[compiled.signal_index("y").unwrap()], Fr::from(27u64));
    }

    #[test]
    fn rejects_malformed_descriptions() {
        assert!(matches!(
            CircuitDescription::from_json("{ \"public\": [] }"),
            Err(Error::Parse(_))
        ));

        let dup = r#"{ "public": ["a"], "private": ["a"], "constraints": [] }"#;
        assert!(matches!(
            CircuitDescription::from_json(dup).unwrap().compile::<Fr>(),
            Err(Error::Parse(_))
        ));

        let reserved = r#"{ "public": ["one"], "constraints": [] }"#;
        assert!(matches!(
            CircuitDescription::from_json(reserved).unwrap().compile::<Fr>(),
            Err(Error::Parse(_))
        ));

        let bad_coeff = r#"{ "constraints": [ { "a": { "x": "two" } } ] }"#;
        assert!(matches!(
            CircuitDescription::from_json(bad_coeff).unwrap().compile::<Fr>(),
            Err(Error::Parse(_))
        ));
    }
}
