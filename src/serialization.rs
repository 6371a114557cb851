//! `serde` adapters for algebraic values.
//!
//! Field elements are written as decimal big-integer strings. Group elements
//! (and anything else with a canonical encoding) are written as hex strings of
//! their compressed `ark-serialize` bytes, so deserialization runs the usual
//! on-curve and subgroup checks.
use crate::{error::Error, Result};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{string::String, string::ToString, vec::Vec};
use core::str::FromStr;
use num_bigint::BigUint;
use serde::Deserialize;

pub fn field_to_string<F: PrimeField>(f: &F) -> String {
    let n: BigUint = (*f).into();
    n.to_string()
}

/// Parse a decimal integer, optionally negative, reduced into the field.
pub fn parse_field<F: PrimeField>(s: &str) -> Result<F> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let n = BigUint::from_str(digits)
        .map_err(|e| Error::Parse(format!("invalid field element {s:?}: {e}")))?;
    let f = F::from(n);
    Ok(if negative { -f } else { f })
}

pub fn encode_canonical<T: CanonicalSerialize>(t: &T) -> core::result::Result<String, SerializationError> {
    let mut bytes = Vec::with_capacity(t.compressed_size());
    t.serialize_compressed(&mut bytes)?;
    Ok(hex::encode(bytes))
}

pub fn decode_canonical<T: CanonicalDeserialize>(s: &str) -> Result<T> {
    let bytes = hex::decode(s).map_err(|e| Error::Parse(format!("invalid hex encoding: {e}")))?;
    Ok(T::deserialize_compressed(&bytes[..])?)
}

/// Accepts a JSON number or a decimal string.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl FieldRepr {
    fn into_field<F: PrimeField>(self) -> Result<F> {
        match self {
            FieldRepr::Unsigned(n) => Ok(F::from(n)),
            FieldRepr::Signed(n) => Ok(-F::from(n.unsigned_abs())),
            FieldRepr::Text(s) => parse_field(&s),
        }
    }
}

pub mod field {
    use super::*;
    use serde::{de::Error as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer, F: PrimeField>(f: &F, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.serialize_str(&field_to_string(f))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, F: PrimeField>(d: D) -> core::result::Result<F, D::Error> {
        FieldRepr::deserialize(d)?.into_field().map_err(D::Error::custom)
    }
}

pub mod field_vec {
    use super::*;
    use serde::{de::Error as _, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer, F: PrimeField>(v: &Vec<F>, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.collect_seq(v.iter().map(field_to_string))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, F: PrimeField>(d: D) -> core::result::Result<Vec<F>, D::Error> {
        Vec::<FieldRepr>::deserialize(d)?
            .into_iter()
            .map(FieldRepr::into_field)
            .collect::<Result<Vec<_>>>()
            .map_err(D::Error::custom)
    }
}

pub mod field_matrix {
    use super::*;
    use serde::{de::Error as _, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer, F: PrimeField>(m: &Vec<Vec<F>>, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.collect_seq(
            m.iter()
                .map(|row| row.iter().map(field_to_string).collect::<Vec<_>>()),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>, F: PrimeField>(
        d: D,
    ) -> core::result::Result<Vec<Vec<F>>, D::Error> {
        Vec::<Vec<FieldRepr>>::deserialize(d)?
            .into_iter()
            .map(|row| row.into_iter().map(FieldRepr::into_field).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()
            .map_err(D::Error::custom)
    }
}

pub mod canonical {
    use super::*;
    use serde::{de::Error as _, ser::Error as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: CanonicalSerialize>(t: &T, s: S) -> core::result::Result<S::Ok, S::Error> {
        s.serialize_str(&encode_canonical(t).map_err(S::Error::custom)?)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, T: CanonicalDeserialize>(
        d: D,
    ) -> core::result::Result<T, D::Error> {
        let s = String::deserialize(d)?;
        decode_canonical(&s).map_err(D::Error::custom)
    }
}

pub mod canonical_vec {
    use super::*;
    use serde::{de::Error as _, ser::Error as _, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer, T: CanonicalSerialize>(v: &Vec<T>, s: S) -> core::result::Result<S::Ok, S::Error> {
        let encoded = v
            .iter()
            .map(encode_canonical)
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(S::Error::custom)?;
        s.collect_seq(encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, T: CanonicalDeserialize>(
        d: D,
    ) -> core::result::Result<Vec<T>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| decode_canonical(s))
            .collect::<Result<Vec<_>>>()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_ec::AffineRepr;
    use ark_ff::{One, Zero};
    use serde::Serialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        #[serde(with = "field")]
        scalar: Fr,
        #[serde(with = "field_vec")]
        scalars: Vec<Fr>,
        #[serde(with = "canonical")]
        g1: G1Affine,
        #[serde(with = "canonical_vec")]
        g2s: Vec<G2Affine>,
    }

    #[test]
    fn field_elements_are_decimal_strings() {
        assert_eq!(field_to_string(&Fr::zero()), "0");
        assert_eq!(field_to_string(&Fr::from(1234u64)), "1234");
        assert_eq!(parse_field::<Fr>("0").unwrap(), Fr::zero());
        assert_eq!(parse_field::<Fr>("-1").unwrap(), -Fr::one());
        assert!(matches!(parse_field::<Fr>("12a"), Err(Error::Parse(_))));
    }

    #[test]
    fn json_uses_strings_and_accepts_numbers() {
        let sample = Sample {
            scalar: -Fr::one(),
            scalars: vec![Fr::zero(), Fr::from(6u64)],
            g1: G1Affine::generator(),
            g2s: vec![G2Affine::generator(), G2Affine::zero()],
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["scalars"], serde_json::json!(["0", "6"]));
        assert!(json["g1"].is_string());

        let back: Sample = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, sample);

        let mut numeric = json;
        numeric["scalars"] = serde_json::json!([0, 6]);
        numeric["scalar"] = serde_json::json!(-1);
        let back: Sample = serde_json::from_value(numeric).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn corrupt_group_element_is_rejected() {
        assert!(decode_canonical::<G1Affine>("zz").is_err());
        assert!(decode_canonical::<G1Affine>(&"00".repeat(48)).is_err());
    }
}
