//! Serde helpers for the DeDust wire format.
//!
//! The API encodes 128-bit integers and some floats as JSON strings; older
//! responses carry plain numbers. These helpers accept both shapes and
//! serialize back to the string form the API uses today.

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

struct U128Visitor;

impl Visitor<'_> for U128Visitor {
    type Value = u128;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 128-bit unsigned integer or its string form")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
        Ok(u128::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
        Ok(value)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
        value
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
    }
}

struct F64Visitor;

impl Visitor<'_> for F64Visitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a float or its string form")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
        Ok(value as f64)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
        value
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
    }
}

struct WireU128(u128);

impl<'de> Deserialize<'de> for WireU128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(U128Visitor).map(WireU128)
    }
}

fn into_pair<E: de::Error>(values: Vec<WireU128>) -> Result<[u128; 2], E> {
    match values.as_slice() {
        [left, right] => Ok([left.0, right.0]),
        other => Err(de::Error::invalid_length(
            other.len(),
            &"exactly two values",
        )),
    }
}

/// A single `u128` encoded as a decimal string.
pub mod u128_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(U128Visitor)
    }
}

/// A two-element array of string-encoded `u128`s (reserves).
pub mod u128_pair {
    use super::*;

    pub fn serialize<S: Serializer>(value: &[u128; 2], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value.iter().map(u128::to_string))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u128; 2], D::Error> {
        into_pair(Vec::deserialize(deserializer)?)
    }
}

/// Optional two-element array of string-encoded `u128`s (stats).
pub mod u128_pair_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<[u128; 2]>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(pair) => serializer.collect_seq(pair.iter().map(u128::to_string)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<[u128; 2]>, D::Error> {
        Option::<Vec<WireU128>>::deserialize(deserializer)?
            .map(into_pair)
            .transpose()
    }
}

/// An `f64` that may arrive as a number or a string.
pub mod f64_flexible {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(F64Visitor)
    }
}

/// Optional `f64` that may arrive as a number, a string, or null.
pub mod f64_flexible_opt {
    use super::*;

    struct WireF64(f64);

    impl<'de> Deserialize<'de> for WireF64 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(F64Visitor).map(WireF64)
        }
    }

    pub fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Ok(Option::<WireF64>::deserialize(deserializer)?.map(|w| w.0))
    }
}
