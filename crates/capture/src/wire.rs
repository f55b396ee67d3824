//! Serde helpers for the remote engine's JSON conventions.

use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};

/// Reads JSON `null` as the type's default.
///
/// The remote engine writes `null` for unset strings and sequences; the domain
/// types treat those as empty.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads JSON `null` as if the engine had sent an empty string.
///
/// For string-backed types with no `Default`, such as identifiers.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(value),
        None => T::deserialize("".into_deserializer()),
    }
}
