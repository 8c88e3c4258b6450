//! Environment variables and secret bindings for application documents
//!
//! The scheduler's wire format splits one logical concern across two JSON
//! maps: `env` holds literal values and secret-reference markers side by
//! side, and `secrets` holds the source each referenced secret is fetched
//! from. This module defines the value-level types and their wire shapes;
//! the document-level join between the two maps lives in [`crate::wire`].

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Field name marking an `env` entry as a secret reference.
///
/// The spelling is part of the scheduler's wire protocol and must match the
/// deployed API version exactly.
pub(crate) const SECRET_MARKER: &str = "secret";

/// Value slot of a single environment variable.
///
/// On the wire a plain value is a bare JSON string, while a secret reference
/// is a single-field object naming the secret that supplies the value at
/// deploy time:
///
/// ```json
/// {
///   "DATABASE_NAME": "orders",
///   "DATABASE_PASSWORD": { "secret": "db-pass" }
/// }
/// ```
///
/// Decoding dispatches on the JSON type of the value; anything other than a
/// string or an object is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// A literal value, known entirely client-side
    Plain(String),
    /// A reference to a named secret, resolved by the scheduler at deploy time
    SecretRef(String),
}

impl EnvValue {
    /// Check if this slot holds a literal value
    #[must_use]
    pub fn is_plain(&self) -> bool {
        matches!(self, EnvValue::Plain(_))
    }

    /// Check if this slot references a secret
    #[must_use]
    pub fn is_secret_ref(&self) -> bool {
        matches!(self, EnvValue::SecretRef(_))
    }

    /// The literal value, if this slot holds one
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            EnvValue::Plain(value) => Some(value),
            EnvValue::SecretRef(_) => None,
        }
    }

    /// The referenced secret name, if this slot holds one
    #[must_use]
    pub fn as_secret_ref(&self) -> Option<&str> {
        match self {
            EnvValue::Plain(_) => None,
            EnvValue::SecretRef(name) => Some(name),
        }
    }
}

impl Serialize for EnvValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EnvValue::Plain(value) => serializer.serialize_str(value),
            EnvValue::SecretRef(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(SECRET_MARKER, name)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for EnvValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvValueVisitor;

        impl<'de> Visitor<'de> for EnvValueVisitor {
            type Value = EnvValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a secret reference object")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
                Ok(EnvValue::Plain(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
                Ok(EnvValue::Plain(v))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // The marker key itself is not inspected: the first field's
                // value names the secret, and any further fields are drained
                // and ignored.
                let Some((_, name)) = map.next_entry::<IgnoredAny, String>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(EnvValue::SecretRef(name))
            }
        }

        deserializer.deserialize_any(EnvValueVisitor)
    }
}

/// A named secret's binding: which environment variable exposes it and where
/// the scheduler fetches its value from.
///
/// Only `source` crosses the wire (under `secrets.<name>`); the variable
/// binding travels as the marker object inside `env` and is reconstructed
/// when the document is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    /// Environment variable the secret is exposed through.
    ///
    /// Empty when the secret was declared in `secrets` but never referenced
    /// from `env` (an orphaned secret, preserved as-is on decode).
    pub env_var: String,
    /// Opaque location the secret's value is fetched from (e.g. a path in an
    /// external secret store)
    pub source: String,
}

impl Secret {
    /// Create a secret binding
    #[must_use]
    pub fn new(env_var: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            source: source.into(),
        }
    }
}
