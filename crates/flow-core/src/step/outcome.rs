use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discriminador devuelto por un step. Espacio abierto: cualquier string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeKey(Cow<'static, str>);

impl OutcomeKey {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for OutcomeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OutcomeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for OutcomeKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for OutcomeKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl PartialEq<str> for OutcomeKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for OutcomeKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Error al parsear un string hacia un enum declarado con `outcome_enum!`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome '{0}'")]
pub struct UnknownOutcome(pub String);
