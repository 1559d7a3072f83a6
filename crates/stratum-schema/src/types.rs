//! Identifier newtypes and the closed set of instance backends.
//!
//! Newtypes serialize/deserialize as plain strings so definitions stay readable.

use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Instance name, unique within a project.
    InstanceName
);

string_newtype!(
    /// Project an instance belongs to.
    ProjectName
);

/// Project used when a definition does not name one.
pub const DEFAULT_PROJECT: &str = "default";

/// Instance backend tag.
///
/// `Any` is only meaningful as a filter; it never selects a backend, so every
/// constructor rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "InstanceTypeRepr", into = "String")]
pub enum InstanceType {
    Any,
    Container,
    Vm,
}

impl InstanceType {
    pub fn code(self) -> i32 {
        match self {
            InstanceType::Any => -1,
            InstanceType::Container => 0,
            InstanceType::Vm => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceType::Any => "any",
            InstanceType::Container => "container",
            InstanceType::Vm => "virtual-machine",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for InstanceType {
    type Error = SchemaError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(InstanceType::Any),
            0 => Ok(InstanceType::Container),
            1 => Ok(InstanceType::Vm),
            other => Err(SchemaError::InvalidInstanceType(other.to_string())),
        }
    }
}

impl FromStr for InstanceType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(InstanceType::Any),
            "container" => Ok(InstanceType::Container),
            "virtual-machine" | "vm" => Ok(InstanceType::Vm),
            other => Err(SchemaError::InvalidInstanceType(other.to_owned())),
        }
    }
}

impl From<InstanceType> for String {
    fn from(t: InstanceType) -> Self {
        t.as_str().to_owned()
    }
}

/// Wire form of [`InstanceType`]: either the numeric code or the name.
#[derive(Deserialize)]
#[serde(untagged)]
enum InstanceTypeRepr {
    Code(i32),
    Name(String),
}

impl TryFrom<InstanceTypeRepr> for InstanceType {
    type Error = SchemaError;

    fn try_from(repr: InstanceTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            InstanceTypeRepr::Code(code) => InstanceType::try_from(code),
            InstanceTypeRepr::Name(name) => name.parse(),
        }
    }
}
