//! # Identity Newtypes
//!
//! Role-specific identifiers. You cannot pass a [`ForkId`] where a
//! [`LaneId`] is expected, and each identifier renders as a logic constant
//! carrying its role prefix:
//!
//! | Type | Prefix | Example constant |
//! |---|---|---|
//! | [`VehicleId`] | `v_` | `v_car7` |
//! | [`ForkId`] | `f_` | `f_north` |
//! | [`ExitId`] | `e_` | `e_west` |
//! | [`LaneId`] | `l_` | `l_north_to_west` |
//!
//! ## Validation
//!
//! Names are validated at construction: non-empty ASCII alphanumerics and
//! underscores only. With the lowercase prefix in front, every constant is a
//! valid symbol for both the in-process evaluator and clingo.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn validate_name(kind: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidIdentifier {
            kind,
            value: name.to_string(),
        });
    }
    Ok(())
}

macro_rules! role_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Role prefix used when rendering this identifier as a logic constant.
            pub const PREFIX: &'static str = $prefix;

            /// Create an identifier from a bare (unprefixed) name.
            pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
                let name = name.into();
                validate_name($kind, &name)?;
                Ok(Self(name))
            }

            /// The bare name, without role prefix.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The role-prefixed logic constant.
            pub fn constant(&self) -> String {
                format!("{}{}", Self::PREFIX, self.0)
            }

            /// Recover an identifier from its role-prefixed constant.
            ///
            /// Returns `None` if the prefix is missing or the remainder is
            /// not a valid name.
            pub fn from_constant(constant: &str) -> Option<Self> {
                constant
                    .strip_prefix(Self::PREFIX)
                    .and_then(|name| Self::new(name).ok())
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

role_identifier!(
    /// Identity of a live vehicle agent. Unique among agents currently
    /// inside the monitored region.
    VehicleId,
    "vehicle",
    "v_"
);

role_identifier!(
    /// Identity of an entry point ("fork") where vehicles arrive.
    ForkId,
    "fork",
    "f_"
);

role_identifier!(
    /// Identity of an exit point where vehicles leave the intersection.
    ExitId,
    "exit",
    "e_"
);

role_identifier!(
    /// Identity of a lane connecting one fork to one exit.
    LaneId,
    "lane",
    "l_"
);

impl LaneId {
    /// The canonical lane name for a fork/exit pairing: `<fork>_to_<exit>`.
    pub fn between(fork: &ForkId, exit: &ExitId) -> Self {
        // Both halves are already validated; the joiner is in the allowed set.
        Self(format!("{}_to_{}", fork.as_str(), exit.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_constant_has_prefix() {
        let id = VehicleId::new("car7").unwrap();
        assert_eq!(id.constant(), "v_car7");
        assert_eq!(id.to_string(), "car7");
    }

    #[test]
    fn from_constant_strips_prefix() {
        let id = ForkId::from_constant("f_north").unwrap();
        assert_eq!(id.as_str(), "north");
    }

    #[test]
    fn from_constant_rejects_wrong_prefix() {
        assert!(VehicleId::from_constant("f_north").is_none());
        assert!(VehicleId::from_constant("v_").is_none());
        assert!(VehicleId::from_constant("car").is_none());
    }

    #[test]
    fn rejects_empty_and_punctuated_names() {
        assert!(VehicleId::new("").is_err());
        assert!(VehicleId::new("car-1").is_err());
        assert!(ExitId::new("west exit").is_err());
        assert!(ForkId::new("north_1").is_ok());
    }

    #[test]
    fn lane_between_fork_and_exit() {
        let fork = ForkId::new("north").unwrap();
        let exit = ExitId::new("west").unwrap();
        let lane = LaneId::between(&fork, &exit);
        assert_eq!(lane.as_str(), "north_to_west");
        assert_eq!(lane.constant(), "l_north_to_west");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: ForkId = serde_yaml::from_str("north").unwrap();
        assert_eq!(ok.as_str(), "north");
        let bad: Result<ForkId, _> = serde_yaml::from_str("\"no rth\"");
        assert!(bad.is_err());
    }

    #[test]
    fn ordering_is_lexicographic_by_name() {
        let a = VehicleId::new("a").unwrap();
        let b = VehicleId::new("b").unwrap();
        assert!(a < b);
    }
}
