//! # Turn Signals
//!
//! The turn-signal vocabulary shared by vehicles (what they show) and lanes
//! (what they require). Rendered as bare logic constants.

use serde::{Deserialize, Serialize};

/// A turn-signal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSignal {
    /// No indicator.
    #[default]
    Off,
    /// Right indicator.
    Right,
    /// Left indicator.
    Left,
    /// Hazard lights. Vehicles only; never required by a lane.
    Emergency,
}

impl TurnSignal {
    /// The logic constant for this signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Right => "right",
            Self::Left => "left",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for TurnSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_lowercase() {
        assert_eq!(TurnSignal::Off.to_string(), "off");
        assert_eq!(TurnSignal::Left.to_string(), "left");
        assert_eq!(TurnSignal::Right.to_string(), "right");
        assert_eq!(TurnSignal::Emergency.to_string(), "emergency");
    }

    #[test]
    fn serde_uses_constant_names() {
        let s: TurnSignal = serde_yaml::from_str("left").unwrap();
        assert_eq!(s, TurnSignal::Left);
        assert_eq!(TurnSignal::default(), TurnSignal::Off);
    }
}
