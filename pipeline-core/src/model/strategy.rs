use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four trading styles the simulation step scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    Trend,
    Contrarian,
    Hedging,
    Swing,
}

impl Strategy {
    /// All strategies, in the order the simulation walks them.
    pub const ALL: [Strategy; 4] = [
        Strategy::Trend,
        Strategy::Contrarian,
        Strategy::Hedging,
        Strategy::Swing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Trend => "Trend",
            Strategy::Contrarian => "Contrarian",
            Strategy::Hedging => "Hedging",
            Strategy::Swing => "Swing",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown strategy label '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s.trim())
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

impl TryFrom<String> for Strategy {
    type Error = UnknownStrategy;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Momentum".parse::<Strategy>().unwrap_err();
        assert_eq!(err, UnknownStrategy("Momentum".to_string()));
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&Strategy::Hedging).unwrap();
        assert_eq!(json, "\"Hedging\"");
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Strategy::Hedging);
    }
}
