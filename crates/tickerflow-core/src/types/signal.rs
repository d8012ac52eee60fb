//! Categorical trading signals.
//!
//! Both families are closed enums so classification is exhaustive at
//! compile time, and both default to `Neutral`; a row that satisfies no
//! rule keeps that value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trend-following classification of one indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Neutral,
    Uptrend,
    Downtrend,
}

impl Trend {
    /// Store label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Neutral => "neutral",
            Trend::Uptrend => "uptrend",
            Trend::Downtrend => "downtrend",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(Trend::Neutral),
            "uptrend" => Ok(Trend::Uptrend),
            "downtrend" => Ok(Trend::Downtrend),
            other => Err(format!("unknown trend label: {other}")),
        }
    }
}

/// Mean-reversion classification of one indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Reversion {
    #[default]
    Neutral,
    Buy,
    Sell,
}

impl Reversion {
    /// Store label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reversion::Neutral => "neutral",
            Reversion::Buy => "buy",
            Reversion::Sell => "sell",
        }
    }
}

impl fmt::Display for Reversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(Reversion::Neutral),
            "buy" => Ok(Reversion::Buy),
            "sell" => Ok(Reversion::Sell),
            other => Err(format!("unknown reversion label: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_labels_round_trip() {
        for trend in [Trend::Neutral, Trend::Uptrend, Trend::Downtrend] {
            let parsed: Trend = trend.as_str().parse().unwrap();
            assert_eq!(parsed, trend);
        }
        assert!("sideways".parse::<Trend>().is_err());
    }

    #[test]
    fn test_reversion_labels_round_trip() {
        for signal in [Reversion::Neutral, Reversion::Buy, Reversion::Sell] {
            let parsed: Reversion = signal.as_str().parse().unwrap();
            assert_eq!(parsed, signal);
        }
        assert!("short".parse::<Reversion>().is_err());
    }

    #[test]
    fn test_defaults_are_neutral() {
        assert_eq!(Trend::default(), Trend::Neutral);
        assert_eq!(Reversion::default(), Reversion::Neutral);
    }
}
