//! Bar timeframe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar aggregation interval supported by the providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    /// Daily bars
    #[serde(rename = "1d")]
    Day,
}

impl Timeframe {
    /// Parameter value for the Alpaca data API.
    pub fn as_alpaca(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1Min",
            Timeframe::Day => "1Day",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Minute1 => write!(f, "1m"),
            Timeframe::Day => write!(f, "1d"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "1d" | "1day" | "day" | "daily" => Ok(Timeframe::Day),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("1min".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!("1Day".parse::<Timeframe>().unwrap(), Timeframe::Day);
        assert!("4h".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_alpaca_labels() {
        assert_eq!(Timeframe::Minute1.as_alpaca(), "1Min");
        assert_eq!(Timeframe::Day.as_alpaca(), "1Day");
    }

    #[test]
    fn test_display_round_trip() {
        for tf in [Timeframe::Minute1, Timeframe::Day] {
            let parsed: Timeframe = tf.to_string().parse().unwrap();
            assert_eq!(parsed, tf);
        }
    }
}
