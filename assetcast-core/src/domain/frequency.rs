//! Resample frequency — the closed set of period lengths upstream APIs accept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Resample frequency for a bar request.
///
/// The `Display` form is the token the Tiingo API accepts as `resampleFreq`
/// (`daily`, `weekly`, `monthly`, `annually` for the equity endpoint;
/// `5min`, `4hour`, `1day`-style tokens for the crypto endpoint). The same
/// token is embedded in cache-key file names, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Annually,
    Minutes(u32),
    Hours(u32),
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Annually => write!(f, "annually"),
            Frequency::Minutes(n) => write!(f, "{n}min"),
            Frequency::Hours(n) => write!(f, "{n}hour"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown frequency token: '{0}' (expected daily, weekly, monthly, annually, <n>min, or <n>hour)")]
pub struct FrequencyParseError(String);

impl FromStr for Frequency {
    type Err = FrequencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => return Ok(Frequency::Daily),
            "weekly" => return Ok(Frequency::Weekly),
            "monthly" => return Ok(Frequency::Monthly),
            "annually" => return Ok(Frequency::Annually),
            _ => {}
        }
        if let Some(n) = s.strip_suffix("min") {
            if let Ok(n) = n.parse::<u32>() {
                if n > 0 {
                    return Ok(Frequency::Minutes(n));
                }
            }
        }
        if let Some(n) = s.strip_suffix("hour") {
            if let Ok(n) = n.parse::<u32>() {
                if n > 0 {
                    return Ok(Frequency::Hours(n));
                }
            }
        }
        Err(FrequencyParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_produces_upstream_tokens() {
        assert_eq!(Frequency::Daily.to_string(), "daily");
        assert_eq!(Frequency::Minutes(5).to_string(), "5min");
        assert_eq!(Frequency::Hours(4).to_string(), "4hour");
    }

    #[test]
    fn parse_roundtrip() {
        for token in ["daily", "weekly", "monthly", "annually", "5min", "1hour"] {
            let freq: Frequency = token.parse().unwrap();
            assert_eq!(freq.to_string(), token);
        }
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert!("0min".parse::<Frequency>().is_err());
        assert!("min".parse::<Frequency>().is_err());
    }
}
