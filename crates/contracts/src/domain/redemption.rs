use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp format used in issuance records, e.g. `2025-01-31 14:02:59`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single-use 4-digit token authorizing one certificate issuance.
///
/// User input must be exactly four ASCII digits; leading zeros are
/// preserved when the code is rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedemptionCode(u16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeParseError {
    #[error("code must be exactly 4 digits")]
    Format,
    #[error("code out of range: {0}")]
    Range(u32),
}

impl RedemptionCode {
    /// Builds a code from an already-parsed integer (e.g. a line of the
    /// codes file). Values above 9999 cannot be a 4-digit code.
    pub fn new(value: u32) -> Result<Self, CodeParseError> {
        if value > 9999 {
            return Err(CodeParseError::Range(value));
        }
        Ok(Self(value as u16))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for RedemptionCode {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeParseError::Format);
        }
        // Four ASCII digits always fit in u16.
        Ok(Self(s.parse::<u16>().map_err(|_| CodeParseError::Format)?))
    }
}

impl fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl TryFrom<String> for RedemptionCode {
    type Error = CodeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RedemptionCode> for String {
    fn from(code: RedemptionCode) -> Self {
        code.to_string()
    }
}

/// Form submission for a certificate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionRequest {
    pub code: String,
    #[serde(rename = "holderName")]
    pub holder_name: String,
    #[serde(rename = "holderId")]
    pub holder_id: String,
}

/// One durable audit line written per successful redemption.
/// Never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub timestamp: String,
    pub code: RedemptionCode,
    #[serde(rename = "holderName")]
    pub holder_name: String,
    #[serde(rename = "holderId")]
    pub holder_id: String,
}

impl IssuanceRecord {
    /// Creates a record stamped with the current local time.
    pub fn now(code: RedemptionCode, holder_name: &str, holder_id: &str) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            code,
            holder_name: holder_name.to_string(),
            holder_id: holder_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_code() {
        let code: RedemptionCode = "1234".parse().unwrap();
        assert_eq!(code.value(), 1234);
        assert_eq!(code.to_string(), "1234");
    }

    #[test]
    fn preserves_leading_zeros() {
        let code: RedemptionCode = "0042".parse().unwrap();
        assert_eq!(code.value(), 42);
        assert_eq!(code.to_string(), "0042");
    }

    #[test]
    fn rejects_bad_input() {
        assert!("12a4".parse::<RedemptionCode>().is_err());
        assert!("123".parse::<RedemptionCode>().is_err());
        assert!("12345".parse::<RedemptionCode>().is_err());
        assert!("".parse::<RedemptionCode>().is_err());
        assert!(" 123".parse::<RedemptionCode>().is_err());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(RedemptionCode::new(10_000).is_err());
        assert!(RedemptionCode::new(9999).is_ok());
    }

    #[test]
    fn record_timestamp_matches_format() {
        let record = IssuanceRecord::now("1234".parse().unwrap(), "Asha Rao", "2021CS01");
        assert!(chrono::NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn code_serializes_as_string() {
        let code: RedemptionCode = "0042".parse().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"0042\"");
        let back: RedemptionCode = serde_json::from_str("\"0042\"").unwrap();
        assert_eq!(back, code);
    }
}
