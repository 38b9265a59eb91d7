use serde::{Deserialize, Serialize};

use lockera_core::DomainError;

/// A normalized activation code (trimmed, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialCode(String);

impl SerialCode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingField("serial"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SerialCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-time activation code and its consumed flag.
///
/// # Invariants
/// - `used` only ever moves from `false` to `true`.
/// - A consumed serial never authorizes another registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serial {
    pub serial: String,
    #[serde(default)]
    pub used: bool,
}

impl Serial {
    pub fn new(code: SerialCode) -> Self {
        Self {
            serial: code.into_string(),
            used: false,
        }
    }

    pub fn matches(&self, code: &SerialCode) -> bool {
        self.serial == code.as_str()
    }

    pub fn is_available(&self) -> bool {
        !self.used
    }

    /// Mark the serial consumed. Fails if it already was.
    pub fn consume(&mut self) -> Result<(), DomainError> {
        if self.used {
            return Err(DomainError::invariant("serial already consumed"));
        }
        self.used = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(SerialCode::parse("  ABC123 ").unwrap().as_str(), "ABC123");
        assert_eq!(
            SerialCode::parse("   ").unwrap_err(),
            DomainError::MissingField("serial")
        );
    }

    #[test]
    fn consume_is_one_way() {
        let mut serial = Serial::new(SerialCode::parse("ABC123").unwrap());
        assert!(serial.is_available());

        serial.consume().unwrap();
        assert!(!serial.is_available());

        let err = serial.consume().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(serial.used);
    }

    #[test]
    fn legacy_records_without_flag_load_as_unused() {
        let serial: Serial = serde_json::from_str(r#"{"serial":"XYZ"}"#).unwrap();
        assert!(serial.is_available());
    }
}
