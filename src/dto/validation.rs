//! Plate validation and the messages shown for each validation outcome.

use thiserror::Error;

/// Number of characters a plate must have.
pub const PLATE_LENGTH: usize = 8;

/// Classification produced by [`validate_plate`].
///
/// The discriminants are the numeric codes written to the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlateErrorCode {
    /// The plate passed validation.
    Ok = 0,
    /// No plate, or an empty one, was supplied.
    Missing = 1,
    /// The plate does not have exactly [`PLATE_LENGTH`] characters.
    Invalid = 2,
}

impl PlateErrorCode {
    /// Numeric form of the code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the plate passed validation.
    pub fn is_ok(self) -> bool {
        self == PlateErrorCode::Ok
    }
}

/// Raised when a numeric code does not match any [`PlateErrorCode`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown plate error code {0}")]
pub struct UnknownErrorCode(pub u8);

impl TryFrom<u8> for PlateErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlateErrorCode::Ok),
            1 => Ok(PlateErrorCode::Missing),
            2 => Ok(PlateErrorCode::Invalid),
            other => Err(UnknownErrorCode(other)),
        }
    }
}

/// Classify a candidate plate.
///
/// Only the length is checked: no trimming, case folding or regional format rules are applied.
/// Length is counted in characters, not bytes.
///
/// # Examples
///
/// ```ignore
/// validate_plate(Some("ABC-1234")) // PlateErrorCode::Ok
/// validate_plate(Some(""))         // PlateErrorCode::Missing
/// validate_plate(Some("ABC123"))   // PlateErrorCode::Invalid
/// ```
pub fn validate_plate(candidate: Option<&str>) -> PlateErrorCode {
    match candidate {
        None | Some("") => PlateErrorCode::Missing,
        Some(plate) if plate.chars().count() != PLATE_LENGTH => PlateErrorCode::Invalid,
        Some(_) => PlateErrorCode::Ok,
    }
}

/// Human-readable message for a validation outcome. Empty for [`PlateErrorCode::Ok`].
pub fn message_for(code: PlateErrorCode) -> &'static str {
    match code {
        PlateErrorCode::Ok => "",
        PlateErrorCode::Missing => "plate not provided",
        PlateErrorCode::Invalid => "invalid plate",
    }
}

/// Message lookup for raw numeric codes; unknown codes map to an empty message.
pub fn message_for_code(code: u8) -> &'static str {
    PlateErrorCode::try_from(code)
        .map(message_for)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plate_valid() {
        assert_eq!(validate_plate(Some("ABC-1234")), PlateErrorCode::Ok);
        assert_eq!(validate_plate(Some("abc12345")), PlateErrorCode::Ok);
        assert_eq!(validate_plate(Some("        ")), PlateErrorCode::Ok); // not trimmed
    }

    #[test]
    fn test_validate_plate_missing() {
        assert_eq!(validate_plate(None), PlateErrorCode::Missing);
        assert_eq!(validate_plate(Some("")), PlateErrorCode::Missing);
    }

    #[test]
    fn test_validate_plate_invalid_length() {
        assert_eq!(validate_plate(Some("ABC1234")), PlateErrorCode::Invalid); // too short
        assert_eq!(validate_plate(Some("ABC-12345")), PlateErrorCode::Invalid); // too long
        assert_eq!(validate_plate(Some(" ")), PlateErrorCode::Invalid);
    }

    #[test]
    fn test_validate_plate_never_ok_unless_eight_chars() {
        for len in 0..20 {
            let candidate = "X".repeat(len);
            let code = validate_plate(Some(&candidate));
            if len == PLATE_LENGTH {
                assert_eq!(code, PlateErrorCode::Ok);
            } else {
                assert_ne!(code, PlateErrorCode::Ok, "length {len}");
            }
        }
    }

    #[test]
    fn test_validate_plate_counts_characters() {
        assert_eq!(validate_plate(Some("ÁBÇ-1234")), PlateErrorCode::Ok);
    }

    #[test]
    fn test_messages() {
        let missing = message_for(PlateErrorCode::Missing);
        let invalid = message_for(PlateErrorCode::Invalid);
        assert!(!missing.is_empty());
        assert!(!invalid.is_empty());
        assert_ne!(missing, invalid);
        assert_eq!(message_for(PlateErrorCode::Ok), "");
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(PlateErrorCode::Invalid.code(), 2);
        assert_eq!(PlateErrorCode::try_from(1), Ok(PlateErrorCode::Missing));
        assert_eq!(PlateErrorCode::try_from(7), Err(UnknownErrorCode(7)));
        assert_eq!(message_for_code(2), "invalid plate");
        assert_eq!(message_for_code(7), "");
    }
}
