//! Spanish national ID (DNI / NIE) validation.
//!
//! A DNI is eight digits followed by a control letter. A NIE starts with
//! X, Y or Z, which stand for 0, 1 and 2 when computing the control letter,
//! followed by seven digits and the letter.

use std::fmt;

use thiserror::Error;

/// Control letters indexed by `number % 23`.
const CONTROL_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// National ID validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NationalIdError {
    /// Not shaped like a DNI or NIE.
    #[error("invalid DNI/NIE format")]
    InvalidFormat,
    /// Shape is right but the control letter does not match.
    #[error("invalid DNI/NIE control letter")]
    InvalidLetter,
}

/// A DNI or NIE as typed by the user.
#[derive(Debug, Clone, Eq)]
pub struct NationalId(String);

impl NationalId {
    /// Wrap a raw string without validating it.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remove spaces and hyphens and uppercase.
    pub fn normalize(&self) -> NationalId {
        let cleaned: String = self
            .0
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        NationalId(cleaned)
    }

    /// Whether this has the NIE shape (X/Y/Z + 7 digits + letter).
    pub fn is_nie(&self) -> bool {
        let upper = self.0.to_uppercase();
        let bytes = upper.as_bytes();
        bytes.len() == 9
            && matches!(bytes[0], b'X' | b'Y' | b'Z')
            && bytes[1..8].iter().all(u8::is_ascii_digit)
            && bytes[8].is_ascii_alphabetic()
    }

    fn is_dni_shape(&self) -> bool {
        let bytes = self.0.as_bytes();
        bytes.len() == 9
            && bytes[..8].iter().all(u8::is_ascii_digit)
            && bytes[8].is_ascii_alphabetic()
    }

    /// The eight-digit number used for the checksum, with the NIE prefix substituted.
    fn checksum_number(&self) -> Option<u32> {
        let upper = self.0.to_uppercase();
        let mut digits = String::with_capacity(8);
        let mut chars = upper.chars();

        match chars.next()? {
            'X' => digits.push('0'),
            'Y' => digits.push('1'),
            'Z' => digits.push('2'),
            c if c.is_ascii_digit() => digits.push(c),
            _ => return None,
        }
        digits.extend(chars.take(7));

        if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// The control letter the number part should carry.
    pub fn control_letter(&self) -> Option<char> {
        self.checksum_number()
            .map(|n| char::from(CONTROL_LETTERS[(n % 23) as usize]))
    }

    /// Check shape and control letter.
    pub fn validate(&self) -> Result<(), NationalIdError> {
        if !self.is_dni_shape() && !self.is_nie() {
            return Err(NationalIdError::InvalidFormat);
        }

        let provided = self
            .0
            .chars()
            .last()
            .map(|c| c.to_ascii_uppercase())
            .ok_or(NationalIdError::InvalidFormat)?;

        match self.control_letter() {
            Some(expected) if expected == provided => Ok(()),
            Some(_) => Err(NationalIdError::InvalidLetter),
            None => Err(NationalIdError::InvalidFormat),
        }
    }

    /// Whether the ID is well formed with a matching control letter.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Numeric part: eight digits for a DNI, seven for a NIE.
    pub fn number(&self) -> Option<&str> {
        if self.is_nie() {
            Some(&self.0[1..8])
        } else if self.is_dni_shape() {
            Some(&self.0[..8])
        } else {
            None
        }
    }

    /// Masked form for logs and UIs, keeping only the tail.
    ///
    /// `12345678Z` becomes `*****678Z`; `X1234567L` becomes `X****67L`.
    pub fn mask(&self) -> String {
        if !self.is_valid() {
            return "***INVALID***".to_string();
        }

        let upper = self.0.to_uppercase();
        if self.is_nie() {
            format!("{}****{}", &upper[..1], &upper[6..])
        } else {
            format!("*****{}", &upper[5..])
        }
    }
}

impl PartialEq for NationalId {
    fn eq(&self, other: &Self) -> bool {
        self.normalize().0 == other.normalize().0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mask())
    }
}

/// Predicate used by signup validation.
pub fn is_valid_national_id(value: &str) -> bool {
    NationalId::new(value).normalize().is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dni() {
        assert!(NationalId::new("12345678Z").is_valid());
        assert!(NationalId::new("00000000T").is_valid());
        assert!(NationalId::new("12345678z").is_valid());
    }

    #[test]
    fn test_valid_nie() {
        let nie = NationalId::new("X1234567L");
        assert!(nie.is_nie());
        assert!(nie.is_valid());
        assert!(NationalId::new("Y0000000Z").is_valid());
    }

    #[test]
    fn test_wrong_letter() {
        assert_eq!(
            NationalId::new("12345678A").validate(),
            Err(NationalIdError::InvalidLetter)
        );
        assert_eq!(
            NationalId::new("X1234567A").validate(),
            Err(NationalIdError::InvalidLetter)
        );
    }

    #[test]
    fn test_bad_format() {
        for raw in ["", "1234567Z", "123456789", "ABCDEFGHI", "A1234567L", "12345678ZZ"] {
            assert_eq!(
                NationalId::new(raw).validate(),
                Err(NationalIdError::InvalidFormat),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_control_letter() {
        assert_eq!(NationalId::new("12345678").control_letter(), Some('Z'));
        assert_eq!(NationalId::new("X1234567").control_letter(), Some('L'));
        assert_eq!(NationalId::new("abc").control_letter(), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(NationalId::new(" 1234-5678 z").normalize().as_str(), "12345678Z");
    }

    #[test]
    fn test_number() {
        assert_eq!(NationalId::new("12345678Z").number(), Some("12345678"));
        assert_eq!(NationalId::new("X1234567L").number(), Some("1234567"));
        assert_eq!(NationalId::new("nope").number(), None);
    }

    #[test]
    fn test_mask() {
        assert_eq!(NationalId::new("12345678Z").mask(), "*****678Z");
        assert_eq!(NationalId::new("X1234567L").mask(), "X****67L");
        assert_eq!(NationalId::new("12345678A").mask(), "***INVALID***");
    }

    #[test]
    fn test_display_is_masked() {
        assert_eq!(NationalId::new("12345678Z").to_string(), "*****678Z");
    }

    #[test]
    fn test_equality_after_normalization() {
        assert_eq!(NationalId::new("12345678-z"), NationalId::new("12345678Z"));
        assert_ne!(NationalId::new("12345678Z"), NationalId::new("00000000T"));
    }

    #[test]
    fn test_is_valid_national_id_normalizes() {
        assert!(is_valid_national_id("12345678-z"));
        assert!(!is_valid_national_id("12345678A"));
    }
}
