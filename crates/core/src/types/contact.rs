//! Contact details submitted with customer applications.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`] or [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input is blank.
    #[error("value cannot be empty")]
    Empty,
    /// The input is too long to be a real address.
    #[error("value must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain.tld`.
    #[error("email must look like name@example.com")]
    MalformedEmail,
    /// The phone number has too few or too many digits.
    #[error("phone number must contain between {min} and {max} digits")]
    PhoneDigits {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
    /// The phone number contains something other than digits and separators.
    #[error("phone number may only contain digits, spaces, dashes, parentheses and a leading +")]
    PhoneCharacters,
}

/// A trimmed, lowercased email address with a dotted domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or not of the form `local@domain.tld`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ContactError::Empty);
        }
        if normalized.len() > Self::MAX_LENGTH {
            return Err(ContactError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or(ContactError::MalformedEmail)?;
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok || normalized.chars().any(char::is_whitespace) {
            return Err(ContactError::MalformedEmail);
        }

        Ok(Self(normalized))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// A phone number as typed by the customer, with its formatting kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 7;
    const MAX_DIGITS: usize = 15;

    /// Parse a phone number, keeping the customer's separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, contains characters
    /// other than digits and ` -()`, has a `+` anywhere but the front, or has
    /// fewer than 7 or more than 15 digits (E.164 limit).
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ContactError::Empty);
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
        {
            return Err(ContactError::PhoneCharacters);
        }

        let digits = body.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(ContactError::PhoneDigits {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
