//! Input validation performed before any backend call.
//!
//! A failed check means nothing is written: callers surface the error to the
//! user and keep the form as it was.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{
    ApplicationForm, ApplicationStatus, CategoryPatch, ContactError, Email, Locale, MediaPatch,
    MultilingualText, NewApplication, NewCategory, NewMedia, NewProduct, PhoneNumber,
    ProductPatch,
};

/// Longest accepted free-text message on an application.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Longest accepted name or surname.
pub const MAX_NAME_LENGTH: usize = 100;

/// Reasons an input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A multilingual field lacks one or more translations.
    #[error("{field} is missing a translation for: {}", join_codes(.missing))]
    MissingTranslation {
        field: &'static str,
        missing: Vec<Locale>,
    },

    /// Price is zero or negative.
    #[error("price must be greater than zero")]
    NonPositivePrice,

    /// No category selected.
    #[error("category is required")]
    MissingCategory,

    /// A required plain-text field is blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A text field exceeds its length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Email or phone number is malformed.
    #[error("{field}: {source}")]
    Contact {
        field: &'static str,
        #[source]
        source: ContactError,
    },
}

impl ValidationError {
    /// Name of the offending field, as it appears in forms and JSON bodies.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingTranslation { field, .. }
            | Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::Contact { field, .. } => field,
            Self::NonPositivePrice => "price",
            Self::MissingCategory => "categoryId",
        }
    }
}

fn join_codes(locales: &[Locale]) -> String {
    locales
        .iter()
        .map(|locale| locale.code())
        .collect::<Vec<_>>()
        .join(", ")
}

fn require_translations(field: &'static str, text: &MultilingualText) -> Result<(), ValidationError> {
    let missing = text.missing_locales();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingTranslation { field, missing })
    }
}

fn require_features(features: &[MultilingualText]) -> Result<(), ValidationError> {
    features
        .iter()
        .try_for_each(|feature| require_translations("features", feature))
}

fn require_positive(price: Decimal) -> Result<(), ValidationError> {
    if price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::NonPositivePrice)
    }
}

fn require_category(category_id: &str) -> Result<(), ValidationError> {
    if category_id.trim().is_empty() {
        Err(ValidationError::MissingCategory)
    } else {
        Ok(())
    }
}

fn require_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

impl NewProduct {
    /// Check every field of a product before it is created.
    ///
    /// # Errors
    ///
    /// Returns the first failed check: translations of title, description
    /// and each feature, a positive price, and a category.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_translations("title", &self.title)?;
        require_translations("description", &self.description)?;
        require_features(&self.features)?;
        require_positive(self.price)?;
        require_category(&self.category_id)
    }
}

impl ProductPatch {
    /// Check only the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Same checks as [`NewProduct::validate`], applied to supplied fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_translations("title", title)?;
        }
        if let Some(description) = &self.description {
            require_translations("description", description)?;
        }
        if let Some(features) = &self.features {
            require_features(features)?;
        }
        if let Some(price) = self.price {
            require_positive(price)?;
        }
        if let Some(category_id) = &self.category_id {
            require_category(category_id)?;
        }
        Ok(())
    }
}

impl NewCategory {
    /// # Errors
    ///
    /// Returns an error if the title lacks a translation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_translations("title", &self.title)
    }
}

impl CategoryPatch {
    /// # Errors
    ///
    /// Returns an error if a supplied title lacks a translation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.title
            .as_ref()
            .map_or(Ok(()), |title| require_translations("title", title))
    }
}

impl NewMedia {
    /// # Errors
    ///
    /// Returns an error if the title lacks a translation or the image URL is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_translations("title", &self.title)?;
        if self.image_url.trim().is_empty() {
            return Err(ValidationError::Required { field: "imageUrl" });
        }
        Ok(())
    }
}

impl MediaPatch {
    /// # Errors
    ///
    /// Returns an error if a supplied title lacks a translation or a supplied
    /// image URL is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_translations("title", title)?;
        }
        if self
            .image_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(ValidationError::Required { field: "imageUrl" });
        }
        Ok(())
    }
}

impl ApplicationForm {
    /// Validate a contact-form submission into a storable application with
    /// status `new`.
    ///
    /// Names are trimmed; a blank message becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank or overlong name/surname, a malformed
    /// phone number or email, or an overlong message.
    pub fn validate(&self) -> Result<NewApplication, ValidationError> {
        let name = require_text("name", &self.name, MAX_NAME_LENGTH)?;
        let surname = require_text("surname", &self.surname, MAX_NAME_LENGTH)?;
        let phone_number =
            PhoneNumber::parse(&self.phone_number).map_err(|source| ValidationError::Contact {
                field: "phoneNumber",
                source,
            })?;
        let email = Email::parse(&self.email).map_err(|source| ValidationError::Contact {
            field: "email",
            source,
        })?;

        let message = match self.message.as_deref().map(str::trim) {
            Some(text) if text.chars().count() > MAX_MESSAGE_LENGTH => {
                return Err(ValidationError::TooLong {
                    field: "message",
                    max: MAX_MESSAGE_LENGTH,
                });
            }
            Some(text) if !text.is_empty() => Some(text.to_owned()),
            _ => None,
        };

        Ok(NewApplication {
            name,
            surname,
            phone_number,
            email,
            message,
            status: ApplicationStatus::New,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete(text: &str) -> MultilingualText {
        MultilingualText::new(format!("{text} ru"), format!("{text} uz"), format!("{text} en"))
    }

    fn new_product() -> NewProduct {
        NewProduct {
            title: complete("Feed pump"),
            description: complete("Pumps feed"),
            price: Decimal::new(150, 0),
            features: vec![complete("Steel body")],
            category_id: "feeders".to_string(),
            images: vec![],
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert_eq!(new_product().validate(), Ok(()));
    }

    #[test]
    fn test_missing_translation_names_locales() {
        let mut product = new_product();
        product.title.uz.clear();
        product.title.en = "   ".to_string();
        let err = product.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingTranslation {
                field: "title",
                missing: vec![Locale::Uz, Locale::En],
            }
        );
        assert_eq!(err.to_string(), "title is missing a translation for: uz, en");
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut product = new_product();
        product.price = Decimal::ZERO;
        assert_eq!(product.validate(), Err(ValidationError::NonPositivePrice));
        product.price = Decimal::new(-5, 0);
        assert_eq!(product.validate(), Err(ValidationError::NonPositivePrice));
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut product = new_product();
        product.category_id = " ".to_string();
        assert_eq!(product.validate(), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn test_incomplete_feature_rejected() {
        let mut product = new_product();
        product.features.push(MultilingualText::new("a", "", "c"));
        assert_eq!(product.validate().unwrap_err().field(), "features");
    }

    #[test]
    fn test_patch_checks_only_supplied_fields() {
        assert_eq!(ProductPatch::default().validate(), Ok(()));

        let patch = ProductPatch {
            price: Some(Decimal::ZERO),
            ..ProductPatch::default()
        };
        assert_eq!(patch.validate(), Err(ValidationError::NonPositivePrice));
    }

    #[test]
    fn test_media_requires_image() {
        let media = NewMedia {
            title: complete("ISO 9001"),
            image_url: String::new(),
            kind: crate::types::MediaType::Certificate,
        };
        assert_eq!(media.validate().unwrap_err().field(), "imageUrl");
    }

    #[test]
    fn test_application_form_normalizes() {
        let form = ApplicationForm {
            name: "  Aziz ".to_string(),
            surname: "Karimov".to_string(),
            phone_number: "+998 90 123 45 67".to_string(),
            email: "Aziz@Example.uz".to_string(),
            message: Some("   ".to_string()),
        };
        let application = form.validate().unwrap();
        assert_eq!(application.name, "Aziz");
        assert_eq!(application.email.as_str(), "aziz@example.uz");
        assert_eq!(application.message, None);
        assert_eq!(application.status, ApplicationStatus::New);
    }

    #[test]
    fn test_application_form_rejects_bad_contact() {
        let form = ApplicationForm {
            name: "Aziz".to_string(),
            surname: "Karimov".to_string(),
            phone_number: "+998 90 123 45 67".to_string(),
            email: "not-an-email".to_string(),
            message: None,
        };
        assert_eq!(form.validate().unwrap_err().field(), "email");

        let form = ApplicationForm {
            surname: String::new(),
            ..form
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::Required { field: "surname" })
        );
    }
}
