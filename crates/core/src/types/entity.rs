//! Catalog entities as stored in the document store, plus their write inputs.
//!
//! Stored records are read leniently (`#[serde(default)]` on fields that
//! older documents may lack). Write inputs are strict and are checked by
//! [`validation`](crate::validation) before they reach the store.
//!
//! Patch types serialize only the fields that are `Some`, so a merge-update
//! built from them can never clobber a field the caller did not mention.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contact::{Email, PhoneNumber};
use super::id::{ApplicationId, CategoryId, MediaId, ProductId};
use super::price::Price;
use super::status::{ApplicationStatus, MediaType};
use super::text::{LocalizedText, MultilingualText};

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub features: Vec<LocalizedText>,
    /// May point at a category that has since been deleted.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// True if this product is filed under `category_id`.
    #[must_use]
    pub fn is_in_category(&self, category_id: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category_id)
    }

    /// First image, used as the card thumbnail.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: MultilingualText,
    pub description: MultilingualText,
    pub price: Decimal,
    #[serde(default)]
    pub features: Vec<MultilingualText>,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update for a product. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<MultilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<MultilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<MultilingualText>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub title: LocalizedText,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub title: MultilingualText,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<MultilingualText>,
}

// =============================================================================
// Media
// =============================================================================

/// A certificate scan or partner logo shown on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: MediaId,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a media record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    pub title: MultilingualText,
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
}

/// Partial update for a media record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<MultilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaType>,
}

// =============================================================================
// Application
// =============================================================================

/// A customer inquiry sent from the contact form.
///
/// Contact fields are kept as stored text; they were validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw contact-form submission, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default, alias = "phone")]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated application ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub name: String,
    pub surname: String,
    pub phone_number: PhoneNumber,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: ApplicationStatus,
}

/// Partial update for an application (admins only move its status).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            price: Some(Decimal::new(4200, 2)),
            ..ProductPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("price"));
    }

    #[test]
    fn test_product_reads_legacy_document() {
        let json = r#"{
            "id": "p1",
            "title": "Old pump",
            "price": "10",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, LocalizedText::Legacy("Old pump".to_string()));
        assert!(product.category_id.is_none());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_media_type_field_is_named_type() {
        let media = NewMedia {
            title: MultilingualText::new("a", "b", "c"),
            image_url: "https://cdn/x.png".to_string(),
            kind: MediaType::Partner,
        };
        let value = serde_json::to_value(&media).unwrap();
        assert_eq!(value["type"], "partner");
        assert_eq!(value["imageUrl"], "https://cdn/x.png");
    }
}
