//! Core types for Vitrine.
//!
//! Type-safe wrappers and records for the catalog domain.

pub mod contact;
pub mod entity;
pub mod id;
pub mod locale;
pub mod price;
pub mod status;
pub mod text;

pub use contact::{ContactError, Email, PhoneNumber};
pub use entity::*;
pub use id::*;
pub use locale::{Locale, LocaleError};
pub use price::{Price, PriceError};
pub use status::*;
pub use text::{LocalizedText, MultilingualText, localize};
