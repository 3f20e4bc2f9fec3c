//! Vitrine Core - Shared catalog types and listing logic.
//!
//! This crate provides the domain pieces used by every Vitrine component:
//! - `storefront` - Public trilingual catalog site
//! - `admin` - Catalog administration panel
//! - `cli` - Migrations, seeding and sitemap export
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Fetching documents is the job of `vitrine-data`;
//! everything that can be decided without a network round-trip lives here.
//!
//! # Modules
//!
//! - [`types`] - Ids, locales, multilingual text, entities and their inputs
//! - [`locale`] - Locale resolution from query, cookie and `Accept-Language`
//! - [`catalog`] - Search matching, newest-first ordering and pagination
//! - [`validation`] - Input checks performed before any backend call
//! - [`sitemap`] - XML sitemap with per-locale alternates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod locale;
pub mod sitemap;
pub mod types;
pub mod validation;

pub use types::*;
