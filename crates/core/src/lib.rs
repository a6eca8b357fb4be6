//! Tezukuri Van Core - Shared types library.
//!
//! This crate provides the content model used by every Tezukuri Van component:
//! - `site` - Public marketing site
//! - `admin` - Content management panel
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Database support for the ID and enum types is
//! behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and section keys
//! - [`models`] - Products, events, and page sections
//! - [`ordering`] - Catalog display order and the reorder draft
//! - [`rich_text`] - Image blocks inside rich text HTML

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod ordering;
pub mod rich_text;
pub mod types;

pub use models::{
    BRAND, ContentSection, Event, EventDraft, Product, ProductDraft, SectionSet, SectionUpdate,
    ValueItem,
};
pub use types::*;
