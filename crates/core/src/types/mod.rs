//! Core types for Tezukuri Van.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod section;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use section::{SectionKey, SectionPage};
