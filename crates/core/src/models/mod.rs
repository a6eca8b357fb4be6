//! Content records shared by the public site and the admin panel.
//!
//! These are validated domain types. Each binary maps its own database rows
//! into them.

pub mod event;
pub mod product;
pub mod section;

pub use event::{Event, EventDraft};
pub use product::{BRAND, Product, ProductDraft};
pub use section::{ContentSection, SectionSet, SectionUpdate, ValueItem};
