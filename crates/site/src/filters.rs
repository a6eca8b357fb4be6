//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Rewrites embedded image blocks in stored rich text to canonical markup.
///
/// The output is HTML; pair with `safe`.
///
/// Usage in templates: `{{ event.description|rich_text|safe }}`
#[askama::filter_fn]
pub fn rich_text(html: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(tezukuri_core::rich_text::normalize_document(&html.to_string()))
}
