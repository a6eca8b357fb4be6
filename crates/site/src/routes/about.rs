//! About page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use tezukuri_core::{SectionPage, SectionSet};

use crate::filters;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    /// Hero, intro and values blocks; missing keys are not rendered.
    pub sections: SectionSet,
}

/// Display the about page.
///
/// GET /about
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    let sections = state
        .content()
        .sections(SectionPage::About)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch about sections: {e}");
            SectionSet::default()
        });

    AboutTemplate { sections }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::section;
    use tezukuri_core::SectionKey;

    #[test]
    fn test_about_leaves_out_missing_sections() {
        let page = AboutTemplate {
            sections: SectionSet::new(vec![section(SectionKey::Hero, "Our story")]),
        };
        let html = page.render().unwrap();

        assert!(html.contains("Our story"));
        assert!(!html.contains(r#"class="intro""#));
        assert!(!html.contains(r#"class="values""#));
    }

    #[test]
    fn test_about_renders_values_without_hero() {
        let page = AboutTemplate {
            sections: SectionSet::new(vec![section(SectionKey::Values, "What we value")]),
        };
        let html = page.render().unwrap();

        assert!(html.contains("What we value"));
        assert!(!html.contains(r#"class="page-hero""#));
    }
}
