//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use tezukuri_core::{Product, SectionPage, SectionSet};

use crate::filters;
use crate::state::AppState;

/// Number of products shown in the featured grid.
const FEATURED_PRODUCT_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Editable page blocks; missing keys are not rendered.
    pub sections: SectionSet,
    /// First products in display order.
    pub featured: Vec<Product>,
}

/// Display the home page.
///
/// Section and product failures are logged and the affected parts of the
/// page are left out.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let sections = state
        .content()
        .sections(SectionPage::Home)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch home sections: {e}");
            SectionSet::default()
        });

    let featured = state.content().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| featured_products(products, FEATURED_PRODUCT_COUNT),
    );

    HomeTemplate { sections, featured }
}

/// Keep the first `count` products of an already sorted list.
fn featured_products(mut products: Vec<Product>, count: usize) -> Vec<Product> {
    products.truncate(count);
    products
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{product, section};
    use tezukuri_core::SectionKey;

    #[test]
    fn test_featured_products_keeps_display_order() {
        let products = vec![
            product("c", Some(1)),
            product("a", Some(2)),
            product("b", None),
            product("d", None),
        ];
        let ids: Vec<String> = featured_products(products, 3)
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_featured_products_short_list() {
        assert_eq!(featured_products(vec![product("a", None)], 3).len(), 1);
    }

    #[test]
    fn test_home_leaves_out_missing_sections() {
        let page = HomeTemplate {
            sections: SectionSet::new(vec![section(SectionKey::Hero, "Handmade in a van")]),
            featured: Vec::new(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("Handmade in a van"));
        assert!(!html.contains(r#"class="values""#));
        assert!(!html.contains(r#"class="contact-cta""#));
        assert!(!html.contains(r#"class="about-preview""#));
        assert!(!html.contains(r#"class="featured""#));
    }

    #[test]
    fn test_home_renders_with_no_sections() {
        let page = HomeTemplate {
            sections: SectionSet::default(),
            featured: vec![product("a", Some(1))],
        };
        let html = page.render().unwrap();

        assert!(!html.contains(r#"class="hero""#));
        assert!(html.contains("Product a"));
    }
}
