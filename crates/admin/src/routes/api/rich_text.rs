//! Image block commands for the rich text editor.
//!
//! The editor script inserts a block by posting its attributes to
//! `render`, and opens an existing block for editing by posting its markup
//! to `parse`.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use tezukuri_core::rich_text::{ImageAttrs, ImageBlock};

use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the rich text router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rich-text/render", post(render_block))
        .route("/api/rich-text/parse", post(parse_block))
}

/// Rendered block markup.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
}

/// Markup of the block being edited.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub markup: String,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

fn bad_request(error: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Render image attributes to canonical block markup.
///
/// # Errors
///
/// Returns 400 if `src` is blank.
pub async fn render_block(
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(attrs): Json<ImageAttrs>,
) -> Result<Json<RenderResponse>, Response> {
    if attrs.src.trim().is_empty() {
        return Err(bad_request("Image source is required"));
    }

    let block = ImageBlock::from(attrs);
    Ok(Json(RenderResponse {
        html: block.to_html(),
    }))
}

/// Read the attributes of an existing block.
///
/// # Errors
///
/// Returns 400 if the markup holds no readable image block.
pub async fn parse_block(
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ParseRequest>,
) -> Result<Json<ImageAttrs>, Response> {
    ImageBlock::parse(&body.markup)
        .map(|block| Json(ImageAttrs::from(block)))
        .map_err(bad_request)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tezukuri_core::rich_text::{Align, SidePosition};
    use tezukuri_core::{AdminUserId, Email};
    use tower::ServiceExt;

    use super::*;
    use crate::models::CurrentAdmin;
    use crate::test_support::test_state;

    fn admin() -> RequireAdminAuth {
        RequireAdminAuth(CurrentAdmin {
            id: AdminUserId::new("admin-1"),
            email: Email::parse("owner@tezukurivan.ca").unwrap(),
            name: "Owner".to_string(),
        })
    }

    #[tokio::test]
    async fn test_render_then_parse_double_layout() {
        let attrs = ImageAttrs {
            src: "/media/sections/1-van.jpg".to_string(),
            alt: Some("The van".to_string()),
            width: Some(420),
            align: Some(Align::Left),
            layout: Some("double".to_string()),
            position: Some(SidePosition::Right),
            side_text: Some("Our workshop on wheels".to_string()),
            ..ImageAttrs::default()
        };

        let Json(rendered) = render_block(admin(), Json(attrs.clone())).await.unwrap();
        assert!(rendered.html.contains("data-image-layout"));

        let Json(parsed) = parse_block(
            admin(),
            Json(ParseRequest {
                markup: rendered.html,
            }),
        )
        .await
        .unwrap();
        assert_eq!(parsed, ImageAttrs::from(ImageBlock::from(attrs)));
    }

    #[tokio::test]
    async fn test_blank_source_is_rejected() {
        let response = render_block(admin(), Json(ImageAttrs::default()))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_plain_paragraph_does_not_parse() {
        let response = parse_block(
            admin(),
            Json(ParseRequest {
                markup: "<p>No image here</p>".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let app = router().with_state(test_state());
        let request = Request::post("/api/rich-text/render")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"src":"/media/a.jpg"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
