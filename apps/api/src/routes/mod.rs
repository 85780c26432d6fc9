pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::bank::handlers as bank;
use crate::export::handlers as export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Snippet bank
        .route("/api/v1/bank", get(bank::handle_get_bank))
        .route("/api/v1/bank/import", post(bank::handle_import))
        .route("/api/v1/bank/upload", post(bank::handle_upload))
        // Résumé workspace
        .route(
            "/api/v1/resume",
            get(bank::handle_get_resume).put(bank::handle_replace_resume),
        )
        .route("/api/v1/resume/sections", post(bank::handle_add_section))
        .route(
            "/api/v1/resume/sections/:id",
            patch(bank::handle_rename_section).delete(bank::handle_remove_section),
        )
        .route(
            "/api/v1/resume/sections/:id/move",
            post(bank::handle_move_section),
        )
        .route("/api/v1/resume/place", post(bank::handle_place_snippet))
        .route(
            "/api/v1/resume/snippets/:id",
            patch(bank::handle_update_snippet),
        )
        .route(
            "/api/v1/resume/snippets/:id/return",
            post(bank::handle_return_snippet),
        )
        .route(
            "/api/v1/resume/snippets/:id/move",
            post(bank::handle_move_snippet),
        )
        .route(
            "/api/v1/resume/snippets/:id/suggestions",
            post(bank::handle_suggestions),
        )
        // Export
        .route("/api/v1/export/formats", get(export::handle_list_formats))
        .route("/api/v1/export/:format", get(export::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::ingest::MarkdownExtractor;
    use crate::sections::TitleAliases;

    const DOC: &str = "# Jane Doe\njane@example.com\n## Skills\n- Python\n- SQL";

    fn app() -> Router {
        build_router(AppState::new(
            Config::default(),
            Arc::new(MarkdownExtractor::default()),
            None,
            TitleAliases::default(),
        ))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, header::HeaderMap, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    fn error_code(body: &[u8]) -> String {
        let value: Value = serde_json::from_slice(body).unwrap();
        value["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["service"], "folio-api");
    }

    #[tokio::test]
    async fn test_import_reports_counts_and_pins_header() {
        let app = app();
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/bank/import",
            Some(json!({"raw_text": DOC})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let report: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["added_sections"], 2);
        assert_eq!(report["added_snippets"], 3);

        let (_, _, body) = send(&app, Method::GET, "/api/v1/bank", None).await;
        let bank: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(bank[0]["title"], "Header");
        assert_eq!(bank[1]["snippets"][1]["content"], "SQL");
    }

    #[tokio::test]
    async fn test_blank_import_is_empty_input() {
        let (status, _, body) = send(
            &app(),
            Method::POST,
            "/api/v1/bank/import",
            Some(json!({"raw_text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn test_export_errors() {
        let app = app();
        let (status, _, body) = send(&app, Method::GET, "/api/v1/export/markdown", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "EMPTY_RESUME");

        let (status, _, body) = send(&app, Method::GET, "/api/v1/export/docx", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_place_then_export_markdown() {
        let app = app();
        let (_, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/bank/import",
            Some(json!({"raw_text": DOC})),
        )
        .await;
        let report: Value = serde_json::from_slice(&body).unwrap();
        let header_id = report["bank"][0]["snippets"][0]["id"].as_str().unwrap().to_string();
        let python_id = report["bank"][1]["snippets"][0]["id"].as_str().unwrap().to_string();

        for (title, id) in [("Header", &header_id), ("Skills", &python_id)] {
            let (status, _, _) = send(
                &app,
                Method::POST,
                "/api/v1/resume/place",
                Some(json!({"bank_section_title": title, "snippet_id": id})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, body) = send(
            &app,
            Method::GET,
            "/api/v1/export/md?filename=jane",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane.md\""
        );
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/markdown"));
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "# Jane Doe\n\njane@example.com\n\n## Skills\n\n- Python\n"
        );

        let (status, headers, _) = send(
            &app,
            Method::GET,
            "/api/v1/export/txt?filename=jane%01doe",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane_doe.txt\""
        );
    }

    #[tokio::test]
    async fn test_export_uses_configured_aliases() {
        let app = build_router(AppState::new(
            Config::default(),
            Arc::new(MarkdownExtractor::default()),
            None,
            TitleAliases::with_extra(vec![("Kontakt".to_string(), "Header".to_string())]),
        ));
        let (status, _, _) = send(
            &app,
            Method::PUT,
            "/api/v1/resume",
            Some(json!({"sections": [
                {"id": "s1", "title": "Skills", "snippets": [{"id": "a", "content": "Rust"}]},
                {"id": "s2", "title": "Kontakt", "snippets": [{"id": "b", "content": "Jane Doe"}]}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = send(&app, Method::GET, "/api/v1/export/markdown", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "# Jane Doe\n\n## Skills\n\n- Rust\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_snippet_is_not_found() {
        let (status, _, body) = send(
            &app(),
            Method::PATCH,
            "/api/v1/resume/snippets/snippet-missing",
            Some(json!({"content": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_suggestions_without_key_are_unavailable() {
        let app = app();
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/resume/sections",
            Some(json!({"title": "Skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let section: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(section["title"], "Skills");

        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/resume/snippets/snippet-any/suggestions",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_code(&body), "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_export_formats_listing() {
        let (_, _, body) = send(&app(), Method::GET, "/api/v1/export/formats", None).await;
        let formats: Value = serde_json::from_slice(&body).unwrap();
        let values: Vec<_> = formats
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["value"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(values, vec!["markdown", "text", "json", "pdf"]);
        assert_eq!(formats[3]["mime_type"], "application/pdf");
    }
}
