//! Page extraction endpoints
//!
//! - `POST /`        raw document bytes as the request body
//! - `POST /upload`  multipart form with a `file` field

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::pipeline::{ExtractedDocument, PageResult};
use crate::state::AppState;

/// Extraction result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub page_count: usize,
    /// Pages that went through OCR
    pub ocr_pages: Vec<usize>,
    pub elapsed_ms: u64,
    pub pages: Vec<PageResult>,
}

impl From<ExtractedDocument> for ExtractResponse {
    fn from(doc: ExtractedDocument) -> Self {
        Self {
            page_count: doc.page_count(),
            ocr_pages: doc.ocr_pages,
            elapsed_ms: doc.elapsed.as_millis() as u64,
            pages: doc.pages,
        }
    }
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(extract_raw))
        .route("/upload", post(extract_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Extract pages from the raw request body
async fn extract_raw(State(state): State<AppState>, body: Bytes) -> Result<Json<ExtractResponse>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }
    extract(&state, body).await
}

/// Extract pages from an uploaded file
async fn extract_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;
        if data.is_empty() {
            return Err(AppError::BadRequest(format!("Uploaded file '{}' is empty", filename)));
        }

        tracing::debug!("Received upload '{}' ({} bytes)", filename, data.len());
        return extract(&state, data).await;
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

async fn extract(state: &AppState, data: Bytes) -> Result<Json<ExtractResponse>> {
    let extracted = state.extractor().process(data.to_vec()).await?;
    Ok(Json(extracted.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::document::{DocumentLoader, PageRasterizer};
    use crate::ocr::{OcrEngineFactory, OcrWorkerPool, PoolConfig};
    use crate::pipeline::testing::{
        text_of_len, FakeRasterizer, PageScript, RecordingEngineFactory, ScriptedLoader,
    };
    use crate::pipeline::{ExtractionOptions, HybridExtractor};
    use crate::routes;
    use crate::state::AppState;

    async fn app(initialize: bool, loader: ScriptedLoader) -> axum::Router {
        let factory: Arc<dyn OcrEngineFactory> = Arc::new(RecordingEngineFactory::new());
        let extractor = HybridExtractor::new(
            Arc::new(loader) as Arc<dyn DocumentLoader>,
            Arc::new(FakeRasterizer::new()) as Arc<dyn PageRasterizer>,
            Arc::new(OcrWorkerPool::new(factory)),
            ExtractionOptions::default(),
        );
        if initialize {
            extractor
                .initialize(PoolConfig::new(2, "eng", "/models"))
                .await
                .unwrap();
        }
        routes::app(AppState::new(Config::default(), Arc::new(extractor)))
    }

    fn two_page_loader() -> ScriptedLoader {
        ScriptedLoader::new(vec![
            PageScript::text(text_of_len(40)),
            PageScript::text("too short"),
        ])
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_extract_raw_body() {
        let app = app(true, two_page_loader()).await;

        let response = app
            .oneshot(
                Request::post("/api/v1/extract")
                    .body(Body::from("%PDF-1.4 test"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["pageCount"], 2);
        assert_eq!(body["ocrPages"], serde_json::json!([2]));
        assert_eq!(body["pages"][0]["page"], 1);
        assert_eq!(body["pages"][0]["origin"], "extracted");
        assert_eq!(body["pages"][1]["text"], "recognized text for page 2");
        assert_eq!(body["pages"][1]["origin"], "ocr");
    }

    #[tokio::test]
    async fn test_extract_multipart_upload() {
        let app = app(true, two_page_loader()).await;

        let boundary = "folio-boundary";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"scan.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4 upload\r\n\
             --{b}--\r\n",
            b = boundary
        );

        let response = app
            .oneshot(
                Request::post("/api/v1/extract/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["pageCount"], 2);
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_bad_request() {
        let app = app(true, two_page_loader()).await;

        let boundary = "folio-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{b}--\r\n",
            b = boundary
        );

        let response = app
            .oneshot(
                Request::post("/api/v1/extract/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let app = app(true, two_page_loader()).await;

        let response = app
            .oneshot(Request::post("/api/v1/extract").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_uninitialized_pool_is_unavailable() {
        let app = app(false, two_page_loader()).await;

        let response = app
            .oneshot(Request::post("/api/v1/extract").body(Body::from("%PDF")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "ocr_unavailable");
    }

    #[tokio::test]
    async fn test_unparseable_document_is_unprocessable() {
        let loader = two_page_loader();
        loader.fail_parse();
        let app = app(true, loader).await;

        let response = app
            .oneshot(Request::post("/api/v1/extract").body(Body::from("garbage")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health_reports_pool() {
        let app = app(true, two_page_loader()).await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "folio-ocr");
        assert_eq!(body["ocr"]["size"], 2);
        assert_eq!(body["ocr"]["state"], "ready");
    }
}
