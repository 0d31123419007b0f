//! Ollama vision model engine
//!
//! Sends page images to a local Ollama server. The model keeps no per-engine
//! state, but pooling still bounds the number of concurrent requests.

use async_trait::async_trait;

use super::engine::{EngineSettings, OcrEngine, OcrEngineFactory};
use super::types::{OcrEngineKind, OcrError, RecognitionConfig};
use crate::document::RasterImage;

/// Creates Ollama engines after checking the server is reachable
#[derive(Debug, Clone)]
pub struct OllamaFactory {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
}

impl OllamaFactory {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl OcrEngineFactory for OllamaFactory {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Ollama
    }

    async fn create(&self, settings: &EngineSettings) -> Result<Box<dyn OcrEngine>, OcrError> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/tags", self.base_url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| OcrError::EngineNotAvailable(format!("Ollama unreachable: {}", e)))?;
        if !response.status().is_success() {
            return Err(OcrError::EngineNotAvailable(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        Ok(Box::new(OllamaEngine {
            client,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            language: settings.language.clone(),
        }))
    }
}

/// One Ollama engine instance
pub struct OllamaEngine {
    client: reqwest::Client,
    base_url: String,
    model: String,
    language: String,
}

#[async_trait]
impl OcrEngine for OllamaEngine {
    async fn recognize(
        &mut self,
        image: &RasterImage,
        _config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&image.data);
        let request = generate_request(&self.model, &self.language, image_base64);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(result["response"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Build the `/api/generate` request body
fn generate_request(model: &str, language: &str, image_base64: String) -> serde_json::Value {
    let prompt = format!(
        "Extract all text from this image exactly as written. The text is in {}. \
         Return only the extracted text, nothing else.",
        language_hint(language)
    );

    serde_json::json!({
        "model": model,
        "prompt": prompt,
        "images": [image_base64],
        "stream": false
    })
}

/// "lit+eng" -> "lit or eng"
fn language_hint(language: &str) -> String {
    language
        .split('+')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_hint() {
        assert_eq!(language_hint("lit+eng"), "lit or eng");
        assert_eq!(language_hint("eng"), "eng");
    }

    #[test]
    fn test_generate_request_body() {
        let body = generate_request("llava", "lit+eng", "aGVsbG8=".to_string());
        assert_eq!(body["model"], "llava");
        assert_eq!(body["stream"], false);
        assert_eq!(body["images"][0], "aGVsbG8=");
        assert!(body["prompt"].as_str().unwrap().contains("lit or eng"));
    }

    #[test]
    fn test_factory_trims_trailing_slash() {
        let factory = OllamaFactory::new("http://localhost:11434/", "llava");
        assert_eq!(factory.base_url, "http://localhost:11434");
        assert_eq!(factory.kind(), OcrEngineKind::Ollama);
    }
}
