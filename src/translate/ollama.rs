use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{Result, EmanetError};
use super::Translator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translator backed by a local Ollama server
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));
        debug!("Sending translation request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmanetError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmanetError::Translation(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await
            .map_err(|e| EmanetError::Translation(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let prompt = build_translation_prompt(text, source_language, target_language);
        let raw_response = self.generate(prompt).await?;
        let raw_response = raw_response.trim();

        debug!("Raw Ollama response: {}", raw_response);
        extract_translation(raw_response)
    }
}

/// Pull the translated text out of a model answer.
///
/// The model is asked for `{"text": "..."}`; anything else falls back to the
/// first line that does not look like commentary.
pub fn extract_translation(raw_response: &str) -> Result<String> {
    let raw_response = raw_response.trim();
    if raw_response.is_empty() {
        return Err(EmanetError::Translation("Empty translation received".to_string()));
    }

    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw_response) {
        let text = result.text.trim();
        if text.is_empty() {
            return Err(EmanetError::Translation("Empty translation received".to_string()));
        }
        return Ok(text.to_string());
    }

    Ok(clean_translation_response(raw_response))
}

fn clean_translation_response(response: &str) -> String {
    let is_commentary = |line: &str| {
        line.starts_with("Here is")
            || line.starts_with("Here are")
            || line.starts_with("Translation:")
            || line.starts_with("- ")
            || line.starts_with("* ")
            || (line.starts_with("**") && line.ends_with("**"))
    };

    response
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_commentary(*line))
        .or_else(|| response.lines().map(str::trim).find(|line| !line.is_empty()))
        .unwrap_or(response)
        .to_string()
}

fn build_translation_prompt(text: &str, source_language: &str, target_language: &str) -> String {
    let source_name = language_code_to_name(source_language);
    let target_name = language_code_to_name(target_language);

    format!(
        "You are a professional subtitle translator.\n\
         \n\
         Translate the following {} subtitle line to {} ONLY.\n\
         Keep it short enough to be read on screen and keep the tone of spoken dialogue.\n\
         \n\
         Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
         Do not include any explanations, alternatives, or text in other languages.\n\
         \n\
         Text to translate: \"{}\"\n",
        source_name, target_name, target_name, text
    )
}

fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "tr" | "tur" | "tur_latn" => "Turkish".to_string(),
        "fr" | "fra" | "fra_latn" => "French".to_string(),
        "en" | "eng" | "eng_latn" => "English".to_string(),
        _ => code.to_string(),
    }
}

/// Check if Ollama is reachable and the model is pulled
pub async fn check_ollama_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint.trim_end_matches('/'));

    let request = json!({
        "name": model
    });

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| EmanetError::Translation(format!("Failed to connect to Ollama: {}", e)))?;

    if response.status().is_success() {
        info!("Ollama model '{}' is available", model);
        Ok(())
    } else {
        Err(EmanetError::Translation(format!(
            "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
            model, model
        )))
    }
}
