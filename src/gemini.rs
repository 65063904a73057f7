use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::config::ProviderConfig;
use crate::model::{WordRecord, parse_word_record};
use crate::prompt;
use crate::provider::{GenerationError, InlineImage, WordProvider};

const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_EXCERPT: usize = 300;

/// [`WordProvider`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_none() {
            error!("API key is missing; set GEMINI_API_KEY before requesting words");
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        info!(
            text_model = %config.text_model,
            image_model = %config.image_model,
            base = %config.api_base,
            "Gemini client ready"
        );
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.api_base, model)
    }

    async fn generate(
        &self,
        model: &str,
        body: Value,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let response = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: excerpt(&text, ERROR_BODY_EXCERPT),
            });
        }
        debug!(%model, bytes = text.len(), "generateContent answered");
        Ok(serde_json::from_str(&text)?)
    }

    async fn generate_record(
        &self,
        prompt: String,
        temperature: Option<f32>,
    ) -> Result<WordRecord, GenerationError> {
        let body = structured_request(&prompt, temperature);
        let response = self.generate(&self.config.text_model, body).await?;
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        parse_word_record(&text)
    }
}

#[async_trait::async_trait]
impl WordProvider for GeminiClient {
    async fn generate_random(&self) -> Result<WordRecord, GenerationError> {
        self.generate_record(
            prompt::random_word_prompt(),
            Some(self.config.random_temperature),
        )
        .await
    }

    async fn generate_for_word(&self, word: &str) -> Result<WordRecord, GenerationError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(GenerationError::EmptyQuery);
        }
        self.generate_record(prompt::lookup_prompt(word), None).await
    }

    async fn generate_illustration(
        &self,
        word: &str,
        definition: &str,
        etymology: &str,
    ) -> Result<Option<InlineImage>, GenerationError> {
        let prompt = prompt::illustration_prompt(word, definition, etymology);
        let response = self
            .generate(&self.config.image_model, plain_request(&prompt))
            .await?;
        Ok(response.first_inline_image())
    }
}

fn user_contents(prompt: &str) -> Value {
    json!([{ "role": "user", "parts": [{ "text": prompt }] }])
}

fn structured_request(prompt: &str, temperature: Option<f32>) -> Value {
    let mut generation_config = json!({
        "responseMimeType": "application/json",
        "responseSchema": prompt::word_schema(),
    });
    if let Some(temperature) = temperature {
        generation_config["temperature"] = json!(temperature);
    }
    json!({
        "contents": user_contents(prompt),
        "generationConfig": generation_config,
    })
}

fn plain_request(prompt: &str) -> Value {
    json!({ "contents": user_contents(prompt) })
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate, skipping thought parts.
    fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn first_inline_image(&self) -> Option<InlineImage> {
        self.first_parts()
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .map(|inline| InlineImage {
                mime_type: inline.mime_type.clone(),
                data: inline.data.clone(),
            })
    }
}
