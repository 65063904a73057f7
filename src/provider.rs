use serde::Serialize;
use tracing::{debug, error, warn};

use crate::model::WordRecord;

const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Boundary to the hosted generation service.
#[async_trait::async_trait]
pub trait WordProvider: Send + Sync {
    /// Invent an interesting word with a notable etymology.
    async fn generate_random(&self) -> Result<WordRecord, GenerationError>;

    /// Describe exactly the supplied word.
    async fn generate_for_word(&self, word: &str) -> Result<WordRecord, GenerationError>;

    /// Illustrate a resolved word. `Ok(None)` means the service answered
    /// without an image part.
    async fn generate_illustration(
        &self,
        word: &str,
        definition: &str,
        etymology: &str,
    ) -> Result<Option<InlineImage>, GenerationError>;
}

/// Failure of a generation request.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Generated record has no valid `{field}`")]
    InvalidRecord { field: &'static str },

    #[error("Lookup word cannot be empty")]
    EmptyQuery,

    #[error("Missing API key; set GEMINI_API_KEY")]
    MissingApiKey,
}

/// Inline binary image data as returned by the provider, still base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: Option<String>,
    pub data: String,
}

impl InlineImage {
    pub fn png(data: impl Into<String>) -> Self {
        Self {
            mime_type: Some(FALLBACK_IMAGE_MIME.to_string()),
            data: data.into(),
        }
    }

    /// The image type to advertise; anything that is not an `image/*` type
    /// falls back to PNG.
    pub fn effective_mime(&self) -> String {
        self.mime_type
            .as_deref()
            .and_then(|value| value.parse::<mime::Mime>().ok())
            .filter(|parsed| parsed.type_() == mime::IMAGE)
            .map(|parsed| parsed.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string())
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.effective_mime(), self.data)
    }
}

/// Resolves the text half of a fetch cycle: a non-blank query is looked up
/// verbatim (trimmed), anything else asks for a random word.
pub async fn fetch_word(
    provider: &dyn WordProvider,
    query: Option<&str>,
) -> Result<WordRecord, GenerationError> {
    let lookup = query.map(str::trim).filter(|word| !word.is_empty());
    let result = match lookup {
        Some(word) => {
            debug!(%word, "requesting word lookup");
            provider.generate_for_word(word).await
        }
        None => {
            debug!("requesting random word");
            provider.generate_random().await
        }
    };
    if let Err(err) = &result {
        error!(error = %err, query = ?lookup, "word generation failed");
    }
    result
}

/// Resolves the image half of a fetch cycle. Failures are logged and
/// reported as a missing illustration.
pub async fn fetch_illustration(provider: &dyn WordProvider, record: &WordRecord) -> Option<String> {
    match provider
        .generate_illustration(&record.word, &record.definition, &record.etymology)
        .await
    {
        Ok(Some(image)) => Some(image.to_data_uri()),
        Ok(None) => {
            warn!(word = %record.word, "illustration response had no image part");
            None
        }
        Err(err) => {
            warn!(word = %record.word, error = %err, "illustration generation failed");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{Call, FakeProvider, ImageOutcome, sample_record};
    use super::*;

    #[tokio::test]
    async fn non_blank_query_is_looked_up_trimmed() {
        let provider = FakeProvider::new();
        let record = fetch_word(&provider, Some("  fjell ")).await.unwrap();
        assert_eq!(record.word, "fjell");
        assert_eq!(provider.calls(), vec![Call::Lookup("fjell".into())]);
    }

    #[tokio::test]
    async fn blank_or_missing_query_asks_for_random_word() {
        let provider = FakeProvider::new();
        fetch_word(&provider, None).await.unwrap();
        fetch_word(&provider, Some("   ")).await.unwrap();
        assert_eq!(provider.calls(), vec![Call::Random, Call::Random]);
    }

    #[tokio::test]
    async fn text_failure_propagates() {
        let provider = FakeProvider::failing_text();
        assert!(fetch_word(&provider, Some("fjell")).await.is_err());
    }

    #[tokio::test]
    async fn illustration_failures_degrade_to_none() {
        let record = sample_record("fjell");
        for outcome in [ImageOutcome::NoImagePart, ImageOutcome::Fails] {
            let provider = FakeProvider::with_image(outcome);
            assert_eq!(fetch_illustration(&provider, &record).await, None);
        }
        let provider = FakeProvider::new();
        assert_eq!(
            fetch_illustration(&provider, &record).await.as_deref(),
            Some("data:image/png;base64,aW1n")
        );
        assert_eq!(provider.calls(), vec![Call::Illustration("fjell".into())]);
    }

    #[test]
    fn data_uri_uses_image_mime_or_falls_back_to_png() {
        let jpeg = InlineImage {
            mime_type: Some("image/jpeg".into()),
            data: "abc".into(),
        };
        assert_eq!(jpeg.to_data_uri(), "data:image/jpeg;base64,abc");
        let odd = InlineImage {
            mime_type: Some("text/plain".into()),
            data: "abc".into(),
        };
        assert_eq!(odd.to_data_uri(), "data:image/png;base64,abc");
        let missing = InlineImage {
            mime_type: None,
            data: "abc".into(),
        };
        assert_eq!(missing.effective_mime(), "image/png");
    }
}
