use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::UpstreamError;
use crate::models::AnalyzeResponse;

const PROMPT_HEADER: &str = "Analyze this image of a refrigerator/pantry and identify all visible food ingredients.
Then, suggest 3-4 practical recipes that can be made using these ingredients.";

const PROMPT_FORMAT: &str = r#"Format your response as a JSON object with this structure:
{
  "ingredients": ["ingredient1", "ingredient2", ...],
  "recipes": [
    {
      "name": "Recipe Name",
      "ingredients": ["ingredient1", "ingredient2", ...],
      "instructions": ["step1", "step2", ...],
      "prepTime": "30 minutes",
      "calories": "450 kcal (optional)",
      "protein": "25g (optional)",
      "carbs": "40g (optional)",
      "fat": "15g (optional)"
    }
  ]
}

Make sure to:
1. Only suggest recipes that can be made with the visible ingredients
2. Consider the user's dietary preferences and calorie/macro requirements if specified
3. Provide realistic prep times
4. Include nutritional estimates if the user mentioned calorie or macro preferences

Return ONLY the JSON object, no additional text."#;

// Decoded data-URL parts forwarded to the model
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

// Seam for the generative-AI upstream so handlers can run against a mock
#[async_trait]
pub trait GeminiApi: Send + Sync {
    async fn analyze_image(
        &self,
        image: &ImagePayload,
        preferences: &str,
    ) -> Result<AnalyzeResponse, UpstreamError>;
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url,
            model,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// generateContent request format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Part {
            text: Some(text),
            inline_data: None,
        }
    }

    fn image(image: &ImagePayload) -> Self {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

// JSON output mode, so the reply text parses without salvage heuristics
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

// generateContent response format
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    // Text of the first candidate with its parts joined, None when the model
    // produced nothing (e.g. a safety stop)
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() { None } else { Some(text) }
    }
}

fn build_prompt(preferences: &str) -> String {
    if preferences.is_empty() {
        format!("{PROMPT_HEADER}\n\n{PROMPT_FORMAT}")
    } else {
        format!("{PROMPT_HEADER}\n\nUser preferences: {preferences}\n\n{PROMPT_FORMAT}")
    }
}

#[async_trait]
impl GeminiApi for GeminiClient {
    async fn analyze_image(
        &self,
        image: &ImagePayload,
        preferences: &str,
    ) -> Result<AnalyzeResponse, UpstreamError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(build_prompt(preferences)), Part::image(image)],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;
        let text = reply
            .first_text()
            .ok_or_else(|| UpstreamError::Parse("empty model reply".to_string()))?;

        serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Parse(format!("reply did not match recipe schema: {e}")))
    }
}
