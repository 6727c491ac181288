use serde::{Deserialize, Serialize};

// analyze-image request body. Unknown or wrong-typed fields are rejected
// outright instead of being coerced to defaults.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub image_data: String,
    pub preferences: Option<String>,
}

// analyze-image response format, also the schema the model is asked to emit
#[derive(Deserialize, Serialize, Clone)]
pub struct AnalyzeResponse {
    pub ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
}

// A single recipe suggestion. The nutrition fields only appear when the
// model was asked for them, so they stay out of the JSON when absent.
#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
}

// search-image request body
#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    pub query: String,
}

// First photo hit for a recipe, reshaped for the frontend
#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub id: String,
    pub url: String,
    pub photographer: String,
    pub photographer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_location: Option<String>,
}

// trigger-download request body
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DownloadRequest {
    pub download_location: String,
}

// trigger-download acknowledgment
#[derive(Deserialize, Serialize, Clone)]
pub struct DownloadResponse {
    pub success: bool,
}
