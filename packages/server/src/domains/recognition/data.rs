use serde::{Deserialize, Serialize};

/// Landmark frames captured by the client plus the text typed so far
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureInput {
    #[serde(default)]
    pub frames: Vec<serde_json::Value>,
    #[serde(default, alias = "current_text")]
    pub current_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiacriticsInput {
    pub text: String,
}
