//! Gemini `generateContent` request and response types.
//!
//! Only the fields this service reads or writes are modelled; unknown
//! response fields are ignored.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// System instruction sent with every avatar request.
pub const LIKENESS_INSTRUCTION: &str = "You are an illustrator turning portrait photos into \
     stylized characters. Preserve the person's facial structure, expression, skin tone and \
     hairstyle so the result is clearly recognisable as the same person. Return exactly one \
     image.";

/// Harm categories relaxed for avatar generation.
const SAFETY_CATEGORIES: [&str; 5] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// An image-to-image request: the source image followed by the prompt.
    pub fn image_edit(image: &[u8], mime_type: &str, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: BASE64.encode(image),
                        }),
                    },
                    Part::text(prompt),
                ],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(LIKENESS_INSTRUCTION)],
            },
            generation_config: GenerationConfig::default(),
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: (*category).to_string(),
                    threshold: "BLOCK_NONE".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_modalities: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_modalities: vec!["TEXT".into(), "IMAGE".into()],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Why a response carried no usable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No candidate, no content, or no inline-image part.
    NoImage(String),
    /// The inline image was not valid base64.
    BadEncoding(String),
}

impl GenerateContentResponse {
    /// The first inline image of the first candidate, decoded.
    pub fn first_image(&self) -> Result<(Vec<u8>, String), ExtractError> {
        let candidate = self.candidates.first().ok_or_else(|| {
            let detail = self
                .prompt_feedback
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "no candidates".into());
            ExtractError::NoImage(detail)
        })?;

        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let inline = parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or_else(|| {
                let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
                let text: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
                ExtractError::NoImage(format!(
                    "finish reason {reason}, text: {}",
                    text.join(" ")
                ))
            })?;

        let bytes = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|e| ExtractError::BadEncoding(e.to_string()))?;
        Ok((bytes, inline.mime_type.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn request_puts_image_before_prompt() {
        let req = GenerateContentRequest::image_edit(&[1, 2, 3], "image/jpeg", "make me an elf");
        let value = serde_json::to_value(&req).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AQID");
        assert_eq!(parts[1]["text"], "make me an elf");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            json!(["TEXT", "IMAGE"])
        );
        assert!(value["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn every_harm_category_is_unblocked() {
        let req = GenerateContentRequest::image_edit(&[1], "image/png", "p");
        let value = serde_json::to_value(&req).unwrap();
        let settings = value["safetySettings"].as_array().unwrap();

        let categories: Vec<&str> = settings
            .iter()
            .map(|s| s["category"].as_str().unwrap())
            .collect();
        assert_eq!(
            categories,
            [
                "HARM_CATEGORY_HARASSMENT",
                "HARM_CATEGORY_HATE_SPEECH",
                "HARM_CATEGORY_SEXUALLY_EXPLICIT",
                "HARM_CATEGORY_DANGEROUS_CONTENT",
                "HARM_CATEGORY_CIVIC_INTEGRITY",
            ]
        );
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
    }

    #[test]
    fn first_inline_image_is_extracted() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBO"}},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}}
                ]},
                "finishReason": "STOP"
            }]
        });
        let resp: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let (bytes, mime) = resp.first_image().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![0x89, 0x50, 0x4e]);
    }

    #[test]
    fn text_only_response_has_no_image() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "I can't do that"}]},
                "finishReason": "SAFETY"
            }]
        });
        let resp: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_matches!(resp.first_image(), Err(ExtractError::NoImage(msg)) if msg.contains("SAFETY"));
    }

    #[test]
    fn empty_candidates_has_no_image() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_matches!(resp.first_image(), Err(ExtractError::NoImage(_)));

        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "OTHER"}]})).unwrap();
        assert_matches!(resp.first_image(), Err(ExtractError::NoImage(_)));
    }

    #[test]
    fn invalid_base64_is_reported() {
        let body = json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "not base64!"}}
            ]}}]
        });
        let resp: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_matches!(resp.first_image(), Err(ExtractError::BadEncoding(_)));
    }
}
