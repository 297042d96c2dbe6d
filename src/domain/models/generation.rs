#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use serde_derive::Serialize;

use super::ImageData;
use super::ModelOption;

pub const VALIDATION_MESSAGE: &str = "Please enter a prompt";
pub const FALLBACK_MESSAGE: &str = "Generation failed";

/// Guidance scale sent with every generation.
pub const CFG_SCALE: u32 = 7;
pub const STEPS: u32 = 30;
pub const SAMPLES: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
}

impl GenerationRequest {
    pub fn new(prompt: &str, model: &str) -> GenerationRequest {
        return GenerationRequest {
            prompt: prompt.to_string(),
            model: model.to_string(),
        };
    }

    pub fn dimensions(&self) -> (u32, u32) {
        return ModelOption::dimensions_for(&self.model);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextPrompt {
    pub text: String,
}

/// Body of a text-to-image request. Only the prompt and model are user
/// controlled; everything else is fixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextToImageBody {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: u32,
    pub height: u32,
    pub width: u32,
    pub steps: u32,
    pub samples: u32,
}

impl From<&GenerationRequest> for TextToImageBody {
    fn from(request: &GenerationRequest) -> TextToImageBody {
        let (width, height) = request.dimensions();
        return TextToImageBody {
            text_prompts: vec![TextPrompt {
                text: request.prompt.to_string(),
            }],
            cfg_scale: CFG_SCALE,
            height,
            width,
            steps: STEPS,
            samples: SAMPLES,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The prompt was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// A generation is already in flight.
    #[error("A generation is already in progress")]
    Busy,

    #[error("{}", api_message(.status, .message))]
    Api { status: u16, message: Option<String> },

    #[error("{}", fallback(.0))]
    Transport(String),

    /// The API answered successfully but without image data.
    #[error("No image in response")]
    MissingArtifact,
}

fn api_message(status: &u16, message: &Option<String>) -> String {
    if let Some(msg) = message {
        if !msg.trim().is_empty() {
            return msg.to_string();
        }
    }

    return format!("Request failed with status code {status}");
}

fn fallback(message: &str) -> String {
    if message.trim().is_empty() {
        return FALLBACK_MESSAGE.to_string();
    }

    return message.to_string();
}

impl GenerationError {
    pub fn validation() -> GenerationError {
        return GenerationError::Validation(VALIDATION_MESSAGE.to_string());
    }
}

/// One successful generation, kept in the gallery for the session.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRecord {
    pub image: ImageData,
    pub prompt: String,
    pub model: String,
    pub created_at: DateTime<Local>,
}

impl GenerationRecord {
    pub fn new(request: &GenerationRequest, image: ImageData) -> GenerationRecord {
        return GenerationRecord {
            image,
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
            created_at: Local::now(),
        };
    }

    pub fn model_display_name(&self) -> String {
        return ModelOption::display_name_for(&self.model);
    }

    pub fn created_at_display(&self) -> String {
        return self.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    }
}
