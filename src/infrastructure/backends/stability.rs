#[cfg(test)]
#[path = "stability_test.rs"]
mod tests;

use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::GenerationError;
use crate::domain::models::GenerationRequest;
use crate::domain::models::ImageData;
use crate::domain::models::TextToImageBody;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Artifact {
    #[serde(default)]
    base64: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

fn transport_err(err: reqwest::Error) -> GenerationError {
    tracing::error!(error = ?err, "Stability is not reachable");
    return GenerationError::Transport(err.to_string());
}

pub struct Stability {
    url: String,
    token: String,
}

impl Default for Stability {
    fn default() -> Stability {
        return Stability::new(
            &Config::get(ConfigKey::ApiUrl),
            &Config::get(ConfigKey::ApiKey),
        );
    }
}

impl Stability {
    pub fn new(url: &str, token: &str) -> Stability {
        return Stability {
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        };
    }
}

#[async_trait]
impl Backend for Stability {
    fn name(&self) -> &'static str {
        return "stability";
    }

    #[allow(clippy::implicit_return)]
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageData, GenerationError> {
        let body = TextToImageBody::from(request);
        tracing::debug!(body = ?body, model = %request.model, "Text-to-image request");

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1/generation/{model}/text-to-image",
                url = self.url,
                model = request.model
            ))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        let status = res.status();
        let text = res.text().await.map_err(transport_err)?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %text,
                "Failed to make text-to-image request to Stability"
            );

            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| return e.message);

            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let ores = match serde_json::from_str::<TextToImageResponse>(&text) {
            Ok(ores) => ores,
            Err(err) => {
                tracing::error!(error = ?err, "Text-to-image response is not valid JSON");
                return Err(GenerationError::MissingArtifact);
            }
        };

        let artifact = ores.artifacts.into_iter().next().unwrap_or_default();
        tracing::debug!(
            seed = ?artifact.seed,
            finish_reason = ?artifact.finish_reason,
            "Text-to-image response"
        );

        match artifact.base64 {
            Some(base64) if !base64.trim().is_empty() => {
                return Ok(ImageData::new(&base64));
            }
            _ => {
                return Err(GenerationError::MissingArtifact);
            }
        }
    }
}
