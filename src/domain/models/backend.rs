use async_trait::async_trait;

use super::GenerationError;
use super::GenerationRequest;
use super::ImageData;

#[async_trait]
pub trait Backend {
    /// Returns the name of the backend, used in logs.
    fn name(&self) -> &'static str;

    /// Requests a single image for the prompt and model in `request`. Any
    /// response that doesn't carry image data is an error, even when the
    /// backend reports success.
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageData, GenerationError>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
