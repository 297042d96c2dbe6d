use super::GenerationRequest;
use super::ImageData;

pub enum Action {
    /// Writes the image to the output directory under the given file name.
    Download(ImageData, String),
    Generate(GenerationRequest),
}
