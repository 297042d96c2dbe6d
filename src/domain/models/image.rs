#[cfg(test)]
#[path = "image_test.rs"]
mod tests;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

// Signature, IHDR chunk header, width and height: 24 bytes, 32 base64 chars.
const PNG_HEADER_BASE64_LEN: usize = 32;

fn png_dimensions(base64: &str) -> Option<(u32, u32)> {
    let header = STANDARD.decode(base64.get(..PNG_HEADER_BASE64_LEN)?).ok()?;
    if header.len() < 24 || header[..8] != PNG_SIGNATURE || &header[12..16] != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes([header[16], header[17], header[18], header[19]]);
    let height = u32::from_be_bytes([header[20], header[21], header[22], header[23]]);
    return Some((width, height));
}

/// Base64 encoded image as returned in a generation artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    base64: String,
    dimensions: Option<(u32, u32)>,
}

impl ImageData {
    pub fn new(base64: &str) -> ImageData {
        let base64 = base64.trim().to_string();
        let dimensions = png_dimensions(&base64);

        return ImageData { base64, dimensions };
    }

    pub fn base64(&self) -> &str {
        return &self.base64;
    }

    pub fn data_uri(&self) -> String {
        return format!("data:image/png;base64,{}", self.base64);
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        let bytes = STANDARD.decode(&self.base64)?;
        return Ok(bytes);
    }

    /// Size of the decoded image in bytes, computed from the encoded length.
    pub fn size(&self) -> usize {
        let padding = self.base64.chars().rev().take_while(|c| return *c == '=').count();
        return (self.base64.len() / 4 * 3).saturating_sub(padding);
    }

    /// Width and height read from the PNG header when the image was created,
    /// if the payload is a PNG.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        return self.dimensions;
    }
}
