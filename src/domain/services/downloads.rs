#[cfg(test)]
#[path = "downloads_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ImageData;

pub struct Downloads {
    pub output_dir: path::PathBuf,
}

impl Default for Downloads {
    fn default() -> Downloads {
        return Downloads::new(path::PathBuf::from(Config::get(ConfigKey::OutputDir)));
    }
}

impl Downloads {
    pub fn new(output_dir: path::PathBuf) -> Downloads {
        return Downloads { output_dir };
    }

    /// File name for an image, `generated-<millis>.png` for the current image
    /// or `generated-<index>-<millis>.png` for a gallery entry.
    pub fn file_name(gallery_index: Option<usize>, timestamp_millis: i64) -> String {
        if let Some(idx) = gallery_index {
            return format!("generated-{idx}-{timestamp_millis}.png");
        }

        return format!("generated-{timestamp_millis}.png");
    }

    pub fn file_name_now(gallery_index: Option<usize>) -> String {
        return Downloads::file_name(gallery_index, Local::now().timestamp_millis());
    }

    pub async fn save(&self, image: &ImageData, file_name: &str) -> Result<path::PathBuf> {
        let bytes = image.bytes()?;

        fs::create_dir_all(&self.output_dir).await?;

        let file_path = self.output_dir.join(file_name);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        tracing::debug!(path = ?file_path, bytes = bytes.len(), "Saved image");

        return Ok(file_path);
    }
}
