#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Downloads;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::GenerationError;
use crate::domain::models::GenerationRequest;
use crate::domain::models::ImageData;

async fn generate(
    backend: Arc<BackendBox>,
    request: GenerationRequest,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::debug!(backend = %backend.name(), model = %request.model, "Generation requested");

    let worker_request = request.clone();
    let worker = tokio::spawn(async move {
        return backend.generate(&worker_request).await;
    });

    // The UI stays pending until a response arrives, so a failed worker still
    // has to report back.
    let res = match worker.await {
        Ok(res) => res,
        Err(err) => {
            tracing::error!(error = ?err, "Generation worker failed");
            Err(GenerationError::Transport(err.to_string()))
        }
    };

    tx.send(Event::GenerationResponse(request, res))?;
    return Ok(());
}

async fn download(
    downloads: &Downloads,
    image: ImageData,
    file_name: String,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let res = downloads
        .save(&image, &file_name)
        .await
        .map_err(|err| return err.to_string());

    tx.send(Event::DownloadResponse(res))?;
    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        downloads: Downloads,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        while let Some(action) = rx.recv().await {
            match action {
                Action::Download(image, file_name) => {
                    download(&downloads, image, file_name, &tx).await?;
                }
                Action::Generate(request) => {
                    let worker_backend = backend.clone();
                    let worker_tx = tx.clone();
                    tokio::spawn(async move {
                        if let Err(err) = generate(worker_backend, request, worker_tx).await {
                            tracing::error!(error = ?err, "Failed to deliver generation response");
                        }
                    });
                }
            }
        }

        return Ok(());
    }
}
