#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use super::Gallery;
use crate::domain::models::BackendBox;
use crate::domain::models::GenerationError;
use crate::domain::models::GenerationRecord;
use crate::domain::models::GenerationRequest;
use crate::domain::models::ImageData;
use crate::domain::models::ModelOption;
use crate::domain::models::View;

pub struct AppState {
    pub active_view: View,
    pub current_image: Option<GenerationRecord>,
    pub gallery: Gallery,
    pub gallery_selected: usize,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub notice: Option<String>,
    pub prompt: String,
    pub selected_model: String,
}

impl AppState {
    pub fn new(model: &str) -> AppState {
        let mut selected_model = model.to_string();
        if selected_model.is_empty() {
            selected_model = ModelOption::all()[0].id.to_string();
        }

        return AppState {
            active_view: View::Generate,
            current_image: None,
            gallery: Gallery::default(),
            gallery_selected: 0,
            is_loading: false,
            last_error: None,
            notice: None,
            prompt: "".to_string(),
            selected_model,
        };
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn select_next_model(&mut self) {
        let models = ModelOption::all();
        let next = match ModelOption::position(&self.selected_model) {
            Some(idx) => (idx + 1) % models.len(),
            None => 0,
        };
        self.selected_model = models[next].id.to_string();
    }

    pub fn select_previous_model(&mut self) {
        let models = ModelOption::all();
        let previous = match ModelOption::position(&self.selected_model) {
            Some(0) | None => models.len() - 1,
            Some(idx) => idx - 1,
        };
        self.selected_model = models[previous].id.to_string();
    }

    pub fn set_view(&mut self, view: View) {
        self.active_view = view;
    }

    pub fn toggle_view(&mut self) {
        self.active_view = self.active_view.toggle();
    }

    pub fn gallery_up(&mut self) {
        self.gallery_selected = self.gallery_selected.saturating_sub(1);
    }

    pub fn gallery_down(&mut self) {
        if self.gallery_selected + 1 < self.gallery.len() {
            self.gallery_selected += 1;
        }
    }

    pub fn selected_record(&self) -> Option<&GenerationRecord> {
        return self.gallery.get(self.gallery_selected);
    }

    /// Validates the prompt and moves into the pending state. The returned
    /// request must be handed back to `complete_generation` once the backend
    /// resolves, whatever the outcome.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, GenerationError> {
        if self.is_loading {
            return Err(GenerationError::Busy);
        }

        if self.prompt.trim().is_empty() {
            let err = GenerationError::validation();
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        self.last_error = None;
        self.current_image = None;
        self.notice = None;
        self.is_loading = true;

        let request = GenerationRequest::new(&self.prompt, &self.selected_model);
        tracing::debug!(model = %request.model, "Generation started");

        return Ok(request);
    }

    pub fn complete_generation(
        &mut self,
        request: GenerationRequest,
        result: Result<ImageData, GenerationError>,
    ) {
        self.is_loading = false;

        match result {
            Ok(image) => {
                let record = GenerationRecord::new(&request, image);
                self.current_image = Some(record.clone());
                self.gallery.prepend(record);
                self.gallery_selected = 0;
                tracing::debug!(
                    model = %request.model,
                    gallery_len = self.gallery.len(),
                    "Generation finished"
                );
            }
            Err(err) => {
                tracing::error!(error = ?err, model = %request.model, "Generation failed");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Runs a full generation in place against `backend`.
    pub async fn generate(&mut self, backend: &BackendBox) -> Result<(), GenerationError> {
        let request = self.begin_generation()?;
        let result = backend.generate(&request).await;
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        };

        self.complete_generation(request, result);
        return outcome;
    }
}
