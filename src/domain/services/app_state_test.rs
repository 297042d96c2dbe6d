use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use mockito::Matcher;
use test_utils::artifacts_response_fixture;
use test_utils::error_response_fixture;

use super::AppState;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::GenerationError;
use crate::domain::models::GenerationRequest;
use crate::domain::models::ImageData;
use crate::domain::models::View;
use crate::infrastructure::backends::stability::Stability;

impl Default for AppState {
    fn default() -> AppState {
        return AppState::new("stable-diffusion-xl-1024-v1-0");
    }
}

struct FakeBackend {
    calls: Arc<AtomicUsize>,
    response: Result<ImageData, GenerationError>,
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &'static str {
        return "fake";
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<ImageData, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        return self.response.clone();
    }
}

fn fake_backend(response: Result<ImageData, GenerationError>) -> (BackendBox, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = FakeBackend {
        calls: calls.clone(),
        response,
    };

    return (Box::new(backend), calls);
}

mod input_state {
    use super::*;

    #[test]
    fn it_starts_idle() {
        let app_state = AppState::default();

        assert_eq!(app_state.active_view, View::Generate);
        assert!(!app_state.is_loading);
        assert!(app_state.last_error.is_none());
        assert!(app_state.current_image.is_none());
        assert!(app_state.gallery.is_empty());
    }

    #[test]
    fn it_defaults_to_the_first_model() {
        let app_state = AppState::new("");
        assert_eq!(app_state.selected_model, "stable-diffusion-xl-1024-v1-0");
    }

    #[test]
    fn it_cycles_models() {
        let mut app_state = AppState::default();
        app_state.select_next_model();
        assert_eq!(app_state.selected_model, "stable-diffusion-v1-6");

        app_state.select_previous_model();
        app_state.select_previous_model();
        assert_eq!(app_state.selected_model, "stable-diffusion-768-v2-1");

        app_state.select_next_model();
        assert_eq!(app_state.selected_model, "stable-diffusion-xl-1024-v1-0");
    }

    #[test]
    fn it_recovers_from_unknown_models_when_cycling() {
        let mut app_state = AppState::new("my-custom-model");
        app_state.select_next_model();
        assert_eq!(app_state.selected_model, "stable-diffusion-xl-1024-v1-0");
    }

    #[test]
    fn it_toggles_views() {
        let mut app_state = AppState::default();
        app_state.toggle_view();
        assert_eq!(app_state.active_view, View::Gallery);

        app_state.toggle_view();
        assert_eq!(app_state.active_view, View::Generate);

        app_state.set_view(View::Gallery);
        assert_eq!(app_state.active_view, View::Gallery);
    }

    #[test]
    fn it_keeps_the_gallery_cursor_in_bounds() {
        let mut app_state = AppState::default();
        app_state.gallery_down();
        assert_eq!(app_state.gallery_selected, 0);

        for prompt in ["one", "two"] {
            app_state.set_prompt(prompt);
            let request = app_state.begin_generation().unwrap();
            app_state.complete_generation(request, Ok(ImageData::new("AAA")));
        }

        app_state.gallery_down();
        app_state.gallery_down();
        assert_eq!(app_state.gallery_selected, 1);
        assert_eq!(app_state.selected_record().unwrap().prompt, "one");

        app_state.gallery_up();
        app_state.gallery_up();
        assert_eq!(app_state.gallery_selected, 0);
    }
}

mod generation {
    use super::*;

    #[tokio::test]
    async fn it_rejects_empty_prompts_without_calling_the_backend() {
        for prompt in ["", " ", "\n\t  "] {
            let (backend, calls) = fake_backend(Ok(ImageData::new("AAA")));
            let mut app_state = AppState::default();
            app_state.set_prompt(prompt);

            let res = app_state.generate(&backend).await;

            assert_eq!(res, Err(GenerationError::validation()));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert_eq!(app_state.last_error, Some("Please enter a prompt".to_string()));
            assert!(!app_state.is_loading);
            assert!(app_state.gallery.is_empty());
        }
    }

    #[test]
    fn it_is_pending_only_between_begin_and_complete() {
        let mut app_state = AppState::default();
        app_state.set_prompt("a red fox in snow");
        assert!(!app_state.is_loading);

        let request = app_state.begin_generation().unwrap();
        assert!(app_state.is_loading);

        app_state.complete_generation(request, Err(GenerationError::MissingArtifact));
        assert!(!app_state.is_loading);
    }

    #[test]
    fn it_rejects_new_generations_while_pending() {
        let mut app_state = AppState::default();
        app_state.set_prompt("a red fox in snow");
        let request = app_state.begin_generation().unwrap();

        assert_eq!(app_state.begin_generation(), Err(GenerationError::Busy));
        assert!(app_state.is_loading);
        assert!(app_state.last_error.is_none());

        app_state.complete_generation(request, Ok(ImageData::new("AAA")));
        assert_eq!(app_state.gallery.len(), 1);
    }

    #[test]
    fn it_clears_previous_results_when_starting() {
        let mut app_state = AppState::default();
        app_state.set_prompt("first");
        let request = app_state.begin_generation().unwrap();
        app_state.complete_generation(request, Ok(ImageData::new("AAA")));
        app_state.last_error = Some("old".to_string());
        app_state.notice = Some("Saved".to_string());

        app_state.set_prompt("second");
        app_state.begin_generation().unwrap();

        assert!(app_state.current_image.is_none());
        assert!(app_state.last_error.is_none());
        assert!(app_state.notice.is_none());
        assert_eq!(app_state.gallery.len(), 1);
    }

    #[test]
    fn it_prepends_successes_and_preserves_order() {
        let mut app_state = AppState::default();
        for prompt in ["one", "two", "three"] {
            app_state.set_prompt(prompt);
            let request = app_state.begin_generation().unwrap();
            app_state.complete_generation(request, Ok(ImageData::new(prompt)));
        }

        let prompts = app_state
            .gallery
            .records()
            .iter()
            .map(|r| return r.prompt.as_str())
            .collect::<Vec<&str>>();

        assert_eq!(prompts, vec!["three", "two", "one"]);
        assert_eq!(app_state.current_image.as_ref().unwrap().prompt, "three");
    }

    #[test]
    fn it_leaves_gallery_and_image_untouched_on_missing_artifacts() {
        let mut app_state = AppState::default();
        app_state.set_prompt("one");
        let request = app_state.begin_generation().unwrap();
        app_state.complete_generation(request, Ok(ImageData::new("AAA")));

        app_state.set_prompt("two");
        let request = app_state.begin_generation().unwrap();
        app_state.complete_generation(request, Err(GenerationError::MissingArtifact));

        assert_eq!(app_state.gallery.len(), 1);
        assert!(app_state.current_image.is_none());
        assert_eq!(app_state.last_error, Some("No image in response".to_string()));
    }

    #[tokio::test]
    async fn it_generates_with_the_selected_model() {
        let (backend, calls) = fake_backend(Ok(ImageData::new("AAA")));
        let mut app_state = AppState::default();
        app_state.select_next_model();
        app_state.set_prompt("a lighthouse");

        let res = app_state.generate(&backend).await;

        assert!(res.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let record = app_state.gallery.get(0).unwrap();
        assert_eq!(record.model, "stable-diffusion-v1-6");
        assert_eq!(record.prompt, "a lighthouse");
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn it_generates_a_red_fox() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock(
                "POST",
                "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image",
            )
            .with_status(200)
            .with_body(artifacts_response_fixture("AAA"))
            .create();

        let backend: BackendBox = Box::new(Stability::new(&server.url(), "abc"));
        let mut app_state = AppState::default();
        app_state.last_error = Some("Please enter a prompt".to_string());
        app_state.set_prompt("a red fox in snow");

        let res = app_state.generate(&backend).await;
        mock.assert();

        assert!(res.is_ok());
        assert!(!app_state.is_loading);
        assert!(app_state.last_error.is_none());
        assert_eq!(
            app_state.current_image.as_ref().unwrap().image.data_uri(),
            "data:image/png;base64,AAA"
        );
        assert_eq!(app_state.gallery.len(), 1);

        let record = app_state.gallery.get(0).unwrap();
        assert_eq!(record.prompt, "a red fox in snow");
        assert_eq!(record.model, "stable-diffusion-xl-1024-v1-0");
    }

    #[tokio::test]
    async fn it_rejects_an_empty_prompt() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let backend: BackendBox = Box::new(Stability::new(&server.url(), "abc"));
        let mut app_state = AppState::default();
        app_state.set_prompt("");

        let res = app_state.generate(&backend).await;
        mock.assert();

        assert!(res.is_err());
        assert_eq!(app_state.last_error, Some("Please enter a prompt".to_string()));
        assert!(app_state.gallery.is_empty());
    }

    #[tokio::test]
    async fn it_shows_the_api_error_on_unauthorized() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock(
                "POST",
                "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image",
            )
            .with_status(401)
            .with_body(error_response_fixture("invalid api key"))
            .create();

        let backend: BackendBox = Box::new(Stability::new(&server.url(), ""));
        let mut app_state = AppState::default();
        app_state.set_prompt("a red fox in snow");

        let res = app_state.generate(&backend).await;
        mock.assert();

        assert!(res.is_err());
        assert_eq!(app_state.last_error, Some("invalid api key".to_string()));
        assert!(app_state.gallery.is_empty());
        assert!(app_state.current_image.is_none());
        assert!(!app_state.is_loading);
    }
}
