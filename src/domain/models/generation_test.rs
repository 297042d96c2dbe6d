use super::GenerationError;
use super::GenerationRecord;
use super::GenerationRequest;
use super::TextToImageBody;
use crate::domain::models::ImageData;

#[test]
fn it_builds_xl_request_bodies() {
    let request = GenerationRequest::new("a red fox in snow", "stable-diffusion-xl-1024-v1-0");
    let body = TextToImageBody::from(&request);

    insta::assert_json_snapshot!(body, @r###"
    {
      "text_prompts": [
        {
          "text": "a red fox in snow"
        }
      ],
      "cfg_scale": 7,
      "height": 1024,
      "width": 1024,
      "steps": 30,
      "samples": 1
    }
    "###);
}

#[test]
fn it_builds_512_request_bodies() {
    let request = GenerationRequest::new("a lighthouse", "stable-diffusion-768-v2-1");
    let body = TextToImageBody::from(&request);

    assert_eq!(body.width, 512);
    assert_eq!(body.height, 512);
    assert_eq!(body.text_prompts.len(), 1);
}

#[test]
fn it_prefers_the_server_message() {
    let err = GenerationError::Api {
        status: 401,
        message: Some("invalid api key".to_string()),
    };
    assert_eq!(err.to_string(), "invalid api key");
}

#[test]
fn it_falls_back_to_the_status_text() {
    let err = GenerationError::Api {
        status: 500,
        message: None,
    };
    assert_eq!(err.to_string(), "Request failed with status code 500");

    let err = GenerationError::Api {
        status: 502,
        message: Some("  ".to_string()),
    };
    assert_eq!(err.to_string(), "Request failed with status code 502");
}

#[test]
fn it_falls_back_to_a_generic_message() {
    let err = GenerationError::Transport("".to_string());
    assert_eq!(err.to_string(), "Generation failed");
}

#[test]
fn it_describes_missing_artifacts_and_validation() {
    assert_eq!(GenerationError::MissingArtifact.to_string(), "No image in response");
    assert_eq!(GenerationError::validation().to_string(), "Please enter a prompt");
}

#[test]
fn it_creates_records_from_requests() {
    let request = GenerationRequest::new("a red fox in snow", "stable-diffusion-v1-6");
    let record = GenerationRecord::new(&request, ImageData::new("AAA"));

    assert_eq!(record.prompt, "a red fox in snow");
    assert_eq!(record.model, "stable-diffusion-v1-6");
    assert_eq!(record.model_display_name(), "SD 1.6");
    assert_eq!(record.image.data_uri(), "data:image/png;base64,AAA");
}
