use std::path::PathBuf;

use tui_textarea::Input;

use super::GenerationError;
use super::GenerationRequest;
use super::ImageData;

pub enum Event {
    DownloadResponse(Result<PathBuf, String>),
    GenerationResponse(GenerationRequest, Result<ImageData, GenerationError>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardCTRLP(),
    KeyboardCTRLS(),
    KeyboardEnter(),
    KeyboardPaste(String),
    KeyboardTab(),
    UIScrollDown(),
    UIScrollUp(),
    UITick(),
}
