mod action;
mod backend;
mod event;
mod generation;
mod image;
mod loading;
mod model_option;
mod textarea;
mod view;

pub use action::*;
pub use backend::*;
pub use event::*;
pub use generation::*;
pub use image::*;
pub use loading::*;
pub use model_option::*;
pub use textarea::*;
pub use view::*;
