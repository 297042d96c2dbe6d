pub mod actions;
mod app_state;
mod downloads;
pub mod events;
mod gallery;

pub use app_state::*;
pub use downloads::*;
pub use gallery::*;
