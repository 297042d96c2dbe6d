pub mod stability;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    /// Stability backend configured from the loaded api url and key.
    pub fn get() -> BackendBox {
        return Box::<stability::Stability>::default();
    }
}
