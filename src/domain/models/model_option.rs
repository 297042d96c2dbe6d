#[cfg(test)]
#[path = "model_option_test.rs"]
mod tests;

/// Models are flagged as the XL variant through their identifier, which also
/// decides the output resolution.
const XL_MARKER: &str = "xl";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub const MODELS: [ModelOption; 4] = [
    ModelOption {
        id: "stable-diffusion-xl-1024-v1-0",
        display_name: "SDXL 1.0",
    },
    ModelOption {
        id: "stable-diffusion-v1-6",
        display_name: "SD 1.6",
    },
    ModelOption {
        id: "stable-diffusion-512-v2-1",
        display_name: "SD 2.1 (512)",
    },
    ModelOption {
        id: "stable-diffusion-768-v2-1",
        display_name: "SD 2.1 (768)",
    },
];

impl ModelOption {
    pub fn all() -> &'static [ModelOption] {
        return &MODELS;
    }

    pub fn ids() -> Vec<&'static str> {
        return MODELS.iter().map(|model| return model.id).collect();
    }

    pub fn find(id: &str) -> Option<ModelOption> {
        return MODELS.iter().find(|model| return model.id == id).copied();
    }

    pub fn position(id: &str) -> Option<usize> {
        return MODELS.iter().position(|model| return model.id == id);
    }

    /// Display name for a model id, falling back to the raw id for models
    /// outside the known list.
    pub fn display_name_for(id: &str) -> String {
        if let Some(model) = ModelOption::find(id) {
            return model.display_name.to_string();
        }

        return id.to_string();
    }

    /// Width and height requested from the API for a model id.
    pub fn dimensions_for(id: &str) -> (u32, u32) {
        if id.contains(XL_MARKER) {
            return (1024, 1024);
        }

        return (512, 512);
    }
}
