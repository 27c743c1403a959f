use crate::foundation::rng::RandomSource;

/// Artwork files shipped in `assets/`, in button order.
pub const PRESET_DOODLES: [&str; 5] = [
    "doodle_01.svg",
    "doodle_02.svg",
    "doodle_03.svg",
    "doodle_04.svg",
    "doodle_05.svg",
];

/// Which artwork to load.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DoodleRequest {
    /// Any of the presets, uniformly.
    #[default]
    Random,
    /// A file name relative to the assets directory.
    Named(String),
}

impl DoodleRequest {
    /// Resolve to a concrete scene id. `Random` consumes one sample.
    pub fn resolve(&self, rng: &mut dyn RandomSource) -> String {
        match self {
            Self::Named(id) => id.clone(),
            Self::Random => PRESET_DOODLES[rng.pick_index(PRESET_DOODLES.len())].to_string(),
        }
    }
}

impl From<String> for DoodleRequest {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("random") {
            Self::Random
        } else {
            Self::Named(trimmed.to_string())
        }
    }
}

impl From<&str> for DoodleRequest {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DoodleRequest> for String {
    fn from(value: DoodleRequest) -> Self {
        match value {
            DoodleRequest::Random => "random".to_string(),
            DoodleRequest::Named(id) => id,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/doodle.rs"]
mod tests;
