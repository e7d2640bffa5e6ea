use std::path::PathBuf;

use serde::Deserialize;

/// Knobs for [`crate::setup`].
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Loaded before anything is resolved. Relative paths are taken from the
    /// working directory, which is the package root under `cargo test`.
    pub env_file: PathBuf,
    /// Named profile from the shared config files, `None` for the default one.
    pub profile: Option<String>,
    /// Used only when the chain can't find a region on its own.
    pub default_region: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            env_file: PathBuf::from(".env"),
            profile: None,
            default_region: None,
        }
    }
}

impl Settings {
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    pub fn default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = Some(region.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"profile": "ci"}"#).unwrap();

        assert_eq!(settings.env_file, PathBuf::from(".env"));
        assert_eq!(settings.profile.as_deref(), Some("ci"));
        assert_eq!(settings.default_region, None);
    }

    #[test]
    fn setters_chain() {
        let settings = Settings::default()
            .env_file("tests/.env")
            .default_region("us-east-1");

        assert_eq!(settings.env_file, PathBuf::from("tests/.env"));
        assert_eq!(settings.default_region.as_deref(), Some("us-east-1"));
        assert_eq!(settings.profile, None);
    }
}
