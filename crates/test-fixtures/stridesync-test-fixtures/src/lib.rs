//! Named JSON fixtures for stridesync tests.
//!
//! `fixtures/manifest.json` maps a short key to a path under `fixtures/`, split
//! into sections (`clips`, `configs`). Fixtures are returned as JSON text so each
//! test decides which loader to exercise.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    clips: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

/// One manifest section.
#[derive(Clone, Copy)]
enum Section {
    Clips,
    Configs,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Section::Clips => "clip",
            Section::Configs => "config",
        }
    }

    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Section::Clips => &MANIFEST.clips,
            Section::Configs => &MANIFEST.configs,
        }
    }

    fn file(self, name: &str) -> Result<PathBuf> {
        let Some(rel) = self.entries().get(name) else {
            bail!("unknown {} fixture '{name}'", self.label());
        };
        Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn text(self, name: &str) -> Result<String> {
        let file = self.file(name)?;
        std::fs::read_to_string(&file).with_context(|| {
            format!("{} fixture '{name}' unreadable at {}", self.label(), file.display())
        })
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        serde_json::from_str(&self.text(name)?)
            .with_context(|| format!("{} fixture '{name}' is not valid JSON", self.label()))
    }

    fn keys(self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Sampled locomotion clips: per-frame root-relative bone positions plus notify tracks.
pub mod clips {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Clips.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Clips.text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::Clips.parse(name)
    }
}

/// Tool configuration documents.
pub mod configs {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        Section::Configs.text(name)
    }

    pub fn keys() -> Vec<String> {
        Section::Configs.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_clip_in_manifest_parses() {
        for key in clips::keys() {
            let value: serde_json::Value = clips::load(&key).expect("clip fixture parses");
            assert!(value.get("bones").is_some(), "{key} has no bones table");
        }
    }

    #[test]
    fn configs_are_listed_and_readable() {
        assert_eq!(configs::keys(), vec!["strict".to_string()]);
        assert!(configs::json("strict").unwrap().contains("stabilization_threshold"));
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = clips::json("does_not_exist").unwrap_err();
        assert!(err.to_string().contains("does_not_exist"));
    }
}
