//! Config file loading and validation.
//!
//! The config is TOML: `[profiles.<name>]` tables, each with sources, an
//! optional pattern list, and a target path template.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{FerryError, Result};

/// One directory to scan within a profile.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub recurse: bool,
    /// File type category names, e.g. `["image", "video"]`.
    #[serde(default)]
    pub types: Vec<String>,
    /// Filename patterns tried before the profile-level patterns.
    #[serde(default)]
    pub filenames: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TargetSpec {
    /// Target path template, e.g. `/media/{meta.taken.year}/{meta.taken.date}.{file.extension}`.
    #[serde(default)]
    pub path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProfileSpec {
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    /// Filename patterns shared by all sources of this profile.
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub target: TargetSpec,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Profiles keyed by name. BTreeMap keeps scan order deterministic.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileSpec>,
}

impl Config {
    /// Parse and validate a TOML config document.
    pub fn parse(s: &str) -> Result<Config> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Config> {
        let s = std::fs::read_to_string(path)?;
        Self::parse(&s)
    }

    /// Load a config using the lookup order: the explicit path if given, then
    /// `./mediaferry.toml`, then `mediaferry/mediaferry.toml` under the user
    /// config dir. The first existing file wins.
    pub fn load_preferred(preferred: Option<&Path>) -> Result<Config> {
        let mut tried: Vec<PathBuf> = Vec::new();

        if let Some(p) = preferred {
            tried.push(p.to_path_buf());
            if p.is_file() {
                return Self::load(p);
            }
        }

        let cwd = PathBuf::from("mediaferry.toml");
        tried.push(cwd.clone());
        if cwd.is_file() {
            return Self::load(&cwd);
        }

        if let Some(base) = directories::BaseDirs::new() {
            let p = base.config_dir().join("mediaferry").join("mediaferry.toml");
            tried.push(p.clone());
            if p.is_file() {
                return Self::load(&p);
            }
        }

        let tried = tried
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(FerryError::ConfigNotFound(tried))
    }

    /// Every profile needs a target template; source paths must be non-empty
    /// and distinct across all profiles.
    fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&Path, &str> = HashMap::new();
        for (name, profile) in &self.profiles {
            if profile.target.path.is_empty() {
                return Err(FerryError::InvalidConfig(format!(
                    "profile {name:?}: missing target.path"
                )));
            }
            for src in &profile.sources {
                if src.path.as_os_str().is_empty() {
                    return Err(FerryError::InvalidConfig(format!(
                        "profile {name:?}: source path is empty"
                    )));
                }
                if let Some(prev) = seen.insert(src.path.as_path(), name) {
                    return Err(FerryError::InvalidConfig(format!(
                        "source path {:?} defined in profile {prev:?} and {name:?}",
                        src.path
                    )));
                }
            }
        }
        Ok(())
    }
}
