//! Pipeline layout configuration read from `gdadmob.toml`.
//!
//! Every path is relative to `project_root`, which defaults to the directory
//! holding the config file. Each field has its own default, matching the
//! layout of the plugin repository, so an empty or absent file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AssemblerError, AssemblerResult};

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gdadmob.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    #[serde(default = "default_common_properties")]
    pub common_properties: PathBuf,
    #[serde(default = "default_ios_properties")]
    pub ios_properties: PathBuf,
    #[serde(default = "default_mediation_properties")]
    pub mediation_properties: PathBuf,
    #[serde(default = "default_version_catalog")]
    pub version_catalog: PathBuf,
    /// GDScript templates, plugin config and icons.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    /// `.gdip` templates.
    #[serde(default = "default_ios_config_dir")]
    pub ios_config_dir: PathBuf,
    /// Generated files, before assembly.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Compiled `.aar` files from the Android build.
    #[serde(default = "default_android_aar_dir")]
    pub android_aar_dir: PathBuf,
    /// Compiled `.xcframework` bundles from the iOS build.
    #[serde(default = "default_ios_framework_dir")]
    pub ios_framework_dir: PathBuf,
    /// Assembled plugin tree.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: PathBuf,
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,
    /// Demo project whose `addons/` receives the installed plugin.
    #[serde(default = "default_demo_dir")]
    pub demo_dir: PathBuf,
    /// Fail validation, instead of warning, on unresolved tokens.
    #[serde(default)]
    pub strict_tokens: bool,
}

fn default_common_properties() -> PathBuf {
    PathBuf::from("common/config/config.properties")
}

fn default_ios_properties() -> PathBuf {
    PathBuf::from("ios/config/config.properties")
}

fn default_mediation_properties() -> PathBuf {
    PathBuf::from("common/config/mediation.properties")
}

fn default_version_catalog() -> PathBuf {
    PathBuf::from("common/gradle/libs.versions.toml")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("addon/src")
}

fn default_ios_config_dir() -> PathBuf {
    PathBuf::from("ios/config")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("addon/build/output")
}

fn default_android_aar_dir() -> PathBuf {
    PathBuf::from("android/build/outputs/aar")
}

fn default_ios_framework_dir() -> PathBuf {
    PathBuf::from("ios/build/framework")
}

fn default_plugin_dir() -> PathBuf {
    PathBuf::from("common/build/plugin")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("release")
}

fn default_demo_dir() -> PathBuf {
    PathBuf::from("demo")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            common_properties: default_common_properties(),
            ios_properties: default_ios_properties(),
            mediation_properties: default_mediation_properties(),
            version_catalog: default_version_catalog(),
            template_dir: default_template_dir(),
            ios_config_dir: default_ios_config_dir(),
            output_dir: default_output_dir(),
            android_aar_dir: default_android_aar_dir(),
            ios_framework_dir: default_ios_framework_dir(),
            plugin_dir: default_plugin_dir(),
            archive_dir: default_archive_dir(),
            demo_dir: default_demo_dir(),
            strict_tokens: false,
        }
    }
}

impl PipelineConfig {
    /// Parses config text; relative paths resolve against `base`
    /// unless `project_root` is set.
    pub fn parse(text: &str, base: &Path, source: &Path) -> AssemblerResult<Self> {
        let mut config: Self = toml::from_str(text).map_err(|e| AssemblerError::Config {
            path: source.to_path_buf(),
            source: e,
        })?;
        config.project_root = Some(match config.project_root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        });
        Ok(config)
    }

    /// Loads an explicitly named config file; it must exist.
    pub fn load(path: &Path) -> AssemblerResult<Self> {
        if !path.is_file() {
            return Err(AssemblerError::MissingInput(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| AssemblerError::io(path, e))?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let config = Self::parse(&text, base, path)?;
        info!(path = %path.display(), "Loaded pipeline config");
        Ok(config)
    }

    /// Loads `gdadmob.toml` from `dir` if present, otherwise defaults
    /// rooted at `dir`.
    pub fn discover(dir: &Path) -> AssemblerResult<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        info!(dir = %dir.display(), "No pipeline config found, using default layout");
        Ok(Self::rooted_at(dir))
    }

    /// Default layout rooted at `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            project_root: Some(root.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn root(&self) -> &Path {
        self.project_root.as_deref().unwrap_or(Path::new("."))
    }

    /// Resolves a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }
}
