//! Typed plugin configuration built from the common and iOS property files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::PropsResult;
use crate::properties::{list_literal, PropertySet};

/// Package name used when `pluginPackage` is not configured.
pub const DEFAULT_PLUGIN_PACKAGE: &str = "org.godotengine.plugin.admob";

const EXTRA_PREFIX: &str = "extra";
const GRADLE_PREFIX: &str = "gradle";

/// Target platform of a distributable archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Android,
    Ios,
    /// Android and iOS combined in one archive.
    Multi,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Multi];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Multi => "Multi",
        })
    }
}

/// iOS settings read from `ios/config/config.properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IosConfig {
    pub platform_version: String,
    pub frameworks: Vec<String>,
    pub embedded_frameworks: Vec<String>,
    pub linker_flags: Vec<String>,
    pub initialization_method: String,
    pub deinitialization_method: String,
}

impl IosConfig {
    pub fn from_properties(props: &PropertySet) -> PropsResult<Self> {
        Ok(Self {
            platform_version: props.require("platform_version")?.to_string(),
            frameworks: props.get_list("frameworks"),
            embedded_frameworks: props.get_list("embedded_frameworks"),
            linker_flags: props.get_list("flags"),
            initialization_method: props.require("initialization_method")?.to_string(),
            deinitialization_method: props.require("deinitialization_method")?.to_string(),
        })
    }
}

/// Everything the generation tasks know about the plugin being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Engine node name (e.g. `Admob`).
    pub node_name: String,
    /// `<node_name>Plugin`; names the addon directory and the binaries.
    pub name: String,
    pub module_name: Option<String>,
    pub package: String,
    pub version: String,
    pub ios: IosConfig,
    /// `extra.<name>` properties with the prefix stripped.
    pub extra: BTreeMap<String, String>,
}

impl PluginConfig {
    /// Loads the common and iOS property files.
    pub fn load(common: &Path, ios: &Path) -> PropsResult<Self> {
        let common = PropertySet::load(common)?;
        let ios = PropertySet::load(ios)?;
        Self::from_properties(&common, &ios)
    }

    pub fn from_properties(common: &PropertySet, ios: &PropertySet) -> PropsResult<Self> {
        let node_name = common.require("pluginNodeName")?.to_string();
        let name = format!("{node_name}Plugin");

        let mut extra = BTreeMap::new();
        for (key, value) in common.with_prefix(EXTRA_PREFIX) {
            debug!(property = key, value, "Set extra property");
            extra.insert(key.to_string(), value.to_string());
        }
        for (key, script) in common.with_prefix(GRADLE_PREFIX) {
            warn!(property = key, script, "Ignoring host build script reference");
        }

        Ok(Self {
            node_name,
            name,
            module_name: common.get("pluginModuleName").map(str::to_string),
            package: common
                .get("pluginPackage")
                .unwrap_or(DEFAULT_PLUGIN_PACKAGE)
                .to_string(),
            version: common.require("pluginVersion")?.to_string(),
            ios: IosConfig::from_properties(ios)?,
            extra,
        })
    }

    /// `<pluginName>-<Platform>-v<version>.zip`
    pub fn archive_name(&self, platform: Platform) -> String {
        format!("{}-{}-v{}.zip", self.name, platform, self.version)
    }

    /// File name of the compiled Android library for a build variant.
    pub fn aar_name(&self, variant: &str) -> String {
        format!("{}-{}.aar", self.name, variant)
    }

    /// Tokens substituted by name in the GDScript templates, before the
    /// generic sweep. `android_dependencies` are resolved catalog coordinates.
    pub fn script_tokens(&self, android_dependencies: &[String]) -> Vec<(String, String)> {
        vec![
            ("pluginName".into(), self.name.clone()),
            ("pluginNodeName".into(), self.node_name.clone()),
            ("pluginVersion".into(), self.version.clone()),
            ("pluginPackage".into(), self.package.clone()),
            ("androidDependencies".into(), list_literal(android_dependencies)),
            ("iosPlatformVersion".into(), self.ios.platform_version.clone()),
            ("iosFrameworks".into(), list_literal(&self.ios.frameworks)),
            ("iosEmbeddedFrameworks".into(), list_literal(&self.ios.embedded_frameworks)),
            ("iosLinkerFlags".into(), list_literal(&self.ios.linker_flags)),
        ]
    }

    /// Tokens substituted in the iOS `.gdip` plugin descriptors.
    pub fn ios_config_tokens(&self) -> Vec<(String, String)> {
        vec![
            ("pluginName".into(), self.name.clone()),
            ("iosInitializationMethod".into(), self.ios.initialization_method.clone()),
            ("iosDeinitializationMethod".into(), self.ios.deinitialization_method.clone()),
        ]
    }

    /// Every named build property, as raw strings, for the generic token sweep.
    ///
    /// Comma-joined values are returned unsplit; the sweep decides how to
    /// render them. Extra properties never replace the core keys.
    pub fn build_properties(&self) -> PropertySet {
        let mut props = self.extra.clone();
        props.insert("pluginNodeName".into(), self.node_name.clone());
        props.insert("pluginName".into(), self.name.clone());
        props.insert("pluginPackageName".into(), self.package.clone());
        props.insert("pluginVersion".into(), self.version.clone());
        if let Some(module) = &self.module_name {
            props.insert("pluginModuleName".into(), module.clone());
        }
        props.insert("iosPlatformVersion".into(), self.ios.platform_version.clone());
        props.insert("iosFrameworks".into(), self.ios.frameworks.join(","));
        props.insert("iosEmbeddedFrameworks".into(), self.ios.embedded_frameworks.join(","));
        props.insert("iosLinkerFlags".into(), self.ios.linker_flags.join(","));
        props.insert("pluginArchive".into(), self.archive_name(Platform::Android));
        for platform in Platform::ALL {
            props.insert(format!("pluginArchive{platform}"), self.archive_name(platform));
        }
        props.into_iter().collect()
    }
}
