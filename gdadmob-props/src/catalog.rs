//! Android library version catalog (`libs.versions.toml`).
//!
//! Every library alias is resolved to a `group:name:version` coordinate. The
//! resolved list feeds the `androidDependencies` token of the plugin script.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{PropsError, PropsResult};

/// A resolved Maven coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LibraryCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl fmt::Display for LibraryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    versions: BTreeMap<String, String>,
    #[serde(default)]
    libraries: BTreeMap<String, LibrarySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LibrarySpec {
    /// `alias = "group:name:version"`
    Notation(String),
    Table {
        module: Option<String>,
        group: Option<String>,
        name: Option<String>,
        version: Option<VersionSpec>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionSpec {
    Literal(String),
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
}

/// Resolved catalog: library aliases in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    libraries: BTreeMap<String, LibraryCoordinate>,
}

impl VersionCatalog {
    pub fn load(path: &Path) -> PropsResult<Self> {
        if !path.exists() {
            return Err(PropsError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| PropsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&text)?;
        debug!(path = %path.display(), libraries = catalog.libraries.len(), "Loaded version catalog");
        Ok(catalog)
    }

    pub fn parse(text: &str) -> PropsResult<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        let mut libraries = BTreeMap::new();
        for (alias, spec) in file.libraries {
            let coordinate = resolve(&alias, spec, &file.versions)?;
            libraries.insert(alias, coordinate);
        }
        Ok(Self { libraries })
    }

    pub fn get(&self, alias: &str) -> Option<&LibraryCoordinate> {
        self.libraries.get(alias)
    }

    /// Coordinates of every library, ordered by alias.
    pub fn dependencies(&self) -> Vec<String> {
        self.libraries.values().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

fn resolve(
    alias: &str,
    spec: LibrarySpec,
    versions: &BTreeMap<String, String>,
) -> PropsResult<LibraryCoordinate> {
    let invalid = |reason: String| PropsError::CatalogInvalid {
        alias: alias.to_string(),
        reason,
    };

    match spec {
        LibrarySpec::Notation(notation) => {
            let parts: Vec<&str> = notation.split(':').collect();
            match parts.as_slice() {
                [group, name, version] if !version.is_empty() => Ok(LibraryCoordinate {
                    group: group.to_string(),
                    name: name.to_string(),
                    version: version.to_string(),
                }),
                _ => Err(invalid(format!("expected 'group:name:version', got '{notation}'"))),
            }
        }
        LibrarySpec::Table {
            module,
            group,
            name,
            version,
        } => {
            let (group, name) = match (module, group, name) {
                (Some(module), None, None) => match module.split_once(':') {
                    Some((g, n)) => (g.to_string(), n.to_string()),
                    None => return Err(invalid(format!("module '{module}' is not 'group:name'"))),
                },
                (None, Some(group), Some(name)) => (group, name),
                _ => return Err(invalid("set either 'module' or both 'group' and 'name'".into())),
            };
            let version = match version {
                Some(VersionSpec::Literal(v)) => v,
                Some(VersionSpec::Reference { reference }) => versions
                    .get(&reference)
                    .cloned()
                    .ok_or_else(|| invalid(format!("unknown version reference '{reference}'")))?,
                None => return Err(invalid("missing version".into())),
            };
            Ok(LibraryCoordinate {
                group,
                name,
                version,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CATALOG: &str = r#"
[versions]
admob = "24.4.0"
ump = "3.2.0"

[libraries]
play-services-ads = { module = "com.google.android.gms:play-services-ads", version.ref = "admob" }
user-messaging-platform = { group = "com.google.android.ump", name = "user-messaging-platform", version.ref = "ump" }
androidx-annotation = "androidx.annotation:annotation:1.9.1"

[plugins]
android-library = { id = "com.android.library", version = "8.9.0" }
"#;

    #[test]
    fn resolves_all_notations_in_alias_order() {
        let catalog = VersionCatalog::parse(CATALOG).unwrap();
        assert_eq!(
            catalog.dependencies(),
            vec![
                "androidx.annotation:annotation:1.9.1",
                "com.google.android.gms:play-services-ads:24.4.0",
                "com.google.android.ump:user-messaging-platform:3.2.0",
            ]
        );
    }

    #[test]
    fn unknown_version_reference_is_rejected() {
        let text = "[libraries]\nads = { module = \"a:b\", version.ref = \"missing\" }\n";
        let err = VersionCatalog::parse(text).unwrap_err();
        assert!(matches!(err, PropsError::CatalogInvalid { alias, .. } if alias == "ads"));
    }

    #[test]
    fn short_notation_must_have_three_parts() {
        let text = "[libraries]\nads = \"a:b\"\n";
        assert!(VersionCatalog::parse(text).is_err());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            VersionCatalog::parse("[libraries\n"),
            Err(PropsError::CatalogParse(_))
        ));
    }
}
