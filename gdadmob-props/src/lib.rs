//! Property loading for the Godot AdMob plugin build.
//!
//! Three inputs drive every generation task:
//! - flat `key=value` property files (`config.properties`,
//!   `mediation.properties`, the iOS `config.properties`)
//! - the typed [`PluginConfig`] derived from the common and iOS property files
//! - the Android [`VersionCatalog`] listing the plugin's library dependencies
//!
//! A [`PropertySet`] is immutable once loaded and iterates in key order, so
//! anything derived from it is deterministic.

mod catalog;
mod error;
mod plugin;
mod properties;

pub use catalog::{LibraryCoordinate, VersionCatalog};
pub use error::{PropsError, PropsResult};
pub use plugin::{IosConfig, Platform, PluginConfig, DEFAULT_PLUGIN_PACKAGE};
pub use properties::{list_literal, split_list, PropertySet};
