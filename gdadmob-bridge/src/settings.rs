//! Persistent global ad settings: volume, mute and apply-at-startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};
use crate::main_thread::lock;

pub const KEY_AD_VOLUME: &str = "ad_volume";
pub const KEY_ADS_MUTED: &str = "ads_muted";
pub const KEY_APPLY_AT_STARTUP: &str = "apply_at_startup";

/// Settings exchanged with the engine. Unset fields mean "leave as is" when
/// saving and "use the default" when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_volume: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_at_startup: Option<bool>,
}

impl AdSettings {
    pub const DEFAULT_AD_VOLUME: f32 = 1.0;
    pub const DEFAULT_ADS_MUTED: bool = false;
    pub const DEFAULT_APPLY_AT_STARTUP: bool = false;

    pub fn ad_volume(&self) -> f32 {
        self.ad_volume.unwrap_or(Self::DEFAULT_AD_VOLUME)
    }

    pub fn ads_muted(&self) -> bool {
        self.ads_muted.unwrap_or(Self::DEFAULT_ADS_MUTED)
    }

    pub fn apply_at_startup(&self) -> bool {
        self.apply_at_startup.unwrap_or(Self::DEFAULT_APPLY_AT_STARTUP)
    }

    pub fn with_ad_volume(mut self, volume: f32) -> Self {
        self.ad_volume = Some(volume);
        self
    }

    pub fn with_ads_muted(mut self, muted: bool) -> Self {
        self.ads_muted = Some(muted);
        self
    }

    pub fn with_apply_at_startup(mut self, apply: bool) -> Self {
        self.apply_at_startup = Some(apply);
        self
    }

    pub fn from_dictionary(value: Value) -> BridgeResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Only set fields appear in the dictionary.
    pub fn to_dictionary(&self) -> BridgeResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Key/value persistence, in the manner of platform preferences.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    /// Persists pending writes.
    fn flush(&self) -> BridgeResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        lock(&self.values).insert(key.to_string(), value);
    }

    fn flush(&self) -> BridgeResult<()> {
        Ok(())
    }
}

/// A JSON object file, read once on open and rewritten on flush.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> BridgeResult<Self> {
        let path = path.into();
        let values = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|source| BridgeError::Store {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        lock(&self.values).insert(key.to_string(), value);
    }

    fn flush(&self) -> BridgeResult<()> {
        let text = serde_json::to_string_pretty(&*lock(&self.values))?;
        let store_err = |source| BridgeError::Store {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(store_err)?;
        }
        std::fs::write(&self.path, text).map_err(store_err)?;
        debug!(path = %self.path.display(), "Saved ad settings");
        Ok(())
    }
}

/// The SDK-wide audio settings that [`GlobalSettings::apply`] drives.
pub trait MobileAdsAudio {
    fn set_muted(&mut self, muted: bool);
    fn set_volume(&mut self, volume: f32);
}

#[derive(Clone)]
pub struct GlobalSettings {
    store: Arc<dyn SettingsStore>,
}

impl GlobalSettings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Reads every field, falling back to the default for missing or
    /// mistyped values, so the result is always fully set.
    pub fn load(&self) -> AdSettings {
        let volume = self
            .store
            .get(KEY_AD_VOLUME)
            .and_then(|v| v.as_f64())
            .map_or(AdSettings::DEFAULT_AD_VOLUME, |v| v as f32);
        let muted = self
            .store
            .get(KEY_ADS_MUTED)
            .and_then(|v| v.as_bool())
            .unwrap_or(AdSettings::DEFAULT_ADS_MUTED);
        let apply = self
            .store
            .get(KEY_APPLY_AT_STARTUP)
            .and_then(|v| v.as_bool())
            .unwrap_or(AdSettings::DEFAULT_APPLY_AT_STARTUP);
        AdSettings {
            ad_volume: Some(volume),
            ads_muted: Some(muted),
            apply_at_startup: Some(apply),
        }
    }

    /// Writes the fields that are set and leaves the others untouched.
    pub fn save(&self, settings: &AdSettings) -> BridgeResult<()> {
        if let Some(volume) = settings.ad_volume {
            self.store.set(KEY_AD_VOLUME, Value::from(f64::from(volume)));
        }
        if let Some(muted) = settings.ads_muted {
            self.store.set(KEY_ADS_MUTED, Value::Bool(muted));
        }
        if let Some(apply) = settings.apply_at_startup {
            self.store.set(KEY_APPLY_AT_STARTUP, Value::Bool(apply));
        }
        self.store.flush()
    }

    /// Pushes settings to the SDK. Mute goes first; the SDK ignores volume
    /// changes while the mute state is unset. Volume is clamped to
    /// `[0.0, 1.0]`.
    pub fn apply(settings: &AdSettings, audio: &mut dyn MobileAdsAudio) {
        if let Some(muted) = settings.ads_muted {
            audio.set_muted(muted);
        }
        if let Some(volume) = settings.ad_volume {
            let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
            audio.set_volume(volume);
            debug!(volume = f64::from(volume), "Applied ad volume");
        }
    }

    /// Applies the stored settings if they ask to be applied at startup.
    /// Returns whether they were applied.
    pub fn apply_stored_at_startup(&self, audio: &mut dyn MobileAdsAudio) -> bool {
        let settings = self.load();
        if !settings.apply_at_startup() {
            return false;
        }
        Self::apply(&settings, audio);
        true
    }
}

impl std::fmt::Debug for GlobalSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalSettings").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingAudio {
        calls: Vec<String>,
        volume: Option<f32>,
    }

    impl MobileAdsAudio for RecordingAudio {
        fn set_muted(&mut self, muted: bool) {
            self.calls.push(format!("muted={muted}"));
        }

        fn set_volume(&mut self, volume: f32) {
            self.calls.push("volume".into());
            self.volume = Some(volume);
        }
    }

    #[test]
    fn defaults_when_store_is_empty() {
        let settings = GlobalSettings::new(Arc::new(MemoryStore::new())).load();
        assert_eq!(settings.ad_volume(), 1.0);
        assert!(!settings.ads_muted());
        assert!(!settings.apply_at_startup());
    }

    #[test]
    fn save_writes_only_set_fields() {
        let store = Arc::new(MemoryStore::new());
        let global = GlobalSettings::new(store.clone());
        global
            .save(&AdSettings::default().with_ad_volume(0.5).with_ads_muted(true))
            .unwrap();
        global
            .save(&AdSettings::default().with_apply_at_startup(true))
            .unwrap();

        let loaded = global.load();
        assert_eq!(loaded.ad_volume(), 0.5);
        assert!(loaded.ads_muted());
        assert!(loaded.apply_at_startup());
    }

    #[test]
    fn mistyped_values_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY_AD_VOLUME, json!("loud"));
        store.set(KEY_ADS_MUTED, json!(1));
        let loaded = GlobalSettings::new(store).load();
        assert_eq!(loaded.ad_volume(), 1.0);
        assert!(!loaded.ads_muted());
    }

    #[test]
    fn mute_is_applied_before_volume() {
        let mut audio = RecordingAudio::default();
        GlobalSettings::apply(
            &AdSettings::default().with_ad_volume(0.3).with_ads_muted(false),
            &mut audio,
        );
        assert_eq!(audio.calls, vec!["muted=false", "volume"]);
    }

    #[test]
    fn unset_fields_are_not_applied() {
        let mut audio = RecordingAudio::default();
        GlobalSettings::apply(&AdSettings::default().with_ad_volume(0.3), &mut audio);
        assert_eq!(audio.calls, vec!["volume"]);
    }

    #[test]
    fn startup_apply_is_opt_in() {
        let store = Arc::new(MemoryStore::new());
        let global = GlobalSettings::new(store);
        let mut audio = RecordingAudio::default();
        assert!(!global.apply_stored_at_startup(&mut audio));
        assert!(audio.calls.is_empty());

        global
            .save(&AdSettings::default().with_apply_at_startup(true).with_ad_volume(0.25))
            .unwrap();
        assert!(global.apply_stored_at_startup(&mut audio));
        assert_eq!(audio.volume, Some(0.25));
    }

    #[test]
    fn dictionary_omits_unset_fields() {
        let settings = AdSettings::default().with_ads_muted(true);
        assert_eq!(settings.to_dictionary().unwrap(), json!({ "ads_muted": true }));
        let parsed = AdSettings::from_dictionary(json!({ "ad_volume": 0.5 })).unwrap();
        assert_eq!(parsed, AdSettings::default().with_ad_volume(0.5));
    }

    proptest! {
        #[test]
        fn applied_volume_is_clamped(volume in proptest::num::f32::ANY) {
            let mut audio = RecordingAudio::default();
            GlobalSettings::apply(&AdSettings::default().with_ad_volume(volume), &mut audio);
            let applied = audio.volume.unwrap();
            prop_assert!((0.0..=1.0).contains(&applied));
        }
    }
}
