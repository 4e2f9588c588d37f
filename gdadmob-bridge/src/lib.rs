//! Engine-facing adapters over the mobile ads SDK.
//!
//! The SDK and the platform UI are reached through traits
//! ([`BannerHost`], [`FullScreenAdLoader`], [`NativeAdLoader`],
//! [`NativeAdHost`], [`ConsentProvider`], [`MobileAdsAudio`],
//! [`SettingsStore`]), so the adapter logic (main-thread marshalling, banner
//! placement, load and show rules, form lifetime, settings defaults) is
//! independent of any vendor library. Values handed to the engine convert to
//! dictionaries represented as `serde_json::Value` objects.

mod banner;
mod binding;
mod consent;
mod error;
mod full_screen;
mod main_thread;
mod model;
mod native_ad;
mod settings;

pub use banner::{
    dp_to_px, px_to_dp, AdPosition, AdSize, Anchor, Banner, BannerDelegate, BannerHost,
    BannerParams, BannerSize, BannerView, Horizontal, Insets, Vertical, WindowInsets,
};
pub use binding::{
    bind_native_ad, star_states, AdViewSlots, ButtonSlot, ImageAsset, ImageSlot, MediaContent,
    MediaSlot, NativeAdAssets, RatingSlot, StarState, TextSlot,
};
pub use consent::{
    form_error_dictionary, ConsentCallback, ConsentForm, ConsentManager, ConsentProvider,
    ConsentRequestParameters, ConsentStatus,
};
pub use error::{BridgeError, BridgeResult};
pub use full_screen::{
    FullScreenAd, FullScreenAdDelegate, FullScreenAdLoader, FullScreenContent, FullScreenKind,
    APP_OPEN_AD_LIFETIME,
};
pub use main_thread::{ImmediateMainThread, MainTask, MainThread, QueuedMainThread};
pub use model::{
    AdError, AdInfo, LoadAdError, LoadAdRequest, ResponseInfo, RewardItem, ServerSideVerification,
};
pub use native_ad::{
    points_to_dp, NativeAd, NativeAdDelegate, NativeAdHost, NativeAdLoader, NativeAdView,
    ViewLayout,
};
pub use settings::{
    AdSettings, GlobalSettings, JsonFileStore, MemoryStore, MobileAdsAudio, SettingsStore,
    KEY_ADS_MUTED, KEY_AD_VOLUME, KEY_APPLY_AT_STARTUP,
};
