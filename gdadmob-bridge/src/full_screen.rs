//! Full-screen ad adapter.
//!
//! One [`FullScreenAd`] drives an interstitial, rewarded, rewarded
//! interstitial or app open ad through the same cycle: load, present once,
//! dismiss. The kinds differ in a few rules, all keyed off
//! [`FullScreenKind`]:
//!
//! - interstitials load their next ad as soon as one is dismissed, and report
//!   those later loads as `reloaded`;
//! - rewarded kinds forward earned rewards and carry server-side
//!   verification options;
//! - app open ads refuse overlapping loads and shows, expire four hours after
//!   loading and can show themselves when the app returns to the foreground.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::main_thread::{lock, MainThread};
use crate::model::{
    AdError, AdInfo, LoadAdError, LoadAdRequest, ResponseInfo, RewardItem, ServerSideVerification,
};

/// How long a loaded app open ad may be shown.
pub const APP_OPEN_AD_LIFETIME: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullScreenKind {
    Interstitial,
    Rewarded,
    RewardedInterstitial,
    AppOpen,
}

impl FullScreenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FullScreenKind::Interstitial => "interstitial",
            FullScreenKind::Rewarded => "rewarded",
            FullScreenKind::RewardedInterstitial => "rewarded_interstitial",
            FullScreenKind::AppOpen => "app_open",
        }
    }

    pub fn grants_rewards(self) -> bool {
        matches!(
            self,
            FullScreenKind::Rewarded | FullScreenKind::RewardedInterstitial
        )
    }

    /// Whether a dismissed ad is replaced by a fresh load.
    pub fn reloads_on_dismiss(self) -> bool {
        self == FullScreenKind::Interstitial
    }

    pub fn expires_after(self) -> Option<Duration> {
        (self == FullScreenKind::AppOpen).then_some(APP_OPEN_AD_LIFETIME)
    }
}

impl fmt::Display for FullScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-side listener.
pub trait FullScreenAdDelegate: Send + Sync {
    fn loaded(&self, info: &AdInfo, response: &ResponseInfo);
    /// A load triggered by dismissing the previous interstitial.
    fn reloaded(&self, info: &AdInfo, response: &ResponseInfo);
    fn failed_to_load(&self, info: &AdInfo, error: &LoadAdError);
    fn showed(&self, info: &AdInfo);
    fn failed_to_show(&self, info: &AdInfo, error: &AdError);
    fn dismissed(&self, info: &AdInfo);
    fn impression(&self, info: &AdInfo);
    fn clicked(&self, info: &AdInfo);
    fn earned_reward(&self, info: &AdInfo, reward: &RewardItem);
}

/// Starts an SDK load. Results come back through
/// [`FullScreenAd::on_ad_loaded`] or [`FullScreenAd::on_ad_failed`].
pub trait FullScreenAdLoader: Send + Sync {
    fn load(&self, kind: FullScreenKind, request: &LoadAdRequest);
}

/// A served ad, presented at most once.
pub trait FullScreenContent: Send {
    fn set_server_side_verification(&mut self, options: &ServerSideVerification);
    fn present(&mut self);
}

struct AdState {
    content: Option<Box<dyn FullScreenContent>>,
    loaded_at: Option<Instant>,
    first_load: bool,
    loading: bool,
    showing: bool,
}

impl AdState {
    fn is_available(&self, kind: FullScreenKind, now: Instant) -> bool {
        let fresh = match (kind.expires_after(), self.loaded_at) {
            (Some(lifetime), Some(loaded_at)) => now.saturating_duration_since(loaded_at) < lifetime,
            (Some(_), None) => false,
            (None, _) => true,
        };
        self.content.is_some() && fresh
    }
}

impl Default for AdState {
    fn default() -> Self {
        Self {
            content: None,
            loaded_at: None,
            first_load: true,
            loading: false,
            showing: false,
        }
    }
}

pub struct FullScreenAd {
    kind: FullScreenKind,
    info: Arc<Mutex<AdInfo>>,
    delegate: Arc<dyn FullScreenAdDelegate>,
    loader: Arc<dyn FullScreenAdLoader>,
    main: Arc<dyn MainThread>,
    state: Arc<Mutex<AdState>>,
    auto_show_on_resume: AtomicBool,
}

impl FullScreenAd {
    pub fn new(
        kind: FullScreenKind,
        info: AdInfo,
        delegate: Arc<dyn FullScreenAdDelegate>,
        loader: Arc<dyn FullScreenAdLoader>,
        main: Arc<dyn MainThread>,
    ) -> Self {
        Self {
            kind,
            info: Arc::new(Mutex::new(info)),
            delegate,
            loader,
            main,
            state: Arc::new(Mutex::new(AdState::default())),
            auto_show_on_resume: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> FullScreenKind {
        self.kind
    }

    pub fn info(&self) -> AdInfo {
        lock(&self.info).clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded_at(Instant::now())
    }

    /// Whether an ad would be shown at `now`; app open ads expire.
    pub fn is_loaded_at(&self, now: Instant) -> bool {
        lock(&self.state).is_available(self.kind, now)
    }

    pub fn is_showing(&self) -> bool {
        lock(&self.state).showing
    }

    /// Asks the SDK for an ad on the main thread. App open ads ignore the
    /// call while a load is running or a fresh ad is waiting.
    pub fn load(&self) {
        {
            let mut state = lock(&self.state);
            if self.kind == FullScreenKind::AppOpen {
                if state.loading {
                    error!(kind = %self.kind, "Cannot load ad, loading already in progress");
                    return;
                }
                if state.is_available(self.kind, Instant::now()) {
                    error!(kind = %self.kind, "Cannot load ad, already loaded");
                    return;
                }
            }
            state.loading = true;
        }
        let request = lock(&self.info).load_ad_request.clone().unwrap_or_default();
        debug!(kind = %self.kind, ad_unit_id = request.ad_unit_id().unwrap_or_default(), "Loading full-screen ad");
        let loader = self.loader.clone();
        let kind = self.kind;
        self.main.dispatch(Box::new(move || loader.load(kind, &request)));
    }

    /// Presents the loaded ad on the main thread. The ad is used up: a
    /// second show needs a new load. Showing without a loaded ad is a logged
    /// no-op.
    pub fn show(&self) {
        let content = {
            let mut state = lock(&self.state);
            if state.showing {
                debug!(kind = %self.kind, "Cannot show ad, one is already showing");
                return;
            }
            if !state.is_available(self.kind, Instant::now()) {
                warn!(kind = %self.kind, ad_id = %lock(&self.info).ad_id, "Cannot show ad, not loaded");
                return;
            }
            state.loaded_at = None;
            state.content.take()
        };
        let Some(mut content) = content else {
            return;
        };
        debug!(kind = %self.kind, "Showing full-screen ad");
        self.main.dispatch(Box::new(move || content.present()));
    }

    pub fn set_auto_show_on_resume(&self, enabled: bool) {
        self.auto_show_on_resume.store(enabled, Ordering::Relaxed);
    }

    pub fn auto_show_on_resume(&self) -> bool {
        self.auto_show_on_resume.load(Ordering::Relaxed)
    }

    /// Lifecycle hook: the app moved to the foreground.
    pub fn on_app_foreground(&self) {
        info!(kind = %self.kind, "App moved to foreground");
        if self.kind == FullScreenKind::AppOpen && self.auto_show_on_resume() {
            self.show();
        }
    }

    /// Lifecycle hook: the app moved to the background.
    pub fn on_app_background(&self) {
        info!(kind = %self.kind, "App moved to background");
    }

    /// SDK callback: an ad arrived.
    pub fn on_ad_loaded(&self, mut content: Box<dyn FullScreenContent>, response: ResponseInfo) {
        let info = self.info();
        if self.kind.grants_rewards() {
            if let Some(options) = info
                .load_ad_request
                .as_ref()
                .and_then(LoadAdRequest::server_side_verification)
            {
                content.set_server_side_verification(&options);
            }
        }
        let first = {
            let mut state = lock(&self.state);
            state.content = Some(content);
            state.loaded_at = Some(Instant::now());
            state.loading = false;
            std::mem::replace(&mut state.first_load, false)
        };
        if first || !self.kind.reloads_on_dismiss() {
            debug!(kind = %self.kind, "Full-screen ad loaded");
            self.delegate.loaded(&info, &response);
        } else {
            debug!(kind = %self.kind, "Full-screen ad reloaded");
            self.delegate.reloaded(&info, &response);
        }
    }

    pub fn on_ad_failed(&self, error: LoadAdError) {
        {
            let mut state = lock(&self.state);
            state.content = None;
            state.loaded_at = None;
            state.loading = false;
        }
        error!(kind = %self.kind, code = error.error.code, message = %error.error.message, "Full-screen ad failed to load");
        self.delegate.failed_to_load(&self.info(), &error);
    }

    pub fn on_showed(&self) {
        lock(&self.state).showing = true;
        debug!(kind = %self.kind, "Full-screen ad showed");
        self.delegate.showed(&self.info());
    }

    pub fn on_failed_to_show(&self, error: AdError) {
        lock(&self.state).showing = false;
        error!(kind = %self.kind, code = error.code, message = %error.message, "Full-screen ad failed to show");
        self.delegate.failed_to_show(&self.info(), &error);
    }

    pub fn on_impression(&self) {
        self.delegate.impression(&self.info());
    }

    pub fn on_click(&self) {
        self.delegate.clicked(&self.info());
    }

    pub fn on_dismissed(&self) {
        lock(&self.state).showing = false;
        debug!(kind = %self.kind, "Full-screen ad dismissed");
        self.delegate.dismissed(&self.info());
        if self.kind.reloads_on_dismiss() {
            self.load();
        }
    }

    pub fn on_user_earned_reward(&self, reward: RewardItem) {
        if !self.kind.grants_rewards() {
            warn!(kind = %self.kind, "Reward reported for an ad that grants none");
            return;
        }
        info!(reward_type = %reward.reward_type, amount = reward.amount, "Reward earned");
        self.delegate.earned_reward(&self.info(), &reward);
    }
}

impl fmt::Debug for FullScreenAd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullScreenAd")
            .field("kind", &self.kind)
            .field("info", &self.info())
            .field("loaded", &self.is_loaded())
            .field("showing", &self.is_showing())
            .finish()
    }
}
