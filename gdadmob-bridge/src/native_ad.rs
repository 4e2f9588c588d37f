//! Native ad adapter.
//!
//! [`NativeAd`] sits between three parties: the engine, which drives it
//! through `load`/`show`/`hide`/`remove`/`update_layout` and listens on a
//! [`NativeAdDelegate`]; the SDK, which is asked to load through a
//! [`NativeAdLoader`] and reports back through the `on_*` callbacks; and the
//! platform UI, reached through [`NativeAdHost`] and [`NativeAdView`] on
//! the main thread only.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use crate::binding::{bind_native_ad, AdViewSlots, NativeAdAssets};
use crate::main_thread::{lock, MainThread};
use crate::model::{AdInfo, LoadAdError, ResponseInfo};

/// Engine-side listener. `loaded` and `size_measured` run on the main thread,
/// after the view exists; the rest run on whichever thread the SDK used.
pub trait NativeAdDelegate: Send + Sync {
    fn loaded(&self, info: &AdInfo, response: &ResponseInfo);
    fn failed_to_load(&self, info: &AdInfo, error: &LoadAdError);
    fn impression(&self, info: &AdInfo);
    fn clicked(&self, info: &AdInfo);
    fn screen_presented(&self, info: &AdInfo);
    fn screen_dismissed(&self, info: &AdInfo);
    fn size_measured(&self, info: &AdInfo);
}

/// Starts an SDK load. Results come back through [`NativeAd::on_ad_loaded`]
/// or [`NativeAd::on_ad_failed`].
pub trait NativeAdLoader: Send + Sync {
    fn load(&self, ad_unit_id: &str);
}

/// The platform view that hosts the ad, already attached to its parent.
pub trait NativeAdView: Send {
    fn render(&mut self, slots: &AdViewSlots);
    fn set_hidden(&mut self, hidden: bool);
    /// Width and height are only changed when given.
    fn set_frame(&mut self, x: f64, y: f64, width: Option<f64>, height: Option<f64>);
    fn remove_from_parent(&mut self);
    /// Laid-out size in points.
    fn measure(&mut self) -> (f64, f64);
    /// Pixels per point of the screen the view is on.
    fn screen_scale(&self) -> f64;
}

/// Parent of the ad view.
pub trait NativeAdHost: Send + Sync {
    fn is_attached(&self) -> bool;
    /// Creates a view and adds it to the parent, or `None` if the parent is
    /// gone.
    fn create_view(&self) -> Option<Box<dyn NativeAdView>>;
}

/// Position, size and visibility last sent to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self {
            x: -1.0,
            y: -1.0,
            width: -1.0,
            height: -1.0,
            visible: true,
        }
    }
}

/// Converts points to density-independent pixels (160 per inch).
pub fn points_to_dp(points: f64, scale: f64) -> i64 {
    (points / scale * 160.0).round() as i64
}

#[derive(Default)]
struct ViewState {
    assets: Option<NativeAdAssets>,
    view: Option<Box<dyn NativeAdView>>,
    last_layout: ViewLayout,
}

impl ViewState {
    /// Whether the ad view has been built on the main thread.
    fn is_loaded(&self) -> bool {
        self.view.is_some() && self.assets.is_some()
    }
}

pub struct NativeAd {
    info: Arc<Mutex<AdInfo>>,
    delegate: Arc<dyn NativeAdDelegate>,
    loader: Arc<dyn NativeAdLoader>,
    host: Arc<dyn NativeAdHost>,
    main: Arc<dyn MainThread>,
    state: Arc<Mutex<ViewState>>,
}

impl NativeAd {
    pub fn new(
        info: AdInfo,
        delegate: Arc<dyn NativeAdDelegate>,
        loader: Arc<dyn NativeAdLoader>,
        host: Arc<dyn NativeAdHost>,
        main: Arc<dyn MainThread>,
    ) -> Self {
        Self {
            info: Arc::new(Mutex::new(info)),
            delegate,
            loader,
            host,
            main,
            state: Arc::new(Mutex::new(ViewState::default())),
        }
    }

    pub fn info(&self) -> AdInfo {
        lock(&self.info).clone()
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.state).is_loaded()
    }

    /// Asks the SDK for an ad on the main thread.
    pub fn load(&self) {
        if !self.host.is_attached() {
            error!(ad_id = %lock(&self.info).ad_id, "Native ad parent view is gone");
            return;
        }
        let ad_unit_id = lock(&self.info).ad_unit_id().unwrap_or_default().to_string();
        debug!(ad_unit_id = %ad_unit_id, "Loading native ad");
        let loader = self.loader.clone();
        self.main.dispatch(Box::new(move || loader.load(&ad_unit_id)));
    }

    pub fn show(&self) {
        self.set_hidden(false, "show");
    }

    pub fn hide(&self) {
        self.set_hidden(true, "hide");
    }

    fn set_hidden(&self, hidden: bool, action: &str) {
        if !self.is_loaded() {
            debug!(action, "Native ad not loaded yet");
            return;
        }
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            if let Some(view) = &mut lock(&state).view {
                view.set_hidden(hidden);
            }
        }));
    }

    /// Detaches and drops the view and the loaded assets.
    pub fn remove(&self) {
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            let mut state = lock(&state);
            if let Some(mut view) = state.view.take() {
                view.remove_from_parent();
            }
            state.assets = None;
            state.last_layout = ViewLayout::default();
        }));
    }

    /// Moves and resizes the view. Calls repeating the last applied layout
    /// do nothing; so do calls before the ad has loaded.
    pub fn update_layout(&self, layout: ViewLayout) {
        {
            let mut state = lock(&self.state);
            if !state.is_loaded() || !self.host.is_attached() {
                return;
            }
            if state.last_layout == layout {
                return;
            }
            state.last_layout = layout;
        }
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            if let Some(view) = &mut lock(&state).view {
                let width = (layout.width > 0.0).then_some(layout.width);
                let height = (layout.height > 0.0).then_some(layout.height);
                view.set_frame(layout.x, layout.y, width, height);
                view.set_hidden(!layout.visible);
            }
        }));
    }

    /// SDK callback: an ad arrived. Builds the hidden view on the main
    /// thread and reports the load, then measures the view and reports the
    /// size.
    pub fn on_ad_loaded(&self, assets: NativeAdAssets, response: ResponseInfo) {
        debug!("Native ad loaded");
        {
            let mut state = lock(&self.state);
            state.assets = Some(assets.clone());
            state.last_layout = ViewLayout::default();
        }

        let state = self.state.clone();
        let info = self.info.clone();
        let delegate = self.delegate.clone();
        let host = self.host.clone();
        let main = self.main.clone();
        self.main.dispatch(Box::new(move || {
            let Some(mut view) = host.create_view() else {
                error!("Native ad parent view is gone, dropping loaded ad");
                lock(&state).assets = None;
                return;
            };
            let mut slots = AdViewSlots::for_assets(&assets);
            bind_native_ad(&mut slots, &assets);
            view.render(&slots);
            view.set_hidden(true);
            lock(&state).view = Some(view);
            let loaded = lock(&info).clone();
            delegate.loaded(&loaded, &response);

            // measure once the view has been laid out
            main.dispatch(Box::new(move || {
                let measured = {
                    let mut state = lock(&state);
                    let Some(view) = state.view.as_mut() else {
                        return;
                    };
                    let (width, height) = view.measure();
                    let scale = view.screen_scale();
                    if scale <= 0.0 {
                        warn!(scale, "Invalid screen scale, size not measured");
                        return;
                    }
                    let mut info = lock(&info);
                    info.measured_width = points_to_dp(width, scale);
                    info.measured_height = points_to_dp(height, scale);
                    debug!(
                        width = info.measured_width,
                        height = info.measured_height,
                        "Measured native ad size in dp"
                    );
                    info.clone()
                };
                delegate.size_measured(&measured);
            }));
        }));
    }

    pub fn on_ad_failed(&self, error: LoadAdError) {
        error!(code = error.error.code, message = %error.error.message, "Native ad failed to load");
        self.delegate.failed_to_load(&self.info(), &error);
    }

    pub fn on_impression(&self) {
        debug!("Native ad impression recorded");
        self.delegate.impression(&self.info());
    }

    pub fn on_click(&self) {
        debug!("Native ad click recorded");
        self.delegate.clicked(&self.info());
    }

    pub fn on_present_screen(&self) {
        debug!("Native ad will present screen");
        self.delegate.screen_presented(&self.info());
    }

    pub fn on_dismiss_screen(&self) {
        debug!("Native ad dismissed screen");
        self.delegate.screen_dismissed(&self.info());
    }
}

impl std::fmt::Debug for NativeAd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeAd")
            .field("info", &self.info())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
