//! Banner ad adapter.
//!
//! A [`Banner`] owns one platform ad view. [`Banner::load`] creates it hidden
//! and paused; [`Banner::show`] attaches it to the host layout, anchored per
//! its [`AdPosition`] and optionally pushed inside the safe area, then reports
//! the laid-out size in dp. The request dictionary picks the [`BannerSize`]
//! and the position.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::main_thread::{lock, MainThread};
use crate::model::{AdInfo, LoadAdError, LoadAdRequest, ResponseInfo};

/// Engine-side listener. The first successful load is `loaded`; every later
/// one (auto refresh) is `refreshed`.
pub trait BannerDelegate: Send + Sync {
    fn loaded(&self, info: &AdInfo, response: &ResponseInfo);
    fn refreshed(&self, info: &AdInfo, response: &ResponseInfo);
    fn failed_to_load(&self, info: &AdInfo, error: &LoadAdError);
    fn impression(&self, info: &AdInfo);
    fn size_measured(&self, info: &AdInfo);
    fn clicked(&self, info: &AdInfo);
    fn opened(&self, info: &AdInfo);
    fn closed(&self, info: &AdInfo);
}

/// SDK banner view. Only touched on the main thread.
pub trait BannerView: Send {
    /// Starts an SDK load. Results come back through the `on_*` callbacks of
    /// the owning [`Banner`].
    fn load(&mut self, ad_unit_id: &str, size: AdSize);
    /// Visible views are resumed, hidden ones paused.
    fn set_visible(&mut self, visible: bool);
    fn attach(&mut self, params: &BannerParams);
    fn update_params(&mut self, params: &BannerParams);
    fn detach(&mut self);
    /// Laid-out size in pixels.
    fn measure(&mut self) -> (f64, f64);
    /// Size of the served ad in dp.
    fn ad_size_dp(&self) -> (i64, i64);
    fn is_collapsible(&self) -> bool;
}

/// Layout the banner views are added to.
pub trait BannerHost: Send + Sync {
    /// `None` if the layout is gone.
    fn create_view(&self) -> Option<Box<dyn BannerView>>;
    /// Pixels per dp.
    fn density(&self) -> f64;
    fn screen_width_dp(&self) -> i64;
    fn window_insets(&self) -> Option<WindowInsets>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerSize {
    Banner,
    LargeBanner,
    MediumRectangle,
    FullBanner,
    Leaderboard,
    Skyscraper,
    Fluid,
    Adaptive,
    InlineAdaptive,
}

impl BannerSize {
    pub const ALL: [BannerSize; 9] = [
        BannerSize::Banner,
        BannerSize::LargeBanner,
        BannerSize::MediumRectangle,
        BannerSize::FullBanner,
        BannerSize::Leaderboard,
        BannerSize::Skyscraper,
        BannerSize::Fluid,
        BannerSize::Adaptive,
        BannerSize::InlineAdaptive,
    ];

    /// Name used in request dictionaries.
    pub fn as_str(self) -> &'static str {
        match self {
            BannerSize::Banner => "BANNER",
            BannerSize::LargeBanner => "LARGE_BANNER",
            BannerSize::MediumRectangle => "MEDIUM_RECTANGLE",
            BannerSize::FullBanner => "FULL_BANNER",
            BannerSize::Leaderboard => "LEADERBOARD",
            BannerSize::Skyscraper => "SKYSCRAPER",
            BannerSize::Fluid => "FLUID",
            BannerSize::Adaptive => "ADAPTIVE",
            BannerSize::InlineAdaptive => "INLINE_ADAPTIVE",
        }
    }

    /// Width and height in dp of the standard sizes.
    pub fn fixed_dimensions(self) -> Option<(i64, i64)> {
        match self {
            BannerSize::Banner => Some((320, 50)),
            BannerSize::LargeBanner => Some((320, 100)),
            BannerSize::MediumRectangle => Some((300, 250)),
            BannerSize::FullBanner => Some((468, 60)),
            BannerSize::Leaderboard => Some((728, 90)),
            BannerSize::Skyscraper => Some((160, 600)),
            BannerSize::Fluid | BannerSize::Adaptive | BannerSize::InlineAdaptive => None,
        }
    }
}

impl fmt::Display for BannerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerSize {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BannerSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| BridgeError::InvalidData {
                what: "banner size",
                reason: format!("unknown size '{s}'"),
            })
    }
}

/// Size handed to the SDK, in dp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdSize {
    Fixed { width: i64, height: i64 },
    /// Height follows the content.
    Fluid,
    /// Height picked by the SDK for the current orientation.
    AnchoredAdaptive { width: i64 },
    InlineAdaptive { width: i64, max_height: Option<i64> },
}

impl AdSize {
    /// Adaptive widths come from the request, falling back to the screen
    /// width.
    pub fn resolve(size: BannerSize, request: &LoadAdRequest, screen_width_dp: i64) -> Self {
        if let Some((width, height)) = size.fixed_dimensions() {
            return AdSize::Fixed { width, height };
        }
        let width = request.adaptive_width().unwrap_or(screen_width_dp);
        match size {
            BannerSize::Fluid => AdSize::Fluid,
            BannerSize::InlineAdaptive => AdSize::InlineAdaptive {
                width,
                max_height: request.adaptive_max_height(),
            },
            _ => AdSize::AnchoredAdaptive { width },
        }
    }

    pub fn width_dp(self) -> Option<i64> {
        match self {
            AdSize::Fixed { width, .. }
            | AdSize::AnchoredAdaptive { width }
            | AdSize::InlineAdaptive { width, .. } => Some(width),
            AdSize::Fluid => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdPosition {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    /// No anchor; placed by [`Banner::move_to`].
    Custom,
}

impl AdPosition {
    pub const ALL: [AdPosition; 10] = [
        AdPosition::Top,
        AdPosition::Bottom,
        AdPosition::Left,
        AdPosition::Right,
        AdPosition::TopLeft,
        AdPosition::TopRight,
        AdPosition::BottomLeft,
        AdPosition::BottomRight,
        AdPosition::Center,
        AdPosition::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdPosition::Top => "TOP",
            AdPosition::Bottom => "BOTTOM",
            AdPosition::Left => "LEFT",
            AdPosition::Right => "RIGHT",
            AdPosition::TopLeft => "TOP_LEFT",
            AdPosition::TopRight => "TOP_RIGHT",
            AdPosition::BottomLeft => "BOTTOM_LEFT",
            AdPosition::BottomRight => "BOTTOM_RIGHT",
            AdPosition::Center => "CENTER",
            AdPosition::Custom => "CUSTOM",
        }
    }

    /// Where the view sits in its parent; `None` for [`AdPosition::Custom`].
    pub fn anchor(self) -> Option<Anchor> {
        use Horizontal as H;
        use Vertical as V;
        let (vertical, horizontal) = match self {
            AdPosition::Top => (V::Top, H::Center),
            AdPosition::Bottom => (V::Bottom, H::Center),
            AdPosition::Left => (V::Center, H::Start),
            AdPosition::Right => (V::Center, H::End),
            AdPosition::TopLeft => (V::Top, H::Start),
            AdPosition::TopRight => (V::Top, H::End),
            AdPosition::BottomLeft => (V::Bottom, H::Start),
            AdPosition::BottomRight => (V::Bottom, H::End),
            AdPosition::Center => (V::Center, H::Center),
            AdPosition::Custom => return None,
        };
        Some(Anchor {
            vertical,
            horizontal,
        })
    }

    /// Margins keeping the banner clear of `safe` on the edges it touches.
    pub fn safe_area_margins(self, safe: Insets) -> Insets {
        let mut margins = Insets::default();
        let Some(anchor) = self.anchor() else {
            return margins;
        };
        match anchor.vertical {
            Vertical::Top => margins.top = safe.top,
            Vertical::Bottom => margins.bottom = safe.bottom,
            Vertical::Center => {}
        }
        match anchor.horizontal {
            Horizontal::Start => margins.left = safe.left,
            Horizontal::End => margins.right = safe.right,
            Horizontal::Center => {}
        }
        margins
    }
}

impl fmt::Display for AdPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdPosition {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdPosition::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| BridgeError::InvalidData {
                what: "banner position",
                reason: format!("unknown position '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

/// Edge distances in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl Insets {
    pub fn max(self, other: Insets) -> Insets {
        Insets {
            top: self.top.max(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.max(other.left),
            right: self.right.max(other.right),
        }
    }
}

/// Window areas covered by system UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowInsets {
    pub system_bars: Insets,
    pub display_cutout: Insets,
}

impl WindowInsets {
    pub fn safe_area(&self) -> Insets {
        self.system_bars.max(self.display_cutout)
    }
}

/// Placement of the view in the host layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BannerParams {
    pub anchor: Option<Anchor>,
    pub margins: Insets,
    /// Explicit width in pixels; `None` wraps the content.
    pub width_px: Option<i64>,
}

pub fn dp_to_px(dp: i64, density: f64) -> i64 {
    (dp as f64 * density).round() as i64
}

pub fn px_to_dp(px: f64, density: f64) -> i64 {
    (px / density).round() as i64
}

struct BannerState {
    view: Option<Box<dyn BannerView>>,
    params: BannerParams,
    visible: bool,
    first_load: bool,
}

impl Default for BannerState {
    fn default() -> Self {
        Self {
            view: None,
            params: BannerParams::default(),
            visible: false,
            first_load: true,
        }
    }
}

pub struct Banner {
    info: Arc<Mutex<AdInfo>>,
    request: LoadAdRequest,
    size: BannerSize,
    position: AdPosition,
    anchor_to_safe_area: bool,
    delegate: Arc<dyn BannerDelegate>,
    host: Arc<dyn BannerHost>,
    main: Arc<dyn MainThread>,
    state: Arc<Mutex<BannerState>>,
}

impl Banner {
    /// Reads size and position from the request. A missing size falls back
    /// to [`BannerSize::Banner`], a missing position to [`AdPosition::Top`];
    /// unknown names are an error.
    pub fn new(
        info: AdInfo,
        delegate: Arc<dyn BannerDelegate>,
        host: Arc<dyn BannerHost>,
        main: Arc<dyn MainThread>,
    ) -> BridgeResult<Self> {
        let request = info.load_ad_request.clone().unwrap_or_default();
        let size = match request.ad_size() {
            Some(name) => name.parse()?,
            None => {
                error!(ad_id = %info.ad_id, "Banner size is required, defaulting to BANNER");
                BannerSize::Banner
            }
        };
        let position = match request.ad_position() {
            Some(name) => name.parse()?,
            None => AdPosition::Top,
        };
        Ok(Self {
            anchor_to_safe_area: request.anchor_to_safe_area(),
            info: Arc::new(Mutex::new(info)),
            request,
            size,
            position,
            delegate,
            host,
            main,
            state: Arc::new(Mutex::new(BannerState::default())),
        })
    }

    pub fn info(&self) -> AdInfo {
        lock(&self.info).clone()
    }

    pub fn size(&self) -> BannerSize {
        self.size
    }

    pub fn position(&self) -> AdPosition {
        self.position
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.state).view.is_some()
    }

    pub fn is_visible(&self) -> bool {
        lock(&self.state).visible
    }

    /// SDK size for the current screen.
    pub fn ad_size(&self) -> AdSize {
        AdSize::resolve(self.size, &self.request, self.host.screen_width_dp())
    }

    fn inline_width_px(&self, size: AdSize) -> Option<i64> {
        if self.size != BannerSize::InlineAdaptive {
            return None;
        }
        size.width_dp().map(|w| dp_to_px(w, self.host.density()))
    }

    /// Creates a hidden, paused view on the main thread and starts loading
    /// into it. A previous view is detached and dropped.
    pub fn load(&self) {
        let ad_unit_id = self.request.ad_unit_id().unwrap_or_default().to_string();
        let size = self.ad_size();
        let params = BannerParams {
            anchor: self.position.anchor(),
            margins: Insets::default(),
            width_px: self.inline_width_px(size),
        };
        debug!(ad_unit_id = %ad_unit_id, size = %self.size, position = %self.position, "Loading banner ad");

        let host = self.host.clone();
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            let Some(mut view) = host.create_view() else {
                error!("Banner parent layout is gone");
                return;
            };
            let mut state = lock(&state);
            if let Some(mut old) = state.view.take() {
                old.detach();
            }
            view.set_visible(false);
            view.load(&ad_unit_id, size);
            state.view = Some(view);
            state.params = params;
            state.visible = false;
        }));
    }

    /// Attaches the view and reports its size once laid out. Showing an
    /// unloaded or already visible banner is a logged no-op.
    pub fn show(&self) {
        {
            let mut state = lock(&self.state);
            if state.view.is_none() {
                warn!(ad_id = %lock(&self.info).ad_id, "Banner ad not loaded");
                return;
            }
            if state.visible {
                warn!(ad_id = %lock(&self.info).ad_id, "Banner ad already visible");
                return;
            }
            state.visible = true;
        }
        debug!(ad_id = %lock(&self.info).ad_id, "Showing banner ad");

        let state = self.state.clone();
        let info = self.info.clone();
        let delegate = self.delegate.clone();
        let host = self.host.clone();
        let main = self.main.clone();
        let position = self.position;
        let anchored = self.anchor_to_safe_area && position != AdPosition::Custom;
        self.main.dispatch(Box::new(move || {
            {
                let mut state = lock(&state);
                if anchored {
                    match host.window_insets() {
                        Some(insets) => {
                            let margins = position.safe_area_margins(insets.safe_area());
                            debug!(?margins, "Anchoring banner to the safe area");
                            state.params.margins = margins;
                        }
                        None => warn!("Window insets unavailable, banner not anchored"),
                    }
                }
                let params = state.params;
                let Some(view) = state.view.as_mut() else {
                    return;
                };
                view.set_visible(true);
                view.attach(&params);
            }

            main.dispatch(Box::new(move || {
                let measured = {
                    let mut state = lock(&state);
                    let Some(view) = state.view.as_mut() else {
                        return;
                    };
                    let (width, height) = view.measure();
                    let density = host.density();
                    if density <= 0.0 {
                        warn!(density, "Invalid screen density, size not measured");
                        return;
                    }
                    let mut info = lock(&info);
                    info.measured_width = px_to_dp(width, density);
                    info.measured_height = px_to_dp(height, density);
                    debug!(
                        width_px = width,
                        height_px = height,
                        width = info.measured_width,
                        height = info.measured_height,
                        "Measured banner size in dp"
                    );
                    info.clone()
                };
                delegate.size_measured(&measured);
            }));
        }));
    }

    /// Pauses and detaches the view, keeping it loaded.
    pub fn hide(&self) {
        {
            let mut state = lock(&self.state);
            if state.view.is_none() {
                warn!(ad_id = %lock(&self.info).ad_id, "Banner ad not loaded");
                return;
            }
            if !state.visible {
                error!(ad_id = %lock(&self.info).ad_id, "Cannot hide banner ad, it is not visible");
                return;
            }
            state.visible = false;
        }
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            if let Some(view) = &mut lock(&state).view {
                view.set_visible(false);
                view.detach();
            }
        }));
    }

    /// Offsets the view by `x`/`y` pixels from its anchor. Inline adaptive
    /// banners keep their measured width.
    pub fn move_to(&self, x: f64, y: f64) {
        let params = {
            let mut state = lock(&self.state);
            if state.view.is_none() {
                warn!(ad_id = %lock(&self.info).ad_id, "Banner ad not loaded");
                return;
            }
            state.params.margins.left = x as i64;
            state.params.margins.top = y as i64;
            state.params.width_px = if self.size == BannerSize::InlineAdaptive {
                let measured = lock(&self.info).measured_width;
                if measured > 0 {
                    Some(dp_to_px(measured, self.host.density()))
                } else {
                    self.inline_width_px(self.ad_size())
                }
            } else {
                None
            };
            state.params
        };
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            if let Some(view) = &mut lock(&state).view {
                view.update_params(&params);
            }
        }));
    }

    /// Rebuilds the view at the current screen width, keeping its placement
    /// and visibility.
    pub fn resize(&self) {
        if lock(&self.state).view.is_none() {
            warn!(ad_id = %lock(&self.info).ad_id, "Banner ad not loaded");
            return;
        }
        let ad_unit_id = self.request.ad_unit_id().unwrap_or_default().to_string();
        let size = self.ad_size();
        let width_px = self.inline_width_px(size);
        let host = self.host.clone();
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            let Some(mut view) = host.create_view() else {
                error!("Banner parent layout is gone");
                return;
            };
            let mut state = lock(&state);
            if let Some(mut old) = state.view.take() {
                old.detach();
            }
            state.params.width_px = width_px;
            view.set_visible(state.visible);
            view.load(&ad_unit_id, size);
            if state.visible {
                view.attach(&state.params);
            }
            state.view = Some(view);
        }));
    }

    /// Detaches and drops the view.
    pub fn remove(&self) {
        if lock(&self.state).view.is_none() {
            warn!(ad_id = %lock(&self.info).ad_id, "Banner ad view already removed");
            return;
        }
        let state = self.state.clone();
        self.main.dispatch(Box::new(move || {
            let mut state = lock(&state);
            if let Some(mut view) = state.view.take() {
                view.detach();
            }
            state.visible = false;
        }));
    }

    /// SDK callback: an ad was served into the view.
    pub fn on_ad_loaded(&self, response: ResponseInfo) {
        let (first, served) = {
            let mut state = lock(&self.state);
            let first = std::mem::replace(&mut state.first_load, false);
            let served = state
                .view
                .as_ref()
                .map(|view| (view.ad_size_dp(), view.is_collapsible()));
            (first, served)
        };
        let info = {
            let mut info = lock(&self.info);
            if let Some(((width, height), collapsible)) = served {
                info.measured_width = width;
                info.measured_height = height;
                info.is_collapsible = collapsible;
            }
            info.clone()
        };
        if first {
            debug!(ad_id = %info.ad_id, "Banner ad loaded");
            self.delegate.loaded(&info, &response);
        } else {
            debug!(ad_id = %info.ad_id, "Banner ad refreshed");
            self.delegate.refreshed(&info, &response);
        }
    }

    pub fn on_ad_failed(&self, error: LoadAdError) {
        error!(code = error.error.code, message = %error.error.message, "Banner ad failed to load");
        self.delegate.failed_to_load(&self.info(), &error);
    }

    pub fn on_impression(&self) {
        self.delegate.impression(&self.info());
    }

    pub fn on_click(&self) {
        self.delegate.clicked(&self.info());
    }

    pub fn on_opened(&self) {
        self.delegate.opened(&self.info());
    }

    pub fn on_closed(&self) {
        self.delegate.closed(&self.info());
    }
}

impl fmt::Debug for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Banner")
            .field("info", &self.info())
            .field("size", &self.size)
            .field("position", &self.position)
            .field("loaded", &self.is_loaded())
            .field("visible", &self.is_visible())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn size_names_round_trip() {
        for size in BannerSize::ALL {
            assert_eq!(size.as_str().parse::<BannerSize>().unwrap(), size);
        }
        assert!("HUGE".parse::<BannerSize>().is_err());
        assert!("top".parse::<AdPosition>().is_err());
    }

    #[test]
    fn standard_sizes_in_dp() {
        assert_eq!(BannerSize::Banner.fixed_dimensions(), Some((320, 50)));
        assert_eq!(BannerSize::MediumRectangle.fixed_dimensions(), Some((300, 250)));
        assert_eq!(BannerSize::Skyscraper.fixed_dimensions(), Some((160, 600)));
        assert_eq!(BannerSize::Adaptive.fixed_dimensions(), None);
    }

    #[test]
    fn adaptive_sizes_fall_back_to_screen_width() {
        let plain = LoadAdRequest::new("unit");
        assert_eq!(
            AdSize::resolve(BannerSize::Adaptive, &plain, 411),
            AdSize::AnchoredAdaptive { width: 411 }
        );
        assert_eq!(AdSize::resolve(BannerSize::Fluid, &plain, 411), AdSize::Fluid);

        let sized = LoadAdRequest::from_dictionary(json!({
            "ad_unit_id": "unit",
            "adaptive_width": 300,
            "adaptive_max_height": 120,
        }))
        .unwrap();
        assert_eq!(
            AdSize::resolve(BannerSize::InlineAdaptive, &sized, 411),
            AdSize::InlineAdaptive {
                width: 300,
                max_height: Some(120)
            }
        );
        assert_eq!(
            AdSize::resolve(BannerSize::Leaderboard, &sized, 411),
            AdSize::Fixed {
                width: 728,
                height: 90
            }
        );
    }

    #[test]
    fn positions_map_to_anchors() {
        let anchor = |p: AdPosition| p.anchor().map(|a| (a.vertical, a.horizontal));
        assert_eq!(anchor(AdPosition::Top), Some((Vertical::Top, Horizontal::Center)));
        assert_eq!(anchor(AdPosition::Left), Some((Vertical::Center, Horizontal::Start)));
        assert_eq!(anchor(AdPosition::BottomRight), Some((Vertical::Bottom, Horizontal::End)));
        assert_eq!(anchor(AdPosition::Center), Some((Vertical::Center, Horizontal::Center)));
        assert_eq!(anchor(AdPosition::Custom), None);
    }

    #[test]
    fn safe_area_only_on_touched_edges() {
        let safe = Insets {
            top: 80,
            bottom: 48,
            left: 30,
            right: 0,
        };
        assert_eq!(
            AdPosition::Top.safe_area_margins(safe),
            Insets {
                top: 80,
                ..Insets::default()
            }
        );
        assert_eq!(
            AdPosition::BottomLeft.safe_area_margins(safe),
            Insets {
                bottom: 48,
                left: 30,
                ..Insets::default()
            }
        );
        assert_eq!(
            AdPosition::Left.safe_area_margins(safe),
            Insets {
                left: 30,
                ..Insets::default()
            }
        );
        assert_eq!(AdPosition::Center.safe_area_margins(safe), Insets::default());
        assert_eq!(AdPosition::Custom.safe_area_margins(safe), Insets::default());
    }

    #[test]
    fn safe_area_takes_larger_of_bars_and_cutout() {
        let insets = WindowInsets {
            system_bars: Insets {
                top: 63,
                bottom: 42,
                left: 0,
                right: 0,
            },
            display_cutout: Insets {
                top: 90,
                bottom: 0,
                left: 12,
                right: 0,
            },
        };
        assert_eq!(
            insets.safe_area(),
            Insets {
                top: 90,
                bottom: 42,
                left: 12,
                right: 0
            }
        );
    }

    #[test]
    fn pixel_conversions() {
        assert_eq!(px_to_dp(1050.0, 2.625), 400);
        assert_eq!(dp_to_px(320, 2.625), 840);
    }
}
