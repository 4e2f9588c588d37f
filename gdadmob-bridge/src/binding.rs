//! Binding a loaded native ad's assets into view slots.

use serde::{Deserialize, Serialize};

/// Image reference handed over by the SDK; rendering is up to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContent {
    pub has_video: bool,
    pub main_image: Option<ImageAsset>,
}

impl MediaContent {
    pub fn is_empty(&self) -> bool {
        !self.has_video && self.main_image.is_none()
    }
}

/// Assets of a loaded native ad. Only the headline is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeAdAssets {
    pub headline: String,
    pub body: Option<String>,
    pub call_to_action: Option<String>,
    pub icon: Option<ImageAsset>,
    pub advertiser: Option<String>,
    pub store: Option<String>,
    pub price: Option<String>,
    pub star_rating: Option<f64>,
    pub media: MediaContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSlot {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlot {
    pub image: Option<ImageAsset>,
}

/// The call to action is drawn as a button but clicks go through the SDK's
/// own ad view, so the button is never interactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonSlot {
    pub title: Option<String>,
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    Full,
    Half,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSlot {
    pub hidden: bool,
    pub stars: [StarState; 5],
}

impl Default for RatingSlot {
    fn default() -> Self {
        Self {
            hidden: false,
            stars: [StarState::Empty; 5],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlot {
    pub content: Option<MediaContent>,
}

/// The optional sub-views of a native ad view. A `None` slot is absent
/// from the layout and nothing is bound to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdViewSlots {
    pub headline: Option<TextSlot>,
    pub body: Option<TextSlot>,
    pub call_to_action: Option<ButtonSlot>,
    pub icon: Option<ImageSlot>,
    pub advertiser: Option<TextSlot>,
    pub store: Option<TextSlot>,
    pub price: Option<TextSlot>,
    pub star_rating: Option<RatingSlot>,
    pub media: Option<MediaSlot>,
}

impl AdViewSlots {
    /// Every slot present.
    pub fn full() -> Self {
        Self {
            headline: Some(TextSlot::default()),
            body: Some(TextSlot::default()),
            call_to_action: Some(ButtonSlot::default()),
            icon: Some(ImageSlot::default()),
            advertiser: Some(TextSlot::default()),
            store: Some(TextSlot::default()),
            price: Some(TextSlot::default()),
            star_rating: Some(RatingSlot::default()),
            media: Some(MediaSlot::default()),
        }
    }

    /// The slots a generated layout has for `assets`: the headline always,
    /// everything else only when the ad carries that asset.
    pub fn for_assets(assets: &NativeAdAssets) -> Self {
        let text = |present: bool| present.then(TextSlot::default);
        Self {
            headline: Some(TextSlot::default()),
            body: text(assets.body.is_some()),
            call_to_action: assets.call_to_action.is_some().then(ButtonSlot::default),
            icon: assets.icon.is_some().then(ImageSlot::default),
            advertiser: text(assets.advertiser.is_some()),
            store: text(assets.store.is_some()),
            price: text(assets.price.is_some()),
            star_rating: assets.star_rating.is_some().then(RatingSlot::default),
            media: (!assets.media.is_empty()).then(MediaSlot::default),
        }
    }
}

/// Copies `assets` into the slots `slots` has.
///
/// The rating slot is hidden when the ad has no rating. The icon slot keeps
/// its previous image when the ad has no icon.
pub fn bind_native_ad(slots: &mut AdViewSlots, assets: &NativeAdAssets) {
    if let Some(slot) = &mut slots.headline {
        slot.text = Some(assets.headline.clone());
    }
    if let Some(slot) = &mut slots.media {
        slot.content = Some(assets.media.clone());
    }
    if let Some(slot) = &mut slots.call_to_action {
        slot.title = assets.call_to_action.clone();
        slot.interactive = false;
    }
    if let (Some(slot), Some(icon)) = (&mut slots.icon, &assets.icon) {
        slot.image = Some(icon.clone());
    }
    for (slot, value) in [
        (&mut slots.body, &assets.body),
        (&mut slots.advertiser, &assets.advertiser),
        (&mut slots.store, &assets.store),
        (&mut slots.price, &assets.price),
    ] {
        if let Some(slot) = slot {
            slot.text = value.clone();
        }
    }
    if let Some(slot) = &mut slots.star_rating {
        match assets.star_rating {
            Some(rating) => {
                slot.hidden = false;
                slot.stars = star_states(rating);
            }
            None => slot.hidden = true,
        }
    }
}

/// Five stars for a 0-5 rating: whole stars full, a remainder of at least
/// one half shown as a half star.
pub fn star_states(rating: f64) -> [StarState; 5] {
    let rating = if rating.is_finite() { rating.clamp(0.0, 5.0) } else { 0.0 };
    let full = rating.trunc() as usize;
    let half = rating - rating.trunc() >= 0.5;
    let mut stars = [StarState::Empty; 5];
    for (i, star) in stars.iter_mut().enumerate() {
        if i < full {
            *star = StarState::Full;
        } else if i == full && half {
            *star = StarState::Half;
        }
    }
    stars
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn assets() -> NativeAdAssets {
        NativeAdAssets {
            headline: "Tower Defense".into(),
            body: Some("Build. Defend. Win.".into()),
            call_to_action: Some("Install".into()),
            icon: Some(ImageAsset { uri: "icon.png".into() }),
            store: Some("Google Play".into()),
            price: Some("Free".into()),
            star_rating: Some(4.5),
            ..NativeAdAssets::default()
        }
    }

    #[test]
    fn binds_every_present_slot() {
        let mut slots = AdViewSlots::full();
        bind_native_ad(&mut slots, &assets());

        assert_eq!(slots.headline.unwrap().text.as_deref(), Some("Tower Defense"));
        assert_eq!(slots.body.unwrap().text.as_deref(), Some("Build. Defend. Win."));
        assert_eq!(
            slots.call_to_action,
            Some(ButtonSlot {
                title: Some("Install".into()),
                interactive: false
            })
        );
        assert_eq!(slots.advertiser.unwrap().text, None);
        assert_eq!(slots.price.unwrap().text.as_deref(), Some("Free"));
        let rating = slots.star_rating.unwrap();
        assert!(!rating.hidden);
        assert_eq!(
            rating.stars,
            [StarState::Full, StarState::Full, StarState::Full, StarState::Full, StarState::Half]
        );
    }

    #[test]
    fn rating_hidden_without_rating() {
        let mut slots = AdViewSlots::full();
        let assets = NativeAdAssets {
            star_rating: None,
            ..assets()
        };
        bind_native_ad(&mut slots, &assets);
        assert!(slots.star_rating.unwrap().hidden);
    }

    #[test]
    fn absent_slots_stay_absent() {
        let mut slots = AdViewSlots {
            headline: Some(TextSlot::default()),
            ..AdViewSlots::default()
        };
        bind_native_ad(&mut slots, &assets());
        assert!(slots.body.is_none());
        assert!(slots.star_rating.is_none());
    }

    #[test]
    fn generated_layout_follows_assets() {
        let slots = AdViewSlots::for_assets(&NativeAdAssets {
            headline: "h".into(),
            price: Some("$1".into()),
            ..NativeAdAssets::default()
        });
        assert!(slots.headline.is_some());
        assert!(slots.price.is_some());
        assert!(slots.icon.is_none());
        assert!(slots.media.is_none());
        assert!(slots.call_to_action.is_none());
    }

    #[test]
    fn star_rounding() {
        use StarState::*;
        assert_eq!(star_states(0.0), [Empty; 5]);
        assert_eq!(star_states(3.49), [Full, Full, Full, Empty, Empty]);
        assert_eq!(star_states(3.5), [Full, Full, Full, Half, Empty]);
        assert_eq!(star_states(5.0), [Full; 5]);
        assert_eq!(star_states(7.0), [Full; 5]);
        assert_eq!(star_states(f64::NAN), [Empty; 5]);
    }

    proptest! {
        #[test]
        fn full_stars_never_exceed_rating(rating in 0.0f64..=5.0) {
            let stars = star_states(rating);
            let full = stars.iter().filter(|s| **s == StarState::Full).count();
            let half = stars.iter().filter(|s| **s == StarState::Half).count();
            prop_assert!(full as f64 <= rating);
            prop_assert!(half <= 1);
            prop_assert!(full as f64 + half as f64 * 0.5 <= rating + f64::EPSILON);
        }
    }
}
