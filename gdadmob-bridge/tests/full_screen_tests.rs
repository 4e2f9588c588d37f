//! Interstitial, rewarded and app open ads against a fake SDK.

use std::sync::{Arc, Mutex};

use gdadmob_bridge::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Default)]
struct Log(Mutex<Vec<String>>);

impl Log {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

struct FakeLoader {
    log: Arc<Log>,
}

impl FullScreenAdLoader for FakeLoader {
    fn load(&self, kind: FullScreenKind, request: &LoadAdRequest) {
        self.log
            .push(format!("sdk load {kind} {}", request.ad_unit_id().unwrap_or_default()));
    }
}

struct FakeContent {
    log: Arc<Log>,
}

impl FullScreenContent for FakeContent {
    fn set_server_side_verification(&mut self, options: &ServerSideVerification) {
        self.log.push(format!(
            "ssv {} {}",
            options.user_id.clone().unwrap_or_default(),
            options.custom_data.clone().unwrap_or_default()
        ));
    }

    fn present(&mut self) {
        self.log.push("present");
    }
}

struct RecordingDelegate {
    log: Arc<Log>,
}

impl FullScreenAdDelegate for RecordingDelegate {
    fn loaded(&self, info: &AdInfo, _response: &ResponseInfo) {
        self.log.push(format!("loaded {}", info.ad_id));
    }

    fn reloaded(&self, info: &AdInfo, _response: &ResponseInfo) {
        self.log.push(format!("reloaded {}", info.ad_id));
    }

    fn failed_to_load(&self, _info: &AdInfo, error: &LoadAdError) {
        self.log.push(format!("failed to load {}", error.error.code));
    }

    fn showed(&self, _info: &AdInfo) {
        self.log.push("showed");
    }

    fn failed_to_show(&self, _info: &AdInfo, error: &AdError) {
        self.log.push(format!("failed to show {}", error.code));
    }

    fn dismissed(&self, _info: &AdInfo) {
        self.log.push("dismissed");
    }

    fn impression(&self, _info: &AdInfo) {
        self.log.push("impression");
    }

    fn clicked(&self, _info: &AdInfo) {
        self.log.push("clicked");
    }

    fn earned_reward(&self, _info: &AdInfo, reward: &RewardItem) {
        self.log
            .push(format!("reward {} {}", reward.amount, reward.reward_type));
    }
}

struct Harness {
    ad: FullScreenAd,
    main: Arc<QueuedMainThread>,
    log: Arc<Log>,
}

impl Harness {
    fn content(&self) -> Box<dyn FullScreenContent> {
        Box::new(FakeContent {
            log: self.log.clone(),
        })
    }

    fn deliver(&self) {
        self.ad.on_ad_loaded(self.content(), ResponseInfo::default());
    }
}

fn harness_with(kind: FullScreenKind, request: LoadAdRequest) -> Harness {
    let log = Arc::new(Log::default());
    let main = Arc::new(QueuedMainThread::new());
    let ad = FullScreenAd::new(
        kind,
        AdInfo::new(format!("{kind}-1"), request),
        Arc::new(RecordingDelegate { log: log.clone() }),
        Arc::new(FakeLoader { log: log.clone() }),
        main.clone(),
    );
    Harness { ad, main, log }
}

fn harness(kind: FullScreenKind) -> Harness {
    harness_with(kind, LoadAdRequest::new("unit-1"))
}

#[test]
fn load_runs_on_main_thread() {
    let h = harness(FullScreenKind::Interstitial);
    h.ad.load();
    assert!(h.log.entries().is_empty());
    assert_eq!(h.main.drain(), 1);
    assert_eq!(h.log.entries(), vec!["sdk load interstitial unit-1"]);
}

#[test]
fn show_without_ad_is_a_no_op() {
    for kind in [
        FullScreenKind::Interstitial,
        FullScreenKind::Rewarded,
        FullScreenKind::RewardedInterstitial,
        FullScreenKind::AppOpen,
    ] {
        let h = harness(kind);
        h.ad.show();
        assert_eq!(h.main.pending(), 0, "{kind}");
        assert!(h.log.entries().is_empty(), "{kind}");
    }
}

#[test]
fn shown_ad_is_used_up() {
    let h = harness(FullScreenKind::Rewarded);
    h.deliver();
    assert!(h.ad.is_loaded());
    h.ad.show();
    assert!(!h.ad.is_loaded());
    h.main.drain();
    h.ad.show();
    assert_eq!(h.main.pending(), 0);
    assert_eq!(h.log.entries(), vec!["loaded rewarded-1", "present"]);
}

#[test]
fn interstitial_reloads_after_dismiss() {
    let h = harness(FullScreenKind::Interstitial);
    h.deliver();
    h.ad.show();
    h.main.drain();
    h.ad.on_showed();
    h.ad.on_impression();
    h.ad.on_dismissed();
    h.main.drain();
    h.deliver();

    assert_eq!(
        h.log.entries(),
        vec![
            "loaded interstitial-1",
            "present",
            "showed",
            "impression",
            "dismissed",
            "sdk load interstitial unit-1",
            "reloaded interstitial-1",
        ]
    );
}

#[test]
fn rewarded_ads_report_every_load_as_loaded() {
    let h = harness(FullScreenKind::RewardedInterstitial);
    h.deliver();
    h.ad.on_dismissed();
    h.deliver();
    assert_eq!(h.main.pending(), 0);
    assert_eq!(
        h.log.entries(),
        vec![
            "loaded rewarded_interstitial-1",
            "dismissed",
            "loaded rewarded_interstitial-1"
        ]
    );
}

#[test]
fn rewards_only_reach_rewarded_kinds() {
    let h = harness(FullScreenKind::Rewarded);
    h.ad.on_user_earned_reward(RewardItem::new("coins", 25));
    assert_eq!(h.log.entries(), vec!["reward 25 coins"]);

    let h = harness(FullScreenKind::Interstitial);
    h.ad.on_user_earned_reward(RewardItem::new("coins", 25));
    assert!(h.log.entries().is_empty());
}

#[test]
fn server_side_verification_applies_to_rewarded_kinds() {
    let request = LoadAdRequest::from_dictionary(json!({
        "ad_unit_id": "unit-1",
        "user_id": "player-7",
        "custom_data": "level=3",
    }))
    .unwrap();

    let h = harness_with(FullScreenKind::Rewarded, request.clone());
    h.deliver();
    assert_eq!(
        h.log.entries(),
        vec!["ssv player-7 level=3", "loaded rewarded-1"]
    );

    let h = harness_with(FullScreenKind::Interstitial, request);
    h.deliver();
    assert_eq!(h.log.entries(), vec!["loaded interstitial-1"]);
}

#[test]
fn load_failure_clears_the_ad() {
    let h = harness(FullScreenKind::Interstitial);
    h.deliver();
    h.ad.on_ad_failed(LoadAdError::from(AdError::new(3, "com.google.android.gms.ads", "No fill.")));
    assert!(!h.ad.is_loaded());
    assert_eq!(h.log.entries().last().map(String::as_str), Some("failed to load 3"));
}

#[test]
fn app_open_refuses_overlapping_loads() {
    let h = harness(FullScreenKind::AppOpen);
    h.ad.load();
    h.ad.load();
    assert_eq!(h.main.drain(), 1);

    h.deliver();
    h.ad.load();
    assert_eq!(h.main.pending(), 0);

    h.ad.on_ad_failed(LoadAdError::from(AdError::new(0, "sdk", "Internal error.")));
    h.ad.load();
    assert_eq!(h.main.pending(), 1);
}

#[test]
fn app_open_does_not_show_twice() {
    let h = harness(FullScreenKind::AppOpen);
    h.deliver();
    h.ad.show();
    h.main.drain();
    h.ad.on_showed();
    assert!(h.ad.is_showing());

    h.deliver();
    h.log.clear();
    h.ad.show();
    assert_eq!(h.main.pending(), 0);

    h.ad.on_dismissed();
    assert!(!h.ad.is_showing());
    h.ad.show();
    h.main.drain();
    assert_eq!(h.log.entries(), vec!["dismissed", "present"]);
}

#[test]
fn app_open_expires() {
    let h = harness(FullScreenKind::AppOpen);
    h.deliver();
    let later = std::time::Instant::now() + APP_OPEN_AD_LIFETIME + std::time::Duration::from_secs(1);
    assert!(h.ad.is_loaded());
    assert!(!h.ad.is_loaded_at(later));
}

#[test]
fn app_open_auto_shows_on_foreground() {
    let h = harness(FullScreenKind::AppOpen);
    h.deliver();
    h.log.clear();

    h.ad.on_app_foreground();
    assert_eq!(h.main.pending(), 0);

    h.ad.set_auto_show_on_resume(true);
    h.ad.on_app_background();
    h.ad.on_app_foreground();
    h.main.drain();
    assert_eq!(h.log.entries(), vec!["present"]);
}

#[test]
fn show_failure_and_clicks_reach_the_delegate() {
    let h = harness(FullScreenKind::Interstitial);
    h.ad.on_failed_to_show(AdError::new(1, "sdk", "The ad can not be shown."));
    h.ad.on_click();
    assert_eq!(h.log.entries(), vec!["failed to show 1", "clicked"]);
    assert!(!h.ad.is_showing());
}
