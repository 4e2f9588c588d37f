//! Native ad lifecycle against fake SDK and platform views.

use std::sync::{Arc, Mutex};

use gdadmob_bridge::*;
use pretty_assertions::assert_eq;

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

struct FakeView {
    log: Arc<Log>,
}

impl NativeAdView for FakeView {
    fn render(&mut self, slots: &AdViewSlots) {
        let headline = slots
            .headline
            .as_ref()
            .and_then(|s| s.text.clone())
            .unwrap_or_default();
        self.log.push(format!("render {headline}"));
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.log.push(format!("hidden {hidden}"));
    }

    fn set_frame(&mut self, x: f64, y: f64, width: Option<f64>, height: Option<f64>) {
        self.log.push(format!("frame {x} {y} {width:?} {height:?}"));
    }

    fn remove_from_parent(&mut self) {
        self.log.push("removed");
    }

    fn measure(&mut self) -> (f64, f64) {
        (320.0, 100.0)
    }

    fn screen_scale(&self) -> f64 {
        2.0
    }
}

struct FakeHost {
    attached: bool,
    log: Arc<Log>,
}

impl NativeAdHost for FakeHost {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn create_view(&self) -> Option<Box<dyn NativeAdView>> {
        self.attached.then(|| {
            Box::new(FakeView {
                log: self.log.clone(),
            }) as Box<dyn NativeAdView>
        })
    }
}

struct FakeLoader {
    log: Arc<Log>,
}

impl NativeAdLoader for FakeLoader {
    fn load(&self, ad_unit_id: &str) {
        self.log.push(format!("sdk load {ad_unit_id}"));
    }
}

struct RecordingDelegate {
    log: Arc<Log>,
    last_info: Mutex<Option<AdInfo>>,
}

impl NativeAdDelegate for RecordingDelegate {
    fn loaded(&self, info: &AdInfo, response: &ResponseInfo) {
        self.log
            .push(format!("loaded {} {}", info.ad_id, response.response_id.clone().unwrap_or_default()));
    }

    fn failed_to_load(&self, info: &AdInfo, error: &LoadAdError) {
        self.log
            .push(format!("failed {} {}", info.ad_id, error.error.code));
    }

    fn impression(&self, _info: &AdInfo) {
        self.log.push("impression");
    }

    fn clicked(&self, _info: &AdInfo) {
        self.log.push("clicked");
    }

    fn screen_presented(&self, _info: &AdInfo) {
        self.log.push("presented");
    }

    fn screen_dismissed(&self, _info: &AdInfo) {
        self.log.push("dismissed");
    }

    fn size_measured(&self, info: &AdInfo) {
        self.log.push(format!(
            "measured {}x{}",
            info.measured_width, info.measured_height
        ));
        *self.last_info.lock().unwrap() = Some(info.clone());
    }
}

struct Harness {
    ad: NativeAd,
    main: Arc<QueuedMainThread>,
    log: Arc<Log>,
    delegate: Arc<RecordingDelegate>,
}

fn harness(attached: bool) -> Harness {
    let log = Arc::new(Log::default());
    let main = Arc::new(QueuedMainThread::new());
    let delegate = Arc::new(RecordingDelegate {
        log: log.clone(),
        last_info: Mutex::new(None),
    });
    let ad = NativeAd::new(
        AdInfo::new("native-1", LoadAdRequest::new("ca-app-pub-3940256099942544/2247696110")),
        delegate.clone(),
        Arc::new(FakeLoader { log: log.clone() }),
        Arc::new(FakeHost {
            attached,
            log: log.clone(),
        }),
        main.clone(),
    );
    Harness {
        ad,
        main,
        log,
        delegate,
    }
}

fn assets() -> NativeAdAssets {
    NativeAdAssets {
        headline: "Tower Defense".into(),
        call_to_action: Some("Install".into()),
        star_rating: Some(4.0),
        ..NativeAdAssets::default()
    }
}

fn response() -> ResponseInfo {
    ResponseInfo {
        response_id: Some("resp-1".into()),
        adapter_class_name: None,
    }
}

fn loaded_harness() -> Harness {
    let h = harness(true);
    h.ad.on_ad_loaded(assets(), response());
    h.main.drain();
    h.log.clear();
    h
}

#[test]
fn load_runs_on_main_thread() {
    let h = harness(true);
    h.ad.load();
    assert!(h.log.entries().is_empty());
    assert_eq!(h.main.drain(), 1);
    assert_eq!(
        h.log.entries(),
        vec!["sdk load ca-app-pub-3940256099942544/2247696110"]
    );
}

#[test]
fn load_without_parent_does_nothing() {
    let h = harness(false);
    h.ad.load();
    assert_eq!(h.main.pending(), 0);
}

#[test]
fn loaded_ad_is_rendered_hidden_then_measured() {
    let h = harness(true);
    h.ad.on_ad_loaded(assets(), response());
    assert!(!h.ad.is_loaded());

    h.main.drain();

    assert!(h.ad.is_loaded());
    assert_eq!(
        h.log.entries(),
        vec![
            "render Tower Defense",
            "hidden true",
            "loaded native-1 resp-1",
            "measured 25600x8000",
        ]
    );
    let info = h.delegate.last_info.lock().unwrap().clone().unwrap();
    assert_eq!((info.measured_width, info.measured_height), (25600, 8000));
    assert_eq!(h.ad.info().measured_width, 25600);
}

#[test]
fn show_and_hide_before_load_are_ignored() {
    let h = harness(true);
    h.ad.show();
    h.ad.hide();
    assert_eq!(h.main.pending(), 0);
}

#[test]
fn show_and_hide_toggle_the_view() {
    let h = loaded_harness();
    h.ad.show();
    h.ad.hide();
    h.main.drain();
    assert_eq!(h.log.entries(), vec!["hidden false", "hidden true"]);
}

#[test]
fn repeated_layout_is_suppressed() {
    let h = loaded_harness();
    let layout = ViewLayout {
        x: 10.0,
        y: 20.0,
        width: 300.0,
        height: 0.0,
        visible: true,
    };
    h.ad.update_layout(layout);
    h.ad.update_layout(layout);
    assert_eq!(h.main.drain(), 1);
    assert_eq!(
        h.log.entries(),
        vec!["frame 10 20 Some(300.0) None", "hidden false"]
    );

    h.log.clear();
    h.ad.update_layout(ViewLayout {
        visible: false,
        ..layout
    });
    h.main.drain();
    assert_eq!(
        h.log.entries(),
        vec!["frame 10 20 Some(300.0) None", "hidden true"]
    );
}

#[test]
fn layout_before_load_is_ignored() {
    let h = harness(true);
    h.ad.update_layout(ViewLayout {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
        visible: true,
    });
    assert_eq!(h.main.pending(), 0);
}

#[test]
fn remove_drops_view_and_resets_layout_cache() {
    let h = loaded_harness();
    let layout = ViewLayout {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
        visible: true,
    };
    h.ad.update_layout(layout);
    h.ad.remove();
    h.main.drain();
    assert!(!h.ad.is_loaded());
    assert_eq!(h.log.entries().last().map(String::as_str), Some("removed"));

    h.log.clear();
    h.ad.show();
    assert_eq!(h.main.pending(), 0);

    // a fresh load applies the same layout again
    h.ad.on_ad_loaded(assets(), response());
    h.main.drain();
    h.ad.update_layout(layout);
    assert_eq!(h.main.pending(), 1);
}

#[test]
fn lost_parent_drops_the_loaded_ad() {
    let h = harness(false);
    h.ad.on_ad_loaded(assets(), response());
    h.main.drain();
    assert!(!h.ad.is_loaded());
    assert!(h.log.entries().is_empty());
}

#[test]
fn sdk_events_reach_the_delegate() {
    let h = harness(true);
    h.ad.on_ad_failed(LoadAdError::from(AdError::new(3, "com.google.admob", "No fill")));
    h.ad.on_impression();
    h.ad.on_click();
    h.ad.on_present_screen();
    h.ad.on_dismiss_screen();
    assert_eq!(
        h.log.entries(),
        vec![
            "failed native-1 3",
            "impression",
            "clicked",
            "presented",
            "dismissed"
        ]
    );
}
