use std::fs;
use std::path::Path;

use gdadmob_assembler::{AssemblerError, Pipeline, PipelineConfig, TaskId, TaskOutcome};
use gdadmob_package::Archive;
use gdadmob_props::Platform;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A plugin repository with templates, property files and prebuilt
/// platform libraries.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "common/config/config.properties",
        "# plugin\npluginNodeName=Admob\npluginModuleName=admob\npluginVersion=5.3\n\
         extra.godotVersion=4.5\n",
    );
    write(
        root,
        "ios/config/config.properties",
        "platform_version=14.3\nframeworks=Foundation.framework, StoreKit.framework\n\
         embedded_frameworks=\nflags=-ObjC\n\
         initialization_method=admob_plugin_init\ndeinitialization_method=admob_plugin_deinit\n",
    );
    write(
        root,
        "ios/config/admob_plugin.gdip",
        "[config]\nname=\"@pluginName@\"\nbinary=\"@pluginName@.xcframework\"\n\
         initialization=\"@iosInitializationMethod@\"\ndeinitialization=\"@iosDeinitializationMethod@\"\n",
    );
    write(
        root,
        "common/config/mediation.properties",
        "applovin.dependencies=com.google.ads.mediation:applovin:13.3.1.0\n\
         applovin.pod=GoogleMobileAdsMediationAppLovin\n",
    );
    write(
        root,
        "common/gradle/libs.versions.toml",
        "[versions]\nadmob = \"24.4.0\"\n\n[libraries]\n\
         admob = { module = \"com.google.android.gms:play-services-ads\", version.ref = \"admob\" }\n",
    );

    write(
        root,
        "addon/src/AdmobPlugin.gd",
        "const PLUGIN_NAME := \"@pluginName@\"\nconst VERSION := \"@pluginVersion@\"\n\
         const DEPENDENCIES := [ @androidDependencies@ ]\nconst FRAMEWORKS := [ @iosFrameworks@ ]\n\
         const GODOT := \"@godotVersion@\"\n",
    );
    write(
        root,
        "addon/src/model/MediationNetwork.gd",
        "const POD := \"@applovinPod@\"\nconst DEPS := [ @applovinDependencies@ ]\n",
    );
    write(
        root,
        "addon/src/plugin.cfg",
        "[plugin]\nname=\"@pluginNodeName@\"\nversion=\"@pluginVersion@\"\n",
    );
    write(root, "addon/src/icon.png", [0x89u8, b'P', b'N', b'G', 0, 1, 2]);
    write(root, "addon/src/README.md", "not part of the plugin\n");

    write(root, "android/build/outputs/aar/AdmobPlugin-debug.aar", [1u8, 1, 1]);
    write(root, "android/build/outputs/aar/AdmobPlugin-release.aar", [2u8, 2, 2]);
    write(
        root,
        "ios/build/framework/release/AdmobPlugin.xcframework/Info.plist",
        "<plist/>\n",
    );
    dir
}

fn pipeline(root: &Path) -> Pipeline {
    Pipeline::load(PipelineConfig::rooted_at(root)).unwrap()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn generate_resolves_every_token() {
    let dir = project();
    let root = dir.path();
    pipeline(root).run(&[TaskId::GenerateGdScript]).unwrap();

    let script = read(root, "addon/build/output/addons/AdmobPlugin/AdmobPlugin.gd");
    assert_eq!(
        script,
        "const PLUGIN_NAME := \"AdmobPlugin\"\nconst VERSION := \"5.3\"\n\
         const DEPENDENCIES := [ \"com.google.android.gms:play-services-ads:24.4.0\" ]\n\
         const FRAMEWORKS := [ \"Foundation.framework\", \"StoreKit.framework\" ]\n\
         const GODOT := \"4.5\"\n"
    );
    let mediation = read(root, "addon/build/output/addons/AdmobPlugin/model/MediationNetwork.gd");
    assert_eq!(
        mediation,
        "const POD := \"GoogleMobileAdsMediationAppLovin\"\n\
         const DEPS := [ \"com.google.ads.mediation:applovin:13.3.1.0\" ]\n"
    );
    assert!(root.join("addon/build/output/addons/AdmobPlugin/icon.png").is_file());
    assert!(!root.join("addon/build/output/addons/AdmobPlugin/README.md").exists());
}

#[test]
fn archive_produces_all_platforms() {
    let dir = project();
    let root = dir.path();
    let p = pipeline(root);
    let report = p.run(&[TaskId::Archive]).unwrap();
    assert_eq!(report.skipped(), 0);

    let android = Archive::open_path(&p.archive_path(Platform::Android)).unwrap();
    assert_eq!(
        android.names(),
        vec![
            "addons/AdmobPlugin/AdmobPlugin.gd",
            "addons/AdmobPlugin/bin/debug/AdmobPlugin-debug.aar",
            "addons/AdmobPlugin/bin/release/AdmobPlugin-release.aar",
            "addons/AdmobPlugin/icon.png",
            "addons/AdmobPlugin/model/MediationNetwork.gd",
            "addons/AdmobPlugin/plugin.cfg",
        ]
    );

    let ios = Archive::open_path(&p.archive_path(Platform::Ios)).unwrap();
    assert!(ios.names().iter().all(|n| !n.ends_with(".aar")));
    assert_eq!(
        ios.get("ios/framework/AdmobPlugin.xcframework/Info.plist"),
        Some(&b"<plist/>\n"[..])
    );
    let gdip = String::from_utf8(ios.require("ios/plugins/admob_plugin.gdip").unwrap().to_vec()).unwrap();
    assert!(gdip.contains("initialization=\"admob_plugin_init\""));

    let multi = Archive::open_path(&p.archive_path(Platform::Multi)).unwrap();
    assert_eq!(multi.names().len(), android.names().len() + 2);
    assert!(multi.get("addons/AdmobPlugin/bin/release/AdmobPlugin-release.aar").is_some());
    assert!(multi.get("ios/plugins/admob_plugin.gdip").is_some());
}

#[test]
fn rebuilding_gives_identical_archives() {
    let dir = project();
    let root = dir.path();
    let p = pipeline(root);

    p.run(&[TaskId::Archive]).unwrap();
    let first: Vec<Vec<u8>> = Platform::ALL
        .iter()
        .map(|&platform| fs::read(p.archive_path(platform)).unwrap())
        .collect();

    p.run(&[TaskId::Clean, TaskId::Archive]).unwrap();
    let second: Vec<Vec<u8>> = Platform::ALL
        .iter()
        .map(|&platform| fs::read(p.archive_path(platform)).unwrap())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn missing_optional_inputs_soft_skip() {
    let dir = project();
    let root = dir.path();
    fs::remove_file(root.join("android/build/outputs/aar/AdmobPlugin-release.aar")).unwrap();
    fs::remove_dir_all(root.join("ios/build/framework")).unwrap();

    let report = pipeline(root).run(&[TaskId::Build]).unwrap();
    assert!(matches!(report.outcome(TaskId::BuildRelease), Some(TaskOutcome::Skipped(_))));
    assert!(matches!(report.outcome(TaskId::CopyIosFrameworks), Some(TaskOutcome::Skipped(_))));
    assert!(matches!(report.outcome(TaskId::BuildDebug), Some(TaskOutcome::Done(_))));
    assert!(root
        .join("common/build/plugin/addons/AdmobPlugin/bin/debug/AdmobPlugin-debug.aar")
        .is_file());
    assert!(!root.join("common/build/plugin/addons/AdmobPlugin/bin/release").exists());
}

#[test]
fn missing_template_dir_is_fatal() {
    let dir = project();
    let root = dir.path();
    fs::remove_dir_all(root.join("addon/src")).unwrap();
    let err = pipeline(root).run(&[TaskId::GenerateGdScript]).unwrap_err();
    assert!(matches!(err, AssemblerError::MissingInput(p) if p.ends_with("addon/src")));
}

#[test]
fn missing_property_file_is_fatal() {
    let dir = project();
    fs::remove_file(dir.path().join("ios/config/config.properties")).unwrap();
    assert!(matches!(
        Pipeline::load(PipelineConfig::rooted_at(dir.path())),
        Err(AssemblerError::Props(_))
    ));
}

#[test]
fn unresolved_tokens_warn_unless_strict() {
    let dir = project();
    let root = dir.path();
    fs::remove_file(root.join("common/config/mediation.properties")).unwrap();

    let report = pipeline(root).run(&[TaskId::BuildDebug, TaskId::ValidateOutput]).unwrap();
    assert!(matches!(
        report.outcome(TaskId::ReplaceMediationTokens),
        Some(TaskOutcome::Skipped(_))
    ));
    assert_eq!(
        report.outcome(TaskId::ValidateOutput),
        Some(&TaskOutcome::Done("2 unresolved token(s)".into()))
    );

    let strict = PipelineConfig {
        strict_tokens: true,
        ..PipelineConfig::rooted_at(root)
    };
    let err = Pipeline::load(strict)
        .unwrap()
        .run(&[TaskId::ValidateOutput])
        .unwrap_err();
    match err {
        AssemblerError::Unresolved { count, first, file } => {
            assert_eq!(count, 2);
            assert_eq!(first, "applovinPod");
            assert!(file.ends_with("MediationNetwork.gd"));
        }
        other => panic!("expected unresolved tokens, got {other:?}"),
    }
}

#[test]
fn clean_then_install_preserves_engine_sidecars() {
    let dir = project();
    let root = dir.path();
    let demo = root.join("demo/addons/AdmobPlugin");
    write(&demo, "icon.png.import", "[remap]\nimporter=\"texture\"\n");
    write(&demo, "AdmobPlugin.gd.uid", "uid://b4kq2x\n");
    write(&demo, "model/MediationNetwork.gd.uid", "uid://c7fz1m\n");
    write(&demo, "stale/Removed.gd", "# from an older build\n");

    let p = pipeline(root);
    p.run(&[TaskId::Clean, TaskId::InstallToDemo]).unwrap();

    assert_eq!(read(&demo, "icon.png.import"), "[remap]\nimporter=\"texture\"\n");
    assert_eq!(read(&demo, "AdmobPlugin.gd.uid"), "uid://b4kq2x\n");
    assert_eq!(read(&demo, "model/MediationNetwork.gd.uid"), "uid://c7fz1m\n");
    assert!(!demo.join("stale").exists());
    assert!(demo.join("AdmobPlugin.gd").is_file());
    assert!(demo.join("bin/debug/AdmobPlugin-debug.aar").is_file());
}

#[test]
fn config_file_relocates_layout() {
    let dir = project();
    let root = dir.path();
    fs::rename(root.join("addon/src"), root.join("templates")).unwrap();
    write(root, "gdadmob.toml", "template_dir = \"templates\"\narchive_dir = \"dist\"\n");

    let config = PipelineConfig::discover(root).unwrap();
    let p = Pipeline::load(config).unwrap();
    p.run(&[TaskId::CreateAndroidArchive]).unwrap();
    assert!(root.join("dist/AdmobPlugin-Android-v5.3.zip").is_file());
}
