//! Assembly of the Godot AdMob plugin from generated sources and compiled
//! platform libraries.
//!
//! A [`Pipeline`] registers every build step as a named task in a
//! [`TaskGraph`]; running a target first plans it with its dependencies and
//! finalizers, then executes the plan in order on the current thread.
//!
//! ```text
//! addon/src ──generate──▶ output/addons/<plugin> ──build──▶ plugin/addons/<plugin>
//! ios/config ─generate──▶ output/ios/plugins     ──build──▶ plugin/ios/plugins
//! android aar / ios xcframework ───────────────────build──▶ plugin/...
//! plugin/ ──archive──▶ release/<plugin>-<Platform>-v<version>.zip
//! ```

mod config;
mod copy;
mod error;
mod graph;
mod pipeline;

pub use config::{PipelineConfig, DEFAULT_CONFIG_FILE};
pub use copy::{remove_tree, CleanSpec, CopySpec, PathRemap};
pub use error::{AssemblerError, AssemblerResult};
pub use graph::{TaskGraph, TaskSpec};
pub use pipeline::{Layout, Pipeline, RunReport, TaskId, TaskOutcome, MEDIATION_TARGET};
