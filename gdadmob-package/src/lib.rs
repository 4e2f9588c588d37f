//! Distributable plugin archives.
//!
//! An archive is a zip of the assembled plugin tree:
//! - `addons/<pluginName>/`: engine scripts, config, icons and, for
//!   Android, `bin/{debug,release}/*.aar`
//! - `ios/plugins/`: `.gdip` plugin descriptors
//! - `ios/framework/`: `.xcframework` bundles
//!
//! Archives built from the same inputs are byte-identical: entries are
//! sorted, timestamps and modes are fixed, and duplicate entry names keep
//! the first source that supplied them.

mod archive;
mod error;

pub use archive::{entry_name, Archive, ArchiveBuilder, ArchiveEntry};
pub use error::{PackageError, PackageResult};
