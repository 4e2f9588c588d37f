//! Template generation for the Godot AdMob plugin.
//!
//! Templates are text files containing `@name@` markers. A [`Generator`]
//! runs one or more substitution passes over every file of a [`FileSet`]
//! and writes the result under an output root at the same relative path.
//!
//! Markers whose name is not in a pass's [`TokenMap`] are left untouched so a
//! later pass, or a later task such as the mediation expander, can resolve
//! them. [`find_unresolved`] reports whatever is still left at the end.

mod error;
mod fileset;
mod generator;
mod token;

pub use error::{TemplateError, TemplateResult};
pub use fileset::{FileEntry, FileSet};
pub use generator::{is_binary_path, GeneratedFile, Generator, Pass};
pub use token::{
    find_unresolved, substitute, substitute_line, Replacement, TokenMap, UnresolvedToken,
};
