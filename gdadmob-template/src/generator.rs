//! Multi-pass template generation into an output tree.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::fileset::FileSet;
use crate::token::{substitute, TokenMap};

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "ico", "aar", "jar", "zip", "a", "so", "ttf",
    "otf",
];

/// Whether a path's extension marks it as binary content.
pub fn is_binary_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// One named substitution pass.
#[derive(Debug, Clone)]
pub struct Pass {
    pub name: String,
    pub tokens: TokenMap,
}

/// Result of writing one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub relative: PathBuf,
    pub output: PathBuf,
    pub replacements: usize,
    /// Copied verbatim without substitution.
    pub binary: bool,
}

/// Applies ordered substitution passes to templates.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    passes: Vec<Pass>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(mut self, name: impl Into<String>, tokens: TokenMap) -> Self {
        self.passes.push(Pass {
            name: name.into(),
            tokens,
        });
        self
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Runs every pass over `text` in order and returns the result with the
    /// total number of replacements made.
    pub fn render(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut count = 0;
        for pass in &self.passes {
            let (next, replacements) = substitute(&current, &pass.tokens);
            for r in &replacements {
                debug!(pass = %pass.name, token = %r.token, value = %r.value, "Replacing token");
            }
            count += replacements.len();
            current = next;
        }
        (current, count)
    }

    /// Renders every file of `templates` into `output_root`, mirroring
    /// relative paths. Binary files are copied unchanged.
    pub fn generate(&self, templates: &FileSet, output_root: &Path) -> TemplateResult<Vec<GeneratedFile>> {
        let mut generated = Vec::new();
        for entry in templates.files()? {
            debug!(file = %entry.relative.display(), "Processing file");
            let output = output_root.join(&entry.relative);
            let file = self.generate_file(&entry.path, &output)?;
            generated.push(GeneratedFile {
                relative: entry.relative,
                ..file
            });
        }
        Ok(generated)
    }

    /// Renders a single template file to `output`.
    pub fn generate_file(&self, input: &Path, output: &Path) -> TemplateResult<GeneratedFile> {
        if !input.is_file() {
            return Err(TemplateError::NotFound(input.to_path_buf()));
        }
        let bytes = std::fs::read(input).map_err(|e| TemplateError::io(input, e))?;

        let (contents, replacements, binary) = if is_binary_path(input) {
            (bytes, 0, true)
        } else {
            match String::from_utf8(bytes) {
                Ok(text) => {
                    let (rendered, count) = self.render(&text);
                    (rendered.into_bytes(), count, false)
                }
                Err(e) => (e.into_bytes(), 0, true),
            }
        };

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TemplateError::io(parent, e))?;
        }
        std::fs::write(output, &contents).map_err(|e| TemplateError::io(output, e))?;

        Ok(GeneratedFile {
            relative: input.file_name().map(PathBuf::from).unwrap_or_default(),
            output: output.to_path_buf(),
            replacements,
            binary,
        })
    }
}
