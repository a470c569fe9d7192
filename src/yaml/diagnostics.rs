//! Diagnostics for catalog and config YAML files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::catalog::CatalogError;

/// YAML parse error pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {file}: {message}")]
#[diagnostic(code(devscen::yaml::syntax))]
pub struct YamlSyntaxError {
    file: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error and the text it was parsing
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| line_col_to_offset(source, loc.line(), loc.column()))
            .unwrap_or(0);
        let message = err.to_string();

        Self {
            file: filename.to_string(),
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: suggest(&message),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors from loading a YAML-backed file
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Invalid catalog: {0}")]
    #[diagnostic(code(devscen::catalog::invalid))]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte offset of a 1-based line/column, clamped to the source length
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_text = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .unwrap_or_default();
    let column_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());

    (line_start + column_offset).min(source.len())
}

/// Hint for common mistakes in hand-edited catalogs
fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("missing field") {
        return Some(
            "Catalog overrides replace the built-in catalog wholesale; run `devscen catalog` to print a complete one to start from."
                .to_string(),
        );
    }
    if msg.contains("unknown variant") && msg.contains("cc1") {
        return Some("Complexity categories are written CC1 through CC6.".to_string());
    }
    if msg.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }
    if msg.contains("duplicate") {
        return Some("Each key can only appear once.".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }
    if msg.contains("invalid type") {
        return Some("Check that numbers are not quoted and lists use '- item' entries.".to_string());
    }

    None
}
