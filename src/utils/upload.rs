use crate::error::AppError;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Reduces an uploaded file name to a safe, flat ASCII name.
///
/// Accents are decomposed (NFKD) so their base letters survive. Path
/// separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped and leading/trailing dots and underscores are
/// trimmed. Returns `None` when nothing usable is left.
pub fn secure_filename(original: &str) -> Option<String> {
    let flattened: String = original
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(|c| c.is_ascii())
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Copies an uploaded temp file into `upload_dir` under its sanitized name.
/// Same-named uploads overwrite each other.
pub fn store_document(
    upload_dir: &Path,
    original_name: Option<&str>,
    source: &Path,
) -> Result<Option<String>, AppError> {
    let Some(name) = original_name.and_then(secure_filename) else {
        return Ok(None);
    };

    fs::create_dir_all(upload_dir)?;
    fs::copy(source, upload_dir.join(&name))?;
    tracing::debug!(file = %name, "Stored leave document");
    Ok(Some(name))
}
