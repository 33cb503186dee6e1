use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use textcmd::StringCatalog;

/// Read a string catalog override. Keys missing from the file keep their defaults.
pub fn load_strings(path: &Path) -> Result<StringCatalog> {
    if !path.exists() {
        bail!("strings file not found: {}", path.display());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read strings file: {}", path.display()))?;
    let strings: StringCatalog = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse strings JSON: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded string overrides");
    Ok(strings)
}
