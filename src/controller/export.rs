use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::errors::{Result, TerseError};
use crate::models::{ExportPayload, ExportSelection};

/// Filename used when the export is not a single record
pub const DEFAULT_EXPORT_FILENAME: &str = "export.json";

/// Suggested download name: `{key}.json` for exactly one key, `export.json`
/// for none, several, or everything.
pub fn export_filename(selection: &ExportSelection) -> String {
    match selection.single() {
        Some(key) => format!("{}.json", key),
        None => DEFAULT_EXPORT_FILENAME.to_string(),
    }
}

/// Export data plus the name it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub payload: ExportPayload,
}

impl ExportFile {
    pub fn new(selection: &ExportSelection, payload: ExportPayload) -> Self {
        Self {
            filename: export_filename(selection),
            payload,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.payload)?)
    }

    /// Write the document into `dir`, returning the full path.
    ///
    /// The filename must stay inside `dir`: separators and `..` are refused.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !is_plain_filename(&self.filename) {
            return Err(TerseError::file_operation(format!(
                "Refusing to export to '{}': not a plain file name",
                self.filename
            )));
        }
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                TerseError::file_operation(format!(
                    "Failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let path = dir.join(&self.filename);
        std::fs::write(&path, self.to_json()?).map_err(|e| {
            TerseError::file_operation(format!("Failed to write '{}': {}", path.display(), e))
        })?;
        info!(
            "Exported {} record(s) to {}",
            self.payload.len(),
            path.display()
        );
        Ok(path)
    }
}

/// A single normal path component with no separator of either style
fn is_plain_filename(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
