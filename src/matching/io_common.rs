use std::path::Path;

use volunteer_matching::CellValue;

/// The path of an input or output file named in a configuration.
///
/// Relative paths are relative to the directory of the configuration.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    if file_path == "stdout" {
        return file_path.to_string();
    }
    root.join(file_path).display().to_string()
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// A text cell, with blank text read as an empty cell.
pub fn text_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}
