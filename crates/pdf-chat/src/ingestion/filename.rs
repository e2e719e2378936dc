//! Filename checks for uploaded documents

use unicode_normalization::UnicodeNormalization;

/// Accepted upload extensions, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check that the last extension of a filename is an allowed one
pub fn is_allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied filename to a single safe path segment
///
/// The result holds only ASCII letters, digits, `_`, `.` and `-`, never
/// starts or ends with `.` or `_`, and may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();

    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut name = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    let stem = name.split('.').next().unwrap_or("").to_uppercase();
    if !name.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        name.insert(0, '_');
    }

    name
}
