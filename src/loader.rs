use std::fs;
use std::path::Path;

use crate::error::LoadError;

/// Read a reference file, accepting only the given extensions.
///
/// Content is never rejected: invalid UTF-8 is replaced lossily and CRLF line
/// endings become LF so they can be reproduced with the Enter key.
pub fn load_reference_file<S: AsRef<str>>(
    path: &Path,
    allowed_extensions: &[S],
) -> Result<String, LoadError> {
    if path.as_os_str().is_empty() {
        return Err(LoadError::NoFileSelected);
    }
    check_extension(path, allowed_extensions)?;

    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = normalize_newlines(&String::from_utf8_lossy(&bytes));

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        "reference file loaded"
    );
    Ok(text)
}

/// Same check the browser file picker applied via its `accept` list
pub fn check_extension<S: AsRef<str>>(
    path: &Path,
    allowed_extensions: &[S],
) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if allowed_extensions
        .iter()
        .any(|a| a.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
    {
        return Ok(());
    }

    let allowed = allowed_extensions
        .iter()
        .map(|a| format!(".{}", a.as_ref().trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join(", ");
    let found = if ext.is_empty() {
        "(none)".to_string()
    } else {
        format!(".{ext}")
    };
    Err(LoadError::UnsupportedExtension(found, allowed))
}

pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
