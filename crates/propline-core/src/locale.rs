//! Locale tag from a properties file name (`<base>_<locale>.<ext>`).

use std::path::Path;

use crate::errors::{PropError, Result};

/// Locale tag of a properties file, `""` for the default/reference locale.
///
/// `messages_fr.properties` yields `fr`; `messages.properties` yields `""`.
/// Only the part of the name before its first `.` is considered.
///
/// # Errors
///
/// `InvalidFileName` if the path has no UTF-8 file name.
pub fn locale_tag(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PropError::InvalidFileName {
            name: path.display().to_string(),
        })?;
    let stem = name.split('.').next().unwrap_or(name);
    Ok(stem.split('_').nth(1).unwrap_or_default().to_string())
}
