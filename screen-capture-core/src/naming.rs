//! Output names for recordings.

use chrono::{Local, NaiveDateTime};

/// Source of the local wall-clock time used for default names.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTime;

impl TimeSource for LocalTime {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// `<prefix>-D-M-YYYY-H-MM-SS`, the es-ES date and time with separators
/// replaced by dashes.
pub fn default_output_name(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}-{}", prefix, now.format("%-d-%-m-%Y-%-H-%M-%S"))
}

/// Name handed to the save action: `name` plus `.extension`, exactly once.
///
/// A single trailing copy of the extension typed by the user is dropped
/// first. Path separators are replaced so the name stays a single component.
/// Returns `None` when nothing usable remains.
pub fn download_file_name(name: &str, extension: &str) -> Option<String> {
    let suffix = format!(".{}", extension);
    let mut base = name.trim();
    if base.len() >= suffix.len() && base.to_ascii_lowercase().ends_with(&suffix) {
        base = &base[..base.len() - suffix.len()];
    }

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return None;
    }
    Some(format!("{}{}", cleaned, suffix))
}
