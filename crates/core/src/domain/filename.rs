// Filename naming convention (snake_case, lowercase alphanumerics)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Snake case names: lowercase alphanumeric segments joined by single
/// underscores, optionally followed by one lowercase alphanumeric extension.
pub const FILENAME_PATTERN: &str = r"^[a-z0-9]+(_[a-z0-9]+)*(\.[a-z0-9]+)?$";

static FILENAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(FILENAME_PATTERN).expect("FILENAME_PATTERN is a valid regex"));

/// Check a single name against [`FILENAME_PATTERN`]
pub fn is_valid_filename(filename: &str) -> bool {
    FILENAME_REGEX.is_match(filename)
}

/// Stable partition of a listing into conforming and non-conforming names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameReport {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl FilenameReport {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Total number of classified names
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with every offending name if the listing is not clean
    pub fn into_result(self) -> Result<Vec<String>, ValidationError> {
        if self.invalid.is_empty() {
            Ok(self.valid)
        } else {
            Err(ValidationError::ValidationFailure {
                invalid: self.invalid,
            })
        }
    }
}

/// Classify names in their encountered order
pub fn classify_filenames<I, S>(filenames: I) -> FilenameReport
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut report = FilenameReport::default();
    for filename in filenames {
        let filename = filename.into();
        if is_valid_filename(&filename) {
            report.valid.push(filename);
        } else {
            report.invalid.push(filename);
        }
    }
    report
}
