//! Advisory checks on conversion results and clip file names.
//!
//! Nothing here fails a conversion: every check returns warnings and leaves
//! reporting and the decision to the caller.

use std::fmt;

use crate::result::ConversionResult;

/// Longest file name most filesystems accept
pub const MAX_FILENAME_LEN: usize = 255;

const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_FILENAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Size thresholds for [`validate_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Markdown longer than this many chars is flagged
    pub max_markdown_chars: usize,
    /// HTML input larger than this many bytes is flagged
    pub max_html_bytes: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_markdown_chars: 1_000_000,
            max_html_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    EmptyMarkdown,
    MarkdownTooLong { length: usize, max: usize },
    HtmlTooLarge { size: usize, max: usize },
    ControlCharacters { count: usize },
    EmptyFilename,
    ForbiddenFilenameChars { chars: Vec<char> },
    ReservedFilename { name: String },
    FilenameTooLong { length: usize, max: usize },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMarkdown => write!(f, "conversion produced no Markdown"),
            Self::MarkdownTooLong { length, max } => {
                write!(f, "Markdown is {length} chars long (limit {max})")
            }
            Self::HtmlTooLarge { size, max } => {
                write!(f, "HTML input is {size} bytes (limit {max})")
            }
            Self::ControlCharacters { count } => {
                write!(f, "Markdown contains {count} control characters")
            }
            Self::EmptyFilename => write!(f, "file name is empty"),
            Self::ForbiddenFilenameChars { chars } => {
                let list: String = chars.iter().collect();
                write!(f, "file name contains forbidden characters: {list:?}")
            }
            Self::ReservedFilename { name } => write!(f, "file name '{name}' is reserved"),
            Self::FilenameTooLong { length, max } => {
                write!(f, "file name is {length} bytes long (limit {max})")
            }
        }
    }
}

/// Check a conversion result against `limits`.
pub fn validate_result(
    result: &ConversionResult,
    limits: &ValidationLimits,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let metadata = result.metadata();

    if result.markdown().trim().is_empty() {
        warnings.push(ValidationWarning::EmptyMarkdown);
    }

    if metadata.markdown_length() > limits.max_markdown_chars {
        warnings.push(ValidationWarning::MarkdownTooLong {
            length: metadata.markdown_length(),
            max: limits.max_markdown_chars,
        });
    }

    if metadata.original_bytes() > limits.max_html_bytes {
        warnings.push(ValidationWarning::HtmlTooLarge {
            size: metadata.original_bytes(),
            max: limits.max_html_bytes,
        });
    }

    let control = result
        .markdown()
        .chars()
        .filter(|c| c.is_control() && *c != '\n' && *c != '\t')
        .count();
    if control > 0 {
        warnings.push(ValidationWarning::ControlCharacters { count: control });
    }

    warnings
}

/// Check that `name` is usable as a file name on common filesystems.
pub fn validate_filename(name: &str) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if name.trim().is_empty() {
        warnings.push(ValidationWarning::EmptyFilename);
        return warnings;
    }

    let mut forbidden: Vec<char> = name
        .chars()
        .filter(|c| FORBIDDEN_FILENAME_CHARS.contains(c) || c.is_control())
        .collect();
    forbidden.dedup();
    if !forbidden.is_empty() {
        warnings.push(ValidationWarning::ForbiddenFilenameChars { chars: forbidden });
    }

    let stem = name.split('.').next().unwrap_or(name).trim();
    if RESERVED_FILENAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        warnings.push(ValidationWarning::ReservedFilename {
            name: name.to_string(),
        });
    }

    if name.len() > MAX_FILENAME_LEN {
        warnings.push(ValidationWarning::FilenameTooLong {
            length: name.len(),
            max: MAX_FILENAME_LEN,
        });
    }

    warnings
}
