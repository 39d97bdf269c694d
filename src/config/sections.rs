//! API, palette and UI configuration sections

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard API
// ─────────────────────────────────────────────────────────────────────────────

/// Where the dashboard API lives and how long to wait for it
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the local dashboard server
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Create from file config; `env_url` (SPECDECK_API_URL) wins over the file
    pub fn from_file(file: Option<FileApiConfig>, env_url: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            base_url: env_url.or(file.base_url).unwrap_or(defaults.base_url),
            timeout_secs: file
                .timeout_secs
                .filter(|&t| t > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command palette
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteConfig {
    /// Quiet window after the last keystroke before searching
    pub debounce_ms: u64,
    /// Minimum query length (chars) before remote sources are queried
    pub min_query_len: usize,
    /// Result limit passed to each remote search endpoint
    pub result_limit: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            result_limit: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FilePaletteConfig {
    pub debounce_ms: Option<u64>,
    pub min_query_len: Option<usize>,
    pub result_limit: Option<usize>,
}

impl PaletteConfig {
    pub fn from_file(file: Option<FilePaletteConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
            min_query_len: file
                .min_query_len
                .filter(|&n| n > 0)
                .unwrap_or(defaults.min_query_len),
            result_limit: file
                .result_limit
                .filter(|&n| n > 0)
                .unwrap_or(defaults.result_limit),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Start with the sidebar collapsed
    pub sidebar_collapsed: bool,
    /// Directory diagram SVG exports are written to
    pub export_dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUiConfig {
    pub sidebar_collapsed: Option<bool>,
    pub export_dir: Option<String>,
}

impl UiConfig {
    pub fn from_file(file: Option<FileUiConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            sidebar_collapsed: file.sidebar_collapsed.unwrap_or(defaults.sidebar_collapsed),
            export_dir: file
                .export_dir
                .map(|dir| crate::util::expand_tilde(&dir))
                .unwrap_or(defaults.export_dir),
        }
    }
}
