//! Config serialization to TOML
//!
//! Single source of truth for the config file template.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# specdeck configuration
# Precedence: environment variables > this file > built-in defaults

# Color theme: "Deck Dark" or "Deck Light" (env: SPECDECK_THEME)
theme = {theme:?}

[api]
# Dashboard server base URL (env: SPECDECK_API_URL)
base_url = {base_url:?}
# Per-request timeout in seconds
timeout_secs = {timeout_secs}

[palette]
# Quiet window after the last keystroke before searching
debounce_ms = {debounce_ms}
# Queries shorter than this only filter local changes
min_query_len = {min_query_len}
# Results requested from each search source
result_limit = {result_limit}

[ui]
# Start with the sidebar collapsed
sidebar_collapsed = {sidebar_collapsed}
# Where diagram SVG exports are written
export_dir = {export_dir:?}

[logging]
# trace, debug, info, warn, error (RUST_LOG overrides)
level = {level:?}
# Write JSON logs to rotating files
file_enabled = {file_enabled}
file_dir = {file_dir:?}
# hourly, daily, never
file_rotation = {file_rotation:?}
file_prefix = {file_prefix:?}
"#,
            theme = self.theme,
            base_url = self.api.base_url,
            timeout_secs = self.api.timeout_secs,
            debounce_ms = self.palette.debounce_ms,
            min_query_len = self.palette.min_query_len,
            result_limit = self.palette.result_limit,
            sidebar_collapsed = self.ui.sidebar_collapsed,
            export_dir = self.ui.export_dir.display().to_string(),
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display().to_string(),
            file_rotation = self.logging.file_rotation.as_str(),
            file_prefix = self.logging.file_prefix,
        )
    }
}
