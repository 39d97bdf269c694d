//! Shared utility functions

use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a terminal display width, appending `…` when cut
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Keep the last two segments of a path: `/home/dev/code/web` -> `…/code/web`
pub fn abbreviate_path(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let segments: Vec<&str> = trimmed
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() <= 2 {
        return if trimmed.is_empty() {
            path.to_string()
        } else {
            trimmed.to_string()
        };
    }
    format!("…/{}", segments[segments.len() - 2..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width_adds_ellipsis() {
        assert_eq!(truncate_to_width("add-authentication", 8), "add-aut…");
        assert_eq!(truncate_to_width("short", 8), "short");
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn test_truncate_to_width_counts_wide_chars() {
        // Each CJK char is 2 columns wide
        let out = truncate_to_width("日本語テキスト", 7);
        assert!(out.width() <= 7, "{:?} too wide", out);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_abbreviate_keeps_last_two_segments() {
        assert_eq!(abbreviate_path("/home/dev/code/web"), "…/code/web");
        assert_eq!(abbreviate_path("/home/dev/code/web/"), "…/code/web");
        assert_eq!(abbreviate_path("C:\\Users\\dev\\web"), "…/dev/web");
    }

    #[test]
    fn test_abbreviate_short_paths_unchanged() {
        assert_eq!(abbreviate_path("/srv/web"), "/srv/web");
        assert_eq!(abbreviate_path("web"), "web");
        assert_eq!(abbreviate_path("/"), "/");
    }

    #[test]
    fn test_expand_tilde_only_expands_prefix() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/~x"), PathBuf::from("rel/~x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/code"), home.join("code"));
        }
    }
}
