//! Runtime configuration
//!
//! Defaults tuned for the register as it exists today (document
//! hierarchies rarely exceed ~6 levels). Environment variables override
//! individual fields; the demo binary loads `.env` via dotenvy first.

use serde::{Deserialize, Serialize};

/// Configuration for the browse presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Deepest level rendered before subtrees are elided
    pub max_render_depth: usize,
    /// Whether rendered nodes include their normalized approver chain
    pub show_approvers: bool,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            max_render_depth: 8,
            show_approvers: true,
        }
    }
}

impl BrowseConfig {
    /// Defaults overridden by `DOA_MAX_RENDER_DEPTH` and
    /// `DOA_SHOW_APPROVERS` when set and parseable; unparseable values
    /// are ignored in favor of the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("DOA_MAX_RENDER_DEPTH") {
            if let Ok(depth) = raw.trim().parse() {
                config.max_render_depth = depth;
            }
        }
        if let Ok(raw) = std::env::var("DOA_SHOW_APPROVERS") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => config.show_approvers = true,
                "0" | "false" | "no" => config.show_approvers = false,
                _ => {}
            }
        }
        config
    }
}
