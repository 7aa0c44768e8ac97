//! UI option types for the TUI layer.
//!
//! Pure data with no IO and no ratatui dependency.

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs and hide the emoji.
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// System-level reduced motion preference. Read once at startup.
    pub reduced_motion: bool,
}
