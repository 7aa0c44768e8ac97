//! Color theme and glyphs for Flashdeck TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use flashdeck_types::CardColor;
use flashdeck_types::ui::UiOptions;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet

    // === Card colors ===
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const BLUE: Color = Color::Rgb(126, 156, 216); // crystalBlue
    pub const PURPLE: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const PINK: Color = Color::Rgb(210, 126, 153); // sakuraPink
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    /// Card faces, indexed by [`CardColor`].
    pub cards: [Color; 8],
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            accent: colors::CYAN,
            success: colors::GREEN,
            warning: colors::YELLOW,
            cards: [
                colors::RED,
                colors::ORANGE,
                colors::YELLOW,
                colors::GREEN,
                colors::CYAN,
                colors::BLUE,
                colors::PURPLE,
                colors::PINK,
            ],
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            primary: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            cards: [
                Color::LightRed,
                Color::Yellow,
                Color::LightYellow,
                Color::LightGreen,
                Color::LightCyan,
                Color::LightBlue,
                Color::LightMagenta,
                Color::White,
            ],
        }
    }

    #[must_use]
    pub fn card(&self, color: CardColor) -> Color {
        let slot = CardColor::CYCLE
            .iter()
            .position(|c| *c == color)
            .unwrap_or(0);
        self.cards[slot]
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for indicators and controls.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub playing: &'static str,
    pub paused: &'static str,
    /// Dimmed frame of the playing indicator pulse.
    pub playing_dim: &'static str,
    pub prev: &'static str,
    pub next: &'static str,
    pub selected: &'static str,
    pub toggle_on: &'static str,
    pub toggle_off: &'static str,
    pub slider_fill: &'static str,
    pub slider_empty: &'static str,
    pub separator: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            playing: ">",
            paused: "||",
            playing_dim: "-",
            prev: "<",
            next: ">",
            selected: ">",
            toggle_on: "[x]",
            toggle_off: "[ ]",
            slider_fill: "#",
            slider_empty: "-",
            separator: "|",
        }
    } else {
        Glyphs {
            playing: "▶",
            paused: "⏸",
            playing_dim: "▷",
            prev: "◀",
            next: "▶",
            selected: "▸",
            toggle_on: "●",
            toggle_off: "○",
            slider_fill: "█",
            slider_empty: "░",
            separator: "│",
        }
    }
}

/// Autoplay indicator for the current pulse phase. Static when motion is off.
#[must_use]
pub fn play_indicator(playing: bool, pulse_phase: f32, glyphs: &Glyphs) -> &'static str {
    if !playing {
        glyphs.paused
    } else if pulse_phase < 0.5 {
        glyphs.playing
    } else {
        glyphs.playing_dim
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused_row(palette: &Palette) -> Style {
        Style::default()
            .bg(palette.bg_highlight)
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }
}
