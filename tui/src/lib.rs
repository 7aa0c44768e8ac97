//! TUI rendering for Flashdeck using ratatui.

#[cfg(feature = "audio")]
mod audio;
mod effects;
mod input;
mod theme;

#[cfg(feature = "audio")]
pub use audio::RodioTones;
pub use effects::{card_scale, float_lift, scale_rect, shift_rect, slide_offset};
pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, play_indicator, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use flashdeck_engine::{App, CardColor, Control, ControlState, SettingKey, SettingValue};

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 11;
const DRAWER_WIDTH: u16 = 56;
const LABEL_WIDTH: usize = 20;
const SLIDER_WIDTH: usize = 12;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Card
            Constraint::Length(3), // Compact panel
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title(frame, app, chunks[0], &palette);
    draw_card(frame, app, chunks[1], &palette);
    draw_compact_panel(frame, app, chunks[2], &palette, &glyphs);
    draw_status_bar(frame, app, chunks[3], &palette, &glyphs);

    if app.settings_open() {
        draw_settings_drawer(frame, app, &palette, &glyphs);
    }
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mode = app.settings().mode;
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " Flashdeck",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", mode.display_name()),
            Style::default().fg(palette.text_muted),
        ),
    ]));
    frame.render_widget(title, area);
}

fn draw_card(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let stage = app.stage();
    let Some(shown) = stage.frame() else {
        return;
    };

    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    let base = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    // Far enough to clear the viewport edge from the centered position.
    let travel = (area.width + width) / 2;
    let shifted = shift_rect(base, slide_offset(shown.motion, travel), area);
    if shifted.width == 0 {
        return;
    }
    let card_area = scale_rect(shifted, card_scale(shown.motion));

    let color = palette.card(CardColor::for_index(shown.index));
    let card = shown.card;
    let lift = float_lift(stage.float_phase());

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    if lift == 0 {
        lines.push(Line::from(""));
    }
    if !app.ui_options().ascii_only {
        lines.push(Line::from(card.emoji()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("{}  {}", card.letter(), card.letter().to_ascii_lowercase()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        card.label(),
        Style::default().fg(palette.text_primary),
    )));

    frame.render_widget(Clear, card_area);
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(palette.bg_panel)),
    );
    frame.render_widget(widget, card_area);
}

fn control_value_text(state: &ControlState, glyphs: &Glyphs) -> String {
    match (state.control, state.value) {
        (Control::Slider { .. }, _) => state.readout.clone().unwrap_or_default(),
        (Control::Toggle, SettingValue::Bool(true)) => format!("{} on", glyphs.toggle_on),
        (Control::Toggle, _) => format!("{} off", glyphs.toggle_off),
        (Control::Select { .. }, SettingValue::Mode(mode)) => mode.display_name().to_string(),
        (Control::Select { .. }, value) => value.to_string(),
    }
}

fn compact_hint(key: SettingKey) -> &'static str {
    match key {
        SettingKey::CardDuration => "-/+",
        SettingKey::Mode => "m",
        SettingKey::SoundEnabled => "t",
        _ => "",
    }
}

fn draw_compact_panel(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut spans = vec![Span::raw(" ")];
    for (i, state) in app.compact().controls().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!("  {}  ", glyphs.separator),
                Style::default().fg(palette.bg_border),
            ));
        }
        spans.push(Span::styled(
            format!("{}: ", state.key.label()),
            Style::default().fg(palette.text_secondary),
        ));
        spans.push(Span::styled(
            control_value_text(state, glyphs),
            Style::default().fg(palette.text_primary),
        ));
        let hint = compact_hint(state.key);
        if !hint.is_empty() {
            spans.push(Span::styled(format!(" ({hint})"), styles::key_hint(palette)));
        }
    }

    let panel = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.bg_border))
            .style(Style::default().bg(palette.bg_dark)),
    );
    frame.render_widget(panel, area);
}

pub(crate) fn draw_status_bar(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let deck = app.deck();
    let playing = deck.is_playing();
    let indicator = play_indicator(playing, app.stage().pulse_phase(), glyphs);
    let (state_text, state_style) = if playing {
        (
            format!("{indicator} Playing"),
            Style::default().fg(palette.success),
        )
    } else {
        (
            format!("{indicator} Paused"),
            Style::default().fg(palette.text_secondary),
        )
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(state_text, state_style),
        Span::styled(
            format!(" {} ", glyphs.separator),
            Style::default().fg(palette.bg_border),
        ),
        Span::styled(
            format!("{} / {}", deck.index() + 1, deck.len()),
            Style::default().fg(palette.text_primary),
        ),
        Span::styled(
            format!(" {} ", glyphs.separator),
            Style::default().fg(palette.bg_border),
        ),
    ];
    for (key, action) in [
        ("Space", "play"),
        ("←/→", "move"),
        ("s", "settings"),
        ("q", "quit"),
    ] {
        let key = if app.ui_options().ascii_only && key == "←/→" {
            "h/l"
        } else {
            key
        };
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn pad_label(label: &str) -> String {
    let pad = LABEL_WIDTH.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(pad))
}

fn slider_bar(value: f64, min: f64, max: f64, glyphs: &Glyphs) -> String {
    let fraction = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * SLIDER_WIDTH as f64).round() as usize;
    format!(
        "{}{}",
        glyphs.slider_fill.repeat(filled),
        glyphs.slider_empty.repeat(SLIDER_WIDTH - filled)
    )
}

fn drawer_value_text(state: &ControlState, glyphs: &Glyphs) -> String {
    match (state.control, state.value) {
        (Control::Slider { min, max, .. }, SettingValue::Number(n)) => format!(
            "{} {}",
            slider_bar(n, min, max, glyphs),
            state.readout.as_deref().unwrap_or_default()
        ),
        (Control::Select { .. }, SettingValue::Mode(mode)) => {
            format!("{} {} {}", glyphs.prev, mode.display_name(), glyphs.next)
        }
        _ => control_value_text(state, glyphs),
    }
}

fn draw_settings_drawer(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let drawer = app.drawer();
    let controls = drawer.controls();
    let focused = drawer.focused_key();

    let width = DRAWER_WIDTH.min(area.width.saturating_sub(2));
    let height = (controls.len() as u16 + 5).min(area.height);
    let drawer_area = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    // Clear background
    frame.render_widget(Clear, drawer_area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for state in &controls {
        let is_focused = focused == Some(state.key);
        let marker = if is_focused { glyphs.selected } else { " " };
        let row_style = if is_focused {
            styles::focused_row(palette)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), Style::default().fg(palette.accent)),
            Span::styled(pad_label(state.key.label()), row_style),
            Span::styled(
                drawer_value_text(state, glyphs),
                Style::default().fg(palette.text_primary),
            ),
        ]));
    }
    lines.push(Line::from(""));
    let hint = if app.ui_options().ascii_only {
        "  j/k move  h/l adjust  Enter toggle  R reset  Esc close"
    } else {
        "  ↑/↓ move  ←/→ adjust  Enter toggle  R reset  Esc close"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::ITALIC),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.primary))
            .style(Style::default().bg(palette.bg_panel))
            .title(Line::from(vec![Span::styled(
                " Settings ",
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )])),
    );
    frame.render_widget(widget, drawer_area);
}
