//! Card motion effects: slide in, slide out, and the emoji bob.

use ratatui::layout::Rect;

use flashdeck_engine::Motion;

/// Horizontal offset of the card for `motion`, in columns. Entering cards
/// slide in from the right; exiting cards slide off to the left.
#[must_use]
pub fn slide_offset(motion: Motion, distance: u16) -> i32 {
    let distance = f32::from(distance);
    match motion {
        Motion::Resting => 0,
        Motion::Entering(progress) => ((1.0 - ease_out_cubic(progress)) * distance).round() as i32,
        Motion::Exiting(progress) => -(ease_in_cubic(progress) * distance).round() as i32,
    }
}

/// Scale of the card face for `motion`. Exiting cards shrink slightly.
#[must_use]
pub fn card_scale(motion: Motion) -> f32 {
    match motion {
        Motion::Exiting(progress) => 1.0 - 0.2 * ease_in_cubic(progress),
        Motion::Entering(_) | Motion::Resting => 1.0,
    }
}

/// Rows the emoji is lifted at `phase` of its bob cycle.
#[must_use]
pub fn float_lift(phase: f32) -> u16 {
    u16::from((phase * std::f32::consts::TAU).sin() > 0.0)
}

/// Shift `base` by `dx` columns and clip it to `viewport`. The result may have
/// zero width when the card is fully off screen.
#[must_use]
pub fn shift_rect(base: Rect, dx: i32, viewport: Rect) -> Rect {
    let left = i32::from(base.x) + dx;
    let right = left + i32::from(base.width);
    let view_left = i32::from(viewport.x);
    let view_right = view_left + i32::from(viewport.width);

    let clipped_left = left.clamp(view_left, view_right);
    let clipped_right = right.clamp(view_left, view_right);
    Rect {
        x: clipped_left as u16,
        y: base.y,
        width: (clipped_right - clipped_left) as u16,
        height: base.height,
    }
}

#[must_use]
pub fn scale_rect(base: Rect, scale: f32) -> Rect {
    let width = (f32::from(base.width) * scale).round() as u16;
    let height = (f32::from(base.height) * scale).round() as u16;
    let width = width.max(1).min(base.width);
    let height = height.max(1).min(base.height);
    let x = base.x + (base.width.saturating_sub(width) / 2);
    let y = base.y + (base.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}
