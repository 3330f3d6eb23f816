//! # Virtual Joystick Widget
//!
//! A circular drag widget emulating a thumb joystick. While the knob is
//! dragged, every pointer movement emits a `Move` event carrying the knob
//! position normalized to x in [-1, 1] (right positive) and y in [-1, 1]
//! (up positive). Releasing the knob emits `Release`, which the control panel
//! turns into a stop command.
//!
//! The pointer position can be momentarily unavailable mid-drag (touch lift,
//! pointer capture loss); such frames emit a `Move` with `None` components,
//! which the dispatcher drops silently. That keeps the "no gesture yet"
//! filtering in one place instead of in the widget.

use eframe::egui;

/// One input event from the joystick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoystickEvent {
    /// The knob moved; components are `None` when the pointer position is
    /// unknown this frame.
    Move { x: Option<f64>, y: Option<f64> },
    /// The knob was released and snapped back to center.
    Release,
}

/// Render the joystick and report the event produced this frame, if any.
///
/// Movement is only reported on frames where the pointer actually moved, so
/// holding the knob still does not flood the command channel.
pub fn show(ui: &mut egui::Ui, size: f32) -> Option<JoystickEvent> {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::drag());
    let center = rect.center();
    let radius = size / 2.0;
    let knob_radius = radius * 0.4;

    let knob_pos = if response.dragged() {
        match response.interact_pointer_pos() {
            Some(pos) => center + clamp_to_radius(pos - center, radius),
            None => center,
        }
    } else {
        center
    };

    let painter = ui.painter_at(rect);
    painter.circle_filled(center, radius, ui.visuals().extreme_bg_color);
    painter.circle_stroke(center, radius, ui.visuals().widgets.inactive.fg_stroke);
    let knob_fill = if response.dragged() {
        ui.visuals().widgets.active.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };
    painter.circle_filled(knob_pos, knob_radius, knob_fill);

    if response.dragged() && response.drag_delta() != egui::Vec2::ZERO {
        let (x, y) = match response.interact_pointer_pos() {
            Some(pos) => {
                let (x, y) = normalize(pos - center, radius);
                (Some(x), Some(y))
            }
            None => (None, None),
        };
        Some(JoystickEvent::Move { x, y })
    } else if response.drag_stopped() {
        Some(JoystickEvent::Release)
    } else {
        None
    }
}

fn clamp_to_radius(offset: egui::Vec2, radius: f32) -> egui::Vec2 {
    let length = offset.length();
    if length > radius { offset * (radius / length) } else { offset }
}

/// Normalize a screen-space knob offset into joystick coordinates.
///
/// Screen y grows downward; joystick y grows upward, matching the angle
/// convention the direction classifier expects.
fn normalize(offset: egui::Vec2, radius: f32) -> (f64, f64) {
    let clamped = clamp_to_radius(offset, radius);
    ((clamped.x / radius) as f64, (-clamped.y / radius) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_flips_the_y_axis() {
        let (x, y) = normalize(egui::vec2(0.0, -100.0), 100.0);
        assert_eq!((x, y), (0.0, 1.0));
        let (x, y) = normalize(egui::vec2(0.0, 100.0), 100.0);
        assert_eq!((x, y), (0.0, -1.0));
    }

    #[test]
    fn full_deflection_right_is_unit_x() {
        let (x, y) = normalize(egui::vec2(100.0, 0.0), 100.0);
        assert_eq!((x, y), (1.0, 0.0));
    }

    #[test]
    fn offsets_beyond_the_ring_clamp_to_unit_length() {
        let (x, y) = normalize(egui::vec2(300.0, -400.0), 100.0);
        let length = (x * x + y * y).sqrt();
        assert!((length - 1.0).abs() < 1e-6);
        assert!(x > 0.0 && y > 0.0);
    }
}
