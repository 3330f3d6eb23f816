//! # Right Panel - Drive Controls
//!
//! Renders the fixed-side control panel with:
//! - The virtual joystick for continuous steering
//! - A manual direction button grid (forward/left/stop/right/backward)
//! - The motor speed slider, 0..=100 percent
//!
//! Every interaction is translated into a `UICommand` and handed to the
//! dispatcher task over the command channel. Nothing here waits for a
//! response; a full queue simply drops the event.

use crate::rover::Direction;
use crate::ui::joystick::{self, JoystickEvent};
use crate::ui::{AppState, UICommand};
use eframe::egui;

/// Render the right control panel.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let response = egui::SidePanel::right("controls")
        .resizable(true)
        .default_width(state.control_panel_width)
        .show(ctx, |ui| {
            ui.heading("Drive Controls");
            ui.separator();

            ui.vertical_centered(|ui| {
                ui.add_space(10.0);

                // Smaller stick when the panel is squeezed, as on the
                // original dashboard's narrow layout.
                let stick_size = if ui.available_width() < 260.0 { 100.0 } else { 150.0 };
                match joystick::show(ui, stick_size) {
                    Some(JoystickEvent::Move { x, y }) => {
                        let _ = state.ui_command_tx.try_send(UICommand::DriveVector { x, y });
                    }
                    Some(JoystickEvent::Release) => {
                        let _ = state.ui_command_tx.try_send(UICommand::Drive(Direction::Stop));
                    }
                    None => {}
                }

                ui.add_space(20.0);
                render_direction_buttons(ui, state);
                ui.add_space(20.0);
                render_speed_slider(ui, state);
            });
        });

    state.control_panel_width = response.response.rect.width();
}

fn render_direction_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    let button_size = egui::vec2(48.0, 32.0);
    let mut pressed: Option<Direction> = None;

    egui::Grid::new("direction_buttons").spacing([6.0, 6.0]).show(ui, |ui| {
        ui.label("");
        if ui.add_sized(button_size, egui::Button::new("↑")).clicked() {
            pressed = Some(Direction::Forward);
        }
        ui.label("");
        ui.end_row();

        if ui.add_sized(button_size, egui::Button::new("←")).clicked() {
            pressed = Some(Direction::Left);
        }
        if ui.add_sized(button_size, egui::Button::new("■")).clicked() {
            pressed = Some(Direction::Stop);
        }
        if ui.add_sized(button_size, egui::Button::new("→")).clicked() {
            pressed = Some(Direction::Right);
        }
        ui.end_row();

        ui.label("");
        if ui.add_sized(button_size, egui::Button::new("↓")).clicked() {
            pressed = Some(Direction::Backward);
        }
        ui.label("");
        ui.end_row();
    });

    if let Some(direction) = pressed {
        let _ = state.ui_command_tx.try_send(UICommand::Drive(direction));
    }
}

fn render_speed_slider(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label("Motor speed:");
        ui.label(egui::RichText::new(format!("{}%", state.motor_speed)).strong());
    });
    let mut speed = state.motor_speed as f64;
    if ui.add(egui::Slider::new(&mut speed, 0.0..=100.0).suffix("%")).changed() {
        state.motor_speed = speed.round() as u8;
        // Fire-and-forget on every change, like every other command.
        let _ = state.ui_command_tx.try_send(UICommand::SetSpeed(state.motor_speed));
    }
}
