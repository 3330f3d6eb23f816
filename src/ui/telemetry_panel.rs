//! # Top Panel - Sensor Readouts
//!
//! Renders the fixed-height top panel displaying the polled telemetry:
//! - Column 1: Environment readings (temperature, humidity, gas alarm)
//! - Column 2: Infrared proximity table, one row per sensor
//! - Column 3: Link status (last update time, video feed state)
//!
//! The panel only reads the snapshot owned by `AppState`; when polling fails
//! the previous values simply remain on screen, with the last-update clock
//! giving the staleness away.

use crate::ui::AppState;
use chrono::{DateTime, Local};
use eframe::egui;
use egui::Color32;
use egui_extras::{Column, TableBuilder};

/// Render the top telemetry panel.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("telemetry").exact_height(150.0).show(ctx, |ui| {
        ui.columns(3, |cols| {
            cols[0].vertical(|ui| {
                render_environment(ui, state);
            });
            cols[1].vertical(|ui| {
                render_infrared(ui, state);
            });
            cols[2].vertical(|ui| {
                render_link_status(ui, state);
            });
        });
    });
}

fn render_environment(ui: &mut egui::Ui, state: &AppState) {
    let (temperature, humidity, gas_detected) = match &state.snapshot {
        Some(s) => (s.temperature, s.humidity, Some(s.gas_detected)),
        None => (None, None, None),
    };

    ui.heading("Environment");
    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Temperature:");
        ui.label(egui::RichText::new(format_temperature(temperature)).strong());
    });
    ui.horizontal(|ui| {
        ui.label("Humidity:");
        ui.label(egui::RichText::new(format_humidity(humidity)).strong());
    });
    ui.horizontal(|ui| {
        ui.label("Gas:");
        match gas_detected {
            Some(true) => ui.label(egui::RichText::new(format_gas(true)).strong().color(Color32::RED)),
            Some(false) => ui.label(egui::RichText::new(format_gas(false)).strong().color(Color32::GREEN)),
            None => ui.label(egui::RichText::new("-").strong()),
        };
    });
}

fn render_infrared(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Infrared");
    ui.separator();

    let Some(snapshot) = &state.snapshot else {
        ui.label("Waiting for telemetry...");
        return;
    };

    let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
    let readings: Vec<(&String, &f64)> = snapshot.infrared.iter().collect();

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(80.0).at_least(50.0)) // Sensor
        .column(Column::remainder()) // Reading
        .header(row_height, |mut header| {
            header.col(|ui| {
                ui.strong("Sensor");
            });
            header.col(|ui| {
                ui.strong("Reading");
            });
        })
        .body(|body| {
            body.rows(row_height, readings.len(), |mut row| {
                let (id, reading) = readings[row.index()];
                row.col(|ui| {
                    ui.label(id.as_str());
                });
                row.col(|ui| {
                    ui.label(egui::RichText::new(format!("{}", reading)).monospace());
                });
            });
        });
}

fn render_link_status(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Link");
    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Last update:");
        ui.label(egui::RichText::new(format_last_update(state.last_telemetry_at)).monospace().strong());
    });
    ui.horizontal(|ui| {
        ui.label("Video feed:");
        if state.feed_available {
            ui.label(egui::RichText::new("Live").strong().color(Color32::GREEN));
        } else {
            ui.label(egui::RichText::new("Unavailable").strong().color(Color32::RED));
        }
    });
}

fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{}°C", t),
        None => "-".into(),
    }
}

fn format_humidity(value: Option<f64>) -> String {
    match value {
        Some(h) => format!("{}%", h),
        None => "-".into(),
    }
}

fn format_gas(detected: bool) -> &'static str {
    if detected { "Detected" } else { "Clear" }
}

fn format_last_update(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => "--:--:--".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_and_humidity_render_with_units() {
        assert_eq!(format_temperature(Some(22.0)), "22°C");
        assert_eq!(format_humidity(Some(40.0)), "40%");
    }

    #[test]
    fn missing_readings_render_a_dash() {
        assert_eq!(format_temperature(None), "-");
        assert_eq!(format_humidity(None), "-");
    }

    #[test]
    fn gas_flag_renders_as_words() {
        assert_eq!(format_gas(true), "Detected");
        assert_eq!(format_gas(false), "Clear");
    }

    #[test]
    fn no_update_yet_renders_placeholder_clock() {
        assert_eq!(format_last_update(None), "--:--:--");
    }
}
