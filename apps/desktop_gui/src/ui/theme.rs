//! Visual presets for the app shell.

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreset {
    #[default]
    Workshop,
    Midnight,
    Daylight,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [
        ThemePreset::Workshop,
        ThemePreset::Midnight,
        ThemePreset::Daylight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::Workshop => "Workshop",
            ThemePreset::Midnight => "Midnight",
            ThemePreset::Daylight => "Daylight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSettings {
    pub preset: ThemePreset,
    pub accent_color: egui::Color32,
    pub panel_rounding: u8,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            preset: ThemePreset::Workshop,
            accent_color: egui::Color32::from_rgb(242, 140, 40),
            panel_rounding: 8,
        }
    }
}

/// Tag-like pill colors.
pub const BADGE_PUBLIC: egui::Color32 = egui::Color32::from_rgb(46, 160, 90);
pub const BADGE_PRIVATE: egui::Color32 = egui::Color32::from_rgb(120, 120, 130);
pub const BADGE_SEEKING: egui::Color32 = egui::Color32::from_rgb(70, 120, 220);
pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);
pub const STAR_FILLED: egui::Color32 = egui::Color32::from_rgb(250, 196, 45);

pub fn visuals_for_theme(theme: ThemeSettings) -> egui::Visuals {
    let mut visuals = match theme.preset {
        ThemePreset::Workshop => {
            let mut v = egui::Visuals::dark();
            v.override_text_color = Some(egui::Color32::from_rgb(236, 232, 225));
            v.window_fill = egui::Color32::from_rgb(38, 36, 34);
            v.panel_fill = egui::Color32::from_rgb(31, 30, 28);
            v.extreme_bg_color = egui::Color32::from_rgb(22, 21, 20);
            v.faint_bg_color = egui::Color32::from_rgb(46, 44, 41);
            v
        }
        ThemePreset::Midnight => {
            let mut v = egui::Visuals::dark();
            v.override_text_color = Some(egui::Color32::from_rgb(200, 208, 224));
            v.window_fill = egui::Color32::from_rgb(24, 28, 40);
            v.panel_fill = egui::Color32::from_rgb(18, 21, 31);
            v.extreme_bg_color = egui::Color32::from_rgb(12, 14, 22);
            v.faint_bg_color = egui::Color32::from_rgb(32, 37, 52);
            v
        }
        ThemePreset::Daylight => egui::Visuals::light(),
    };

    visuals.hyperlink_color = theme.accent_color;
    visuals.selection.bg_fill = theme.accent_color;
    visuals.widgets.active.bg_fill = theme.accent_color;
    visuals.widgets.hovered.bg_fill = theme.accent_color.gamma_multiply(0.85);

    let radius = egui::CornerRadius::same(theme.panel_rounding);
    visuals.widgets.noninteractive.corner_radius = radius;
    visuals.widgets.inactive.corner_radius = radius;
    visuals.widgets.hovered.corner_radius = radius;
    visuals.widgets.active.corner_radius = radius;
    visuals.widgets.open.corner_radius = radius;

    visuals
}

/// Rounded label used for invention badges.
pub fn pill(ui: &mut egui::Ui, text: &str, fill: egui::Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .small()
                    .strong()
                    .color(egui::Color32::WHITE),
            );
        });
}
