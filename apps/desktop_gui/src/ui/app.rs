//! Application shell: owns the coordinator and the channels to the backend
//! worker, drains events once per frame, and routes the current screen to
//! its panel.

use std::{path::PathBuf, time::Duration};

use client_core::ClientSettings;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_all,
    reducer::{Screen, View, ViewCoordinator},
};
use crate::ui::{
    model_viewer::ModelViewer,
    panels,
    theme::{self, ThemePreset, ThemeSettings},
    widgets::FilterBarState,
};

/// Events drained per frame; the rest wait for the next repaint.
const MAX_EVENTS_PER_FRAME: usize = 256;

pub struct InventHubApp {
    coordinator: ViewCoordinator,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_base: String,
    viewer: ModelViewer,
    filter_bar: FilterBarState,
    theme: ThemeSettings,
    applied_theme: Option<ThemeSettings>,
    started: bool,
}

impl InventHubApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
    ) -> Self {
        // An unusable URL is reported by the worker at startup.
        let api_base = settings
            .api_base()
            .unwrap_or_else(|_| settings.backend_url.clone());
        Self {
            coordinator: ViewCoordinator::new(settings.display_name.clone()),
            cmd_tx,
            ui_rx,
            api_base,
            viewer: ModelViewer::default(),
            filter_bar: FilterBarState::default(),
            theme: ThemeSettings::default(),
            applied_theme: None,
            started: false,
        }
    }

    fn dispatch(&mut self, cmds: Vec<BackendCommand>) {
        dispatch_all(&self.cmd_tx, cmds, &mut self.coordinator.status);
    }

    fn process_ui_events(&mut self) {
        for event in self.ui_rx.try_iter().take(MAX_EVENTS_PER_FRAME).collect::<Vec<_>>() {
            match &event {
                UiEvent::ModelLoaded { key, mesh } => self.viewer.accept(key, mesh.clone()),
                UiEvent::ModelTooLarge { key, limit } => self.viewer.too_large(key, *limit),
                UiEvent::ModelFailed { key, error } => self.viewer.fail(key, error.message()),
                _ => {}
            }
            let follow_up = self.coordinator.apply(event);
            self.dispatch(follow_up);
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme != Some(self.theme) {
            ctx.set_visuals(theme::visuals_for_theme(self.theme));
            self.applied_theme = Some(self.theme);
        }
    }

    /// Keeps the viewer mounted on exactly the selected invention's model.
    fn sync_viewer(&mut self) {
        let wanted = self.coordinator.model_key();
        if wanted.as_ref() == self.viewer.key() {
            return;
        }
        match wanted {
            Some(key) => {
                if self.viewer.mount(key.clone()) {
                    self.dispatch(vec![BackendCommand::LoadModel(key)]);
                }
            }
            None => self.viewer.unmount(),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }
        if self.coordinator.detail().is_none() {
            self.coordinator.status = "Open an invention to attach a model".to_string();
            return;
        }
        let cmds = self.coordinator.upload_model(&dropped);
        self.dispatch(cmds);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let mut cmds = Vec::new();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("InventHub").strong().size(18.0));
                ui.separator();
                let current = match self.coordinator.screen() {
                    Screen::Named(view) => Some(view),
                    Screen::InventionDetail(_) => None,
                };
                for view in View::NAV {
                    if ui
                        .selectable_label(current == Some(*view), view.label())
                        .clicked()
                    {
                        cmds.extend(self.coordinator.navigate(*view));
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("theme_preset")
                        .selected_text(self.theme.preset.label())
                        .show_ui(ui, |ui| {
                            for preset in ThemePreset::ALL {
                                ui.selectable_value(&mut self.theme.preset, preset, preset.label());
                            }
                        });
                    ui.weak(self.coordinator.display_name());
                });
            });
        });
        self.dispatch(cmds);
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(&self.coordinator.status);
                if ctx.input(|input| !input.raw.hovered_files.is_empty()) {
                    ui.separator();
                    ui.label("Drop a model file to upload it");
                }
            });
        });
    }

    fn show_screen(&mut self, ctx: &egui::Context) {
        let mut cmds = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let coordinator = &mut self.coordinator;
                    cmds = match coordinator.screen() {
                        Screen::InventionDetail(_) => panels::invention_detail(
                            ui,
                            coordinator,
                            &mut self.viewer,
                            &self.api_base,
                        ),
                        Screen::Named(View::Home) => panels::home(ui, coordinator),
                        Screen::Named(View::Browse) => {
                            panels::browse(ui, coordinator, &mut self.filter_bar)
                        }
                        Screen::Named(View::CreateInvention) => {
                            panels::create_invention(ui, coordinator)
                        }
                        Screen::Named(View::Groups) => panels::groups(ui, coordinator),
                        Screen::Named(View::CreateGroup) => panels::create_group(ui, coordinator),
                        Screen::Named(View::Suggestions) => panels::suggestions(ui, coordinator),
                        Screen::Named(View::CreateSuggestion) => {
                            panels::create_suggestion(ui, coordinator)
                        }
                        Screen::Named(View::Mentors) => panels::mentors(ui, coordinator),
                        Screen::Named(View::Community) => panels::community(ui, coordinator),
                        Screen::Named(View::JoinCommunity) => {
                            panels::join_community(ui, coordinator)
                        }
                    };
                });
        });
        self.dispatch(cmds);
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.coordinator.alert().cloned() else {
            return;
        };
        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("inventhub_alert")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading(&alert.title);
            ui.label(&alert.message);
            ui.add_space(8.0);
            dismissed = ui.button("OK").clicked();
        });
        if dismissed || modal.should_close() {
            self.coordinator.dismiss_alert();
        }
    }
}

impl eframe::App for InventHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        if !self.started {
            self.started = true;
            let cmds = self.coordinator.initial_load();
            self.dispatch(cmds);
        }

        self.handle_dropped_files(ctx);
        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_screen(ctx);
        self.sync_viewer();
        self.show_alert(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
