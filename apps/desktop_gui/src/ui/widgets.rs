//! Leaf widgets. Each one turns a single user action into coordinator calls
//! and hands the resulting commands back to the caller for dispatch.

use std::path::PathBuf;

use client_core::{upload::ALLOWED_MODEL_EXTENSIONS, InventionFilters};
use eframe::egui;
use shared::{
    domain::{Category, SortKey, VoteKind},
    protocol::Invention,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::ViewCoordinator;
use crate::ui::theme;

pub fn tri_state_label(value: Option<bool>) -> &'static str {
    match value {
        None => "Any",
        Some(true) => "Yes",
        Some(false) => "No",
    }
}

/// Stars lit for an average rating, rounded to the nearest whole star.
pub fn filled_stars(average_rating: f64) -> usize {
    average_rating.round().clamp(0.0, 5.0) as usize
}

pub fn option_combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    value: &mut Option<T>,
    choices: &[T],
    choice_label: fn(T) -> &'static str,
) -> bool {
    let before = *value;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.map(choice_label).unwrap_or("Any"))
        .show_ui(ui, |ui| {
            ui.selectable_value(value, None, "Any");
            for choice in choices {
                ui.selectable_value(value, Some(*choice), choice_label(*choice));
            }
        });
    *value != before
}

pub fn tri_state_combo(ui: &mut egui::Ui, id: &str, label: &str, value: &mut Option<bool>) -> bool {
    let before = *value;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(tri_state_label(*value))
        .show_ui(ui, |ui| {
            for choice in [None, Some(true), Some(false)] {
                ui.selectable_value(value, choice, tri_state_label(choice));
            }
        });
    *value != before
}

/// Tag text is held here until the field loses focus, so typing does not
/// reload the list on every keystroke.
#[derive(Debug, Default)]
pub struct FilterBarState {
    pub tag_input: String,
}

pub fn search_filter_bar(
    ui: &mut egui::Ui,
    coordinator: &mut ViewCoordinator,
    state: &mut FilterBarState,
) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();

    ui.horizontal(|ui| {
        let search = ui.add(
            egui::TextEdit::singleline(&mut coordinator.search_query)
                .hint_text("Search inventions")
                .desired_width(280.0),
        );
        let submitted = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Search").clicked() || submitted {
            cmds.extend(coordinator.submit_search());
        }
    });

    let mut public_only = coordinator.public_only();
    let mut filters: InventionFilters = coordinator.filters().clone();
    let mut changed = false;
    ui.horizontal_wrapped(|ui| {
        ui.checkbox(&mut public_only, "Public only")
            .on_hover_text("Only inventions their creators marked public");
        ui.separator();
        changed |= option_combo(
            ui,
            "filter_category",
            "Category",
            &mut filters.category,
            Category::ALL,
            Category::label,
        );

        ui.label("Tag");
        let tag = ui.add(egui::TextEdit::singleline(&mut state.tag_input).desired_width(120.0));
        if tag.lost_focus() && state.tag_input.trim() != filters.tag.trim() {
            filters.tag = state.tag_input.trim().to_string();
            changed = true;
        }

        changed |= tri_state_combo(
            ui,
            "filter_mentorship",
            "Seeking mentorship",
            &mut filters.seeking_mentorship,
        );
        changed |= tri_state_combo(
            ui,
            "filter_collaboration",
            "Seeking collaboration",
            &mut filters.seeking_collaboration,
        );
        changed |= option_combo(
            ui,
            "filter_sort",
            "Sort",
            &mut filters.sort_by,
            SortKey::ALL,
            SortKey::label,
        );
    });

    if changed {
        cmds.extend(coordinator.apply_filters(filters));
    } else {
        cmds.extend(coordinator.set_public_only(public_only));
    }
    cmds
}

pub fn star_rating(
    ui: &mut egui::Ui,
    coordinator: &ViewCoordinator,
    invention: &Invention,
) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    let lit = filled_stars(invention.average_rating);
    ui.horizontal(|ui| {
        for star in 1..=5u8 {
            let color = if usize::from(star) <= lit {
                theme::STAR_FILLED
            } else {
                ui.visuals().weak_text_color()
            };
            let button = egui::Button::new(egui::RichText::new("★").size(20.0).color(color)).frame(false);
            if ui
                .add(button)
                .on_hover_text(format!("Rate {star} of 5"))
                .clicked()
            {
                cmds.extend(coordinator.rate(&invention.id, star));
            }
        }
        ui.weak(format!(
            "{:.1} ({} ratings)",
            invention.average_rating, invention.rating_count
        ));
    });
    cmds
}

pub fn vote_buttons(
    ui: &mut egui::Ui,
    coordinator: &ViewCoordinator,
    invention: &Invention,
) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.horizontal(|ui| {
        if ui.button(format!("▲ {}", invention.upvotes)).clicked() {
            cmds.extend(coordinator.vote(&invention.id, VoteKind::Up));
        }
        if ui.button(format!("▼ {}", invention.downvotes)).clicked() {
            cmds.extend(coordinator.vote(&invention.id, VoteKind::Down));
        }
        ui.label(format!("net {}", invention.net_votes()));
    });
    cmds
}

pub fn comment_section(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut post = false;
    if let Some(detail) = coordinator.detail_mut() {
        ui.heading(format!("Comments ({})", detail.comments.len()));
        if detail.comments.is_empty() {
            ui.weak("No comments yet.");
        }
        for comment in &detail.comments {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(&comment.author_name).strong());
                if let Some(created_at) = comment.created_at {
                    ui.weak(
                        created_at
                            .with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string(),
                    );
                }
            });
            ui.label(&comment.content);
            ui.add_space(4.0);
        }

        ui.add(
            egui::TextEdit::multiline(&mut detail.comment_draft)
                .hint_text("Share feedback")
                .desired_rows(2),
        );
        let can_post = !detail.comment_loading && !detail.comment_draft.trim().is_empty();
        ui.horizontal(|ui| {
            post = ui.add_enabled(can_post, egui::Button::new("Post comment")).clicked();
            if detail.comment_loading {
                ui.spinner();
            }
        });
    }
    if post {
        coordinator.post_comment()
    } else {
        Vec::new()
    }
}

pub fn peer_review_form(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut submit = false;
    if let Some(detail) = coordinator.detail_mut() {
        ui.heading("Peer review");
        let review = &mut detail.review;
        egui::Grid::new("peer_review_scores")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Innovation");
                ui.add(egui::Slider::new(&mut review.innovation_score, 1..=10));
                ui.end_row();
                ui.label("Feasibility");
                ui.add(egui::Slider::new(&mut review.feasibility_score, 1..=10));
                ui.end_row();
                ui.label("Impact");
                ui.add(egui::Slider::new(&mut review.impact_score, 1..=10));
                ui.end_row();
            });
        ui.label("Strengths");
        ui.add(egui::TextEdit::multiline(&mut review.strengths).desired_rows(2));
        ui.label("Improvements");
        ui.add(egui::TextEdit::multiline(&mut review.improvements).desired_rows(2));
        ui.label("Comments");
        ui.add(egui::TextEdit::multiline(&mut review.comments).desired_rows(2));

        let label = if detail.saved_review_id.is_some() {
            "Update review"
        } else {
            "Submit review"
        };
        ui.horizontal(|ui| {
            submit = ui
                .add_enabled(!detail.review_loading, egui::Button::new(label))
                .clicked();
            if detail.review_loading {
                ui.spinner();
            }
        });
    }
    if submit {
        coordinator.submit_peer_review()
    } else {
        Vec::new()
    }
}

fn pick_model_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose a 3D model")
        .add_filter("3D models", ALLOWED_MODEL_EXTENSIONS)
        .pick_file()
}

pub fn model_uploader(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let uploading = coordinator
        .detail()
        .is_some_and(|detail| detail.upload_loading);
    let mut picked = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!uploading, egui::Button::new("Upload 3D model..."))
            .clicked()
        {
            picked = pick_model_file();
        }
        if uploading {
            ui.spinner();
            ui.label("Uploading");
        } else {
            ui.weak("or drop one .glb, .gltf, .obj, .fbx or .stl file onto the window (max 10GB)");
        }
    });
    match picked {
        Some(path) => coordinator.upload_model(&[path]),
        None => Vec::new(),
    }
}
