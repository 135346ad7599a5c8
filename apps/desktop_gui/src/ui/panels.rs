//! One function per screen. Panels read coordinator state, edit form drafts
//! in place, and return the backend commands their buttons produced.

use eframe::egui;
use shared::{
    domain::{Category, CostRange, DevelopmentStage, Difficulty},
    protocol::{Invention, User},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::CreateForm;
use crate::controller::reducer::{View, ViewCoordinator};
use crate::ui::model_viewer::{ModelViewer, ViewerAction};
use crate::ui::{theme, widgets};

const CARD_WIDTH: f32 = 270.0;
const EXCERPT_CHARS: usize = 140;

pub fn visibility_badge(invention: &Invention) -> (&'static str, egui::Color32) {
    if invention.is_public {
        ("Public", theme::BADGE_PUBLIC)
    } else {
        ("Private", theme::BADGE_PRIVATE)
    }
}

/// First `max_chars` characters, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", trimmed[..cut].trim_end()),
        None => trimmed.to_string(),
    }
}

fn form_error(ui: &mut egui::Ui, error: &Option<String>) {
    if let Some(error) = error {
        ui.colored_label(theme::ERROR_TEXT, error);
    }
}

fn submit_row(ui: &mut egui::Ui, label: &str, loading: bool) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        clicked = ui
            .add_enabled(!loading, egui::Button::new(label))
            .clicked();
        if loading {
            ui.spinner();
        }
    });
    clicked
}

fn labeled_line(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.text_edit_singleline(value);
    ui.end_row();
}

fn invention_badges(ui: &mut egui::Ui, invention: &Invention) {
    ui.horizontal_wrapped(|ui| {
        let (text, fill) = visibility_badge(invention);
        theme::pill(ui, text, fill);
        if let Some(category) = invention.category {
            theme::pill(ui, category.label(), theme::BADGE_PRIVATE);
        }
        if invention.seeking_mentorship {
            theme::pill(ui, "Seeking mentorship", theme::BADGE_SEEKING);
        }
        if invention.seeking_collaboration {
            theme::pill(ui, "Seeking collaborators", theme::BADGE_SEEKING);
        }
    });
}

fn invention_card(ui: &mut egui::Ui, invention: &Invention) -> bool {
    let mut open = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.label(egui::RichText::new(&invention.title).strong().size(16.0));
        ui.weak(format!("by {}", invention.creator_name));
        invention_badges(ui, invention);
        ui.label(excerpt(&invention.description, EXCERPT_CHARS));
        ui.horizontal(|ui| {
            ui.label(format!("▲ {}", invention.net_votes()));
            ui.label(format!("★ {:.1}", invention.average_rating));
            ui.label(format!("{} views", invention.views));
            if invention.has_model() {
                ui.label("3D");
            }
        });
        open = ui.button("View details").clicked();
    });
    open
}

fn invention_grid(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator, list: &[Invention]) -> Vec<BackendCommand> {
    let mut selected = None;
    ui.horizontal_wrapped(|ui| {
        for invention in list {
            if invention_card(ui, invention) {
                selected = Some(invention.id.clone());
            }
        }
    });
    match selected {
        Some(id) => coordinator.select_invention(id),
        None => Vec::new(),
    }
}

pub fn home(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.heading("InventHub");
    ui.label(format!(
        "Welcome, {}. Share inventions, find collaborators and mentors, and review each other's work.",
        coordinator.display_name()
    ));
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(format!("{} inventions", coordinator.inventions.len()));
        ui.separator();
        ui.label(format!("{} groups", coordinator.groups.len()));
        ui.separator();
        ui.label(format!("{} mentors", coordinator.mentors.len()));
        ui.separator();
        ui.label(format!("{} suggestions", coordinator.suggestions.len()));
    });
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Share an invention").clicked() {
            cmds.extend(coordinator.navigate(View::CreateInvention));
        }
        if ui.button("Browse").clicked() {
            cmds.extend(coordinator.navigate(View::Browse));
        }
        if ui.button("Find a mentor").clicked() {
            cmds.extend(coordinator.navigate(View::Mentors));
        }
    });

    ui.add_space(12.0);
    ui.heading("Latest");
    let latest: Vec<Invention> = coordinator.inventions.iter().take(6).cloned().collect();
    if latest.is_empty() {
        ui.weak("Nothing shared yet.");
    }
    cmds.extend(invention_grid(ui, coordinator, &latest));
    cmds
}

pub fn browse(
    ui: &mut egui::Ui,
    coordinator: &mut ViewCoordinator,
    filter_bar: &mut widgets::FilterBarState,
) -> Vec<BackendCommand> {
    let mut cmds = widgets::search_filter_bar(ui, coordinator, filter_bar);
    ui.separator();
    let list = coordinator.filtered_inventions.clone();
    if list.is_empty() {
        ui.weak("No inventions match.");
    }
    cmds.extend(invention_grid(ui, coordinator, &list));
    cmds
}

pub fn invention_detail(
    ui: &mut egui::Ui,
    coordinator: &mut ViewCoordinator,
    viewer: &mut ModelViewer,
    api_base: &str,
) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    if ui.button("← Back").clicked() {
        coordinator.close_detail();
        return cmds;
    }

    let Some(invention) = coordinator.detail().and_then(|detail| detail.invention.clone()) else {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading invention...");
        });
        return cmds;
    };

    ui.heading(&invention.title);
    ui.weak(format!("by {}", invention.creator_name));
    invention_badges(ui, &invention);
    ui.add_space(6.0);
    ui.label(&invention.description);

    egui::Grid::new("invention_facts").num_columns(2).show(ui, |ui| {
        if let Some(difficulty) = invention.difficulty {
            ui.weak("Difficulty");
            ui.label(difficulty.label());
            ui.end_row();
        }
        if let Some(cost) = invention.cost_range {
            ui.weak("Cost");
            ui.label(cost.label());
            ui.end_row();
        }
        if let Some(stage) = invention.development_stage {
            ui.weak("Stage");
            ui.label(stage.label());
            ui.end_row();
        }
        if !invention.tags.is_empty() {
            ui.weak("Tags");
            ui.label(invention.tags.join(", "));
            ui.end_row();
        }
        ui.weak("Views");
        ui.label(invention.views.to_string());
        ui.end_row();
    });

    ui.separator();
    cmds.extend(widgets::vote_buttons(ui, coordinator, &invention));
    cmds.extend(widgets::star_rating(ui, coordinator, &invention));

    ui.separator();
    ui.heading("3D model");
    if let Some(name) = invention.model_file_name.as_deref().filter(|_| invention.has_model()) {
        ui.weak(name);
    }
    if invention.has_model() {
        if viewer.show(ui) == Some(ViewerAction::OpenExternally) {
            open_model_externally(ui, coordinator, api_base, &invention);
        }
    } else {
        ui.weak("No model uploaded yet.");
    }
    cmds.extend(widgets::model_uploader(ui, coordinator));

    ui.separator();
    cmds.extend(widgets::comment_section(ui, coordinator));
    ui.separator();
    cmds.extend(widgets::peer_review_form(ui, coordinator));
    cmds
}

fn open_model_externally(
    ui: &egui::Ui,
    coordinator: &mut ViewCoordinator,
    api_base: &str,
    invention: &Invention,
) {
    let Some(path) = invention.model_file_path.as_deref() else {
        return;
    };
    match client_core::model_asset_url(api_base, path) {
        Ok(url) => {
            tracing::info!(url = %url, "opening model in external viewer");
            ui.ctx().open_url(egui::OpenUrl::new_tab(url));
        }
        Err(err) => {
            tracing::warn!("cannot resolve model url: {err}");
            coordinator.status = format!("Cannot open model: {err}");
        }
    }
}

pub fn create_invention(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    ui.heading("Share an invention");
    let form = &mut coordinator.invention_form;
    let draft = &mut form.draft;
    egui::Grid::new("invention_form").num_columns(2).show(ui, |ui| {
        labeled_line(ui, "Title *", &mut draft.title);
        ui.label("Description *");
        ui.add(egui::TextEdit::multiline(&mut draft.description).desired_rows(4));
        ui.end_row();
        labeled_line(ui, "Your name *", &mut draft.creator_name);
        labeled_line(ui, "Tags (comma separated)", &mut draft.tags);
    });
    ui.horizontal_wrapped(|ui| {
        widgets::option_combo(ui, "new_category", "Category", &mut draft.category, Category::ALL, Category::label);
        widgets::option_combo(
            ui,
            "new_difficulty",
            "Difficulty",
            &mut draft.difficulty,
            Difficulty::ALL,
            Difficulty::label,
        );
        widgets::option_combo(ui, "new_cost", "Cost", &mut draft.cost_range, CostRange::ALL, CostRange::label);
        widgets::option_combo(
            ui,
            "new_stage",
            "Stage",
            &mut draft.development_stage,
            DevelopmentStage::ALL,
            DevelopmentStage::label,
        );
    });
    ui.checkbox(&mut draft.seeking_collaboration, "Seeking collaborators");
    ui.checkbox(&mut draft.seeking_mentorship, "Seeking mentorship");
    ui.checkbox(&mut draft.is_public, "Public");
    form_error(ui, &form.error);
    if submit_row(ui, "Share invention", form.loading) {
        coordinator.submit(CreateForm::Invention)
    } else {
        Vec::new()
    }
}

pub fn groups(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.horizontal(|ui| {
        ui.heading("Groups");
        if ui.button("New group").clicked() {
            cmds.extend(coordinator.navigate(View::CreateGroup));
        }
    });

    let mut open = None;
    ui.columns(2, |columns| {
        let open_group = coordinator.chat().map(|chat| chat.group_id.clone());
        for group in &coordinator.groups {
            egui::Frame::group(columns[0].style()).show(&mut columns[0], |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&group.name).strong());
                    if group.is_private {
                        theme::pill(ui, "Private", theme::BADGE_PRIVATE);
                    }
                });
                ui.label(&group.description);
                ui.weak(format!("{} members", group.members.len()));
                let is_open = open_group.as_ref() == Some(&group.id);
                if ui.add_enabled(!is_open, egui::Button::new("Open chat")).clicked() {
                    open = Some(group.id.clone());
                }
            });
        }
        if coordinator.groups.is_empty() {
            columns[0].weak("No groups yet.");
        }

        cmds.extend(chat_panel(&mut columns[1], coordinator));
    });
    if let Some(group_id) = open {
        cmds.extend(coordinator.open_group(group_id));
    }
    cmds
}

fn chat_panel(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let group_name = coordinator.chat().and_then(|chat| {
        coordinator
            .groups
            .iter()
            .find(|group| group.id == chat.group_id)
            .map(|group| group.name.clone())
    });
    let mut send = false;
    let mut leave = false;
    let Some(chat) = coordinator.chat_mut() else {
        ui.weak("Open a group to join its discussion.");
        return Vec::new();
    };

    ui.horizontal(|ui| {
        ui.heading(group_name.unwrap_or_else(|| chat.group_id.to_string()));
        if chat.live {
            theme::pill(ui, "Live", theme::BADGE_PUBLIC);
        } else {
            theme::pill(ui, "Offline", theme::BADGE_PRIVATE);
        }
        leave = ui.button("Leave").clicked();
    });
    egui::ScrollArea::vertical()
        .id_salt("chat_messages")
        .max_height(360.0)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &chat.messages {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&message.sender_name).strong());
                    if let Some(timestamp) = message.timestamp {
                        ui.weak(timestamp.with_timezone(&chrono::Local).format("%H:%M").to_string());
                    }
                });
                ui.label(&message.message);
            }
        });
    ui.horizontal(|ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut chat.draft)
                .hint_text("Message")
                .desired_width(ui.available_width() - 70.0),
        );
        let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        send = ui.add_enabled(!chat.sending, egui::Button::new("Send")).clicked() || enter;
    });

    if leave {
        coordinator.leave_group()
    } else if send {
        coordinator.send_chat()
    } else {
        Vec::new()
    }
}

pub fn create_group(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    ui.heading("New group");
    let inventions = &coordinator.inventions;
    let form = &mut coordinator.group_form;
    let draft = &mut form.draft;
    egui::Grid::new("group_form").num_columns(2).show(ui, |ui| {
        labeled_line(ui, "Name *", &mut draft.name);
        ui.label("Description *");
        ui.add(egui::TextEdit::multiline(&mut draft.description).desired_rows(3));
        ui.end_row();

        ui.label("Invention");
        let selected = draft
            .invention_id
            .as_ref()
            .and_then(|id| inventions.iter().find(|invention| &invention.id == id))
            .map(|invention| invention.title.as_str())
            .unwrap_or("None");
        egui::ComboBox::from_id_salt("group_invention")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut draft.invention_id, None, "None");
                for invention in inventions {
                    ui.selectable_value(
                        &mut draft.invention_id,
                        Some(invention.id.clone()),
                        invention.title.as_str(),
                    );
                }
            });
        ui.end_row();
    });
    ui.checkbox(&mut draft.is_private, "Private group");
    form_error(ui, &form.error);
    if submit_row(ui, "Create group", form.loading) {
        coordinator.submit(CreateForm::Group)
    } else {
        Vec::new()
    }
}

pub fn suggestions(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.horizontal(|ui| {
        ui.heading("Invention suggestions");
        if ui.button("Suggest something").clicked() {
            cmds.extend(coordinator.navigate(View::CreateSuggestion));
        }
    });
    if coordinator.suggestions.is_empty() {
        ui.weak("No suggestions yet.");
    }
    let mut voted = None;
    for suggestion in &coordinator.suggestions {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if ui.button(format!("▲ {}", suggestion.votes)).clicked() {
                    voted = Some(suggestion.id.clone());
                }
                ui.label(egui::RichText::new(&suggestion.title).strong());
                theme::pill(ui, &suggestion.technology_area, theme::BADGE_SEEKING);
            });
            ui.label(&suggestion.description);
            if let Some(source) = suggestion.inspiration_source.as_deref() {
                ui.weak(format!("Inspired by: {source}"));
            }
            ui.weak(format!("Suggested by {}", suggestion.suggested_by));
        });
    }
    if let Some(suggestion_id) = voted {
        cmds.extend(coordinator.vote_suggestion(&suggestion_id));
    }
    cmds
}

pub fn create_suggestion(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    ui.heading("Suggest an invention");
    let form = &mut coordinator.suggestion_form;
    let draft = &mut form.draft;
    egui::Grid::new("suggestion_form").num_columns(2).show(ui, |ui| {
        labeled_line(ui, "Title *", &mut draft.title);
        ui.label("Description *");
        ui.add(egui::TextEdit::multiline(&mut draft.description).desired_rows(3));
        ui.end_row();
        labeled_line(ui, "Technology area *", &mut draft.technology_area);
        labeled_line(ui, "Your name *", &mut draft.suggested_by);
        labeled_line(ui, "Inspiration source", &mut draft.inspiration_source);
    });
    form_error(ui, &form.error);
    if submit_row(ui, "Post suggestion", form.loading) {
        coordinator.submit(CreateForm::Suggestion)
    } else {
        Vec::new()
    }
}

fn user_summary(ui: &mut egui::Ui, user: &User) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(user.display_name()).strong());
        ui.weak(format!("@{}", user.username));
        if user.is_mentor {
            theme::pill(ui, "Mentor", theme::BADGE_PUBLIC);
        }
    });
    if let Some(institution) = user.institution.as_deref() {
        ui.weak(institution);
    }
    if let Some(bio) = user.bio.as_deref() {
        ui.label(excerpt(bio, EXCERPT_CHARS));
    }
    if !user.skills.is_empty() {
        ui.weak(format!("Skills: {}", user.skills.join(", ")));
    }
}

pub fn mentors(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    ui.heading("Mentors");
    let mut chosen = None;
    ui.columns(2, |columns| {
        if coordinator.mentors.is_empty() {
            columns[0].weak("No mentors have joined yet.");
        }
        for mentor in &coordinator.mentors {
            egui::Frame::group(columns[0].style()).show(&mut columns[0], |ui| {
                ui.set_width(ui.available_width());
                user_summary(ui, mentor);
                if ui.button("Request mentorship").clicked() {
                    chosen = Some(mentor.clone());
                }
            });
        }

        let ui = &mut columns[1];
        ui.heading("Mentorship request");
        let form = &mut coordinator.mentorship_form;
        let draft = &mut form.draft;
        egui::Grid::new("mentorship_form").num_columns(2).show(ui, |ui| {
            labeled_line(ui, "Your name *", &mut draft.student_name);
            labeled_line(ui, "Mentor *", &mut draft.mentor_name);
            labeled_line(ui, "Subject *", &mut draft.subject);
            ui.label("Message *");
            ui.add(egui::TextEdit::multiline(&mut draft.message).desired_rows(4));
            ui.end_row();
        });
        form_error(ui, &form.error);
    });

    if let Some(mentor) = chosen {
        coordinator.request_mentorship_from(&mentor);
    }
    let loading = coordinator.mentorship_form.loading;
    if submit_row(ui, "Send request", loading) {
        coordinator.submit(CreateForm::MentorshipRequest)
    } else {
        Vec::new()
    }
}

pub fn community(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.horizontal(|ui| {
        ui.heading(format!("Community ({})", coordinator.users.len()));
        if ui.button("Join the community").clicked() {
            cmds.extend(coordinator.navigate(View::JoinCommunity));
        }
    });
    for user in &coordinator.users {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            user_summary(ui, user);
        });
    }
    cmds
}

pub fn join_community(ui: &mut egui::Ui, coordinator: &mut ViewCoordinator) -> Vec<BackendCommand> {
    ui.heading("Join InventHub");
    let form = &mut coordinator.user_form;
    let draft = &mut form.draft;
    egui::Grid::new("user_form").num_columns(2).show(ui, |ui| {
        labeled_line(ui, "Username *", &mut draft.username);
        labeled_line(ui, "Email", &mut draft.email);
        labeled_line(ui, "Full name", &mut draft.full_name);
        labeled_line(ui, "Institution", &mut draft.institution);
        labeled_line(ui, "Skills (comma separated)", &mut draft.skills);
        ui.label("Bio");
        ui.add(egui::TextEdit::multiline(&mut draft.bio).desired_rows(3));
        ui.end_row();
    });
    ui.checkbox(&mut draft.is_mentor, "I'd like to mentor others");
    form_error(ui, &form.error);
    if submit_row(ui, "Create profile", form.loading) {
        coordinator.submit(CreateForm::UserProfile)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::InventionId;

    use super::*;

    fn invention(is_public: bool) -> Invention {
        Invention {
            id: InventionId::new("i1"),
            title: "X".into(),
            description: "Y".into(),
            creator_id: None,
            creator_name: "Z".into(),
            is_public,
            tags: Vec::new(),
            category: None,
            difficulty: None,
            cost_range: None,
            development_stage: None,
            seeking_collaboration: false,
            seeking_mentorship: false,
            upvotes: 0,
            downvotes: 0,
            views: 0,
            average_rating: 0.0,
            rating_count: 0,
            model_file_path: None,
            model_file_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn public_inventions_get_the_public_badge() {
        assert_eq!(visibility_badge(&invention(true)).0, "Public");
        assert_eq!(visibility_badge(&invention(false)).0, "Private");
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("  short  ", 10), "short");
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
        assert_eq!(excerpt("abc", 3), "abc");
    }
}
