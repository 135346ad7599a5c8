//! View Coordinator: all client-side UI state and the transitions between
//! states. Every transition is a plain method that may return follow-up
//! backend commands; nothing here touches the network or egui.

use std::path::PathBuf;

use client_core::{upload, InventionFilters};
use shared::{
    domain::{
        Category, CostRange, DevelopmentStage, Difficulty, GroupId, InventionId, ReviewId,
        SuggestionId, VoteKind,
    },
    protocol::{
        ChatMessage, ChatMessageCreate, Comment, CommentCreate, Group, GroupCreate, Invention,
        InventionCreate, MentorshipRequestCreate, PeerReviewSubmission, RatingRequest,
        Suggestion, SuggestionCreate, User, UserCreate, VoteRequest,
    },
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    category_label, CreateForm, Created, ListScope, ModelKey, UiError, UiErrorContext, UiEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Browse,
    CreateInvention,
    Groups,
    CreateGroup,
    Suggestions,
    CreateSuggestion,
    Mentors,
    Community,
    JoinCommunity,
}

impl View {
    pub const NAV: &'static [View] = &[
        View::Home,
        View::Browse,
        View::CreateInvention,
        View::Groups,
        View::Suggestions,
        View::Mentors,
        View::Community,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Browse => "Browse",
            View::CreateInvention => "Share invention",
            View::Groups => "Groups",
            View::CreateGroup => "New group",
            View::Suggestions => "Suggestions",
            View::CreateSuggestion => "New suggestion",
            View::Mentors => "Mentors",
            View::Community => "Community",
            View::JoinCommunity => "Join",
        }
    }
}

impl CreateForm {
    /// Where a successful submission lands.
    pub fn follow_up_view(self) -> View {
        match self {
            CreateForm::Invention => View::Browse,
            CreateForm::Group => View::Groups,
            CreateForm::Suggestion => View::Suggestions,
            CreateForm::UserProfile => View::Community,
            CreateForm::MentorshipRequest => View::Mentors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Named(View),
    InventionDetail(InventionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<D> {
    pub draft: D,
    pub loading: bool,
    /// Local validation message; never set by server failures.
    pub error: Option<String>,
}

impl<D> FormState<D> {
    fn new(draft: D) -> Self {
        Self {
            draft,
            loading: false,
            error: None,
        }
    }
}

fn required(value: &str, field: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Comma-separated list input, blanks dropped.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventionDraft {
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub tags: String,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub cost_range: Option<CostRange>,
    pub development_stage: Option<DevelopmentStage>,
    pub seeking_collaboration: bool,
    pub seeking_mentorship: bool,
    pub is_public: bool,
}

impl InventionDraft {
    pub fn new(creator_name: &str) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            creator_name: creator_name.to_string(),
            tags: String::new(),
            category: None,
            difficulty: None,
            cost_range: None,
            development_stage: None,
            seeking_collaboration: false,
            seeking_mentorship: false,
            is_public: true,
        }
    }

    pub fn to_payload(&self) -> Result<InventionCreate, String> {
        Ok(InventionCreate {
            title: required(&self.title, "Title")?,
            description: required(&self.description, "Description")?,
            creator_name: required(&self.creator_name, "Your name")?,
            is_public: self.is_public,
            tags: split_list(&self.tags),
            category: self.category,
            difficulty: self.difficulty,
            cost_range: self.cost_range,
            development_stage: self.development_stage,
            seeking_collaboration: self.seeking_collaboration,
            seeking_mentorship: self.seeking_mentorship,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub invention_id: Option<InventionId>,
    pub is_private: bool,
}

impl GroupDraft {
    pub fn to_payload(&self) -> Result<GroupCreate, String> {
        Ok(GroupCreate {
            name: required(&self.name, "Group name")?,
            description: required(&self.description, "Description")?,
            invention_id: self.invention_id.clone(),
            is_private: self.is_private,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionDraft {
    pub title: String,
    pub description: String,
    pub technology_area: String,
    pub suggested_by: String,
    pub inspiration_source: String,
}

impl SuggestionDraft {
    fn new(suggested_by: &str) -> Self {
        Self {
            suggested_by: suggested_by.to_string(),
            ..Default::default()
        }
    }

    pub fn to_payload(&self) -> Result<SuggestionCreate, String> {
        Ok(SuggestionCreate {
            title: required(&self.title, "Title")?,
            description: required(&self.description, "Description")?,
            technology_area: required(&self.technology_area, "Technology area")?,
            suggested_by: required(&self.suggested_by, "Your name")?,
            inspiration_source: optional(&self.inspiration_source),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub institution: String,
    pub skills: String,
    pub is_mentor: bool,
}

impl UserDraft {
    pub fn to_payload(&self) -> Result<UserCreate, String> {
        Ok(UserCreate {
            username: required(&self.username, "Username")?,
            email: optional(&self.email),
            full_name: optional(&self.full_name),
            bio: optional(&self.bio),
            institution: optional(&self.institution),
            skills: split_list(&self.skills),
            is_mentor: self.is_mentor,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MentorshipDraft {
    pub student_name: String,
    pub mentor_name: String,
    pub subject: String,
    pub message: String,
}

impl MentorshipDraft {
    fn new(student_name: &str) -> Self {
        Self {
            student_name: student_name.to_string(),
            ..Default::default()
        }
    }

    pub fn to_payload(&self) -> Result<MentorshipRequestCreate, String> {
        Ok(MentorshipRequestCreate {
            student_name: required(&self.student_name, "Your name")?,
            mentor_name: required(&self.mentor_name, "Mentor")?,
            subject: required(&self.subject, "Subject")?,
            message: required(&self.message, "Message")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerReviewDraft {
    pub innovation_score: u8,
    pub feasibility_score: u8,
    pub impact_score: u8,
    pub strengths: String,
    pub improvements: String,
    pub comments: String,
}

impl Default for PeerReviewDraft {
    fn default() -> Self {
        Self {
            innovation_score: 5,
            feasibility_score: 5,
            impact_score: 5,
            strengths: String::new(),
            improvements: String::new(),
            comments: String::new(),
        }
    }
}

/// Everything scoped to the invention currently shown on the detail screen.
/// Dropped as a whole when the selection changes.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub invention_id: InventionId,
    pub invention: Option<Invention>,
    pub comments: Vec<Comment>,
    pub comment_draft: String,
    pub comment_loading: bool,
    pub review: PeerReviewDraft,
    pub review_loading: bool,
    pub saved_review_id: Option<ReviewId>,
    pub upload_loading: bool,
    /// Bumped when the refresh after an upload lands.
    pub model_revision: u32,
    model_reload_pending: bool,
}

impl DetailState {
    fn new(invention_id: InventionId, invention: Option<Invention>) -> Self {
        Self {
            invention_id,
            invention,
            comments: Vec::new(),
            comment_draft: String::new(),
            comment_loading: false,
            review: PeerReviewDraft::default(),
            review_loading: false,
            saved_review_id: None,
            upload_loading: false,
            model_revision: 0,
            model_reload_pending: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub group_id: GroupId,
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    pub sending: bool,
    pub live: bool,
}

impl ChatState {
    fn push_unique(&mut self, message: ChatMessage) {
        if !self.messages.iter().any(|existing| existing.id == message.id) {
            self.messages.push(message);
        }
    }
}

pub struct ViewCoordinator {
    display_name: String,
    view: View,
    detail: Option<DetailState>,

    pub inventions: Vec<Invention>,
    pub filtered_inventions: Vec<Invention>,
    pub groups: Vec<Group>,
    pub suggestions: Vec<Suggestion>,
    pub users: Vec<User>,
    pub mentors: Vec<User>,

    pub search_query: String,
    filters: InventionFilters,
    public_only: bool,

    pub invention_form: FormState<InventionDraft>,
    pub group_form: FormState<GroupDraft>,
    pub suggestion_form: FormState<SuggestionDraft>,
    pub user_form: FormState<UserDraft>,
    pub mentorship_form: FormState<MentorshipDraft>,

    chat: Option<ChatState>,
    alert: Option<Alert>,
    pub status: String,
}

fn replace_by_id(list: &mut [Invention], updated: &Invention) {
    for slot in list.iter_mut().filter(|item| item.id == updated.id) {
        *slot = updated.clone();
    }
}

impl ViewCoordinator {
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            view: View::Home,
            detail: None,
            inventions: Vec::new(),
            filtered_inventions: Vec::new(),
            groups: Vec::new(),
            suggestions: Vec::new(),
            users: Vec::new(),
            mentors: Vec::new(),
            search_query: String::new(),
            filters: InventionFilters::default(),
            public_only: false,
            invention_form: FormState::new(InventionDraft::new(&display_name)),
            group_form: FormState::new(GroupDraft::default()),
            suggestion_form: FormState::new(SuggestionDraft::new(&display_name)),
            user_form: FormState::new(UserDraft::default()),
            mentorship_form: FormState::new(MentorshipDraft::new(&display_name)),
            chat: None,
            alert: None,
            status: "Starting".to_string(),
            display_name,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The detail screen wins over the named view whenever an invention is selected.
    pub fn screen(&self) -> Screen {
        match &self.detail {
            Some(detail) => Screen::InventionDetail(detail.invention_id.clone()),
            None => Screen::Named(self.view),
        }
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailState> {
        self.detail.as_mut()
    }

    pub fn chat(&self) -> Option<&ChatState> {
        self.chat.as_ref()
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatState> {
        self.chat.as_mut()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn filters(&self) -> &InventionFilters {
        &self.filters
    }

    pub fn public_only(&self) -> bool {
        self.public_only
    }

    /// The model the viewer should show for the open invention, if any.
    pub fn model_key(&self) -> Option<ModelKey> {
        let detail = self.detail.as_ref()?;
        let invention = detail.invention.as_ref().filter(|invention| invention.has_model())?;
        Some(ModelKey {
            invention_id: detail.invention_id.clone(),
            model_file_path: invention.model_file_path.clone()?,
            revision: detail.model_revision,
        })
    }

    fn listing_command(&self) -> BackendCommand {
        if self.public_only {
            BackendCommand::LoadPublicInventions
        } else {
            BackendCommand::LoadInventions {
                filters: self.filters.clone(),
            }
        }
    }

    /// Five independent fetches; the worker runs them concurrently.
    pub fn initial_load(&mut self) -> Vec<BackendCommand> {
        self.status = "Loading community data".to_string();
        vec![
            BackendCommand::LoadInventions {
                filters: self.filters.clone(),
            },
            BackendCommand::LoadGroups,
            BackendCommand::LoadSuggestions,
            BackendCommand::LoadUsers,
            BackendCommand::LoadMentors,
        ]
    }

    pub fn navigate(&mut self, view: View) -> Vec<BackendCommand> {
        self.view = view;
        self.detail = None;
        if view != View::Groups {
            return self.leave_group();
        }
        Vec::new()
    }

    pub fn select_invention(&mut self, invention_id: InventionId) -> Vec<BackendCommand> {
        let known = self
            .filtered_inventions
            .iter()
            .chain(self.inventions.iter())
            .find(|invention| invention.id == invention_id)
            .cloned();
        self.detail = Some(DetailState::new(invention_id.clone(), known));
        vec![
            BackendCommand::RefreshInvention {
                invention_id: invention_id.clone(),
            },
            BackendCommand::LoadComments { invention_id },
        ]
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn is_loading(&self, form: CreateForm) -> bool {
        match form {
            CreateForm::Invention => self.invention_form.loading,
            CreateForm::Group => self.group_form.loading,
            CreateForm::Suggestion => self.suggestion_form.loading,
            CreateForm::UserProfile => self.user_form.loading,
            CreateForm::MentorshipRequest => self.mentorship_form.loading,
        }
    }

    fn set_loading(&mut self, form: CreateForm, loading: bool) {
        match form {
            CreateForm::Invention => self.invention_form.loading = loading,
            CreateForm::Group => self.group_form.loading = loading,
            CreateForm::Suggestion => self.suggestion_form.loading = loading,
            CreateForm::UserProfile => self.user_form.loading = loading,
            CreateForm::MentorshipRequest => self.mentorship_form.loading = loading,
        }
    }

    fn reset_form(&mut self, form: CreateForm) {
        let name = self.display_name.clone();
        match form {
            CreateForm::Invention => self.invention_form = FormState::new(InventionDraft::new(&name)),
            CreateForm::Group => self.group_form = FormState::new(GroupDraft::default()),
            CreateForm::Suggestion => {
                self.suggestion_form = FormState::new(SuggestionDraft::new(&name))
            }
            CreateForm::UserProfile => self.user_form = FormState::new(UserDraft::default()),
            CreateForm::MentorshipRequest => {
                self.mentorship_form = FormState::new(MentorshipDraft::new(&name))
            }
        }
    }

    /// One create call per accepted submit. Ignored while the form is loading;
    /// a draft with a missing required field never reaches the backend.
    pub fn submit(&mut self, form: CreateForm) -> Vec<BackendCommand> {
        if self.is_loading(form) {
            return Vec::new();
        }
        let built = match form {
            CreateForm::Invention => self
                .invention_form
                .draft
                .to_payload()
                .map(BackendCommand::CreateInvention),
            CreateForm::Group => self
                .group_form
                .draft
                .to_payload()
                .map(BackendCommand::CreateGroup),
            CreateForm::Suggestion => self
                .suggestion_form
                .draft
                .to_payload()
                .map(BackendCommand::CreateSuggestion),
            CreateForm::UserProfile => self
                .user_form
                .draft
                .to_payload()
                .map(BackendCommand::CreateUser),
            CreateForm::MentorshipRequest => self
                .mentorship_form
                .draft
                .to_payload()
                .map(BackendCommand::RequestMentorship),
        };

        let error = built.as_ref().err().cloned();
        match form {
            CreateForm::Invention => self.invention_form.error = error,
            CreateForm::Group => self.group_form.error = error,
            CreateForm::Suggestion => self.suggestion_form.error = error,
            CreateForm::UserProfile => self.user_form.error = error,
            CreateForm::MentorshipRequest => self.mentorship_form.error = error,
        }

        match built {
            Ok(cmd) => {
                self.set_loading(form, true);
                self.status = format!("Submitting {}", form.label());
                vec![cmd]
            }
            Err(_) => Vec::new(),
        }
    }

    /// Empty query falls back to the filtered listing.
    pub fn submit_search(&mut self) -> Vec<BackendCommand> {
        let query = self.search_query.trim();
        if query.is_empty() {
            vec![self.listing_command()]
        } else {
            vec![BackendCommand::SearchInventions {
                query: query.to_string(),
            }]
        }
    }

    /// The public listing has no server-side filters, so the filter bar is
    /// ignored while it is on.
    pub fn set_public_only(&mut self, public_only: bool) -> Vec<BackendCommand> {
        if public_only == self.public_only {
            return Vec::new();
        }
        self.public_only = public_only;
        vec![self.listing_command()]
    }

    pub fn apply_filters(&mut self, filters: InventionFilters) -> Vec<BackendCommand> {
        if filters == self.filters {
            return Vec::new();
        }
        self.filters = filters;
        self.public_only = false;
        vec![self.listing_command()]
    }

    pub fn vote(&self, invention_id: &InventionId, vote_type: VoteKind) -> Vec<BackendCommand> {
        vec![BackendCommand::VoteInvention {
            invention_id: invention_id.clone(),
            vote: VoteRequest {
                vote_type,
                voter_name: self.display_name.clone(),
            },
        }]
    }

    pub fn rate(&self, invention_id: &InventionId, rating: u8) -> Vec<BackendCommand> {
        vec![BackendCommand::RateInvention {
            invention_id: invention_id.clone(),
            rating: RatingRequest {
                rating: rating.clamp(1, 5),
                rater_name: self.display_name.clone(),
            },
        }]
    }

    /// Validates the picked or dropped paths locally; a rejected selection
    /// raises the upload alert and emits no command.
    pub fn upload_model(&mut self, paths: &[PathBuf]) -> Vec<BackendCommand> {
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        if detail.upload_loading {
            return Vec::new();
        }
        match upload::select_single_model(paths) {
            Ok(model) => {
                detail.upload_loading = true;
                self.status = format!("Uploading {}", model.file_name);
                vec![BackendCommand::UploadModel {
                    invention_id: detail.invention_id.clone(),
                    model,
                }]
            }
            Err(rejection) => {
                tracing::warn!("model upload rejected locally: {rejection}");
                self.status = format!("Upload rejected: {rejection}");
                self.alert = Some(Alert {
                    title: "Upload failed".to_string(),
                    message: rejection.to_string(),
                });
                Vec::new()
            }
        }
    }

    pub fn post_comment(&mut self) -> Vec<BackendCommand> {
        let author_name = self.display_name.clone();
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        let content = detail.comment_draft.trim();
        if detail.comment_loading || content.is_empty() {
            return Vec::new();
        }
        let payload = CommentCreate {
            invention_id: detail.invention_id.clone(),
            author_name,
            content: content.to_string(),
        };
        detail.comment_loading = true;
        vec![BackendCommand::PostComment(payload)]
    }

    /// First submit creates the review; later submits update the saved one.
    pub fn submit_peer_review(&mut self) -> Vec<BackendCommand> {
        let reviewer_name = self.display_name.clone();
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        if detail.review_loading {
            return Vec::new();
        }
        let review = &detail.review;
        let submission = PeerReviewSubmission {
            invention_id: detail.invention_id.clone(),
            reviewer_name,
            innovation_score: review.innovation_score.clamp(1, 10),
            feasibility_score: review.feasibility_score.clamp(1, 10),
            impact_score: review.impact_score.clamp(1, 10),
            strengths: review.strengths.trim().to_string(),
            improvements: review.improvements.trim().to_string(),
            comments: review.comments.trim().to_string(),
        };
        detail.review_loading = true;
        vec![BackendCommand::SubmitPeerReview {
            review_id: detail.saved_review_id.clone(),
            submission,
        }]
    }

    pub fn vote_suggestion(&self, suggestion_id: &SuggestionId) -> Vec<BackendCommand> {
        vec![BackendCommand::VoteSuggestion {
            suggestion_id: suggestion_id.clone(),
        }]
    }

    pub fn open_group(&mut self, group_id: GroupId) -> Vec<BackendCommand> {
        if self
            .chat
            .as_ref()
            .is_some_and(|chat| chat.group_id == group_id)
        {
            return Vec::new();
        }
        self.chat = Some(ChatState {
            group_id: group_id.clone(),
            messages: Vec::new(),
            draft: String::new(),
            sending: false,
            live: true,
        });
        vec![BackendCommand::OpenGroupChat { group_id }]
    }

    pub fn leave_group(&mut self) -> Vec<BackendCommand> {
        match self.chat.take() {
            Some(_) => vec![BackendCommand::CloseGroupChat],
            None => Vec::new(),
        }
    }

    pub fn send_chat(&mut self) -> Vec<BackendCommand> {
        let sender_name = self.display_name.clone();
        let Some(chat) = self.chat.as_mut() else {
            return Vec::new();
        };
        let message = chat.draft.trim();
        if chat.sending || message.is_empty() {
            return Vec::new();
        }
        let payload = ChatMessageCreate {
            group_id: chat.group_id.clone(),
            sender_name,
            message: message.to_string(),
        };
        chat.sending = true;
        vec![BackendCommand::SendChatMessage(payload)]
    }

    pub fn request_mentorship_from(&mut self, mentor: &User) {
        let draft = &mut self.mentorship_form.draft;
        draft.mentor_name = mentor.username.clone();
        if draft.student_name.trim().is_empty() {
            draft.student_name = self.display_name.clone();
        }
    }

    pub fn apply(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => self.apply_error(err),
            UiEvent::InventionsLoaded { scope, inventions } => {
                self.status = format!("{} inventions", inventions.len());
                match scope {
                    ListScope::All => {
                        self.inventions = inventions.clone();
                        self.filtered_inventions = inventions;
                    }
                    ListScope::Filtered => self.filtered_inventions = inventions,
                }
            }
            UiEvent::InventionRefreshed(invention) => {
                replace_by_id(&mut self.inventions, &invention);
                replace_by_id(&mut self.filtered_inventions, &invention);
                if let Some(detail) = self
                    .detail
                    .as_mut()
                    .filter(|detail| detail.invention_id == invention.id)
                {
                    detail.invention = Some(invention);
                    if detail.model_reload_pending {
                        detail.model_reload_pending = false;
                        detail.model_revision += 1;
                    }
                }
            }
            UiEvent::GroupsLoaded(groups) => self.groups = groups,
            UiEvent::SuggestionsLoaded(suggestions) => self.suggestions = suggestions,
            UiEvent::UsersLoaded(users) => self.users = users,
            UiEvent::MentorsLoaded(mentors) => self.mentors = mentors,
            UiEvent::Created(created) => return self.apply_created(created),
            UiEvent::InventionVoted { invention_id } | UiEvent::InventionRated { invention_id } => {
                return vec![BackendCommand::RefreshInvention { invention_id }];
            }
            UiEvent::ModelUploaded {
                invention_id,
                response,
            } => {
                if let Some(detail) = self
                    .detail
                    .as_mut()
                    .filter(|detail| detail.invention_id == invention_id)
                {
                    detail.upload_loading = false;
                    detail.model_reload_pending = true;
                }
                self.status = if response.message.trim().is_empty() {
                    "Model uploaded".to_string()
                } else {
                    response.message
                };
                return vec![BackendCommand::RefreshInvention { invention_id }];
            }
            // The viewer owns decoded models.
            UiEvent::ModelLoaded { .. } => {}
            UiEvent::ModelTooLarge { limit, .. } => {
                self.status = format!(
                    "Model is over {} MB; open it externally",
                    limit / (1024 * 1024)
                );
            }
            UiEvent::ModelFailed { error, .. } => self.apply_error(error),
            UiEvent::CommentsLoaded {
                invention_id,
                comments,
            } => {
                if let Some(detail) = self
                    .detail
                    .as_mut()
                    .filter(|detail| detail.invention_id == invention_id)
                {
                    detail.comments = comments;
                }
            }
            UiEvent::CommentPosted { invention_id } => {
                if let Some(detail) = self
                    .detail
                    .as_mut()
                    .filter(|detail| detail.invention_id == invention_id)
                {
                    detail.comment_draft.clear();
                    detail.comment_loading = false;
                    return vec![BackendCommand::LoadComments { invention_id }];
                }
            }
            UiEvent::PeerReviewSaved(review) => {
                if let Some(detail) = self
                    .detail
                    .as_mut()
                    .filter(|detail| detail.invention_id == review.invention_id)
                {
                    detail.saved_review_id = Some(review.id);
                    detail.review_loading = false;
                }
                self.status = "Peer review saved".to_string();
            }
            UiEvent::SuggestionVoted => return vec![BackendCommand::LoadSuggestions],
            UiEvent::ChatHistoryLoaded { group_id, messages } => {
                if let Some(chat) = self.chat.as_mut().filter(|chat| chat.group_id == group_id) {
                    let live = std::mem::replace(&mut chat.messages, messages);
                    for message in live {
                        chat.push_unique(message);
                    }
                }
            }
            UiEvent::ChatMessageReceived(message) => {
                if let Some(chat) = self
                    .chat
                    .as_mut()
                    .filter(|chat| chat.group_id == message.group_id)
                {
                    chat.push_unique(message);
                }
            }
            UiEvent::ChatMessageSent(message) => {
                if let Some(chat) = self
                    .chat
                    .as_mut()
                    .filter(|chat| chat.group_id == message.group_id)
                {
                    chat.draft.clear();
                    chat.sending = false;
                    chat.push_unique(message);
                }
            }
            UiEvent::ChatClosed { group_id } => {
                if let Some(chat) = self.chat.as_mut().filter(|chat| chat.group_id == group_id) {
                    chat.live = false;
                    self.status = "Live chat disconnected".to_string();
                }
            }
        }
        Vec::new()
    }

    fn apply_created(&mut self, created: Created) -> Vec<BackendCommand> {
        let form = created.form();
        match created {
            Created::Invention(invention) => {
                self.inventions.insert(0, invention.clone());
                self.filtered_inventions.insert(0, invention);
            }
            Created::Group(group) => self.groups.insert(0, group),
            Created::Suggestion(suggestion) => self.suggestions.insert(0, suggestion),
            Created::User(user) => {
                if user.is_mentor {
                    self.mentors.insert(0, user.clone());
                }
                self.users.insert(0, user);
            }
            Created::MentorshipRequest(request) => {
                self.alert = Some(Alert {
                    title: "Mentorship request sent".to_string(),
                    message: format!(
                        "Your request \"{}\" was sent to {}.",
                        request.subject, request.mentor_name
                    ),
                });
            }
        }
        self.reset_form(form);
        self.status = format!("Created {}", form.label());
        self.navigate(form.follow_up_view())
    }

    fn apply_error(&mut self, err: UiError) {
        tracing::warn!(
            context = ?err.context(),
            category = ?err.category(),
            "ui error: {}",
            err.message()
        );
        self.status = format!("{} error: {}", category_label(err.category()), err.message());

        match err.context() {
            UiErrorContext::Create(form) => self.set_loading(form, false),
            UiErrorContext::Mentorship => self.set_loading(CreateForm::MentorshipRequest, false),
            UiErrorContext::Upload => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.upload_loading = false;
                }
            }
            UiErrorContext::Comment => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.comment_loading = false;
                }
            }
            UiErrorContext::Review => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.review_loading = false;
                }
            }
            UiErrorContext::Chat => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.sending = false;
                }
            }
            UiErrorContext::Startup
            | UiErrorContext::InitialLoad
            | UiErrorContext::Widget
            | UiErrorContext::Viewer => {}
        }

        if err.raises_alert() {
            let title = match err.context() {
                UiErrorContext::Upload => "Upload failed",
                _ => "Mentorship request failed",
            };
            self.alert = Some(Alert {
                title: title.to_string(),
                message: err.message().to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
