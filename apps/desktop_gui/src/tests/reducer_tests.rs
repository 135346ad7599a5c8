use std::io::Write;

use super::*;
use client_core::ClientError;
use shared::{
    domain::{MentorshipRequestId, MessageId},
    protocol::{MentorshipRequest, ModelUploadResponse, PeerReview},
};

fn invention(id: &str, title: &str) -> Invention {
    Invention {
        id: InventionId::new(id),
        title: title.to_string(),
        description: "d".to_string(),
        creator_id: None,
        creator_name: "ada".to_string(),
        is_public: true,
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

fn chat_message(id: &str, group: &str, text: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        group_id: GroupId::new(group),
        sender_name: "ada".to_string(),
        message: text.to_string(),
        timestamp: None,
    }
}

fn loaded(coordinator: &mut ViewCoordinator, inventions: Vec<Invention>) {
    coordinator.apply(UiEvent::InventionsLoaded {
        scope: ListScope::All,
        inventions,
    });
}

#[test]
fn initial_load_issues_five_fetches() {
    let mut coordinator = ViewCoordinator::new("ada");
    let cmds = coordinator.initial_load();
    assert_eq!(
        cmds,
        vec![
            BackendCommand::LoadInventions {
                filters: InventionFilters::default()
            },
            BackendCommand::LoadGroups,
            BackendCommand::LoadSuggestions,
            BackendCommand::LoadUsers,
            BackendCommand::LoadMentors,
        ]
    );
}

#[test]
fn selected_invention_overrides_every_named_view() {
    let mut coordinator = ViewCoordinator::new("ada");
    loaded(&mut coordinator, vec![invention("i1", "Kettle")]);

    for view in [View::Home, View::Groups, View::Mentors, View::CreateInvention] {
        coordinator.navigate(view);
        assert_eq!(coordinator.screen(), Screen::Named(view));
        let cmds = coordinator.select_invention(InventionId::new("i1"));
        assert_eq!(
            coordinator.screen(),
            Screen::InventionDetail(InventionId::new("i1"))
        );
        assert_eq!(coordinator.view(), view);
        assert!(matches!(cmds[0], BackendCommand::RefreshInvention { .. }));
        assert!(matches!(cmds[1], BackendCommand::LoadComments { .. }));
    }

    coordinator.close_detail();
    assert_eq!(coordinator.screen(), Screen::Named(View::CreateInvention));
}

#[test]
fn navigate_clears_selection() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    coordinator.navigate(View::Suggestions);
    assert_eq!(coordinator.screen(), Screen::Named(View::Suggestions));
    assert!(coordinator.detail().is_none());
}

#[test]
fn created_invention_lands_first_with_public_flag_and_form_resets() {
    let mut coordinator = ViewCoordinator::new("ada");
    loaded(&mut coordinator, vec![invention("old", "Older")]);
    coordinator.navigate(View::CreateInvention);

    let draft = &mut coordinator.invention_form.draft;
    draft.title = "X".into();
    draft.description = "Y".into();
    draft.creator_name = "Z".into();

    let cmds = coordinator.submit(CreateForm::Invention);
    let [BackendCommand::CreateInvention(payload)] = cmds.as_slice() else {
        panic!("expected exactly one create call, got {cmds:?}");
    };
    assert_eq!(payload.title, "X");
    assert_eq!(payload.description, "Y");
    assert_eq!(payload.creator_name, "Z");
    assert!(payload.is_public);
    assert!(payload.tags.is_empty());
    assert!(coordinator.invention_form.loading);

    let created = invention("new", "X");
    coordinator.apply(UiEvent::Created(Created::Invention(created.clone())));

    assert_eq!(coordinator.filtered_inventions.len(), 2);
    assert_eq!(coordinator.filtered_inventions[0], created);
    assert_eq!(coordinator.inventions[0], created);
    assert!(coordinator.filtered_inventions[0].is_public);
    assert!(!coordinator.invention_form.loading);
    assert_eq!(coordinator.invention_form.draft.title, "");
    assert_eq!(coordinator.invention_form.draft.description, "");
    assert_eq!(coordinator.screen(), Screen::Named(View::Browse));
}

#[test]
fn each_form_has_its_follow_up_view() {
    assert_eq!(CreateForm::Invention.follow_up_view(), View::Browse);
    assert_eq!(CreateForm::Group.follow_up_view(), View::Groups);
    assert_eq!(CreateForm::Suggestion.follow_up_view(), View::Suggestions);
    assert_eq!(CreateForm::UserProfile.follow_up_view(), View::Community);
    assert_eq!(CreateForm::MentorshipRequest.follow_up_view(), View::Mentors);
}

#[test]
fn missing_required_field_sends_nothing() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.invention_form.draft.title = "Only a title".into();
    assert!(coordinator.submit(CreateForm::Invention).is_empty());
    assert!(!coordinator.invention_form.loading);
    assert_eq!(
        coordinator.invention_form.error.as_deref(),
        Some("Description is required")
    );

    assert!(coordinator.submit(CreateForm::Group).is_empty());
    assert!(coordinator.submit(CreateForm::UserProfile).is_empty());
}

#[test]
fn submit_while_loading_is_ignored() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.group_form.draft.name = "Makers".into();
    coordinator.group_form.draft.description = "Weekend builds".into();
    assert_eq!(coordinator.submit(CreateForm::Group).len(), 1);
    assert!(coordinator.submit(CreateForm::Group).is_empty());
}

#[test]
fn failed_create_keeps_every_draft_field() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.navigate(View::CreateSuggestion);
    let draft = SuggestionDraft {
        title: "Solar roads".into(),
        description: "Panels you can drive on".into(),
        technology_area: "Energy".into(),
        suggested_by: "ada".into(),
        inspiration_source: "a documentary".into(),
    };
    coordinator.suggestion_form.draft = draft.clone();
    assert_eq!(coordinator.submit(CreateForm::Suggestion).len(), 1);

    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Create(CreateForm::Suggestion),
        "connection refused",
    )));

    assert!(!coordinator.suggestion_form.loading);
    assert_eq!(coordinator.suggestion_form.draft, draft);
    assert_eq!(coordinator.screen(), Screen::Named(View::CreateSuggestion));
    assert!(coordinator.alert().is_none());
}

#[test]
fn mentorship_outcomes_raise_alerts() {
    let mut coordinator = ViewCoordinator::new("ada");
    let mentor: User = User {
        id: shared::domain::UserId::new("u2"),
        username: "grace".into(),
        email: None,
        full_name: None,
        bio: None,
        institution: None,
        skills: Vec::new(),
        is_mentor: true,
        created_at: None,
    };
    coordinator.request_mentorship_from(&mentor);
    coordinator.mentorship_form.draft.subject = "Compilers".into();
    coordinator.mentorship_form.draft.message = "Can you help?".into();
    let cmds = coordinator.submit(CreateForm::MentorshipRequest);
    let [BackendCommand::RequestMentorship(payload)] = cmds.as_slice() else {
        panic!("expected mentorship request, got {cmds:?}");
    };
    assert_eq!(payload.mentor_name, "grace");
    assert_eq!(payload.student_name, "ada");

    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Mentorship,
        "Mentor not found",
    )));
    assert_eq!(
        coordinator.alert().map(|alert| alert.message.as_str()),
        Some("Mentor not found")
    );
    assert_eq!(coordinator.mentorship_form.draft.subject, "Compilers");
    coordinator.dismiss_alert();

    assert_eq!(coordinator.submit(CreateForm::MentorshipRequest).len(), 1);
    coordinator.apply(UiEvent::Created(Created::MentorshipRequest(
        MentorshipRequest {
            id: MentorshipRequestId::new("m1"),
            student_name: "ada".into(),
            mentor_name: "grace".into(),
            subject: "Compilers".into(),
            message: "Can you help?".into(),
            created_at: None,
        },
    )));
    let alert = coordinator.alert().expect("success alert");
    assert!(alert.message.contains("grace"));
    assert_eq!(coordinator.screen(), Screen::Named(View::Mentors));
    assert_eq!(coordinator.mentorship_form.draft.subject, "");
}

#[test]
fn other_failures_stay_silent() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::InitialLoad,
        "connection refused",
    )));
    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Widget,
        "not found",
    )));
    assert!(coordinator.alert().is_none());
    assert!(coordinator.status.contains("not found"));
}

#[test]
fn empty_search_reloads_with_current_filters() {
    let mut coordinator = ViewCoordinator::new("ada");
    let filters = InventionFilters {
        category: Some(Category::Health),
        ..Default::default()
    };
    assert_eq!(
        coordinator.apply_filters(filters.clone()),
        vec![BackendCommand::LoadInventions {
            filters: filters.clone()
        }]
    );
    assert!(coordinator.apply_filters(filters.clone()).is_empty());

    coordinator.search_query = "   ".into();
    assert_eq!(
        coordinator.submit_search(),
        vec![BackendCommand::LoadInventions { filters }]
    );

    coordinator.search_query = " kettle ".into();
    assert_eq!(
        coordinator.submit_search(),
        vec![BackendCommand::SearchInventions {
            query: "kettle".into()
        }]
    );
}

#[test]
fn filtered_results_leave_full_list_alone() {
    let mut coordinator = ViewCoordinator::new("ada");
    loaded(
        &mut coordinator,
        vec![invention("a", "A"), invention("b", "B")],
    );
    coordinator.apply(UiEvent::InventionsLoaded {
        scope: ListScope::Filtered,
        inventions: vec![invention("b", "B")],
    });
    assert_eq!(coordinator.inventions.len(), 2);
    assert_eq!(coordinator.filtered_inventions.len(), 1);
}

#[test]
fn vote_refreshes_from_server_tally() {
    let mut coordinator = ViewCoordinator::new("ada");
    loaded(&mut coordinator, vec![invention("i1", "Kettle")]);
    coordinator.select_invention(InventionId::new("i1"));

    let id = InventionId::new("i1");
    let up = coordinator.vote(&id, VoteKind::Up);
    assert_eq!(
        up,
        vec![BackendCommand::VoteInvention {
            invention_id: id.clone(),
            vote: VoteRequest {
                vote_type: VoteKind::Up,
                voter_name: "ada".into()
            }
        }]
    );

    let follow_up = coordinator.apply(UiEvent::InventionVoted {
        invention_id: id.clone(),
    });
    assert_eq!(
        follow_up,
        vec![BackendCommand::RefreshInvention {
            invention_id: id.clone()
        }]
    );

    // Tallies are never counted locally: only the refreshed record changes them.
    assert_eq!(coordinator.filtered_inventions[0].upvotes, 0);
    let mut from_server = invention("i1", "Kettle");
    from_server.downvotes = 1;
    coordinator.apply(UiEvent::InventionRefreshed(from_server));
    assert_eq!(coordinator.filtered_inventions[0].downvotes, 1);
    assert_eq!(coordinator.filtered_inventions[0].upvotes, 0);
    let detail = coordinator.detail().and_then(|detail| detail.invention.as_ref());
    assert_eq!(detail.map(|invention| invention.net_votes()), Some(-1));
}

#[test]
fn rating_is_clamped_to_five_stars() {
    let coordinator = ViewCoordinator::new("ada");
    let cmds = coordinator.rate(&InventionId::new("i1"), 9);
    let [BackendCommand::RateInvention { rating, .. }] = cmds.as_slice() else {
        panic!("expected rate command");
    };
    assert_eq!(rating.rating, 5);
}

#[test]
fn disallowed_upload_alerts_without_a_command() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));

    let cmds = coordinator.upload_model(&[PathBuf::from("/tmp/notes.txt")]);
    assert!(cmds.is_empty());
    assert_eq!(
        coordinator.alert().map(|alert| alert.title.as_str()),
        Some("Upload failed")
    );
    coordinator.dismiss_alert();

    let cmds = coordinator.upload_model(&[PathBuf::from("a.stl"), PathBuf::from("b.stl")]);
    assert!(cmds.is_empty());
    assert!(coordinator
        .alert()
        .is_some_and(|alert| alert.message.contains("only one")));
}

#[test]
fn accepted_upload_then_reload_invention() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bracket.obj");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
        .expect("write");

    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    let cmds = coordinator.upload_model(&[path.clone()]);
    assert!(matches!(
        cmds.as_slice(),
        [BackendCommand::UploadModel { .. }]
    ));
    assert!(coordinator.upload_model(&[path]).is_empty());

    let follow_up = coordinator.apply(UiEvent::ModelUploaded {
        invention_id: InventionId::new("i1"),
        response: ModelUploadResponse {
            message: "Model uploaded successfully".into(),
            file_path: Some("/app/backend/uploads/i1_bracket.obj".into()),
        },
    });
    assert_eq!(
        follow_up,
        vec![BackendCommand::RefreshInvention {
            invention_id: InventionId::new("i1")
        }]
    );
    assert!(coordinator.detail().is_some_and(|detail| !detail.upload_loading));
}

#[test]
fn server_upload_failure_alerts_with_detail() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    let err = ClientError::Api {
        status: 400,
        detail: Some("File type .ply not supported".into()),
    };
    coordinator.apply(UiEvent::Error(UiError::from_client_error(
        UiErrorContext::Upload,
        &err,
        "Upload failed",
    )));
    assert_eq!(
        coordinator.alert().map(|alert| alert.message.as_str()),
        Some("File type .ply not supported")
    );
}

#[test]
fn comment_post_reloads_own_list() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    assert!(coordinator.post_comment().is_empty());

    if let Some(detail) = coordinator.detail_mut() {
        detail.comment_draft = "  Nice work  ".into();
    }
    let cmds = coordinator.post_comment();
    let [BackendCommand::PostComment(payload)] = cmds.as_slice() else {
        panic!("expected comment post");
    };
    assert_eq!(payload.content, "Nice work");
    assert_eq!(payload.author_name, "ada");

    let reload = coordinator.apply(UiEvent::CommentPosted {
        invention_id: InventionId::new("i1"),
    });
    assert_eq!(
        reload,
        vec![BackendCommand::LoadComments {
            invention_id: InventionId::new("i1")
        }]
    );
    assert!(coordinator
        .detail()
        .is_some_and(|detail| detail.comment_draft.is_empty()));
}

#[test]
fn peer_review_posts_first_then_updates() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    if let Some(detail) = coordinator.detail_mut() {
        detail.review.innovation_score = 12;
    }

    let first = coordinator.submit_peer_review();
    let [BackendCommand::SubmitPeerReview {
        review_id,
        submission,
    }] = first.as_slice()
    else {
        panic!("expected review submission");
    };
    assert!(review_id.is_none());
    assert_eq!(submission.innovation_score, 10);
    assert!(coordinator.submit_peer_review().is_empty());

    coordinator.apply(UiEvent::PeerReviewSaved(PeerReview {
        id: ReviewId::new("r1"),
        invention_id: InventionId::new("i1"),
        reviewer_name: "ada".into(),
        innovation_score: 10,
        feasibility_score: 5,
        impact_score: 5,
        strengths: String::new(),
        improvements: String::new(),
        comments: String::new(),
        created_at: None,
    }));

    let second = coordinator.submit_peer_review();
    assert!(matches!(
        second.as_slice(),
        [BackendCommand::SubmitPeerReview { review_id: Some(id), .. }] if id.as_str() == "r1"
    ));
}

#[test]
fn suggestion_vote_reloads_suggestions() {
    let mut coordinator = ViewCoordinator::new("ada");
    assert_eq!(
        coordinator.vote_suggestion(&SuggestionId::new("s1")),
        vec![BackendCommand::VoteSuggestion {
            suggestion_id: SuggestionId::new("s1")
        }]
    );
    assert_eq!(
        coordinator.apply(UiEvent::SuggestionVoted),
        vec![BackendCommand::LoadSuggestions]
    );
}

#[test]
fn chat_merges_history_with_live_messages_and_closes_on_leave() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.navigate(View::Groups);
    assert_eq!(
        coordinator.open_group(GroupId::new("g1")),
        vec![BackendCommand::OpenGroupChat {
            group_id: GroupId::new("g1")
        }]
    );
    assert!(coordinator.open_group(GroupId::new("g1")).is_empty());

    coordinator.apply(UiEvent::ChatMessageReceived(chat_message("m3", "g1", "live")));
    coordinator.apply(UiEvent::ChatMessageReceived(chat_message("x", "g2", "other")));
    coordinator.apply(UiEvent::ChatHistoryLoaded {
        group_id: GroupId::new("g1"),
        messages: vec![
            chat_message("m1", "g1", "first"),
            chat_message("m3", "g1", "live"),
        ],
    });
    let ids: Vec<&str> = coordinator
        .chat()
        .map(|chat| chat.messages.iter().map(|m| m.id.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["m1", "m3"]);

    if let Some(chat) = coordinator.chat_mut() {
        chat.draft = "hello".into();
    }
    assert_eq!(coordinator.send_chat().len(), 1);
    coordinator.apply(UiEvent::ChatMessageSent(chat_message("m4", "g1", "hello")));
    assert!(coordinator.chat().is_some_and(|chat| chat.draft.is_empty()));

    assert_eq!(
        coordinator.navigate(View::Home),
        vec![BackendCommand::CloseGroupChat]
    );
    assert!(coordinator.chat().is_none());
}

#[test]
fn late_detail_responses_for_other_inventions_are_ignored() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i2"));
    coordinator.apply(UiEvent::CommentsLoaded {
        invention_id: InventionId::new("i1"),
        comments: vec![Comment {
            id: shared::domain::CommentId::new("c1"),
            invention_id: InventionId::new("i1"),
            author_name: "bo".into(),
            content: "stale".into(),
            created_at: None,
        }],
    });
    assert!(coordinator
        .detail()
        .is_some_and(|detail| detail.comments.is_empty()));
}

#[test]
fn new_mentor_profile_joins_both_lists() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.user_form.draft.username = "grace".into();
    coordinator.user_form.draft.skills = "compilers, , cobol".into();
    coordinator.user_form.draft.is_mentor = true;
    let cmds = coordinator.submit(CreateForm::UserProfile);
    let [BackendCommand::CreateUser(payload)] = cmds.as_slice() else {
        panic!("expected create user");
    };
    assert_eq!(payload.skills, vec!["compilers", "cobol"]);

    let user: User = User {
        id: shared::domain::UserId::new("u9"),
        username: "grace".into(),
        email: None,
        full_name: None,
        bio: None,
        institution: None,
        skills: payload.skills.clone(),
        is_mentor: true,
        created_at: None,
    };
    coordinator.apply(UiEvent::Created(Created::User(user)));
    assert_eq!(coordinator.users.len(), 1);
    assert_eq!(coordinator.mentors.len(), 1);
    assert_eq!(coordinator.screen(), Screen::Named(View::Community));
}

#[test]
fn unrelated_failure_keeps_comment_and_review_in_flight() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    if let Some(detail) = coordinator.detail_mut() {
        detail.comment_draft = "first".into();
    }
    assert_eq!(coordinator.post_comment().len(), 1);
    assert_eq!(coordinator.submit_peer_review().len(), 1);

    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Widget,
        "Vote failed",
    )));
    assert!(coordinator.post_comment().is_empty());
    assert!(coordinator.submit_peer_review().is_empty());

    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Comment,
        "Could not post comment",
    )));
    assert!(coordinator
        .detail()
        .is_some_and(|detail| !detail.comment_loading && detail.review_loading));
    assert_eq!(coordinator.post_comment().len(), 1);
    assert!(coordinator.submit_peer_review().is_empty());

    coordinator.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::Review,
        "Could not save peer review",
    )));
    assert_eq!(coordinator.submit_peer_review().len(), 1);
}

#[test]
fn reupload_under_the_same_path_yields_a_new_model_key() {
    let path = "/app/backend/uploads/i1_part.stl";
    let mut with_model = invention("i1", "Part");
    with_model.model_file_path = Some(path.into());
    with_model.model_file_name = Some("part.stl".into());

    let mut coordinator = ViewCoordinator::new("ada");
    loaded(&mut coordinator, vec![with_model.clone()]);
    coordinator.select_invention(InventionId::new("i1"));
    let first = coordinator.model_key().expect("model key");
    assert_eq!(first.model_file_path, path);

    // The select-time refresh is not an upload.
    coordinator.apply(UiEvent::InventionRefreshed(with_model.clone()));
    assert_eq!(coordinator.model_key(), Some(first.clone()));

    coordinator.apply(UiEvent::ModelUploaded {
        invention_id: InventionId::new("i1"),
        response: ModelUploadResponse {
            message: "Model uploaded successfully".into(),
            file_path: Some(path.into()),
        },
    });
    assert_eq!(coordinator.model_key(), Some(first.clone()));

    coordinator.apply(UiEvent::InventionRefreshed(with_model));
    let second = coordinator.model_key().expect("model key");
    assert_eq!(second.model_file_path, first.model_file_path);
    assert_ne!(second, first);
}

#[test]
fn invention_without_model_has_no_model_key() {
    let mut coordinator = ViewCoordinator::new("ada");
    loaded(&mut coordinator, vec![invention("i1", "Bare")]);
    coordinator.select_invention(InventionId::new("i1"));
    assert!(coordinator.model_key().is_none());
}

#[test]
fn public_only_listing_toggles_and_yields_to_filters() {
    let mut coordinator = ViewCoordinator::new("ada");
    assert_eq!(
        coordinator.set_public_only(true),
        vec![BackendCommand::LoadPublicInventions]
    );
    assert!(coordinator.set_public_only(true).is_empty());

    coordinator.search_query = String::new();
    assert_eq!(
        coordinator.submit_search(),
        vec![BackendCommand::LoadPublicInventions]
    );

    let filters = InventionFilters {
        seeking_mentorship: Some(true),
        ..Default::default()
    };
    assert_eq!(
        coordinator.apply_filters(filters.clone()),
        vec![BackendCommand::LoadInventions { filters: filters.clone() }]
    );
    assert!(!coordinator.public_only());

    coordinator.set_public_only(true);
    assert_eq!(
        coordinator.set_public_only(false),
        vec![BackendCommand::LoadInventions { filters }]
    );
}

#[test]
fn oversize_model_only_updates_status() {
    let mut coordinator = ViewCoordinator::new("ada");
    coordinator.select_invention(InventionId::new("i1"));
    let follow_up = coordinator.apply(UiEvent::ModelTooLarge {
        key: ModelKey {
            invention_id: InventionId::new("i1"),
            model_file_path: "/app/backend/uploads/i1_engine.stl".into(),
            revision: 0,
        },
        limit: 256 * 1024 * 1024,
    });
    assert!(follow_up.is_empty());
    assert!(coordinator.alert().is_none());
    assert!(coordinator.status.contains("256 MB"));
}
