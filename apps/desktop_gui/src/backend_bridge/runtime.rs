//! Runtime bridge between UI command queue and backend event intake.
//!
//! One worker thread owns a multi-threaded tokio runtime. Every command runs
//! in its own task, so independent fetches overlap; only the group chat feed
//! is tracked so that leaving a group can abort it.

use std::{sync::Arc, thread};

use client_core::{ApiHandle, ClientError, ClientSettings, InventHubClient, ModelDownload};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::GroupId;
use tokio::task::JoinHandle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    CreateForm, Created, ListScope, ModelKey, UiError, UiErrorContext, UiEvent,
};
use crate::media;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("inventhub-backend")
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Startup,
                    format!("backend worker startup failure: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let client = match InventHubClient::new(&settings) {
                Ok(client) => client,
                Err(err) => {
                    tracing::error!(backend_url = %settings.backend_url, "cannot build api client: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::Startup,
                        &err,
                        "Backend URL is not usable",
                    )));
                    return;
                }
            };
            tracing::info!(api_base = client.api_base(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!("Using backend {}", client.api_base())));
            run_worker(Arc::new(client), cmd_rx, ui_tx).await;
        });
        tracing::info!("backend worker stopped");
    });
}

async fn run_worker(
    api: Arc<dyn ApiHandle>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let mut chat_task: Option<JoinHandle<()>> = None;
    while let Ok(cmd) = cmd_rx.recv() {
        tracing::debug!(command = cmd.name(), "backend: command received");
        match cmd {
            BackendCommand::OpenGroupChat { group_id } => {
                if let Some(task) = chat_task.take() {
                    task.abort();
                }
                chat_task = Some(tokio::spawn(run_group_chat(
                    api.clone(),
                    group_id,
                    ui_tx.clone(),
                )));
            }
            BackendCommand::CloseGroupChat => {
                if let Some(task) = chat_task.take() {
                    task.abort();
                    tracing::info!("backend: group chat closed");
                }
            }
            cmd => {
                let api = api.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    if let Some(event) = execute(api.as_ref(), cmd).await {
                        if ui_tx.try_send(event).is_err() {
                            tracing::warn!("backend: ui event queue full or closed; dropping event");
                        }
                    }
                });
            }
        }
    }
    if let Some(task) = chat_task.take() {
        task.abort();
    }
}

async fn run_group_chat(api: Arc<dyn ApiHandle>, group_id: GroupId, ui_tx: Sender<UiEvent>) {
    tracing::info!(group_id = %group_id, "backend: opening group chat");
    let feed = api.open_group_chat(&group_id).await;

    match api.list_chat_messages(&group_id).await {
        Ok(messages) => {
            let _ = ui_tx.try_send(UiEvent::ChatHistoryLoaded {
                group_id: group_id.clone(),
                messages,
            });
        }
        Err(err) => {
            let _ = ui_tx.try_send(failure(UiErrorContext::Chat, &err, "Could not load chat history"));
        }
    }

    let mut feed = match feed {
        Ok(feed) => feed,
        Err(err) => {
            let _ = ui_tx.try_send(failure(UiErrorContext::Chat, &err, "Live chat unavailable"));
            let _ = ui_tx.try_send(UiEvent::ChatClosed { group_id });
            return;
        }
    };
    while let Some(message) = feed.next_message().await {
        if ui_tx.try_send(UiEvent::ChatMessageReceived(message)).is_err() {
            tracing::warn!(group_id = %group_id, "backend: dropping live chat message");
        }
    }
    let _ = ui_tx.try_send(UiEvent::ChatClosed { group_id });
}

fn failure(context: UiErrorContext, err: &ClientError, fallback: &str) -> UiEvent {
    tracing::error!(context = ?context, "backend: {fallback}: {err}");
    UiEvent::Error(UiError::from_client_error(context, err, fallback))
}

fn model_file_name(model_file_path: &str) -> &str {
    model_file_path
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(model_file_path)
}

/// Fetches within the preview limit and decodes on the blocking pool.
async fn load_model(api: &dyn ApiHandle, key: ModelKey) -> UiEvent {
    let bytes = match api
        .download_model(&key.model_file_path, client_core::MAX_PREVIEW_BYTES)
        .await
    {
        Ok(ModelDownload::Complete(bytes)) => bytes,
        Ok(ModelDownload::TooLarge { limit }) => return UiEvent::ModelTooLarge { key, limit },
        Err(err) => {
            let error = UiError::from_client_error(UiErrorContext::Viewer, &err, "Could not load model");
            return UiEvent::ModelFailed { key, error };
        }
    };
    let file_name = model_file_name(&key.model_file_path).to_string();
    let decoded = tokio::task::spawn_blocking(move || media::decode_model(&file_name, &bytes)).await;
    let message = match decoded {
        Ok(Ok(mesh)) => {
            return UiEvent::ModelLoaded {
                key,
                mesh: Arc::new(mesh),
            }
        }
        Ok(Err(err)) => {
            tracing::warn!(path = %key.model_file_path, "backend: model decode failed: {err}");
            format!("Cannot preview model: {err}")
        }
        Err(err) => format!("model decoder stopped: {err}"),
    };
    UiEvent::ModelFailed {
        key,
        error: UiError::from_message(UiErrorContext::Viewer, message),
    }
}

/// Runs one request command to completion. Chat control commands are owned
/// by the worker loop and yield nothing here.
pub(crate) async fn execute(api: &dyn ApiHandle, cmd: BackendCommand) -> Option<UiEvent> {
    let event = match cmd {
        BackendCommand::LoadInventions { filters } => {
            let scope = if filters.is_empty() {
                ListScope::All
            } else {
                ListScope::Filtered
            };
            match api.list_inventions(&filters).await {
                Ok(inventions) => UiEvent::InventionsLoaded { scope, inventions },
                Err(err) => failure(UiErrorContext::InitialLoad, &err, "Could not load inventions"),
            }
        }
        BackendCommand::LoadPublicInventions => match api.list_public_inventions().await {
            Ok(inventions) => UiEvent::InventionsLoaded {
                scope: ListScope::Filtered,
                inventions,
            },
            Err(err) => failure(UiErrorContext::Widget, &err, "Could not load public inventions"),
        },
        BackendCommand::SearchInventions { query } => match api.search_inventions(&query).await {
            Ok(inventions) => UiEvent::InventionsLoaded {
                scope: ListScope::Filtered,
                inventions,
            },
            Err(err) => failure(UiErrorContext::Widget, &err, "Search failed"),
        },
        BackendCommand::RefreshInvention { invention_id } => {
            match api.get_invention(&invention_id).await {
                Ok(invention) => UiEvent::InventionRefreshed(invention),
                Err(err) => failure(UiErrorContext::Widget, &err, "Could not refresh invention"),
            }
        }
        BackendCommand::LoadGroups => match api.list_groups().await {
            Ok(groups) => UiEvent::GroupsLoaded(groups),
            Err(err) => failure(UiErrorContext::InitialLoad, &err, "Could not load groups"),
        },
        BackendCommand::LoadSuggestions => match api.list_suggestions().await {
            Ok(suggestions) => UiEvent::SuggestionsLoaded(suggestions),
            Err(err) => failure(UiErrorContext::InitialLoad, &err, "Could not load suggestions"),
        },
        BackendCommand::LoadUsers => match api.list_users().await {
            Ok(users) => UiEvent::UsersLoaded(users),
            Err(err) => failure(UiErrorContext::InitialLoad, &err, "Could not load users"),
        },
        BackendCommand::LoadMentors => match api.list_mentors().await {
            Ok(mentors) => UiEvent::MentorsLoaded(mentors),
            Err(err) => failure(UiErrorContext::InitialLoad, &err, "Could not load mentors"),
        },

        BackendCommand::CreateInvention(payload) => match api.create_invention(&payload).await {
            Ok(created) => UiEvent::Created(Created::Invention(created)),
            Err(err) => failure(
                UiErrorContext::Create(CreateForm::Invention),
                &err,
                "Could not create invention",
            ),
        },
        BackendCommand::CreateGroup(payload) => match api.create_group(&payload).await {
            Ok(created) => UiEvent::Created(Created::Group(created)),
            Err(err) => failure(
                UiErrorContext::Create(CreateForm::Group),
                &err,
                "Could not create group",
            ),
        },
        BackendCommand::CreateSuggestion(payload) => match api.create_suggestion(&payload).await {
            Ok(created) => UiEvent::Created(Created::Suggestion(created)),
            Err(err) => failure(
                UiErrorContext::Create(CreateForm::Suggestion),
                &err,
                "Could not post suggestion",
            ),
        },
        BackendCommand::CreateUser(payload) => match api.create_user(&payload).await {
            Ok(created) => UiEvent::Created(Created::User(created)),
            Err(err) => failure(
                UiErrorContext::Create(CreateForm::UserProfile),
                &err,
                "Could not create profile",
            ),
        },
        BackendCommand::RequestMentorship(payload) => {
            match api.create_mentorship_request(&payload).await {
                Ok(created) => UiEvent::Created(Created::MentorshipRequest(created)),
                Err(err) => failure(
                    UiErrorContext::Mentorship,
                    &err,
                    "Mentorship request failed. Please try again.",
                ),
            }
        }

        BackendCommand::VoteInvention { invention_id, vote } => {
            match api.vote_invention(&invention_id, &vote).await {
                Ok(()) => UiEvent::InventionVoted { invention_id },
                Err(err) => failure(UiErrorContext::Widget, &err, "Vote failed"),
            }
        }
        BackendCommand::RateInvention {
            invention_id,
            rating,
        } => match api.rate_invention(&invention_id, &rating).await {
            Ok(()) => UiEvent::InventionRated { invention_id },
            Err(err) => failure(UiErrorContext::Widget, &err, "Rating failed"),
        },
        BackendCommand::UploadModel {
            invention_id,
            model,
        } => match api.upload_model(&invention_id, &model).await {
            Ok(response) => {
                tracing::info!(invention_id = %invention_id, "backend: model uploaded");
                UiEvent::ModelUploaded {
                    invention_id,
                    response,
                }
            }
            Err(err) => failure(UiErrorContext::Upload, &err, "Upload failed"),
        },
        BackendCommand::LoadModel(key) => load_model(api, key).await,

        BackendCommand::LoadComments { invention_id } => {
            match api.list_comments(&invention_id).await {
                Ok(comments) => UiEvent::CommentsLoaded {
                    invention_id,
                    comments,
                },
                Err(err) => failure(UiErrorContext::Widget, &err, "Could not load comments"),
            }
        }
        BackendCommand::PostComment(payload) => match api.create_comment(&payload).await {
            Ok(_) => UiEvent::CommentPosted {
                invention_id: payload.invention_id,
            },
            Err(err) => failure(UiErrorContext::Comment, &err, "Could not post comment"),
        },
        BackendCommand::SubmitPeerReview {
            review_id,
            submission,
        } => {
            let saved = match &review_id {
                Some(review_id) => api.update_peer_review(review_id, &submission).await,
                None => api.create_peer_review(&submission).await,
            };
            match saved {
                Ok(review) => UiEvent::PeerReviewSaved(review),
                Err(err) => failure(UiErrorContext::Review, &err, "Could not save peer review"),
            }
        }
        BackendCommand::VoteSuggestion { suggestion_id } => {
            match api.vote_suggestion(&suggestion_id).await {
                Ok(()) => UiEvent::SuggestionVoted,
                Err(err) => failure(UiErrorContext::Widget, &err, "Suggestion vote failed"),
            }
        }

        BackendCommand::SendChatMessage(payload) => match api.send_chat_message(&payload).await {
            Ok(message) => UiEvent::ChatMessageSent(message),
            Err(err) => failure(UiErrorContext::Chat, &err, "Message not sent"),
        },
        BackendCommand::OpenGroupChat { .. } | BackendCommand::CloseGroupChat => return None,
    };
    Some(event)
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
