use std::{
    collections::HashMap,
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use super::*;
use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocketUpgrade},
        Multipart, Path, RawQuery, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use shared::domain::VoteKind;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct MockBackend {
    inventions: Vec<Invention>,
    last_list_query: Option<Option<String>>,
    last_search_query: Option<String>,
    votes: HashMap<(String, String), VoteKind>,
    uploads: Vec<(String, String, usize)>,
    reviews: Vec<(String, PeerReviewSubmission)>,
    mentor_query: Option<String>,
    reject_uploads_with: Option<String>,
}

#[derive(Clone)]
struct MockState {
    backend: Arc<Mutex<MockBackend>>,
    hits: Arc<AtomicUsize>,
}

fn invention_json(id: &str, payload: &InventionCreate) -> Invention {
    Invention {
        id: InventionId::new(id),
        title: payload.title.clone(),
        description: payload.description.clone(),
        creator_id: None,
        creator_name: payload.creator_name.clone(),
        is_public: payload.is_public,
        tags: payload.tags.clone(),
        category: payload.category,
        difficulty: payload.difficulty,
        cost_range: payload.cost_range,
        development_stage: payload.development_stage,
        seeking_collaboration: payload.seeking_collaboration,
        seeking_mentorship: payload.seeking_mentorship,
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

async fn list_inventions_route(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
) -> Json<Vec<Invention>> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut backend = state.backend.lock().await;
    backend.last_list_query = Some(query);
    Json(backend.inventions.clone())
}

async fn search_route(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
) -> Json<Vec<Invention>> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut backend = state.backend.lock().await;
    backend.last_search_query = query;
    Json(backend.inventions.clone())
}

async fn create_invention_route(
    State(state): State<MockState>,
    Json(payload): Json<InventionCreate>,
) -> Json<Invention> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let created = invention_json(&uuid::Uuid::new_v4().to_string(), &payload);
    state.backend.lock().await.inventions.insert(0, created.clone());
    Json(created)
}

async fn get_invention_route(
    State(state): State<MockState>,
    Path(invention_id): Path<String>,
) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let backend = state.backend.lock().await;
    let Some(mut invention) = backend
        .inventions
        .iter()
        .find(|invention| invention.id.as_str() == invention_id)
        .cloned()
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Invention not found"})),
        )
            .into_response();
    };
    let votes = backend
        .votes
        .iter()
        .filter(|((id, _), _)| *id == invention_id);
    invention.upvotes = votes.clone().filter(|(_, kind)| **kind == VoteKind::Up).count() as i64;
    invention.downvotes = votes.filter(|(_, kind)| **kind == VoteKind::Down).count() as i64;
    Json(invention).into_response()
}

async fn vote_route(
    State(state): State<MockState>,
    Path(invention_id): Path<String>,
    Json(vote): Json<VoteRequest>,
) -> Json<serde_json::Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state
        .backend
        .lock()
        .await
        .votes
        .insert((invention_id, vote.voter_name), vote.vote_type);
    Json(serde_json::json!({"message": "Vote recorded"}))
}

async fn upload_route(
    State(state): State<MockState>,
    Path(invention_id): Path<String>,
    mut multipart: Multipart,
) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if let Some(detail) = state.backend.lock().await.reject_uploads_with.clone() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response();
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();
        let path = format!("/app/backend/uploads/{invention_id}_{file_name}");
        state
            .backend
            .lock()
            .await
            .uploads
            .push((invention_id.clone(), file_name, bytes.len()));
        return Json(serde_json::json!({
            "message": "Model uploaded successfully",
            "file_path": path,
        }))
        .into_response();
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"detail": [{"msg": "field required"}]})),
    )
        .into_response()
}

fn review_from(id: &str, payload: &PeerReviewSubmission) -> PeerReview {
    PeerReview {
        id: ReviewId::new(id),
        invention_id: payload.invention_id.clone(),
        reviewer_name: payload.reviewer_name.clone(),
        innovation_score: payload.innovation_score,
        feasibility_score: payload.feasibility_score,
        impact_score: payload.impact_score,
        strengths: payload.strengths.clone(),
        improvements: payload.improvements.clone(),
        comments: payload.comments.clone(),
        created_at: None,
    }
}

async fn create_review_route(
    State(state): State<MockState>,
    Json(payload): Json<PeerReviewSubmission>,
) -> Json<PeerReview> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut backend = state.backend.lock().await;
    backend.reviews.push(("POST".to_string(), payload.clone()));
    Json(review_from("review-1", &payload))
}

async fn update_review_route(
    State(state): State<MockState>,
    Path(review_id): Path<String>,
    Json(payload): Json<PeerReviewSubmission>,
) -> Json<PeerReview> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut backend = state.backend.lock().await;
    backend.reviews.push((format!("PUT {review_id}"), payload.clone()));
    Json(review_from(&review_id, &payload))
}

async fn users_route(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.backend.lock().await.mentor_query = query.clone();
    if query.as_deref() == Some("is_mentor=true") {
        Json(serde_json::json!([
            {"id": "u2", "username": "grace", "is_mentor": true, "skills": ["compilers"]}
        ]))
    } else {
        Json(serde_json::json!([
            {"id": "u1", "username": "ada"},
            {"id": "u2", "username": "grace", "is_mentor": true}
        ]))
    }
}

async fn asset_route(Path(file): Path<String>) -> axum::response::Response {
    match file.as_str() {
        "inv-1_cube.stl" => (StatusCode::OK, b"solid cube\nendsolid cube\n".to_vec()).into_response(),
        "inv-2_engine.stl" => (StatusCode::OK, vec![0u8; 4096]).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn public_inventions_route(State(state): State<MockState>) -> Json<Vec<Invention>> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let backend = state.backend.lock().await;
    Json(
        backend
            .inventions
            .iter()
            .filter(|invention| invention.is_public)
            .cloned()
            .collect(),
    )
}

async fn chat_ws_route(
    Path(group_id): Path<String>,
    ws: WebSocketUpgrade,
) -> axum::response::Response {
    ws.on_upgrade(move |mut socket| async move {
        let first = serde_json::json!({
            "id": "m1", "group_id": group_id, "sender_name": "ada", "message": "hello",
            "timestamp": "2024-05-01T12:00:00.000001"
        });
        let other_group = serde_json::json!({
            "id": "m2", "group_id": "someone-else", "sender_name": "bo", "message": "psst"
        });
        let second = serde_json::json!({
            "id": "m3", "group_id": group_id, "sender_name": "grace", "message": "hi ada"
        });
        let _ = socket.send(WsMessage::Text(first.to_string())).await;
        let _ = socket.send(WsMessage::Text("not json".to_string())).await;
        let _ = socket.send(WsMessage::Text(other_group.to_string())).await;
        let _ = socket.send(WsMessage::Text(second.to_string())).await;
        let _ = socket.send(WsMessage::Close(None)).await;
    })
}

async fn spawn_mock_backend() -> anyhow::Result<(String, MockState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState {
        backend: Arc::new(Mutex::new(MockBackend::default())),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route(
            "/api/inventions",
            get(list_inventions_route).post(create_invention_route),
        )
        .route("/api/inventions/search", get(search_route))
        .route("/api/inventions/public", get(public_inventions_route))
        .route("/api/inventions/:invention_id", get(get_invention_route))
        .route("/api/inventions/:invention_id/vote", post(vote_route))
        .route("/api/inventions/:invention_id/upload-model", post(upload_route))
        .route("/api/peer-reviews", post(create_review_route))
        .route("/api/peer-reviews/:review_id", put(update_review_route))
        .route("/api/users", get(users_route))
        .route("/api/ws/:group_id", get(chat_ws_route))
        .route("/uploads/:file", get(asset_route))
        .layer(axum::extract::DefaultBodyLimit::disable())
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api"), state))
}

fn sample_create() -> InventionCreate {
    InventionCreate {
        title: "X".into(),
        description: "Y".into(),
        creator_name: "Z".into(),
        is_public: true,
        tags: Vec::new(),
        ..Default::default()
    }
}

#[tokio::test]
async fn list_inventions_sends_no_query_for_empty_filters() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    client
        .list_inventions(&InventionFilters::default())
        .await
        .expect("list");

    let backend = state.backend.lock().await;
    assert_eq!(backend.last_list_query, Some(None));
}

#[tokio::test]
async fn list_inventions_serializes_only_set_filters() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let filters = InventionFilters {
        category: Some(shared::domain::Category::Science),
        tag: " solar ".into(),
        seeking_mentorship: Some(true),
        seeking_collaboration: None,
        sort_by: Some(shared::domain::SortKey::MostVoted),
    };
    client.list_inventions(&filters).await.expect("list");

    let backend = state.backend.lock().await;
    assert_eq!(
        backend.last_list_query,
        Some(Some(
            "category=science&tag=solar&seeking_mentorship=true&sort_by=most_voted".to_string()
        ))
    );
}

#[tokio::test]
async fn search_passes_query_as_q_parameter() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    client.search_inventions("solar kettle").await.expect("search");

    let backend = state.backend.lock().await;
    assert_eq!(backend.last_search_query.as_deref(), Some("q=solar+kettle"));
}

#[tokio::test]
async fn create_invention_returns_public_record() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let created = client
        .create_invention(&sample_create())
        .await
        .expect("create");

    assert_eq!(created.title, "X");
    assert_eq!(created.description, "Y");
    assert_eq!(created.creator_name, "Z");
    assert!(created.is_public);
    assert!(created.tags.is_empty());

    let listed = client
        .list_inventions(&InventionFilters::default())
        .await
        .expect("list");
    assert_eq!(listed.first().map(|invention| &invention.id), Some(&created.id));
}

#[tokio::test]
async fn second_vote_replaces_first_in_server_tally() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");
    let created = client
        .create_invention(&sample_create())
        .await
        .expect("create");

    for vote_type in [VoteKind::Up, VoteKind::Down] {
        client
            .vote_invention(
                &created.id,
                &VoteRequest {
                    vote_type,
                    voter_name: "ada".into(),
                },
            )
            .await
            .expect("vote");
    }

    let refreshed = client.get_invention(&created.id).await.expect("refresh");
    assert_eq!(refreshed.upvotes, 0);
    assert_eq!(refreshed.downvotes, 1);
}

#[tokio::test]
async fn missing_invention_maps_to_api_error_with_detail() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let err = client
        .get_invention(&InventionId::new("nope"))
        .await
        .expect_err("must be missing");
    match err {
        ClientError::Api { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail.as_deref(), Some("Invention not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn upload_streams_single_file_as_multipart() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cube.stl");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(b"solid cube\nendsolid cube\n").expect("write");
    drop(file);

    let model = upload::select_single_model(&[path]).expect("valid");
    let response = client
        .upload_model(&InventionId::new("inv-1"), &model)
        .await
        .expect("upload");

    assert_eq!(response.message, "Model uploaded successfully");
    assert_eq!(
        response.file_path.as_deref(),
        Some("/app/backend/uploads/inv-1_cube.stl")
    );
    let backend = state.backend.lock().await;
    assert_eq!(
        backend.uploads,
        vec![("inv-1".to_string(), "cube.stl".to_string(), 25)]
    );
}

#[tokio::test]
async fn upload_failure_surfaces_server_detail() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    state.backend.lock().await.reject_uploads_with =
        Some("File too large. Maximum size is 10GB".to_string());
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part.obj");
    std::fs::write(&path, b"v 0 0 0\n").expect("write");
    let model = upload::select_single_model(&[path]).expect("valid");

    let err = client
        .upload_model(&InventionId::new("inv-1"), &model)
        .await
        .expect_err("server rejects");
    assert_eq!(
        err.user_message("Upload failed"),
        "File too large. Maximum size is 10GB"
    );
}

#[tokio::test]
async fn oversized_file_never_reaches_the_network() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("huge.glb");
    let file = std::fs::File::create(&path).expect("create");
    file.set_len(upload::MAX_MODEL_UPLOAD_BYTES + 1)
        .expect("sparse file");
    drop(file);

    let rejection = upload::select_single_model(&[path.clone()]).expect_err("too large");
    assert!(matches!(rejection, UploadRejection::TooLarge { .. }));

    // Even a stale handle is re-checked before streaming.
    let stale = ModelFile {
        path,
        file_name: "huge.glb".into(),
        size_bytes: 1,
        format: ModelFormat::Glb,
        mime_type: "model/gltf-binary".into(),
    };
    let err = client
        .upload_model(&InventionId::new("inv-1"), &stale)
        .await
        .expect_err("rejected locally");
    assert!(matches!(
        err,
        ClientError::Upload(UploadRejection::TooLarge { .. })
    ));
    assert_eq!(state.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn peer_review_is_created_then_updated_by_id() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let mut submission = PeerReviewSubmission {
        invention_id: InventionId::new("inv-1"),
        reviewer_name: "grace".into(),
        innovation_score: 8,
        feasibility_score: 6,
        impact_score: 9,
        strengths: "clever".into(),
        improvements: String::new(),
        comments: String::new(),
    };
    let created = client
        .create_peer_review(&submission)
        .await
        .expect("create review");
    submission.feasibility_score = 7;
    let updated = client
        .update_peer_review(&created.id, &submission)
        .await
        .expect("update review");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.feasibility_score, 7);
    let backend = state.backend.lock().await;
    let verbs: Vec<&str> = backend.reviews.iter().map(|(verb, _)| verb.as_str()).collect();
    assert_eq!(verbs, vec!["POST", "PUT review-1"]);
}

#[tokio::test]
async fn mentors_are_requested_with_is_mentor_flag() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let mentors = client.list_mentors().await.expect("mentors");
    assert_eq!(mentors.len(), 1);
    assert!(mentors[0].is_mentor);
    assert_eq!(
        state.backend.lock().await.mentor_query.as_deref(),
        Some("is_mentor=true")
    );

    let users = client.list_users().await.expect("users");
    assert_eq!(users.len(), 2);
}

#[test]
fn model_asset_url_maps_server_paths_to_uploads_mount() {
    let client = InventHubClient::with_api_base("http://127.0.0.1:8001/api").expect("client");
    assert_eq!(
        client
            .model_asset_url("/app/backend/uploads/inv-1_cube model.stl")
            .expect("url"),
        "http://127.0.0.1:8001/uploads/inv-1_cube%20model.stl"
    );
    assert_eq!(
        client.model_asset_url("inv-1_cube.stl").expect("url"),
        "http://127.0.0.1:8001/uploads/inv-1_cube.stl"
    );
    assert_eq!(
        client
            .model_asset_url("https://cdn.example.com/m.glb")
            .expect("url"),
        "https://cdn.example.com/m.glb"
    );
    assert!(client.model_asset_url("   ").is_err());
}

#[tokio::test]
async fn download_model_fetches_static_asset() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let download = client
        .download_model("/app/backend/uploads/inv-1_cube.stl", MAX_PREVIEW_BYTES)
        .await
        .expect("download");
    let ModelDownload::Complete(bytes) = download else {
        panic!("expected the full asset, got {download:?}");
    };
    assert!(bytes.starts_with(b"solid cube"));
}

#[tokio::test]
async fn download_model_stops_at_the_preview_limit() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let capped = client
        .download_model("/app/backend/uploads/inv-2_engine.stl", 1024)
        .await
        .expect("download");
    assert_eq!(capped, ModelDownload::TooLarge { limit: 1024 });

    let whole = client
        .download_model("/app/backend/uploads/inv-2_engine.stl", 4096)
        .await
        .expect("download");
    assert!(matches!(whole, ModelDownload::Complete(bytes) if bytes.len() == 4096));
}

#[tokio::test]
async fn public_listing_uses_its_own_endpoint() {
    let (api_base, state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let mut hidden = sample_create();
    hidden.is_public = false;
    client.create_invention(&sample_create()).await.expect("create");
    client.create_invention(&hidden).await.expect("create");

    let public = client.list_public_inventions().await.expect("list");
    assert_eq!(public.len(), 1);
    assert!(public[0].is_public);
    assert!(state.backend.lock().await.last_list_query.is_none());
}

#[tokio::test]
async fn group_chat_feed_skips_malformed_and_foreign_frames() {
    let (api_base, _state) = spawn_mock_backend().await.expect("spawn backend");
    let client = InventHubClient::with_api_base(api_base).expect("client");

    let mut feed = client
        .open_group_chat(&GroupId::new("g-1"))
        .await
        .expect("connect");
    assert_eq!(feed.group_id().as_str(), "g-1");

    let first = feed.next_message().await.expect("first message");
    let second = feed.next_message().await.expect("second message");
    assert_eq!(first.message, "hello");
    assert_eq!(second.sender_name, "grace");
    assert!(feed.next_message().await.is_none());
}
