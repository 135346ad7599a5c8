use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    Category, CommentId, CostRange, DevelopmentStage, Difficulty, GroupId, InventionId, MessageId,
    MentorshipRequestId, ReviewId, SuggestionId, UserId, VoteKind,
};

/// The backend emits naive UTC timestamps (`2024-05-01T12:00:00.123456`)
/// as well as RFC 3339 ones, depending on the route.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invention {
    pub id: InventionId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub creator_id: Option<UserId>,
    pub creator_name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_range: Option<CostRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_stage: Option<DevelopmentStage>,
    #[serde(default)]
    pub seeking_collaboration: bool,
    #[serde(default)]
    pub seeking_mentorship: bool,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invention {
    pub fn net_votes(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn has_model(&self) -> bool {
        self.model_file_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventionCreate {
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub is_public: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_range: Option<CostRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_stage: Option<DevelopmentStage>,
    pub seeking_collaboration: bool,
    pub seeking_mentorship: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub invention_id: InventionId,
    pub author_name: String,
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentCreate {
    pub invention_id: InventionId,
    pub author_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub vote_type: VoteKind,
    pub voter_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
    pub rater_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReview {
    pub id: ReviewId,
    pub invention_id: InventionId,
    pub reviewer_name: String,
    pub innovation_score: u8,
    pub feasibility_score: u8,
    pub impact_score: u8,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReviewSubmission {
    pub invention_id: InventionId,
    pub reviewer_name: String,
    pub innovation_score: u8,
    pub feasibility_score: u8,
    pub impact_score: u8,
    pub strengths: String,
    pub improvements: String,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invention_id: Option<InventionId>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub creator_id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupCreate {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invention_id: Option<InventionId>,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub group_id: GroupId,
    pub sender_name: String,
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageCreate {
    pub group_id: GroupId,
    pub sender_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub title: String,
    pub description: String,
    pub technology_area: String,
    pub suggested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspiration_source: Option<String>,
    #[serde(default)]
    pub votes: i64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionCreate {
    pub title: String,
    pub description: String,
    pub technology_area: String,
    pub suggested_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub is_mentor: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub skills: Vec<String>,
    pub is_mentor: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: MentorshipRequestId,
    pub student_name: String,
    pub mentor_name: String,
    pub subject: String,
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorshipRequestCreate {
    pub student_name: String,
    pub mentor_name: String,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_invention_from_minimal_backend_record() {
        let raw = r#"{
            "id": "4f1c",
            "title": "Solar kettle",
            "description": "Boils water with sunlight",
            "creator_id": "user_1a2b3c4d",
            "creator_name": "Ada",
            "model_file_path": null,
            "model_file_name": null,
            "is_public": true,
            "tags": ["solar"],
            "created_at": "2024-05-01T12:00:00.123456",
            "updated_at": "2024-05-01T12:00:00.123456"
        }"#;
        let invention: Invention = serde_json::from_str(raw).expect("decode");
        assert_eq!(invention.id.as_str(), "4f1c");
        assert!(invention.is_public);
        assert_eq!(invention.upvotes, 0);
        assert!(!invention.has_model());
        assert!(invention.created_at.is_some());
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let raw = r#"{"id":"c1","invention_id":"i1","author_name":"Bo","content":"neat",
            "created_at":"2024-05-01T12:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(raw).expect("decode");
        assert!(comment.created_at.is_some());
    }

    #[test]
    fn invention_create_omits_unset_enums() {
        let payload = InventionCreate {
            title: "X".into(),
            description: "Y".into(),
            creator_name: "Z".into(),
            is_public: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).expect("encode");
        assert_eq!(value["title"], "X");
        assert_eq!(value["is_public"], true);
        assert_eq!(value["tags"], serde_json::json!([]));
        assert!(value.get("category").is_none());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut user: User =
            serde_json::from_str(r#"{"id":"u1","username":"ada"}"#).expect("decode");
        assert_eq!(user.display_name(), "ada");
        user.full_name = Some("Ada Lovelace".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }
}
