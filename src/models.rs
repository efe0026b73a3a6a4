//! Wire models for the Chirp API.
//!
//! All structs mirror the JSON shapes the backend produces. Field names are
//! camelCase on the wire and snake_case here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum length of a post or comment body, enforced server-side.
pub const CONTENT_CHAR_LIMIT: usize = 282;

/// The direction of a vote on a post.
///
/// "No vote" is modeled as `Option<VoteKind>` everywhere; the transport
/// removes a vote with a DELETE rather than sending a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VoteKind {
    Up,
    Down,
}

impl TryFrom<u8> for VoteKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteKind::Up),
            1 => Ok(VoteKind::Down),
            other => Err(format!("unknown vote kind: {}", other)),
        }
    }
}

impl From<VoteKind> for u8 {
    fn from(kind: VoteKind) -> u8 {
        match kind {
            VoteKind::Up => 0,
            VoteKind::Down => 1,
        }
    }
}

/// User role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::User),
            1 => Ok(Role::Moderator),
            2 => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> u8 {
        match role {
            Role::User => 0,
            Role::Moderator => 1,
            Role::Admin => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
    Male,
    Female,
    Other,
    NoAnswer,
}

impl TryFrom<u8> for Gender {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gender::Male),
            1 => Ok(Gender::Female),
            2 => Ok(Gender::Other),
            3 => Ok(Gender::NoAnswer),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> u8 {
        match gender {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
            Gender::NoAnswer => 3,
        }
    }
}

/// The author reference embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl Author {
    /// Display name if set, otherwise `@username`.
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{} (@{})", name, self.username),
            None => format!("@{}", self.username),
        }
    }
}

/// A post as returned by the feed and single-post endpoints.
///
/// Counts and the viewer's vote are authoritative server values; the client
/// only overwrites them from server responses, except for the optimistic
/// placeholder the vote reconciler applies while a request is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub upvote_count: u32,
    pub downvote_count: u32,
    pub comment_count: u32,
    /// The viewer's current vote; `None` when not voted or not logged in.
    #[serde(default)]
    pub vote: Option<VoteKind>,
    /// Whether the viewer has commented on this post.
    #[serde(default)]
    pub commented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

/// Server response to a vote set/remove request. Counts are authoritative
/// and replace whatever the client guessed optimistically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdate {
    pub post_id: i64,
    pub upvote_count: u32,
    pub downvote_count: u32,
    pub user_id: i64,
    #[serde(default, rename = "voteType")]
    pub vote: Option<VoteKind>,
}

/// A user as returned by search and follower lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// The public profile view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
    pub follower_count: u32,
    pub following_count: u32,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Whether the viewer follows this user; `None` when anonymous or
    /// viewing their own profile.
    #[serde(default)]
    pub follow: Option<bool>,
}

/// The private account view, only available for the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// PATCH body for updating account data. `None` fields are left untouched
/// server-side, so they are omitted from the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// Filter parameters for the moderation user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub username: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_roles: Vec<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genders: Vec<Gender>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_genders: Vec<Gender>,
}

/// Envelope returned by the register endpoint.
///
/// Registration failures are reported inside a 200 response rather than an
/// error status; `error` is the structured code when `success` is false.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<crate::error::DomainError>,
}

/// Result of an admin SQL console execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseOperation {
    pub has_result: bool,
    #[serde(default)]
    pub affected_rows: Option<u64>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default, rename = "result")]
    pub rows: Option<Vec<Vec<String>>>,
}

/// Per-day counters from the statistics endpoints, keyed by day.
pub type TimeSeries = BTreeMap<NaiveDate, u64>;

/// Convert the `{ "<datetime>": n }` wire object into a [`TimeSeries`].
///
/// The backend has emitted both bare dates and full datetimes for these
/// keys; both forms are accepted. Entries sharing a day are summed.
pub fn time_series_from_wire(
    wire: BTreeMap<String, u64>,
) -> Result<TimeSeries, chrono::ParseError> {
    let mut series = TimeSeries::new();
    for (key, count) in wire {
        let day = parse_wire_day(&key)?;
        *series.entry(day).or_insert(0) += count;
    }
    Ok(series)
}

fn parse_wire_day(key: &str) -> Result<NaiveDate, chrono::ParseError> {
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(key) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(key, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_author() -> Author {
        Author {
            id: 7,
            username: "ada".to_string(),
            display_name: Some("Ada L.".to_string()),
            profile_image_url: None,
        }
    }

    #[test]
    fn post_deserializes_from_wire_shape() {
        let json = r#"{
            "id": 42,
            "content": "hello world",
            "author": {"id": 7, "username": "ada", "displayName": "Ada L."},
            "createdAt": "2024-03-01T12:00:00Z",
            "upvoteCount": 5,
            "downvoteCount": 1,
            "commentCount": 3,
            "vote": 0,
            "commented": true
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 42);
        assert_eq!(post.author.username, "ada");
        assert_eq!(post.vote, Some(VoteKind::Up));
        assert!(post.commented);
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn post_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 1,
            "content": "short",
            "author": {"id": 2, "username": "bob"},
            "createdAt": "2024-01-01T00:00:00Z",
            "upvoteCount": 0,
            "downvoteCount": 0,
            "commentCount": 0
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.vote, None);
        assert!(!post.commented);
        assert_eq!(post.image_url, None);
    }

    #[test]
    fn vote_kind_round_trips_as_number() {
        assert_eq!(serde_json::to_string(&VoteKind::Up).unwrap(), "0");
        assert_eq!(serde_json::to_string(&VoteKind::Down).unwrap(), "1");
        let down: VoteKind = serde_json::from_str("1").unwrap();
        assert_eq!(down, VoteKind::Down);
        assert!(serde_json::from_str::<VoteKind>("9").is_err());
    }

    #[test]
    fn vote_update_reads_vote_type_field() {
        let json = r#"{
            "postId": 42,
            "upvoteCount": 6,
            "downvoteCount": 2,
            "userId": 7,
            "voteType": 1
        }"#;
        let update: VoteUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.vote, Some(VoteKind::Down));

        let json_null = r#"{"postId": 1, "upvoteCount": 0, "downvoteCount": 0, "userId": 7, "voteType": null}"#;
        let update: VoteUpdate = serde_json::from_str(json_null).unwrap();
        assert_eq!(update.vote, None);
    }

    #[test]
    fn author_label_prefers_display_name() {
        assert_eq!(sample_author().label(), "Ada L. (@ada)");
        let plain = Author {
            display_name: None,
            ..sample_author()
        };
        assert_eq!(plain.label(), "@ada");
    }

    #[test]
    fn user_data_update_omits_unset_fields() {
        let update = UserDataUpdate {
            display_name: Some("New Name".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"displayName":"New Name"}"#);
    }

    #[test]
    fn role_round_trips_as_number() {
        let profile_json = r#"{
            "id": 1,
            "createdAt": "2023-06-01T00:00:00Z",
            "username": "mod",
            "role": 1,
            "followerCount": 10,
            "followingCount": 2
        }"#;
        let profile: UserProfile = serde_json::from_str(profile_json).unwrap();
        assert_eq!(profile.role, Role::Moderator);
        assert_eq!(profile.follow, None);
    }

    #[test]
    fn time_series_accepts_dates_and_datetimes() {
        let mut wire = BTreeMap::new();
        wire.insert("2024-02-01".to_string(), 3u64);
        wire.insert("2024-02-02T00:00:00".to_string(), 5u64);
        wire.insert("2024-02-03T10:30:00Z".to_string(), 7u64);

        let series = time_series_from_wire(wire).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[&NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()], 5);
    }

    #[test]
    fn time_series_sums_same_day_entries() {
        let mut wire = BTreeMap::new();
        wire.insert("2024-02-01T01:00:00".to_string(), 2u64);
        wire.insert("2024-02-01T02:00:00".to_string(), 3u64);
        let series = time_series_from_wire(wire).unwrap();
        assert_eq!(series[&NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()], 5);
    }

    #[test]
    fn time_series_rejects_garbage_keys() {
        let mut wire = BTreeMap::new();
        wire.insert("not a date".to_string(), 1u64);
        assert!(time_series_from_wire(wire).is_err());
    }

    #[test]
    fn database_operation_wire_shape() {
        let json = r#"{
            "hasResult": true,
            "affectedRows": null,
            "columns": ["id", "username"],
            "result": [["1", "ada"], ["2", "bob"]]
        }"#;
        let op: DatabaseOperation = serde_json::from_str(json).unwrap();
        assert!(op.has_result);
        assert_eq!(op.affected_rows, None);
        assert_eq!(op.rows.unwrap().len(), 2);
    }
}
