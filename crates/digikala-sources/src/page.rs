use digikala_models::{CommentRecord, PurchaseStatus};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;
use crate::error::SourceError;

/// Keys under `data` that have carried the comment section across API versions
const NESTED_SECTION_KEYS: [&str; 3] = ["comments", "comment", "reviews"];
const TOP_LEVEL_SECTION_KEYS: [&str; 2] = ["comments", "data"];

/// One decoded page of the comments endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPage {
    /// Raw comment objects in API order
    pub items: Vec<Value>,
    /// `Some(false)` when pagination metadata says this is the last page,
    /// `None` when the response carries no recognized pagination key
    pub has_next: Option<bool>,
}

impl CommentPage {
    pub fn from_value(page: u32, payload: &Value) -> Result<Self, SourceError> {
        let root = payload
            .as_object()
            .ok_or_else(|| SourceError::api(page, "expected a JSON object response"))?;

        // Digikala wraps errors in a 200-style envelope: {"status": 404, ...}
        if let Some(status) = root.get("status").and_then(Value::as_u64) {
            if status >= 400 {
                let message = root
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message");
                return Err(SourceError::api(
                    page,
                    format!("API returned status {}: {}", status, message),
                ));
            }
        }

        let Some(section) = find_comment_section(root) else {
            warn!(page, "Response has no comment section, treating page as empty");
            return Ok(Self {
                items: Vec::new(),
                has_next: Some(false),
            });
        };

        Ok(Self {
            items: section_items(page, section)?,
            has_next: pagination_signal(section, page),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn find_comment_section(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let nested = root.get("data").and_then(Value::as_object).and_then(|data| {
        NESTED_SECTION_KEYS
            .iter()
            .find_map(|key| data.get(*key).and_then(Value::as_object))
    });

    nested.or_else(|| {
        TOP_LEVEL_SECTION_KEYS
            .iter()
            .find_map(|key| root.get(*key).and_then(Value::as_object))
    })
}

fn section_items(page: u32, section: &Map<String, Value>) -> Result<Vec<Value>, SourceError> {
    let mut items = Vec::new();
    for key in ["items", "data"] {
        match section.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(list)) if list.is_empty() => continue,
            Some(Value::Array(list)) => {
                items = list.clone();
                break;
            }
            Some(other) => {
                return Err(SourceError::api(
                    page,
                    format!(
                        "expected '{}' to be a list of comments, got {}",
                        key,
                        json_kind(other)
                    ),
                ));
            }
        }
    }
    Ok(items)
}

/// `Some(true)` when a known key points past `page`, `Some(false)` when a known
/// key marks `page` as the last one, `None` when no known key is present
fn pagination_signal(section: &Map<String, Value>, page: u32) -> Option<bool> {
    let mut signal = None;

    for key in ["paging", "pager"] {
        let Some(paging) = section.get(key).and_then(Value::as_object) else {
            continue;
        };

        if let Some(next) = paging.get("next") {
            if is_truthy(next) {
                return Some(true);
            }
            signal = Some(false);
        }
        if let Some(next_page) = paging.get("next_page") {
            if next_page.as_i64().is_some_and(|next| next > 0) {
                return Some(true);
            }
            signal = Some(false);
        }
        if let Some(total) = paging.get("total_pages").and_then(Value::as_u64) {
            let current = paging
                .get("current_page")
                .or_else(|| paging.get("page"))
                .and_then(Value::as_u64)
                .unwrap_or(u64::from(page));
            if current < total {
                return Some(true);
            }
            signal = Some(false);
        }
    }

    if let Some(next) = section
        .get("links")
        .and_then(Value::as_object)
        .and_then(|links| links.get("next"))
    {
        if is_truthy(next) {
            return Some(true);
        }
        signal = Some(false);
    }

    signal
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Name(String),
    Profile {
        name: Option<String>,
        username: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct UserField {
    name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Reactions {
    likes: Option<u64>,
    dislikes: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointsField {
    List(Vec<Option<String>>),
    Text(String),
}

impl PointsField {
    fn into_points(self) -> Vec<String> {
        let raw = match self {
            PointsField::List(points) => points.into_iter().flatten().collect(),
            PointsField::Text(text) => vec![text],
        };
        raw.into_iter()
            .map(|point| point.trim().to_string())
            .filter(|point| !point.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarField {
    Text(String),
    Number(serde_json::Number),
}

impl ScalarField {
    fn into_string(self) -> String {
        match self {
            ScalarField::Text(text) => text,
            ScalarField::Number(n) => n.to_string(),
        }
    }
}

/// Every alternative key the API has used, kept separate so that
/// "first non-empty wins" can be applied after decoding
#[derive(Debug, Deserialize)]
struct RawComment {
    id: Option<u64>,
    comment_id: Option<u64>,
    author: Option<AuthorField>,
    user: Option<UserField>,
    user_name: Option<String>,
    title: Option<String>,
    body: Option<String>,
    text: Option<String>,
    content: Option<String>,
    rate: Option<f64>,
    rating: Option<f64>,
    recommendation_status: Option<String>,
    recommendation: Option<String>,
    purchase_status: Option<String>,
    is_buyer: Option<bool>,
    has_bought: Option<bool>,
    likes: Option<u64>,
    like_count: Option<u64>,
    dislikes: Option<u64>,
    dislike_count: Option<u64>,
    reactions: Option<Reactions>,
    advantages: Option<PointsField>,
    positives: Option<PointsField>,
    disadvantages: Option<PointsField>,
    negatives: Option<PointsField>,
    created_at: Option<ScalarField>,
    date: Option<ScalarField>,
    created_on: Option<ScalarField>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

impl RawComment {
    fn into_record(self) -> CommentRecord {
        let (profile_name, profile_username) = match self.author {
            Some(AuthorField::Name(name)) => (Some(name), None),
            Some(AuthorField::Profile { name, username }) => (name, username),
            None => (None, None),
        };
        let (user_name, user_username) = match self.user {
            Some(user) => (user.name, user.username),
            None => (None, None),
        };
        let author = non_empty(profile_name)
            .or_else(|| non_empty(profile_username))
            .or_else(|| non_empty(user_name))
            .or_else(|| non_empty(user_username))
            .or_else(|| non_empty(self.user_name))
            .unwrap_or_default();

        let purchase_status = self
            .purchase_status
            .as_deref()
            .map(PurchaseStatus::from_api_label)
            .filter(|status| *status != PurchaseStatus::Unknown)
            .or_else(|| self.is_buyer.map(PurchaseStatus::from_flag))
            .or_else(|| self.has_bought.map(PurchaseStatus::from_flag))
            .unwrap_or_default();

        let (reaction_likes, reaction_dislikes) = match self.reactions {
            Some(reactions) => (reactions.likes, reactions.dislikes),
            None => (None, None),
        };

        let positive_points = self
            .advantages
            .map(PointsField::into_points)
            .filter(|points| !points.is_empty())
            .or_else(|| self.positives.map(PointsField::into_points))
            .unwrap_or_default();
        let negative_points = self
            .disadvantages
            .map(PointsField::into_points)
            .filter(|points| !points.is_empty())
            .or_else(|| self.negatives.map(PointsField::into_points))
            .unwrap_or_default();

        let created_at = self
            .created_at
            .or(self.date)
            .or(self.created_on)
            .map(ScalarField::into_string)
            .filter(|s| !s.trim().is_empty());

        CommentRecord {
            id: self.id.or(self.comment_id),
            author,
            title: self.title.unwrap_or_default(),
            body: non_empty(self.body)
                .or_else(|| non_empty(self.text))
                .or_else(|| non_empty(self.content))
                .unwrap_or_default(),
            rating: non_zero(self.rate)
                .or(non_zero(self.rating))
                .and_then(CommentRecord::normalize_rating),
            recommendation: non_empty(self.recommendation_status)
                .or_else(|| non_empty(self.recommendation)),
            purchase_status,
            likes: self.likes.or(self.like_count).or(reaction_likes).unwrap_or(0),
            dislikes: self
                .dislikes
                .or(self.dislike_count)
                .or(reaction_dislikes)
                .unwrap_or(0),
            positive_points,
            negative_points,
            created_at,
        }
    }
}

/// Map one raw comment object to a record. Missing fields fall back to
/// empty values; the error string explains why the entry is unusable.
pub fn comment_from_value(item: &Value) -> Result<CommentRecord, String> {
    if !item.is_object() {
        return Err(format!("expected a comment object, got {}", json_kind(item)));
    }
    RawComment::deserialize(item)
        .map(RawComment::into_record)
        .map_err(|e| e.to_string())
}
