//! Friction item data models — the row type mapped from SQLite and the
//! serialisable request/response types used by the REST layer.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

// ─── Category ─────────────────────────────────────────────────────────────────

/// Where a friction item comes from. Stored as its snake_case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Home,
    Work,
    Digital,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Home,
        Category::Work,
        Category::Digital,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Home => "home",
            Category::Work => "work",
            Category::Digital => "digital",
            Category::Health => "health",
            Category::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "home" => Some(Category::Home),
            "work" => Some(Category::Work),
            "digital" => Some(Category::Digital),
            "health" => Some(Category::Health),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// Resolution state of a friction item. Items count toward the friction
/// score until their status reaches `Fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotFixed,
    InProgress,
    Fixed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotFixed => "not_fixed",
            Status::InProgress => "in_progress",
            Status::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "not_fixed" => Some(Status::NotFixed),
            "in_progress" => Some(Status::InProgress),
            "fixed" => Some(Status::Fixed),
            _ => None,
        }
    }
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// Raw `friction_items` row. Category/status stay strings here; they are
/// converted to enums at the API boundary so a corrupted row surfaces as an
/// error instead of a panic.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FrictionItemRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub annoyance_level: i64,
    pub category: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub fixed_at: Option<String>,
    pub encounter_count: i64,
    /// Per-item daily encounter cap. NULL = no cap.
    pub encounter_limit: Option<i64>,
    /// ISO calendar date of the most recent encounter, e.g. `"2026-08-07"`.
    pub last_encounter_date: Option<String>,
}

impl FrictionItemRow {
    pub fn into_item(self) -> Result<FrictionItem> {
        let Some(category) = Category::parse(&self.category) else {
            bail!("unknown category '{}' in row {}", self.category, self.id);
        };
        let Some(status) = Status::parse(&self.status) else {
            bail!("unknown status '{}' in row {}", self.status, self.id);
        };
        Ok(FrictionItem {
            id: self.id,
            title: self.title,
            description: self.description,
            annoyance_level: self.annoyance_level,
            category,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            fixed_at: self.fixed_at,
            encounter_count: self.encounter_count,
            encounter_limit: self.encounter_limit,
            last_encounter_date: self.last_encounter_date,
        })
    }
}

// ─── API types ────────────────────────────────────────────────────────────────

/// A friction item as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrictionItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub annoyance_level: i64,
    pub category: Category,
    pub status: Status,
    /// RFC 3339 UTC timestamps.
    pub created_at: String,
    pub updated_at: String,
    pub fixed_at: Option<String>,
    pub encounter_count: i64,
    pub encounter_limit: Option<i64>,
    pub last_encounter_date: Option<String>,
}

/// Request body for `POST /api/friction-items`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFrictionItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub annoyance_level: i64,
    pub category: Category,
    #[serde(default)]
    pub encounter_limit: Option<i64>,
}

impl NewFrictionItem {
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_title(&self.title)?;
        if let Some(desc) = &self.description {
            validate_description(desc)?;
        }
        validate_annoyance_level(self.annoyance_level)?;
        if let Some(limit) = self.encounter_limit {
            validate_encounter_limit(limit)?;
        }
        Ok(())
    }
}

/// Request body for `PUT /api/friction-items/{id}`. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrictionItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub annoyance_level: Option<i64>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub encounter_limit: Option<i64>,
}

impl FrictionItemPatch {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(desc) = &self.description {
            validate_description(desc)?;
        }
        if let Some(level) = self.annoyance_level {
            validate_annoyance_level(level)?;
        }
        if let Some(limit) = self.encounter_limit {
            validate_encounter_limit(limit)?;
        }
        Ok(())
    }
}

/// Response for `POST /api/friction-items/{id}/encounter` — the updated item
/// plus whether its own daily limit is now met or exceeded.
#[derive(Debug, Clone, Serialize)]
pub struct EncounterResponse {
    #[serde(flatten)]
    pub item: FrictionItem,
    pub is_limit_exceeded: bool,
}

fn validate_title(title: &str) -> std::result::Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("title must not be empty".to_string());
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err(format!("title must be at most {TITLE_MAX_LEN} characters"));
    }
    Ok(())
}

fn validate_description(desc: &str) -> std::result::Result<(), String> {
    if desc.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        ));
    }
    Ok(())
}

fn validate_annoyance_level(level: i64) -> std::result::Result<(), String> {
    if !(1..=5).contains(&level) {
        return Err("annoyance_level must be between 1 and 5".to_string());
    }
    Ok(())
}

fn validate_encounter_limit(limit: i64) -> std::result::Result<(), String> {
    if limit < 1 {
        return Err("encounter_limit must be at least 1".to_string());
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_str() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("garden"), None);
    }

    #[test]
    fn status_roundtrips_through_str() {
        for s in [Status::NotFixed, Status::InProgress, Status::Fixed] {
            assert_eq!(Status::parse(s.as_str()), Some(s));
        }
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn category_serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::Digital).unwrap();
        assert_eq!(json, "\"digital\"");
        let back: Status = serde_json::from_str("\"not_fixed\"").unwrap();
        assert_eq!(back, Status::NotFixed);
    }

    #[test]
    fn new_item_validation() {
        let mut item = NewFrictionItem {
            title: "Squeaky door".to_string(),
            description: None,
            annoyance_level: 3,
            category: Category::Home,
            encounter_limit: None,
        };
        assert!(item.validate().is_ok());

        item.title = "   ".to_string();
        assert!(item.validate().is_err());

        item.title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(item.validate().is_err());

        item.title = "ok".to_string();
        item.annoyance_level = 0;
        assert!(item.validate().is_err());
        item.annoyance_level = 6;
        assert!(item.validate().is_err());

        item.annoyance_level = 5;
        item.description = Some("d".repeat(DESCRIPTION_MAX_LEN + 1));
        assert!(item.validate().is_err());

        item.description = None;
        item.encounter_limit = Some(0);
        assert!(item.validate().is_err());
    }

    #[test]
    fn patch_with_no_fields_is_valid() {
        assert!(FrictionItemPatch::default().validate().is_ok());
    }

    #[test]
    fn row_with_unknown_status_fails_conversion() {
        let row = FrictionItemRow {
            id: 1,
            title: "t".to_string(),
            description: None,
            annoyance_level: 1,
            category: "home".to_string(),
            status: "mystery".to_string(),
            created_at: "2026-08-07T00:00:00+00:00".to_string(),
            updated_at: "2026-08-07T00:00:00+00:00".to_string(),
            fixed_at: None,
            encounter_count: 0,
            encounter_limit: None,
            last_encounter_date: None,
        };
        assert!(row.into_item().is_err());
    }

    #[test]
    fn encounter_response_flattens_item_fields() {
        let item = FrictionItem {
            id: 7,
            title: "Slow elevator".to_string(),
            description: None,
            annoyance_level: 2,
            category: Category::Work,
            status: Status::NotFixed,
            created_at: "2026-08-07T00:00:00+00:00".to_string(),
            updated_at: "2026-08-07T00:00:00+00:00".to_string(),
            fixed_at: None,
            encounter_count: 3,
            encounter_limit: Some(3),
            last_encounter_date: Some("2026-08-07".to_string()),
        };
        let resp = EncounterResponse {
            item,
            is_limit_exceeded: true,
        };
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["encounter_count"], 3);
        assert_eq!(json["is_limit_exceeded"], true);
    }
}
