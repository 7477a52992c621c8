//! Event listing domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// Free-form date string ("December 15, 2025", "Dec 5-10").
    #[validate(length(min = 1, max = 100, message = "Date is required"))]
    pub date: String,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: String,

    #[serde(default = "default_category")]
    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

fn default_category() -> String {
    "General".to_string()
}

/// Request body for updating an event. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub date: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

/// Event entry as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub date: String,
    pub image_url: String,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_default_category() {
        let json = r#"{"title":"Tech Expo","date":"Dec 5-10","image_url":"https://cdn.example.edu/ev/expo.jpg"}"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.category, "General");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_event_empty_title() {
        let req = CreateEventRequest {
            title: "".into(),
            date: "Dec 5-10".into(),
            image_url: "https://cdn.example.edu/ev/expo.jpg".into(),
            category: "General".into(),
        };
        assert!(req.validate().is_err());
    }
}
