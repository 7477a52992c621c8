//! Equipment inventory domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for creating an equipment entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEquipmentRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 500))]
    pub specification: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,

    #[validate(length(max = 2000))]
    pub additional_info: Option<String>,

    /// Image URL is stored verbatim; upload handling is a client concern.
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: String,

    #[validate(length(min = 1, max = 200, message = "In-charge is required"))]
    pub in_charge: String,
}

/// Request body for updating an equipment entry. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEquipmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub specification: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub additional_info: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub in_charge: Option<String>,
}

/// Equipment entry as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EquipmentResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub image_url: String,
    pub in_charge: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_equipment_valid() {
        let req = CreateEquipmentRequest {
            name: "3D Printer".into(),
            specification: Some("FDM, 220x220x250".into()),
            description: "Prusa MK4 for rapid prototyping".into(),
            additional_info: None,
            image_url: "https://cdn.example.edu/eq/prusa.jpg".into(),
            in_charge: "Lab In-Charge A".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_equipment_bad_url() {
        let req = CreateEquipmentRequest {
            name: "3D Printer".into(),
            specification: None,
            description: "Prusa MK4".into(),
            additional_info: None,
            image_url: "not a url".into(),
            in_charge: "Lab In-Charge A".into(),
        };
        assert!(req.validate().is_err());
    }
}
