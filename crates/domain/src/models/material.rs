//! Material inventory domain models.
//!
//! Materials carry the coefficients the environmental-impact calculators
//! consume (density, embodied energy, carbon footprint factor). The
//! arithmetic itself lives client-side; the server only stores the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Physical form of a material, which determines how the client derives
/// weight from dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialForm {
    Sheet,
    Rod,
    Unit,
}

impl MaterialForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialForm::Sheet => "sheet",
            MaterialForm::Rod => "rod",
            MaterialForm::Unit => "unit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sheet" => Some(MaterialForm::Sheet),
            "rod" => Some(MaterialForm::Rod),
            "unit" => Some(MaterialForm::Unit),
            _ => None,
        }
    }
}

/// Request body for creating a material entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Dimension is required"))]
    pub dimension: String,

    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: String,

    /// Density in kg/m³.
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub density: f64,

    /// Embodied energy coefficient in MJ/kg.
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub embodied_energy: f64,

    /// Carbon footprint factor in kgCO2e/kg.
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub carbon_footprint_factor: f64,

    /// Fixed dimension in mm: thickness for sheets, diameter for rods,
    /// unit weight for unit items.
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub fixed_dimension: f64,

    #[serde(default = "default_form")]
    pub form_type: MaterialForm,
}

fn default_form() -> MaterialForm {
    MaterialForm::Unit
}

/// Request body for updating a material entry. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub dimension: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub density: Option<f64>,
    pub embodied_energy: Option<f64>,
    pub carbon_footprint_factor: Option<f64>,
    pub fixed_dimension: Option<f64>,
    pub form_type: Option<MaterialForm>,
}

/// Material entry as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MaterialResponse {
    pub id: Uuid,
    pub name: String,
    pub dimension: String,
    pub description: String,
    pub image_url: String,
    pub density: f64,
    pub embodied_energy: f64,
    pub carbon_footprint_factor: f64,
    pub fixed_dimension: f64,
    pub form_type: MaterialForm,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_form_roundtrip() {
        for form in [MaterialForm::Sheet, MaterialForm::Rod, MaterialForm::Unit] {
            assert_eq!(MaterialForm::parse(form.as_str()), Some(form));
        }
    }

    #[test]
    fn test_material_form_unknown() {
        assert_eq!(MaterialForm::parse("liquid"), None);
    }

    #[test]
    fn test_create_material_valid() {
        let req = CreateMaterialRequest {
            name: "Aluminium 6061".into(),
            dimension: "600x600".into(),
            description: "General purpose alloy sheet".into(),
            image_url: "https://cdn.example.edu/mat/al6061.jpg".into(),
            density: 2700.0,
            embodied_energy: 155.0,
            carbon_footprint_factor: 8.24,
            fixed_dimension: 2.0,
            form_type: MaterialForm::Sheet,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_material_negative_density() {
        let req = CreateMaterialRequest {
            name: "Aluminium 6061".into(),
            dimension: "600x600".into(),
            description: "General purpose alloy sheet".into(),
            image_url: "https://cdn.example.edu/mat/al6061.jpg".into(),
            density: -1.0,
            embodied_energy: 155.0,
            carbon_footprint_factor: 8.24,
            fixed_dimension: 2.0,
            form_type: MaterialForm::Sheet,
        };
        assert!(req.validate().is_err());
    }
}
