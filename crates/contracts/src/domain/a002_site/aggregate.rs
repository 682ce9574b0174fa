use serde::{Deserialize, Serialize};

use crate::domain::a001_company::CompanyId;

crate::uuid_id!(
    /// Operational site identifier
    SiteId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    #[default]
    Office,
    Factory,
    Warehouse,
    Retail,
    Other,
}

impl SiteKind {
    pub fn all() -> [SiteKind; 5] {
        [
            SiteKind::Office,
            SiteKind::Factory,
            SiteKind::Warehouse,
            SiteKind::Retail,
            SiteKind::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::Office => "office",
            SiteKind::Factory => "factory",
            SiteKind::Warehouse => "warehouse",
            SiteKind::Retail => "retail",
            SiteKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "factory" => SiteKind::Factory,
            "warehouse" => SiteKind::Warehouse,
            "retail" => SiteKind::Retail,
            "other" => SiteKind::Other,
            _ => SiteKind::Office,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub company_id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub kind: SiteKind,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub floor_area_m2: Option<f64>,
}

/// Body of `POST /companies/:id/sites`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteDto {
    pub name: String,
    pub kind: SiteKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_area_m2: Option<f64>,
}

impl CreateSiteDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Site name is required".to_string());
        }
        if matches!(self.floor_area_m2, Some(area) if area < 0.0) {
            return Err("Floor area cannot be negative".to_string());
        }
        Ok(())
    }
}
