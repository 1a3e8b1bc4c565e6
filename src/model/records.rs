//! Records of the case-management backend: companies, owners, properties,
//! construction types and cases.
//!
//! These are shallow records. The only client-side rule is that required
//! fields are present before a create/edit is submitted; choice fields such
//! as `case_type` and `status` are plain strings validated by the server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collection endpoints of the case-management backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordKind {
    Companies,
    Cases,
    Owners,
    Properties,
    #[value(name = "constructiontypes")]
    ConstructionTypes,
}

impl RecordKind {
    /// Collection path relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            RecordKind::Companies => "/companies/",
            RecordKind::Cases => "/cases/",
            RecordKind::Owners => "/owners/",
            RecordKind::Properties => "/properties/",
            RecordKind::ConstructionTypes => "/constructiontypes/",
        }
    }

    /// Path of one record in the collection
    pub fn record_path(self, id: u64) -> String {
        format!("{}{}/", self.path(), id)
    }

    pub fn singular(self) -> &'static str {
        match self {
            RecordKind::Companies => "company",
            RecordKind::Cases => "case",
            RecordKind::Owners => "owner",
            RecordKind::Properties => "property",
            RecordKind::ConstructionTypes => "construction type",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_person_name: Option<String>,
    #[serde(default)]
    pub contact_info: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub assigned_sales: Option<u64>,
    #[serde(default)]
    pub contact_info: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub address: String,
    #[serde(default)]
    pub owner: Option<u64>,
    #[serde(default)]
    pub company: Option<u64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub year_built: Option<u16>,
    #[serde(default)]
    pub last_inspection_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /companies/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person_name: Option<String>,
}

/// A sales case. `case_type` and `status` are server-side choice fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    pub case_type: String,
    pub status: String,
    pub owner: u64,
    pub property: u64,
    #[serde(default)]
    pub assigned_sales: Option<u64>,
    pub occurence_date: NaiveDate,
    #[serde(default)]
    pub expected_construction_types: Vec<u64>,
}

/// Body of `POST /cases/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDraft {
    pub case_type: String,
    pub status: String,
    pub owner: u64,
    pub property: u64,
    pub assigned_sales: u64,
    pub occurence_date: NaiveDate,
    #[serde(default)]
    pub expected_construction_types: Vec<u64>,
}

impl CaseDraft {
    /// Names of required text fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.case_type.trim().is_empty() {
            missing.push("case_type");
        }
        if self.status.trim().is_empty() {
            missing.push("status");
        }
        missing
    }
}

/// Body of `PUT /cases/{id}/`: the case edit form only touches these two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseUpdate {
    pub case_type: String,
    pub status: String,
}

/// Dashboard counts over a list of cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl CaseSummary {
    pub fn count(cases: &[Case]) -> Self {
        let with_status = |status: &str| cases.iter().filter(|c| c.status == status).count();
        CaseSummary {
            total: cases.len(),
            in_progress: with_status("InProgress"),
            completed: with_status("Completed"),
        }
    }
}

/// Case type choices the backend ships with
pub const CASE_TYPES: &[&str] = &["New", "CS"];

/// Case status choices the backend ships with
pub const CASE_STATUSES: &[&str] = &[
    "Appointment",
    "Surveyed",
    "Negotiating",
    "Contracted",
    "InProgress",
    "Completed",
    "Cancelled",
];
