//! Documents, their analysis artifacts, and the change sets the admin editor submits

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Upper bound of the displayed risk scale.
pub const MAX_RISK_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    ExecutiveOrder,
    FactSheet,
    Remarks,
    Legislation,
    Other,
}

impl DocumentType {
    /// Value stored in the `document_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::ExecutiveOrder => "EXECUTIVE_ORDER",
            DocumentType::FactSheet => "FACT_SHEET",
            DocumentType::Remarks => "REMARKS",
            DocumentType::Legislation => "LEGISLATION",
            DocumentType::Other => "OTHER",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "EXECUTIVE_ORDER" => Some(DocumentType::ExecutiveOrder),
            "FACT_SHEET" => Some(DocumentType::FactSheet),
            "REMARKS" => Some(DocumentType::Remarks),
            "LEGISLATION" => Some(DocumentType::Legislation),
            "OTHER" => Some(DocumentType::Other),
            _ => None,
        }
    }

    /// Human readable label used by the site's type badge
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::ExecutiveOrder => "Executive Order",
            DocumentType::FactSheet => "Fact Sheet",
            DocumentType::Remarks => "Remarks",
            DocumentType::Legislation => "Legislation",
            DocumentType::Other => "Other",
        }
    }
}

/// Severity band for a clamped risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Guarded,
    Elevated,
    High,
    Severe,
}

impl RiskLevel {
    pub fn from_score(score: i32) -> Self {
        match clamp_risk_score(score) {
            ..=2 => RiskLevel::Low,
            3..=4 => RiskLevel::Guarded,
            5..=6 => RiskLevel::Elevated,
            7..=8 => RiskLevel::High,
            _ => RiskLevel::Severe,
        }
    }
}

/// Clamp a stored risk score into the displayed 0..=10 range.
///
/// Scores are persisted as entered; clamping only happens on the way out.
pub fn clamp_risk_score(score: i32) -> i32 {
    score.clamp(0, MAX_RISK_SCORE)
}

/// An executive order, fact sheet, piece of legislation, etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: i64,
    /// Unique, URL-safe identifier
    pub slug: String,
    pub title: String,
    pub document_type: DocumentType,
    pub signer: String,
    pub date_signed: NaiveDate,
    pub short_summary: Option<String>,
    /// Unclamped score as stored; see [`clamp_risk_score`]
    pub risk_score: Option<i32>,
    pub original_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn display_risk_score(&self) -> Option<i32> {
        self.risk_score.map(clamp_risk_score)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_score.map(RiskLevel::from_score)
    }

    #[cfg(test)]
    pub fn link(&self) -> DocumentLink {
        DocumentLink {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

/// A titled section of analysis (ELI5, Key Points, ...) attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentArtifact {
    pub id: i64,
    pub document_id: i64,
    pub title: String,
    /// Markdown
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DocumentWithArtifacts {
    #[serde(flatten)]
    pub document: Document,
    pub artifacts: Vec<DocumentArtifact>,
}

/// Minimal reference used for prev/next navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentLink {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

/// Neighbours of a document by signing date.
///
/// `previous` is the nearest newer document, `next` the nearest older one,
/// matching how the site lists documents newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdjacentDocuments {
    pub previous: Option<DocumentLink>,
    pub next: Option<DocumentLink>,
}

/// Row of the admin overview
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminDocumentSummary {
    pub id: i64,
    pub title: String,
    pub risk_score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for AdminDocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            risk_score: doc.risk_score,
            updated_at: doc.updated_at,
        }
    }
}

/// Partial update of a document's mutable fields.
///
/// Nullable fields are tri-state: absent keeps the stored value, `null`
/// clears it, a value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct DocumentChanges {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub risk_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub short_summary: Option<Option<String>>,
    pub date_signed: Option<NaiveDate>,
    pub signer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub original_document_url: Option<Option<String>>,
    pub document_type: Option<DocumentType>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.risk_score.is_none()
            && self.short_summary.is_none()
            && self.date_signed.is_none()
            && self.signer.is_none()
            && self.original_document_url.is_none()
            && self.document_type.is_none()
    }
}

/// Distinguishes an explicit `null` from a missing field
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewArtifact {
    pub document_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ArtifactChanges {
    pub title: String,
    pub content: String,
}
