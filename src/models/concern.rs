//! Community concern model and the fixed category enumeration.

use serde::{Deserialize, Serialize};

/// Fixed set of health categories a concern can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "General Health")]
    GeneralHealth,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Maternal Health")]
    MaternalHealth,
    #[serde(rename = "Pediatrics")]
    Pediatrics,
    #[serde(rename = "Nutrition")]
    Nutrition,
    #[serde(rename = "Sexual Health")]
    SexualHealth,
    #[serde(rename = "Chronic Diseases")]
    ChronicDiseases,
}

/// All categories in display order, as served by `GET /api/categories`.
pub const CATEGORIES: [Category; 7] = [
    Category::GeneralHealth,
    Category::MentalHealth,
    Category::MaternalHealth,
    Category::Pediatrics,
    Category::Nutrition,
    Category::SexualHealth,
    Category::ChronicDiseases,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GeneralHealth => "General Health",
            Category::MentalHealth => "Mental Health",
            Category::MaternalHealth => "Maternal Health",
            Category::Pediatrics => "Pediatrics",
            Category::Nutrition => "Nutrition",
            Category::SexualHealth => "Sexual Health",
            Category::ChronicDiseases => "Chronic Diseases",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "General Health" => Some(Category::GeneralHealth),
            "Mental Health" => Some(Category::MentalHealth),
            "Maternal Health" => Some(Category::MaternalHealth),
            "Pediatrics" => Some(Category::Pediatrics),
            "Nutrition" => Some(Category::Nutrition),
            "Sexual Health" => Some(Category::SexualHealth),
            "Chronic Diseases" => Some(Category::ChronicDiseases),
            _ => None,
        }
    }
}

/// Lifecycle status of a concern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConcernStatus {
    Open,
    Resolved,
}

impl ConcernStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcernStatus::Open => "open",
            ConcernStatus::Resolved => "resolved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(ConcernStatus::Open),
            "resolved" => Some(ConcernStatus::Resolved),
            _ => None,
        }
    }
}

/// A community-submitted health concern, optionally answered by staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concern {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    /// None for anonymous posts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    /// Staff response text, set by the respond operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub status: ConcernStatus,
    pub upvotes: i64,
    pub created_at: String,
}

/// Request body for creating a new concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConcernRequest {
    pub title: String,
    pub content: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

/// Partial update applied to an existing concern (staff responses).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConcernRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConcernStatus>,
}

/// Request body for `PATCH /api/concerns/:id/respond`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

/// Response body for `POST /api/concerns/:id/upvote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpvoteResponse {
    pub upvotes: i64,
}

/// Query filters for listing concerns. All provided filters AND together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcernFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConcernStatus>,
    /// Case-insensitive substring match on the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
