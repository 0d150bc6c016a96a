//! Wire-format structs for the backend API.
//!
//! Kept separate from the domain models so the JSON field names (`_id`,
//! `insight`, ...) stay a transport concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use newslens_core::insight::Insight;
use newslens_core::saved_search::SavedSearchTerm;

/// Body of `POST /api/insights`.
#[derive(Debug, Serialize)]
pub struct InsightRequest<'a> {
    pub search_term: &'a str,
    pub num_results: u32,
}

/// One element of the insights response array.
#[derive(Debug, Deserialize)]
pub struct InsightDto {
    pub insight: String,
    pub source_title: String,
    pub source_link: String,
}

impl From<InsightDto> for Insight {
    fn from(dto: InsightDto) -> Self {
        Insight {
            text: dto.insight,
            source_title: dto.source_title,
            source_link: dto.source_link,
        }
    }
}

/// One element of the saved-search responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchTermDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub term: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<SearchTermDto> for SavedSearchTerm {
    fn from(dto: SearchTermDto) -> Self {
        SavedSearchTerm {
            id: dto.id,
            term: dto.term,
            user_id: dto.user_id,
            created_at: dto.created_at,
        }
    }
}

/// Body of `POST /search-terms/`.
#[derive(Debug, Serialize)]
pub struct CreateSearchTermRequest<'a> {
    pub term: &'a str,
}

/// Failure payload shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

/// Response of the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
