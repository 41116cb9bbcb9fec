//! Request and response models for the MovieHub API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies,
//! plus the movie list item shape the recommendation heuristics work on.

pub mod dmca;
pub mod movie;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use dmca::{ComplaintStatus, DmcaComplaint, DmcaReceipt, DmcaSubmission};
pub use movie::{movies_from_page, MovieSummary};
pub use requests::{BrowseQuery, MoodQuery, PageQuery, SearchQuery, ShuffleQuery};
pub use responses::{
    ApiResponse, ErrorResponse, FlushResponse, HealthResponse, ListResponse, ResponseTierStats,
    StatsResponse,
};
