//! Service layer
//!
//! Cache-aside access to movie metadata, the recommendation heuristics and
//! DMCA complaint intake.

pub mod dmca;
pub mod movies;
pub mod recommend;

pub use dmca::DmcaStore;
pub use movies::MovieService;
