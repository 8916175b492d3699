//! Outbound submissions to the recommendation and registration APIs

pub mod client;
pub mod dispatcher;

pub use client::{HttpPoster, PayloadPoster};
pub use dispatcher::{Dispatcher, RecommendationOutcome};
