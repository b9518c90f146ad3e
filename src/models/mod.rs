//! Data model types for the listening test service

pub mod rating;
pub mod session;

pub use rating::{Rating, RatingRecord};
pub use session::{EvalSession, SessionState};
