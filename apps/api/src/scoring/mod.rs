pub mod ats;
pub mod handlers;
pub mod models;

pub use ats::{score_resume, AtsScoreError};
pub use models::AtsScore;
