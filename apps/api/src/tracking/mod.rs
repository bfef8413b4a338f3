//! Job application tracking: Postgres persistence for applications,
//! interviews, stage history, metrics and keyword performance, plus the
//! analytics dashboard computed over them.

pub mod dashboard;
pub mod handlers;
pub mod models;
pub mod repository;

pub use dashboard::{generate_dashboard, DashboardFormat, DashboardOptions};
pub use models::{ApplicationRow, ApplicationStatus, InterviewRow};
