pub mod handlers;
pub mod jd_analyzer;
pub mod keywords;

pub use jd_analyzer::{analyze_job_description, JdAnalysis, Seniority, WeightedKeyword};
