pub mod analyzer;
pub mod handlers;

pub use analyzer::{analyze_company, CompanyAnalysis, CompanyProfile, NewsItem};
