//! ApplyWise: resume parsing, JD analysis, ATS scoring, document generation
//! and application tracking behind an HTTP API.

pub mod analysis;
pub mod company;
pub mod config;
pub mod db;
pub mod errors;
pub mod generation;
pub mod resume;
pub mod routes;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod text;
pub mod tracking;
