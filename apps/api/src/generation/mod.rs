//! Template-driven document generation: cover letters, interview prep and
//! resume optimization, all fed by JD analysis and the user's anecdotes.

pub mod anecdotes;
pub mod cover_letter;
pub mod handlers;
pub mod interview_prep;
pub mod optimizer;
pub mod research;
pub mod templates;

pub use anecdotes::{load_anecdotes, Anecdote, AnecdoteError};
pub use research::CompanyResearch;
pub use templates::Tone;
