pub mod handlers;
pub mod parser;

pub use parser::{ParsedResume, ResumeParseError, ResumeParser, ResumeSection};
