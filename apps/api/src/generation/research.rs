//! Company research supplied by the user alongside a generation request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyResearch {
    pub company: String,
    /// Headlines, most recent first.
    pub recent_news: Vec<String>,
    pub mission: String,
    pub values: Vec<String>,
    pub culture: String,
    pub tech_stack: Vec<String>,
}

impl CompanyResearch {
    /// Company name, or `fallback` when none was given.
    pub fn company_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let name = self.company.trim();
        if name.is_empty() {
            fallback
        } else {
            name
        }
    }
}
