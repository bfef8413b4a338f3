//! Anecdotes: STAR-style achievement stories stored as markdown with YAML
//! frontmatter:
//!
//! ```text
//! ---
//! title: Cut p99 latency
//! skills: [python, redis]
//! impact: Reduced p99 latency by 60%
//! ---
//! **Context:** ...
//! ```

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::text::contains_term;

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").expect("valid regex"));

#[derive(Debug, Error)]
pub enum AnecdoteError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid frontmatter in {}: {source}", path.display())]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Anecdote {
    pub id: String,
    pub title: String,
    pub skills: Vec<String>,
    pub impact: String,
    pub content: String,
}

impl Anecdote {
    /// Lowercased skills, for membership checks against JD terms.
    pub fn skill_set(&self) -> std::collections::HashSet<String> {
        self.skills.iter().map(|s| s.to_lowercase()).collect()
    }

    /// True if the lowercase keyword is one of the skills or a term of the body.
    pub fn covers(&self, keyword_lower: &str) -> bool {
        self.skills.iter().any(|s| s.to_lowercase() == keyword_lower)
            || contains_term(&self.content.to_lowercase(), keyword_lower)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnecdoteFrontmatter {
    title: Option<String>,
    skills: Vec<String>,
    impact: String,
}

/// Splits `---\n<yaml>\n---\n<body>`; `None` when there is no frontmatter.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let caps = FRONTMATTER_RE.captures(content)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Parses one anecdote file body. Files without frontmatter are not anecdotes.
pub fn parse_anecdote(id: &str, content: &str) -> Result<Option<Anecdote>, serde_yaml::Error> {
    let Some((yaml, body)) = split_frontmatter(content) else {
        return Ok(None);
    };

    // An empty frontmatter block deserializes as unit, not a mapping.
    let meta: AnecdoteFrontmatter = if yaml.trim().is_empty() {
        AnecdoteFrontmatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok(Some(Anecdote {
        id: id.to_string(),
        title: meta.title.unwrap_or_else(|| id.to_string()),
        skills: meta.skills,
        impact: meta.impact,
        content: body.trim().to_string(),
    }))
}

/// Loads every `*.md` anecdote in `dir`, ordered by file name.
///
/// A missing directory yields no anecdotes.
pub fn load_anecdotes(dir: &Path) -> Result<Vec<Anecdote>, AnecdoteError> {
    if !dir.exists() {
        warn!("Anecdote directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|source| AnecdoteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    let mut anecdotes = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|source| AnecdoteError::Io {
            path: path.clone(),
            source,
        })?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match parse_anecdote(&id, &content) {
            Ok(Some(anecdote)) => anecdotes.push(anecdote),
            Ok(None) => debug!("Skipping {} (no frontmatter)", path.display()),
            Err(source) => return Err(AnecdoteError::Frontmatter { path, source }),
        }
    }

    Ok(anecdotes)
}
