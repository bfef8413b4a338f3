//! Resume Parser: turns resume text (or a PDF) into contact info, sections
//! and a normalized markdown document with YAML frontmatter.
//!
//! Section detection is line-based regex segmentation: a header is a line
//! consisting only of a known heading ("EXPERIENCE", "Technical Skills:").

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ResumeParseError {
    #[error("PDF file not found: {0}")]
    NotFound(PathBuf),

    #[error("No text content found in PDF")]
    NoText,

    #[error("Failed to parse PDF: {0}")]
    Extraction(String),

    #[error("Failed to render frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Standard resume sections. Declaration order is the markdown output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeSection {
    Summary,
    Experience,
    Projects,
    Education,
    Skills,
    Certifications,
    Publications,
}

impl ResumeSection {
    pub fn title(self) -> &'static str {
        match self {
            ResumeSection::Summary => "Summary",
            ResumeSection::Experience => "Experience",
            ResumeSection::Projects => "Projects",
            ResumeSection::Education => "Education",
            ResumeSection::Skills => "Skills",
            ResumeSection::Certifications => "Certifications",
            ResumeSection::Publications => "Publications",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ContactInfo {
    /// Fields in frontmatter order.
    fn ordered_fields(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("name", &self.name),
            ("title", &self.title),
            ("email", &self.email),
            ("phone", &self.phone),
            ("linkedin", &self.linkedin),
            ("github", &self.github),
            ("website", &self.website),
            ("location", &self.location),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub start_year: String,
    pub end_year: String,
    pub gpa: Option<String>,
}

/// A skills line. Uncategorized skills land in the `general` category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

pub const GENERAL_SKILLS: &str = "general";

#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub frontmatter: String,
    pub contact_info: ContactInfo,
    pub sections: BTreeMap<ResumeSection, String>,
    /// The raw text the resume was parsed from.
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────────────────────────────────────

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Tried in order; the first family that matches wins.
static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\(\d{3}\)\s*\d{3}-\d{4}",
        r"\+?\d-\d{3}-\d{3}-\d{4}",
        r"\d{3}-\d{3}-\d{4}",
        r"\+?\d{1,3}[\s.-]?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w-]+").expect("valid regex"));

static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github\.com/[\w-]+").expect("valid regex"));

static THREE_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}").expect("valid regex"));

static SECTION_HEADERS: Lazy<Vec<(ResumeSection, Regex)>> = Lazy::new(|| {
    [
        (
            ResumeSection::Summary,
            "professional summary|summary|profile|objective",
        ),
        (
            ResumeSection::Experience,
            "professional experience|work experience|experience|employment",
        ),
        (ResumeSection::Education, "academic background|education"),
        (
            ResumeSection::Skills,
            "technical skills|core competencies|skills",
        ),
        (ResumeSection::Projects, "projects|portfolio"),
        (
            ResumeSection::Certifications,
            "certifications|certificates|licenses",
        ),
        (ResumeSection::Publications, "publications|research"),
    ]
    .into_iter()
    .map(|(section, names)| {
        let pattern = format!(r"(?im)^[ \t]*(?:{names})[ \t]*:?[ \t]*$");
        (section, Regex::new(&pattern).expect("valid regex"))
    })
    .collect()
});

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\|\s*(.+?)\s*\|\s*(.+?)$").expect("valid regex"));

static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s*").expect("valid regex"));

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid regex"));

static GPA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+/\d+\.\d+)").expect("valid regex"));

static SKILL_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]").expect("valid regex"));

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_contact_info(text: &str) -> ContactInfo {
    let mut info = ContactInfo {
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RES
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.as_str().to_string()),
        linkedin: LINKEDIN_RE.find(text).map(|m| m.as_str().to_string()),
        github: GITHUB_RE.find(text).map(|m| m.as_str().to_string()),
        ..ContactInfo::default()
    };

    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    if let Some(name) = lines.next() {
        info.name = Some(name.to_string());
    }

    if let Some(second) = lines.next() {
        let lower = second.to_lowercase();
        let looks_like_contact = second.contains('@')
            || THREE_DIGITS_RE.is_match(second)
            || lower.contains("linkedin")
            || lower.contains("github");
        if !looks_like_contact {
            info.title = Some(second.to_string());
        }
    }

    info
}

/// Splits resume text into sections keyed by type.
///
/// Content runs from the line after a header to the start of the next header.
/// A repeated section type keeps the last occurrence.
pub fn extract_sections(text: &str) -> BTreeMap<ResumeSection, String> {
    let mut positions: Vec<(usize, ResumeSection)> = SECTION_HEADERS
        .iter()
        .flat_map(|(section, re)| re.find_iter(text).map(move |m| (m.start(), *section)))
        .collect();
    positions.sort_by_key(|(pos, _)| *pos);

    let mut sections = BTreeMap::new();

    for (i, (pos, section)) in positions.iter().enumerate() {
        let content_start = match text[*pos..].find('\n') {
            Some(offset) => pos + offset + 1,
            None => text.len(),
        };
        let content_end = positions
            .get(i + 1)
            .map(|(next, _)| *next)
            .unwrap_or(text.len())
            .max(content_start);

        sections.insert(*section, text[content_start..content_end].trim().to_string());
    }

    sections
}

/// Parses `Title | Company | Dates` entries followed by bullet responsibilities.
pub fn parse_experience_section(text: &str) -> Vec<ExperienceEntry> {
    let mut experiences: Vec<ExperienceEntry> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = ENTRY_RE.captures(line) {
            let mut dates = caps[3].split('-').map(str::trim);
            experiences.push(ExperienceEntry {
                title: caps[1].trim().to_string(),
                company: caps[2].trim().to_string(),
                start_date: dates.next().unwrap_or("").to_string(),
                end_date: dates.next().unwrap_or("").to_string(),
                responsibilities: Vec::new(),
            });
        } else if is_bullet(line) {
            // Bullets before the first entry have nowhere to go
            if let Some(current) = experiences.last_mut() {
                current
                    .responsibilities
                    .push(BULLET_PREFIX_RE.replace(line, "").into_owned());
            }
        }
    }

    experiences
}

/// Parses `Degree | Institution | Dates` entries with an optional GPA line.
pub fn parse_education_section(text: &str) -> Vec<EducationEntry> {
    let mut education: Vec<EducationEntry> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = ENTRY_RE.captures(line) {
            let years: Vec<&str> = YEAR_RE.find_iter(&caps[3]).map(|m| m.as_str()).collect();
            education.push(EducationEntry {
                degree: caps[1].trim().to_string(),
                institution: caps[2].trim().to_string(),
                start_year: years.first().copied().unwrap_or("").to_string(),
                end_year: years.get(1).copied().unwrap_or("").to_string(),
                gpa: None,
            });
        } else if line.to_lowercase().contains("gpa") {
            if let (Some(current), Some(caps)) = (education.last_mut(), GPA_RE.captures(line)) {
                current.gpa = Some(caps[1].to_string());
            }
        }
    }

    education
}

/// Parses `Category: a, b; c` (or `**Category:** a, b`) lines. Lines without
/// a colon go to `general`.
pub fn parse_skills_section(text: &str) -> Vec<SkillCategory> {
    let mut skills: Vec<SkillCategory> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.split_once(':') {
            Some((category, rest)) => {
                // Rendered markdown bolds the category: `**Languages:** Go`.
                let category = category.trim().trim_matches('*').trim().to_string();
                let list = split_skills(rest.trim_start_matches('*'));
                match skills.iter_mut().find(|c| c.category == category) {
                    Some(existing) => existing.skills = list,
                    None => skills.push(SkillCategory {
                        category,
                        skills: list,
                    }),
                }
            }
            None => {
                let list = split_skills(line);
                match skills.iter_mut().find(|c| c.category == GENERAL_SKILLS) {
                    Some(general) => general.skills.extend(list),
                    None => skills.push(SkillCategory {
                        category: GENERAL_SKILLS.to_string(),
                        skills: list,
                    }),
                }
            }
        }
    }

    skills
}

fn split_skills(text: &str) -> Vec<String> {
    SKILL_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn is_bullet(line: &str) -> bool {
    line.starts_with('•') || line.starts_with('-') || line.starts_with('*')
}

/// Renders contact info as `---` fenced frontmatter, skipping empty fields.
pub fn generate_yaml_frontmatter(contact: &ContactInfo) -> Result<String, serde_yaml::Error> {
    let mut fields = serde_yaml::Mapping::new();
    for (field, value) in contact.ordered_fields() {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            fields.insert(field.into(), value.into());
        }
    }
    if fields.is_empty() {
        return Ok("---\n---".to_string());
    }
    Ok(format!("---\n{}---", serde_yaml::to_string(&fields)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Parser
// ────────────────────────────────────────────────────────────────────────────

/// Stateless entry point for text and PDF resumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeParser;

impl ResumeParser {
    pub fn parse_text(&self, text: &str) -> Result<ParsedResume, ResumeParseError> {
        let contact_info = extract_contact_info(text);
        let sections = extract_sections(text);
        debug!(sections = sections.len(), "Parsed resume text");

        Ok(ParsedResume {
            frontmatter: generate_yaml_frontmatter(&contact_info)?,
            contact_info,
            sections,
            content: text.to_string(),
        })
    }

    /// Extracts text from an in-memory PDF. CPU-bound; call from a blocking task.
    pub fn parse_pdf_bytes(&self, bytes: &[u8]) -> Result<ParsedResume, ResumeParseError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeParseError::Extraction(e.to_string()))?;
        self.parse_extracted(text)
    }

    pub fn parse_pdf_path(&self, path: &Path) -> Result<ParsedResume, ResumeParseError> {
        if !path.exists() {
            return Err(ResumeParseError::NotFound(path.to_path_buf()));
        }
        let text = pdf_extract::extract_text(path)
            .map_err(|e| ResumeParseError::Extraction(e.to_string()))?;
        self.parse_extracted(text)
    }

    fn parse_extracted(&self, text: String) -> Result<ParsedResume, ResumeParseError> {
        if text.trim().is_empty() {
            return Err(ResumeParseError::NoText);
        }
        self.parse_text(&text)
    }

    pub fn to_markdown(&self, text: &str) -> Result<String, ResumeParseError> {
        Ok(self.parse_text(text)?.to_markdown())
    }
}

impl ParsedResume {
    /// Frontmatter followed by sections in canonical order, each formatted by type.
    pub fn to_markdown(&self) -> String {
        let mut parts: Vec<String> = vec![self.frontmatter.clone(), String::new()];

        for (section, content) in &self.sections {
            parts.push(format!("## {}", section.title()));
            parts.push(String::new());

            match section {
                ResumeSection::Experience => {
                    for exp in parse_experience_section(content) {
                        parts.push(format!("### {} | {}", exp.title, exp.company));
                        parts.push(format!("*{} - {}*", exp.start_date, exp.end_date));
                        parts.push(String::new());
                        parts.extend(exp.responsibilities.iter().map(|r| format!("- {r}")));
                        parts.push(String::new());
                    }
                }
                ResumeSection::Education => {
                    for edu in parse_education_section(content) {
                        parts.push(format!("### {} | {}", edu.degree, edu.institution));
                        if !edu.start_year.is_empty() && !edu.end_year.is_empty() {
                            parts.push(format!("*{} - {}*", edu.start_year, edu.end_year));
                        }
                        if let Some(gpa) = &edu.gpa {
                            parts.push(format!("GPA: {gpa}"));
                        }
                        parts.push(String::new());
                    }
                }
                ResumeSection::Skills => {
                    for group in parse_skills_section(content) {
                        let joined = group.skills.join(", ");
                        if group.category == GENERAL_SKILLS {
                            parts.push(joined);
                        } else {
                            parts.push(format!("**{}:** {joined}", group.category));
                        }
                    }
                    parts.push(String::new());
                }
                _ => {
                    parts.push(content.clone());
                    parts.push(String::new());
                }
            }
        }

        parts.join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
