//! Resume optimizer.
//!
//! Scores a markdown resume against JD keyword importance and, for a bounded
//! number of iterations, works the highest-value missing keywords into the
//! summary, skills and bullets until the target score is reached.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::analysis::{JdAnalysis, WeightedKeyword};
use crate::generation::anecdotes::{split_frontmatter, Anecdote};
use crate::resume::parser::{parse_skills_section, ExperienceEntry, SkillCategory, GENERAL_SKILLS};
use crate::text::{contains_term, truncate_chars};

/// Keywords below this importance are not worth chasing.
const GAP_IMPORTANCE: f64 = 0.5;
const DIVERSE_RELEVANCE: f64 = 0.3;
const KEYWORDS_PER_BULLET: usize = 2;
const REPORTED_GAPS: usize = 5;
const SHORT_BULLET_CHARS: usize = 50;

const LEADERSHIP_TERMS: &[&str] = &["leadership", "lead", "mentor", "architect", "senior", "principal"];
const BULLET_PREFIXES: &[&str] = &["- ", "* ", "• "];

fn by_weight_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

// ────────────────────────────────────────────────────────────────────────────
// Resume document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSection {
    /// Lowercased heading text.
    pub name: String,
    pub body: String,
}

/// A markdown resume: YAML frontmatter plus `# Heading` sections. `## Heading`
/// is read as a section too, which is how parsed resumes are rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeDocument {
    pub metadata: serde_yaml::Mapping,
    /// Text before the first heading.
    pub preamble: String,
    pub sections: Vec<DocumentSection>,
}

impl ResumeDocument {
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let (metadata, body) = match split_frontmatter(content) {
            Some((yaml, body)) if !yaml.trim().is_empty() => (serde_yaml::from_str(yaml)?, body),
            Some((_, body)) => (serde_yaml::Mapping::new(), body),
            None => (serde_yaml::Mapping::new(), content),
        };

        let mut preamble: Vec<&str> = Vec::new();
        let mut sections: Vec<DocumentSection> = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in body.lines() {
            if let Some(heading) = section_heading(line) {
                if let Some((name, lines)) = current.take() {
                    sections.push(DocumentSection {
                        name,
                        body: lines.join("\n").trim().to_string(),
                    });
                }
                current = Some((heading.trim().to_lowercase(), Vec::new()));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line);
            } else {
                preamble.push(line);
            }
        }
        if let Some((name, lines)) = current {
            sections.push(DocumentSection {
                name,
                body: lines.join("\n").trim().to_string(),
            });
        }

        Ok(Self {
            metadata,
            preamble: preamble.join("\n").trim().to_string(),
            sections,
        })
    }

    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.body.as_str())
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut String> {
        self.sections
            .iter_mut()
            .find(|s| s.name == name)
            .map(|s| &mut s.body)
    }

    /// Preamble and sections without frontmatter. This is the text that gets scored.
    pub fn body_markdown(&self) -> String {
        let mut out = String::new();
        if !self.preamble.is_empty() {
            out.push_str(&self.preamble);
            out.push_str("\n\n");
        }
        for section in &self.sections {
            out.push_str("# ");
            out.push_str(&title_case(&section.name));
            out.push('\n');
            out.push_str(&section.body);
            out.push_str("\n\n");
        }
        out
    }

    pub fn to_markdown(&self) -> Result<String, serde_yaml::Error> {
        let mut out = String::new();
        if !self.metadata.is_empty() {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(&self.metadata)?);
            out.push_str("---\n\n");
        }
        out.push_str(&self.body_markdown());
        Ok(out.trim_end().to_string() + "\n")
    }
}

fn section_heading(line: &str) -> Option<&str> {
    line.strip_prefix("# ").or_else(|| line.strip_prefix("## "))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Anecdote selection
// ────────────────────────────────────────────────────────────────────────────

/// Share of total JD importance covered by the anecdote, 0.0 – 1.0.
pub fn score_anecdote_relevance(anecdote: &Anecdote, importance: &[WeightedKeyword]) -> f64 {
    let total: f64 = importance.iter().map(|kw| kw.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let covered: f64 = importance
        .iter()
        .filter(|kw| anecdote.covers(&kw.keyword.to_lowercase()))
        .map(|kw| kw.weight)
        .sum();

    (covered / total).min(1.0)
}

fn rank_anecdotes<'a>(anecdotes: &'a [Anecdote], importance: &[WeightedKeyword]) -> Vec<(f64, &'a Anecdote)> {
    let mut scored: Vec<(f64, &Anecdote)> = anecdotes
        .iter()
        .map(|a| (score_anecdote_relevance(a, importance), a))
        .collect();
    scored.sort_by(|a, b| by_weight_desc(a.0, b.0));
    scored
}

pub fn select_top_anecdotes<'a>(
    anecdotes: &'a [Anecdote],
    importance: &[WeightedKeyword],
    top_n: usize,
) -> Vec<&'a Anecdote> {
    rank_anecdotes(anecdotes, importance)
        .into_iter()
        .take(top_n)
        .map(|(_, a)| a)
        .collect()
}

/// Greedy pick by relevance that keeps an anecdote only if it is strongly
/// relevant (> 0.3) or brings skills not yet covered.
pub fn select_diverse_anecdotes<'a>(
    anecdotes: &'a [Anecdote],
    importance: &[WeightedKeyword],
    top_n: usize,
) -> Vec<&'a Anecdote> {
    let mut selected = Vec::new();
    let mut covered: HashSet<String> = HashSet::new();

    for (score, anecdote) in rank_anecdotes(anecdotes, importance) {
        if selected.len() >= top_n {
            break;
        }
        let skills = anecdote.skill_set();
        let brings_new = skills.iter().any(|s| !covered.contains(s));
        if score > DIVERSE_RELEVANCE || brings_new {
            covered.extend(skills);
            selected.push(anecdote);
        }
    }

    selected
}

// ────────────────────────────────────────────────────────────────────────────
// Rewriting
// ────────────────────────────────────────────────────────────────────────────

pub fn identify_missing_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| !contains_term(&text_lower, &kw.to_lowercase()))
        .cloned()
        .collect()
}

/// Works up to two keywords into a bullet as the technologies it used.
pub fn rewrite_bullet_with_keywords(bullet: &str, keywords: &[String]) -> String {
    let bullet = bullet.trim_end();
    if bullet.trim().is_empty() || keywords.is_empty() {
        return bullet.to_string();
    }

    let added = keywords
        .iter()
        .take(KEYWORDS_PER_BULLET)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let period = if bullet.ends_with('.') { "." } else { "" };
    let stem = bullet.trim_end_matches('.');

    if bullet.chars().count() < SHORT_BULLET_CHARS {
        format!("{stem} using {added}{period}")
    } else if stem.contains(" to ") || stem.contains(" for ") {
        format!("{stem} leveraging {added}{period}")
    } else {
        format!("{stem} using {added}{period}")
    }
}

/// Leans the summary toward the top three JD keywords it does not mention yet.
pub fn adjust_summary(summary: &str, importance: &[WeightedKeyword]) -> String {
    if summary.trim().is_empty() || importance.is_empty() {
        return summary.to_string();
    }

    let mut top: Vec<&WeightedKeyword> = importance.iter().collect();
    top.sort_by(|a, b| by_weight_desc(a.weight, b.weight));

    let summary_lower = summary.to_lowercase();
    let enhancements: Vec<&str> = top
        .iter()
        .take(3)
        .map(|kw| kw.keyword.as_str())
        .filter(|kw| !contains_term(&summary_lower, &kw.to_lowercase()))
        .collect();

    let Some(first) = enhancements.first() else {
        return summary.to_string();
    };

    let has_leadership = LEADERSHIP_TERMS
        .iter()
        .any(|term| importance.iter().any(|kw| kw.keyword.eq_ignore_ascii_case(term)));

    let period = if summary.trim_end().ends_with('.') { "." } else { "" };
    let stem = summary.trim_end().trim_end_matches('.');

    if has_leadership {
        let stem = stem.replace(
            "Software Engineer",
            "Senior Software Engineer with leadership experience",
        );
        format!("{stem} specializing in {first}{period}")
    } else {
        let tech = enhancements.iter().take(2).copied().collect::<Vec<_>>().join(" and ");
        format!("{stem} with expertise in {tech}{period}")
    }
}

/// Best importance a skill earns, exactly or by containment either way.
fn skill_weight(skill: &str, importance: &[WeightedKeyword]) -> f64 {
    let skill = skill.to_lowercase();
    importance
        .iter()
        .filter(|kw| {
            let kw = kw.keyword.to_lowercase();
            kw == skill || skill.contains(&kw) || kw.contains(&skill)
        })
        .map(|kw| kw.weight)
        .fold(0.0, f64::max)
}

/// Orders each category's skills by JD importance, ties keeping their order.
pub fn prioritize_skills(skills: &[SkillCategory], importance: &[WeightedKeyword]) -> Vec<SkillCategory> {
    skills
        .iter()
        .map(|category| {
            let mut ranked: Vec<(f64, &String)> = category
                .skills
                .iter()
                .map(|s| (skill_weight(s, importance), s))
                .collect();
            ranked.sort_by(|a, b| by_weight_desc(a.0, b.0));
            SkillCategory {
                category: category.category.clone(),
                skills: ranked.into_iter().map(|(_, s)| s.clone()).collect(),
            }
        })
        .collect()
}

/// Most relevant roles first: keywords in the title count fully, keywords in
/// responsibilities count half.
pub fn reorder_experiences(
    experiences: &[ExperienceEntry],
    importance: &[WeightedKeyword],
) -> Vec<ExperienceEntry> {
    let mut scored: Vec<(f64, &ExperienceEntry)> = experiences
        .iter()
        .map(|exp| {
            let title = exp.title.to_lowercase();
            let bullets = exp.responsibilities.join(" ").to_lowercase();
            let score: f64 = importance
                .iter()
                .map(|kw| {
                    let keyword = kw.keyword.to_lowercase();
                    let mut s = 0.0;
                    if contains_term(&title, &keyword) {
                        s += kw.weight;
                    }
                    if contains_term(&bullets, &keyword) {
                        s += kw.weight * 0.5;
                    }
                    s
                })
                .sum();
            (score, exp)
        })
        .collect();

    scored.sort_by(|a, b| by_weight_desc(a.0, b.0));
    scored.into_iter().map(|(_, exp)| exp.clone()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Weighted share (0 – 100) of JD keyword importance present in the text.
pub fn calculate_ats_score(text: &str, importance: &[WeightedKeyword]) -> f64 {
    let total: f64 = importance.iter().map(|kw| kw.weight).sum();
    if text.trim().is_empty() || total <= 0.0 {
        return 0.0;
    }

    let text_lower = text.to_lowercase();
    let matched: f64 = importance
        .iter()
        .filter(|kw| contains_term(&text_lower, &kw.keyword.to_lowercase()))
        .map(|kw| kw.weight)
        .sum();

    (matched / total * 100.0).min(100.0)
}

/// Missing keywords with importance above 0.5, most important first.
pub fn identify_keyword_gaps(text: &str, importance: &[WeightedKeyword]) -> Vec<String> {
    let mut sorted: Vec<&WeightedKeyword> = importance.iter().collect();
    sorted.sort_by(|a, b| by_weight_desc(a.weight, b.weight));

    if text.trim().is_empty() {
        return sorted.into_iter().map(|kw| kw.keyword.clone()).collect();
    }

    let text_lower = text.to_lowercase();
    sorted
        .into_iter()
        .filter(|kw| kw.weight > GAP_IMPORTANCE)
        .filter(|kw| !contains_term(&text_lower, &kw.keyword.to_lowercase()))
        .map(|kw| kw.keyword.clone())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Iterative optimization
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationIteration {
    pub iteration: u32,
    pub score: f64,
    pub gaps: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub iterations: Vec<OptimizationIteration>,
    pub final_resume: ResumeDocument,
    pub final_score: f64,
}

fn split_bullet(line: &str) -> Option<(&str, &str)> {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    BULLET_PREFIXES.iter().find_map(|prefix| {
        rest.strip_prefix(prefix)
            .map(|text| (&line[..indent.len() + prefix.len()], text))
    })
}

/// Applies one round of edits and describes each change made.
fn apply_improvements(doc: &mut ResumeDocument, gaps: &[String], importance: &[WeightedKeyword]) -> Vec<String> {
    let mut improvements = Vec::new();

    let summary = if gaps.is_empty() {
        None
    } else {
        doc.section_mut("summary")
    };
    if let Some(summary) = summary {
        let adjusted = adjust_summary(summary, importance);
        if adjusted != *summary {
            *summary = adjusted;
            improvements.push("Adjusted summary toward top JD keywords".to_string());
        }
    }

    if let Some(skills_body) = doc.section_mut("skills") {
        let categorized = skills_body
            .lines()
            .filter(|l| !l.trim().is_empty())
            .all(|l| l.contains(':'));
        if categorized {
            let current = parse_skills_section(skills_body);
            let prioritized = prioritize_skills(&current, importance);
            if prioritized != current {
                *skills_body = prioritized
                    .iter()
                    .map(|c| {
                        if c.category == GENERAL_SKILLS {
                            c.skills.join(", ")
                        } else {
                            format!("{}: {}", c.category, c.skills.join(", "))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                improvements.push("Reordered skills by JD importance".to_string());
            }
        }
    }

    let mut unplaced = identify_missing_keywords(&doc.body_markdown(), gaps);

    for name in ["summary", "experience"] {
        if unplaced.is_empty() {
            break;
        }
        let Some(body) = doc.section_mut(name) else {
            continue;
        };

        let mut lines: Vec<String> = Vec::new();
        for line in body.lines() {
            match split_bullet(line) {
                Some((prefix, text)) if !unplaced.is_empty() => {
                    let take = unplaced.len().min(KEYWORDS_PER_BULLET);
                    let added: Vec<String> = unplaced.drain(..take).collect();
                    let rewritten = rewrite_bullet_with_keywords(text, &added);
                    improvements.push(format!(
                        "Added {} to {name} bullet \"{}\"",
                        added.join(", "),
                        truncate_chars(text, 40)
                    ));
                    lines.push(format!("{prefix}{rewritten}"));
                }
                _ => lines.push(line.to_string()),
            }
        }
        *body = lines.join("\n");
    }

    improvements
}

/// Bounded optimize loop. Stops at the target score, after `max_iterations`,
/// or when a round finds nothing left to change.
pub fn optimize_resume_iteratively(
    document: ResumeDocument,
    analysis: &JdAnalysis,
    target_score: f64,
    max_iterations: u32,
) -> OptimizationResult {
    let importance = &analysis.keyword_importance;
    let mut doc = document;
    let mut iterations = Vec::new();

    for iteration in 1..=max_iterations {
        let text = doc.body_markdown();
        let score = calculate_ats_score(&text, importance);
        let gaps = identify_keyword_gaps(&text, importance);

        let mut record = OptimizationIteration {
            iteration,
            score,
            gaps: gaps.iter().take(REPORTED_GAPS).cloned().collect(),
            improvements: Vec::new(),
        };

        if score >= target_score {
            debug!(iteration, score, "Target ATS score reached");
            iterations.push(record);
            break;
        }

        record.improvements = apply_improvements(&mut doc, &gaps, importance);
        let stalled = record.improvements.is_empty();
        debug!(iteration, score, changes = record.improvements.len(), "Optimization round");
        iterations.push(record);

        if stalled {
            break;
        }
    }

    let final_score = calculate_ats_score(&doc.body_markdown(), importance);
    OptimizationResult {
        iterations,
        final_resume: doc,
        final_score,
    }
}

pub fn render_optimization_report(result: &OptimizationResult) -> String {
    let mut report = format!(
        "# Resume Optimization Report\n\n**Final Score:** {:.1}%\n**Iterations:** {}\n\n## Iteration History\n\n",
        result.final_score,
        result.iterations.len()
    );

    for it in &result.iterations {
        report.push_str(&format!("### Iteration {}\n", it.iteration));
        report.push_str(&format!("- **Score:** {:.1}%\n", it.score));
        report.push_str(&format!("- **Gaps:** {}\n", it.gaps.join(", ")));
        if !it.improvements.is_empty() {
            report.push_str(&format!("- **Improvements:** {}\n", it.improvements.join("; ")));
        }
        report.push('\n');
    }

    report
}
