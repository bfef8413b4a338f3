//! Interview preparation documents.
//!
//! Likely technical and behavioral questions with STAR answers drawn from the
//! user's anecdotes, company-specific questions, questions to ask the
//! interviewers, and key talking points, rendered as one markdown document.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::JdAnalysis;
use crate::generation::anecdotes::Anecdote;
use crate::generation::research::CompanyResearch;
use crate::text::lowercase_first;

const MAX_TECHNICAL: usize = 8;
const MAX_BEHAVIORAL: usize = 7;
const MAX_TALKING_POINTS: usize = 5;
const QUESTIONS_PER_GROUP: usize = 5;

/// Question words this short ("a", "you", "how") say nothing about relevance.
const MIN_MATCH_WORD_LEN: usize = 4;

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$\d+(?:\.\d+)?[MKB]?|\d+(?:\.\d+)?%|\b\d+x\b|\b\d+\s*(?:hours?|minutes?|seconds?|days?|weeks?|months?)\b",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Experience,
    SystemDesign,
    Performance,
    Domain,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrepQuestion {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
}

impl PrepQuestion {
    fn new(question: impl Into<String>, answer: impl Into<String>, kind: Option<QuestionKind>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnecdoteMatch<'a> {
    pub question: &'a str,
    pub anecdote: Option<&'a Anecdote>,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionsToAsk {
    pub technical: Vec<String>,
    pub culture: Vec<String>,
    pub strategic: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Jaccard similarity of two skill lists, case-insensitive.
pub fn calculate_skill_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: HashSet<String> = a.iter().map(|s| s.to_lowercase()).collect();
    let b: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Quantities in reading order: percentages, multipliers, durations, dollars.
pub fn extract_metrics(text: &str) -> Vec<String> {
    METRIC_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Text after `marker` up to the next bold marker.
fn bold_section<'a>(content: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = content.split_once(marker)?;
    let section = rest.split("**").next().unwrap_or("").trim();
    (!section.is_empty()).then_some(section)
}

/// Renders an anecdote as Situation / Task / Action / Result.
///
/// Bodies already written with plain `Situation:` … `Result:` labels are
/// passed through with bold heading lines dropped.
pub fn format_star_answer(anecdote: &Anecdote) -> String {
    let content = &anecdote.content;

    if ["Situation:", "Task:", "Action:", "Result:"]
        .iter()
        .all(|marker| content.contains(marker))
    {
        return content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("**Context:**"))
            .filter(|line| !(line.starts_with("**") && line.ends_with("**")))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let situation = bold_section(content, "**Context:**");
    let action =
        bold_section(content, "**Actions:**").or_else(|| bold_section(content, "**Action:**"));
    let result =
        bold_section(content, "**Results:**").or_else(|| bold_section(content, "**Result:**"));

    let mut parts = Vec::new();
    if let Some(situation) = situation {
        parts.push(format!("**Situation:** {situation}"));
    }
    if !anecdote.title.is_empty() {
        parts.push(format!("**Task:** {}", anecdote.title));
    }
    if let Some(action) = action {
        parts.push(format!("**Action:** {action}"));
    }
    match result {
        Some(result) => parts.push(format!("**Result:** {result}")),
        None if !anecdote.impact.is_empty() => {
            parts.push(format!("**Result:** {}", anecdote.impact))
        }
        None => {}
    }

    parts.join("\n\n")
}

/// Best anecdote per question: title words score 2, skills 1.5, body words 0.5.
///
/// With no positive match the first anecdote stands in.
pub fn match_anecdotes_to_questions<'a>(
    questions: &'a [&'a str],
    anecdotes: &'a [Anecdote],
) -> Vec<AnecdoteMatch<'a>> {
    questions
        .iter()
        .map(|&question| {
            let lowered = question.to_lowercase();
            let all_words: HashSet<&str> = lowered
                .split(|c: char| !c.is_alphanumeric() && c != '-')
                .filter(|w| !w.is_empty())
                .collect();
            let match_words: Vec<&str> = all_words
                .iter()
                .copied()
                .filter(|w| w.len() >= MIN_MATCH_WORD_LEN)
                .collect();

            let mut best: Option<&Anecdote> = None;
            let mut best_score = 0.0;

            for anecdote in anecdotes {
                let title = anecdote.title.to_lowercase();
                let content = anecdote.content.to_lowercase();
                let mut score = 0.0;

                if match_words.iter().any(|w| title.contains(w)) {
                    score += 2.0;
                }
                let skill_hits = anecdote
                    .skill_set()
                    .iter()
                    .filter(|s| all_words.contains(s.as_str()))
                    .count();
                score += skill_hits as f64 * 1.5;
                let body_hits = match_words.iter().filter(|w| content.contains(*w)).count();
                score += body_hits as f64 * 0.5;

                if score > best_score {
                    best_score = score;
                    best = Some(anecdote);
                }
            }

            AnecdoteMatch {
                question,
                anecdote: best.or_else(|| anecdotes.first()),
                score: best_score,
            }
        })
        .collect()
}

fn find_anecdote<'a>(
    anecdotes: &'a [Anecdote],
    predicate: impl Fn(&Anecdote) -> bool,
) -> Option<&'a Anecdote> {
    anecdotes.iter().find(|a| predicate(a))
}

// ────────────────────────────────────────────────────────────────────────────
// Question generators
// ────────────────────────────────────────────────────────────────────────────

pub fn generate_technical_questions(analysis: &JdAnalysis, anecdotes: &[Anecdote]) -> Vec<PrepQuestion> {
    let mut questions = Vec::new();

    for skill in analysis.technical_skills.iter().take(5) {
        let skill_lower = skill.to_lowercase();
        let answer = match find_anecdote(anecdotes, |a| a.skill_set().contains(&skill_lower)) {
            Some(anecdote) => format_star_answer(anecdote),
            None => format!(
                "**Your Answer Template:**\n[Based on your {skill} experience, describe a specific project or achievement]"
            ),
        };
        questions.push(PrepQuestion::new(
            format!("Describe your experience with {skill}"),
            answer,
            Some(QuestionKind::Experience),
        ));
    }

    if analysis.seniority.is_senior_or_above() {
        let domains = &analysis.domain_expertise;
        let has_domain = |d: &str| domains.iter().any(|x| x == d);

        if has_domain("distributed systems") || has_domain("architecture") {
            let architecture = find_anecdote(anecdotes, |a| {
                let skills = a.skill_set();
                ["architecture", "system design", "distributed", "scalability"]
                    .iter()
                    .any(|s| skills.contains(*s))
            });
            let answer = match architecture {
                Some(anecdote) => format!(
                    "**Your Answer Template (based on similar experience):**\n\n{}",
                    format_star_answer(anecdote)
                ),
                None => "**Your Answer Template:**\n[Describe your approach: requirements gathering, architecture decisions, technology choices, scalability considerations, and trade-offs]".to_string(),
            };
            questions.push(PrepQuestion::new(
                "How would you design a real-time data pipeline that processes millions of events per day?",
                answer,
                Some(QuestionKind::SystemDesign),
            ));
        }

        if has_domain("scalability") || has_domain("performance") {
            let performance = find_anecdote(anecdotes, |a| {
                let content = a.content.to_lowercase();
                let impact = a.impact.to_lowercase();
                ["scale", "performance", "latency", "throughput", "optimize"]
                    .iter()
                    .any(|t| content.contains(t) || impact.contains(t))
            });
            let answer = match performance {
                Some(anecdote) => format_star_answer(anecdote),
                None => "**Your Answer Template:**\n[Describe the performance challenge, your approach, specific optimizations, and measurable results]".to_string(),
            };
            questions.push(PrepQuestion::new(
                "Tell me about a time you improved system performance or scalability",
                answer,
                Some(QuestionKind::Performance),
            ));
        }
    }

    for domain in analysis.domain_expertise.iter().take(2) {
        let domain_lower = domain.to_lowercase();
        let answer = match find_anecdote(anecdotes, |a| a.covers(&domain_lower)) {
            Some(anecdote) => format!(
                "**Your Answer Template:**\n\n{}",
                format_star_answer(anecdote)
            ),
            None => format!(
                "**Your Answer Template:**\n[Share your philosophy and approach to {domain}, backed by specific examples]"
            ),
        };
        questions.push(PrepQuestion::new(
            format!("What's your approach to {domain}?"),
            answer,
            Some(QuestionKind::Domain),
        ));
    }

    questions.truncate(MAX_TECHNICAL);
    questions
}

const BEHAVIORAL_PROMPTS: &[&str] = &[
    "Tell me about a time you resolved a conflict",
    "Describe a situation where you had to handle a difficult team member",
    "Give an example of a project that didn't go as planned and how you handled it",
    "Tell me about a time you had to make a difficult technical decision",
];

const LEADERSHIP_PROMPTS: &[&str] = &[
    "Describe your experience managing underperforming team members",
    "Tell me about a time you had to influence without authority",
    "How do you handle disagreements with other leaders or stakeholders?",
];

pub fn generate_behavioral_questions(analysis: &JdAnalysis, anecdotes: &[Anecdote]) -> Vec<PrepQuestion> {
    let mut prompts: Vec<&str> = BEHAVIORAL_PROMPTS.to_vec();
    if analysis.seniority.is_senior_or_above() {
        prompts.extend_from_slice(LEADERSHIP_PROMPTS);
    }

    match_anecdotes_to_questions(&prompts, anecdotes)
        .into_iter()
        .take(MAX_BEHAVIORAL)
        .map(|m| {
            let answer = match m.anecdote {
                Some(anecdote) => format!("**STAR Answer:**\n\n{}", format_star_answer(anecdote)),
                None => "**STAR Answer:**\n[Prepare a specific example using the STAR format]".to_string(),
            };
            PrepQuestion::new(m.question, answer, None)
        })
        .collect()
}

pub fn generate_company_specific_questions(
    research: &CompanyResearch,
    analysis: &JdAnalysis,
) -> Vec<PrepQuestion> {
    let company = research.company_or("the company");
    let mut answer = String::from("**Your Answer:**\n\"");

    match research.recent_news.first() {
        Some(news) => {
            answer.push_str(&format!("I'm excited about {company}'s recent {}. ", lowercase_first(news)));
        }
        None => {
            answer.push_str(&format!("I'm excited about the opportunity at {company}. "));
        }
    }

    let mission = research.mission.trim();
    if !mission.is_empty() {
        answer.push_str(&format!(
            "Your mission to {} aligns perfectly with my passion for building impactful solutions. ",
            lowercase_first(mission)
        ));
    }

    if !research.values.is_empty() {
        let values: Vec<&str> = research.values.iter().take(2).map(String::as_str).collect();
        answer.push_str(&format!(
            "I'm particularly drawn to your values around {}, which resonate with my own professional values. ",
            values.join(", ")
        ));
    }

    answer.push_str(
        "Having followed your growth, I'm impressed by [specific aspect] and excited to contribute to [specific goal].\"",
    );

    let mut questions = vec![PrepQuestion::new(format!("Why {company}?"), answer, None)];

    if !analysis.domain_expertise.is_empty() {
        let domains: Vec<&str> = analysis
            .domain_expertise
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        questions.push(PrepQuestion::new(
            "What interests you about this role?",
            format!(
                "**Your Answer:**\n\"This role combines my strengths in {}. I'm particularly excited about the opportunity to [specific responsibility from JD]. Based on my experience with [relevant achievement], I know I can make an immediate impact.\"",
                domains.join(" and ")
            ),
            None,
        ));
    }

    questions
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn generate_questions_to_ask(research: &CompanyResearch, analysis: &JdAnalysis) -> QuestionsToAsk {
    let technical = owned(&[
        "What's your current deployment frequency and what are the main blockers to deploying more often?",
        "How does the team handle on-call and incident management?",
        "What's the balance between new feature development and technical debt?",
        "Can you walk me through a recent technical challenge the team faced and how you solved it?",
        "How do you approach testing and quality assurance?",
    ]);

    let culture = owned(&[
        "What does work-life balance look like for this role?",
        "How does the team collaborate - what does a typical day look like?",
        "What are the biggest opportunities for professional growth in this role?",
        "How do you support continuous learning and development?",
        "How are decisions made between engineering and product?",
    ]);

    let mut strategic = if analysis.seniority.is_leadership_track() {
        owned(&[
            "What are the top 3 technical challenges for this role in the next year?",
            "How do you see the engineering organization evolving over the next 2-3 years?",
            "What does success look like in the first 90 days?",
            "How does engineering partner with product and other teams?",
            "What's the company's approach to technical strategy and architecture decisions?",
        ])
    } else {
        owned(&[
            "What does success look like in this role in the first 6 months?",
            "How does this role contribute to the team's larger goals?",
            "What are the biggest challenges the team is facing right now?",
            "What opportunities are there to take on additional responsibility?",
        ])
    };

    if let Some(news) = research.recent_news.first() {
        let news = news.to_lowercase();
        if news.contains("funding") {
            strategic.insert(
                0,
                "How will the recent funding impact the engineering team's priorities?".to_string(),
            );
        } else if news.contains("partnership") {
            strategic.insert(
                0,
                "How does the recent partnership affect the technical roadmap?".to_string(),
            );
        }
    }

    QuestionsToAsk {
        technical,
        culture,
        strategic,
    }
}

/// "Title: impact" lines for the anecdotes sharing the most top JD skills.
pub fn extract_key_talking_points(anecdotes: &[Anecdote], analysis: &JdAnalysis) -> Vec<String> {
    let top_skills: HashSet<String> = analysis
        .technical_skills
        .iter()
        .take(5)
        .chain(analysis.leadership_skills.iter().take(3))
        .map(|s| s.to_lowercase())
        .collect();

    let mut relevant: Vec<(&Anecdote, usize)> = anecdotes
        .iter()
        .map(|a| (a, a.skill_set().intersection(&top_skills).count()))
        .filter(|(_, overlap)| *overlap > 0)
        .collect();
    relevant.sort_by(|a, b| b.1.cmp(&a.1));

    relevant
        .into_iter()
        .take(MAX_TALKING_POINTS)
        .map(|(anecdote, _)| {
            if !anecdote.impact.is_empty() {
                format!("{}: {}", anecdote.title, anecdote.impact)
            } else if let Some(metric) = extract_metrics(&anecdote.content).first() {
                format!("{} ({metric})", anecdote.title)
            } else {
                anecdote.title.clone()
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

fn push_numbered(doc: &mut String, heading: &str, questions: &[PrepQuestion]) {
    doc.push_str(&format!("## {heading}\n\n"));
    for (i, q) in questions.iter().enumerate() {
        doc.push_str(&format!("### {}. {}\n\n", i + 1, q.question));
        doc.push_str(&format!("{}\n\n", q.answer));
    }
}

fn push_bullets(doc: &mut String, heading: &str, items: &[String]) {
    doc.push_str(&format!("{heading}\n\n"));
    for item in items {
        doc.push_str(&format!("- {item}\n"));
    }
    doc.push('\n');
}

pub fn generate_interview_prep(
    research: &CompanyResearch,
    analysis: &JdAnalysis,
    anecdotes: &[Anecdote],
    position: &str,
) -> String {
    let company = research.company_or("Company");
    let technical = generate_technical_questions(analysis, anecdotes);
    let behavioral = generate_behavioral_questions(analysis, anecdotes);
    let company_questions = generate_company_specific_questions(research, analysis);
    let to_ask = generate_questions_to_ask(research, analysis);
    let talking_points = extract_key_talking_points(anecdotes, analysis);

    let mut doc = format!("# Interview Prep: {position} @ {company}\n\n");

    push_numbered(&mut doc, "Likely Technical Questions", &technical);
    push_numbered(&mut doc, "Behavioral Questions", &behavioral);
    if !company_questions.is_empty() {
        push_numbered(&mut doc, "Company-Specific Questions", &company_questions);
    }

    doc.push_str("## Questions to Ask Interviewers\n\n");
    for (heading, questions) in [
        ("### Technical Questions", &to_ask.technical),
        ("### Culture Questions", &to_ask.culture),
        ("### Strategic Questions", &to_ask.strategic),
    ] {
        let shown = &questions[..questions.len().min(QUESTIONS_PER_GROUP)];
        push_bullets(&mut doc, heading, shown);
    }

    if !talking_points.is_empty() {
        push_bullets(&mut doc, "## Key Talking Points", &talking_points);
    }

    doc
}
