//! Cover letter generation.
//!
//! Opening hook from company research, body paragraphs built from the most
//! JD-relevant anecdotes, and a tone-matched call to action. Phrase variants
//! are drawn from the injected `Rng`.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{JdAnalysis, WeightedKeyword};
use crate::generation::anecdotes::Anecdote;
use crate::generation::research::CompanyResearch;
use crate::generation::templates::{pick, Tone};
use crate::text::{join_natural, lowercase_first};

const BODY_ANECDOTES: usize = 3;
const TOP_SKILLS: usize = 5;

/// First quantified achievement sentence in an anecdote body.
static RESULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Reduced|Increased|Improved|Achieved|Built|Led|Scaled)[^.]+\d+%?[^.]*")
        .expect("valid regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

pub struct CoverLetterInput<'a> {
    pub user: &'a UserInfo,
    pub research: &'a CompanyResearch,
    pub analysis: &'a JdAnalysis,
    pub anecdotes: &'a [Anecdote],
    pub position: &'a str,
    pub tone: Tone,
    pub custom_notes: Option<&'a str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Anecdote selection
// ────────────────────────────────────────────────────────────────────────────

/// Top `max` anecdotes by summed importance of the JD keywords they cover.
///
/// Ties keep input order.
pub fn select_relevant_anecdotes<'a>(
    anecdotes: &'a [Anecdote],
    importance: &[WeightedKeyword],
    max: usize,
) -> Vec<&'a Anecdote> {
    if anecdotes.is_empty() || importance.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &Anecdote)> = anecdotes
        .iter()
        .map(|anecdote| {
            let score = importance
                .iter()
                .filter(|kw| anecdote.covers(&kw.keyword.to_lowercase()))
                .map(|kw| kw.weight)
                .sum();
            (score, anecdote)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().take(max).map(|(_, a)| a).collect()
}

fn extract_result(anecdote: &Anecdote) -> String {
    let result = RESULT_RE
        .find(&anecdote.content)
        .map(|m| m.as_str())
        .unwrap_or(&anecdote.impact);
    result.trim().trim_end_matches('.').to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Opening hook. Prefers news, then mission, then values.
pub fn generate_opening<R: Rng + ?Sized>(
    research: &CompanyResearch,
    position: &str,
    tone: Tone,
    rng: &mut R,
) -> String {
    let company = research.company_or("the company");
    let verb = pick(tone.enthusiasm_verbs(), rng)
        .copied()
        .unwrap_or("excited to apply");
    let mission = research.mission.trim();
    let culture = research.culture.trim();
    let latest_news = research.recent_news.first();

    let mut opening = match (latest_news, research.values.first()) {
        (Some(news), _) if tone == Tone::Formal => format!(
            "I was {verb} for the {position} position at {company}. I have been following \
             {company}'s recent {news} and am impressed by the company's growth trajectory and vision"
        ),
        (Some(news), _) => format!(
            "I was {verb} for the {position} position at {company}. Your recent {news} caught \
             my attention and reinforced my interest in joining your team"
        ),
        (None, _) if !mission.is_empty() => format!(
            "I am {verb} for the {position} position at {company}. Your mission to {mission} \
             aligns perfectly with my professional goals"
        ),
        (None, Some(value)) => format!(
            "I am {verb} for the {position} position at {company}. I am particularly drawn to \
             your focus on {value}"
        ),
        (None, None) => format!("I am {verb} for the {position} position at {company}"),
    };

    if !culture.is_empty() && latest_news.is_none() && mission.is_empty() {
        opening.push_str(&format!(". I'm impressed by {company}'s {culture}"));
    } else if !mission.is_empty() && latest_news.is_some() {
        opening.push_str(" and am excited about the opportunity to contribute to this mission");
    } else if latest_news.is_none() && mission.is_empty() {
        if let Some(second) = research.values.get(1) {
            opening.push_str(&format!(", as well as your commitment to {second}"));
        }
    }

    let mut opening = opening.trim().to_string();
    if !opening.ends_with('.') {
        opening.push('.');
    }
    opening
}

/// Up to two anecdote paragraphs plus a fit paragraph.
pub fn generate_body(analysis: &JdAnalysis, anecdotes: &[Anecdote], tone: Tone) -> String {
    let selected = select_relevant_anecdotes(anecdotes, &analysis.keyword_importance, BODY_ANECDOTES);
    let top_skills: Vec<&str> = analysis
        .keyword_importance
        .iter()
        .take(TOP_SKILLS)
        .map(|kw| kw.keyword.as_str())
        .collect();

    let mut paragraphs: Vec<String> = Vec::new();

    if let Some(first) = selected.first() {
        let result = extract_result(first);
        let skills = first.skill_set();
        let matching: Vec<&str> = top_skills
            .iter()
            .copied()
            .filter(|s| skills.contains(&s.to_lowercase()))
            .take(3)
            .collect();

        let para = if matching.is_empty() {
            format!("In my current role, I {}.", lowercase_first(&result))
        } else if tone == Tone::Formal {
            format!(
                "In my current role, I have extensive experience with {}. {result}. This \
                 experience has equipped me with a deep understanding of how to leverage these \
                 technologies to deliver high-impact solutions.",
                join_natural(&matching)
            )
        } else {
            format!(
                "Your job description emphasizes {}. In my current role, I {}. This hands-on \
                 experience has given me deep insights into building scalable, production-ready \
                 systems with these technologies.",
                join_natural(&matching),
                lowercase_first(&result)
            )
        };
        paragraphs.push(para);
    }

    if let Some(second) = selected.get(1) {
        let result = extract_result(second);
        let skills = second.skill_set();
        let first_para = paragraphs.first().map(|p| p.to_lowercase()).unwrap_or_default();
        let additional: Vec<&str> = top_skills
            .iter()
            .copied()
            .filter(|s| {
                let lower = s.to_lowercase();
                skills.contains(&lower) && !first_para.contains(&lower)
            })
            .take(2)
            .collect();

        if !result.is_empty() {
            let para = match (additional.is_empty(), tone) {
                (false, Tone::Formal) => format!(
                    "Additionally, I have demonstrated expertise in {}. {result}.",
                    additional.join(" and ")
                ),
                (false, _) => format!(
                    "Beyond this, I've worked extensively with {}. {result}.",
                    additional.join(" and ")
                ),
                (true, Tone::Formal) => format!("Additionally, I {}.", lowercase_first(&result)),
                (true, _) => format!("I've also {}.", lowercase_first(&result)),
            };
            paragraphs.push(para);
        }
    }

    if paragraphs.is_empty() && !analysis.technical_skills.is_empty() {
        let skills: Vec<&str> = analysis
            .technical_skills
            .iter()
            .take(4)
            .map(String::as_str)
            .collect();
        paragraphs.push(format!(
            "Your requirements for {} align well with my expertise. I have extensive experience \
             in these technologies and am passionate about building scalable solutions.",
            join_natural(&skills)
        ));
    }

    if !paragraphs.is_empty() {
        paragraphs.push(tone.fit_paragraph().to_string());
    }

    paragraphs.join("\n\n")
}

pub fn generate_closing<R: Rng + ?Sized>(
    company: &str,
    position: &str,
    tone: Tone,
    rng: &mut R,
) -> String {
    let closings = tone.closings(company, position);
    pick(closings.as_slice(), rng).cloned().unwrap_or_default()
}

/// Full letter as plain markdown.
pub fn generate_cover_letter<R: Rng + ?Sized>(input: &CoverLetterInput<'_>, rng: &mut R) -> String {
    let company = input.research.company_or("the company");
    let user = input.user;

    let header: Vec<&str> = [&user.name, &user.email, &user.phone, &user.linkedin]
        .into_iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .collect();

    let opening = generate_opening(input.research, input.position, input.tone, rng);
    let mut body = generate_body(input.analysis, input.anecdotes, input.tone);

    if !input.research.tech_stack.is_empty() {
        let stack: Vec<&str> = input
            .research
            .tech_stack
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        let transition = format!(
            "I'm also excited about {company}'s use of {} in your tech stack, as I've worked \
             extensively with these technologies.",
            stack.join(", ")
        );
        if body.is_empty() {
            body = transition;
        } else {
            body = format!("{body}\n\n{transition}");
        }
    }

    let closing = generate_closing(company, input.position, input.tone, rng);
    let signature = format!("{}\n{}", input.tone.signoff(), user.name.trim());

    let mut sections: Vec<String> = vec![header.join("\n")];
    let addressee = input.research.company.trim();
    if !addressee.is_empty() {
        sections.push(addressee.to_string());
    }
    sections.push("Dear Hiring Manager,".to_string());
    sections.push(opening);
    if !body.is_empty() {
        sections.push(body);
    }
    if let Some(notes) = input.custom_notes.map(str::trim).filter(|n| !n.is_empty()) {
        sections.push(notes.to_string());
    }
    sections.push(closing);
    sections.push(signature);

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn anecdote(id: &str, skills: &[&str], content: &str, impact: &str) -> Anecdote {
        Anecdote {
            id: id.to_string(),
            title: id.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            impact: impact.to_string(),
            content: content.to_string(),
        }
    }

    fn sample_anecdotes() -> Vec<Anecdote> {
        vec![
            anecdote(
                "frontend",
                &["react"],
                "Rebuilt the dashboard.",
                "Shipped a new dashboard",
            ),
            anecdote(
                "cache",
                &["Python", "Redis"],
                "Added caching. Reduced API latency by 60% across checkout.",
                "Faster checkout",
            ),
            anecdote(
                "pipeline",
                &["kafka", "aws"],
                "Scaled ingestion to 5x the volume.",
                "Scaled ingestion",
            ),
        ]
    }

    fn sample_analysis() -> JdAnalysis {
        JdAnalysis {
            technical_skills: vec!["python".into(), "redis".into(), "kafka".into()],
            keyword_importance: vec![
                WeightedKeyword::new("python", 1.0),
                WeightedKeyword::new("redis", 0.8),
                WeightedKeyword::new("kafka", 0.6),
                WeightedKeyword::new("aws", 0.4),
            ],
            ..Default::default()
        }
    }

    fn research() -> CompanyResearch {
        CompanyResearch {
            company: "Acme".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_relevant_anecdotes_orders_by_importance() {
        let anecdotes = sample_anecdotes();
        let selected = select_relevant_anecdotes(&anecdotes, &sample_analysis().keyword_importance, 2);

        let ids: Vec<&str> = selected.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cache", "pipeline"]);
    }

    #[test]
    fn test_select_relevant_anecdotes_empty_inputs() {
        assert!(select_relevant_anecdotes(&sample_anecdotes(), &[], 3).is_empty());
        assert!(select_relevant_anecdotes(&[], &sample_analysis().keyword_importance, 3).is_empty());
    }

    #[test]
    fn test_opening_prefers_news() {
        let research = CompanyResearch {
            recent_news: vec!["Series B funding".to_string()],
            mission: "organize logistics".to_string(),
            ..research()
        };
        let opening =
            generate_opening(&research, "Backend Engineer", Tone::Professional, &mut StdRng::seed_from_u64(1));

        assert!(opening.contains("Your recent Series B funding caught my attention"));
        assert!(opening.ends_with("contribute to this mission."));
    }

    #[test]
    fn test_opening_formal_news() {
        let research = CompanyResearch {
            recent_news: vec!["expansion into Europe".to_string()],
            ..research()
        };
        let opening = generate_opening(&research, "SRE", Tone::Formal, &mut StdRng::seed_from_u64(3));
        assert!(opening.contains("I have been following Acme's recent expansion into Europe"));
        assert!(opening.ends_with('.'));
    }

    #[test]
    fn test_opening_values_and_culture_fallbacks() {
        let with_values = CompanyResearch {
            values: vec!["craft".to_string(), "candor".to_string()],
            ..research()
        };
        let opening = generate_opening(&with_values, "SRE", Tone::Casual, &mut StdRng::seed_from_u64(2));
        assert!(opening.contains("your focus on craft, as well as your commitment to candor."));

        let with_culture = CompanyResearch {
            culture: "engineering-first culture".to_string(),
            ..research()
        };
        let opening = generate_opening(&with_culture, "SRE", Tone::Casual, &mut StdRng::seed_from_u64(2));
        assert!(opening.ends_with("I'm impressed by Acme's engineering-first culture."));
    }

    #[test]
    fn test_opening_defaults_company_name() {
        let opening = generate_opening(
            &CompanyResearch::default(),
            "SRE",
            Tone::Professional,
            &mut StdRng::seed_from_u64(9),
        );
        assert!(opening.ends_with("the SRE position at the company."));
    }

    #[test]
    fn test_body_uses_anecdote_results() {
        let body = generate_body(&sample_analysis(), &sample_anecdotes(), Tone::Professional);
        let paragraphs: Vec<&str> = body.split("\n\n").collect();

        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs[0].starts_with("Your job description emphasizes python and redis."));
        assert!(paragraphs[0].contains("I reduced API latency by 60% across checkout."));
        assert!(paragraphs[1].contains("kafka"));
        assert!(paragraphs[1].contains("Scaled ingestion to 5x the volume"));
        assert_eq!(paragraphs[2], Tone::Professional.fit_paragraph());
    }

    #[test]
    fn test_body_without_anecdotes_lists_skills() {
        let body = generate_body(&sample_analysis(), &[], Tone::Formal);
        assert!(body.starts_with("Your requirements for python, redis, and kafka align well"));
        assert!(body.ends_with(Tone::Formal.fit_paragraph()));
    }

    #[test]
    fn test_body_empty_when_nothing_to_say() {
        assert_eq!(generate_body(&JdAnalysis::default(), &[], Tone::Casual), "");
    }

    #[test]
    fn test_closing_is_one_of_the_tone_variants() {
        let closing = generate_closing("Acme", "SRE", Tone::Casual, &mut StdRng::seed_from_u64(5));
        assert!(Tone::Casual.closings("Acme", "SRE").contains(&closing));
    }

    #[test]
    fn test_generate_cover_letter_layout() {
        let user = UserInfo {
            name: "Jordan Lee".to_string(),
            email: "jordan@example.com".to_string(),
            ..Default::default()
        };
        let research = CompanyResearch {
            tech_stack: vec!["Rust".to_string(), "Postgres".to_string(), "Kafka".to_string()],
            ..research()
        };
        let analysis = sample_analysis();
        let anecdotes = sample_anecdotes();
        let input = CoverLetterInput {
            user: &user,
            research: &research,
            analysis: &analysis,
            anecdotes: &anecdotes,
            position: "Backend Engineer",
            tone: Tone::Formal,
            custom_notes: Some("I will be relocating to Denver in March."),
        };

        let letter = generate_cover_letter(&input, &mut StdRng::seed_from_u64(42));

        assert!(letter.starts_with("Jordan Lee\njordan@example.com\n\nAcme\n\nDear Hiring Manager,"));
        assert!(letter.contains("Acme's use of Rust, Postgres in your tech stack"));
        assert!(!letter.contains("Kafka in your tech stack"));
        assert!(letter.ends_with("Sincerely,\nJordan Lee"));

        let notes_at = letter.find("relocating to Denver").unwrap();
        let closing_at = letter.find("I would welcome the opportunity").unwrap();
        assert!(notes_at < closing_at);
    }

    #[test]
    fn test_generate_cover_letter_without_company() {
        let user = UserInfo {
            name: "Jordan Lee".to_string(),
            ..Default::default()
        };
        let research = CompanyResearch {
            tech_stack: vec!["Rust".to_string()],
            ..Default::default()
        };
        let analysis = sample_analysis();
        let input = CoverLetterInput {
            user: &user,
            research: &research,
            analysis: &analysis,
            anecdotes: &[],
            position: "Backend Engineer",
            tone: Tone::Professional,
            custom_notes: None,
        };

        for seed in 0..8 {
            let letter = generate_cover_letter(&input, &mut StdRng::seed_from_u64(seed));
            assert!(letter.starts_with("Jordan Lee\n\nDear Hiring Manager,"));
            assert_eq!(letter.matches("Hiring Manager").count(), 1);
            assert!(letter.contains("the company's use of Rust"));
        }
    }
}
