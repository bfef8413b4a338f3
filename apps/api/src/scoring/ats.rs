//! ATS Scorer: rates how well a resume will survive keyword-based screening
//! for a given JD.
//!
//! overall = 0.5·keyword + 0.2·formatting + 0.2·skills + 0.1·structure
//!
//! Every sub-score is 0 – 100 and rounded to two decimals.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::analysis::jd_analyzer::{
    analyze_job_description, extract_keywords, weight_of, JdAnalysis, WeightedKeyword,
};
use crate::scoring::models::{
    AtsScore, FormattingDetail, KeywordMatchDetail, Recommendation, RecommendationCategory,
    ScoreBreakdown, SectionStructureDetail, SkillsAlignmentDetail,
};
use crate::text::contains_term;

#[derive(Debug, Error)]
pub enum AtsScoreError {
    #[error("Resume text cannot be empty")]
    EmptyResume,

    #[error("Job description cannot be empty")]
    EmptyJobDescription,
}

// ────────────────────────────────────────────────────────────────────────────
// Constants
// ────────────────────────────────────────────────────────────────────────────

/// Importance at or above which a JD keyword counts as required.
const REQUIRED_THRESHOLD: f64 = 0.7;
/// Importance assumed for a keyword absent from the importance map.
const DEFAULT_IMPORTANCE: f64 = 0.5;
const MAX_MISSING_NICE_TO_HAVE: usize = 5;
const MAX_RECOMMENDATIONS: usize = 10;

const STANDARD_SECTIONS: &[&str] = &[
    "SUMMARY",
    "PROFESSIONAL SUMMARY",
    "OBJECTIVE",
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "EMPLOYMENT",
    "EDUCATION",
    "SKILLS",
    "TECHNICAL SKILLS",
    "CERTIFICATIONS",
    "PROJECTS",
];

const EXPERIENCE_HEADERS: &[&str] = &[
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
    "EMPLOYMENT",
];
const EDUCATION_HEADERS: &[&str] = &["EDUCATION", "ACADEMIC BACKGROUND"];
const SKILLS_HEADERS: &[&str] = &["SKILLS", "TECHNICAL SKILLS", "CORE COMPETENCIES"];

/// Longer lines are prose, not headers.
const MAX_HEADER_LEN: usize = 40;

static DATE_FORMATS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{4}-\d{2}\b",
        r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}\b",
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
        r"\b\d{1,2}/\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:[•\-*]|\d+\.)").expect("valid regex"));

/// Markdown table rows and box-drawing rules.
static TABLE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?m)^\s*\|.*\|\s*$", r"─{3,}", r"═{3,}"]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("valid regex")
});

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(matched: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        matched as f64 / total as f64 * 100.0
    }
}

/// Header-shaped lines as (line index, normalized uppercase text).
///
/// Markdown decoration (`## `, `**`, trailing `:`) is stripped so parsed and
/// optimized resumes score the same as plain text.
fn header_lines(text: &str) -> Vec<(usize, String)> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let normalized = line
                .trim()
                .trim_start_matches('#')
                .trim()
                .trim_matches('*')
                .trim()
                .trim_end_matches(':')
                .trim()
                .to_uppercase();
            (!normalized.is_empty() && normalized.chars().count() <= MAX_HEADER_LEN)
                .then_some((idx, normalized))
        })
        .collect()
}

fn first_header(headers: &[(usize, String)], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .find(|(_, h)| names.contains(&h.as_str()))
        .map(|(idx, _)| *idx)
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

/// The analyzer's keyword extraction applied to a resume, lowercased and deduplicated.
pub fn extract_keywords_from_resume(resume_text: &str) -> Vec<String> {
    let unique: BTreeSet<String> = extract_keywords(resume_text)
        .into_iter()
        .map(|k| k.to_lowercase())
        .collect();
    unique.into_iter().collect()
}

/// Tiered keyword coverage: required keywords weigh 70%, nice-to-have 30%.
pub fn calculate_keyword_match(
    resume_keywords: &[String],
    jd_keywords: &[String],
    importance: &[WeightedKeyword],
) -> KeywordMatchDetail {
    if jd_keywords.is_empty() {
        return KeywordMatchDetail {
            score: 0.0,
            matched_required: 0.0,
            matched_nice_to_have: 0.0,
            ..KeywordMatchDetail::default()
        };
    }

    let resume_set: HashSet<String> = resume_keywords.iter().map(|k| k.to_lowercase()).collect();
    let jd_lower: Vec<String> = jd_keywords.iter().map(|k| k.to_lowercase()).collect();

    let (required, nice_to_have): (Vec<String>, Vec<String>) = if importance.is_empty() {
        (jd_lower, Vec::new())
    } else {
        jd_lower.into_iter().partition(|k| {
            weight_of(importance, k).unwrap_or(DEFAULT_IMPORTANCE) >= REQUIRED_THRESHOLD
        })
    };

    let (matched_required, missing_required): (Vec<&String>, Vec<&String>) =
        required.iter().partition(|k| resume_set.contains(*k));
    let (matched_nice, missing_nice): (Vec<&String>, Vec<&String>) =
        nice_to_have.iter().partition(|k| resume_set.contains(*k));

    let required_pct = percent(matched_required.len(), required.len());
    let nice_pct = percent(matched_nice.len(), nice_to_have.len());

    let score = match (required.is_empty(), nice_to_have.is_empty()) {
        (false, false) => required_pct * 0.7 + nice_pct * 0.3,
        (false, true) => required_pct,
        _ => nice_pct,
    };

    let missing_keywords = missing_required
        .into_iter()
        .cloned()
        .chain(
            missing_nice
                .into_iter()
                .filter(|k| weight_of(importance, k).unwrap_or(0.0) >= DEFAULT_IMPORTANCE)
                .take(MAX_MISSING_NICE_TO_HAVE)
                .cloned(),
        )
        .collect();

    KeywordMatchDetail {
        score: round2(score),
        matched_required: round2(required_pct),
        matched_nice_to_have: round2(nice_pct),
        matched_keywords: matched_required
            .into_iter()
            .chain(matched_nice)
            .cloned()
            .collect(),
        missing_keywords,
    }
}

/// True when at most one date style (YYYY-MM, Mon YYYY, Month YYYY, MM/YYYY) is used.
pub fn check_date_format_consistency(resume_text: &str) -> bool {
    DATE_FORMATS
        .iter()
        .filter(|re| re.is_match(resume_text))
        .count()
        <= 1
}

pub fn calculate_formatting_score(resume_text: &str) -> FormattingDetail {
    let headers = header_lines(resume_text);
    let found_sections: Vec<String> = STANDARD_SECTIONS
        .iter()
        .filter(|s| headers.iter().any(|(_, h)| h == *s))
        .map(|s| s.to_string())
        .collect();

    let has_sections = found_sections.len() >= 3;
    let has_bullet_points = BULLET_RE.is_match(resume_text);
    let date_format_consistent = check_date_format_consistency(resume_text);
    let has_tables = TABLE_RES.iter().any(|re| re.is_match(resume_text));

    let mut score: f64 = 100.0;
    if !has_sections {
        score -= 20.0;
    }
    if !has_bullet_points {
        score -= 15.0;
    }
    if !date_format_consistent {
        score -= 20.0;
    }
    if has_tables {
        score -= 15.0;
    }

    FormattingDetail {
        score: round2(score.clamp(0.0, 100.0)),
        has_sections,
        has_bullet_points,
        date_format_consistent,
        has_tables,
        found_sections,
    }
}

fn match_percentage(items: &[String], resume_lower: &str) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let matched = items
        .iter()
        .filter(|item| contains_term(resume_lower, &item.to_lowercase()))
        .count();
    matched as f64 / items.len() as f64 * 100.0
}

/// Technical 50%, leadership 30%, domain 20%.
pub fn calculate_skills_alignment(resume_text: &str, analysis: &JdAnalysis) -> SkillsAlignmentDetail {
    let resume_lower = resume_text.to_lowercase();

    let technical_match = match_percentage(&analysis.technical_skills, &resume_lower);
    let leadership_match = match_percentage(&analysis.leadership_skills, &resume_lower);
    let domain_match = match_percentage(&analysis.domain_expertise, &resume_lower);

    SkillsAlignmentDetail {
        score: round2(technical_match * 0.5 + leadership_match * 0.3 + domain_match * 0.2),
        technical_match: round2(technical_match),
        leadership_match: round2(leadership_match),
        domain_match: round2(domain_match),
    }
}

pub fn calculate_section_structure_score(resume_text: &str) -> SectionStructureDetail {
    let headers = header_lines(resume_text);

    let has_contact_info = EMAIL_RE.is_match(resume_text);
    let experience_at = first_header(&headers, EXPERIENCE_HEADERS);
    let skills_at = first_header(&headers, SKILLS_HEADERS);
    let has_education = first_header(&headers, EDUCATION_HEADERS).is_some();

    let logical_order = match (experience_at, skills_at) {
        (Some(exp), Some(skills)) => skills > exp,
        _ => true,
    };

    let mut score: f64 = 100.0;
    if !has_contact_info {
        score -= 20.0;
    }
    if experience_at.is_none() {
        score -= 30.0;
    }
    if !has_education {
        score -= 20.0;
    }
    if skills_at.is_none() {
        score -= 20.0;
    }
    if !logical_order {
        score -= 10.0;
    }

    SectionStructureDetail {
        score: round2(score.clamp(0.0, 100.0)),
        has_contact_info,
        has_experience: experience_at.is_some(),
        has_education,
        has_skills: skills_at.is_some(),
        logical_order,
    }
}

pub fn calculate_overall_score(breakdown: &ScoreBreakdown) -> f64 {
    round2(
        breakdown.keyword_match * 0.5
            + breakdown.formatting * 0.2
            + breakdown.skills_alignment * 0.2
            + breakdown.section_structure * 0.1,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations
// ────────────────────────────────────────────────────────────────────────────

/// Prioritized fixes, highest impact first, at most 10.
pub fn generate_recommendations(
    resume_text: &str,
    analysis: &JdAnalysis,
    breakdown: &ScoreBreakdown,
    resume_keywords: &[String],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if breakdown.keyword_match < 80.0 {
        let resume_set: HashSet<String> =
            resume_keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut missing: Vec<(&String, f64, u32)> = analysis
            .ats_keywords
            .iter()
            .filter(|kw| !resume_set.contains(&kw.to_lowercase()))
            .map(|kw| {
                (
                    kw,
                    analysis.importance_of(kw).unwrap_or(0.0),
                    analysis.frequency_of(kw),
                )
            })
            .collect();
        missing.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.2.cmp(&a.2))
        });

        for (keyword, importance, frequency) in missing.into_iter().take(3) {
            let impact = (importance * 20.0).min(15.0);
            recommendations.push(Recommendation::new(
                format!("Add '{keyword}' keyword (appears {frequency}x in JD, 0x in resume)"),
                (impact * 10.0).round() / 10.0,
                RecommendationCategory::Keyword,
            ));
        }
    }

    if breakdown.formatting < 80.0 {
        let formatting = calculate_formatting_score(resume_text);

        if !formatting.date_format_consistent {
            recommendations.push(Recommendation::new(
                "Standardize date format to 'YYYY-MM' throughout resume",
                5.0,
                RecommendationCategory::Formatting,
            ));
        }
        if !formatting.has_bullet_points {
            recommendations.push(Recommendation::new(
                "Use bullet points for responsibilities and achievements",
                4.0,
                RecommendationCategory::Formatting,
            ));
        }
        if formatting.has_tables {
            recommendations.push(Recommendation::new(
                "Remove tables and use text formatting (tables are ATS-unfriendly)",
                6.0,
                RecommendationCategory::Formatting,
            ));
        }
        if !formatting.has_sections {
            recommendations.push(Recommendation::new(
                "Add clear section headers (EXPERIENCE, EDUCATION, SKILLS)",
                8.0,
                RecommendationCategory::Formatting,
            ));
        }
    }

    if breakdown.skills_alignment < 75.0 {
        let skills = calculate_skills_alignment(resume_text, analysis);

        if skills.technical_match < 70.0 {
            let resume_lower = resume_text.to_lowercase();
            let missing_tech: Vec<&str> = analysis
                .technical_skills
                .iter()
                .filter(|s| !contains_term(&resume_lower, &s.to_lowercase()))
                .take(3)
                .map(String::as_str)
                .collect();
            if !missing_tech.is_empty() {
                recommendations.push(Recommendation::new(
                    format!("Add technical skills: {}", missing_tech.join(", ")),
                    10.0,
                    RecommendationCategory::Skills,
                ));
            }
        }
        if skills.leadership_match < 60.0 {
            recommendations.push(Recommendation::new(
                "Add leadership/collaboration examples to experience section",
                6.0,
                RecommendationCategory::Skills,
            ));
        }
    }

    let structure = calculate_section_structure_score(resume_text);
    if !structure.has_contact_info {
        recommendations.push(Recommendation::new(
            "Add contact information (email, phone, LinkedIn)",
            8.0,
            RecommendationCategory::Structure,
        ));
    }
    if !structure.has_experience {
        recommendations.push(Recommendation::new(
            "Add EXPERIENCE section with work history",
            15.0,
            RecommendationCategory::Structure,
        ));
    }
    if !structure.has_education {
        recommendations.push(Recommendation::new(
            "Add EDUCATION section",
            7.0,
            RecommendationCategory::Structure,
        ));
    }

    recommendations.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(Ordering::Equal));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against a raw JD.
pub fn score_resume(resume_text: &str, job_description: &str) -> Result<AtsScore, AtsScoreError> {
    if resume_text.trim().is_empty() {
        return Err(AtsScoreError::EmptyResume);
    }
    if job_description.trim().is_empty() {
        return Err(AtsScoreError::EmptyJobDescription);
    }

    let analysis = analyze_job_description(job_description);
    Ok(score_resume_against(resume_text, &analysis))
}

/// Scores a resume against an already computed JD analysis.
pub fn score_resume_against(resume_text: &str, analysis: &JdAnalysis) -> AtsScore {
    let resume_keywords = extract_keywords_from_resume(resume_text);

    let keyword_details = calculate_keyword_match(
        &resume_keywords,
        &analysis.ats_keywords,
        &analysis.keyword_importance,
    );
    let formatting_details = calculate_formatting_score(resume_text);
    let skills_details = calculate_skills_alignment(resume_text, analysis);
    let structure_details = calculate_section_structure_score(resume_text);

    let breakdown = ScoreBreakdown {
        keyword_match: keyword_details.score,
        formatting: formatting_details.score,
        skills_alignment: skills_details.score,
        section_structure: structure_details.score,
    };
    let overall_score = calculate_overall_score(&breakdown);
    let recommendations =
        generate_recommendations(resume_text, analysis, &breakdown, &resume_keywords);

    debug!(overall_score, recommendations = recommendations.len(), "ATS score computed");

    AtsScore {
        overall_score,
        breakdown,
        recommendations,
        keyword_details,
        formatting_details,
        skills_details,
        structure_details,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_RESUME: &str = "Alex Kim
Senior Backend Engineer
alex@kim.dev | (555) 222-3333

SUMMARY
Backend engineer focused on Python, PostgreSQL and AWS with strong communication skills.

EXPERIENCE
Senior Engineer | Acme | Jan 2020 - Present
• Led migration to Kubernetes and Docker, reducing deploy time by 60%
• Mentor for four engineers; drove system design reviews

EDUCATION
B.S. Computer Science | State University | 2012 - 2016

SKILLS
Languages: Python, SQL
Infrastructure: Docker, Kubernetes, AWS, PostgreSQL, Redis
";

    const WEAK_RESUME: &str = "I am a person who likes computers and wants a job.";

    const JD: &str = "Senior Backend Engineer
Requirements:
- Python and PostgreSQL experience required
- Docker and Kubernetes in production
- AWS infrastructure
Nice to have:
- Redis caching knowledge
We value communication and mentor culture. System design matters.
";

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn make_importance(pairs: &[(&str, f64)]) -> Vec<WeightedKeyword> {
        pairs.iter().map(|(k, w)| WeightedKeyword::new(*k, *w)).collect()
    }

    #[test]
    fn test_extract_keywords_from_resume_lowercased() {
        let keywords = extract_keywords_from_resume(STRONG_RESUME);
        assert!(keywords.contains(&"python".to_string()));
        assert!(keywords.contains(&"kubernetes".to_string()));
        assert!(keywords.iter().all(|k| *k == k.to_lowercase()));
    }

    #[test]
    fn test_keyword_match_tiers() {
        let importance = make_importance(&[
            ("python", 1.0),
            ("docker", 0.8),
            ("kubernetes", 0.6),
            ("go", 0.3),
        ]);
        let result = calculate_keyword_match(
            &kws(&["python", "docker"]),
            &kws(&["Python", "Docker", "Kubernetes", "Go"]),
            &importance,
        );
        assert_eq!(result.matched_required, 100.0);
        assert_eq!(result.matched_nice_to_have, 0.0);
        assert_eq!(result.score, 70.0);
        assert_eq!(result.matched_keywords, kws(&["python", "docker"]));
        // go is below 0.5 importance and is not reported missing
        assert_eq!(result.missing_keywords, kws(&["kubernetes"]));
    }

    #[test]
    fn test_keyword_match_without_importance_treats_all_as_required() {
        let result = calculate_keyword_match(&kws(&["rust"]), &kws(&["rust", "go"]), &[]);
        assert_eq!(result.matched_required, 50.0);
        assert_eq!(result.matched_nice_to_have, 100.0);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.missing_keywords, kws(&["go"]));
    }

    #[test]
    fn test_keyword_match_only_nice_to_have() {
        let importance = make_importance(&[("rust", 0.2)]);
        let result = calculate_keyword_match(&kws(&["rust"]), &kws(&["rust", "scala"]), &importance);
        // scala is missing from the importance map (0.5) → nice-to-have
        assert_eq!(result.matched_required, 100.0);
        assert_eq!(result.score, 50.0);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_keyword_match_empty_jd() {
        let result = calculate_keyword_match(&kws(&["rust"]), &[], &[]);
        assert_eq!(result.score, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_date_format_consistency() {
        assert!(check_date_format_consistency("Jan 2020 - Mar 2021"));
        assert!(check_date_format_consistency("no dates here"));
        assert!(!check_date_format_consistency("Jan 2020 - 2021-03"));
        assert!(!check_date_format_consistency("January 2020 and 03/2021"));
    }

    #[test]
    fn test_formatting_score_clean_resume() {
        let detail = calculate_formatting_score(STRONG_RESUME);
        assert!(detail.has_sections);
        assert!(detail.has_bullet_points);
        assert!(detail.date_format_consistent);
        assert!(!detail.has_tables);
        assert_eq!(detail.score, 100.0);
        assert!(detail.found_sections.contains(&"EXPERIENCE".to_string()));
    }

    #[test]
    fn test_formatting_score_penalties() {
        let detail = calculate_formatting_score(WEAK_RESUME);
        assert!(!detail.has_sections);
        assert!(!detail.has_bullet_points);
        assert_eq!(detail.score, 65.0);

        let tabled = calculate_formatting_score("| Skill | Years |\n| Rust | 5 |");
        assert!(tabled.has_tables);
    }

    #[test]
    fn test_formatting_accepts_markdown_headers() {
        let md = "## Experience\n- built things\n## Education\nBS\n## Skills\nRust";
        let detail = calculate_formatting_score(md);
        assert!(detail.has_sections);
        assert_eq!(detail.score, 100.0);
    }

    #[test]
    fn test_pipe_separated_entries_are_not_tables() {
        let detail = calculate_formatting_score("Engineer | Acme | 2020 - 2022");
        assert!(!detail.has_tables);
    }

    #[test]
    fn test_skills_alignment() {
        let analysis = analyze_job_description(JD);
        let strong = calculate_skills_alignment(STRONG_RESUME, &analysis);
        let weak = calculate_skills_alignment(WEAK_RESUME, &analysis);
        assert!(strong.technical_match >= 80.0, "{strong:?}");
        assert!(strong.score > weak.score);
        assert_eq!(weak.technical_match, 0.0);
    }

    #[test]
    fn test_skills_alignment_empty_analysis() {
        let detail = calculate_skills_alignment(STRONG_RESUME, &JdAnalysis::default());
        assert_eq!(detail.score, 0.0);
    }

    #[test]
    fn test_section_structure_complete() {
        let detail = calculate_section_structure_score(STRONG_RESUME);
        assert!(detail.has_contact_info);
        assert!(detail.has_experience);
        assert!(detail.has_education);
        assert!(detail.has_skills);
        assert!(detail.logical_order);
        assert_eq!(detail.score, 100.0);
    }

    #[test]
    fn test_section_structure_missing_everything() {
        let detail = calculate_section_structure_score(WEAK_RESUME);
        assert_eq!(detail.score, 10.0);
    }

    #[test]
    fn test_section_structure_skills_first() {
        let text = "a@b.co\nSKILLS\nRust\nEXPERIENCE\nstuff\nEDUCATION\nBS";
        let detail = calculate_section_structure_score(text);
        assert!(!detail.logical_order);
        assert_eq!(detail.score, 90.0);
    }

    #[test]
    fn test_overall_score_weights() {
        let breakdown = ScoreBreakdown {
            keyword_match: 80.0,
            formatting: 100.0,
            skills_alignment: 50.0,
            section_structure: 90.0,
        };
        assert_eq!(calculate_overall_score(&breakdown), 79.0);
    }

    #[test]
    fn test_recommendations_for_weak_resume() {
        let analysis = analyze_job_description(JD);
        let breakdown = ScoreBreakdown {
            keyword_match: 0.0,
            formatting: 65.0,
            skills_alignment: 0.0,
            section_structure: 10.0,
        };
        let recs = generate_recommendations(WEAK_RESUME, &analysis, &breakdown, &[]);

        assert!(recs.len() <= MAX_RECOMMENDATIONS);
        assert_eq!(recs[0].impact, 15.0);
        assert!(recs.iter().any(|r| r.category == RecommendationCategory::Keyword));
        assert!(recs.iter().any(|r| r.description.starts_with("Add technical skills")));
        assert!(recs.iter().any(|r| r.description == "Add EDUCATION section"));
        for pair in recs.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }

    #[test]
    fn test_recommendation_keyword_impact_capped() {
        let analysis = analyze_job_description(JD);
        let breakdown = ScoreBreakdown {
            keyword_match: 0.0,
            formatting: 100.0,
            skills_alignment: 100.0,
            section_structure: 100.0,
        };
        let recs = generate_recommendations(STRONG_RESUME, &analysis, &breakdown, &[]);
        for rec in recs.iter().filter(|r| r.category == RecommendationCategory::Keyword) {
            assert!(rec.impact <= 15.0);
            assert!(rec.description.contains("x in JD, 0x in resume"));
        }
    }

    #[test]
    fn test_score_resume_strong_beats_weak() {
        let strong = score_resume(STRONG_RESUME, JD).unwrap();
        let weak = score_resume(WEAK_RESUME, JD).unwrap();
        assert!(strong.overall_score > weak.overall_score);
        assert!((0.0..=100.0).contains(&strong.overall_score));
        assert!(strong.overall_score >= 70.0, "strong resume scored {}", strong.overall_score);
        assert!(weak.recommendations.len() > strong.recommendations.len());
    }

    #[test]
    fn test_score_resume_rejects_empty_input() {
        assert!(matches!(score_resume("", JD), Err(AtsScoreError::EmptyResume)));
        assert!(matches!(
            score_resume(STRONG_RESUME, "  "),
            Err(AtsScoreError::EmptyJobDescription)
        ));
    }
}
