//! JD Analyzer: extracts keywords, requirements, seniority and keyword weights
//! from a raw job description.
//!
//! Pure dictionary + regex; no I/O. The same extraction is reused on resumes
//! by the ATS scorer.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{
    is_compound, ALL_KEYWORDS, COMMON_IMPORTANT_WORDS, DOMAIN_KEYWORDS, LEADERSHIP_KEYWORDS,
    TECHNICAL_KEYWORDS,
};
use crate::text::{contains_term, count_term, find_term, tokenize, truncate_chars};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Seniority inferred from the JD title. Drives question selection in interview prep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Intern,
    Junior,
    #[default]
    Mid,
    Senior,
    Lead,
    Staff,
    Principal,
    Director,
    Vp,
}

impl Seniority {
    pub fn is_senior_or_above(self) -> bool {
        matches!(
            self,
            Seniority::Senior
                | Seniority::Lead
                | Seniority::Staff
                | Seniority::Principal
                | Seniority::Director
                | Seniority::Vp
        )
    }

    /// Roles whose interviewers expect org-level strategy questions.
    pub fn is_leadership_track(self) -> bool {
        matches!(
            self,
            Seniority::Staff | Seniority::Principal | Seniority::Director | Seniority::Vp
        )
    }
}

/// Raw occurrence count of a dictionary keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

/// A keyword with a 0.0 – 1.0 importance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedKeyword {
    pub keyword: String,
    pub weight: f64,
}

impl WeightedKeyword {
    pub fn new(keyword: impl Into<String>, weight: f64) -> Self {
        Self {
            keyword: keyword.into(),
            weight,
        }
    }
}

/// Case-insensitive weight lookup.
pub fn weight_of(weights: &[WeightedKeyword], keyword: &str) -> Option<f64> {
    weights
        .iter()
        .find(|w| w.keyword.eq_ignore_ascii_case(keyword))
        .map(|w| w.weight)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub required: Vec<String>,
    pub nice_to_have: Vec<String>,
}

/// Full structured output of JD analysis.
///
/// `#[serde(default)]` lets clients send a partial analysis to the generators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JdAnalysis {
    pub technical_skills: Vec<String>,
    pub leadership_skills: Vec<String>,
    pub domain_expertise: Vec<String>,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub ats_keywords: Vec<String>,
    /// Sorted by weight, descending.
    pub keyword_importance: Vec<WeightedKeyword>,
    /// Sorted by count, descending.
    pub keyword_frequency: Vec<KeywordCount>,
    pub seniority: Seniority,
}

impl JdAnalysis {
    pub fn frequency_of(&self, keyword: &str) -> u32 {
        self.keyword_frequency
            .iter()
            .find(|k| k.keyword.eq_ignore_ascii_case(keyword))
            .map(|k| k.count)
            .unwrap_or(0)
    }

    pub fn importance_of(&self, keyword: &str) -> Option<f64> {
        weight_of(&self.keyword_importance, keyword)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────────────────────────────────────

static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\+?\s*(?:years?|yrs?)(?:\s+of)?\s+experience)").expect("valid regex")
});

static REQUIRED_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:required\s*skills?|requirements?|qualifications?|must have|you have)")
        .expect("valid regex")
});

static NICE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:nice\s*to\s*have|preferred|bonus|plus|optional|desired)").expect("valid regex")
});

static RESET_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:responsibilities|about|benefits)").expect("valid regex"));

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[•\-*]|\d+[.)])\s*(.+)").expect("valid regex"));

static REQUIRED_HEURISTICS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(\d+\+?\s*years?\s+(?:of\s+)?experience\s+(?:with|in)\s+[^\n.,]+)",
        r"(?i)(strong\s+(?:knowledge|understanding|experience)\s+(?:of|with|in)\s+[^\n.,]+)",
        r"(?i)(must\s+have\s+[^\n.,]+)",
        r"(?i)(required[:\s]+[^\n.,]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static NICE_HEURISTICS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(nice\s+to\s+have[:\s]+[^\n.,]+)",
        r"(?i)(preferred[:\s]+[^\n.,]+)",
        r"(?i)(bonus[:\s]+[^\n.,]+)",
        r"(?i)(familiarity\s+with\s+[^\n.,]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static REQUIRED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"required|must have").expect("valid regex"));

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Checked against the title line, most senior first.
const SENIORITY_MARKERS: &[(Seniority, &[&str])] = &[
    (Seniority::Vp, &["vp", "vice president"]),
    (Seniority::Director, &["director", "head of"]),
    (Seniority::Principal, &["principal"]),
    (Seniority::Staff, &["staff"]),
    (Seniority::Lead, &["lead", "tech lead", "team lead"]),
    (Seniority::Senior, &["senior", "sr", "sr."]),
    (Seniority::Junior, &["junior", "jr", "jr.", "entry level", "entry-level", "new grad"]),
    (Seniority::Intern, &["intern", "internship"]),
];

/// Number of leading characters treated as the JD title/header region.
const HEADER_WINDOW: usize = 200;
const REQUIRED_WINDOW: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// Extracts every dictionary keyword present in `text`.
///
/// Keeps the casing used in the text when the keyword appears as a token
/// ("Python" stays "Python"). Also captures "N+ years of experience" phrases.
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text_lower = text.to_lowercase();
    let original_case: HashMap<String, &str> = tokenize(text)
        .into_iter()
        .map(|word| (word.to_lowercase(), word))
        .collect();

    let mut keywords: BTreeSet<String> = BTreeSet::new();

    for keyword in TECHNICAL_KEYWORDS
        .iter()
        .chain(LEADERSHIP_KEYWORDS)
        .chain(DOMAIN_KEYWORDS)
    {
        if contains_term(&text_lower, keyword) {
            let original = original_case.get(*keyword).copied().unwrap_or(*keyword);
            keywords.insert(original.to_string());
        }
    }

    for caps in EXPERIENCE_RE.captures_iter(&text_lower) {
        keywords.insert(caps[1].to_string());
    }

    keywords.into_iter().collect()
}

/// Counts how often each dictionary keyword (and a few generic JD words) appears.
///
/// Sorted by count descending, ties broken alphabetically.
pub fn calculate_keyword_frequency(text: &str) -> Vec<KeywordCount> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text_lower = text.to_lowercase();

    let mut word_counts: HashMap<&str, u32> = HashMap::new();
    for word in tokenize(&text_lower) {
        *word_counts.entry(word).or_insert(0) += 1;
    }

    let mut frequency: HashMap<String, u32> = HashMap::new();

    for (word, count) in &word_counts {
        if ALL_KEYWORDS.contains(*word) {
            frequency.insert(word.to_string(), *count);
        }
    }

    // Compound terms never survive tokenization intact, count them literally
    for keyword in ALL_KEYWORDS.iter().filter(|k| is_compound(k)) {
        let count = count_term(&text_lower, keyword) as u32;
        if count > 0 {
            frequency.insert(keyword.to_string(), count);
        }
    }

    for word in COMMON_IMPORTANT_WORDS {
        if let Some(count) = word_counts.get(*word) {
            frequency.insert(word.to_string(), *count);
        }
    }

    let mut sorted: Vec<KeywordCount> = frequency
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    sorted
}

/// Splits requirements into required vs nice-to-have.
///
/// Prefers explicit section headers with bullet lists; falls back to phrase
/// heuristics when the JD has no recognizable sections.
pub fn categorize_requirements(text: &str) -> Requirements {
    let mut requirements = Requirements::default();
    if text.trim().is_empty() {
        return requirements;
    }

    #[derive(PartialEq)]
    enum Section {
        None,
        Required,
        NiceToHave,
    }

    let mut section = Section::None;

    for line in text.lines() {
        let trimmed = line.trim();
        let line_lower = trimmed.to_lowercase();

        if REQUIRED_HEADER_RE.is_match(&line_lower) {
            section = Section::Required;
            continue;
        }
        if NICE_HEADER_RE.is_match(&line_lower) {
            section = Section::NiceToHave;
            continue;
        }
        if RESET_HEADER_RE.is_match(&line_lower) {
            section = Section::None;
            continue;
        }

        let Some(caps) = BULLET_RE.captures(trimmed) else {
            continue;
        };
        let item = caps[1].trim();
        if item.chars().count() <= 5 {
            continue;
        }

        match section {
            Section::Required => requirements.required.push(item.to_string()),
            Section::NiceToHave => requirements.nice_to_have.push(item.to_string()),
            Section::None => {}
        }
    }

    if requirements.required.is_empty() && requirements.nice_to_have.is_empty() {
        requirements.required = collect_heuristic_matches(&REQUIRED_HEURISTICS, text);
        requirements.nice_to_have = collect_heuristic_matches(&NICE_HEURISTICS, text);
    }

    requirements
}

fn collect_heuristic_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .map(|caps| caps[1].trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

fn identify_from(dictionary: &[&str], text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let text_lower = text.to_lowercase();
    let found: BTreeSet<&str> = dictionary
        .iter()
        .copied()
        .filter(|kw| contains_term(&text_lower, kw))
        .collect();
    found.into_iter().map(String::from).collect()
}

/// Technical dictionary hits, sorted.
pub fn identify_technical_skills(text: &str) -> Vec<String> {
    identify_from(TECHNICAL_KEYWORDS, text)
}

/// Domain dictionary hits, sorted.
pub fn identify_domain_expertise(text: &str) -> Vec<String> {
    identify_from(DOMAIN_KEYWORDS, text)
}

/// Leadership keyword hits followed by up to three sentences that mention them.
pub fn identify_leadership_skills(text: &str) -> Vec<String> {
    let mut found = identify_from(LEADERSHIP_KEYWORDS, text);
    if found.is_empty() {
        return found;
    }

    let sentences = SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let lower = s.to_lowercase();
            LEADERSHIP_KEYWORDS.iter().any(|kw| contains_term(&lower, kw))
        })
        .take(3)
        .map(String::from);

    found.extend(sentences);
    found
}

/// Infers seniority from the JD title line, falling back to the header region.
pub fn detect_seniority(text: &str) -> Seniority {
    let title = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_lowercase();

    for (level, markers) in SENIORITY_MARKERS {
        if markers.iter().any(|m| contains_term(&title, m)) {
            return *level;
        }
    }

    let header = truncate_chars(text, HEADER_WINDOW).to_lowercase();
    for (level, marker) in [
        (Seniority::Senior, "senior"),
        (Seniority::Junior, "junior"),
        (Seniority::Junior, "entry level"),
        (Seniority::Intern, "internship"),
    ] {
        if contains_term(&header, marker) {
            return level;
        }
    }

    Seniority::Mid
}

/// Extracted keywords ordered by how often they appear (most frequent first).
pub fn generate_ats_keywords(text: &str) -> Vec<String> {
    let mut keywords = extract_keywords(text);
    if keywords.is_empty() {
        return keywords;
    }
    let frequency = calculate_keyword_frequency(text);
    let count_of = |kw: &str| {
        frequency
            .iter()
            .find(|k| k.keyword.eq_ignore_ascii_case(kw))
            .map(|k| k.count)
            .unwrap_or(0)
    };
    keywords.sort_by_key(|kw| std::cmp::Reverse(count_of(kw.as_str())));
    keywords
}

/// True when `keyword` occurs within `REQUIRED_WINDOW` chars after a
/// "required"/"must have" marker. `marker_ends` must be sorted.
fn follows_required_marker(text_lower: &str, marker_ends: &[usize], keyword: &str) -> bool {
    find_term(text_lower, keyword).any(|start| {
        let preceding = marker_ends.partition_point(|&end| end <= start);
        preceding
            .checked_sub(1)
            .and_then(|i| marker_ends.get(i))
            .is_some_and(|&end| text_lower[end..start].chars().count() <= REQUIRED_WINDOW)
    })
}

/// Normalized keyword importance in 0.0 – 1.0.
///
/// Base score is `count / max_count`; ×1.5 when the keyword follows
/// "required"/"must have" within 200 chars, ×1.3 when it appears in the
/// header region. Capped at 1.0, sorted descending.
pub fn calculate_keyword_importance(text: &str) -> Vec<WeightedKeyword> {
    let frequency = calculate_keyword_frequency(text);
    let Some(max_count) = frequency.iter().map(|k| k.count).max() else {
        return Vec::new();
    };

    let text_lower = text.to_lowercase();
    let header = truncate_chars(&text_lower, HEADER_WINDOW);
    let marker_ends: Vec<usize> = REQUIRED_MARKER_RE
        .find_iter(&text_lower)
        .map(|m| m.end())
        .collect();

    let mut importance: Vec<WeightedKeyword> = frequency
        .iter()
        .map(|entry| {
            let mut score = entry.count as f64 / max_count as f64;

            if follows_required_marker(&text_lower, &marker_ends, &entry.keyword) {
                score *= 1.5;
            }
            if contains_term(header, &entry.keyword) {
                score *= 1.3;
            }

            WeightedKeyword::new(entry.keyword.clone(), score.min(1.0))
        })
        .collect();

    importance.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    importance
}

/// Runs every analysis pass over the JD.
pub fn analyze_job_description(text: &str) -> JdAnalysis {
    if text.trim().is_empty() {
        return JdAnalysis::default();
    }

    let requirements = categorize_requirements(text);

    JdAnalysis {
        technical_skills: identify_technical_skills(text),
        leadership_skills: identify_leadership_skills(text),
        domain_expertise: identify_domain_expertise(text),
        required_skills: requirements.required,
        nice_to_have_skills: requirements.nice_to_have,
        ats_keywords: generate_ats_keywords(text),
        keyword_importance: calculate_keyword_importance(text),
        keyword_frequency: calculate_keyword_frequency(text),
        seniority: detect_seniority(text),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // JD fixture: sectioned, senior full-stack role
    const SECTIONED_JD: &str = "Senior Full Stack Engineer
We are looking for a Senior Full Stack Engineer to lead the design of our platform.

Responsibilities:
- Architect scalable microservices on AWS
- Mentor junior engineers and drive technical initiatives
- Collaborate with stakeholders on system design

Requirements:
- 5+ years of experience with Python and TypeScript
- Strong knowledge of React and Node.js
- Experience with PostgreSQL and Redis
- Docker and CI/CD pipelines

Nice to Have:
- Kubernetes experience
- GraphQL API design
- Machine learning exposure

About Us:
We value communication and ownership.
";

    // JD fixture: prose only, no section headers
    const PROSE_JD: &str = "Backend Developer. You must have solid Go skills. \
        3 years experience with Kafka is expected. Familiarity with Terraform is a bonus. \
        Preferred: background in fintech.";

    #[test]
    fn test_extract_keywords_preserves_case() {
        let keywords = extract_keywords(SECTIONED_JD);
        assert!(keywords.contains(&"Python".to_string()));
        assert!(keywords.contains(&"TypeScript".to_string()));
        assert!(keywords.contains(&"Node.js".to_string()));
        assert!(keywords.contains(&"AWS".to_string()));
    }

    #[test]
    fn test_extract_keywords_captures_experience_phrases() {
        let keywords = extract_keywords(SECTIONED_JD);
        assert!(keywords.iter().any(|k| k == "5+ years of experience"));
    }

    #[test]
    fn test_extract_keywords_no_false_single_letter_hits() {
        let keywords = extract_keywords("We build great products with React");
        assert!(!keywords.iter().any(|k| k.eq_ignore_ascii_case("r")));
        assert!(!keywords.iter().any(|k| k.eq_ignore_ascii_case("go")));
    }

    #[test]
    fn test_extract_keywords_empty() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   \n ").is_empty());
    }

    #[test]
    fn test_keyword_frequency_counts_and_sorts() {
        let freq = calculate_keyword_frequency("Python, python and Rust. Experience required.");
        assert_eq!(freq[0].keyword, "python");
        assert_eq!(freq[0].count, 2);
        assert!(freq.iter().any(|k| k.keyword == "experience" && k.count == 1));
        assert!(freq.iter().any(|k| k.keyword == "required"));
        for pair in freq.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_keyword_frequency_counts_compound_terms() {
        let freq = calculate_keyword_frequency("Node.js and node.js; CI/CD with spring boot");
        let count = |kw: &str| freq.iter().find(|k| k.keyword == kw).map(|k| k.count);
        assert_eq!(count("node.js"), Some(2));
        assert_eq!(count("ci/cd"), Some(1));
        assert_eq!(count("spring boot"), Some(1));
    }

    #[test]
    fn test_categorize_requirements_sections() {
        let reqs = categorize_requirements(SECTIONED_JD);
        assert!(reqs.required.iter().any(|r| r.contains("Python")));
        assert!(reqs.required.iter().any(|r| r.contains("TypeScript")));
        assert!(reqs.nice_to_have.iter().any(|r| r.contains("Kubernetes")));
        assert!(reqs.nice_to_have.iter().any(|r| r.contains("GraphQL")));
        // Responsibilities bullets are not requirements
        assert!(!reqs.required.iter().any(|r| r.contains("Mentor")));
    }

    #[test]
    fn test_categorize_requirements_heuristic_fallback() {
        let reqs = categorize_requirements(PROSE_JD);
        assert!(reqs.required.iter().any(|r| r.contains("must have solid Go skills")));
        assert!(reqs.required.iter().any(|r| r.contains("3 years experience with Kafka")));
        assert!(reqs.nice_to_have.iter().any(|r| r.contains("Familiarity with Terraform")));
        assert!(reqs.nice_to_have.iter().any(|r| r.starts_with("Preferred")));
    }

    #[test]
    fn test_categorize_requirements_skips_short_items() {
        let reqs = categorize_requirements("Requirements:\n- Go\n- Rust systems programming\n");
        assert_eq!(reqs.required, vec!["Rust systems programming".to_string()]);
    }

    #[test]
    fn test_identify_technical_skills_sorted() {
        let skills = identify_technical_skills(SECTIONED_JD);
        for expected in ["python", "typescript", "react", "node.js", "postgresql", "redis", "aws", "docker"] {
            assert!(skills.contains(&expected.to_string()), "missing {expected}");
        }
        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[test]
    fn test_identify_leadership_skills_includes_sentences() {
        let skills = identify_leadership_skills(SECTIONED_JD);
        assert!(skills.iter().any(|s| s == "communication"));
        assert!(skills.iter().any(|s| s == "mentor"));
        assert!(skills.iter().any(|s| s.len() > 30), "expected a supporting sentence");
    }

    #[test]
    fn test_identify_leadership_skills_none() {
        assert!(identify_leadership_skills("Write Python code.").is_empty());
    }

    #[test]
    fn test_identify_domain_expertise() {
        let domains = identify_domain_expertise(SECTIONED_JD);
        assert!(domains.contains(&"design".to_string()));
        assert!(domains.contains(&"system design".to_string()));
        assert!(domains.contains(&"api design".to_string()));
    }

    #[test]
    fn test_detect_seniority() {
        assert_eq!(detect_seniority(SECTIONED_JD), Seniority::Senior);
        assert_eq!(detect_seniority("Staff Software Engineer\n..."), Seniority::Staff);
        assert_eq!(detect_seniority("VP of Engineering"), Seniority::Vp);
        assert_eq!(detect_seniority("Software Engineering Intern"), Seniority::Intern);
        assert_eq!(detect_seniority("Internal Tools Engineer"), Seniority::Mid);
        assert_eq!(detect_seniority(""), Seniority::Mid);
    }

    #[test]
    fn test_seniority_tracks() {
        assert!(Seniority::Senior.is_senior_or_above());
        assert!(!Seniority::Mid.is_senior_or_above());
        assert!(Seniority::Director.is_leadership_track());
        assert!(!Seniority::Senior.is_leadership_track());
    }

    #[test]
    fn test_seniority_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Seniority::Vp).unwrap(), r#""vp""#);
        let s: Seniority = serde_json::from_str(r#""principal""#).unwrap();
        assert_eq!(s, Seniority::Principal);
    }

    #[test]
    fn test_ats_keywords_ordered_by_frequency() {
        let jd = "Rust. Rust. Rust. Python.";
        let keywords = generate_ats_keywords(jd);
        assert_eq!(keywords[0], "Rust");
        assert_eq!(keywords[1], "Python");
    }

    #[test]
    fn test_keyword_importance_normalized() {
        let importance = calculate_keyword_importance(SECTIONED_JD);
        assert!(!importance.is_empty());
        for w in &importance {
            assert!((0.0..=1.0).contains(&w.weight), "{} out of range", w.keyword);
        }
        for pair in importance.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn test_keyword_importance_required_boost() {
        let jd = "Intro text about the company.\n".repeat(10)
            + "Must have: kafka\nAlso docker, docker.";
        let importance = calculate_keyword_importance(&jd);
        let kafka = weight_of(&importance, "kafka").unwrap();
        // kafka: 1/2 base, boosted ×1.5
        assert!((kafka - 0.75).abs() < 1e-9, "kafka weight was {kafka}");
        assert!((weight_of(&importance, "docker").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_importance_required_window() {
        let jd = "Intro text about the company.\n".repeat(10)
            + "Must have: docker\n"
            + &"Lorem ipsum dolor sit amet.\n".repeat(9)
            + "kafka, docker";
        let importance = calculate_keyword_importance(&jd);
        // kafka sits past the window, so it keeps its 1/2 base
        assert!((weight_of(&importance, "kafka").unwrap() - 0.5).abs() < 1e-9);
        assert!((weight_of(&importance, "docker").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_job_description_full() {
        let analysis = analyze_job_description(SECTIONED_JD);
        assert!(!analysis.technical_skills.is_empty());
        assert!(!analysis.ats_keywords.is_empty());
        assert!(!analysis.required_skills.is_empty());
        assert!(!analysis.keyword_importance.is_empty());
        assert_eq!(analysis.seniority, Seniority::Senior);
        assert!(analysis.frequency_of("python") >= 1);
        assert!(analysis.importance_of("PYTHON").is_some());
    }

    #[test]
    fn test_analyze_job_description_empty() {
        let analysis = analyze_job_description("");
        assert!(analysis.technical_skills.is_empty());
        assert!(analysis.keyword_importance.is_empty());
        assert_eq!(analysis.seniority, Seniority::Mid);
    }

    #[test]
    fn test_analyze_job_description_malformed() {
        let analysis = analyze_job_description("!!!@@@###\n\n---\n***");
        assert!(analysis.technical_skills.is_empty());
        assert!(analysis.required_skills.is_empty());
    }

    #[test]
    fn test_jd_analysis_partial_deserialize() {
        let json = r#"{"technical_skills": ["rust"], "seniority": "senior"}"#;
        let analysis: JdAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.technical_skills, vec!["rust"]);
        assert!(analysis.keyword_importance.is_empty());
        assert_eq!(analysis.seniority, Seniority::Senior);
    }
}
