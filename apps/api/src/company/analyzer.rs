//! Company research synthesis.
//!
//! Takes whatever the user gathered about a company (profile fields, website
//! copy, news headlines) and turns it into interview material: green and red
//! flags, talking points, and culture/expectation insights. Website and
//! headline checks are lowercase substring matches, so stems like "expand"
//! also catch "expands" and "expansion".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::truncate_chars;

const MAX_TALKING_POINTS: usize = 7;
const MIN_TALKING_POINTS: usize = 5;
const MAX_QUESTIONS: usize = 7;
const MISSION_MAX_CHARS: usize = 300;

pub const MISSION_UNAVAILABLE: &str =
    "Mission and values information not readily available from public sources";

static MISSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:mission|our mission|values|our values)[:\s]+(.*?)(?:\.|</|$)")
        .expect("valid regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Input / output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub founded: String,
    pub location: String,
    pub website_content: String,
    /// Most recent first.
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyOverview {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub founded: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InterviewInsights {
    pub culture: String,
    pub expectations: String,
    pub questions_to_ask: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub overview: CompanyOverview,
    pub mission_values: String,
    pub recent_news: Vec<NewsItem>,
    pub green_flags: Vec<String>,
    pub red_flags: Vec<String>,
    pub talking_points: Vec<String>,
    pub interview_insights: InterviewInsights,
}

// ────────────────────────────────────────────────────────────────────────────
// Signal tables
// ────────────────────────────────────────────────────────────────────────────

/// (headline stems, flag label)
const GREEN_NEWS_SIGNALS: &[(&[&str], &str)] = &[
    (
        &["funding", "raises", "series", "investment", "capital"],
        "Recent funding",
    ),
    (
        &["award", "best place to work", "top company", "recognition"],
        "Industry recognition",
    ),
    (
        &["expand", "growth", "hiring", "new market", "acquisition"],
        "Growth indicator",
    ),
];

const RED_NEWS_SIGNALS: &[(&[&str], &str)] = &[
    (
        &["layoff", "layoffs", "workforce reduction", "job cuts", "downsizing"],
        "Layoffs reported",
    ),
    (
        &["lawsuit", "sued", "legal action", "discrimination", "settlement"],
        "Legal concerns",
    ),
    (
        &["bankruptcy", "financial trouble", "struggling", "losses"],
        "Financial concerns",
    ),
];

const GREEN_CULTURE_SIGNALS: &[(&str, &str)] = &[
    ("work-life balance", "Emphasizes work-life balance"),
    ("diversity", "Commitment to diversity and inclusion"),
    ("innovation", "Focus on innovation and creativity"),
    ("remote", "Offers remote work flexibility"),
    ("professional development", "Invests in employee development"),
    ("competitive salary", "Competitive compensation"),
    ("equity", "Offers equity/stock options"),
];

const RED_CULTURE_SIGNALS: &[(&str, &str)] = &[
    ("high turnover", "High employee turnover mentioned"),
    ("toxic", "Workplace culture concerns"),
    ("poor management", "Management issues reported"),
    ("long hours", "Expectation of long work hours"),
    ("no work-life balance", "Work-life balance concerns"),
];

const VALUE_PHRASES: &[(&str, &str)] = &[
    ("innovation", "innovative approach to problem-solving"),
    ("customer", "customer-centric philosophy"),
    ("diversity", "commitment to diversity and inclusion"),
    ("sustainability", "focus on sustainability"),
    ("collaboration", "collaborative work environment"),
];

// ────────────────────────────────────────────────────────────────────────────
// Flags
// ────────────────────────────────────────────────────────────────────────────

/// One flag per (signal group, headline) hit, grouped by signal in table order.
fn news_flags(news: &[NewsItem], signals: &[(&[&str], &str)]) -> Vec<String> {
    let mut flags = Vec::new();
    for (stems, label) in signals {
        for article in news {
            let title = article.title.to_lowercase();
            if stems.iter().any(|stem| title.contains(stem)) {
                flags.push(format!("{label}: {}", article.title));
            }
        }
    }
    flags
}

fn culture_flags(website_content: &str, signals: &[(&str, &str)]) -> Vec<String> {
    let content = website_content.to_lowercase();
    signals
        .iter()
        .filter(|(stem, _)| content.contains(stem))
        .map(|(_, description)| description.to_string())
        .collect()
}

pub fn detect_green_flags(profile: &CompanyProfile) -> Vec<String> {
    let mut flags = news_flags(&profile.news, GREEN_NEWS_SIGNALS);
    flags.extend(culture_flags(&profile.website_content, GREEN_CULTURE_SIGNALS));
    flags
}

pub fn detect_red_flags(profile: &CompanyProfile) -> Vec<String> {
    let mut flags = news_flags(&profile.news, RED_NEWS_SIGNALS);
    flags.extend(culture_flags(&profile.website_content, RED_CULTURE_SIGNALS));
    flags
}

// ────────────────────────────────────────────────────────────────────────────
// Talking points & insights
// ────────────────────────────────────────────────────────────────────────────

fn display_name(profile: &CompanyProfile) -> &str {
    let name = profile.name.trim();
    if name.is_empty() {
        "the company"
    } else {
        name
    }
}

/// Always returns between 5 and 7 points.
pub fn generate_talking_points(profile: &CompanyProfile) -> Vec<String> {
    let name = display_name(profile);
    let content = profile.website_content.to_lowercase();
    let mut points = Vec::new();

    if let Some(latest) = profile.news.first() {
        let headline = if latest.title.is_empty() {
            "recent developments"
        } else {
            latest.title.as_str()
        };
        points.push(format!(
            "I noticed {name}'s recent news about {headline} - this aligns with my interest in {}",
            extract_topic_from_title(&latest.title)
        ));
    }

    for (keyword, phrase) in VALUE_PHRASES {
        if content.contains(keyword) {
            points.push(format!(
                "I'm particularly drawn to {name}'s {phrase}, which resonates with my own values"
            ));
        }
    }

    if !profile.industry.trim().is_empty() {
        points.push(format!(
            "Working in the {} sector at {name} would allow me to leverage my expertise while contributing to meaningful impact",
            profile.industry.trim()
        ));
    }

    if !profile.size.trim().is_empty() {
        points.push(format!(
            "The company's scale ({}) offers the perfect balance of resources and opportunity for individual impact",
            profile.size.trim()
        ));
    }

    if content.contains("mission") || content.contains("purpose") {
        points.push(format!(
            "I'm excited about {name}'s mission and how my skills can contribute to achieving these goals"
        ));
    }

    while points.len() < MIN_TALKING_POINTS {
        points.push(format!(
            "I'm impressed by {name}'s position in the industry and eager to contribute to its continued success"
        ));
    }

    points.truncate(MAX_TALKING_POINTS);
    points
}

pub fn synthesize_interview_insights(profile: &CompanyProfile) -> InterviewInsights {
    let content = profile.website_content.to_lowercase();

    let culture_indicators: Vec<&str> = [
        ("innovation", "innovative and forward-thinking"),
        ("collaboration", "collaborative"),
        ("fast-paced", "fast-paced"),
        ("work-life balance", "values work-life balance"),
    ]
    .iter()
    .filter(|(stem, _)| content.contains(stem))
    .map(|(_, label)| *label)
    .collect();

    let culture = if culture_indicators.is_empty() {
        "The company culture appears to be professional and growth-oriented".to_string()
    } else {
        format!(
            "The company culture appears to be {}",
            culture_indicators.join(", ")
        )
    };

    let expectations: Vec<&str> = [
        ("ownership", "taking ownership of projects"),
        ("impact", "driving meaningful impact"),
        ("collaboration", "working cross-functionally"),
    ]
    .iter()
    .filter(|(stem, _)| content.contains(stem))
    .map(|(_, label)| *label)
    .collect();

    let expectations = if expectations.is_empty() {
        "Likely expectations include strong technical skills and team collaboration".to_string()
    } else {
        format!("Likely expectations include {}", expectations.join(", "))
    };

    let mut questions: Vec<String> = vec![
        "What does success look like in this role in the first 6 months?".to_string(),
        "How does the team approach professional development and learning?".to_string(),
        "What are the biggest challenges the team is currently facing?".to_string(),
    ];

    if let Some(latest) = profile.news.first() {
        questions.push(format!(
            "I saw the recent news about {} - how will this impact the team's priorities?",
            extract_topic_from_title(&latest.title)
        ));
    }

    if content.contains("product") {
        questions.push("What's the product roadmap looking like for the next year?".to_string());
    }

    if content.contains("growth") || content.contains("scaling") {
        questions.push(
            "As the company scales, how is the engineering culture being preserved?".to_string(),
        );
    }

    questions.truncate(MAX_QUESTIONS);

    InterviewInsights {
        culture,
        expectations,
        questions_to_ask: questions,
    }
}

/// Buckets a headline into a short topic phrase.
pub fn extract_topic_from_title(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("funding") || title.contains("raises") {
        "funding and growth"
    } else if title.contains("product") || title.contains("launch") {
        "product innovation"
    } else if title.contains("award") {
        "industry recognition"
    } else if title.contains("hiring") {
        "team expansion"
    } else {
        "recent developments"
    }
}

/// First sentence following a "mission"/"values" marker, capped at 300 chars.
pub fn extract_mission_values(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let Some(captured) = MISSION_RE.captures(content).and_then(|c| c.get(1)) else {
        return MISSION_UNAVAILABLE.to_string();
    };

    let mission = captured.as_str().trim();
    if mission.chars().count() > MISSION_MAX_CHARS {
        format!("{}...", truncate_chars(mission, MISSION_MAX_CHARS))
    } else {
        mission.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_company(profile: &CompanyProfile) -> CompanyAnalysis {
    CompanyAnalysis {
        overview: CompanyOverview {
            name: profile.name.clone(),
            industry: profile.industry.clone(),
            size: profile.size.clone(),
            founded: profile.founded.clone(),
            location: profile.location.clone(),
        },
        mission_values: extract_mission_values(&profile.website_content),
        recent_news: profile.news.clone(),
        green_flags: detect_green_flags(profile),
        red_flags: detect_red_flags(profile),
        talking_points: generate_talking_points(profile),
        interview_insights: synthesize_interview_insights(profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn sample_profile() -> CompanyProfile {
        CompanyProfile {
            name: "Acme Robotics".to_string(),
            industry: "Robotics".to_string(),
            size: "200-500 employees".to_string(),
            founded: "2015".to_string(),
            location: "Austin, TX".to_string(),
            website_content: "Our mission: build robots that help people. We value innovation, \
                              collaboration and work-life balance. Remote friendly with equity."
                .to_string(),
            news: vec![
                news("Acme Robotics raises $50M Series B"),
                news("Acme wins Best Place to Work award"),
            ],
        }
    }

    #[test]
    fn test_green_flags_from_news_and_culture() {
        let flags = detect_green_flags(&sample_profile());

        assert_eq!(flags[0], "Recent funding: Acme Robotics raises $50M Series B");
        assert!(flags.contains(&"Industry recognition: Acme wins Best Place to Work award".to_string()));
        assert!(flags.contains(&"Emphasizes work-life balance".to_string()));
        assert!(flags.contains(&"Offers remote work flexibility".to_string()));
        assert!(flags.contains(&"Offers equity/stock options".to_string()));
    }

    #[test]
    fn test_red_flags() {
        let profile = CompanyProfile {
            name: "Initech".to_string(),
            website_content: "Known for long hours and high turnover.".to_string(),
            news: vec![news("Initech announces layoffs"), news("Initech sued by former staff")],
            ..Default::default()
        };

        let flags = detect_red_flags(&profile);
        assert_eq!(
            flags,
            vec![
                "Layoffs reported: Initech announces layoffs",
                "Legal concerns: Initech sued by former staff",
                "High employee turnover mentioned",
                "Expectation of long work hours",
            ]
        );
    }

    #[test]
    fn test_talking_points_padded_to_minimum() {
        let profile = CompanyProfile {
            name: "Quiet Co".to_string(),
            ..Default::default()
        };

        let points = generate_talking_points(&profile);
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.contains("Quiet Co")));
    }

    #[test]
    fn test_talking_points_capped_at_seven() {
        let mut profile = sample_profile();
        profile.website_content.push_str(" Customer first. Sustainability. Diversity. Purpose.");

        let points = generate_talking_points(&profile);
        assert_eq!(points.len(), 7);
        assert!(points[0].contains("funding and growth"));
    }

    #[test]
    fn test_interview_insights() {
        let insights = synthesize_interview_insights(&sample_profile());

        assert!(insights.culture.contains("innovative and forward-thinking"));
        assert!(insights.culture.contains("collaborative"));
        assert!(insights.expectations.contains("working cross-functionally"));
        assert_eq!(insights.questions_to_ask.len(), 4);
        assert!(insights.questions_to_ask[3].contains("funding and growth"));
    }

    #[test]
    fn test_interview_insights_defaults() {
        let insights = synthesize_interview_insights(&CompanyProfile::default());
        assert!(insights.culture.ends_with("professional and growth-oriented"));
        assert!(insights.expectations.ends_with("team collaboration"));
        assert_eq!(insights.questions_to_ask.len(), 3);
    }

    #[test]
    fn test_extract_topic_from_title() {
        assert_eq!(extract_topic_from_title("Startup raises seed"), "funding and growth");
        assert_eq!(extract_topic_from_title("New product launch"), "product innovation");
        assert_eq!(extract_topic_from_title("Wins award"), "industry recognition");
        assert_eq!(extract_topic_from_title("Hiring spree"), "team expansion");
        assert_eq!(extract_topic_from_title(""), "recent developments");
    }

    #[test]
    fn test_extract_mission_values() {
        assert_eq!(
            extract_mission_values("Our mission: build robots that help people. More."),
            "build robots that help people"
        );
        assert_eq!(extract_mission_values(""), "");
        assert_eq!(extract_mission_values("We make widgets."), MISSION_UNAVAILABLE);

        let long = format!("Mission: {}", "a".repeat(400));
        let mission = extract_mission_values(&long);
        assert!(mission.ends_with("..."));
        assert_eq!(mission.chars().count(), 303);
    }

    #[test]
    fn test_analyze_company() {
        let analysis = analyze_company(&sample_profile());
        assert_eq!(analysis.overview.name, "Acme Robotics");
        assert_eq!(analysis.recent_news.len(), 2);
        assert!(!analysis.green_flags.is_empty());
        assert!(analysis.red_flags.is_empty());
        assert!((5..=7).contains(&analysis.talking_points.len()));
    }
}
