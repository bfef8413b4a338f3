//! ATS score data models.

use serde::{Deserialize, Serialize};

/// Weighted sub-scores, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub formatting: f64,
    pub skills_alignment: f64,
    pub section_structure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Keyword,
    Formatting,
    Skills,
    Structure,
}

/// One actionable fix with its expected score impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub description: String,
    pub impact: f64,
    pub category: RecommendationCategory,
}

impl Recommendation {
    pub fn new(
        description: impl Into<String>,
        impact: f64,
        category: RecommendationCategory,
    ) -> Self {
        Self {
            description: description.into(),
            impact,
            category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatchDetail {
    pub score: f64,
    /// Percentage of required (importance ≥ 0.7) keywords present.
    pub matched_required: f64,
    pub matched_nice_to_have: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingDetail {
    pub score: f64,
    pub has_sections: bool,
    pub has_bullet_points: bool,
    pub date_format_consistent: bool,
    pub has_tables: bool,
    pub found_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsAlignmentDetail {
    pub score: f64,
    pub technical_match: f64,
    pub leadership_match: f64,
    pub domain_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStructureDetail {
    pub score: f64,
    pub has_contact_info: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub logical_order: bool,
}

/// Full ATS compatibility report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsScore {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
    pub keyword_details: KeywordMatchDetail,
    pub formatting_details: FormattingDetail,
    pub skills_details: SkillsAlignmentDetail,
    pub structure_details: SectionStructureDetail,
}
