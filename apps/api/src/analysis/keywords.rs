//! Static keyword dictionaries for job descriptions and resumes.

use std::collections::HashSet;

use once_cell::sync::Lazy;

pub const TECHNICAL_KEYWORDS: &[&str] = &[
    // Languages
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang", "rust", "ruby",
    "php", "swift", "kotlin", "scala", "r", "matlab",
    // Frontend
    "react", "vue", "angular", "svelte", "next.js", "nuxt", "redux", "html", "css", "sass",
    "tailwind", "webpack", "vite",
    // Backend
    "node.js", "express", "django", "flask", "fastapi", "spring", "spring boot", ".net",
    "asp.net", "rails", "laravel",
    // Databases
    "postgresql", "postgres", "mysql", "mongodb", "redis", "cassandra", "dynamodb",
    "elasticsearch", "oracle", "sql server", "sqlite",
    // Cloud & DevOps
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "k8s", "terraform", "ansible",
    "jenkins", "gitlab", "github actions", "circleci", "ci/cd",
    // Data & ML
    "pandas", "numpy", "tensorflow", "pytorch", "scikit-learn", "spark", "hadoop", "airflow",
    "kafka", "machine learning", "deep learning", "nlp", "computer vision",
    // Mobile
    "ios", "android", "react native", "flutter",
    // Tooling & practices
    "git", "linux", "graphql", "rest", "restful", "api", "microservices", "agile", "scrum",
];

pub const LEADERSHIP_KEYWORDS: &[&str] = &[
    "leadership", "mentor", "mentoring", "coach", "coaching", "lead", "leading", "manage",
    "management", "team lead", "tech lead", "technical lead", "collaboration", "communication",
    "stakeholder", "cross-functional", "drive", "initiative", "ownership", "influence",
    "strategic",
];

pub const DOMAIN_KEYWORDS: &[&str] = &[
    "architecture", "design", "system design", "scalability", "performance", "optimization",
    "security", "testing", "debugging", "troubleshooting", "api design", "database design",
    "distributed systems", "microservices",
];

/// Generic JD vocabulary that is worth counting even though it is not a skill.
pub const COMMON_IMPORTANT_WORDS: &[&str] =
    &["experience", "required", "preferred", "skills", "knowledge"];

pub static ALL_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    TECHNICAL_KEYWORDS
        .iter()
        .chain(LEADERSHIP_KEYWORDS)
        .chain(DOMAIN_KEYWORDS)
        .copied()
        .collect()
});

/// Dictionary terms that cannot be counted as a single token.
pub fn is_compound(keyword: &str) -> bool {
    keyword.chars().any(|c| !c.is_alphanumeric())
}
