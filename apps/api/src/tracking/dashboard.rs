//! Pipeline analytics over tracking rows.
//!
//! Everything here is a pure function of already-loaded rows: the handlers
//! fetch applications, stages and keyword performance, then hand them over.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::keywords::{DOMAIN_KEYWORDS, LEADERSHIP_KEYWORDS, TECHNICAL_KEYWORDS};
use crate::tracking::models::{
    ApplicationRow, ApplicationStageRow, ApplicationStatus, KeywordCategory,
    KeywordPerformanceInput, KeywordPerformanceRow, MetricsInput,
};

/// Share of applications that typically get any response.
pub const BENCHMARK_RESPONSE_RATE: f64 = 50.0;
pub const BENCHMARK_INTERVIEW_RATE: f64 = 15.0;
pub const BENCHMARK_OFFER_RATE: f64 = 5.0;

const HIGH_PERFORMER_RATE: f64 = 70.0;
const LOW_PERFORMER_RATE: f64 = 50.0;
const STRONG_INTERVIEW_RATE: f64 = 25.0;

const FUNNEL_BAR_WIDTH: usize = 50;
const KEYWORD_CHART_LIMIT: usize = 10;
const RULE_WIDTH: usize = 60;

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<i64>() as f64 / values.len() as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Funnel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StageCount {
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineFunnel {
    pub total: usize,
    pub applied: StageCount,
    pub screening: StageCount,
    pub interviewing: StageCount,
    pub offer: StageCount,
    pub rejected: StageCount,
    pub withdrawn: StageCount,
    pub accepted: StageCount,
    /// Share of applications that moved past "applied".
    pub response_rate: f64,
}

pub fn calculate_pipeline_funnel(applications: &[ApplicationRow]) -> PipelineFunnel {
    let total = applications.len();
    let mut counts: HashMap<ApplicationStatus, usize> = HashMap::new();
    for status in applications.iter().filter_map(ApplicationRow::parsed_status) {
        *counts.entry(status).or_default() += 1;
    }

    let stage = |status: ApplicationStatus| {
        let count = counts.get(&status).copied().unwrap_or(0);
        StageCount {
            count,
            pct: percent(count, total),
        }
    };

    let applied = stage(ApplicationStatus::Applied);
    PipelineFunnel {
        total,
        applied,
        screening: stage(ApplicationStatus::Screening),
        interviewing: stage(ApplicationStatus::Interviewing),
        offer: stage(ApplicationStatus::Offer),
        rejected: stage(ApplicationStatus::Rejected),
        withdrawn: stage(ApplicationStatus::Withdrawn),
        accepted: stage(ApplicationStatus::Accepted),
        response_rate: percent(total - applied.count, total),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Success metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Above,
    Average,
    Below,
}

impl BenchmarkStatus {
    /// Within 10% of the benchmark either way counts as average.
    pub fn against(rate: f64, benchmark: f64) -> Self {
        if rate >= benchmark * 1.1 {
            BenchmarkStatus::Above
        } else if rate <= benchmark * 0.9 {
            BenchmarkStatus::Below
        } else {
            BenchmarkStatus::Average
        }
    }

    fn label(self) -> &'static str {
        match self {
            BenchmarkStatus::Above => "Above",
            BenchmarkStatus::Average => "Average",
            BenchmarkStatus::Below => "Below",
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BenchmarkStatus::Above => "✓",
            BenchmarkStatus::Average => "→",
            BenchmarkStatus::Below => "✗",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateMetric {
    pub rate: f64,
    pub benchmark: f64,
    pub status: BenchmarkStatus,
}

impl RateMetric {
    fn new(rate: f64, benchmark: f64) -> Self {
        RateMetric {
            rate,
            benchmark,
            status: BenchmarkStatus::against(rate, benchmark),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessMetrics {
    pub response: RateMetric,
    pub interview: RateMetric,
    pub offer: RateMetric,
}

pub fn calculate_success_metrics(applications: &[ApplicationRow]) -> SuccessMetrics {
    if applications.is_empty() {
        let neutral = |benchmark| RateMetric {
            rate: 0.0,
            benchmark,
            status: BenchmarkStatus::Average,
        };
        return SuccessMetrics {
            response: neutral(BENCHMARK_RESPONSE_RATE),
            interview: neutral(BENCHMARK_INTERVIEW_RATE),
            offer: neutral(BENCHMARK_OFFER_RATE),
        };
    }

    let total = applications.len();
    let responded = applications
        .iter()
        .filter(|app| app.status != ApplicationStatus::Applied.as_str())
        .count();
    let interviewed = applications
        .iter()
        .filter(|app| app.parsed_status().is_some_and(ApplicationStatus::reached_interview))
        .count();
    let offered = applications
        .iter()
        .filter(|app| app.parsed_status().is_some_and(ApplicationStatus::reached_offer))
        .count();

    SuccessMetrics {
        response: RateMetric::new(percent(responded, total), BENCHMARK_RESPONSE_RATE),
        interview: RateMetric::new(percent(interviewed, total), BENCHMARK_INTERVIEW_RATE),
        offer: RateMetric::new(percent(offered, total), BENCHMARK_OFFER_RATE),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Time metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeMetrics {
    pub avg_response_time_days: f64,
    pub avg_time_to_interview_days: f64,
    pub avg_time_to_offer_days: f64,
}

/// Average days from the applied stage to the first screening, interviewing
/// and offer stages, over applications that have both ends.
pub fn calculate_time_metrics(stages: &[ApplicationStageRow]) -> TimeMetrics {
    let mut by_application: BTreeMap<Uuid, Vec<&ApplicationStageRow>> = BTreeMap::new();
    for stage in stages {
        by_application.entry(stage.application_id).or_default().push(stage);
    }

    let (mut response, mut interview, mut offer) = (Vec::new(), Vec::new(), Vec::new());
    for history in by_application.values_mut() {
        history.sort_by_key(|stage| (stage.stage_date, stage.created_at));

        let mut applied = None;
        let (mut screening, mut interviewing, mut offered) = (None, None, None);
        for stage in history.iter() {
            match stage.status.parse::<ApplicationStatus>() {
                Ok(ApplicationStatus::Applied) => applied = Some(stage.stage_date),
                Ok(ApplicationStatus::Screening) => {
                    screening.get_or_insert(stage.stage_date);
                }
                Ok(ApplicationStatus::Interviewing) => {
                    interviewing.get_or_insert(stage.stage_date);
                }
                Ok(ApplicationStatus::Offer) => {
                    offered.get_or_insert(stage.stage_date);
                }
                _ => {}
            }
        }

        let Some(applied) = applied else { continue };
        for (reached, bucket) in [
            (screening, &mut response),
            (interviewing, &mut interview),
            (offered, &mut offer),
        ] {
            if let Some(date) = reached {
                bucket.push((date - applied).num_days());
            }
        }
    }

    TimeMetrics {
        avg_response_time_days: mean(&response),
        avg_time_to_interview_days: mean(&interview),
        avg_time_to_offer_days: mean(&offer),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword performance
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordAnalysis<'a> {
    /// All keywords, best response rate first.
    pub top_keywords_by_response: Vec<&'a KeywordPerformanceRow>,
    pub high_performers: Vec<&'a KeywordPerformanceRow>,
    pub low_performers: Vec<&'a KeywordPerformanceRow>,
}

pub fn analyze_keyword_performance(keywords: &[KeywordPerformanceRow]) -> KeywordAnalysis<'_> {
    let mut ranked: Vec<&KeywordPerformanceRow> = keywords.iter().collect();
    ranked.sort_by(|a, b| b.response_rate.total_cmp(&a.response_rate));

    let high_performers = ranked
        .iter()
        .copied()
        .filter(|kw| kw.response_rate >= HIGH_PERFORMER_RATE)
        .collect();
    let low_performers = ranked
        .iter()
        .copied()
        .filter(|kw| kw.response_rate < LOW_PERFORMER_RATE)
        .collect();

    KeywordAnalysis {
        top_keywords_by_response: ranked,
        high_performers,
        low_performers,
    }
}

/// Dictionary category of a targeted keyword, if it is a known term.
pub fn categorize_keyword(keyword: &str) -> Option<KeywordCategory> {
    let keyword = keyword.to_lowercase();
    let keyword = keyword.as_str();
    if TECHNICAL_KEYWORDS.contains(&keyword) {
        Some(KeywordCategory::TechnicalSkill)
    } else if LEADERSHIP_KEYWORDS.contains(&keyword) {
        Some(KeywordCategory::SoftSkill)
    } else if DOMAIN_KEYWORDS.contains(&keyword) {
        Some(KeywordCategory::Domain)
    } else {
        None
    }
}

#[derive(Default)]
struct KeywordTally {
    uses: usize,
    responses: usize,
    interviews: usize,
    offers: usize,
    last_used: Option<NaiveDate>,
}

/// Recomputes keyword effectiveness from every application's
/// `keywords_targeted`. Keywords are lowercased and counted once per
/// application. Output is ordered by keyword.
pub fn compute_keyword_performance(applications: &[ApplicationRow]) -> Vec<KeywordPerformanceInput> {
    let mut tallies: BTreeMap<String, KeywordTally> = BTreeMap::new();

    for app in applications {
        let status = app.parsed_status();
        let responded = app.status != ApplicationStatus::Applied.as_str();
        let interviewed = status.is_some_and(ApplicationStatus::reached_interview);
        let offered = status.is_some_and(ApplicationStatus::reached_offer);

        let unique: HashSet<String> = app
            .keywords()
            .into_iter()
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();

        for keyword in unique {
            let tally = tallies.entry(keyword).or_default();
            tally.uses += 1;
            tally.responses += usize::from(responded);
            tally.interviews += usize::from(interviewed);
            tally.offers += usize::from(offered);
            tally.last_used = tally.last_used.max(Some(app.applied_date));
        }
    }

    tallies
        .into_iter()
        .map(|(keyword, tally)| KeywordPerformanceInput {
            category: categorize_keyword(&keyword),
            total_uses: to_i32(tally.uses),
            response_count: to_i32(tally.responses),
            response_rate: percent(tally.responses, tally.uses),
            interview_count: to_i32(tally.interviews),
            interview_rate: percent(tally.interviews, tally.uses),
            offer_count: to_i32(tally.offers),
            offer_rate: percent(tally.offers, tally.uses),
            last_used_date: tally.last_used,
            keyword,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics snapshot
// ────────────────────────────────────────────────────────────────────────────

/// Builds the `metrics` row for `today` from the full application history.
pub fn build_metrics_snapshot(
    applications: &[ApplicationRow],
    stages: &[ApplicationStageRow],
    today: NaiveDate,
) -> MetricsInput {
    let funnel = calculate_pipeline_funnel(applications);
    let success = calculate_success_metrics(applications);
    let times = calculate_time_metrics(stages);

    let count_where = |pred: &dyn Fn(&ApplicationRow) -> bool| {
        to_i32(applications.iter().filter(|app| pred(app)).count())
    };
    let is_active = |app: &ApplicationRow| {
        app.parsed_status().is_some_and(ApplicationStatus::is_active)
    };

    MetricsInput {
        metric_date: today,
        total_applications: to_i32(funnel.total),
        applications_sent_today: count_where(&|app| app.applied_date == today),
        total_responses: count_where(&|app| app.status != ApplicationStatus::Applied.as_str()),
        response_rate: success.response.rate,
        total_interviews: count_where(&|app| {
            app.parsed_status().is_some_and(ApplicationStatus::reached_interview)
        }),
        interview_rate: success.interview.rate,
        total_offers: count_where(&|app| {
            app.parsed_status().is_some_and(ApplicationStatus::reached_offer)
        }),
        offer_rate: success.offer.rate,
        total_rejections: to_i32(funnel.rejected.count),
        avg_response_time_days: times.avg_response_time_days,
        avg_time_to_interview_days: times.avg_time_to_interview_days,
        avg_time_to_offer_days: times.avg_time_to_offer_days,
        active_applications: count_where(&is_active),
        pending_followups: count_where(&|app| {
            is_active(app) && app.next_followup_date.is_some_and(|date| date <= today)
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn generate_funnel_visualization(funnel: &PipelineFunnel) -> String {
    if funnel.total == 0 {
        return "No applications to display.\n".to_string();
    }

    let bar = |stage: StageCount| {
        let width = stage.count * FUNNEL_BAR_WIDTH / funnel.total;
        format!("{} {} ({:.0}%)", "█".repeat(width), stage.count, stage.pct)
    };

    [
        "Application Pipeline".to_string(),
        "=".repeat(RULE_WIDTH),
        String::new(),
        format!("Total Applications: {}", funnel.total),
        format!("├─ Applied:       {}", bar(funnel.applied)),
        format!("├─ Screening:     {}", bar(funnel.screening)),
        format!("├─ Interview:     {}", bar(funnel.interviewing)),
        format!("├─ Offer:         {}", bar(funnel.offer)),
        format!("└─ Rejected:      {}", bar(funnel.rejected)),
        String::new(),
    ]
    .join("\n")
}

fn format_metric(metric: &RateMetric) -> String {
    format!(
        "{:.0}%  {} {} ({:.0}%)",
        metric.rate,
        metric.status.symbol(),
        metric.status.label(),
        metric.benchmark
    )
}

pub fn generate_metrics_table(metrics: &SuccessMetrics) -> String {
    [
        "Success Metrics:".to_string(),
        format!("- Response Rate:  {}", format_metric(&metrics.response)),
        format!("- Interview Rate: {}", format_metric(&metrics.interview)),
        format!("- Offer Rate:     {}", format_metric(&metrics.offer)),
        String::new(),
    ]
    .join("\n")
}

pub fn generate_keyword_chart(analysis: &KeywordAnalysis<'_>) -> String {
    if analysis.top_keywords_by_response.is_empty() {
        return "No keyword data available.\n".to_string();
    }

    let mut lines = vec!["Top Keywords (by response rate):".to_string()];
    for (rank, kw) in analysis
        .top_keywords_by_response
        .iter()
        .take(KEYWORD_CHART_LIMIT)
        .enumerate()
    {
        lines.push(format!(
            "{}. {:30} - {:.0}% ({}/{} responses)",
            rank + 1,
            kw.keyword,
            kw.response_rate,
            kw.response_count,
            kw.total_uses
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn generate_recommendations(
    metrics: &SuccessMetrics,
    keyword_analysis: &KeywordAnalysis<'_>,
    time_metrics: &TimeMetrics,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(top) = keyword_analysis.high_performers.first() {
        recommendations.push(format!(
            "→ Emphasize '{}' in future applications - {:.0}% response rate",
            top.keyword, top.response_rate
        ));
    }

    let response_rate = metrics.response.rate;
    let interview_rate = metrics.interview.rate;
    if response_rate < BENCHMARK_RESPONSE_RATE {
        recommendations
            .push("→ Response rate below average - review resume keywords and formatting".to_string());
    } else if interview_rate > STRONG_INTERVIEW_RATE {
        recommendations.push(
            "→ Your interview conversion is strong - focus on getting more interviews".to_string(),
        );
    }
    if interview_rate < BENCHMARK_INTERVIEW_RATE && response_rate > BENCHMARK_RESPONSE_RATE {
        recommendations.push(
            "→ Strong response rate but low interview rate - improve screening call performance"
                .to_string(),
        );
    }

    if time_metrics.avg_response_time_days > 0.0 {
        let followup_days = (time_metrics.avg_response_time_days + 2.0) as i64;
        recommendations.push(format!(
            "→ Consider following up after {followup_days} days if no response"
        ));
    }

    if recommendations.is_empty() {
        recommendations
            .push("→ Continue applying consistently and track your progress".to_string());
    }
    recommendations
}

// ────────────────────────────────────────────────────────────────────────────
// Filters
// ────────────────────────────────────────────────────────────────────────────

/// Keeps applications whose applied date falls in `[start, end]`.
pub fn filter_applications_by_date(
    mut applications: Vec<ApplicationRow>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ApplicationRow> {
    applications.retain(|app| (start..=end).contains(&app.applied_date));
    applications
}

/// `include: None` keeps every status not in `exclude`.
pub fn filter_applications_by_status(
    mut applications: Vec<ApplicationRow>,
    include: Option<&[ApplicationStatus]>,
    exclude: &[ApplicationStatus],
) -> Vec<ApplicationRow> {
    let listed = |statuses: &[ApplicationStatus], status: &str| {
        statuses.iter().any(|s| s.as_str() == status)
    };
    applications.retain(|app| {
        let status = app.status.as_str();
        !listed(exclude, status) && include.map_or(true, |inc| listed(inc, status))
    });
    applications
}

/// Parses "last N months" (N·30 days), "last N days", "this year" or
/// "YYYY-MM-DD:YYYY-MM-DD" into an inclusive date range ending at `today`
/// for the relative forms.
pub fn parse_date_filter(filter: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let filter = filter.trim().to_lowercase();
    let count = || {
        filter
            .split_whitespace()
            .nth(1)
            .and_then(|n| n.parse::<u32>().ok())
    };

    let days_back = |days: u64| today.checked_sub_days(Days::new(days)).map(|start| (start, today));

    if filter.contains("last") && filter.contains("month") {
        if let Some(months) = count() {
            return days_back(u64::from(months) * 30);
        }
    }
    if filter.contains("last") && filter.contains("day") {
        if let Some(days) = count() {
            return days_back(u64::from(days));
        }
    }
    if filter.contains("this year") {
        return NaiveDate::from_ymd_opt(today.year(), 1, 1).map(|start| (start, today));
    }
    if let Some((start, end)) = filter.split_once(':') {
        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
        let (start, end) = (parse(start)?, parse(end)?);
        return (start <= end).then_some((start, end));
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardFormat {
    #[default]
    Terminal,
    Markdown,
    Json,
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub format: DashboardFormat,
    pub date_filter: Option<String>,
    pub include: Option<Vec<ApplicationStatus>>,
    pub exclude: Vec<ApplicationStatus>,
    /// Anchor for relative date filters.
    pub today: NaiveDate,
}

#[derive(Debug, Serialize)]
struct DashboardReport<'a> {
    funnel: &'a PipelineFunnel,
    metrics: &'a SuccessMetrics,
    time_metrics: &'a TimeMetrics,
    keywords: &'a [&'a KeywordPerformanceRow],
    recommendations: &'a [String],
}

struct DashboardData<'a> {
    funnel: PipelineFunnel,
    metrics: SuccessMetrics,
    time_metrics: TimeMetrics,
    keywords: KeywordAnalysis<'a>,
    recommendations: Vec<String>,
}

/// Filters the rows per `options`, computes every metric and renders the
/// dashboard in the requested format.
pub fn generate_dashboard(
    applications: Vec<ApplicationRow>,
    mut stages: Vec<ApplicationStageRow>,
    keywords: &[KeywordPerformanceRow],
    options: &DashboardOptions,
) -> Result<String, serde_json::Error> {
    let mut applications = applications;
    if let Some((start, end)) = options
        .date_filter
        .as_deref()
        .and_then(|filter| parse_date_filter(filter, options.today))
    {
        applications = filter_applications_by_date(applications, start, end);
    }
    applications =
        filter_applications_by_status(applications, options.include.as_deref(), &options.exclude);

    let kept: HashSet<Uuid> = applications.iter().map(|app| app.id).collect();
    stages.retain(|stage| kept.contains(&stage.application_id));

    let metrics = calculate_success_metrics(&applications);
    let time_metrics = calculate_time_metrics(&stages);
    let keyword_analysis = analyze_keyword_performance(keywords);
    let data = DashboardData {
        funnel: calculate_pipeline_funnel(&applications),
        recommendations: generate_recommendations(&metrics, &keyword_analysis, &time_metrics),
        metrics,
        time_metrics,
        keywords: keyword_analysis,
    };

    match options.format {
        DashboardFormat::Json => serde_json::to_string_pretty(&DashboardReport {
            funnel: &data.funnel,
            metrics: &data.metrics,
            time_metrics: &data.time_metrics,
            keywords: &data.keywords.top_keywords_by_response,
            recommendations: &data.recommendations,
        }),
        DashboardFormat::Terminal => Ok(render_terminal(&data)),
        DashboardFormat::Markdown => Ok(render_markdown(&data)),
    }
}

fn render_terminal(data: &DashboardData<'_>) -> String {
    let mut sections = vec![
        "Application Pipeline Dashboard".to_string(),
        "=".repeat(RULE_WIDTH),
        String::new(),
        generate_funnel_visualization(&data.funnel),
        generate_metrics_table(&data.metrics),
    ];

    let times = &data.time_metrics;
    if times.avg_response_time_days > 0.0 {
        sections.push("Time Analysis:".to_string());
        sections.push(format!(
            "- Avg time to response:  {:.1} days",
            times.avg_response_time_days
        ));
        if times.avg_time_to_interview_days > 0.0 {
            sections.push(format!(
                "- Avg time to interview: {:.1} days",
                times.avg_time_to_interview_days
            ));
        }
        if times.avg_time_to_offer_days > 0.0 {
            sections.push(format!(
                "- Avg time to offer:     {:.1} days",
                times.avg_time_to_offer_days
            ));
        }
        sections.push(String::new());
    }

    sections.push(generate_keyword_chart(&data.keywords));

    sections.push("Recommendations:".to_string());
    sections.extend(data.recommendations.iter().cloned());
    sections.push(String::new());

    sections.join("\n")
}

fn render_markdown(data: &DashboardData<'_>) -> String {
    let mut out = vec![
        "# Application Pipeline Dashboard".to_string(),
        String::new(),
        "## Pipeline".to_string(),
        String::new(),
        "```".to_string(),
        generate_funnel_visualization(&data.funnel).trim_end().to_string(),
        "```".to_string(),
        String::new(),
        "## Success Metrics".to_string(),
        String::new(),
        "| Metric | Rate | Benchmark | Status |".to_string(),
        "|---|---|---|---|".to_string(),
    ];
    for (name, metric) in [
        ("Response Rate", &data.metrics.response),
        ("Interview Rate", &data.metrics.interview),
        ("Offer Rate", &data.metrics.offer),
    ] {
        out.push(format!(
            "| {name} | {:.0}% | {:.0}% | {} {} |",
            metric.rate,
            metric.benchmark,
            metric.status.symbol(),
            metric.status.label()
        ));
    }
    out.push(String::new());

    let times = &data.time_metrics;
    if times.avg_response_time_days > 0.0 {
        out.push("## Time Analysis".to_string());
        out.push(String::new());
        for (label, days) in [
            ("Avg time to response", times.avg_response_time_days),
            ("Avg time to interview", times.avg_time_to_interview_days),
            ("Avg time to offer", times.avg_time_to_offer_days),
        ] {
            if days > 0.0 {
                out.push(format!("- **{label}:** {days:.1} days"));
            }
        }
        out.push(String::new());
    }

    out.push("## Top Keywords".to_string());
    out.push(String::new());
    if data.keywords.top_keywords_by_response.is_empty() {
        out.push("No keyword data available.".to_string());
    } else {
        out.push("| # | Keyword | Response Rate | Responses |".to_string());
        out.push("|---|---|---|---|".to_string());
        for (rank, kw) in data
            .keywords
            .top_keywords_by_response
            .iter()
            .take(KEYWORD_CHART_LIMIT)
            .enumerate()
        {
            out.push(format!(
                "| {} | {} | {:.0}% | {}/{} |",
                rank + 1,
                kw.keyword,
                kw.response_rate,
                kw.response_count,
                kw.total_uses
            ));
        }
    }
    out.push(String::new());

    out.push("## Recommendations".to_string());
    out.push(String::new());
    for rec in &data.recommendations {
        out.push(format!("- {}", rec.trim_start_matches("→ ")));
    }
    out.push(String::new());

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn apps(statuses: &[ApplicationStatus]) -> Vec<ApplicationRow> {
        statuses
            .iter()
            .map(|&status| ApplicationRow::sample("Acme", status, date(2026, 3, 1)))
            .collect()
    }

    fn stage(application_id: Uuid, status: ApplicationStatus, stage_date: NaiveDate) -> ApplicationStageRow {
        ApplicationStageRow {
            id: Uuid::new_v4(),
            application_id,
            status: status.as_str().to_string(),
            stage_date,
            notes: None,
            changed_by: None,
            created_at: Utc::now(),
        }
    }

    fn keyword(name: &str, uses: i32, responses: i32) -> KeywordPerformanceRow {
        KeywordPerformanceRow {
            id: Uuid::new_v4(),
            keyword: name.to_string(),
            total_uses: uses,
            response_count: responses,
            response_rate: f64::from(responses) * 100.0 / f64::from(uses),
            interview_count: 0,
            interview_rate: 0.0,
            offer_count: 0,
            offer_rate: 0.0,
            category: None,
            last_used_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    use ApplicationStatus::*;

    #[test]
    fn test_pipeline_funnel_counts_and_response_rate() {
        let funnel = calculate_pipeline_funnel(&apps(&[Applied, Applied, Screening, Offer]));

        assert_eq!(funnel.total, 4);
        assert_eq!(funnel.applied.count, 2);
        assert_eq!(funnel.applied.pct, 50.0);
        assert_eq!(funnel.offer.pct, 25.0);
        assert_eq!(funnel.rejected.count, 0);
        assert_eq!(funnel.response_rate, 50.0);
    }

    #[test]
    fn test_pipeline_funnel_empty() {
        let funnel = calculate_pipeline_funnel(&[]);
        assert_eq!(funnel, PipelineFunnel::default());
    }

    #[test]
    fn test_benchmark_status_bands() {
        assert_eq!(BenchmarkStatus::against(56.0, 50.0), BenchmarkStatus::Above);
        assert_eq!(BenchmarkStatus::against(54.0, 50.0), BenchmarkStatus::Average);
        assert_eq!(BenchmarkStatus::against(44.0, 50.0), BenchmarkStatus::Below);
        assert_eq!(BenchmarkStatus::against(46.0, 50.0), BenchmarkStatus::Average);
    }

    #[test]
    fn test_success_metrics() {
        let metrics = calculate_success_metrics(&apps(&[
            Applied, Rejected, Screening, Interviewing, Offer, Accepted, Applied, Applied, Applied,
            Applied,
        ]));

        assert_eq!(metrics.response.rate, 50.0);
        assert_eq!(metrics.response.status, BenchmarkStatus::Average);
        assert_eq!(metrics.interview.rate, 30.0);
        assert_eq!(metrics.interview.status, BenchmarkStatus::Above);
        assert_eq!(metrics.offer.rate, 20.0);
        assert_eq!(metrics.offer.benchmark, BENCHMARK_OFFER_RATE);
    }

    #[test]
    fn test_success_metrics_empty_is_average() {
        let metrics = calculate_success_metrics(&[]);
        assert_eq!(metrics.response.rate, 0.0);
        assert_eq!(metrics.offer.status, BenchmarkStatus::Average);
    }

    #[test]
    fn test_time_metrics() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let stages = vec![
            stage(a, Screening, date(2026, 3, 5)),
            stage(a, Applied, date(2026, 3, 1)),
            stage(a, Interviewing, date(2026, 3, 11)),
            stage(a, Screening, date(2026, 3, 20)),
            stage(b, Applied, date(2026, 3, 1)),
            stage(b, Screening, date(2026, 3, 9)),
            // no applied stage, ignored
            stage(Uuid::new_v4(), Offer, date(2026, 4, 1)),
        ];

        let metrics = calculate_time_metrics(&stages);
        assert_eq!(metrics.avg_response_time_days, 6.0);
        assert_eq!(metrics.avg_time_to_interview_days, 10.0);
        assert_eq!(metrics.avg_time_to_offer_days, 0.0);
    }

    #[test]
    fn test_keyword_analysis_thresholds() {
        let rows = vec![
            keyword("sql", 10, 4),
            keyword("rust", 10, 8),
            keyword("go", 10, 7),
            keyword("java", 10, 5),
        ];
        let analysis = analyze_keyword_performance(&rows);

        let ranked: Vec<&str> = analysis
            .top_keywords_by_response
            .iter()
            .map(|k| k.keyword.as_str())
            .collect();
        assert_eq!(ranked, vec!["rust", "go", "java", "sql"]);
        assert_eq!(analysis.high_performers.len(), 2);
        assert_eq!(analysis.low_performers.len(), 1);
        assert_eq!(analysis.low_performers[0].keyword, "sql");
    }

    #[test]
    fn test_compute_keyword_performance() {
        let mut first = ApplicationRow::sample("Acme", Interviewing, date(2026, 2, 1));
        first.keywords_targeted = Some(serde_json::json!(["Rust", "rust", "Leadership"]));
        let mut second = ApplicationRow::sample("Globex", Applied, date(2026, 3, 1));
        second.keywords_targeted = Some(serde_json::json!(["rust", "widgets"]));

        let perf = compute_keyword_performance(&[first, second]);
        let names: Vec<&str> = perf.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(names, vec!["leadership", "rust", "widgets"]);

        let rust = &perf[1];
        assert_eq!(rust.total_uses, 2);
        assert_eq!(rust.response_count, 1);
        assert_eq!(rust.response_rate, 50.0);
        assert_eq!(rust.interview_count, 1);
        assert_eq!(rust.offer_count, 0);
        assert_eq!(rust.last_used_date, Some(date(2026, 3, 1)));
        assert_eq!(rust.category, Some(KeywordCategory::TechnicalSkill));
        assert_eq!(perf[0].category, Some(KeywordCategory::SoftSkill));
        assert_eq!(perf[2].category, None);
    }

    #[test]
    fn test_metrics_snapshot() {
        let today = date(2026, 3, 15);
        let mut rows = apps(&[Applied, Screening, Rejected, Offer]);
        rows[0].applied_date = today;
        rows[1].next_followup_date = Some(date(2026, 3, 10));
        rows[2].next_followup_date = Some(date(2026, 3, 10));

        let snapshot = build_metrics_snapshot(&rows, &[], today);
        assert_eq!(snapshot.metric_date, today);
        assert_eq!(snapshot.total_applications, 4);
        assert_eq!(snapshot.applications_sent_today, 1);
        assert_eq!(snapshot.total_responses, 3);
        assert_eq!(snapshot.response_rate, 75.0);
        assert_eq!(snapshot.total_interviews, 1);
        assert_eq!(snapshot.total_offers, 1);
        assert_eq!(snapshot.total_rejections, 1);
        assert_eq!(snapshot.active_applications, 3);
        // the rejected application's follow-up no longer counts
        assert_eq!(snapshot.pending_followups, 1);
    }

    #[test]
    fn test_funnel_visualization() {
        let funnel = calculate_pipeline_funnel(&apps(&[Applied, Applied, Applied, Screening]));
        let chart = generate_funnel_visualization(&funnel);

        assert!(chart.starts_with("Application Pipeline\n"));
        assert!(chart.contains("Total Applications: 4"));
        assert!(chart.contains(&format!("├─ Applied:       {} 3 (75%)", "█".repeat(37))));
        assert!(chart.contains(&format!("├─ Screening:     {} 1 (25%)", "█".repeat(12))));
        assert!(chart.contains("└─ Rejected:       0 (0%)"));
        assert!(chart.ends_with('\n'));

        assert_eq!(
            generate_funnel_visualization(&PipelineFunnel::default()),
            "No applications to display.\n"
        );
    }

    #[test]
    fn test_metrics_table_symbols() {
        let metrics = calculate_success_metrics(&apps(&[Offer, Applied, Applied, Applied]));
        let table = generate_metrics_table(&metrics);

        assert!(table.contains("- Response Rate:  25%  ✗ Below (50%)"));
        assert!(table.contains("- Interview Rate: 25%  ✓ Above (15%)"));
        assert!(table.contains("- Offer Rate:     25%  ✓ Above (5%)"));
    }

    #[test]
    fn test_keyword_chart_limits_to_ten() {
        let rows: Vec<KeywordPerformanceRow> =
            (0..12).map(|i| keyword(&format!("kw{i:02}"), 20, i)).collect();
        let analysis = analyze_keyword_performance(&rows);
        let chart = generate_keyword_chart(&analysis);

        assert!(chart.starts_with("Top Keywords (by response rate):\n1. kw11"));
        assert!(chart.contains("10. kw02"));
        assert!(!chart.contains("kw01"));
        assert!(chart.contains("- 55% (11/20 responses)"));

        assert_eq!(
            generate_keyword_chart(&KeywordAnalysis::default()),
            "No keyword data available.\n"
        );
    }

    #[test]
    fn test_recommendations() {
        let rows = vec![keyword("kubernetes", 10, 8)];
        let analysis = analyze_keyword_performance(&rows);
        let metrics = calculate_success_metrics(&apps(&[Applied, Applied, Applied, Screening]));
        let times = TimeMetrics {
            avg_response_time_days: 6.5,
            ..Default::default()
        };

        let recs = generate_recommendations(&metrics, &analysis, &times);
        assert_eq!(
            recs,
            vec![
                "→ Emphasize 'kubernetes' in future applications - 80% response rate",
                "→ Response rate below average - review resume keywords and formatting",
                "→ Consider following up after 8 days if no response",
            ]
        );
    }

    #[test]
    fn test_recommendations_screening_gap() {
        let metrics = calculate_success_metrics(&apps(&[Screening, Screening, Screening, Rejected]));
        let recs = generate_recommendations(
            &metrics,
            &KeywordAnalysis::default(),
            &TimeMetrics::default(),
        );
        assert_eq!(
            recs,
            vec!["→ Strong response rate but low interview rate - improve screening call performance"]
        );
    }

    #[test]
    fn test_filters() {
        let mut rows = apps(&[Applied, Rejected, Offer]);
        rows[0].applied_date = date(2026, 1, 10);
        rows[1].applied_date = date(2026, 2, 10);
        rows[2].applied_date = date(2026, 3, 10);

        let in_range = filter_applications_by_date(rows.clone(), date(2026, 2, 1), date(2026, 3, 10));
        assert_eq!(in_range.len(), 2);

        let excluded = filter_applications_by_status(rows.clone(), None, &[Rejected]);
        assert_eq!(excluded.len(), 2);

        let included = filter_applications_by_status(rows, Some(&[Offer, Rejected][..]), &[Rejected]);
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].status, "offer");
    }

    #[test]
    fn test_parse_date_filter() {
        let today = date(2026, 6, 30);

        assert_eq!(
            parse_date_filter("last 3 months", today),
            Some((date(2026, 4, 1), today))
        );
        assert_eq!(
            parse_date_filter("last 30 days", today),
            Some((date(2026, 5, 31), today))
        );
        assert_eq!(
            parse_date_filter("this year", today),
            Some((date(2026, 1, 1), today))
        );
        assert_eq!(
            parse_date_filter("2026-01-01:2026-02-15", today),
            Some((date(2026, 1, 1), date(2026, 2, 15)))
        );
        assert_eq!(parse_date_filter("last few days", today), None);
        assert_eq!(parse_date_filter("2026-01-01:soon", today), None);
        assert_eq!(parse_date_filter("whenever", today), None);
    }

    #[test]
    fn test_parse_date_filter_rejects_out_of_range_and_inverted() {
        let today = date(2026, 10, 17);
        assert_eq!(parse_date_filter("last 999999999 days", today), None);
        assert_eq!(parse_date_filter("last 99999999 months", today), None);
        assert_eq!(parse_date_filter("2026-03-01:2026-01-01", today), None);
        assert_eq!(
            parse_date_filter("2026-03-01:2026-03-01", today),
            Some((date(2026, 3, 1), date(2026, 3, 1)))
        );
    }

    fn options(format: DashboardFormat) -> DashboardOptions {
        DashboardOptions {
            format,
            date_filter: None,
            include: None,
            exclude: Vec::new(),
            today: date(2026, 3, 31),
        }
    }

    #[test]
    fn test_dashboard_terminal() {
        let rows = apps(&[Applied, Screening]);
        let stages = vec![
            stage(rows[1].id, Applied, date(2026, 3, 1)),
            stage(rows[1].id, Screening, date(2026, 3, 4)),
        ];
        let keywords = vec![keyword("python", 4, 3)];

        let out = generate_dashboard(rows, stages, &keywords, &options(DashboardFormat::Terminal))
            .unwrap();

        assert!(out.starts_with("Application Pipeline Dashboard\n"));
        assert!(out.contains("Total Applications: 2"));
        assert!(out.contains("Time Analysis:\n- Avg time to response:  3.0 days"));
        assert!(!out.contains("Avg time to interview"));
        assert!(out.contains("1. python"));
        assert!(out.contains("Recommendations:\n→ Emphasize 'python'"));
    }

    #[test]
    fn test_dashboard_json_applies_filters() {
        let mut rows = apps(&[Applied, Rejected, Offer]);
        rows[0].applied_date = date(2025, 6, 1);
        let old_id = rows[0].id;
        let stages = vec![stage(old_id, Applied, date(2025, 6, 1))];

        let mut opts = options(DashboardFormat::Json);
        opts.date_filter = Some("this year".to_string());
        opts.exclude = vec![Rejected];

        let out = generate_dashboard(rows, stages, &[], &opts).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["funnel"]["total"], 1);
        assert_eq!(json["funnel"]["offer"]["count"], 1);
        assert_eq!(json["metrics"]["offer"]["status"], "above");
        assert_eq!(json["time_metrics"]["avg_response_time_days"], 0.0);
        assert_eq!(json["keywords"], serde_json::json!([]));
        assert!(json["recommendations"].as_array().is_some_and(|r| !r.is_empty()));
    }

    #[test]
    fn test_dashboard_markdown() {
        let keywords = vec![keyword("terraform", 5, 4)];
        let out = generate_dashboard(
            apps(&[Screening, Interviewing]),
            Vec::new(),
            &keywords,
            &options(DashboardFormat::Markdown),
        )
        .unwrap();

        assert!(out.starts_with("# Application Pipeline Dashboard\n"));
        assert!(out.contains("```\nApplication Pipeline\n"));
        assert!(out.contains("| Response Rate | 100% | 50% | ✓ Above |"));
        assert!(out.contains("| 1 | terraform | 80% | 4/5 |"));
        assert!(out.contains("## Recommendations\n\n- Emphasize 'terraform'"));
        assert!(!out.contains("## Time Analysis"));
    }
}
