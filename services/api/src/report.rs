use crate::infra::{build_advisor, load_catalog, read_requirements};
use arch_advisor::config::{AdvisorSources, AppConfig};
use arch_advisor::error::AppError;
use arch_advisor::telemetry;
use arch_advisor::recommendation::{CatalogSummary, RawBudget, RawRequirements, Recommendation};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// JSON requirements document; replaces the inline requirement flags
    #[arg(
        long,
        conflicts_with_all = ["industry", "scale", "expected_users", "compliance", "budget"]
    )]
    pub(crate) requirements: Option<PathBuf>,
    /// Industry vertical, e.g. healthcare or "financial services"
    #[arg(long)]
    pub(crate) industry: Option<String>,
    /// Scale tier: small, medium, large or enterprise
    #[arg(long)]
    pub(crate) scale: Option<String>,
    /// Expected users, used to derive the scale tier when --scale is absent
    #[arg(long)]
    pub(crate) expected_users: Option<u64>,
    /// Comma-separated certifications required in addition to industry obligations
    #[arg(long, value_delimiter = ',')]
    pub(crate) compliance: Vec<String>,
    /// Monthly budget ceiling
    #[arg(long)]
    pub(crate) budget: Option<f64>,
    /// Treat the budget ceiling as a hard limit
    #[arg(long, requires = "budget")]
    pub(crate) hard_budget: bool,
    /// Catalog file (JSON, or CSV by extension); defaults to the built-in catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Advisor tuning file (JSON)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Print the recommendation as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl RecommendArgs {
    fn inline_requirements(&self) -> RawRequirements {
        RawRequirements {
            industry: self.industry.clone(),
            compliance: self.compliance.clone(),
            scale: self.scale.clone(),
            expected_users: self.expected_users,
            budget: self.budget.map(|monthly_ceiling| RawBudget {
                monthly_ceiling,
                hard: self.hard_budget,
            }),
            ..RawRequirements::default()
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Catalog file (JSON, or CSV by extension); defaults to the built-in catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RecommendationDocument<'a> {
    generated_at: DateTime<Utc>,
    recommendation: &'a Recommendation,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let sources = load_cli_config()?;
    let catalog = args.catalog.clone().or(sources.catalog_path);
    let config = args.config.clone().or(sources.config_path);
    let advisor = build_advisor(catalog.as_deref(), config.as_deref())?;

    let raw = match &args.requirements {
        Some(path) => read_requirements(path)?,
        None => args.inline_requirements(),
    };
    let recommendation = advisor.recommend(raw)?;
    let generated_at = Utc::now();

    if args.json {
        println!("{}", render_json(&recommendation, generated_at)?);
    } else {
        println!("{}", render_recommendation(&recommendation, generated_at));
    }
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let sources = load_cli_config()?;
    let catalog = load_catalog(args.catalog.or(sources.catalog_path).as_deref())?;
    println!("{}", render_catalog(&catalog.summary()));
    Ok(())
}

/// Load the environment config and route pipeline logs to stderr.
fn load_cli_config() -> Result<AdvisorSources, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;
    Ok(config.advisor)
}

fn render_json(
    recommendation: &Recommendation,
    generated_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let document = RecommendationDocument {
        generated_at,
        recommendation,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub(crate) fn render_recommendation(
    recommendation: &Recommendation,
    generated_at: DateTime<Utc>,
) -> String {
    let cost = &recommendation.cost;
    let mut lines = vec![
        format!(
            "Architecture recommendation | catalog {}",
            recommendation.catalog_version
        ),
        format!("Generated {}", generated_at.format("%Y-%m-%dT%H:%M:%SZ")),
        format!(
            "Overall score {:.1} | {}",
            recommendation.overall_score,
            if recommendation.complete {
                "complete"
            } else {
                "incomplete (unresolved dependencies)"
            }
        ),
        format!(
            "Estimated cost ${:.2}/month | ${:.2}/year list | ${:.2}/year committed",
            cost.total_monthly, cost.total_annual, cost.committed_annual
        ),
        String::new(),
        "Services by layer".to_string(),
    ];

    for selection in &recommendation.categories {
        if selection.services.is_empty() {
            lines.push(format!("- {}: no eligible service", selection.label));
        }
        for selected in &selection.services {
            lines.push(format!(
                "- {}: {} ({}) score {:.1} | ${:.2}/month",
                selection.label,
                selected.service.name,
                selected.service.id,
                selected.score,
                selected.monthly_cost
            ));
        }
    }

    if !recommendation.edges.is_empty() {
        lines.push(String::new());
        lines.push(format!("Connections ({})", recommendation.edges.len()));
        for edge in &recommendation.edges {
            lines.push(format!("- {} -> {} [{}]", edge.from, edge.to, edge.kind.label()));
        }
    }

    if !recommendation.patterns.is_empty() {
        lines.push(String::new());
        lines.push("Architecture patterns".to_string());
        for detected in &recommendation.patterns {
            lines.push(format!(
                "- {} ({}): {}",
                detected.label,
                detected.completeness.label(),
                detected.description
            ));
        }
    }

    if !cost.savings.is_empty() {
        lines.push(String::new());
        lines.push("Savings opportunities".to_string());
        for saving in &cost.savings {
            lines.push(format!(
                "- {}: {} instead of {} saves ${:.2}/month for {:.1} points",
                saving.category.label(),
                saving.alternative,
                saving.selected,
                saving.monthly_savings,
                saving.score_gap
            ));
        }
    }

    if !cost.reserved_capacity.is_empty() {
        let names: Vec<&str> = cost.reserved_capacity.iter().map(|id| id.as_str()).collect();
        lines.push(String::new());
        lines.push(format!("Reserved capacity candidates: {}", names.join(", ")));
    }

    if !recommendation.warnings.is_empty() {
        lines.push(String::new());
        lines.push(format!("Warnings ({})", recommendation.warnings.len()));
        for warning in &recommendation.warnings {
            lines.push(format!("- {}", warning.summary()));
        }
    }

    if !recommendation.excluded.is_empty() {
        lines.push(String::new());
        lines.push(format!("Excluded services ({})", recommendation.excluded.len()));
        for exclusion in &recommendation.excluded {
            lines.push(format!(
                "- {} ({}): {}",
                exclusion.service,
                exclusion.category.label(),
                exclusion.reason.summary()
            ));
        }
    }

    lines.join("\n")
}

pub(crate) fn render_catalog(summary: &CatalogSummary) -> String {
    let mut lines = vec![format!("Service catalog {}", summary.version)];
    for category in &summary.categories {
        let services: Vec<&str> = category.services.iter().map(|id| id.as_str()).collect();
        lines.push(format!(
            "- {} (select up to {}): {}",
            category.label,
            category.selection.max_selections(),
            services.join(", ")
        ));
    }
    lines.join("\n")
}
