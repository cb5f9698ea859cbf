use arch_advisor::error::AppError;
use arch_advisor::recommendation::{
    AdvisorConfig, ArchitectureAdvisor, RawRequirements, ServiceCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the catalog from `path` (JSON, or CSV by extension), or the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<ServiceCatalog, AppError> {
    match path {
        Some(path) => Ok(ServiceCatalog::from_path(path)?),
        None => Ok(ServiceCatalog::builtin()?),
    }
}

pub(crate) fn load_advisor_config(path: Option<&Path>) -> Result<AdvisorConfig, AppError> {
    match path {
        Some(path) => Ok(AdvisorConfig::from_path(path)?),
        None => Ok(AdvisorConfig::default()),
    }
}

pub(crate) fn build_advisor(
    catalog: Option<&Path>,
    config: Option<&Path>,
) -> Result<ArchitectureAdvisor, AppError> {
    let catalog = load_catalog(catalog)?;
    let config = load_advisor_config(config)?;
    Ok(ArchitectureAdvisor::new(Arc::new(catalog), config)?)
}

/// Read a JSON requirements document from a file.
pub(crate) fn read_requirements(path: &Path) -> Result<RawRequirements, AppError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_builtin_catalog_and_config() {
        let advisor = build_advisor(None, None).expect("defaults load");
        assert_eq!(advisor.catalog().version(), "azure-2024.1");
        assert_eq!(
            load_advisor_config(None).expect("default config"),
            AdvisorConfig::default()
        );
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let result = load_catalog(Some(Path::new("does-not-exist/catalog.json")));
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[test]
    fn reads_requirements_documents() {
        let path = std::env::temp_dir().join(format!(
            "arch-advisor-requirements-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"industry":"retail","scale":"large"}"#).expect("write");

        let raw = read_requirements(&path).expect("requirements parse");
        std::fs::remove_file(&path).expect("cleanup");

        assert_eq!(raw.industry.as_deref(), Some("retail"));
        assert_eq!(raw.scale.as_deref(), Some("large"));
    }
}
