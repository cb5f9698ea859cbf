use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::document::{CostRecord, PerformanceRecord, ScaleRecord, ServiceRecord};

/// Parse a tabular catalog export: one service per row, list columns separated by `;`.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ServiceRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        records.push(row.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    #[serde(default)]
    name: String,
    category: String,
    fixed_monthly: f64,
    #[serde(default, deserialize_with = "empty_as_zero")]
    usage_monthly: f64,
    #[serde(default)]
    certifications: String,
    performance_tier: u8,
    availability: f64,
    min_scale: String,
    max_scale: String,
    #[serde(default)]
    dependencies: String,
    #[serde(default)]
    external_dependencies: String,
}

impl CatalogRow {
    fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            name: self.name,
            category: self.category,
            cost: CostRecord {
                fixed_monthly: self.fixed_monthly,
                usage_monthly: self.usage_monthly,
            },
            certifications: split_list(&self.certifications),
            performance: PerformanceRecord {
                tier: self.performance_tier,
                availability: self.availability,
            },
            scale: ScaleRecord {
                min: self.min_scale,
                max: self.max_scale,
            },
            dependencies: split_list(&self.dependencies),
            external_dependencies: split_list(&self.external_dependencies),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(value) => value.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id,name,category,fixed_monthly,usage_monthly,certifications,performance_tier,availability,min_scale,max_scale,dependencies,external_dependencies\n";

    #[test]
    fn splits_list_columns_and_defaults_usage() {
        let csv = format!(
            "{HEADER}vm,Virtual Machines,compute,70,,SOC 2; ISO 27001,3,99.9,small,large,vnet;,entra-id\n"
        );
        let record = parse_records(Cursor::new(csv))
            .expect("parse")
            .pop()
            .expect("record");

        assert_eq!(record.id, "vm");
        assert_eq!(record.cost.usage_monthly, 0.0);
        assert_eq!(record.certifications, vec!["SOC 2", "ISO 27001"]);
        assert_eq!(record.dependencies, vec!["vnet"]);
        assert_eq!(record.external_dependencies, vec!["entra-id"]);
    }

    #[test]
    fn rejects_non_numeric_costs() {
        let csv = format!("{HEADER}vm,VM,compute,cheap,1,,3,99.9,small,large,,\n");
        assert!(parse_records(Cursor::new(csv)).is_err());
    }
}
