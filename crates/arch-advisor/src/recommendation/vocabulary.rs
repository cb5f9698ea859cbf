//! Fixed lookup tables shared by catalog loading and requirement normalization.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::domain::Category;

/// Known compliance certifications as `(canonical key, display name)`.
const CERTIFICATIONS: &[(&str, &str)] = &[
    ("SOC1", "SOC 1"),
    ("SOC2", "SOC 2"),
    ("ISO27001", "ISO 27001"),
    ("ISO27018", "ISO 27018"),
    ("HIPAA", "HIPAA"),
    ("HITECH", "HITECH"),
    ("PCIDSS", "PCI DSS"),
    ("SOX", "SOX"),
    ("GDPR", "GDPR"),
    ("CCPA", "CCPA"),
    ("FEDRAMP", "FedRAMP"),
    ("FISMA", "FISMA"),
    ("NIST", "NIST"),
    ("CJIS", "CJIS"),
    ("ITAR", "ITAR"),
];

/// Accepted spellings for each category, keyed by lowercase alphanumerics.
const CATEGORY_ALIASES: &[(&str, Category)] = &[
    ("networking", Category::Networking),
    ("network", Category::Networking),
    ("compute", Category::Compute),
    ("containers", Category::Containers),
    ("container", Category::Containers),
    ("database", Category::Database),
    ("databases", Category::Database),
    ("storage", Category::Storage),
    ("analytics", Category::Analytics),
    ("analyticsbi", Category::Analytics),
    ("aiml", Category::AiMl),
    ("aimachinelearning", Category::AiMl),
    ("integration", Category::Integration),
    ("integrationmessaging", Category::Integration),
    ("security", Category::Security),
    ("securityidentity", Category::Security),
    ("monitoring", Category::Monitoring),
    ("monitoringmanagement", Category::Monitoring),
    ("devops", Category::DevOps),
    ("devopsdevelopertools", Category::DevOps),
];

fn certification_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub(crate) fn label_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lowercase alphanumeric words of `raw`, space separated and space padded,
/// so a phrase only matches on whole words.
pub(crate) fn word_key(raw: &str) -> String {
    let words: Vec<String> = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

fn certification_table() -> &'static BTreeMap<&'static str, &'static str> {
    static TABLE: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| CERTIFICATIONS.iter().copied().collect())
}

fn category_table() -> &'static BTreeMap<&'static str, Category> {
    static TABLE: OnceLock<BTreeMap<&'static str, Category>> = OnceLock::new();
    TABLE.get_or_init(|| CATEGORY_ALIASES.iter().copied().collect())
}

/// Resolve a raw certification string to its `(key, display name)` entry.
pub(crate) fn lookup_certification(raw: &str) -> Option<(&'static str, &'static str)> {
    let key = certification_key(raw);
    certification_table()
        .get_key_value(key.as_str())
        .map(|(key, name)| (*key, *name))
}

pub(crate) fn lookup_category(raw: &str) -> Option<Category> {
    category_table().get(label_key(raw).as_str()).copied()
}

/// Display names of every certification the catalog may reference.
pub fn known_certifications() -> impl Iterator<Item = &'static str> {
    CERTIFICATIONS.iter().map(|(_, name)| *name)
}
