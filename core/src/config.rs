//! Dashboard configuration — the static catalog the analytics layer needs:
//! bank display names, regional groupings, and metric category mappings.
//!
//! Ships with the built-in EBA transparency-exercise catalog
//! (`DashboardConfig::default_eba`) and can be overridden from a JSON file
//! for other supervisory datasets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// bank_code -> full display name.
    pub bank_names: BTreeMap<String, String>,
    /// region name -> member bank codes.
    pub regions: BTreeMap<String, Vec<String>>,
    /// category display name -> source sheet prefix it matches.
    pub metric_categories: BTreeMap<String, String>,
}

impl DashboardConfig {
    /// Load a configuration override from a JSON file.
    /// For the stock EBA dataset, use `DashboardConfig::default_eba()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The built-in catalog for the EBA transparency exercise: 26 NSA codes,
    /// six regional groupings, and the sheet-prefix category mapping.
    pub fn default_eba() -> Self {
        let bank_names: BTreeMap<String, String> = [
            ("AT", "Austria"),
            ("BE", "Belgium"),
            ("CY", "Cyprus"),
            ("DE", "Germany"),
            ("DK", "Denmark"),
            ("EE", "Estonia"),
            ("ES", "Spain"),
            ("FI", "Finland"),
            ("FR", "France"),
            ("GR", "Greece"),
            ("HU", "Hungary"),
            ("IE", "Ireland"),
            ("IT", "Italy"),
            ("LI", "Liechtenstein"),
            ("LT", "Lithuania"),
            ("LU", "Luxembourg"),
            ("LV", "Latvia"),
            ("MT", "Malta"),
            ("NL", "Netherlands"),
            ("NO", "Norway"),
            ("OT", "Other"),
            ("PL", "Poland"),
            ("PT", "Portugal"),
            ("RO", "Romania"),
            ("SE", "Sweden"),
            ("SI", "Slovenia"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let regions: BTreeMap<String, Vec<String>> = [
            ("Nordic", vec!["DK", "FI", "NO", "SE"]),
            ("Western Europe", vec!["AT", "BE", "DE", "FR", "LU", "NL"]),
            (
                "Southern Europe",
                vec!["ES", "GR", "IT", "PT", "CY", "MT"],
            ),
            ("Eastern Europe", vec!["HU", "PL", "RO", "SI"]),
            ("Baltic", vec!["EE", "LT", "LV"]),
            ("Other", vec!["LI", "IE", "OT"]),
        ]
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                v.into_iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect();

        let metric_categories: BTreeMap<String, String> = [
            ("Credit Risk - Standard Approach", "Credit Risk_STA"),
            ("Credit Risk - IRB Approach", "Credit Risk_IRB"),
            ("Non-Performing Exposures", "NPE"),
            ("Forborne Exposures", "Forborne exposures"),
            ("Collateral", "Collateral"),
            ("NACE Sectors", "NACE"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            bank_names,
            regions,
            metric_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn override_file_round_trips() {
        let config = DashboardConfig::default_eba();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&config).unwrap().as_bytes())
            .unwrap();
        file.flush().unwrap();

        let loaded = DashboardConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.bank_names, config.bank_names);
        assert_eq!(loaded.regions, config.regions);

        assert!(DashboardConfig::load("/no/such/config.json").is_err());
    }

    #[test]
    fn default_catalog_is_consistent() {
        let config = DashboardConfig::default_eba();
        assert_eq!(config.bank_names.len(), 26);
        // Every bank listed in a region must be a known bank code.
        for (region, codes) in &config.regions {
            for code in codes {
                assert!(
                    config.bank_names.contains_key(code),
                    "region {region} references unknown bank code {code}"
                );
            }
        }
    }
}
