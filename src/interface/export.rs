use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::formulation::FormulationReport;

/// Write the blend and target tables to a CSV file.
///
/// One row per nutrient; target columns are empty for nutrients without a target.
pub fn write_report_csv(report: &FormulationReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "nutrient",
        "unit",
        "per_100",
        "per_animal",
        "per_1000",
        "per_day",
        "goal_min",
        "goal_max",
        "status",
        "gauge_pct",
        "gauge_band",
    ])?;

    for row in &report.blend {
        let target = report.targets.iter().find(|t| t.name == row.name);
        wtr.write_record([
            row.name.clone(),
            row.unit.clone(),
            format!("{:.3}", row.per_100),
            format!("{:.3}", row.per_animal(&report.params)),
            format!("{:.3}", row.per_1000()),
            format!("{:.3}", row.per_day(&report.params)),
            target.map(|t| format!("{:.3}", t.goal_min)).unwrap_or_default(),
            target.map(|t| format!("{:.3}", t.goal_max)).unwrap_or_default(),
            target.map(|t| t.status.to_string()).unwrap_or_default(),
            target
                .and_then(|t| t.gauge)
                .map(|g| g.percentage.to_string())
                .unwrap_or_default(),
            target
                .and_then(|t| t.gauge)
                .map(|g| g.band.to_string())
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the whole report as pretty JSON.
pub fn write_report_json(report: &FormulationReport, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::evaluate;
    use crate::models::{BulkFeed, FeedingParameters, Mix, NutrientProfile, NutritionalTarget};
    use tempfile::NamedTempFile;

    fn sample_report() -> FormulationReport {
        let bulk = BulkFeed {
            name: "Pellets".to_string(),
            weight: 3.0,
            price_per_kg: 40.0,
            nutrients: NutrientProfile {
                energy: 280.0,
                protein: 16.0,
                ..Default::default()
            },
            ratio: None,
            original_weight: None,
        };
        let params = FeedingParameters {
            animal_count: 20,
            ..Default::default()
        };
        let targets = vec![NutritionalTarget {
            name: "Energy (kcal)".to_string(),
            target: 280.0,
        }];
        evaluate(&Mix::new(Vec::new(), Some(bulk)), &params, &targets, &[])
    }

    #[test]
    fn test_csv_has_row_per_nutrient() {
        let report = sample_report();
        let file = NamedTempFile::new().unwrap();
        write_report_csv(&report, file.path()).unwrap();

        let mut rdr = csv::Reader::from_path(file.path()).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), report.blend.len());
        assert_eq!(&rows[0][0], "Energy (kcal)");
        assert_eq!(&rows[0][8], "Met");
        // 420 against the 399..483 midpoint
        assert_eq!(&rows[0][9], "95");
        assert_eq!(&rows[0][10], "ideal");
        assert_eq!(&rows[1][8], "");
        assert_eq!(&rows[1][9], "");
    }

    #[test]
    fn test_json_export_parses() {
        let report = sample_report();
        let file = NamedTempFile::new().unwrap();
        write_report_json(&report, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["supplements"]["state"], "all_satisfied");
        assert_eq!(value["targets"][0]["status"], "Met");
        assert_eq!(value["targets"][0]["gauge"]["band"], "ideal");
    }
}
