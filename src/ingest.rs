use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::CustomerRecord;

pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "age", "segment", "needs", "pain_points"];

/// Fallback table used when no file is uploaded.
pub fn sample_dataset() -> Vec<CustomerRecord> {
    let ages = [25, 32, 40, 29, 35, 45, 52, 23, 30, 38];
    let segments = ["A", "A", "B", "B", "A", "C", "C", "A", "B", "C"];
    let needs = [
        "fast", "easy", "secure", "fast", "easy", "cheap", "fast", "easy", "secure", "cheap",
    ];
    let pain_points = [
        "confusing UI",
        "slow speed",
        "complex setup",
        "confusing UI",
        "slow speed",
        "poor support",
        "complex setup",
        "confusing UI",
        "slow speed",
        "poor support",
    ];

    (0..ages.len())
        .map(|i| CustomerRecord {
            id: i as i64 + 1,
            age: ages[i],
            segment: segments[i].to_string(),
            stated_need: needs[i].to_string(),
            pain_point: pain_points[i].to_string(),
        })
        .collect()
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<CustomerRecord>> {
    let file = std::fs::File::open(csv_path)
        .map_err(|err| DashboardError::unsupported(csv_path, err))?;
    let records = read_records(file).map_err(|err| DashboardError::unsupported(csv_path, err))?;
    info!(path = %csv_path.display(), rows = records.len(), "loaded customer data");
    Ok(records)
}

fn read_records<R: Read>(source: R) -> std::result::Result<Vec<CustomerRecord>, String> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let headers = reader.headers().map_err(|err| err.to_string())?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required columns: {}", missing.join(", ")));
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<CustomerRecord>() {
        let row = result.map_err(|err| err.to_string())?;
        records.push(row);
    }
    debug!(rows = records.len(), "parsed customer rows");
    Ok(records)
}
