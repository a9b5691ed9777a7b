use std::io::Read;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StopId(pub String);

/// One stop with its average wait time. All three numeric fields are finite;
/// rows that fail that are dropped during load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StopRecord {
    #[serde(rename = "stop_id")]
    pub id: StopId,
    #[serde(rename = "stop_lat")]
    pub lat: f64,
    #[serde(rename = "stop_lon")]
    pub lon: f64,
    #[serde(rename = "wait_time")]
    pub wait: f64,
}

/// Parses a wait-time CSV. Rows with non-finite coordinates or wait times are
/// skipped silently; a missing stop_id is synthesized from the coordinates.
pub fn load<R: Read>(reader: R) -> Result<Vec<StopRecord>> {
    let mut records = Vec::new();
    let mut skipped = 0;
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        let (lat, lon, wait) = match (
            parse_finite(&rec.stop_lat),
            parse_finite(&rec.stop_lon),
            parse_finite(&rec.wait_time),
        ) {
            (Some(lat), Some(lon), Some(wait)) => (lat, lon, wait),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let id = match rec.stop_id {
            Some(id) if !id.trim().is_empty() => id,
            // No stop_id column; the coordinate pair still identifies the stop
            _ => format!("{},{}", rec.stop_lat.trim(), rec.stop_lon.trim()),
        };
        records.push(StopRecord {
            id: StopId(id),
            lat,
            lon,
            wait,
        });
    }
    if skipped > 0 {
        warn!("Skipped {skipped} rows with unusable coordinates or wait times");
    }
    Ok(records)
}

fn parse_finite(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

#[derive(Deserialize)]
struct Record {
    #[serde(default)]
    stop_id: Option<String>,
    stop_lat: String,
    stop_lon: String,
    wait_time: String,
}
