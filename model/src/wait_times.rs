use std::collections::BTreeMap;
use std::io::{Read, Write};

use anyhow::Result;
use chrono::NaiveTime;
use serde::Deserialize;

use crate::records::{StopId, StopRecord};

/// Derives each stop's mean headway from a GTFS stops.txt and stop_times.txt:
/// sort the arrivals at a stop, diff consecutive pairs, average the gaps in
/// minutes. Stops with fewer than two usable arrivals produce no record.
pub fn derive<R1: Read, R2: Read>(stops: R1, stop_times: R2) -> Result<Vec<StopRecord>> {
    let positions = load_stop_positions(stops)?;
    let arrivals = load_arrivals(stop_times)?;

    let mut records = Vec::new();
    let mut unpositioned = 0;
    for (stop_id, mut times) in arrivals {
        let Some((lat, lon)) = positions.get(&stop_id).cloned() else {
            unpositioned += 1;
            continue;
        };
        times.sort();
        let gaps: Vec<f64> = times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 60.0)
            .collect();
        if gaps.is_empty() {
            continue;
        }
        let wait = gaps.iter().sum::<f64>() / gaps.len() as f64;
        records.push(StopRecord {
            id: StopId(stop_id),
            lat,
            lon,
            wait,
        });
    }
    if unpositioned > 0 {
        warn!("{unpositioned} stops have arrival times but no entry in stops.txt");
    }
    Ok(records)
}

/// Writes the wait_time_per_stop CSV that from_csv reads back.
pub fn write_wait_times<W: Write>(records: &[StopRecord], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for rec in records {
        out.serialize(rec)?;
    }
    out.flush()?;
    Ok(())
}

fn load_stop_positions<R: Read>(reader: R) -> Result<BTreeMap<String, (f64, f64)>> {
    let mut positions = BTreeMap::new();
    let mut skipped = 0;
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: StopPosition = rec?;
        if rec.stop_lat.is_finite() && rec.stop_lon.is_finite() {
            positions.insert(rec.stop_id, (rec.stop_lat, rec.stop_lon));
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!("Skipped {skipped} stops with unusable coordinates");
    }
    Ok(positions)
}

fn load_arrivals<R: Read>(reader: R) -> Result<BTreeMap<String, Vec<NaiveTime>>> {
    let mut arrivals: BTreeMap<String, Vec<NaiveTime>> = BTreeMap::new();
    let mut unparseable = 0;
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Arrival = rec?;
        match parse_clock(&rec.arrival_time) {
            Some(time) => arrivals.entry(rec.stop_id).or_default().push(time),
            None => {
                unparseable += 1;
            }
        }
    }
    if unparseable > 0 {
        warn!("Skipped {unparseable} arrival times that didn't parse");
    }
    Ok(arrivals)
}

// GTFS clock times run past midnight for overnight service; 24:10:00 means
// 00:10:00 and 25:10:00 means 01:10:00.
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let (hours, rest) = raw.trim().split_once(':')?;
    let hours = hours.parse::<u32>().ok()?;
    let normalized = if hours >= 24 { hours - 24 } else { hours };
    NaiveTime::parse_from_str(&format!("{normalized:02}:{rest}"), "%H:%M:%S").ok()
}

#[derive(Deserialize)]
struct StopPosition {
    stop_id: String,
    stop_lat: f64,
    stop_lon: f64,
}

#[derive(Deserialize)]
struct Arrival {
    stop_id: String,
    arrival_time: String,
}
