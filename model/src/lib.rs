#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod records;
mod stats;
mod wait_times;

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use anyhow::Result;
use zip::ZipArchive;

pub use self::records::{StopId, StopRecord};
pub use self::stats::{DistributionSummary, Standing};
pub use self::wait_times::write_wait_times;

/// The validated dataset: one record per stop, plus distribution constants.
/// Write-once; everything downstream treats this as read-only.
#[derive(Debug)]
pub struct Model {
    pub records: BTreeMap<StopId, StopRecord>,
    pub summary: DistributionSummary,
    // Ascending, one entry per record
    waits: Vec<f64>,
}

impl Model {
    /// Load from a precomputed wait-time CSV (stop_id, stop_lat, stop_lon, wait_time).
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        Self::assemble(records::load(reader)?)
    }

    /// Load from the two raw GTFS files, deriving each stop's mean headway.
    pub fn from_gtfs<R1: Read, R2: Read>(stops: R1, stop_times: R2) -> Result<Self> {
        Self::assemble(wait_times::derive(stops, stop_times)?)
    }

    /// Load from a GTFS feed archive containing stops.txt and stop_times.txt.
    pub fn from_gtfs_zip<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let stops = read_zip_file(&mut archive, "stops.txt")?;
        let stop_times = read_zip_file(&mut archive, "stop_times.txt")?;
        Self::from_gtfs(&stops[..], &stop_times[..])
    }

    fn assemble(input: Vec<StopRecord>) -> Result<Self> {
        let mut records = BTreeMap::new();
        let mut duplicates = 0;
        for rec in input {
            if records.insert(rec.id.clone(), rec).is_some() {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            warn!("{duplicates} stops appeared twice; keeping the last row for each");
        }
        if records.is_empty() {
            bail!("no stops with valid wait times in the input");
        }

        let mut waits: Vec<f64> = records.values().map(|rec| rec.wait).collect();
        waits.sort_by(f64::total_cmp);
        let summary = DistributionSummary::new(&waits)?;
        info!(
            "Loaded {} stops, wait times {:.1} to {:.1} minutes",
            records.len(),
            summary.min,
            summary.max
        );

        Ok(Self {
            records,
            summary,
            waits,
        })
    }

    /// Where one wait value falls within the whole dataset.
    pub fn standing(&self, wait: f64) -> Standing {
        stats::standing(&self.waits, wait)
    }

    /// All wait times, ascending.
    pub fn waits(&self) -> &[f64] {
        &self.waits
    }
}

// Adds the path in the error message
fn read_zip_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(path).map_err(|err| anyhow!("{path}: {err}"))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}
