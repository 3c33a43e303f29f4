use crate::model::{Driver, DriverId};
use crate::scheduler::ScheduledAssignment;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Import de chauffeurs depuis CSV: header `id,name`
pub fn import_drivers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Driver>> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_drivers(rdr)
}

fn read_drivers<R: std::io::Read>(mut rdr: csv::Reader<R>) -> anyhow::Result<Vec<Driver>> {
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid driver row (empty)");
        }
        out.push(Driver::new(id, name));
    }
    Ok(out)
}

/// Instant RFC3339 (tout décalage, ramené en UTC), ou date/heure naïve lue en UTC.
pub fn parse_instant(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight conversion")?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Planning imprimable d'un chauffeur, tel qu'exporté en JSON.
#[derive(Debug, Serialize)]
pub struct DriverPlanning<'a> {
    pub driver_id: &'a DriverId,
    pub driver_name: &'a str,
    pub assignments: &'a [ScheduledAssignment],
}

fn driver_name<'a>(drivers: &'a [Driver], id: &DriverId) -> &'a str {
    drivers
        .iter()
        .find(|d| &d.id == id)
        .map(|d| d.name.as_str())
        .unwrap_or("")
}

/// Export JSON du planning à une date (jolie mise en forme), chauffeurs triés par id.
pub fn write_planning_json<W: std::io::Write>(
    writer: W,
    drivers: &[Driver],
    report: &BTreeMap<DriverId, Vec<ScheduledAssignment>>,
) -> anyhow::Result<()> {
    let rows: Vec<DriverPlanning<'_>> = report
        .iter()
        .map(|(id, assignments)| DriverPlanning {
            driver_id: id,
            driver_name: driver_name(drivers, id),
            assignments,
        })
        .collect();
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

pub fn export_planning_json<P: AsRef<Path>>(
    path: P,
    drivers: &[Driver],
    report: &BTreeMap<DriverId, Vec<ScheduledAssignment>>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_planning_json(file, drivers, report)
}

pub const PLANNING_CSV_HEADER: [&str; 8] = [
    "driver_id",
    "driver_name",
    "assignment_id",
    "status",
    "location",
    "start",
    "end",
    "duration_days",
];

/// Écrit le planning imprimable, une ligne par affectation, chauffeurs triés par id.
pub fn write_planning_csv<W: std::io::Write>(
    writer: W,
    drivers: &[Driver],
    report: &BTreeMap<DriverId, Vec<ScheduledAssignment>>,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(PLANNING_CSV_HEADER)?;
    for (driver_id, rows) in report {
        let name = driver_name(drivers, driver_id);
        for row in rows {
            let a = &row.assignment;
            let start = a.start.to_rfc3339();
            let end = a.end.to_rfc3339();
            let days = row.duration_days.to_string();
            w.write_record([
                driver_id.as_str(),
                name,
                a.id.as_str(),
                a.status.as_str(),
                a.location.as_str(),
                start.as_str(),
                end.as_str(),
                days.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn export_planning_csv<P: AsRef<Path>>(
    path: P,
    drivers: &[Driver],
    report: &BTreeMap<DriverId, Vec<ScheduledAssignment>>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_planning_csv(file, drivers, report)
}
