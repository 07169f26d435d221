//! Result export for the external reporting layer.
//!
//! CSV for the per-point and curve tables, JSON for the whole result. No
//! reader side: hazard/exposure ingestion belongs to external collaborators.

use std::fmt;
use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::engine::result::ImpactResult;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Csv(err) => write!(f, "csv error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Per-point expected annual impact as CSV: `point_index,eai`.
pub fn write_eai_csv<W: Write>(result: &ImpactResult, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["point_index", "eai"])?;
    for (idx, eai) in result.eai_exp().iter().enumerate() {
        csv_writer.write_record([idx.to_string(), format!("{eai}")])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Exceedance-frequency curve as CSV: `impact,frequency,return_period`.
pub fn write_curve_csv<W: Write>(result: &ImpactResult, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["impact", "frequency", "return_period"])?;
    for point in result.exceedance_curve() {
        let return_period = if point.frequency > 0.0 {
            format!("{}", 1.0 / point.frequency)
        } else {
            String::new()
        };
        csv_writer.write_record([
            format!("{}", point.impact),
            format!("{}", point.frequency),
            return_period,
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ResultEnvelope<'a> {
    generated_at: String,
    result: &'a ImpactResult,
}

/// Whole result as a JSON document with a generation timestamp.
pub fn write_result_json<W: Write>(result: &ImpactResult, writer: W) -> Result<(), ExportError> {
    let envelope = ResultEnvelope {
        generated_at: Utc::now().to_rfc3339(),
        result,
    };
    serde_json::to_writer_pretty(writer, &envelope)?;
    Ok(())
}
