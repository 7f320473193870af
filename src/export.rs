//! Export functionality for tracks and route plans
//!
//! Writes recorded tracks to CSV and GPX, and the leg table of a route plan
//! to CSV. Output files are named after a base path and placed next to it
//! unless [`ExportOptions::output_dir`] says otherwise.

use crate::conversion::format_rfc3339;
use crate::error::{ChartError, Result};
#[cfg(feature = "csv")]
use crate::planner::{LegRow, RouteSummary};
use crate::track::Track;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export options for controlling output location
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub output_dir: Option<String>,
}

/// Compute `<output_dir>/<stem><suffix>` for `base_path`
///
/// The directory defaults to the base path's parent (or the current
/// directory for bare file names).
pub fn compute_export_path(base_path: &Path, suffix: &str, options: &ExportOptions) -> PathBuf {
    let stem = base_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("export");

    let output_dir = match options.output_dir.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => base_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    output_dir.join(format!("{}{}", stem, suffix))
}

fn create_output_file(path: &Path) -> Result<BufWriter<fs::File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(fs::File::create(path)?))
}

/// Write the track as `latitude,longitude` rows under a header
#[cfg(feature = "csv")]
pub fn write_track_csv<W: Write>(track: &Track, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["latitude", "longitude"])?;
    for point in track.points() {
        csv_writer.write_record(&[
            point.position.latitude.to_string(),
            point.position.longitude.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export the track to `<stem>.track.csv`
#[cfg(feature = "csv")]
pub fn export_track_csv(track: &Track, base_path: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let csv_path = compute_export_path(base_path, ".track.csv", options);
    write_track_csv(track, create_output_file(&csv_path)?)?;
    info!(
        "Exported {} track points to: {}",
        track.len(),
        csv_path.display()
    );
    Ok(csv_path)
}

/// Write the leg table plus a totals row
#[cfg(feature = "csv")]
pub fn write_legs_csv<W: Write>(rows: &[LegRow], summary: &RouteSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["leg", "distance_nm", "speed_kts", "eta"])?;
    for row in rows {
        csv_writer.write_record(&[
            row.number.to_string(),
            format!("{:.2}", row.distance_nm),
            row.speed_kts.to_string(),
            row.eta_formatted.clone(),
        ])?;
    }
    csv_writer.write_record(&[
        "total".to_string(),
        format!("{:.2}", summary.total_distance_nm),
        String::new(),
        summary.total_time_formatted.clone(),
    ])?;
    csv_writer.flush()?;
    Ok(())
}

/// Export a route plan's leg table to `<stem>.legs.csv`
#[cfg(feature = "csv")]
pub fn export_plan_csv(
    rows: &[LegRow],
    summary: &RouteSummary,
    input_path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let csv_path = compute_export_path(input_path, ".legs.csv", options);
    write_legs_csv(rows, summary, create_output_file(&csv_path)?)?;
    info!("Exported {} legs to: {}", rows.len(), csv_path.display());
    Ok(csv_path)
}

/// Write the track as a GPX 1.1 document
pub fn write_track_gpx<W: Write>(track: &Track, name: &str, mut writer: W) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<gpx creator="EZChart" version="1.1" xmlns="http://www.topografix.com/GPX/1/1">"#
    )?;
    writeln!(writer, "<trk><name>{}</name><trkseg>", escape_xml(name))?;
    for point in track.points() {
        let time = format_rfc3339(point.timestamp).ok_or_else(|| {
            ChartError::Export(format!("timestamp {} out of range", point.timestamp))
        })?;
        writeln!(
            writer,
            r#"  <trkpt lat="{:.7}" lon="{:.7}"><time>{}</time></trkpt>"#,
            point.position.latitude,
            point.position.longitude,
            time
        )?;
    }
    writeln!(writer, "</trkseg></trk>")?;
    writeln!(writer, "</gpx>")?;
    writer.flush()?;
    Ok(())
}

/// Export the track to `<stem>.track.gpx`
pub fn export_track_gpx(track: &Track, base_path: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let gpx_path = compute_export_path(base_path, ".track.gpx", options);
    let name = base_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("Track");
    write_track_gpx(track, name, create_output_file(&gpx_path)?)?;
    info!("Exported GPX track to: {}", gpx_path.display());
    Ok(gpx_path)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackPoint;
    use crate::types::Position;

    fn sample_track() -> Track {
        let mut track = Track::new();
        track.record(
            TrackPoint {
                position: Position::new(29.5, -95.0),
                timestamp: 0,
            },
            true,
        );
        track.record(
            TrackPoint {
                position: Position::new(29.55, -94.9),
                timestamp: 1_700_000_000,
            },
            true,
        );
        track
    }

    #[test]
    fn test_compute_export_path() {
        let opts = ExportOptions::default();
        assert_eq!(
            compute_export_path(Path::new("/data/trip.json"), ".legs.csv", &opts),
            PathBuf::from("/data/trip.legs.csv")
        );
        assert_eq!(
            compute_export_path(Path::new("trip"), ".track.csv", &opts),
            PathBuf::from("trip.track.csv")
        );

        let opts = ExportOptions {
            output_dir: Some("/tmp/out".to_string()),
        };
        assert_eq!(
            compute_export_path(Path::new("/data/trip.json"), ".track.gpx", &opts),
            PathBuf::from("/tmp/out/trip.track.gpx")
        );
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_track_csv_rows() {
        let mut buffer = Vec::new();
        write_track_csv(&sample_track(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "latitude,longitude\n29.5,-95\n29.55,-94.9\n");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_empty_track_csv_has_header_only() {
        let mut buffer = Vec::new();
        write_track_csv(&Track::new(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "latitude,longitude\n");
    }

    #[test]
    fn test_gpx_document() {
        let mut buffer = Vec::new();
        write_track_gpx(&sample_track(), "Bay <run>", &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("<name>Bay &lt;run&gt;</name>"));
        assert!(text.contains(r#"<trkpt lat="29.5000000" lon="-95.0000000"><time>1970-01-01T00:00:00Z</time>"#));
        assert!(text.contains("<time>2023-11-14T22:13:20Z</time>"));
        assert!(text.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn test_gpx_rejects_unrepresentable_timestamp() {
        let mut track = Track::new();
        track.record(
            TrackPoint {
                position: Position::new(29.5, -95.0),
                timestamp: u64::MAX,
            },
            true,
        );
        let mut buffer = Vec::new();
        assert!(matches!(
            write_track_gpx(&track, "Bad", &mut buffer),
            Err(ChartError::Export(_))
        ));
    }
}
