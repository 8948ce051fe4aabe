//! CSV input and output.
//!
//! Column names follow the exported datasets: `Test_Round`, `Latitude`,
//! `Longitude` on input; the summary and pair-detail tables on output. Extra
//! input columns are ignored (and preserved by [`filter_rows_by_points`]).

use std::collections::HashSet;
use std::io::{Read, Write};

use csv::StringRecord;

use crate::cluster::{BatchReport, RoundId};
use crate::error::{Error, Result};
use crate::geodesic::Point;

const ROUND_COLUMN: &str = "Test_Round";
const LATITUDE_COLUMN: &str = "Latitude";
const LONGITUDE_COLUMN: &str = "Longitude";

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| Error::Parse {
            line: 1,
            message: format!("missing column {name:?}"),
        })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str> {
    record.get(idx).map(str::trim).ok_or_else(|| Error::Parse {
        line: line_of(record),
        message: format!("missing value for {name:?}"),
    })
}

fn parse_f64(record: &StringRecord, idx: usize, name: &str) -> Result<f64> {
    let raw = field(record, idx, name)?;
    raw.parse::<f64>().map_err(|e| Error::Parse {
        line: line_of(record),
        message: format!("{name} {raw:?}: {e}"),
    })
}

fn parse_point(record: &StringRecord, lat_idx: usize, lon_idx: usize) -> Result<Point> {
    Ok(Point::new(
        parse_f64(record, lat_idx, LATITUDE_COLUMN)?,
        parse_f64(record, lon_idx, LONGITUDE_COLUMN)?,
    ))
}

/// Exact-equality key; `-0.0` and `0.0` collapse.
fn point_key(p: &Point) -> (u64, u64) {
    ((p.latitude + 0.0).to_bits(), (p.longitude + 0.0).to_bits())
}

/// Read `(round id, point)` records from a CSV with `Test_Round`, `Latitude`
/// and `Longitude` columns.
///
/// Coordinates are not range-checked here; out-of-range points surface when
/// their round is analyzed.
pub fn read_round_records<R: Read>(reader: R) -> Result<Vec<(RoundId, Point)>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let round_idx = column_index(&headers, ROUND_COLUMN)?;
    let lat_idx = column_index(&headers, LATITUDE_COLUMN)?;
    let lon_idx = column_index(&headers, LONGITUDE_COLUMN)?;

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let raw = field(&record, round_idx, ROUND_COLUMN)?;
        let round_id = raw.parse::<RoundId>().map_err(|e| Error::Parse {
            line: line_of(&record),
            message: format!("{ROUND_COLUMN} {raw:?}: {e}"),
        })?;
        out.push((round_id, parse_point(&record, lat_idx, lon_idx)?));
    }
    Ok(out)
}

/// Read points from a CSV with `Latitude` and `Longitude` columns.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<Point>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let lat_idx = column_index(&headers, LATITUDE_COLUMN)?;
    let lon_idx = column_index(&headers, LONGITUDE_COLUMN)?;

    let mut out = Vec::new();
    for record in rdr.records() {
        out.push(parse_point(&record?, lat_idx, lon_idx)?);
    }
    Ok(out)
}

/// Remove exact duplicate coordinates, keeping the first occurrence.
pub fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert(point_key(p)))
        .copied()
        .collect()
}

/// Write one row per analyzed round.
pub fn write_round_summary<W: Write>(writer: W, report: &BatchReport) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Test_Round",
        "Cluster_Label",
        "Largest_Group_Size",
        "Total_Groups",
        "Close_Pairs_Count",
    ])?;
    for r in &report.results {
        wtr.write_record([
            r.round_id.to_string(),
            r.label().to_string(),
            r.largest_cluster_size.to_string(),
            r.total_groups().to_string(),
            r.near_pair_count.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn location_label(index: usize, p: &Point) -> String {
    format!("Location{}({:.6},{:.6})", index + 1, p.latitude, p.longitude)
}

/// Write one row per point pair of every analyzed round.
pub fn write_pair_details<W: Write>(writer: W, report: &BatchReport) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Test_Round",
        "Location1",
        "Location2",
        "Distance_Meters",
        "Within_Threshold",
    ])?;
    for result in &report.results {
        for pair in &result.pairs {
            let point = |i: usize| {
                result.points.get(i).ok_or_else(|| Error::InvalidParameter {
                    name: "report",
                    message: format!("round {} has no point {i}", result.round_id),
                })
            };
            wtr.write_record([
                result.round_id.to_string(),
                location_label(pair.first, point(pair.first)?),
                location_label(pair.second, point(pair.second)?),
                format!("{:.2}", pair.distance_m),
                pair.within_threshold.to_string(),
            ])?;
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write points as `Latitude,Longitude` rows.
pub fn write_points<W: Write>(writer: W, points: &[Point]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([LATITUDE_COLUMN, LONGITUDE_COLUMN])?;
    for p in points {
        wtr.write_record([p.latitude.to_string(), p.longitude.to_string()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Copy the header and every row located at one of `keep` from `reader` to
/// `writer`. Returns the number of data rows written.
pub fn filter_rows_by_points<R: Read, W: Write>(reader: R, writer: W, keep: &[Point]) -> Result<usize> {
    let keep: HashSet<(u64, u64)> = keep.iter().map(point_key).collect();

    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let lat_idx = column_index(&headers, LATITUDE_COLUMN)?;
    let lon_idx = column_index(&headers, LONGITUDE_COLUMN)?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;

    let mut written = 0;
    for record in rdr.records() {
        let record = record?;
        let p = parse_point(&record, lat_idx, lon_idx)?;
        if keep.contains(&point_key(&p)) {
            wtr.write_record(&record)?;
            written += 1;
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{group_rounds, AnalyzerConfig, Round, RoundAnalyzer};

    #[test]
    fn test_read_round_records() {
        let csv = "Test_Round,Rank,Latitude,Longitude\n\
                   1,1,-37.81,144.96\n\
                   1,2,-37.82,144.97\n\
                   2,1,-37.80,144.95\n";
        let records = read_round_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], (1, Point::new(-37.81, 144.96)));
        assert_eq!(records[2].0, 2);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Round,Latitude,Longitude\n1,0,0\n";
        let err = read_round_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let csv = "Latitude,Longitude\n0,0\nabc,1\n";
        let err = read_points(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(dedup_points(&[a, b, a, Point::new(1.0, 2.0)]), vec![a, b]);
        assert_eq!(dedup_points(&[Point::new(-0.0, 0.0), Point::new(0.0, 0.0)]).len(), 1);
    }

    #[test]
    fn test_summary_and_pairs_output() {
        let records = vec![
            (5, Point::new(0.0, 0.0)),
            (5, Point::new(0.0, 0.001)),
            (5, Point::new(1.0, 1.0)),
        ];
        let rounds = group_rounds(records);
        let report = RoundAnalyzer::new(AnalyzerConfig::default().with_round_size(3))
            .analyze(&rounds)
            .unwrap();

        let mut summary = Vec::new();
        write_round_summary(&mut summary, &report).unwrap();
        let summary = String::from_utf8(summary).unwrap();
        assert_eq!(
            summary,
            "Test_Round,Cluster_Label,Largest_Group_Size,Total_Groups,Close_Pairs_Count\n5,2,2,2,1\n"
        );

        let mut pairs = Vec::new();
        write_pair_details(&mut pairs, &report).unwrap();
        let pairs = String::from_utf8(pairs).unwrap();
        let lines: Vec<&str> = pairs.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with(
            "5,\"Location1(0.000000,0.000000)\",\"Location2(0.000000,0.001000)\",111.32,true"
        ));
    }

    #[test]
    fn test_pair_details_with_duplicate_round_ids() {
        let far: Vec<Point> = (0..5).map(|i| Point::new(i as f64 * 0.1, 0.0)).collect();
        let rounds = vec![
            Round::new(1, far.clone()),
            Round::new(1, far[..3].to_vec()),
        ];
        let report = RoundAnalyzer::default().analyze(&rounds).unwrap();
        assert_eq!(report.skipped_count(), 1);

        let mut out = Vec::new();
        write_pair_details(&mut out, &report).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1 + 10);
        assert!(out.contains("Location5(0.400000,0.000000)"));
    }

    #[test]
    fn test_filter_rows_by_points() {
        let csv = "Id,Latitude,Longitude\n\
                   a,1.5,2.5\n\
                   b,3.0,4.0\n\
                   c,1.5,2.5\n";
        let mut out = Vec::new();
        let n = filter_rows_by_points(csv.as_bytes(), &mut out, &[Point::new(1.5, 2.5)]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Id,Latitude,Longitude\na,1.5,2.5\nc,1.5,2.5\n"
        );
    }
}
