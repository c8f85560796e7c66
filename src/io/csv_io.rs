use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::analysis::GridSweep;
use crate::error::RichnessError;
use crate::models::{AbundanceTable, AggregatedAbundance, Community, PlotWindow, Point, Window};

/// CSV row structure for community points.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct PointRow {
    x: f64,
    y: f64,
    species: String,
}

/// CSV row structure for a grid sweep.
#[derive(Debug, serde::Serialize)]
struct SweepRow {
    level: u32,
    grid_size: f64,
    n: usize,
    s_obs: usize,
    f1: usize,
    f2: usize,
    f1_used: f64,
    richness: f64,
    excluded_plots: usize,
}

fn parse_point_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<Point>, RichnessError> {
    let mut points = Vec::new();
    for result in rdr.deserialize() {
        let row: PointRow = result?;
        let species = row.species.trim();
        if species.is_empty() {
            return Err(RichnessError::ParseError(format!(
                "Point {} ({}, {}) has an empty species label",
                points.len(),
                row.x,
                row.y
            )));
        }
        points.push(Point::new(row.x, row.y, species));
    }
    Ok(points)
}

fn into_community(
    points: Vec<Point>,
    window: Option<Window>,
    unit: &str,
) -> Result<Community, RichnessError> {
    let window = match window {
        Some(w) => w,
        None => Window::bounding(&points, unit)?,
    };
    Community::new(window, points)
}

/// Read a community from a CSV file with `x,y,species` columns.
///
/// Without an explicit window the points' bounding box is used.
pub fn read_community_csv(
    path: impl AsRef<Path>,
    window: Option<Window>,
    unit: &str,
) -> Result<Community, RichnessError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let points = parse_point_records(&mut rdr)?;
    into_community(points, window, unit)
}

/// Read a community from CSV bytes.
pub fn read_community_csv_from_bytes(
    data: &[u8],
    window: Option<Window>,
    unit: &str,
) -> Result<Community, RichnessError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    let points = parse_point_records(&mut rdr)?;
    into_community(points, window, unit)
}

/// Write community points as `x,y,species` rows.
pub fn write_community_csv(
    community: &Community,
    path: impl AsRef<Path>,
) -> Result<(), RichnessError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for p in &community.points {
        wtr.serialize(PointRow {
            x: p.x,
            y: p.y,
            species: p.species.clone(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the plot-by-species table with each plot's lower-left corner.
///
/// Columns: `plot_id,x,y,<species...>`.
pub fn write_abundance_csv(
    table: &AbundanceTable,
    plots: &[PlotWindow],
    path: impl AsRef<Path>,
) -> Result<(), RichnessError> {
    let by_id: HashMap<u32, &PlotWindow> = plots.iter().map(|p| (p.plot_id, p)).collect();
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    let mut header = vec!["plot_id".to_string(), "x".to_string(), "y".to_string()];
    header.extend(table.species.iter().cloned());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let (x, y) = by_id
            .get(&row.plot_id)
            .map(|p| (p.xmin.to_string(), p.ymin.to_string()))
            .unwrap_or_default();
        let mut record = vec![row.plot_id.to_string(), x, y];
        record.extend(row.counts.iter().map(u64::to_string));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write per-cell abundances.
///
/// Columns: `x_grid,y_grid,plots,<species...>`.
pub fn write_aggregated_csv(
    aggregated: &AggregatedAbundance,
    path: impl AsRef<Path>,
) -> Result<(), RichnessError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    let mut header = vec![
        "x_grid".to_string(),
        "y_grid".to_string(),
        "plots".to_string(),
    ];
    header.extend(aggregated.species.iter().cloned());
    wtr.write_record(&header)?;

    for cell in &aggregated.cells {
        let mut record = vec![
            cell.cell.x.to_string(),
            cell.cell.y.to_string(),
            cell.plot_ids.len().to_string(),
        ];
        record.extend(cell.counts.iter().map(u64::to_string));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write one row per sweep level.
pub fn write_sweep_csv(sweep: &GridSweep, path: impl AsRef<Path>) -> Result<(), RichnessError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for point in &sweep.points {
        let est = &point.estimate;
        wtr.serialize(SweepRow {
            level: point.level,
            grid_size: point.grid_size,
            n: est.n,
            s_obs: est.s_obs,
            f1: est.f1_observed,
            f2: est.f2,
            f1_used: est.f1_used,
            richness: est.richness,
            excluded_plots: point.excluded_plots,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
