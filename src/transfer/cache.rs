//! Parquet persistence of porkchop grids.
//!
//! A grid is stored as one row per cell, row-major over departure × arrival:
//!
//! | column         | type    | content                          |
//! |----------------|---------|----------------------------------|
//! | `departure_et` | Float64 | departure epoch, TDB seconds past J2000 |
//! | `arrival_et`   | Float64 | arrival epoch, TDB seconds past J2000   |
//! | `dv_departure` | Float64 | departure leg ΔV (km/s), `NaN` if empty |
//! | `dv_arrival`   | Float64 | arrival leg ΔV (km/s), `NaN` if empty   |
//!
//! The body names and the grid shape travel in the schema metadata (`departure_body`,
//! `target_body`, `n_departure`, `n_arrival`), next to the [`CacheKey`] the grid was computed
//! with (`ephemeris`, `frame_origin`, `frame_orientation`, `cost`).

use std::{collections::HashMap, fs::File, sync::Arc};

use arrow_array::{array::Float64Array, ArrayRef, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use camino::Utf8Path;
use hifitime::Epoch;
use nalgebra::DMatrix;
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter};
use tracing::info;

use crate::{bodies::FrameOrigin, porkchop_errors::PorkchopError, ref_system::FrameOrientation};

use super::grid::PorkchopGrid;

/// Cost id of the built-in Lambert cost.
pub const LAMBERT_COST_ID: &str = "lambert";

/// Inputs of a grid evaluation that the grid itself does not record.
///
/// Two grids with the same epochs are interchangeable only if their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Ephemeris source descriptor
    pub ephemeris: String,
    pub frame_origin: FrameOrigin,
    pub frame_orientation: FrameOrientation,
    /// Identifier of the cost function, [`LAMBERT_COST_ID`] for the default one
    pub cost: String,
}

impl CacheKey {
    fn to_metadata(&self) -> [(String, String); 4] {
        [
            ("ephemeris".to_string(), self.ephemeris.clone()),
            ("frame_origin".to_string(), self.frame_origin.to_string()),
            ("frame_orientation".to_string(), self.frame_orientation.to_string()),
            ("cost".to_string(), self.cost.clone()),
        ]
    }

    fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self, PorkchopError> {
        let invalid = |e: PorkchopError| PorkchopError::InvalidCache(e.to_string());
        Ok(CacheKey {
            ephemeris: metadata_value(metadata, "ephemeris")?.to_string(),
            frame_origin: metadata_value(metadata, "frame_origin")?
                .parse()
                .map_err(invalid)?,
            frame_orientation: metadata_value(metadata, "frame_orientation")?
                .parse()
                .map_err(invalid)?,
            cost: metadata_value(metadata, "cost")?.to_string(),
        })
    }
}

/// A grid read back from the cache, with the key it was saved under.
#[derive(Debug, Clone)]
pub struct CachedGrid {
    pub grid: PorkchopGrid,
    pub key: CacheKey,
}

const COLUMNS: [&str; 4] = ["departure_et", "arrival_et", "dv_departure", "dv_arrival"];

fn metadata_value<'m>(
    metadata: &'m HashMap<String, String>,
    key: &str,
) -> Result<&'m str, PorkchopError> {
    metadata
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| PorkchopError::InvalidCache(format!("missing metadata key '{key}'")))
}

fn metadata_count(metadata: &HashMap<String, String>, key: &str) -> Result<usize, PorkchopError> {
    metadata_value(metadata, key)?
        .parse()
        .map_err(|e| PorkchopError::InvalidCache(format!("metadata '{key}': {e}")))
}

/// Write `grid` and its `key` to a Parquet file at `path`, creating the parent directories.
pub fn save_grid(
    grid: &PorkchopGrid,
    key: &CacheKey,
    path: &Utf8Path,
) -> Result<(), PorkchopError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let (rows, cols) = grid.shape();
    let mut departure_et = Vec::with_capacity(rows * cols);
    let mut arrival_et = Vec::with_capacity(rows * cols);
    let mut dv_departure = Vec::with_capacity(rows * cols);
    let mut dv_arrival = Vec::with_capacity(rows * cols);

    for (i, departure) in grid.departure_epochs().iter().enumerate() {
        for (j, arrival) in grid.arrival_epochs().iter().enumerate() {
            departure_et.push(departure.to_et_seconds());
            arrival_et.push(arrival.to_et_seconds());
            dv_departure.push(grid.dv_departure()[(i, j)]);
            dv_arrival.push(grid.dv_arrival()[(i, j)]);
        }
    }

    let mut metadata = HashMap::from([
        ("departure_body".to_string(), grid.departure_body().to_string()),
        ("target_body".to_string(), grid.target_body().to_string()),
        ("n_departure".to_string(), rows.to_string()),
        ("n_arrival".to_string(), cols.to_string()),
    ]);
    metadata.extend(key.to_metadata());
    let schema = Arc::new(Schema::new_with_metadata(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
        metadata,
    ));

    let columns: Vec<ArrayRef> = [departure_et, arrival_et, dv_departure, dv_arrival]
        .into_iter()
        .map(|values| Arc::new(Float64Array::from(values)) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    info!(%path, rows, cols, cost = %key.cost, "porkchop grid cached");
    Ok(())
}

/// Read a grid written by [`save_grid`].
///
/// A missing file is an [`PorkchopError::IoError`]; a file without the expected columns or
/// metadata is an [`PorkchopError::InvalidCache`].
pub fn load_grid(path: &Utf8Path) -> Result<CachedGrid, PorkchopError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let metadata = builder.schema().metadata().clone();

    let departure_body = metadata_value(&metadata, "departure_body")?.to_string();
    let target_body = metadata_value(&metadata, "target_body")?.to_string();
    let rows = metadata_count(&metadata, "n_departure")?;
    let cols = metadata_count(&metadata, "n_arrival")?;
    let key = CacheKey::from_metadata(&metadata)?;

    let mut values: [Vec<f64>; 4] = Default::default();
    for batch in builder.build()? {
        let batch = batch?;
        for (name, column) in COLUMNS.iter().zip(values.iter_mut()) {
            let array = batch
                .column_by_name(name)
                .ok_or_else(|| PorkchopError::InvalidCache(format!("missing column '{name}'")))?
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| {
                    PorkchopError::InvalidCache(format!("column '{name}' is not Float64"))
                })?;
            column.extend_from_slice(array.values());
        }
    }

    let [departure_et, arrival_et, dv_departure, dv_arrival] = values;
    if rows == 0 || cols == 0 || departure_et.len() != rows * cols {
        return Err(PorkchopError::InvalidCache(format!(
            "{} rows for a {rows}×{cols} grid",
            departure_et.len()
        )));
    }

    let departure_epochs = (0..rows)
        .map(|i| Epoch::from_et_seconds(departure_et[i * cols]))
        .collect();
    let arrival_epochs = arrival_et[..cols]
        .iter()
        .map(|et| Epoch::from_et_seconds(*et))
        .collect();

    info!(%path, rows, cols, "porkchop grid loaded from cache");

    let grid = PorkchopGrid::new(
        &departure_body,
        &target_body,
        departure_epochs,
        arrival_epochs,
        DMatrix::from_row_slice(rows, cols, &dv_departure),
        DMatrix::from_row_slice(rows, cols, &dv_arrival),
    )?;
    Ok(CachedGrid { grid, key })
}

#[cfg(test)]
mod cache_test {
    use super::*;
    use crate::time::{days, parse_date};
    use camino::Utf8PathBuf;

    fn analytic_key(cost: &str) -> CacheKey {
        CacheKey {
            ephemeris: "analytic".into(),
            frame_origin: FrameOrigin::Sun,
            frame_orientation: FrameOrientation::EclipJ2000,
            cost: cost.into(),
        }
    }

    fn temp_path(name: &str) -> Utf8PathBuf {
        let dir = std::env::temp_dir().join(format!("porkchop_cache_test_{}", std::process::id()));
        Utf8PathBuf::from_path_buf(dir.join(name)).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let t0 = parse_date("2005-04-30").unwrap();
        let grid = PorkchopGrid::new(
            "Earth",
            "Mars",
            vec![t0, t0 + days(0.8), t0 + days(1.6)],
            vec![t0 + days(200.0), t0 + days(200.8)],
            DMatrix::from_row_slice(3, 2, &[3.1, 3.2, f64::NAN, 3.4, 3.5, 3.6]),
            DMatrix::from_row_slice(3, 2, &[2.1, 2.2, f64::NAN, 2.4, 2.5, 2.6]),
        )
        .unwrap();

        let path = temp_path("nested/grid.parquet");
        let key = CacheKey {
            frame_origin: FrameOrigin::SolarSystemBarycenter,
            ..analytic_key(LAMBERT_COST_ID)
        };
        save_grid(&grid, &key, &path).unwrap();
        let CachedGrid { grid: loaded, key: loaded_key } = load_grid(&path).unwrap();

        assert_eq!(loaded_key, key);
        assert_ne!(loaded_key, analytic_key(LAMBERT_COST_ID));

        assert_eq!(loaded.shape(), (3, 2));
        assert_eq!(loaded.departure_body(), "Earth");
        assert_eq!(loaded.target_body(), "Mars");
        for (a, b) in grid.departure_epochs().iter().zip(loaded.departure_epochs()) {
            assert!((a.to_et_seconds() - b.to_et_seconds()).abs() < 1e-3);
        }
        assert!(loaded.dv_departure()[(1, 0)].is_nan());
        assert_eq!(loaded.dv_departure()[(2, 1)], 3.6);
        assert_eq!(loaded.dv_arrival()[(0, 1)], 2.2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_cache_without_key_is_invalid() {
        let t0 = parse_date("2005-04-30").unwrap();
        let schema = Arc::new(Schema::new_with_metadata(
            COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false))
                .collect::<Vec<_>>(),
            HashMap::from([
                ("departure_body".to_string(), "Earth".to_string()),
                ("target_body".to_string(), "Mars".to_string()),
                ("n_departure".to_string(), "1".to_string()),
                ("n_arrival".to_string(), "1".to_string()),
            ]),
        ));
        let columns: Vec<ArrayRef> = [
            t0.to_et_seconds(),
            (t0 + days(200.0)).to_et_seconds(),
            3.0,
            2.0,
        ]
        .into_iter()
        .map(|value| Arc::new(Float64Array::from(vec![value])) as ArrayRef)
        .collect();
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = temp_path("keyless.parquet");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        assert_eq!(
            load_grid(&path).err(),
            Some(PorkchopError::InvalidCache(
                "missing metadata key 'ephemeris'".into()
            ))
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_cache_file() {
        assert!(matches!(
            load_grid(&temp_path("absent.parquet")),
            Err(PorkchopError::IoError(_))
        ));
    }
}
