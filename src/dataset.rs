use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::config::FillConfig;
use crate::error::DataError;
use crate::record::{fill_missing_coordinates, present, BikeGeometry, GeometryRecord};

/// Largest accepted coordinate or radius magnitude, in mm (100 m).
pub const MAX_MAGNITUDE_MM: f64 = 100_000.0;

/// Read the bike table from a CSV file.
pub fn load_records(path: &Path) -> Result<Vec<GeometryRecord>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    info!("Loaded {} bikes from {}", records.len(), path.display());
    Ok(records)
}

/// Read the bike table from any CSV source with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<GeometryRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<GeometryRecord>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataError::Malformed {
            row,
            message: e.to_string(),
        })?;
        validate(&record, row)?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(records)
}

fn validate(record: &GeometryRecord, row: usize) -> Result<(), DataError> {
    for (field, value) in record.numeric_fields() {
        let Some(value) = present(value) else {
            continue;
        };
        let negative_radius = field.starts_with("r_to_") && value < 0.0;
        let too_large = !field.starts_with("theta_") && value.abs() > MAX_MAGNITUDE_MM;
        if !value.is_finite() || negative_radius || too_large {
            return Err(DataError::OutOfRange { row, field, value });
        }
    }
    Ok(())
}

/// Complete every row; the first row that cannot be completed aborts.
pub fn complete_records(
    records: &[GeometryRecord],
    config: &FillConfig,
) -> Result<Vec<BikeGeometry>, DataError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            debug!(row = i + 1, bike = %record.bike_name, "completing record");
            fill_missing_coordinates(record, config).map_err(|e| e.at_row(i + 1))
        })
        .collect()
}

/// Write completed rows as CSV using the input column names.
pub fn write_records(path: &Path, geometries: &[BikeGeometry]) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    for geometry in geometries {
        writer.serialize(GeometryRecord::from(geometry))?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} completed bikes to {}", geometries.len(), path.display());
    Ok(())
}
