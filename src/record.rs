use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConsistencyPolicy, FillConfig};
use crate::error::DataError;
use crate::geometry::{angle_difference, shift_coordinates, to_cartesian, to_polar};

/// One row of the bike table, as read from disk.
///
/// Any numeric field may be absent. `NaN` counts as absent too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    #[serde(rename = "Bike Name", default)]
    pub bike_name: String,

    #[serde(default)]
    pub handlebar_x: Option<f64>,
    #[serde(default)]
    pub handlebar_y: Option<f64>,
    #[serde(default)]
    pub saddle_x: Option<f64>,
    #[serde(default)]
    pub saddle_y: Option<f64>,

    #[serde(default)]
    pub r_to_handlebar: Option<f64>,
    #[serde(default)]
    pub theta_to_handlebar: Option<f64>,
    #[serde(default)]
    pub r_to_bottom_bracket: Option<f64>,
    #[serde(default)]
    pub theta_to_bottom_bracket: Option<f64>,

    #[serde(default)]
    pub s_handlebar_x: Option<f64>,
    #[serde(default)]
    pub s_handlebar_y: Option<f64>,
    #[serde(default)]
    pub s_bottom_bracket_x: Option<f64>,
    #[serde(default)]
    pub s_bottom_bracket_y: Option<f64>,
}

impl GeometryRecord {
    /// Numeric fields by column name, in table order.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 12] {
        [
            ("handlebar_x", self.handlebar_x),
            ("handlebar_y", self.handlebar_y),
            ("saddle_x", self.saddle_x),
            ("saddle_y", self.saddle_y),
            ("r_to_handlebar", self.r_to_handlebar),
            ("theta_to_handlebar", self.theta_to_handlebar),
            ("r_to_bottom_bracket", self.r_to_bottom_bracket),
            ("theta_to_bottom_bracket", self.theta_to_bottom_bracket),
            ("s_handlebar_x", self.s_handlebar_x),
            ("s_handlebar_y", self.s_handlebar_y),
            ("s_bottom_bracket_x", self.s_bottom_bracket_x),
            ("s_bottom_bracket_y", self.s_bottom_bracket_y),
        ]
    }

    fn require(&self, value: Option<f64>, field: &'static str) -> Result<f64, DataError> {
        present(value).ok_or_else(|| DataError::IncompleteGeometry {
            bike: self.bike_name.clone(),
            field,
        })
    }

    fn require_cartesian(&self) -> Result<(f64, f64, f64, f64), DataError> {
        Ok((
            self.require(self.handlebar_x, "handlebar_x")?,
            self.require(self.handlebar_y, "handlebar_y")?,
            self.require(self.saddle_x, "saddle_x")?,
            self.require(self.saddle_y, "saddle_y")?,
        ))
    }

    fn require_polar(&self) -> Result<(f64, f64, f64, f64), DataError> {
        Ok((
            self.require(self.r_to_handlebar, "r_to_handlebar")?,
            self.require(self.theta_to_handlebar, "theta_to_handlebar")?,
            self.require(self.r_to_bottom_bracket, "r_to_bottom_bracket")?,
            self.require(self.theta_to_bottom_bracket, "theta_to_bottom_bracket")?,
        ))
    }
}

/// `None` for absent or NaN values.
#[inline]
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// A fully populated record. Only [`fill_missing_coordinates`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeGeometry {
    pub bike_name: String,

    pub handlebar_x: f64,
    pub handlebar_y: f64,
    pub saddle_x: f64,
    pub saddle_y: f64,

    pub r_to_handlebar: f64,
    pub theta_to_handlebar: f64,
    pub r_to_bottom_bracket: f64,
    pub theta_to_bottom_bracket: f64,

    pub s_handlebar_x: f64,
    pub s_handlebar_y: f64,
    pub s_bottom_bracket_x: f64,
    pub s_bottom_bracket_y: f64,
}

impl From<&BikeGeometry> for GeometryRecord {
    fn from(g: &BikeGeometry) -> Self {
        Self {
            bike_name: g.bike_name.clone(),
            handlebar_x: Some(g.handlebar_x),
            handlebar_y: Some(g.handlebar_y),
            saddle_x: Some(g.saddle_x),
            saddle_y: Some(g.saddle_y),
            r_to_handlebar: Some(g.r_to_handlebar),
            theta_to_handlebar: Some(g.theta_to_handlebar),
            r_to_bottom_bracket: Some(g.r_to_bottom_bracket),
            theta_to_bottom_bracket: Some(g.theta_to_bottom_bracket),
            s_handlebar_x: Some(g.s_handlebar_x),
            s_handlebar_y: Some(g.s_handlebar_y),
            s_bottom_bracket_x: Some(g.s_bottom_bracket_x),
            s_bottom_bracket_y: Some(g.s_bottom_bracket_y),
        }
    }
}

/// Complete a record from whichever coordinate group it carries.
///
/// Cartesian fields are derived from polar when `handlebar_x` or `saddle_x`
/// is missing, then polar from Cartesian when `r_to_handlebar` or
/// `theta_to_handlebar` is missing. The saddle-centred pairs are always
/// recomputed from the Cartesian group.
///
/// When both groups were supplied the Cartesian group wins and the polar group
/// is kept as given; `config.consistency` decides what happens if they disagree.
pub fn fill_missing_coordinates(
    record: &GeometryRecord,
    config: &FillConfig,
) -> Result<BikeGeometry, DataError> {
    let cartesian_missing = present(record.handlebar_x).is_none() || present(record.saddle_x).is_none();
    let polar_missing =
        present(record.r_to_handlebar).is_none() || present(record.theta_to_handlebar).is_none();

    let (handlebar_x, handlebar_y, saddle_x, saddle_y) = if cartesian_missing {
        let (r_h, t_h, r_bb, t_bb) = record.require_polar()?;
        debug!(bike = %record.bike_name, "deriving cartesian fields from polar");
        to_cartesian(r_h, t_h, r_bb, t_bb)
    } else {
        record.require_cartesian()?
    };

    let (r_to_handlebar, theta_to_handlebar, r_to_bottom_bracket, theta_to_bottom_bracket) =
        if polar_missing {
            debug!(bike = %record.bike_name, "deriving polar fields from cartesian");
            to_polar(handlebar_x, handlebar_y, saddle_x, saddle_y)
        } else {
            record.require_polar()?
        };

    if !cartesian_missing && !polar_missing {
        check_consistency(
            &record.bike_name,
            (handlebar_x, handlebar_y, saddle_x, saddle_y),
            (r_to_handlebar, theta_to_handlebar, r_to_bottom_bracket, theta_to_bottom_bracket),
            config,
        )?;
    }

    let (s_handlebar_x, s_handlebar_y) =
        shift_coordinates(handlebar_x, handlebar_y, saddle_x, saddle_y);
    let (s_bottom_bracket_x, s_bottom_bracket_y) = shift_coordinates(0.0, 0.0, saddle_x, saddle_y);

    let geometry = BikeGeometry {
        bike_name: record.bike_name.clone(),
        handlebar_x,
        handlebar_y,
        saddle_x,
        saddle_y,
        r_to_handlebar,
        theta_to_handlebar,
        r_to_bottom_bracket,
        theta_to_bottom_bracket,
        s_handlebar_x,
        s_handlebar_y,
        s_bottom_bracket_x,
        s_bottom_bracket_y,
    };
    ensure_finite(&geometry)?;
    Ok(geometry)
}

fn ensure_finite(geometry: &BikeGeometry) -> Result<(), DataError> {
    let record = GeometryRecord::from(geometry);
    match record
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| !value.is_some_and(f64::is_finite))
    {
        Some((field, _)) => Err(DataError::NonFinite {
            bike: geometry.bike_name.clone(),
            field,
        }),
        None => Ok(()),
    }
}

/// Largest distance in mm between the given Cartesian points and the ones
/// implied by the polar group.
pub fn cartesian_deviation(cartesian: (f64, f64, f64, f64), polar: (f64, f64, f64, f64)) -> f64 {
    let (hx, hy, sx, sy) = cartesian;
    let (px, py, qx, qy) = to_cartesian(polar.0, polar.1, polar.2, polar.3);
    (hx - px).hypot(hy - py).max((sx - qx).hypot(sy - qy))
}

fn check_consistency(
    bike: &str,
    cartesian: (f64, f64, f64, f64),
    polar: (f64, f64, f64, f64),
    config: &FillConfig,
) -> Result<(), DataError> {
    if config.consistency == ConsistencyPolicy::Ignore {
        return Ok(());
    }

    let deviation_mm = cartesian_deviation(cartesian, polar);
    if deviation_mm <= config.tolerance_mm {
        return Ok(());
    }

    match config.consistency {
        ConsistencyPolicy::Error => Err(DataError::InconsistentGeometry {
            bike: bike.to_string(),
            deviation_mm,
            tolerance_mm: config.tolerance_mm,
        }),
        _ => {
            let (_, theta_from_cartesian, _, _) = to_polar(cartesian.0, cartesian.1, cartesian.2, cartesian.3);
            warn!(
                "Bike '{}': cartesian and polar fields disagree by {:.3} mm ({:.2}° at the handlebar), keeping cartesian",
                bike,
                deviation_mm,
                angle_difference(theta_from_cartesian, polar.1)
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn polar_only() -> GeometryRecord {
        GeometryRecord {
            bike_name: "Road".into(),
            r_to_handlebar: Some(450.0),
            theta_to_handlebar: Some(25.0),
            r_to_bottom_bracket: Some(600.0),
            theta_to_bottom_bracket: Some(195.0),
            ..Default::default()
        }
    }

    fn cartesian_only() -> GeometryRecord {
        GeometryRecord {
            bike_name: "Gravel".into(),
            handlebar_x: Some(480.0),
            handlebar_y: Some(560.0),
            saddle_x: Some(-190.0),
            saddle_y: Some(710.0),
            ..Default::default()
        }
    }

    fn config(consistency: ConsistencyPolicy) -> FillConfig {
        FillConfig {
            consistency,
            tolerance_mm: 1.0,
        }
    }

    #[test]
    fn polar_only_record_gets_cartesian_fields() {
        let g = fill_missing_coordinates(&polar_only(), &FillConfig::default()).unwrap();
        let (hx, hy, sx, sy) = to_cartesian(450.0, 25.0, 600.0, 195.0);
        assert_eq!((g.handlebar_x, g.handlebar_y, g.saddle_x, g.saddle_y), (hx, hy, sx, sy));
        assert_eq!(g.r_to_handlebar, 450.0);
        assert_eq!(g.theta_to_bottom_bracket, 195.0);
    }

    #[test]
    fn saddle_frame_fields_shift_by_saddle_offset() {
        let g = fill_missing_coordinates(&polar_only(), &FillConfig::default()).unwrap();
        assert_eq!(
            (g.s_handlebar_x, g.s_handlebar_y),
            shift_coordinates(g.handlebar_x, g.handlebar_y, g.saddle_x, g.saddle_y)
        );
        assert_eq!(
            (g.s_bottom_bracket_x, g.s_bottom_bracket_y),
            shift_coordinates(0.0, 0.0, g.saddle_x, g.saddle_y)
        );
    }

    #[test]
    fn cartesian_only_record_keeps_cartesian_and_derives_polar() {
        let g = fill_missing_coordinates(&cartesian_only(), &FillConfig::default()).unwrap();
        assert_eq!(
            (g.handlebar_x, g.handlebar_y, g.saddle_x, g.saddle_y),
            (480.0, 560.0, -190.0, 710.0)
        );
        let (r1, t1, r2, t2) = to_polar(480.0, 560.0, -190.0, 710.0);
        assert!((g.r_to_handlebar - r1).abs() < EPS);
        assert!(angle_difference(g.theta_to_handlebar, t1) < EPS);
        assert!((g.r_to_bottom_bracket - r2).abs() < EPS);
        assert!(angle_difference(g.theta_to_bottom_bracket, t2) < EPS);
    }

    #[test]
    fn derived_polar_matches_original_measurement() {
        let filled = fill_missing_coordinates(&polar_only(), &FillConfig::default()).unwrap();
        let cartesian = GeometryRecord {
            bike_name: "Road".into(),
            handlebar_x: Some(filled.handlebar_x),
            handlebar_y: Some(filled.handlebar_y),
            saddle_x: Some(filled.saddle_x),
            saddle_y: Some(filled.saddle_y),
            ..Default::default()
        };
        let g = fill_missing_coordinates(&cartesian, &FillConfig::default()).unwrap();
        assert!((g.r_to_handlebar - 450.0).abs() < EPS);
        assert!(angle_difference(g.theta_to_handlebar, 25.0) < EPS);
        assert!((g.r_to_bottom_bracket - 600.0).abs() < EPS);
        assert!(angle_difference(g.theta_to_bottom_bracket, 195.0) < EPS);
    }

    #[test]
    fn nan_counts_as_missing() {
        let mut record = polar_only();
        record.handlebar_x = Some(f64::NAN);
        record.saddle_x = Some(3.0);
        let g = fill_missing_coordinates(&record, &FillConfig::default()).unwrap();
        assert!(g.handlebar_x.is_finite());
    }

    #[test]
    fn both_groups_missing_is_an_error() {
        let record = GeometryRecord {
            bike_name: "Empty".into(),
            ..Default::default()
        };
        let err = fill_missing_coordinates(&record, &FillConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            DataError::IncompleteGeometry { ref bike, field: "r_to_handlebar" } if bike == "Empty"
        ));
    }

    #[test]
    fn partial_cartesian_group_is_an_error() {
        let mut record = cartesian_only();
        record.handlebar_y = None;
        let err = fill_missing_coordinates(&record, &FillConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::IncompleteGeometry { field: "handlebar_y", .. }));
    }

    #[test]
    fn consistent_dual_record_passes_strict_policy() {
        let mut record = cartesian_only();
        let (r1, t1, r2, t2) = to_polar(480.0, 560.0, -190.0, 710.0);
        record.r_to_handlebar = Some(r1);
        record.theta_to_handlebar = Some(t1);
        record.r_to_bottom_bracket = Some(r2);
        record.theta_to_bottom_bracket = Some(t2);
        assert!(fill_missing_coordinates(&record, &config(ConsistencyPolicy::Error)).is_ok());
    }

    #[test]
    fn inconsistent_dual_record_trusts_cartesian_unless_strict() {
        let mut record = cartesian_only();
        record.r_to_handlebar = Some(450.0);
        record.theta_to_handlebar = Some(25.0);
        record.r_to_bottom_bracket = Some(600.0);
        record.theta_to_bottom_bracket = Some(195.0);

        for policy in [ConsistencyPolicy::Ignore, ConsistencyPolicy::Warn] {
            let g = fill_missing_coordinates(&record, &config(policy)).unwrap();
            assert_eq!(g.handlebar_x, 480.0);
            assert_eq!(g.r_to_handlebar, 450.0);
            assert_eq!((g.s_bottom_bracket_x, g.s_bottom_bracket_y), (190.0, -710.0));
        }

        let err = fill_missing_coordinates(&record, &config(ConsistencyPolicy::Error)).unwrap_err();
        assert!(matches!(err, DataError::InconsistentGeometry { deviation_mm, .. } if deviation_mm > 1.0));
    }

    #[test]
    fn overflowing_shift_is_rejected() {
        let record = GeometryRecord {
            bike_name: "X".into(),
            handlebar_x: Some(1e308),
            handlebar_y: Some(0.0),
            saddle_x: Some(-1e308),
            saddle_y: Some(0.0),
            ..Default::default()
        };
        let err = fill_missing_coordinates(&record, &FillConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            DataError::NonFinite { ref bike, field: "r_to_handlebar" } if bike == "X"
        ));
    }

    #[test]
    fn completed_geometry_exports_every_field() {
        let g = fill_missing_coordinates(&polar_only(), &FillConfig::default()).unwrap();
        let exported = GeometryRecord::from(&g);
        assert!(exported.numeric_fields().iter().all(|(_, v)| v.is_some()));
        assert_eq!(exported.bike_name, "Road");
    }
}
