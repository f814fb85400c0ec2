use super::super::domain::ProjectInfo;

/// Reference rainfall stored per impermeabilized square metre (45 mm).
pub const REFERENCE_RAIN_DEPTH_M: f64 = 0.045;
/// Infiltration credited over the two-hour drawdown, per mm/h and per square metre.
pub const INFILTRATION_DRAWDOWN_FACTOR: f64 = 0.002;
/// Minimum retention expected per impermeabilized square metre (15 mm).
pub const MINIMUM_RETENTION_DEPTH_M: f64 = 0.015;

/// Stormwater retention volume the project must provide, in m³.
///
/// `None` when the impermeabilized area is unknown. Infiltration is only credited when a
/// permeability test backs the measured area and rate.
pub fn calculated_volume(project: &ProjectInfo, test_present: bool) -> Option<f64> {
    let impermeabilized = project.impermeabilized_area_m2?;
    let stored = impermeabilized * REFERENCE_RAIN_DEPTH_M;

    let volume = match (
        test_present,
        project.infiltration_area_m2,
        project.infiltration_rate_mm_h,
    ) {
        (true, Some(area), Some(rate)) => stored - area * rate * INFILTRATION_DRAWDOWN_FACTOR,
        _ => stored,
    };

    Some(volume.max(0.0))
}

pub fn minimum_volume(impermeabilized_area_m2: f64) -> f64 {
    impermeabilized_area_m2 * MINIMUM_RETENTION_DEPTH_M
}
