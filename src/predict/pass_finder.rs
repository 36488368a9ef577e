use chrono::{DateTime, Utc};
use sgp4::Constants;

use crate::elements::ElementSet;
use crate::predict::{look_angles, Observer, PassSearch, PassWindow, PredictError};

const HORIZON_ELEVATION: f64 = 0.0;

/// Sweep `elevation_at` from `start` to `start + window` (inclusive) and
/// return the first complete pass.
///
/// A rise only counts once a below-horizon sample has been seen, so a pass
/// already in progress at `start` is skipped. The set is the first sample
/// after the rise that is no longer above the horizon.
pub fn scan_for_pass<F>(
    start: DateTime<Utc>,
    search: &PassSearch,
    mut elevation_at: F,
) -> Result<PassWindow, PredictError>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let end = start + search.window();
    let mut armed = false;
    let mut rise: Option<DateTime<Utc>> = None;
    let mut cursor = start;

    while cursor <= end {
        let visible = elevation_at(cursor)? > HORIZON_ELEVATION;

        match rise {
            None if visible && armed => rise = Some(cursor),
            None if !visible => armed = true,
            Some(rise) if !visible => return Ok(PassWindow::between(rise, cursor)),
            _ => {}
        }

        cursor += search.step();
    }

    Err(PredictError::NoPass {
        start,
        window_hours: search.window().num_hours(),
    })
}

/// Next pass of the satellite described by `element_set` over `observer`.
pub fn next_pass(
    element_set: &ElementSet,
    observer: &Observer,
    start: DateTime<Utc>,
    search: &PassSearch,
) -> Result<PassWindow, PredictError> {
    observer.validate()?;

    let elements = element_set
        .to_elements()
        .map_err(|e| PredictError::InvalidElements(e.to_string()))?;
    let constants = Constants::from_elements(&elements)
        .map_err(|e| PredictError::InvalidElements(e.to_string()))?;

    log::debug!(
        "Scanning {} h from {} for NORAD {} over ({:.4}, {:.4})",
        search.window().num_hours(),
        start,
        elements.norad_id,
        observer.latitude_deg,
        observer.longitude_deg
    );

    scan_for_pass(start, search, |t| {
        look_angles(observer, &elements, &constants, t).map(|angles| angles.elevation_deg)
    })
}
