use chrono::{DateTime, NaiveDate, Utc};
use sgp4::Elements;

use crate::predict::OrbitInfo;

const MINUTES_PER_DAY: f64 = 1440.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// The revolution counter in a TLE only has five digits.
const REVOLUTION_COUNTER_MODULUS: u64 = 100_000;

/// Summarise the orbit described by `elements` as of `now`.
///
/// The orbit number is the revolution count at epoch advanced by the mean
/// motion. When a launch date is known, it is also unwrapped past the
/// five-digit counter using a launch-based estimate.
pub fn orbit_info(
    elements: &Elements,
    now: DateTime<Utc>,
    launch_date: Option<NaiveDate>,
) -> OrbitInfo {
    let epoch = elements.datetime.and_utc();
    let revs_per_day = Some(elements.mean_motion).filter(|m| m.is_finite() && *m > 0.0);
    let period_minutes = revs_per_day.map(|m| MINUTES_PER_DAY / m);
    let inclination_deg = Some(elements.inclination).filter(|i| i.is_finite());

    let orbit_number = revs_per_day.and_then(|revs| {
        let days_since_epoch = (now - epoch).num_seconds() as f64 / SECONDS_PER_DAY;
        let counted = elements.revolution_number as f64 + (days_since_epoch * revs).floor();
        if counted < 0.0 {
            return None;
        }
        let counted = counted as u64;

        Some(match launch_date {
            Some(launch) => {
                let launched = launch.and_hms_opt(0, 0, 0)?.and_utc();
                let days_in_orbit = (now - launched).num_seconds() as f64 / SECONDS_PER_DAY;
                unwrap_revolution(counted, days_in_orbit * revs)
            }
            None => counted,
        })
    });

    OrbitInfo {
        norad_id: elements.norad_id,
        name: elements.object_name.clone(),
        orbit_number,
        inclination_deg,
        period_minutes,
        revs_per_day,
        epoch,
        updated_at: now,
    }
}

/// Add whole multiples of the counter modulus to `counted` to land as close
/// as possible to `estimate`.
pub fn unwrap_revolution(counted: u64, estimate: f64) -> u64 {
    if !estimate.is_finite() || estimate <= counted as f64 {
        return counted;
    }
    let wraps = ((estimate - counted as f64) / REVOLUTION_COUNTER_MODULUS as f64).round() as u64;
    counted + wraps * REVOLUTION_COUNTER_MODULUS
}
