//! Element sets compiled into the binary, used when no source answers and
//! nothing fresh is cached.

use chrono::NaiveDate;

use crate::elements::ElementSet;

pub const ISS_NORAD_ID: u32 = 25544;
pub const BUNDLED_ISS_VERSION: &str = "iss-2025.064";

const ISS_NAME: &str = "ISS (ZARYA)";
const ISS_LINE1: &str =
    "1 25544U 98067A   25064.50000000  .00016717  00000+0  30000-3 0  9999";
const ISS_LINE2: &str =
    "2 25544  51.6410 120.0000 0004300 122.0000 312.0000 15.50000000155002";

/// A fallback element set together with a label identifying its vintage.
#[derive(Debug, Clone, PartialEq)]
pub struct BundledElementSet {
    pub version: String,
    pub element_set: ElementSet,
}

pub fn iss() -> BundledElementSet {
    BundledElementSet {
        version: BUNDLED_ISS_VERSION.to_string(),
        element_set: ElementSet {
            name: Some(ISS_NAME.to_string()),
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        },
    }
}

pub fn iss_launch_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1998, 11, 20)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn bundled_iss_is_propagatable() {
        let bundled = iss();
        assert_eq!(bundled.element_set.norad_id(), Some(ISS_NORAD_ID));

        let elements = bundled.element_set.to_elements().unwrap();
        assert_eq!(elements.datetime.year(), 2025);
        assert_eq!(elements.datetime.ordinal(), 64);
        assert!(sgp4::Constants::from_elements(&elements).is_ok());
    }
}
