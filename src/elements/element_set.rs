use serde::Serialize;
use sgp4::Elements;

use crate::elements::ElementsError;

/// A two-line element set as received, kept verbatim so it can be cached
/// and served back without touching the orbital elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Pick the first `1 `/`2 ` line pair out of arbitrary text. A plain line
    /// directly above the pair is taken as the object name.
    pub fn from_text(text: &str) -> Result<Self, ElementsError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let index = lines
            .windows(2)
            .position(|pair| pair[0].starts_with("1 ") && pair[1].starts_with("2 "))
            .ok_or(ElementsError::Parse)?;

        let name = index
            .checked_sub(1)
            .map(|i| lines[i])
            .filter(|l| !is_element_line(l))
            .map(String::from);

        Ok(Self {
            name,
            line1: lines[index].to_string(),
            line2: lines[index + 1].to_string(),
        })
    }

    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.line1, self.line2)
    }

    /// Catalog number from columns 3-7 of line 1.
    pub fn norad_id(&self) -> Option<u32> {
        self.line1.get(2..7)?.trim().parse().ok()
    }

    pub fn to_elements(&self) -> Result<Elements, sgp4::TleError> {
        Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
    }
}

fn is_element_line(line: &str) -> bool {
    line.starts_with("1 ") || line.starts_with("2 ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ISS_LINE1, ISS_LINE2};

    #[test]
    fn parses_bare_two_lines() {
        let text = format!("{}\n{}\n", ISS_LINE1, ISS_LINE2);
        let set = ElementSet::from_text(&text).unwrap();
        assert_eq!(set.name, None);
        assert_eq!(set.line1, ISS_LINE1);
        assert_eq!(set.line2, ISS_LINE2);
    }

    #[test]
    fn keeps_name_line_and_skips_noise() {
        let text = format!(
            "# fetched from somewhere\n\n  ISS (ZARYA)  \r\n  {}\r\n{}  \r\ntrailer\n",
            ISS_LINE1, ISS_LINE2
        );
        let set = ElementSet::from_text(&text).unwrap();
        assert_eq!(set.name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(set.line1, ISS_LINE1);
        assert_eq!(set.line2, ISS_LINE2);
    }

    #[test]
    fn requires_adjacent_marker_lines() {
        let text = format!("{}\nsomething else\n{}", ISS_LINE1, ISS_LINE2);
        assert_eq!(ElementSet::from_text(&text), Err(ElementsError::Parse));

        let reversed = format!("{}\n{}", ISS_LINE2, ISS_LINE1);
        assert_eq!(ElementSet::from_text(&reversed), Err(ElementsError::Parse));
        assert_eq!(ElementSet::from_text(""), Err(ElementsError::Parse));
    }

    #[test]
    fn takes_first_pair_of_several() {
        let text = format!(
            "{}\n{}\n1 99999U first line\n2 99999 second line",
            ISS_LINE1, ISS_LINE2
        );
        let set = ElementSet::from_text(&text).unwrap();
        assert_eq!(set.norad_id(), Some(25544));
    }

    #[test]
    fn serialized_lines_survive_reparsing_unchanged() {
        let set = ElementSet::from_text(&format!("{}\n{}", ISS_LINE1, ISS_LINE2)).unwrap();
        let text = set.to_text();
        assert_eq!(text, format!("{}\n{}", ISS_LINE1, ISS_LINE2));

        let reparsed = ElementSet::from_text(&text).unwrap();
        assert_eq!(reparsed.line1.as_bytes(), ISS_LINE1.as_bytes());
        assert_eq!(reparsed.line2.as_bytes(), ISS_LINE2.as_bytes());
    }

    #[test]
    fn converts_to_sgp4_elements() {
        let set = ElementSet::from_text(&format!("{}\n{}", ISS_LINE1, ISS_LINE2)).unwrap();
        let elements = set.to_elements().unwrap();
        assert_eq!(elements.norad_id, 25544);
        assert!((elements.inclination - 51.6416).abs() < 1e-9);
    }
}
