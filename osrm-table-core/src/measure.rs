//! Value types the table service can annotate.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A matrix value type requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Measure {
    /// Travel time; the server answers in seconds.
    Duration,
    /// Travel distance; the server answers in metres.
    Distance,
}

impl Measure {
    /// Name used by the `annotations` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown measure name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measure {0:?}; expected \"duration\" or \"distance\"")]
pub struct ParseMeasureError(pub String);

impl FromStr for Measure {
    type Err = ParseMeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duration" => Ok(Self::Duration),
            "distance" => Ok(Self::Distance),
            _ => Err(ParseMeasureError(s.to_owned())),
        }
    }
}

/// Parse a comma-separated list such as `"duration,distance"`.
///
/// Duplicates are dropped while keeping first-seen order.
///
/// # Errors
///
/// Returns [`ParseMeasureError`] for the first unknown name.
///
/// # Examples
///
/// ```
/// use osrm_table_core::{Measure, parse_measures};
///
/// let measures = parse_measures("distance, duration,distance")?;
/// assert_eq!(measures, vec![Measure::Distance, Measure::Duration]);
/// # Ok::<(), osrm_table_core::ParseMeasureError>(())
/// ```
pub fn parse_measures(list: &str) -> Result<Vec<Measure>, ParseMeasureError> {
    let mut measures = Vec::new();
    for name in list.split(',').filter(|name| !name.trim().is_empty()) {
        let measure: Measure = name.parse()?;
        if !measures.contains(&measure) {
            measures.push(measure);
        }
    }
    Ok(measures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("duration", Measure::Duration)]
    #[case(" Distance ", Measure::Distance)]
    fn parses_known_names(#[case] input: &str, #[case] expected: Measure) {
        assert_eq!(input.parse::<Measure>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_names() {
        let err = parse_measures("duration,speed").expect_err("speed is unknown");
        assert_eq!(err, ParseMeasureError("speed".to_owned()));
    }

    #[rstest]
    fn empty_list_parses_to_nothing() {
        assert_eq!(parse_measures(""), Ok(Vec::new()));
    }
}
