use serde::Serialize;
use std::fmt;

/// Index of a `<path>` region in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(pub usize);

impl RegionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region #{}", self.0)
    }
}

/// Fill of a region as read from its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillState {
    /// No `fill` declaration or attribute.
    Unset,
    /// Explicit `none`. Never recolored.
    None,
    /// Any other paint value, kept verbatim.
    Paint(String),
}

impl FillState {
    /// Classify a raw fill value. Empty means unset.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => FillState::Unset,
            Some(v) if v.eq_ignore_ascii_case("none") => FillState::None,
            Some(v) => FillState::Paint(v.to_string()),
        }
    }

    /// Regions with paint take part in recoloring.
    pub fn is_paint(&self) -> bool {
        matches!(self, FillState::Paint(_))
    }

    pub fn paint(&self) -> Option<&str> {
        match self {
            FillState::Paint(v) => Some(v),
            _ => None,
        }
    }
}

/// A parsed region: identity plus current fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub fill: FillState,
}
