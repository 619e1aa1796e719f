//! Laterality and per-axis bounds bookkeeping.
//!
//! Bounds always hold `min <= max`. The order in which a pair is reported is
//! carried separately by an [`Orientation`] tag, so mirrored anatomy is
//! recorded explicitly instead of through swapped tuple members.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TransformError;

/// Anatomical side a point cloud was acquired from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// Orientation under which the normalized x bounds of this side are stored.
    #[inline]
    pub fn x_orientation(self) -> Orientation {
        match self {
            Side::Left => Orientation::Ascending,
            Side::Right => Orientation::Descending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(TransformError::InvalidInput(format!(
                "side must be 'left' or 'right', got '{}'",
                other
            ))),
        }
    }
}

/// Order in which an [`AxisBounds`] pair is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Reported as `(min, max)`.
    #[default]
    Ascending,
    /// Reported as `(max, min)`.
    Descending,
}

/// Observed range of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub orientation: Orientation,
}

impl AxisBounds {
    /// Creates ascending bounds. Arguments are sorted so `min <= max` holds.
    pub fn new(a: f64, b: f64) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min,
            max,
            orientation: Orientation::Ascending,
        }
    }

    /// Computes ascending bounds over a column, `None` if it is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self::new(min, max))
    }

    /// Returns the same range tagged with `orientation`.
    #[inline]
    pub fn with_orientation(self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self
        }
    }

    /// Stored-order pair: `(min, max)` when ascending, `(max, min)` when descending.
    #[inline]
    pub fn pair(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Ascending => (self.min, self.max),
            Orientation::Descending => (self.max, self.min),
        }
    }

    /// First member of the stored-order pair.
    #[inline]
    pub fn start(&self) -> f64 {
        self.pair().0
    }

    /// Second member of the stored-order pair.
    #[inline]
    pub fn end(&self) -> f64 {
        self.pair().1
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Midpoint of the range. Halved before summing so it cannot overflow.
    #[inline]
    pub fn center(&self) -> f64 {
        self.min / 2.0 + self.max / 2.0
    }

    /// True if `value` lies in `[min - tolerance, max + tolerance]`.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

impl fmt::Display for AxisBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.pair();
        write!(f, "({}, {})", a, b)
    }
}

/// Bounds of all four columns of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudBounds {
    pub x: AxisBounds,
    pub y: AxisBounds,
    pub z: AxisBounds,
    pub density: AxisBounds,
}

impl CloudBounds {
    /// Stacked 3x2 spatial bounds, each row in stored order.
    pub fn space_bounds(&self) -> [[f64; 2]; 3] {
        [self.x, self.y, self.z].map(|b| {
            let (a, c) = b.pair();
            [a, c]
        })
    }
}

/// Serializable summary of the bounds metadata of one normalized cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsReport {
    pub side: Side,
    pub point_count: usize,
    pub original: CloudBounds,
    pub normalized: CloudBounds,
    pub center: [f64; 3],
    pub scale_factor: f64,
}
