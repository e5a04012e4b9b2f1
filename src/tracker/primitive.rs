//! Seam for the per-object visual tracking primitive.
//!
//! The primitive itself (a correlation filter, MIL, GOTURN, ...) lives
//! outside this crate. The multi-object tracker only needs to start one on a
//! box and ask it for an updated box and a quality score every frame.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::tracker::rect::Rect;

/// Which kind of visual tracking primitive to instantiate per track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackerKind {
    /// Multiple-instance-learning tracker
    Mil,
    /// Regression network tracker
    Goturn,
    /// Correlation-filter tracker
    #[default]
    Correlation,
}

impl TrackerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mil => "mil",
            Self::Goturn => "goturn",
            Self::Correlation => "correlation",
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mil" => Ok(Self::Mil),
            "goturn" => Ok(Self::Goturn),
            "correlation" => Ok(Self::Correlation),
            _ => Err(Error::UnknownTrackerKind(s.to_string())),
        }
    }
}

/// A single-object visual tracker driven frame by frame.
pub trait VisualTracker<Fr> {
    /// Error type for start or update failures.
    type Error: fmt::Display;

    /// Start tracking the object inside `bbox` on `frame`.
    fn init(&mut self, frame: &Fr, bbox: Rect) -> Result<(), Self::Error>;

    /// Follow the object onto `frame`.
    ///
    /// Returns the new box and an opaque quality score; higher is better.
    fn update(&mut self, frame: &Fr) -> Result<(Rect, f64), Self::Error>;
}

/// Creates fresh primitives for newly spawned tracks.
pub trait PrimitiveFactory<Fr> {
    type Tracker: VisualTracker<Fr>;

    fn create(&self, kind: TrackerKind) -> Self::Tracker;
}

impl<Fr, T, F> PrimitiveFactory<Fr> for F
where
    T: VisualTracker<Fr>,
    F: Fn(TrackerKind) -> T,
{
    type Tracker = T;

    fn create(&self, kind: TrackerKind) -> T {
        self(kind)
    }
}
