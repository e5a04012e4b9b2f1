mod distance;
mod matching;
mod multi_tracker;
mod primitive;
mod rect;
mod registry;
mod track;
mod track_state;

pub use distance::DistanceMetric;
pub use matching::{AssignmentResult, Detection, greedy_assignment};
pub use multi_tracker::{MultiTracker, TickReport};
pub use primitive::{PrimitiveFactory, TrackerKind, VisualTracker};
pub use rect::{Point, Rect};
pub use registry::TrackRegistry;
pub use track::{Track, TrackIdAllocator};
pub use track_state::TrackState;
