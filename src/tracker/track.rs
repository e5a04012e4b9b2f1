//! Single object track and track id allocation.

use crate::tracker::rect::{Point, Rect};
use crate::tracker::track_state::TrackState;

/// Per-instance track id allocator.
///
/// Ids start at 0 and only ever grow; an id handed out once is never handed
/// out again by the same allocator, even after its track was evicted.
#[derive(Debug, Clone, Default)]
pub struct TrackIdAllocator {
    next: u64,
}

impl TrackIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the next unique track ID.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to `allocate` will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Single object track.
///
/// `P` is whatever per-track resource the owning tracker keeps alive next to
/// the geometry: a visual tracking primitive for the tracker-backed variant,
/// `()` for plain centroid association. The track owns it exclusively and it
/// is dropped together with the track.
#[derive(Debug, Clone)]
pub struct Track<P = ()> {
    /// Unique track identifier
    pub id: u64,
    /// Class label, when the track was created from a labelled detection
    pub label: Option<String>,
    /// Last known bounding box
    pub bbox: Rect,
    /// Consecutive frames without a match
    pub disappearance_count: u32,
    /// Last quality score reported by the primitive
    pub quality: f64,
    /// Current track state
    pub state: TrackState,
    pub(crate) primitive: P,
}

impl<P> Track<P> {
    pub fn new(id: u64, bbox: Rect, label: Option<String>, primitive: P) -> Self {
        Self {
            id,
            label,
            bbox,
            disappearance_count: 0,
            quality: 0.0,
            state: TrackState::New,
            primitive,
        }
    }

    pub fn centroid(&self) -> Point {
        self.bbox.center()
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Record a successful match on this frame.
    pub fn mark_matched(&mut self) {
        self.disappearance_count = 0;
        self.state = TrackState::Tracked;
    }

    /// Record a frame without a match.
    ///
    /// Returns `true` once the track has been missing for more than
    /// `max_disappeared` consecutive frames and must be evicted.
    pub fn mark_missed(&mut self, max_disappeared: u32) -> bool {
        self.disappearance_count = self.disappearance_count.saturating_add(1);
        self.state = TrackState::Missing;
        self.disappearance_count > max_disappeared
    }

    pub fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }
}
