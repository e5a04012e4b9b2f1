/// Track state enumeration for object tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Newly created track, not yet updated
    #[default]
    New,
    /// Matched or updated on the most recent frame
    Tracked,
    /// Unmatched on the most recent frame, still counting towards eviction
    Missing,
    /// Evicted from tracking
    Removed,
}
