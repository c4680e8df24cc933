use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to the watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    /// Classify a notify event. Metadata-only changes (mtime, chmod) and
    /// access events are not changes.
    pub(super) fn of(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            _ => None,
        }
    }

    /// Merge a later event into an earlier one within the same window.
    ///
    /// Returns `None` when the two cancel out.
    pub(super) fn merge(self, later: Self) -> Option<Self> {
        match (self, later) {
            // deleted then restored
            (Self::Removed, Self::Created | Self::Modified) => Some(later),
            (Self::Modified, Self::Removed) => Some(Self::Removed),
            // appeared then vanished
            (Self::Created, Self::Removed) => None,
            _ => Some(self),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        })
    }
}
