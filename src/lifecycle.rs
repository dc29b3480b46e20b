use std::fmt;

/// Identity of one mount of the user list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount-{}", self.0)
    }
}

/// Tracks which mount, if any, is live. At most one is live at a time.
#[derive(Debug, Default)]
pub struct Mounts {
    next: u64,
    live: Option<MountId>,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new mount. Any previous mount is unmounted first.
    pub fn mount(&mut self) -> MountId {
        self.unmount();
        self.next += 1;
        let id = MountId(self.next);
        self.live = Some(id);
        tracing::debug!(%id, "mounted");
        id
    }

    pub fn unmount(&mut self) -> Option<MountId> {
        let id = self.live.take()?;
        tracing::debug!(%id, "unmounted");
        Some(id)
    }

    pub fn is_live(&self, id: MountId) -> bool {
        self.live == Some(id)
    }
}
