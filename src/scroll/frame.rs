/// What changed since the last processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Dirty {
    pub content: bool,
    pub viewport: bool,
}

impl Dirty {
    pub fn any(self) -> bool {
        self.content || self.viewport
    }
}

/// Work taken from the coalescer for one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameWork {
    /// Latest scroll offset seen, if any scroll arrived.
    pub offset: Option<f64>,
    pub dirty: Dirty,
}

/// Collapses bursts of scroll and resize events into at most one unit of work per
/// animation frame. Only the latest offset survives; intermediate ones are dropped.
#[derive(Debug, Default)]
pub struct FrameCoalescer {
    pending: bool,
    offset: Option<f64>,
    dirty: Dirty,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the caller should request a frame callback.
    pub fn note_scroll(&mut self, offset: f64) -> bool {
        self.offset = Some(offset);
        self.arm()
    }

    pub fn note_viewport_change(&mut self) -> bool {
        self.dirty.viewport = true;
        self.arm()
    }

    pub fn note_content_change(&mut self) -> bool {
        self.dirty.content = true;
        self.arm()
    }

    /// Drain everything noted since the last frame. `None` when nothing is pending.
    pub fn take(&mut self) -> Option<FrameWork> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(FrameWork {
            offset: self.offset.take(),
            dirty: std::mem::take(&mut self.dirty),
        })
    }

    fn arm(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }
}
