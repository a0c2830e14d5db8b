use crate::config::MotionConfig;

/// Environment inputs that decide whether the pinned choreography runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionSignals {
    pub reduced_motion: bool,
    pub coarse_pointer: bool,
    pub viewport_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MotionMode {
    /// Pinned horizontal sequence driven by the scroll timeline.
    Pinned { reduced: bool },
    /// Plain document flow with intersection-based section detection.
    Vertical,
}

impl MotionMode {
    pub fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned { .. })
    }

    pub fn reduced(self) -> bool {
        matches!(self, Self::Pinned { reduced: true })
    }
}

pub fn select_motion_mode(signals: &MotionSignals, cfg: &MotionConfig) -> MotionMode {
    let narrow = signals.coarse_pointer
        || !signals.viewport_width.is_finite()
        || signals.viewport_width < cfg.narrow_breakpoint_px;
    if narrow {
        return MotionMode::Vertical;
    }
    if signals.reduced_motion {
        return if cfg.pin_under_reduced_motion {
            MotionMode::Pinned { reduced: true }
        } else {
            MotionMode::Vertical
        };
    }
    MotionMode::Pinned { reduced: false }
}
