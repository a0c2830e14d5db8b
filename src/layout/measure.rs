use std::collections::BTreeMap;

use crate::{
    config::{ChoreoConfig, InternalMotion},
    foundation::core::{Anchor, Rect, SectionId, Viewport},
    host::LayoutProbe,
    layout::schedule::InternalKind,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PanelMeasurement {
    pub id: SectionId,
    pub width: f64,
    /// Scroll length of the panel's internal phase; `0` means no internal phase.
    pub excess_height: f64,
    pub internal: Option<InternalKind>,
}

/// One consistent reading of every panel in the pinned sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Measurements {
    pub viewport: Viewport,
    pub track_width: f64,
    pub panels: Vec<PanelMeasurement>,
}

/// Measure every configured panel.
///
/// Returns `None` when the track or any panel is not laid out yet. A missing panel
/// is never reported as zero height: the whole reading is unavailable instead.
pub fn measure_panels<P>(probe: &P, config: &ChoreoConfig) -> Option<Measurements>
where
    P: LayoutProbe + ?Sized,
{
    let viewport = probe.viewport();
    let track_width = match probe.track_width() {
        Some(w) if w.is_finite() && w > 0.0 => w,
        other => {
            tracing::debug!(track_width = ?other, "panel track not laid out");
            return None;
        }
    };

    let mut panels = Vec::with_capacity(config.panels.len());
    for panel in &config.panels {
        let Some(scroll_height) = probe.panel_scroll_height(&panel.id) else {
            tracing::debug!(panel = %panel.id, "panel not mounted");
            return None;
        };
        if !scroll_height.is_finite() {
            tracing::debug!(panel = %panel.id, "panel height not finite");
            return None;
        }

        let (excess_height, internal) = match panel.internal {
            InternalMotion::None => (0.0, None),
            InternalMotion::Scroll => (
                (scroll_height - viewport.height).max(0.0),
                Some(InternalKind::Scroll),
            ),
            InternalMotion::Reveal { length } => {
                (length.resolve(viewport.height), Some(InternalKind::Reveal))
            }
        };

        panels.push(PanelMeasurement {
            id: panel.id.clone(),
            width: track_width,
            excess_height,
            internal,
        });
    }

    Some(Measurements {
        viewport,
        track_width,
        panels,
    })
}

/// Live anchor boxes of every configured panel. Absent anchors have no entry.
pub type AnchorReading = BTreeMap<(SectionId, Anchor), Rect>;

/// Read every anchor the timeline builder may consult.
///
/// Part of the rebuild check alongside [`Measurements`]: an anchor that mounts or
/// moves without changing any panel height still changes the built timeline.
pub fn read_anchors<P>(probe: &P, config: &ChoreoConfig) -> AnchorReading
where
    P: LayoutProbe + ?Sized,
{
    let mut reading = BTreeMap::new();
    for id in config.panel_ids() {
        for anchor in Anchor::ALL {
            if let Some(rect) = probe.anchor_rect(id, anchor) {
                reading.insert((id.clone(), anchor), rect);
            }
        }
    }
    reading
}
