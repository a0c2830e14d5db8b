use crate::{
    foundation::core::SectionId,
    layout::measure::{Measurements, PanelMeasurement},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalKind {
    Scroll,
    Reveal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseKind {
    /// Horizontal slide revealing panel `to` (always `from + 1`).
    Slide { from: usize, to: usize },
    /// Internal motion of an already revealed panel.
    Internal { panel: usize, motion: InternalKind },
}

/// One contiguous unit of scroll-consuming work.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub section: SectionId,
    pub start: f64, // absolute document scroll offset
    pub length: f64,
}

impl Phase {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Ordered phases of the pinned region, with their absolute start offsets.
///
/// Built from a single [`Measurements`] reading and never patched: any change in
/// the inputs produces a new schedule.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Schedule {
    pin_start: f64,
    track_width: f64,
    sections: Vec<SectionId>,
    phases: Vec<Phase>,
    total_distance: f64,
}

impl Schedule {
    /// Allocate scroll budget to every phase in panel order.
    ///
    /// Each panel after the first gets the slide that reveals it, followed by its
    /// internal phase when that has a positive length. Fewer than two panels
    /// yields an empty schedule.
    #[tracing::instrument(skip(measurements), fields(panels = measurements.panels.len()))]
    pub fn allocate(pin_start: f64, measurements: &Measurements) -> Self {
        let panels = &measurements.panels;
        let width = measurements.track_width;
        let sections: Vec<SectionId> = panels.iter().map(|p| p.id.clone()).collect();

        let mut phases = Vec::new();
        let mut cursor = pin_start;
        if panels.len() >= 2 {
            for (i, panel) in panels.iter().enumerate().skip(1) {
                phases.push(Phase {
                    kind: PhaseKind::Slide { from: i - 1, to: i },
                    section: panel.id.clone(),
                    start: cursor,
                    length: width,
                });
                cursor += width;

                if let Some(phase) = internal_phase(i, panel, cursor) {
                    cursor += phase.length;
                    phases.push(phase);
                }
            }
        }

        let total_distance = phases.iter().map(|p| p.length).sum();
        tracing::debug!(phases = phases.len(), total_distance, "schedule allocated");

        Self {
            pin_start,
            track_width: width,
            sections,
            phases,
            total_distance,
        }
    }

    pub fn pin_start(&self) -> f64 {
        self.pin_start
    }

    /// Offset at which the pinned region ends: `pin_start + Σ phase lengths`.
    pub fn pin_end(&self) -> f64 {
        self.pin_start + self.total_distance
    }

    /// Length the pinned region must have; published to the layout on every rebuild.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Pinned sections in panel order.
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s == id)
    }
}

fn internal_phase(index: usize, panel: &PanelMeasurement, start: f64) -> Option<Phase> {
    let motion = panel.internal?;
    // Zero-length phases would create an empty decode range.
    if panel.excess_height.is_nan() || panel.excess_height <= 0.0 {
        return None;
    }
    Some(Phase {
        kind: PhaseKind::Internal {
            panel: index,
            motion,
        },
        section: panel.id.clone(),
        start,
        length: panel.excess_height,
    })
}
