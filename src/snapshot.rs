//! A static, serde-loadable page host.
//!
//! Holds one frozen layout reading and records everything written to it. Used by
//! the CLI and by tests; a live binding implements the host traits over its own
//! layout instead.

use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Anchor, Rect, SectionId, Viewport},
        error::ScrollreelResult,
    },
    host::{LayoutProbe, ScrollPort, StyleSink},
    timeline::model::Pose,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PanelSnapshot {
    /// `None` when the panel is not mounted.
    pub scroll_height: Option<f64>,
    pub anchors: BTreeMap<Anchor, Rect>,
}

/// A section's box in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentBox {
    pub top: f64,
    pub height: f64,
}

/// Writes received from the choreography.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct HostRecord {
    pub pose: Option<Pose>,
    pub applied: usize,
    pub pin_length: Option<f64>,
    pub scroll_writes: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSnapshot {
    pub viewport: Viewport,
    #[serde(default)]
    pub track_width: Option<f64>,
    #[serde(default)]
    pub pin_start: f64,
    #[serde(default)]
    pub scroll_offset: f64,
    #[serde(default)]
    pub panels: BTreeMap<SectionId, PanelSnapshot>,
    #[serde(default)]
    pub sections: BTreeMap<SectionId, DocumentBox>,
    #[serde(skip)]
    pub record: HostRecord,
}

impl PageSnapshot {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            track_width: Some(viewport.width),
            pin_start: 0.0,
            scroll_offset: 0.0,
            panels: BTreeMap::new(),
            sections: BTreeMap::new(),
            record: HostRecord::default(),
        }
    }

    pub fn from_json_str(s: &str) -> ScrollreelResult<Self> {
        let snap: Self = serde_json::from_str(s)?;
        Viewport::new(snap.viewport.width, snap.viewport.height)?;
        Ok(snap)
    }

    pub fn with_pin_start(mut self, pin_start: f64) -> Self {
        self.pin_start = pin_start;
        self
    }

    pub fn with_panel(mut self, id: impl Into<SectionId>, scroll_height: f64) -> Self {
        self.panels.entry(id.into()).or_default().scroll_height = Some(scroll_height);
        self
    }

    pub fn with_anchor(mut self, id: impl Into<SectionId>, anchor: Anchor, rect: Rect) -> Self {
        self.panels.entry(id.into()).or_default().anchors.insert(anchor, rect);
        self
    }

    pub fn with_section_box(mut self, id: impl Into<SectionId>, top: f64, height: f64) -> Self {
        self.sections.insert(id.into(), DocumentBox { top, height });
        self
    }

    pub fn set_panel_height(&mut self, id: &SectionId, scroll_height: Option<f64>) {
        self.panels.entry(id.clone()).or_default().scroll_height = scroll_height;
    }
}

impl LayoutProbe for PageSnapshot {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn track_width(&self) -> Option<f64> {
        self.track_width
    }

    fn panel_scroll_height(&self, section: &SectionId) -> Option<f64> {
        self.panels.get(section)?.scroll_height
    }

    fn anchor_rect(&self, section: &SectionId, anchor: Anchor) -> Option<Rect> {
        self.panels.get(section)?.anchors.get(&anchor).copied()
    }

    fn pin_start(&self) -> f64 {
        self.pin_start
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn section_document_offset(&self, section: &SectionId) -> Option<f64> {
        self.sections.get(section).map(|b| b.top)
    }

    fn section_viewport_rect(&self, section: &SectionId) -> Option<Rect> {
        let b = self.sections.get(section)?;
        let y = b.top - self.scroll_offset;
        Some(Rect::new(0.0, y, self.viewport.width, y + b.height))
    }
}

impl StyleSink for PageSnapshot {
    fn apply(&mut self, pose: &Pose) {
        self.record.pose = Some(pose.clone());
        self.record.applied += 1;
    }

    fn set_pin_length(&mut self, px: f64) {
        self.record.pin_length = Some(px);
    }
}

impl ScrollPort for PageSnapshot {
    fn scroll_to(&mut self, offset: f64) {
        let offset = offset.max(0.0);
        self.scroll_offset = offset;
        self.record.scroll_writes.push(offset);
    }
}
