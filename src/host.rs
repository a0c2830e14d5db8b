//! The seam between the choreography and a live page.
//!
//! Nothing in this crate reads layout or writes styles directly. A host (a DOM
//! binding, a test double, or [`PageSnapshot`](crate::PageSnapshot)) implements
//! these traits and the driver calls them from its per-frame step.

use crate::{
    foundation::core::{Anchor, Rect, SectionId, Viewport},
    timeline::model::Pose,
};

/// Synchronous layout reads. Implementations must not cache across a resize.
pub trait LayoutProbe {
    fn viewport(&self) -> Viewport;

    /// Width of one panel on the shared horizontal track.
    fn track_width(&self) -> Option<f64>;

    /// Full scrollable height of a panel's content; `None` when the panel is not mounted.
    fn panel_scroll_height(&self, section: &SectionId) -> Option<f64>;

    /// Live bounding box of a named element inside `section`, in viewport coordinates.
    fn anchor_rect(&self, section: &SectionId, anchor: Anchor) -> Option<Rect>;

    /// Document scroll offset at which the pinned region begins.
    fn pin_start(&self) -> f64;

    fn scroll_offset(&self) -> f64;

    /// Document offset of a section's top edge, for sections reached by plain scrolling.
    fn section_document_offset(&self, section: &SectionId) -> Option<f64>;

    /// Bounding box of a section relative to the viewport (vertical layout only).
    fn section_viewport_rect(&self, section: &SectionId) -> Option<Rect>;
}

/// Receives the computed output of a scrub.
pub trait StyleSink {
    fn apply(&mut self, pose: &Pose);

    /// Size the pinned region so that it ends exactly where the timeline does.
    fn set_pin_length(&mut self, px: f64);
}

pub trait ScrollPort {
    fn scroll_to(&mut self, offset: f64);
}

pub trait PageHost: LayoutProbe + StyleSink + ScrollPort {}

impl<T> PageHost for T where T: LayoutProbe + StyleSink + ScrollPort {}
