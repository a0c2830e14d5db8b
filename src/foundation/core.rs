use std::fmt;

use crate::foundation::error::{ScrollreelError, ScrollreelResult};

pub use kurbo::{Point, Rect, Vec2};

/// Logical name of a page section (`hero`, `about`, ..., plus the post-pin `cta`).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> ScrollreelResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ScrollreelError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Named elements inside a section that choreography segments animate.
///
/// Hosts resolve these to live bounding boxes through
/// [`LayoutProbe::anchor_rect`](crate::LayoutProbe::anchor_rect).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Layer holding the composed focal element.
    ComposeLayer,
    /// The composed stack that collapses to a line.
    ComposeStack,
    /// Focal element at its compose position.
    Focal,
    /// Focal element at its resting position inside the panel.
    FocalOrigin,
    /// Everything in the outgoing panel that is not part of the composition.
    Rest,
    /// Foreground copy dimmed during the hold stage.
    FadeTargets,
    /// Secondary element dimmed alongside the fade targets.
    SecondaryFade,
    /// Thin indicator line shown across the jump.
    PortalLine,
    RevealScreen,
    RevealStructure,
    RevealGrid,
}

impl Anchor {
    pub const ALL: [Self; 11] = [
        Self::ComposeLayer,
        Self::ComposeStack,
        Self::Focal,
        Self::FocalOrigin,
        Self::Rest,
        Self::FadeTargets,
        Self::SecondaryFade,
        Self::PortalLine,
        Self::RevealScreen,
        Self::RevealStructure,
        Self::RevealGrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComposeLayer => "compose_layer",
            Self::ComposeStack => "compose_stack",
            Self::Focal => "focal",
            Self::FocalOrigin => "focal_origin",
            Self::Rest => "rest",
            Self::FadeTargets => "fade_targets",
            Self::SecondaryFade => "secondary_fade",
            Self::PortalLine => "portal_line",
            Self::RevealScreen => "reveal_screen",
            Self::RevealStructure => "reveal_structure",
            Self::RevealGrid => "reveal_grid",
        }
    }
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
