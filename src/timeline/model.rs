use std::collections::BTreeMap;

use crate::{
    animation::{ease::Ease, keyframes::Keyframes},
    foundation::{
        core::{Anchor, SectionId, clamp01},
        error::ScrollreelResult,
    },
};

/// What a timeline property track drives.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum Target {
    /// The shared horizontal panel track.
    Track,
    /// A panel's own content layer (internal vertical scroll).
    Content { section: SectionId },
    Anchor { section: SectionId, anchor: Anchor },
}

impl Target {
    pub fn anchor(section: &SectionId, anchor: Anchor) -> Self {
        Self::Anchor {
            section: section.clone(),
            anchor,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    X,
    Y,
    Opacity,
    Scale,
    ScaleX,
    ScaleY,
    /// 0 = unclipped, 1 = clipped down to a horizontal line.
    ClipInset,
    /// 0 = clipped to the center point, 1 = fully revealed.
    ClipReveal,
    Brightness,
    /// 1 = receives input, 0 = input passes through.
    PointerEvents,
}

impl Prop {
    /// Value a property has before any segment touches it.
    pub fn rest_value(self) -> f64 {
        match self {
            Self::X | Self::Y | Self::ClipInset => 0.0,
            Self::Opacity
            | Self::Scale
            | Self::ScaleX
            | Self::ScaleY
            | Self::ClipReveal
            | Self::Brightness
            | Self::PointerEvents => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Generic linear slide of the track.
    Slide,
    /// Multi-stage hero→about choreography.
    Choreography,
    /// Reduced-motion stand-in for the choreography.
    CrossFade,
    /// Vertical sub-scroll of a panel's content.
    Scroll,
    /// Pinned property reveal.
    Reveal,
    /// Phase consumes scroll without animating anything.
    Hold,
}

/// One timeline segment per schedule phase, in timeline-local units.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    pub phase: usize,
    pub kind: SegmentKind,
    pub start: f64,
    pub length: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PoseEntry {
    #[serde(flatten)]
    pub target: Target,
    pub prop: Prop,
    pub value: f64,
}

/// Computed property values for one scrub position, sorted by target then prop.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    pub entries: Vec<PoseEntry>,
}

impl Pose {
    pub fn get(&self, target: &Target, prop: Prop) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.target == *target && e.prop == prop)
            .map(|e| e.value)
    }

    pub fn track_x(&self) -> Option<f64> {
        self.get(&Target::Track, Prop::X)
    }
}

/// Property tracks laid out along scroll distance: one timeline unit is one
/// scroll pixel, with `0` at the pin start.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration: f64,
    tracks: BTreeMap<(Target, Prop), Keyframes<f64>>,
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn track(&self, target: &Target, prop: Prop) -> Option<&Keyframes<f64>> {
        self.tracks.get(&(target.clone(), prop))
    }

    /// Sample every track at timeline position `at`.
    pub fn sample(&self, at: f64) -> Pose {
        let entries = self
            .tracks
            .iter()
            .map(|((target, prop), kf)| PoseEntry {
                target: target.clone(),
                prop: *prop,
                value: kf.sample(at),
            })
            .collect();
        Pose { entries }
    }

    /// Sample at `progress` in `[0, 1]` of the full duration. Pure in `progress`.
    pub fn scrub(&self, progress: f64) -> Pose {
        self.sample(clamp01(progress) * self.duration)
    }
}

/// Append-only construction of a [`Timeline`].
///
/// Per-track writes must be chronological; out-of-order writes are rejected
/// rather than reordered.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    tracks: BTreeMap<(Target, Prop), Keyframes<f64>>,
    segments: Vec<Segment>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn track_mut(&mut self, target: &Target, prop: Prop) -> &mut Keyframes<f64> {
        self.tracks
            .entry((target.clone(), prop))
            .or_insert_with(|| Keyframes::starting_at(0.0, prop.rest_value()))
    }

    /// Override the value a track holds before its first animation.
    pub fn initial(&mut self, target: &Target, prop: Prop, value: f64) {
        self.tracks
            .insert((target.clone(), prop), Keyframes::starting_at(0.0, value));
    }

    pub fn tween(
        &mut self,
        target: &Target,
        prop: Prop,
        from_at: f64,
        to_at: f64,
        to: f64,
        ease: Ease,
    ) -> ScrollreelResult<()> {
        self.track_mut(target, prop).tween(from_at, to_at, to, ease)
    }

    pub fn set(
        &mut self,
        target: &Target,
        prop: Prop,
        at: f64,
        value: f64,
    ) -> ScrollreelResult<()> {
        self.track_mut(target, prop).set(at, value)
    }

    pub fn segment(&mut self, phase: usize, kind: SegmentKind, start: f64, length: f64) {
        self.segments.push(Segment {
            phase,
            kind,
            start,
            length,
        });
    }

    pub fn finish(self, duration: f64) -> Timeline {
        Timeline {
            duration,
            tracks: self.tracks,
            segments: self.segments,
        }
    }
}
