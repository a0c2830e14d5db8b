//! The hero→about transition: hold, compose, collapse, jump, settle.
//!
//! All element offsets are read from live anchor rects once, when the timeline is
//! built. The track itself never animates during this phase; it snaps at the start
//! of the jump stage while the composed stack is fully faded out.

use crate::{
    animation::ease::Ease,
    choreography::stage::{StageCursor, StagePlan, TransitionStage},
    config::TransitionFractions,
    foundation::{
        core::{Anchor, SectionId, Vec2},
        error::ScrollreelResult,
    },
    host::LayoutProbe,
    timeline::model::{Prop, Target, TimelineBuilder},
};

const FADE_DIM: f64 = 0.2;
const COLLAPSED_SCALE_Y: f64 = 0.35;
const PORTAL_START_SCALE_X: f64 = 0.2;
const REDUCED_FADE_SHARE: f64 = 0.6;

const REQUIRED: [Anchor; 4] = [
    Anchor::ComposeLayer,
    Anchor::ComposeStack,
    Anchor::Focal,
    Anchor::Rest,
];

/// The slide phase handed to the choreography, in timeline-local units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionWindow {
    pub start: f64,
    pub length: f64,
    pub track_width: f64,
    /// Index of the panel being revealed.
    pub to: usize,
}

impl TransitionWindow {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    fn destination_x(&self) -> f64 {
        -self.track_width * self.to as f64
    }
}

/// Anchors of the outgoing panel, resolved once per build.
#[derive(Clone, Debug)]
pub struct HeroAnchors {
    /// Offset from the focal element's compose position back to its resting position.
    pub focal_offset: Option<Vec2>,
    pub fade_targets: bool,
    pub secondary_fade: bool,
    pub portal_line: bool,
}

impl HeroAnchors {
    /// Resolve the anchors of `section`, or return the required ones that are absent.
    pub fn resolve<P: LayoutProbe + ?Sized>(
        probe: &P,
        section: &SectionId,
    ) -> Result<Self, Vec<Anchor>> {
        let missing: Vec<Anchor> = REQUIRED
            .into_iter()
            .filter(|a| probe.anchor_rect(section, *a).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let focal_offset = match (
            probe.anchor_rect(section, Anchor::FocalOrigin),
            probe.anchor_rect(section, Anchor::Focal),
        ) {
            (Some(origin), Some(focal)) => Some(origin.center() - focal.center()),
            _ => None,
        };
        let has = |a| probe.anchor_rect(section, a).is_some();

        Ok(Self {
            focal_offset,
            fade_targets: has(Anchor::FadeTargets),
            secondary_fade: has(Anchor::SecondaryFade),
            portal_line: has(Anchor::PortalLine),
        })
    }
}

/// Build the hero→about choreography into `b`.
///
/// Returns `Ok(false)` without writing anything when a required anchor is
/// missing; the caller then emits the generic linear slide for this phase.
/// Under reduced motion the stages collapse into the linear slide plus a
/// cross-fade of the outgoing panel.
pub fn build_transition<P: LayoutProbe + ?Sized>(
    b: &mut TimelineBuilder,
    probe: &P,
    origin: &SectionId,
    window: TransitionWindow,
    fractions: &TransitionFractions,
    reduced_motion: bool,
) -> ScrollreelResult<bool> {
    if reduced_motion {
        return build_cross_fade(b, probe, origin, window);
    }

    let anchors = match HeroAnchors::resolve(probe, origin) {
        Ok(a) => a,
        Err(missing) => {
            let names: Vec<&str> = missing.iter().map(|a| a.as_str()).collect();
            tracing::warn!(
                section = %origin,
                missing = ?names,
                "choreography anchors absent; using linear slide"
            );
            return Ok(false);
        }
    };

    let plan = StagePlan::new(window.start, window.length, fractions);
    let mut cursor = StageCursor::new();
    let t = |a: Anchor| Target::anchor(origin, a);

    let fades: Vec<Target> = [
        (anchors.fade_targets, Anchor::FadeTargets),
        (anchors.secondary_fade, Anchor::SecondaryFade),
    ]
    .into_iter()
    .filter_map(|(present, a)| present.then(|| t(a)))
    .collect();

    let layer = t(Anchor::ComposeLayer);
    let stack = t(Anchor::ComposeStack);
    let rest = t(Anchor::Rest);
    let focal_origin = t(Anchor::FocalOrigin);
    let portal = t(Anchor::PortalLine);

    b.initial(&layer, Prop::Opacity, 0.0);
    if anchors.portal_line {
        b.initial(&portal, Prop::Opacity, 0.0);
        b.initial(&portal, Prop::ScaleX, PORTAL_START_SCALE_X);
    }

    let hold = *plan.window(TransitionStage::Hold);
    let compose = *plan.window(TransitionStage::Compose);
    let collapse = *plan.window(TransitionStage::Collapse);
    let jump = *plan.window(TransitionStage::Jump);
    let settle = *plan.window(TransitionStage::Settle);
    let move_start = hold.at(0.2);

    cursor.enter(TransitionStage::Hold)?;
    for f in &fades {
        b.tween(f, Prop::Opacity, hold.start, move_start, FADE_DIM, Ease::Power1Out)?;
    }
    match anchors.focal_offset {
        Some(offset) => {
            b.tween(&focal_origin, Prop::X, move_start, compose.end, -offset.x, Ease::Power2Out)?;
            b.tween(&focal_origin, Prop::Y, move_start, compose.end, -offset.y, Ease::Power2Out)?;
        }
        // Nothing to carry over: the composed copy takes the stage as the move begins.
        None => b.set(&layer, Prop::Opacity, move_start, 1.0)?,
    }

    cursor.enter(TransitionStage::Compose)?;
    for f in &fades {
        b.tween(f, Prop::Opacity, compose.start, compose.end, 0.0, Ease::Linear)?;
    }
    b.tween(&rest, Prop::Opacity, compose.start, compose.end, 0.0, Ease::Linear)?;
    b.set(&rest, Prop::PointerEvents, compose.end, 0.0)?;
    if anchors.focal_offset.is_some() {
        b.set(&layer, Prop::Opacity, compose.end, 1.0)?;
        b.set(&focal_origin, Prop::Opacity, compose.end, 0.0)?;
    }

    cursor.enter(TransitionStage::Collapse)?;
    b.tween(&stack, Prop::ClipInset, collapse.start, collapse.end, 1.0, Ease::Power2InOut)?;
    b.tween(
        &stack,
        Prop::ScaleY,
        collapse.start,
        collapse.end,
        COLLAPSED_SCALE_Y,
        Ease::Power2InOut,
    )?;
    b.tween(&stack, Prop::Opacity, collapse.at(0.8), collapse.end, 0.0, Ease::Power2In)?;
    b.set(&layer, Prop::Opacity, collapse.end, 0.0)?;

    cursor.enter(TransitionStage::Jump)?;
    b.set(&Target::Track, Prop::X, jump.start, window.destination_x())?;
    if anchors.portal_line {
        b.set(&portal, Prop::Opacity, jump.start, 1.0)?;
        b.tween(&portal, Prop::ScaleX, jump.start, jump.end, 1.0, Ease::Power2Out)?;
    }

    cursor.enter(TransitionStage::Settle)?;
    if anchors.portal_line {
        b.tween(&portal, Prop::Opacity, settle.start, settle.end, 0.0, Ease::Linear)?;
    }

    debug_assert!(cursor.is_complete());
    Ok(true)
}

fn build_cross_fade<P: LayoutProbe + ?Sized>(
    b: &mut TimelineBuilder,
    probe: &P,
    origin: &SectionId,
    window: TransitionWindow,
) -> ScrollreelResult<bool> {
    if probe.anchor_rect(origin, Anchor::Rest).is_none() {
        tracing::warn!(
            section = %origin,
            missing = "rest",
            "cross-fade anchor absent; using linear slide"
        );
        return Ok(false);
    }
    let fade_end = window.start + window.length * REDUCED_FADE_SHARE;
    b.tween(
        &Target::Track,
        Prop::X,
        window.start,
        window.end(),
        window.destination_x(),
        Ease::Linear,
    )?;
    let rest = Target::anchor(origin, Anchor::Rest);
    b.tween(&rest, Prop::Opacity, window.start, fade_end, 0.0, Ease::Linear)?;
    Ok(true)
}
