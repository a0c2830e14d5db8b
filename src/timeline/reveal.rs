use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Anchor, SectionId},
        error::ScrollreelResult,
    },
    host::LayoutProbe,
    timeline::model::{Prop, Target, TimelineBuilder},
};

const LAYERS: [Anchor; 3] = [
    Anchor::RevealScreen,
    Anchor::RevealStructure,
    Anchor::RevealGrid,
];

struct LayerTween {
    prop: Prop,
    from: f64,
    to: f64,
}

const fn tw(prop: Prop, from: f64, to: f64) -> LayerTween {
    LayerTween { prop, from, to }
}

struct LayerPlan {
    anchor: Anchor,
    span: (f64, f64), // fractions of the phase
    ease: Ease,
    tweens: &'static [LayerTween],
}

const PLAN: [LayerPlan; 3] = [
    LayerPlan {
        anchor: Anchor::RevealScreen,
        span: (0.0, 0.15),
        ease: Ease::Power2Out,
        tweens: &[
            tw(Prop::Opacity, 0.0, 1.0),
            tw(Prop::Scale, 0.92, 1.0),
        ],
    },
    LayerPlan {
        anchor: Anchor::RevealStructure,
        span: (0.0, 0.55),
        ease: Ease::Power1Out,
        tweens: &[
            tw(Prop::Opacity, 0.0, 1.0),
            tw(Prop::ClipReveal, 0.0, 1.0),
        ],
    },
    LayerPlan {
        anchor: Anchor::RevealGrid,
        span: (0.40, 0.95),
        ease: Ease::Power2Out,
        tweens: &[
            tw(Prop::Opacity, 0.0, 1.0),
            tw(Prop::ClipReveal, 0.0, 1.0),
            tw(Prop::Brightness, 1.12, 1.0),
        ],
    },
];

/// Pinned reveal of a panel's screen, structure and grid layers over
/// `[start, start + length]`.
///
/// Returns `Ok(false)` without writing anything when a layer is absent. Under
/// reduced motion every layer is written at its final state.
pub fn build_reveal<P: LayoutProbe + ?Sized>(
    b: &mut TimelineBuilder,
    probe: &P,
    section: &SectionId,
    start: f64,
    length: f64,
    reduced_motion: bool,
) -> ScrollreelResult<bool> {
    let missing: Vec<&str> = LAYERS
        .into_iter()
        .filter(|a| probe.anchor_rect(section, *a).is_none())
        .map(Anchor::as_str)
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            section = %section,
            missing = ?missing,
            "reveal layers absent; holding"
        );
        return Ok(false);
    }

    for layer in &PLAN {
        let target = Target::anchor(section, layer.anchor);
        for t in layer.tweens {
            if reduced_motion {
                b.initial(&target, t.prop, t.to);
                continue;
            }
            b.initial(&target, t.prop, t.from);
            let from_at = start + length * layer.span.0;
            let to_at = start + length * layer.span.1;
            b.tween(&target, t.prop, from_at, to_at, t.to, layer.ease)?;
        }
    }
    Ok(true)
}
