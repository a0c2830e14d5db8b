use crate::{
    animation::ease::Ease,
    choreography::hero_about::{TransitionWindow, build_transition},
    config::TransitionFractions,
    foundation::error::ScrollreelResult,
    host::LayoutProbe,
    layout::schedule::{InternalKind, PhaseKind, Schedule},
    timeline::{
        model::{Prop, SegmentKind, Target, Timeline, TimelineBuilder},
        reveal::build_reveal,
    },
};

/// Build the timeline for `schedule`, one segment per phase in schedule order.
///
/// Timeline position `0` is the pin start and the duration equals the schedule's
/// total distance. The first slide phase is handed to the hero→about
/// choreography; if that declines, it becomes a plain linear slide.
#[tracing::instrument(
    skip(schedule, probe, fractions),
    fields(phases = schedule.phases().len())
)]
pub fn build_timeline<P: LayoutProbe + ?Sized>(
    schedule: &Schedule,
    probe: &P,
    fractions: &TransitionFractions,
    reduced_motion: bool,
) -> ScrollreelResult<Timeline> {
    let mut b = TimelineBuilder::new();
    let origin = schedule.pin_start();
    let width = schedule.track_width();

    for (index, phase) in schedule.phases().iter().enumerate() {
        let start = phase.start - origin;
        let end = phase.end() - origin;

        let kind = match phase.kind {
            PhaseKind::Slide { from, to } => {
                let choreographed = index == 0
                    && build_transition(
                        &mut b,
                        probe,
                        &schedule.sections()[from],
                        TransitionWindow {
                            start,
                            length: phase.length,
                            track_width: width,
                            to,
                        },
                        fractions,
                        reduced_motion,
                    )?;
                if choreographed {
                    if reduced_motion {
                        SegmentKind::CrossFade
                    } else {
                        SegmentKind::Choreography
                    }
                } else {
                    let x = -width * to as f64;
                    b.tween(&Target::Track, Prop::X, start, end, x, Ease::Linear)?;
                    SegmentKind::Slide
                }
            }
            PhaseKind::Internal {
                motion: InternalKind::Scroll,
                ..
            } => {
                let content = Target::Content {
                    section: phase.section.clone(),
                };
                b.tween(&content, Prop::Y, start, end, -phase.length, Ease::Linear)?;
                SegmentKind::Scroll
            }
            PhaseKind::Internal {
                motion: InternalKind::Reveal,
                ..
            } => {
                let section = &phase.section;
                if build_reveal(&mut b, probe, section, start, phase.length, reduced_motion)? {
                    SegmentKind::Reveal
                } else {
                    SegmentKind::Hold
                }
            }
        };
        b.segment(index, kind, start, phase.length);
    }

    let timeline = b.finish(schedule.total_distance());
    tracing::debug!(
        duration = timeline.duration(),
        segments = timeline.segments().len(),
        "timeline built"
    );
    Ok(timeline)
}
