use crate::{
    choreography::stage::{StagePlan, TransitionStage},
    config::ChoreoConfig,
    foundation::{
        core::{SectionId, clamp01},
        error::ScrollreelResult,
    },
    host::{LayoutProbe, PageHost, StyleSink},
    layout::{
        measure::{AnchorReading, Measurements, measure_panels, read_anchors},
        schedule::Schedule,
    },
    resolve::SectionResolver,
    scroll::frame::FrameWork,
    timeline::{
        builder::build_timeline,
        model::{SegmentKind, Timeline},
    },
};

/// Everything derived from one measurement reading. Replaced wholesale, never patched.
#[derive(Debug)]
struct Built {
    measurements: Measurements,
    anchors: AnchorReading,
    schedule: Schedule,
    timeline: Timeline,
    resolver: SectionResolver,
    stages: Option<StagePlan>,
}

/// Outcome of one driver frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// A schedule exists; when `false` the frame was a no-op.
    pub ready: bool,
    pub rebuilt: bool,
    pub offset: f64,
    pub progress: Option<f64>,
    pub stage: Option<TransitionStage>,
    pub section: Option<SectionId>,
}

/// Sole owner of the schedule and timeline for the pinned layout.
#[derive(Debug)]
pub struct ScrollDriver {
    config: ChoreoConfig,
    reduced_motion: bool,
    built: Option<Built>,
}

impl ScrollDriver {
    pub fn new(config: ChoreoConfig, reduced_motion: bool) -> Self {
        Self {
            config,
            reduced_motion,
            built: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.built.is_some()
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.built.as_ref().map(|b| &b.schedule)
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.built.as_ref().map(|b| &b.timeline)
    }

    pub fn resolver(&self) -> Option<&SectionResolver> {
        self.built.as_ref().map(|b| &b.resolver)
    }

    /// Discard the current schedule; the next frame remeasures from scratch.
    pub fn invalidate(&mut self) {
        self.built = None;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if self.reduced_motion != reduced {
            self.reduced_motion = reduced;
            self.invalidate();
        }
    }

    /// Re-read layout and rebuild when anything changed. Returns whether a
    /// rebuild happened. Publishes the pin length after every successful reading.
    ///
    /// An unavailable reading drops the current schedule: nothing is scrubbed or
    /// decoded until a later reading succeeds.
    pub fn remeasure<H>(&mut self, host: &mut H) -> ScrollreelResult<bool>
    where
        H: LayoutProbe + StyleSink + ?Sized,
    {
        let Some(measurements) = measure_panels(&*host, &self.config) else {
            tracing::debug!("measurement unavailable; schedule not ready");
            self.invalidate();
            return Ok(false);
        };
        let anchors = read_anchors(&*host, &self.config);
        let pin_start = host.pin_start();

        if let Some(built) = &self.built
            && built.measurements == measurements
            && built.anchors == anchors
            && built.schedule.pin_start() == pin_start
        {
            host.set_pin_length(built.schedule.total_distance());
            return Ok(false);
        }

        let schedule = Schedule::allocate(pin_start, &measurements);
        let timeline = build_timeline(
            &schedule,
            &*host,
            &self.config.transition,
            self.reduced_motion,
        )?;
        let resolver = SectionResolver::new(&schedule, self.config.post_pin_section.clone());
        let stages = timeline
            .segments()
            .first()
            .filter(|s| s.kind == SegmentKind::Choreography)
            .map(|s| StagePlan::new(s.start, s.length, &self.config.transition));

        host.set_pin_length(schedule.total_distance());
        tracing::debug!(
            pin_start,
            total = schedule.total_distance(),
            phases = schedule.phases().len(),
            "schedule rebuilt"
        );
        self.built = Some(Built {
            measurements,
            anchors,
            schedule,
            timeline,
            resolver,
            stages,
        });
        Ok(true)
    }

    /// Scrub progress for a document offset: `0` at the pin start, `1` at its end.
    pub fn progress_at(&self, offset: f64) -> Option<f64> {
        let built = self.built.as_ref()?;
        let total = built.schedule.total_distance();
        if total <= 0.0 {
            return Some(0.0);
        }
        Some(clamp01((offset - built.schedule.pin_start()) / total))
    }

    pub fn stage_at(&self, offset: f64) -> Option<TransitionStage> {
        let built = self.built.as_ref()?;
        let plan = built.stages.as_ref()?;
        plan.stage_at(offset - built.schedule.pin_start())
    }

    /// Apply the pose for `offset`. Pure in `offset`: same input, same output.
    pub fn scrub<S: StyleSink + ?Sized>(&self, sink: &mut S, offset: f64) -> Option<f64> {
        let progress = self.progress_at(offset)?;
        let timeline = self.timeline()?;
        sink.apply(&timeline.scrub(progress));
        tracing::trace!(offset, progress, "scrubbed");
        Some(progress)
    }

    /// Process one coalesced frame.
    pub fn frame<H: PageHost + ?Sized>(
        &mut self,
        host: &mut H,
        work: FrameWork,
    ) -> ScrollreelResult<FrameReport> {
        let rebuilt = if work.dirty.any() || self.built.is_none() {
            self.remeasure(host)?
        } else {
            false
        };
        let offset = work.offset.unwrap_or_else(|| host.scroll_offset());
        let progress = self.scrub(host, offset);
        Ok(FrameReport {
            ready: self.is_ready(),
            rebuilt,
            offset,
            progress,
            stage: self.stage_at(offset),
            section: self.resolver().map(|r| r.decode(offset)),
        })
    }
}
