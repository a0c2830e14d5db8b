//! The per-mount owning context.
//!
//! One [`Experience`] exists per mounted page. It owns the motion mode, the
//! scroll driver or vertical tracker (never both), the jump controller, the frame
//! coalescer and the active-section signal. Hosts feed it events and call
//! [`Experience::on_frame`] from their animation-frame callback; nothing is global.

use crate::{
    choreography::stage::TransitionStage,
    config::ChoreoConfig,
    foundation::{core::SectionId, error::ScrollreelResult},
    host::{LayoutProbe, PageHost, StyleSink},
    layout::schedule::Schedule,
    motion::{MotionMode, MotionSignals, select_motion_mode},
    navigation::{JumpController, JumpId, JumpStatus, JumpStep},
    resolve::JumpTarget,
    scroll::{
        driver::{FrameReport, ScrollDriver},
        frame::{FrameCoalescer, FrameWork},
    },
    signal::{ReadSignal, Signal},
    vertical::VerticalTracker,
};

#[derive(Debug)]
enum Layout {
    Pinned(ScrollDriver),
    Vertical(VerticalTracker),
}

#[derive(Debug)]
pub struct Experience {
    config: ChoreoConfig,
    signals: MotionSignals,
    mode: MotionMode,
    layout: Layout,
    jumps: JumpController,
    frames: FrameCoalescer,
    active: Signal<SectionId>,
    stage: Option<TransitionStage>,
}

impl Experience {
    /// Validate `config`, pick the motion mode and take a first reading of `host`.
    ///
    /// An unmeasurable page is not an error: the pinned layout stays inert and is
    /// retried on later frames.
    #[tracing::instrument(skip_all, fields(panels = config.panels.len()))]
    pub fn mount<H: PageHost + ?Sized>(
        config: ChoreoConfig,
        signals: MotionSignals,
        host: &mut H,
    ) -> ScrollreelResult<Self> {
        config.validate()?;
        let mode = select_motion_mode(&signals, &config.motion);
        let first = config
            .panels
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_else(|| config.post_pin_section.clone());

        let mut exp = Self {
            layout: make_layout(&config, mode),
            jumps: JumpController::new(config.navigation),
            frames: FrameCoalescer::new(),
            active: Signal::new(first),
            stage: None,
            config,
            signals,
            mode,
        };
        tracing::debug!(?mode, "mounted");

        exp.frames.note_viewport_change();
        exp.on_frame(host, 0.0);
        Ok(exp)
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn config(&self) -> &ChoreoConfig {
        &self.config
    }

    /// Read-only active section; updated only by the scroll and resize paths.
    pub fn active_section(&self) -> ReadSignal<SectionId> {
        self.active.reader()
    }

    /// Choreography stage at the last processed offset, if inside it.
    pub fn current_stage(&self) -> Option<TransitionStage> {
        self.stage
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        match &self.layout {
            Layout::Pinned(driver) => driver.schedule(),
            Layout::Vertical(_) => None,
        }
    }

    pub fn jump_status(&self, id: JumpId) -> JumpStatus {
        self.jumps.status(id)
    }

    pub fn is_jumping(&self) -> bool {
        self.jumps.is_active()
    }

    /// Returns `true` when the host should request an animation frame.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.jumps.observe_scroll(offset);
        self.frames.note_scroll(offset)
    }

    /// Viewport size, pointer class or motion preference changed.
    pub fn on_viewport_resize<H>(&mut self, host: &mut H, signals: MotionSignals) -> bool
    where
        H: StyleSink + ?Sized,
    {
        self.signals = signals;
        let mode = select_motion_mode(&signals, &self.config.motion);
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "motion mode changed");
            if !mode.is_pinned() {
                host.set_pin_length(0.0);
            }
            self.jumps.clear();
            self.layout = make_layout(&self.config, mode);
            self.mode = mode;
            self.stage = None;
        }
        self.frames.note_viewport_change()
    }

    /// A panel's content height may have changed.
    pub fn on_panel_resize(&mut self, section: &SectionId) -> bool {
        tracing::trace!(section = %section, "panel resized");
        self.frames.note_content_change()
    }

    /// Start an animated scroll to `section`. Unknown ids and unready layouts are
    /// ignored and return `None`.
    pub fn navigate_to_section<H>(&mut self, host: &H, section: &SectionId) -> Option<JumpId>
    where
        H: LayoutProbe + ?Sized,
    {
        let to = match &self.layout {
            Layout::Pinned(driver) => match driver.resolver()?.encode(section) {
                Some(JumpTarget::Offset(at)) => Some(at),
                Some(JumpTarget::Document(id)) => host.section_document_offset(&id),
                None => None,
            },
            Layout::Vertical(tracker) => tracker.encode(host, section),
        };
        let Some(to) = to else {
            tracing::debug!(section = %section, "jump target unknown; ignored");
            return None;
        };
        let reduced = self.signals.reduced_motion;
        Some(
            self.jumps
                .start(section.clone(), host.scroll_offset(), to, reduced),
        )
    }

    /// Run one animation frame: advance any jump, then process coalesced work.
    ///
    /// Returns `None` when there was nothing to do. Failures are logged, the
    /// frame is skipped and work stays queued so the next frame remeasures.
    pub fn on_frame<H>(&mut self, host: &mut H, dt: f64) -> Option<FrameReport>
    where
        H: PageHost + ?Sized,
    {
        let target = self.jumps.active_target().cloned();
        if let Some(JumpStep {
            offset, settled, ..
        }) = self.jumps.tick(dt)
        {
            host.scroll_to(offset);
            self.frames.note_scroll(host.scroll_offset());
            // A settled target stays active unless detection sees another section.
            if settled
                && let Layout::Vertical(tracker) = &mut self.layout
                && let Some(target) = target
            {
                tracker.set_active(target);
            }
        }
        let work = self.frames.take()?;

        let report = match &mut self.layout {
            Layout::Pinned(driver) => match driver.frame(host, work) {
                Ok(report) => report,
                Err(err) => {
                    tracing::warn!(error = %err, "frame skipped");
                    driver.invalidate();
                    self.frames.note_content_change();
                    return None;
                }
            },
            Layout::Vertical(tracker) => vertical_frame(tracker, &*host, work),
        };

        self.stage = report.stage;
        // Passive detection stays frozen while a jump is in flight.
        if !self.jumps.is_active()
            && let Some(section) = self.current_section(&report)
        {
            self.active.set(section);
        }
        Some(report)
    }

    /// Tear down: release the pin and drop all state.
    pub fn unmount<H: StyleSink + ?Sized>(mut self, host: &mut H) {
        self.jumps.clear();
        if self.mode.is_pinned() {
            host.set_pin_length(0.0);
        }
        tracing::debug!("unmounted");
    }

    fn current_section(&self, report: &FrameReport) -> Option<SectionId> {
        match &self.layout {
            Layout::Pinned(_) => report.section.clone(),
            Layout::Vertical(tracker) => tracker.active().cloned(),
        }
    }
}

fn make_layout(config: &ChoreoConfig, mode: MotionMode) -> Layout {
    match mode {
        MotionMode::Pinned { reduced } => {
            Layout::Pinned(ScrollDriver::new(config.clone(), reduced))
        }
        MotionMode::Vertical => {
            Layout::Vertical(VerticalTracker::new(config.all_sections(), &config.vertical))
        }
    }
}

fn vertical_frame<H: LayoutProbe + ?Sized>(
    tracker: &mut VerticalTracker,
    host: &H,
    work: FrameWork,
) -> FrameReport {
    let offset = work.offset.unwrap_or_else(|| host.scroll_offset());
    tracker.update(host);
    FrameReport {
        ready: true,
        rebuilt: false,
        offset,
        progress: None,
        stage: None,
        section: tracker.active().cloned(),
    }
}
