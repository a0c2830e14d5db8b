//! Programmatic "jump to section" scrolling.
//!
//! A jump is a time-based eased scroll from the current offset to a target
//! offset. Only one jump exists at a time: a new request replaces the running
//! one outright. Scroll events the jump itself caused are told apart from user
//! scrolls by comparing against the last offset it wrote.

use crate::{config::NavConfig, foundation::core::SectionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct JumpId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollOrigin {
    /// Caused by the in-flight jump's own write.
    Programmatic,
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpStatus {
    InFlight,
    Settled,
    /// Replaced by a newer jump before settling.
    Superseded,
    /// Interrupted by a user scroll.
    Cancelled,
    Unknown,
}

/// One frame of jump progress: the offset to write and whether the jump is done.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct JumpStep {
    pub id: JumpId,
    pub offset: f64,
    pub settled: bool,
}

#[derive(Clone, Debug)]
struct ActiveJump {
    id: JumpId,
    section: SectionId,
    from: f64,
    to: f64,
    duration: f64, // seconds
    elapsed: f64,
    last_written: Option<f64>,
}

impl ActiveJump {
    fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

const HISTORY: usize = 8;

#[derive(Debug)]
pub struct JumpController {
    cfg: NavConfig,
    next_id: u64,
    active: Option<ActiveJump>,
    finished: Vec<(JumpId, JumpStatus)>,
}

impl JumpController {
    pub fn new(cfg: NavConfig) -> Self {
        Self {
            cfg,
            next_id: 0,
            active: None,
            finished: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_target(&self) -> Option<&SectionId> {
        self.active.as_ref().map(|j| &j.section)
    }

    /// Begin a jump, superseding any jump in flight.
    pub fn start(
        &mut self,
        section: SectionId,
        from: f64,
        to: f64,
        reduced_motion: bool,
    ) -> JumpId {
        if let Some(prev) = self.active.take() {
            tracing::debug!(id = prev.id.0, "jump superseded");
            self.record(prev.id, JumpStatus::Superseded);
        }
        let id = JumpId(self.next_id);
        self.next_id += 1;
        let duration = if reduced_motion {
            0.0
        } else {
            self.cfg.jump_duration_secs
        };
        tracing::debug!(id = id.0, section = %section, from, to, duration, "jump started");
        self.active = Some(ActiveJump {
            id,
            section,
            from,
            to,
            duration,
            elapsed: 0.0,
            last_written: None,
        });
        id
    }

    pub fn classify(&self, offset: f64) -> ScrollOrigin {
        let Some(jump) = &self.active else {
            return ScrollOrigin::User;
        };
        let expected = jump.last_written.unwrap_or(jump.from);
        if (offset - expected).abs() <= self.cfg.self_scroll_tolerance_px {
            ScrollOrigin::Programmatic
        } else {
            ScrollOrigin::User
        }
    }

    /// Classify a scroll event; a user scroll cancels the jump in flight.
    pub fn observe_scroll(&mut self, offset: f64) -> ScrollOrigin {
        let origin = self.classify(offset);
        if origin == ScrollOrigin::User
            && let Some(jump) = self.active.take()
        {
            tracing::debug!(id = jump.id.0, offset, "jump cancelled by user scroll");
            self.record(jump.id, JumpStatus::Cancelled);
        }
        origin
    }

    /// Advance the jump by `dt` seconds and return the offset to write.
    pub fn tick(&mut self, dt: f64) -> Option<JumpStep> {
        let ease = self.cfg.ease;
        let jump = self.active.as_mut()?;
        if dt.is_finite() && dt > 0.0 {
            jump.elapsed += dt;
        }
        let p = jump.progress();
        let offset = if p >= 1.0 {
            jump.to
        } else {
            jump.from + (jump.to - jump.from) * ease.apply(p)
        };
        jump.last_written = Some(offset);
        let step = JumpStep {
            id: jump.id,
            offset,
            settled: p >= 1.0,
        };
        if step.settled {
            self.active = None;
            self.record(step.id, JumpStatus::Settled);
        }
        Some(step)
    }

    pub fn status(&self, id: JumpId) -> JumpStatus {
        if self.active.as_ref().is_some_and(|j| j.id == id) {
            return JumpStatus::InFlight;
        }
        self.finished
            .iter()
            .rev()
            .find(|(fid, _)| *fid == id)
            .map_or(JumpStatus::Unknown, |(_, s)| *s)
    }

    /// Drop any jump in flight without recording an outcome.
    pub fn clear(&mut self) {
        self.active = None;
    }

    fn record(&mut self, id: JumpId, status: JumpStatus) {
        if self.finished.len() == HISTORY {
            self.finished.remove(0);
        }
        self.finished.push((id, status));
    }
}

/// One entry of the navigation strip.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NavSection {
    pub id: SectionId,
    pub index_label: String,
    pub label: String,
}

impl NavSection {
    fn new(id: &str, index_label: &str, label: &str) -> Self {
        Self {
            id: SectionId::new(id),
            index_label: index_label.to_string(),
            label: label.to_string(),
        }
    }
}

/// Navigation strip of the home page, in document order.
pub fn home_nav_sections() -> Vec<NavSection> {
    vec![
        NavSection::new("hero", "I", "HERO"),
        NavSection::new("about", "II", "ABOUT"),
        NavSection::new("projects", "III", "PROJECTS"),
        NavSection::new("blogs", "IV", "BLOGS"),
        NavSection::new("cta", "V", "CONNECT"),
    ]
}

pub fn find_nav_section<'a>(
    sections: &'a [NavSection],
    id: &SectionId,
) -> Option<&'a NavSection> {
    sections.iter().find(|s| s.id == *id)
}
