//! Scrollreel turns vertical scroll into a pinned sequence of horizontal panel
//! transitions, reveals and sub-scrolls, and answers "which section is the viewer
//! in" from the same arithmetic.
//!
//! The pipeline, leaf first:
//!
//! - measure panels through a [`LayoutProbe`]
//! - allocate one scroll budget over them ([`Schedule`])
//! - build a [`Timeline`] whose units are scroll pixels
//! - scrub it from the scroll offset ([`ScrollDriver`]) and push the [`Pose`] to a [`StyleSink`]
//! - decode offsets back into section ids and encode jump targets ([`SectionResolver`])
//!
//! [`Experience`] owns all of it for one mounted page, including the switch to plain
//! vertical flow chosen by [`select_motion_mode`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod choreography;
pub(crate) mod config;
pub(crate) mod experience;
pub(crate) mod host;
pub(crate) mod layout;
pub(crate) mod motion;
pub(crate) mod navigation;
pub(crate) mod resolve;
pub(crate) mod scroll;
pub(crate) mod signal;
pub(crate) mod snapshot;
pub(crate) mod timeline;
pub(crate) mod vertical;

pub use crate::foundation::core::{Anchor, Point, Rect, SectionId, Vec2, Viewport};
pub use crate::foundation::error::{ScrollreelError, ScrollreelResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::keyframes::{Keyframe, Keyframes, Lerp};
pub use crate::choreography::hero_about::{HeroAnchors, TransitionWindow, build_transition};
pub use crate::choreography::stage::{StageCursor, StagePlan, StageWindow, TransitionStage};
pub use crate::config::{
    ChoreoConfig, InternalMotion, MotionConfig, NavConfig, PanelConfig, RevealLength,
    TransitionFractions, VerticalConfig,
};
pub use crate::experience::Experience;
pub use crate::host::{LayoutProbe, PageHost, ScrollPort, StyleSink};
pub use crate::layout::measure::{
    AnchorReading, Measurements, PanelMeasurement, measure_panels, read_anchors,
};
pub use crate::layout::schedule::{InternalKind, Phase, PhaseKind, Schedule};
pub use crate::motion::{MotionMode, MotionSignals, select_motion_mode};
pub use crate::navigation::{
    JumpController, JumpId, JumpStatus, JumpStep, NavSection, ScrollOrigin, find_nav_section,
    home_nav_sections,
};
pub use crate::resolve::{JumpTarget, SectionResolver, SectionSpan};
pub use crate::scroll::driver::{FrameReport, ScrollDriver};
pub use crate::scroll::frame::{Dirty, FrameCoalescer, FrameWork};
pub use crate::signal::{ReadSignal, Signal, SubId};
pub use crate::snapshot::{DocumentBox, HostRecord, PageSnapshot, PanelSnapshot};
pub use crate::timeline::builder::build_timeline;
pub use crate::timeline::model::{
    Pose, PoseEntry, Prop, Segment, SegmentKind, Target, Timeline, TimelineBuilder,
};
pub use crate::timeline::reveal::build_reveal;
pub use crate::vertical::VerticalTracker;
