use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::SectionId,
        error::{ScrollreelError, ScrollreelResult},
    },
};

/// Static description of a page's scroll choreography.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChoreoConfig {
    pub panels: Vec<PanelConfig>, // pinned sequence order
    pub post_pin_section: SectionId,
    pub transition: TransitionFractions,
    pub motion: MotionConfig,
    pub navigation: NavConfig,
    pub vertical: VerticalConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelConfig {
    pub id: SectionId,
    #[serde(default)]
    pub internal: InternalMotion,
}

/// What a panel does with the scroll budget it receives after being revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InternalMotion {
    #[default]
    None,
    /// Vertical sub-scroll through content taller than the viewport.
    Scroll,
    /// Pinned property reveal of a fixed scroll length.
    Reveal { length: RevealLength },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealLength {
    ViewportMultiple(f64),
    Pixels(f64),
}

impl RevealLength {
    pub fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Self::ViewportMultiple(m) => (m * viewport_height).max(0.0),
            Self::Pixels(px) => px.max(0.0),
        }
    }
}

/// Share of the first slide phase given to each choreography stage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionFractions {
    pub hold: f64,
    pub compose: f64,
    pub collapse: f64,
    pub jump: f64,
    pub settle: f64,
}

impl Default for TransitionFractions {
    fn default() -> Self {
        Self {
            hold: 0.35,
            compose: 0.20,
            collapse: 0.20,
            jump: 0.15,
            settle: 0.10,
        }
    }
}

impl TransitionFractions {
    pub fn as_array(&self) -> [f64; 5] {
        [self.hold, self.compose, self.collapse, self.jump, self.settle]
    }

    pub fn validate(&self) -> ScrollreelResult<()> {
        let parts = self.as_array();
        if parts.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(ScrollreelError::validation(
                "transition fractions must be finite and > 0",
            ));
        }
        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ScrollreelError::validation(format!(
                "transition fractions must sum to 1 (got {sum})"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub narrow_breakpoint_px: f64,
    /// Keep the pinned layout under reduced motion, with the simplified cross-fade.
    pub pin_under_reduced_motion: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint_px: 1024.0,
            pin_under_reduced_motion: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub jump_duration_secs: f64,
    pub ease: Ease,
    pub self_scroll_tolerance_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            jump_duration_secs: 0.8,
            ease: Ease::Power2InOut,
            self_scroll_tolerance_px: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    pub root_margin_fraction: f64,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            root_margin_fraction: 0.3,
        }
    }
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            panels: vec![
                PanelConfig {
                    id: SectionId::new("hero"),
                    internal: InternalMotion::None,
                },
                PanelConfig {
                    id: SectionId::new("about"),
                    internal: InternalMotion::Reveal {
                        length: RevealLength::ViewportMultiple(1.0),
                    },
                },
                PanelConfig {
                    id: SectionId::new("projects"),
                    internal: InternalMotion::Scroll,
                },
                PanelConfig {
                    id: SectionId::new("blogs"),
                    internal: InternalMotion::Scroll,
                },
            ],
            post_pin_section: SectionId::new("cta"),
            transition: TransitionFractions::default(),
            motion: MotionConfig::default(),
            navigation: NavConfig::default(),
            vertical: VerticalConfig::default(),
        }
    }
}

impl ChoreoConfig {
    pub fn from_json_str(s: &str) -> ScrollreelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.panels.iter().map(|p| &p.id)
    }

    /// Every section the page knows about, pinned panels first.
    pub fn all_sections(&self) -> Vec<SectionId> {
        self.panel_ids()
            .cloned()
            .chain(std::iter::once(self.post_pin_section.clone()))
            .collect()
    }

    pub fn knows(&self, id: &SectionId) -> bool {
        *id == self.post_pin_section || self.panel_ids().any(|p| p == id)
    }

    pub fn validate(&self) -> ScrollreelResult<()> {
        if self.panels.is_empty() {
            return Err(ScrollreelError::validation("at least one panel is required"));
        }

        let mut seen = BTreeSet::new();
        for panel in &self.panels {
            if panel.id.as_str().trim().is_empty() {
                return Err(ScrollreelError::validation("panel id must be non-empty"));
            }
            if !seen.insert(&panel.id) {
                return Err(ScrollreelError::validation(format!(
                    "duplicate panel id '{}'",
                    panel.id
                )));
            }
            if let InternalMotion::Reveal { length } = panel.internal {
                let v = match length {
                    RevealLength::ViewportMultiple(v) | RevealLength::Pixels(v) => v,
                };
                if !v.is_finite() || v < 0.0 {
                    return Err(ScrollreelError::validation(format!(
                        "panel '{}' reveal length must be finite and >= 0",
                        panel.id
                    )));
                }
            }
        }
        if seen.contains(&self.post_pin_section) {
            return Err(ScrollreelError::validation(format!(
                "post-pin section '{}' must not also be a pinned panel",
                self.post_pin_section
            )));
        }

        self.transition.validate()?;

        if !self.motion.narrow_breakpoint_px.is_finite() || self.motion.narrow_breakpoint_px < 0.0
        {
            return Err(ScrollreelError::validation(
                "motion.narrow_breakpoint_px must be finite and >= 0",
            ));
        }
        let nav = &self.navigation;
        if !nav.jump_duration_secs.is_finite() || nav.jump_duration_secs < 0.0 {
            return Err(ScrollreelError::validation(
                "navigation.jump_duration_secs must be finite and >= 0",
            ));
        }
        if !nav.self_scroll_tolerance_px.is_finite() || nav.self_scroll_tolerance_px < 0.0 {
            return Err(ScrollreelError::validation(
                "navigation.self_scroll_tolerance_px must be finite and >= 0",
            ));
        }
        let margin = self.vertical.root_margin_fraction;
        if !margin.is_finite() || !(0.0..0.5).contains(&margin) {
            return Err(ScrollreelError::validation(
                "vertical.root_margin_fraction must be in [0, 0.5)",
            ));
        }
        Ok(())
    }
}
