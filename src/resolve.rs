//! Scroll offset ⇄ section id, computed from the same [`Schedule`] the timeline
//! is built from.

use crate::{foundation::core::SectionId, layout::schedule::Schedule};

/// Contiguous run of phases owned by one section. Covers `(start, end]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionSpan {
    pub section: SectionId,
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl SectionSpan {
    pub fn contains(&self, offset: f64) -> bool {
        offset > self.start && offset <= self.end
    }
}

/// Where a navigation jump should land.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JumpTarget {
    /// Absolute scroll offset inside (or at the start of) the pinned region.
    Offset(f64),
    /// A section outside the pinned region; the host resolves its document position.
    Document(SectionId),
}

/// Read-only view over one schedule version.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionResolver {
    pin_start: f64,
    pin_end: f64,
    first: Option<SectionId>,
    post_pin: SectionId,
    spans: Vec<SectionSpan>,
    first_phase_ends: Vec<(SectionId, f64)>,
}

impl SectionResolver {
    pub fn new(schedule: &Schedule, post_pin: SectionId) -> Self {
        let mut spans: Vec<SectionSpan> = Vec::new();
        let mut first_phase_ends: Vec<(SectionId, f64)> = Vec::new();

        for phase in schedule.phases() {
            match spans.last_mut() {
                Some(span) if span.section == phase.section => span.end = phase.end(),
                _ => {
                    spans.push(SectionSpan {
                        section: phase.section.clone(),
                        index: schedule.section_index(&phase.section).unwrap_or(0),
                        start: phase.start,
                        end: phase.end(),
                    });
                    first_phase_ends.push((phase.section.clone(), phase.end()));
                }
            }
        }

        Self {
            pin_start: schedule.pin_start(),
            pin_end: schedule.pin_end(),
            first: schedule.sections().first().cloned(),
            post_pin,
            spans,
            first_phase_ends,
        }
    }

    pub fn spans(&self) -> &[SectionSpan] {
        &self.spans
    }

    pub fn post_pin(&self) -> &SectionId {
        &self.post_pin
    }

    /// Section active at document scroll `offset`.
    pub fn decode(&self, offset: f64) -> SectionId {
        let Some(first) = &self.first else {
            return self.post_pin.clone();
        };
        if offset > self.pin_end {
            return self.post_pin.clone();
        }
        if offset.is_nan() || offset <= self.pin_start {
            return first.clone();
        }
        self.spans
            .iter()
            .find(|s| s.contains(offset))
            .or_else(|| self.spans.last())
            .map_or_else(|| first.clone(), |s| s.section.clone())
    }

    /// Offset at which `section` is fully revealed, or `None` for an unknown id.
    pub fn encode(&self, section: &SectionId) -> Option<JumpTarget> {
        if *section == self.post_pin {
            return Some(JumpTarget::Document(section.clone()));
        }
        if self.first.as_ref() == Some(section) {
            return Some(JumpTarget::Offset(self.pin_start));
        }
        self.first_phase_ends
            .iter()
            .find(|(id, _)| id == section)
            .map(|(_, end)| JumpTarget::Offset(*end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::Viewport,
        layout::{
            measure::{Measurements, PanelMeasurement},
            schedule::InternalKind,
        },
    };

    fn resolver(pin_start: f64) -> SectionResolver {
        let panels = [("hero", 0.0), ("about", 0.0), ("projects", 1200.0), ("blogs", 0.0)]
            .into_iter()
            .map(|(id, excess)| PanelMeasurement {
                id: SectionId::new(id),
                width: 800.0,
                excess_height: excess,
                internal: Some(InternalKind::Scroll),
            })
            .collect();
        let m = Measurements {
            viewport: Viewport {
                width: 800.0,
                height: 600.0,
            },
            track_width: 800.0,
            panels,
        };
        SectionResolver::new(&Schedule::allocate(pin_start, &m), SectionId::new("cta"))
    }

    #[test]
    fn slide_and_scroll_of_one_section_form_one_span() {
        let r = resolver(0.0);
        let projects: Vec<_> = r
            .spans()
            .iter()
            .filter(|s| s.section.as_str() == "projects")
            .collect();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].start, 800.0);
        assert_eq!(projects[0].end, 2800.0);
    }

    #[test]
    fn decode_edges() {
        let r = resolver(100.0);
        assert_eq!(r.decode(-50.0).as_str(), "hero");
        assert_eq!(r.decode(100.0).as_str(), "hero");
        assert_eq!(r.decode(100.5).as_str(), "about");
        assert_eq!(r.decode(900.0).as_str(), "about");
        assert_eq!(r.decode(900.5).as_str(), "projects");
        assert_eq!(r.decode(3700.0).as_str(), "blogs");
        assert_eq!(r.decode(3700.5).as_str(), "cta");
        assert_eq!(r.decode(f64::NAN).as_str(), "hero");
    }

    #[test]
    fn encode_lands_where_section_is_revealed() {
        let r = resolver(100.0);
        assert_eq!(r.encode(&"hero".into()), Some(JumpTarget::Offset(100.0)));
        assert_eq!(r.encode(&"about".into()), Some(JumpTarget::Offset(900.0)));
        assert_eq!(r.encode(&"projects".into()), Some(JumpTarget::Offset(1700.0)));
        assert_eq!(
            r.encode(&"cta".into()),
            Some(JumpTarget::Document(SectionId::new("cta")))
        );
        assert_eq!(r.encode(&"contact".into()), None);
    }

    #[test]
    fn pinned_sections_round_trip() {
        let r = resolver(37.0);
        for id in ["hero", "about", "projects", "blogs"] {
            let id = SectionId::new(id);
            let Some(JumpTarget::Offset(at)) = r.encode(&id) else {
                panic!("{id} should encode to an offset");
            };
            assert_eq!(r.decode(at), id);
        }
    }
}
