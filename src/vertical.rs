//! Section detection for the non-pinned layout.
//!
//! Works from section rectangles alone: no schedule, no pin. Each section's
//! visibility is its intersected height with an observation band (the viewport
//! shrunk at top and bottom) divided by its own height.

use crate::{
    config::VerticalConfig,
    foundation::core::{Rect, SectionId, Viewport},
    host::LayoutProbe,
};

#[derive(Clone, Debug)]
pub struct VerticalTracker {
    sections: Vec<SectionId>, // document order
    margin: f64,
    active: Option<SectionId>,
}

impl VerticalTracker {
    pub fn new(sections: Vec<SectionId>, cfg: &VerticalConfig) -> Self {
        let active = sections.first().cloned();
        Self {
            sections,
            margin: cfg.root_margin_fraction,
            active,
        }
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    fn band(&self, viewport: Viewport) -> (f64, f64) {
        let inset = viewport.height * self.margin;
        (inset, viewport.height - inset)
    }

    /// Visible share of `rect` inside the observation band, in `[0, 1]`.
    pub fn ratio(&self, rect: Rect, viewport: Viewport) -> f64 {
        let (top, bottom) = self.band(viewport);
        let h = rect.height();
        if h <= 0.0 {
            return 0.0;
        }
        let overlap = rect.y1.min(bottom) - rect.y0.max(top);
        (overlap / h).clamp(0.0, 1.0)
    }

    /// Re-evaluate from live rects. Returns the new section when it changed.
    pub fn update<P: LayoutProbe + ?Sized>(&mut self, probe: &P) -> Option<SectionId> {
        let viewport = probe.viewport();
        let mut best: Option<(f64, &SectionId)> = None;
        for id in &self.sections {
            let Some(rect) = probe.section_viewport_rect(id) else {
                continue;
            };
            let r = self.ratio(rect, viewport);
            if r <= 0.0 {
                continue;
            }
            // Strict comparison: ties keep the earlier section.
            if best.is_none_or(|(b, _)| r > b) {
                best = Some((r, id));
            }
        }

        let (_, winner) = best?;
        if self.active.as_ref() == Some(winner) {
            return None;
        }
        let winner = winner.clone();
        self.active = Some(winner.clone());
        Some(winner)
    }

    /// Offset that brings `section` to the top of the viewport.
    pub fn encode<P>(&self, probe: &P, section: &SectionId) -> Option<f64>
    where
        P: LayoutProbe + ?Sized,
    {
        if !self.sections.contains(section) {
            return None;
        }
        probe.section_document_offset(section)
    }

    /// Force the active section. Used when a jump settles on its target.
    pub fn set_active(&mut self, section: SectionId) {
        self.active = Some(section);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::foundation::core::Anchor;

    struct Page {
        scroll: f64,
        tops: BTreeMap<SectionId, (f64, f64)>, // document top, height
    }

    impl Page {
        fn new(heights: &[(&str, f64)]) -> Self {
            let mut top = 0.0;
            let mut tops = BTreeMap::new();
            for (id, h) in heights {
                tops.insert(SectionId::new(*id), (top, *h));
                top += h;
            }
            Self { scroll: 0.0, tops }
        }
    }

    impl LayoutProbe for Page {
        fn viewport(&self) -> Viewport {
            Viewport {
                width: 390.0,
                height: 1000.0,
            }
        }
        fn track_width(&self) -> Option<f64> {
            None
        }
        fn panel_scroll_height(&self, _: &SectionId) -> Option<f64> {
            None
        }
        fn anchor_rect(&self, _: &SectionId, _: Anchor) -> Option<Rect> {
            None
        }
        fn pin_start(&self) -> f64 {
            0.0
        }
        fn scroll_offset(&self) -> f64 {
            self.scroll
        }
        fn section_document_offset(&self, section: &SectionId) -> Option<f64> {
            self.tops.get(section).map(|(t, _)| *t)
        }
        fn section_viewport_rect(&self, section: &SectionId) -> Option<Rect> {
            let (top, h) = *self.tops.get(section)?;
            let y = top - self.scroll;
            Some(Rect::new(0.0, y, 390.0, y + h))
        }
    }

    fn tracker() -> VerticalTracker {
        let ids = ["hero", "about", "projects"].map(SectionId::new).to_vec();
        VerticalTracker::new(ids, &VerticalConfig::default())
    }

    #[test]
    fn ratio_uses_shrunk_band() {
        let t = tracker();
        let vp = Viewport {
            width: 390.0,
            height: 1000.0,
        };
        // band is 300..700
        assert_eq!(t.ratio(Rect::new(0.0, 0.0, 1.0, 300.0), vp), 0.0);
        assert_eq!(t.ratio(Rect::new(0.0, 200.0, 1.0, 400.0), vp), 0.5);
        assert_eq!(t.ratio(Rect::new(0.0, 350.0, 1.0, 650.0), vp), 1.0);
    }

    #[test]
    fn highest_ratio_wins() {
        let mut page = Page::new(&[("hero", 1000.0), ("about", 600.0), ("projects", 2000.0)]);
        let mut t = tracker();
        assert_eq!(t.update(&page), None); // hero already active
        page.scroll = 900.0;
        assert_eq!(t.update(&page).map(|s| s.to_string()), Some("about".into()));
        assert_eq!(t.active().map(SectionId::as_str), Some("about"));
    }

    #[test]
    fn ties_go_to_document_order() {
        // hero and about straddle the band's center: 0.2 each
        let mut page = Page::new(&[("hero", 1000.0), ("about", 1000.0), ("projects", 1000.0)]);
        page.scroll = 500.0;
        let mut t = tracker();
        t.set_active(SectionId::new("projects"));
        assert_eq!(t.update(&page).map(|s| s.to_string()), Some("hero".into()));
    }

    #[test]
    fn nothing_visible_keeps_previous() {
        let mut page = Page::new(&[("hero", 100.0), ("about", 100.0), ("projects", 100.0)]);
        page.scroll = 5000.0;
        let mut t = tracker();
        t.set_active(SectionId::new("about"));
        assert_eq!(t.update(&page), None);
        assert_eq!(t.active().map(SectionId::as_str), Some("about"));
    }

    #[test]
    fn encode_uses_document_offsets() {
        let page = Page::new(&[("hero", 900.0), ("about", 700.0), ("projects", 100.0)]);
        let t = tracker();
        assert_eq!(t.encode(&page, &"about".into()), Some(900.0));
        assert_eq!(t.encode(&page, &"contact".into()), None);
    }
}
