use crate::{
    config::TransitionFractions,
    foundation::error::{ScrollreelError, ScrollreelResult},
};

/// Sub-phases of the hero→about choreography, in the only order they may run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStage {
    Hold,
    Compose,
    Collapse,
    Jump,
    Settle,
}

impl TransitionStage {
    pub const ALL: [Self; 5] = [
        Self::Hold,
        Self::Compose,
        Self::Collapse,
        Self::Jump,
        Self::Settle,
    ];

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Hold => Some(Self::Compose),
            Self::Compose => Some(Self::Collapse),
            Self::Collapse => Some(Self::Jump),
            Self::Jump => Some(Self::Settle),
            Self::Settle => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StageWindow {
    pub stage: TransitionStage,
    pub start: f64,
    pub end: f64,
}

impl StageWindow {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Absolute position `f` of the way through this window.
    pub fn at(&self, f: f64) -> f64 {
        self.start + self.length() * f
    }
}

/// The five stage windows laid over one slide phase.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StagePlan {
    windows: [StageWindow; 5],
}

impl StagePlan {
    /// Split `[start, start + length]` by `fractions`. The last window absorbs
    /// rounding so that it ends exactly at the phase end.
    pub fn new(start: f64, length: f64, fractions: &TransitionFractions) -> Self {
        let parts = fractions.as_array();
        let end = start + length;
        let mut cursor = start;
        let windows = std::array::from_fn(|i| {
            let stage = TransitionStage::ALL[i];
            let stage_end = if i == 4 {
                end
            } else {
                (cursor + length * parts[i]).min(end)
            };
            let w = StageWindow {
                stage,
                start: cursor,
                end: stage_end,
            };
            cursor = stage_end;
            w
        });
        Self { windows }
    }

    pub fn window(&self, stage: TransitionStage) -> &StageWindow {
        &self.windows[stage.index()]
    }

    pub fn windows(&self) -> &[StageWindow] {
        &self.windows
    }

    pub fn start(&self) -> f64 {
        self.windows[0].start
    }

    pub fn end(&self) -> f64 {
        self.windows[4].end
    }

    /// Stage owning position `at`, or `None` outside the plan. Boundaries belong
    /// to the later stage; the plan end belongs to `Settle`.
    pub fn stage_at(&self, at: f64) -> Option<TransitionStage> {
        if !(self.start()..=self.end()).contains(&at) {
            return None;
        }
        self.windows
            .iter()
            .rev()
            .find(|w| at >= w.start && w.end > w.start)
            .or_else(|| self.windows.first())
            .map(|w| w.stage)
    }
}

/// Build-time guard that stages are emitted once each, in order.
#[derive(Debug, Default)]
pub struct StageCursor {
    current: Option<TransitionStage>,
}

impl StageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TransitionStage> {
        self.current
    }

    pub fn enter(&mut self, stage: TransitionStage) -> ScrollreelResult<()> {
        let expected = match self.current {
            None => Some(TransitionStage::Hold),
            Some(s) => s.next(),
        };
        if expected != Some(stage) {
            return Err(ScrollreelError::timeline(format!(
                "stage {stage:?} cannot follow {:?}",
                self.current
            )));
        }
        self.current = Some(stage);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.current == Some(TransitionStage::Settle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_uses_default_fractions() {
        let plan = StagePlan::new(100.0, 1000.0, &TransitionFractions::default());
        let hold = plan.window(TransitionStage::Hold);
        assert_eq!(hold.start, 100.0);
        assert!((hold.length() - 350.0).abs() < 1e-9);
        assert!((plan.window(TransitionStage::Jump).start - 850.0).abs() < 1e-9);
        assert_eq!(plan.end(), 1100.0);
    }

    #[test]
    fn windows_are_contiguous() {
        let plan = StagePlan::new(0.0, 777.0, &TransitionFractions::default());
        for w in plan.windows().windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
    }

    #[test]
    fn stage_at_boundaries() {
        let plan = StagePlan::new(0.0, 1000.0, &TransitionFractions::default());
        assert_eq!(plan.stage_at(0.0), Some(TransitionStage::Hold));
        assert_eq!(plan.stage_at(349.0), Some(TransitionStage::Hold));
        assert_eq!(plan.stage_at(800.0), Some(TransitionStage::Jump));
        assert_eq!(plan.stage_at(950.0), Some(TransitionStage::Settle));
        assert_eq!(plan.stage_at(1000.0), Some(TransitionStage::Settle));
        assert_eq!(plan.stage_at(1000.5), None);
        assert_eq!(plan.stage_at(-1.0), None);
    }

    #[test]
    fn cursor_enforces_order() {
        let mut c = StageCursor::new();
        assert!(c.enter(TransitionStage::Compose).is_err());
        for s in TransitionStage::ALL {
            c.enter(s).unwrap();
        }
        assert!(c.is_complete());
        assert!(c.enter(TransitionStage::Hold).is_err());
    }

    #[test]
    fn cursor_rejects_repeats() {
        let mut c = StageCursor::new();
        c.enter(TransitionStage::Hold).unwrap();
        assert!(c.enter(TransitionStage::Hold).is_err());
        assert_eq!(c.current(), Some(TransitionStage::Hold));
    }
}
