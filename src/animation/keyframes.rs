use crate::{
    animation::ease::Ease,
    foundation::error::{ScrollreelError, ScrollreelResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub at: f64, // timeline units (1 unit == 1 scroll px)
    pub value: T,
    pub ease: Ease, // applied toward the next key
}

/// A property track sampled by position, never by elapsed time.
///
/// Two keys sharing the same `at` form a discontinuity: positions before it
/// approach the first value, the position itself and everything after take the
/// second.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>, // sorted by `at`, never empty
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn starting_at(at: f64, value: T) -> Self {
        Self {
            keys: vec![Keyframe {
                at,
                value,
                ease: Ease::Linear,
            }],
        }
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn last_at(&self) -> f64 {
        self.keys.last().map_or(0.0, |k| k.at)
    }

    pub fn last_value(&self) -> &T {
        // `keys` is never empty: constructed with one key and only appended to.
        &self.keys[self.keys.len() - 1].value
    }

    pub fn push(&mut self, at: f64, value: T, ease: Ease) -> ScrollreelResult<()> {
        if !at.is_finite() {
            return Err(ScrollreelError::timeline("keyframe position must be finite"));
        }
        if at < self.last_at() {
            return Err(ScrollreelError::timeline(format!(
                "keyframe at {at} precedes previous key at {}",
                self.last_at()
            )));
        }
        self.keys.push(Keyframe { at, value, ease });
        Ok(())
    }

    /// Animate from the current value to `to` across `[from_at, to_at]`.
    pub fn tween(&mut self, from_at: f64, to_at: f64, to: T, ease: Ease) -> ScrollreelResult<()> {
        if to_at < from_at {
            return Err(ScrollreelError::timeline(format!(
                "tween ends ({to_at}) before it starts ({from_at})"
            )));
        }
        let current = self.last_value().clone();
        self.push(from_at, current, ease)?;
        self.push(to_at, to, Ease::Linear)
    }

    /// Jump to `value` at `at`, holding the current value until then.
    pub fn set(&mut self, at: f64, value: T) -> ScrollreelResult<()> {
        let current = self.last_value().clone();
        self.push(at, current, Ease::Linear)?;
        self.push(at, value, Ease::Linear)
    }

    pub fn sample(&self, at: f64) -> T {
        let idx = self.keys.partition_point(|k| k.at <= at);

        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.last_value().clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return a.value.clone();
        }

        let t = (at - a.at) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}
