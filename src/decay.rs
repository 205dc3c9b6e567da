/// A strategy for decaying a value once per episode
pub trait Decay {
    /// Calculate the value for the next episode from the current one
    fn decay(&self, value: f32) -> f32;
}

/// v<sub>t+1</sub> = v<sub>t</sub> * r while v<sub>t</sub> > v<sub>f</sub>, otherwise unchanged
///
/// The last multiplication may land below the floor; the value is never
/// clamped up to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometric {
    rate: f32,
    floor: f32,
}

impl Geometric {
    pub fn new(rate: f32, floor: f32) -> Self {
        Self { rate, floor }
    }
}

impl Decay for Geometric {
    fn decay(&self, value: f32) -> f32 {
        if value > self.floor {
            value * self.rate
        } else {
            value
        }
    }
}
