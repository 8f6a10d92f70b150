use gazept_core::Vec2;

/// Targets evenly spaced on a ring around the screen center
#[derive(Debug, Clone, PartialEq)]
pub struct TargetLayout {
    pub center: Vec2,
    pub radius: f32,
    pub count: u32,
}

impl TargetLayout {
    pub fn new(center: Vec2, radius: f32, count: u32) -> Self {
        Self {
            center,
            radius,
            count: count.max(1),
        }
    }

    pub fn angle_of(&self, index: u32) -> f32 {
        (index % self.count) as f32 * 360.0 / self.count as f32
    }

    pub fn center_of(&self, index: u32) -> Vec2 {
        Vec2::from_polar(self.center, self.radius, self.angle_of(index))
    }

    /// Alternating order across the ring: 0, n/2, 1, n/2 + 1, ...
    ///
    /// With an odd count every target is visited once per lap and each move
    /// crosses (nearly) the full diameter.
    pub fn sequence(&self) -> Vec<u32> {
        let half = self.count.div_ceil(2);
        (0..self.count)
            .map(|i| {
                if i % 2 == 0 {
                    i / 2
                } else {
                    (half + i / 2) % self.count
                }
            })
            .collect()
    }

    /// Ring index of the `trial`-th target, with the sequence rotated by `offset`
    pub fn target_for_trial(&self, trial: u32, offset: u32) -> u32 {
        let seq = self.sequence();
        let pos = (trial + offset) as usize % seq.len();
        seq[pos]
    }
}
