quantity!(Liters, f64, "L");

impl Liters {
    /// Smallest fuel decrease that counts as consumption rather than sensor noise.
    pub const NOISE_FLOOR: Self = Self(0.1);
}

impl Default for Liters {
    fn default() -> Self {
        Self::zero()
    }
}
