/// How a fractional voxel coordinate snaps to an integer index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Ties go to the even neighbour (`2.5 -> 2`, `3.5 -> 4`).
    #[default]
    HalfEven,
    /// Ties go away from zero (`2.5 -> 3`, `-2.5 -> -3`).
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Rounds `value` to the nearest integer under this mode.
    #[must_use]
    pub fn round(self, value: f64) -> f64 {
        match self {
            Self::HalfEven => value.round_ties_even(),
            Self::HalfAwayFromZero => value.round(),
        }
    }

    /// Rounds `value` to an integer voxel index.
    ///
    /// Returns `None` for NaN and infinities. Finite values beyond the
    /// `i64` range saturate, which always lands outside any domain.
    #[must_use]
    pub fn to_index(self, value: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = self.round(value) as i64;
        Some(index)
    }
}
