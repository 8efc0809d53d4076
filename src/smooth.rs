/// Boundary-aware moving median over a radial profile.
///
/// Interior points take the median of a six-wide window `p[i-3..i+3]`. The two
/// first and two last points are extrapolated as `factor * median3 - median5`
/// from the values at that end of the profile.
use crate::error::AssessmentError;
use crate::rings::RadialProfile;

/// Shortest profile the boundary windows can handle.
pub const MIN_PROFILE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedProfile(pub Vec<f64>);

impl SmoothedProfile {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Median of a non-empty slice; even lengths average the two middle values.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn smooth_values(values: &[f64], factor: f64) -> Result<Vec<f64>, AssessmentError> {
    let len = values.len();
    if len < MIN_PROFILE_LEN {
        return Err(AssessmentError::UndersizedRadius {
            len,
            min: MIN_PROFILE_LEN,
        });
    }

    let mut smoothed = vec![0.0; len];

    let head = factor * median(&values[..3]) - median(&values[..5]);
    smoothed[0] = head;
    smoothed[1] = head;

    let tail = factor * median(&values[len - 3..]) - median(&values[len - 5..]);
    smoothed[len - 1] = tail;
    smoothed[len - 2] = tail;

    // Index 2 sits between the head pair and the first full window
    smoothed[2] = median(&values[..5]);

    for i in 3..=len - 3 {
        smoothed[i] = median(&values[i - 3..i + 3]);
    }

    Ok(smoothed)
}

pub fn smooth_profile(
    profile: &RadialProfile,
    factor: f64,
) -> Result<SmoothedProfile, AssessmentError> {
    smooth_values(profile.values(), factor).map(SmoothedProfile)
}
