/// Errors that stop an assessment run.
///
/// Recoverable conditions (a flat intensity range, an off-center phantom) are not
/// errors; they surface as flags on the windowed image and the circle detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// The image has zero rows or zero columns.
    EmptyImage,
    /// Pixel buffer length does not match `rows * cols`.
    DimensionMismatch { expected: usize, got: usize },
    /// A pixel is NaN or infinite.
    NonFiniteSample { row: usize, col: usize },
    /// A ring sample fell outside the image.
    OutOfBoundsSample { ring: usize, row: i64, col: i64 },
    /// The profile is too short for the smoothing windows.
    UndersizedRadius { len: usize, min: usize },
}

impl std::fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "image has no pixels"),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "data size mismatch: expected {} pixels, got {}", expected, got)
            }
            Self::NonFiniteSample { row, col } => {
                write!(f, "pixel ({}, {}) is not a finite value", row, col)
            }
            Self::OutOfBoundsSample { ring, row, col } => write!(
                f,
                "ring {} samples pixel ({}, {}) outside the image",
                ring, row, col
            ),
            Self::UndersizedRadius { len, min } => write!(
                f,
                "profile of length {} is too short to smooth (need at least {})",
                len, min
            ),
        }
    }
}

impl std::error::Error for AssessmentError {}
