use serde::Serialize;

use crate::error::AssessmentError;

/// Physical distance between pixel centers, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl Default for PixelSpacing {
    fn default() -> Self {
        Self { row: 1.0, col: 1.0 }
    }
}

/// Row-major grid of real-valued intensities. Every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, AssessmentError> {
        if rows == 0 || cols == 0 {
            return Err(AssessmentError::EmptyImage);
        }
        if data.len() != rows * cols {
            return Err(AssessmentError::DimensionMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(AssessmentError::NonFiniteSample {
                row: index / cols,
                col: index % cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Grid with every pixel set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self, AssessmentError> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Bounds-checked access with signed coordinates.
    #[inline]
    pub fn try_get(&self, row: i64, col: i64) -> Option<f64> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(self.get(row as usize, col as usize))
    }

    /// New grid with `f` applied to every pixel.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A calibrated CT slice: intensities plus pixel spacing.
#[derive(Debug, Clone)]
pub struct Image {
    pub pixels: Grid,
    pub spacing: PixelSpacing,
}

impl Image {
    pub fn new(
        rows: usize,
        cols: usize,
        data: Vec<f64>,
        spacing: PixelSpacing,
    ) -> Result<Self, AssessmentError> {
        Ok(Self {
            pixels: Grid::new(rows, cols, data)?,
            spacing,
        })
    }

    pub fn rows(&self) -> usize {
        self.pixels.rows
    }

    pub fn cols(&self) -> usize {
        self.pixels.cols
    }
}
