/// Thresholding and edge filtering used to find the phantom outline.
///
/// The edge map works on 8-bit data: the thresholded intensities are clamped to
/// 0..255 and truncated, the same way a grayscale conversion of the slice would.
use crate::grid::Grid;

/// 8-bit single channel buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn count_edges(&self) -> usize {
        self.data.iter().filter(|&&p| p > 0).count()
    }
}

/// Copy of `clipped` with every pixel below `cutoff` set to zero.
pub fn threshold_below(clipped: &Grid, cutoff: f64) -> Grid {
    clipped.map(|v| if v < cutoff { 0.0 } else { v })
}

/// Grayscale conversion: clamp to the u8 range and truncate.
pub fn to_gray8(grid: &Grid) -> Vec<u8> {
    grid.data
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect()
}

/// 3x3 "find edges" filter.
///
/// Kernel is `[-1 -1 -1; -1 8 -1; -1 -1 -1]`, responses are clamped to 0..255 and
/// the outermost ring of pixels is copied from the input unchanged.
pub struct FindEdges;

impl FindEdges {
    const KERNEL: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

    pub fn apply(&self, image: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut result = image.to_vec();
        if width < 3 || height < 3 {
            return result;
        }

        for y in 1..(height - 1) {
            for x in 1..(width - 1) {
                let mut sum = 0i32;
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        let k = Self::KERNEL[((dy + 1) * 3 + (dx + 1)) as usize];
                        let idx = ((y as i32 + dy) as usize) * width + (x as i32 + dx) as usize;
                        sum += k * image[idx] as i32;
                    }
                }
                result[y * width + x] = sum.clamp(0, 255) as u8;
            }
        }

        result
    }
}

/// Threshold the clipped image at `cutoff` and run the edge filter over it.
pub fn edge_map(clipped: &Grid, cutoff: f64) -> EdgeMap {
    let thresholded = threshold_below(clipped, cutoff);
    let gray = to_gray8(&thresholded);
    let data = FindEdges.apply(&gray, clipped.cols, clipped.rows);
    EdgeMap {
        rows: clipped.rows,
        cols: clipped.cols,
        data,
    }
}
