//! Source-side preparation: rotation about the canvas center and
//! synthetic test patterns.

use ndarray::Array2;

/// Rotations smaller than this (degrees) return the image unchanged.
const MIN_ROTATION_DEG: f64 = 0.1;

/// Rotate counter-clockwise by `angle_deg` about (cols/2, rows/2).
///
/// Bilinear sampling. Samples that fall outside the source take the image mean.
pub fn rotate_about_center(image: &Array2<f64>, angle_deg: f64) -> Array2<f64> {
    if angle_deg.abs() <= MIN_ROTATION_DEG {
        return image.clone();
    }
    let (rows, cols) = image.dim();
    let fill = image.mean().unwrap_or(0.0);
    let (cx, cy) = ((cols / 2) as f64, (rows / 2) as f64);
    let (sin, cos) = angle_deg.to_radians().sin_cos();

    let sample = |x: isize, y: isize| -> f64 {
        if x < 0 || y < 0 || x as usize >= cols || y as usize >= rows {
            fill
        } else {
            image[[y as usize, x as usize]]
        }
    };

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        // Inverse map: destination pixel back into the source frame
        let dx = c as f64 - cx;
        let dy = r as f64 - cy;
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;

        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = sample(x0, y0) * (1.0 - fx) + sample(x0 + 1, y0) * fx;
        let bottom = sample(x0, y0 + 1) * (1.0 - fx) + sample(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    })
}

/// Synthetic planes for exercising the filters.
pub mod patterns {
    use ndarray::Array2;

    pub fn constant(rows: usize, cols: usize, value: f64) -> Array2<f64> {
        Array2::from_elem((rows, cols), value)
    }

    /// Single bright pixel on black.
    pub fn impulse(rows: usize, cols: usize, at: (usize, usize), value: f64) -> Array2<f64> {
        let mut img = Array2::zeros((rows, cols));
        if at.0 < rows && at.1 < cols {
            img[at] = value;
        }
        img
    }

    /// `height`×`width` bright block centered on black.
    pub fn centered_rectangle(
        rows: usize,
        cols: usize,
        height: usize,
        width: usize,
        value: f64,
    ) -> Array2<f64> {
        let top = rows.saturating_sub(height) / 2;
        let left = cols.saturating_sub(width) / 2;
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            if r >= top && r < top + height && c >= left && c < left + width {
                value
            } else {
                0.0
            }
        })
    }

    /// Vertical bars `bar` pixels wide separated by `gap` black pixels.
    pub fn vertical_bars(rows: usize, cols: usize, bar: usize, gap: usize, value: f64) -> Array2<f64> {
        let period = (bar + gap).max(1);
        Array2::from_shape_fn((rows, cols), |(_, c)| {
            if c % period < bar {
                value
            } else {
                0.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::patterns::*;
    use super::*;

    #[test]
    fn test_small_angle_is_identity() {
        let img = centered_rectangle(8, 8, 2, 4, 200.0);
        assert_eq!(rotate_about_center(&img, 0.05), img);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let img = impulse(9, 9, (4, 6), 255.0);
        let rotated = rotate_about_center(&img, 90.0);
        // (x=6, y=4) is 2 px right of center; counter-clockwise puts it 2 px above
        let (row, col) = rotated
            .indexed_iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!((row, col), (2, 4));
        assert!((rotated[[2, 4]] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_fills_border_with_mean() {
        let img = constant(10, 10, 40.0);
        let rotated = rotate_about_center(&img, 45.0);
        assert!(rotated.iter().all(|&v| (v - 40.0).abs() < 1e-9));
    }

    #[test]
    fn test_rotation_does_not_mutate_input() {
        let img = centered_rectangle(12, 12, 4, 8, 255.0);
        let copy = img.clone();
        let _ = rotate_about_center(&img, 30.0);
        assert_eq!(img, copy);
    }

    #[test]
    fn test_patterns() {
        let rect = centered_rectangle(8, 8, 2, 4, 9.0);
        assert_eq!(rect.iter().filter(|&&v| v == 9.0).count(), 8);
        assert_eq!(rect[[3, 2]], 9.0);
        assert_eq!(rect[[2, 2]], 0.0);

        let bars = vertical_bars(2, 6, 1, 2, 5.0);
        assert_eq!(bars.row(0).to_vec(), vec![5.0, 0.0, 0.0, 5.0, 0.0, 0.0]);

        let imp = impulse(4, 4, (1, 2), 255.0);
        assert_eq!(imp.sum(), 255.0);
        assert_eq!(impulse(4, 4, (9, 9), 1.0).sum(), 0.0);
    }
}
