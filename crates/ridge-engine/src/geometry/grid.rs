use glam::Vec3;

/// Independent line strips over a flat lattice.
///
/// Invariants:
/// - `strips().len() == height`
/// - every strip holds exactly `width` points
/// - point `i` of strip `j` is `(-width/2 + i, 0, -height/2 + j)`
#[derive(Debug, Clone, PartialEq)]
pub struct LineGrid {
    width: u32,
    strips: Vec<Vec<Vec3>>,
}

impl LineGrid {
    /// Strips in ascending z.
    #[inline]
    pub fn strips(&self) -> &[Vec<Vec3>] {
        &self.strips
    }

    /// Points per strip.
    #[inline]
    pub fn strip_len(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }
}

/// One dense row-major point set on the `y = 0` plane.
pub fn create_grid(width: u32, height: u32) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(width as usize * height as usize);
    for z in lattice(height) {
        points.extend(lattice(width).map(|x| Vec3::new(x, 0.0, z)));
    }
    points
}

/// `height` strips of `width` points each, on the same lattice as [`create_grid`].
pub fn create_line_grid(width: u32, height: u32) -> LineGrid {
    let strips = lattice(height)
        .map(|z| lattice(width).map(|x| Vec3::new(x, 0.0, z)).collect())
        .collect();
    LineGrid { width, strips }
}

/// `n` unit steps starting at `-n/2`.
fn lattice(n: u32) -> impl Iterator<Item = f32> {
    let half = n as f32 * 0.5;
    (0..n).map(move |i| -half + i as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z)
    }

    #[test]
    fn line_grid_small_example() {
        let grid = create_line_grid(4, 2);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.strip_len(), 4);
        assert_eq!(
            grid.strips()[0],
            [v(-2.0, 0.0, -1.0), v(-1.0, 0.0, -1.0), v(0.0, 0.0, -1.0), v(1.0, 0.0, -1.0)]
        );
        assert_eq!(
            grid.strips()[1],
            [v(-2.0, 0.0, 0.0), v(-1.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn line_grid_shape_matches_dimensions() {
        let grid = create_line_grid(512, 128);
        assert_eq!(grid.len(), 128);
        assert!(grid.strips().iter().all(|s| s.len() == 512));
        assert_eq!(grid.strips()[0][0], v(-256.0, 0.0, -64.0));
        assert_eq!(grid.strips()[127][511], v(255.0, 0.0, 63.0));
    }

    #[test]
    fn odd_dimensions_keep_counts() {
        let grid = create_line_grid(3, 3);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.strips()[0][0], v(-1.5, 0.0, -1.5));
        assert_eq!(grid.strips()[2][2], v(0.5, 0.0, 0.5));
    }

    #[test]
    fn dense_grid_is_row_major_concatenation() {
        let dense = create_grid(4, 2);
        let lines = create_line_grid(4, 2);
        assert_eq!(dense.len(), 8);
        assert_eq!(dense, lines.strips().concat());
    }

    #[test]
    fn zero_sized_grids_are_empty() {
        assert!(create_grid(0, 5).is_empty());
        let grid = create_line_grid(0, 2);
        assert_eq!(grid.len(), 2);
        assert!(grid.strips().iter().all(Vec::is_empty));
        assert!(create_line_grid(4, 0).is_empty());
    }
}
