//! Host-side grid geometry.
//!
//! Two generation strategies over the same lattice:
//! - independent line strips, one per row (the rendered default)
//! - one dense row-major point set (alternate mode)
//!
//! Everything here is pure; uploading happens in [`crate::render::BufferSet`].

mod grid;

use glam::Vec3;

use crate::render::DrawMode;

pub use grid::{create_grid, create_line_grid, LineGrid};

/// Selects the generation strategy.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum GeometryMode {
    #[default]
    LineStrips,
    DenseMesh,
}

/// Generated geometry, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Lines(LineGrid),
    Mesh(Vec<Vec3>),
}

impl Geometry {
    pub fn build(mode: GeometryMode, width: u32, height: u32) -> Self {
        match mode {
            GeometryMode::LineStrips => Self::Lines(create_line_grid(width, height)),
            GeometryMode::DenseMesh => Self::Mesh(create_grid(width, height)),
        }
    }

    /// Primitive each batch is drawn with.
    pub fn draw_mode(&self) -> DrawMode {
        match self {
            Self::Lines(_) => DrawMode::LineStrip,
            Self::Mesh(_) => DrawMode::Points,
        }
    }

    /// Vertex batches in draw order; each becomes one buffer.
    pub fn batches(&self) -> Vec<&[Vec3]> {
        match self {
            Self::Lines(grid) => grid.strips().iter().map(Vec::as_slice).collect(),
            Self::Mesh(points) => vec![points.as_slice()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_strips_yield_one_batch_per_row() {
        let geometry = Geometry::build(GeometryMode::LineStrips, 8, 3);
        assert_eq!(geometry.draw_mode(), DrawMode::LineStrip);
        let batches = geometry.batches();
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 8));
        // Ascending z across batches.
        assert!(batches.windows(2).all(|w| w[0][0].z < w[1][0].z));
    }

    #[test]
    fn dense_mesh_is_a_single_point_batch() {
        let geometry = Geometry::build(GeometryMode::DenseMesh, 8, 3);
        assert_eq!(geometry.draw_mode(), DrawMode::Points);
        let batches = geometry.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 24);
    }

    #[test]
    fn default_mode_is_line_strips() {
        assert_eq!(GeometryMode::default(), GeometryMode::LineStrips);
    }
}
