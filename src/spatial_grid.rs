// spatial_grid.rs
// Uniform grid bucketing ball indices by position, rebuilt every frame

use crate::ball::Ball;
use std::collections::HashMap;
use ultraviolet::Vec2;

/// Uniform grid over viewport space keyed by `floor(pos / cell_size)`.
///
/// Correctness of the 3x3 neighbor scan requires `cell_size` to be at least
/// the largest ball diameter; with the default constants the maximum diameter
/// is 118 against a 150 cell. Cells are kept sparse in a map because the
/// viewport is dynamic and a dragged ball may sit outside it.
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn key(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Empty all cells, keeping their allocations for reuse.
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let key = self.key(pos);
        self.cells.entry(key).or_default().push(index);
    }

    /// Clear and re-bucket every ball. The grid must reflect post-integration
    /// positions before the collision pass, so it is rebuilt from scratch
    /// each frame rather than patched incrementally.
    pub fn rebuild(&mut self, balls: &[Ball]) {
        self.clear();
        for (i, ball) in balls.iter().enumerate() {
            self.insert(i, ball.pos);
        }
    }

    /// Indices of all balls in the 3x3 cell neighborhood of ball `i`,
    /// excluding `i` itself. Order is unspecified.
    pub fn neighbors_of(&self, balls: &[Ball], i: usize) -> Vec<usize> {
        let (cx, cy) = self.key(balls[i].pos);
        let mut out = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend(cell.iter().copied().filter(|&j| j != i));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::Ball;

    fn ball_at(x: f32, y: f32) -> Ball {
        let mut b = Ball::new("t", x);
        b.pos = Vec2::new(x, y);
        b
    }

    #[test]
    fn neighbors_within_same_cell() {
        let balls = vec![ball_at(10.0, 10.0), ball_at(20.0, 20.0)];
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&balls);
        assert_eq!(grid.neighbors_of(&balls, 0), vec![1]);
        assert_eq!(grid.neighbors_of(&balls, 1), vec![0]);
    }

    #[test]
    fn neighbors_across_adjacent_cells() {
        // 149 and 151 straddle a cell boundary but are one cell apart.
        let balls = vec![ball_at(149.0, 10.0), ball_at(151.0, 10.0)];
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&balls);
        assert_eq!(grid.neighbors_of(&balls, 0), vec![1]);
    }

    #[test]
    fn distant_balls_are_not_neighbors() {
        let balls = vec![ball_at(10.0, 10.0), ball_at(500.0, 500.0)];
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&balls);
        assert!(grid.neighbors_of(&balls, 0).is_empty());
        assert!(grid.neighbors_of(&balls, 1).is_empty());
    }

    #[test]
    fn negative_coordinates_bucket_consistently() {
        // A dragged ball can momentarily sit left of the viewport.
        let balls = vec![ball_at(-5.0, 10.0), ball_at(-20.0, 15.0)];
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&balls);
        assert_eq!(grid.neighbors_of(&balls, 0), vec![1]);
    }

    #[test]
    fn rebuild_replaces_previous_frame() {
        let mut balls = vec![ball_at(10.0, 10.0), ball_at(20.0, 20.0)];
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&balls);
        balls[1].pos = Vec2::new(900.0, 900.0);
        grid.rebuild(&balls);
        assert!(grid.neighbors_of(&balls, 0).is_empty());
    }

    #[test]
    fn empty_set_queries_nothing() {
        let mut grid = SpatialGrid::new(150.0);
        grid.rebuild(&[]);
        let balls = vec![ball_at(0.0, 0.0)];
        grid.insert(0, balls[0].pos);
        assert!(grid.neighbors_of(&balls, 0).is_empty());
    }
}
