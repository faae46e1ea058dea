//! Uniform-cost distance field used for movement range, attack range and paths.

use std::collections::VecDeque;

use hex_tactics_core::HexCoord;

/// Heat stored for cells the flood fill could not reach.
pub const UNREACHABLE: f32 = -1.0;

/// Cost marking unvisited cells during a fill and impassable neighbours during
/// path reconstruction.
pub const MAX_COST: f32 = 9999.0;

/// Dense hex-step distance grid seeded from a single source cell.
///
/// The field mirrors the map dimensions and stores the breadth-first search
/// results that drive range queries. Cells the fill never reached hold
/// [`UNREACHABLE`] so callers can distinguish walls from traversable tiles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeatMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl HeatMap {
    /// Creates an unreached field covering the provided grid dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cell_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            values: vec![UNREACHABLE; cell_count],
        }
    }

    /// Rebuilds the field from `source` using a breadth-first flood fill.
    ///
    /// Neighbours rejected by `passable` are never entered. Cells whose
    /// distance would reach `max_cost` are left unreached.
    pub fn compute<F>(&mut self, source: HexCoord, mut passable: F, max_cost: f32)
    where
        F: FnMut(HexCoord) -> bool,
    {
        self.values.fill(max_cost);

        let Some(source_index) = self.index(source) else {
            self.values.fill(UNREACHABLE);
            return;
        };
        self.values[source_index] = 0.0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_value = self.values[current_index] + 1.0;
            if next_value >= max_cost {
                continue;
            }

            for neighbor in cell.neighbors() {
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if !passable(neighbor) {
                    continue;
                }

                if self.values[neighbor_index] <= next_value {
                    continue;
                }

                self.values[neighbor_index] = next_value;
                queue.push_back(neighbor);
            }
        }

        for value in &mut self.values {
            if *value >= max_cost {
                *value = UNREACHABLE;
            }
        }
    }

    /// Marks every cell as unreached.
    pub fn clear(&mut self) {
        self.values.fill(UNREACHABLE);
    }

    /// Width of the field in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Heat stored for the cell, if it lies within the field.
    #[must_use]
    pub fn value(&self, coord: HexCoord) -> Option<f32> {
        self.index(coord)
            .and_then(|index| self.values.get(index).copied())
    }

    /// Reports whether the truncated heat of the cell lies in `[min, max]`.
    ///
    /// Cells outside the field are never in range.
    #[must_use]
    pub fn is_in_range(&self, coord: HexCoord, min: i32, max: i32) -> bool {
        self.value(coord).is_some_and(|heat| {
            let steps = heat as i32;
            steps >= min && steps <= max
        })
    }

    /// Reconstructs a shortest path from `start` to `end`, both inclusive.
    ///
    /// The walk starts at `end` and repeatedly steps to the neighbour with the
    /// strictly smallest heat; neighbours rejected by `passable` or unreached
    /// by the fill count as [`MAX_COST`], and the earliest neighbour in
    /// enumeration order wins ties. An unreachable `end` yields an empty path.
    #[must_use]
    pub fn shortest_path<F>(&self, start: HexCoord, end: HexCoord, mut passable: F) -> Vec<HexCoord>
    where
        F: FnMut(HexCoord) -> bool,
    {
        let (Some(start_heat), Some(end_heat)) = (self.value(start), self.value(end)) else {
            return Vec::new();
        };
        if start_heat < 0.0 || end_heat < 0.0 {
            return Vec::new();
        }

        let steps = (end_heat - start_heat) as i32;
        let mut path = vec![end];
        let mut current = end;

        for _ in 0..steps.max(0) {
            let mut lowest = self.value(current).unwrap_or(MAX_COST);
            let mut next = None;

            for neighbor in current.neighbors() {
                let Some(heat) = self.value(neighbor) else {
                    continue;
                };
                let heat = if !passable(neighbor) || heat < 0.0 {
                    MAX_COST
                } else {
                    heat
                };
                if heat < lowest {
                    lowest = heat;
                    next = Some(neighbor);
                }
            }

            let Some(step) = next else {
                break;
            };
            path.push(step);
            current = step;
        }

        path.reverse();
        path
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        let column = u32::try_from(coord.column()).ok()?;
        let row = u32::try_from(coord.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        usize::try_from(u64::from(row) * u64::from(self.width) + u64::from(column)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_field_matches_hex_distance() {
        let mut field = HeatMap::new(5, 5);
        let source = HexCoord::new(2, 2);

        field.compute(source, |_| true, MAX_COST);

        for column in 0..5 {
            for row in 0..5 {
                let coord = HexCoord::new(column, row);
                assert_eq!(
                    field.value(coord),
                    Some(source.hex_distance(coord) as f32),
                    "heat mismatch at {coord:?}"
                );
            }
        }
    }

    #[test]
    fn blocked_cells_stay_unreached_and_force_detours() {
        let mut field = HeatMap::new(3, 3);
        let walls = [HexCoord::new(1, 0), HexCoord::new(1, 1)];

        field.compute(HexCoord::new(0, 0), |cell| !walls.contains(&cell), MAX_COST);

        assert_eq!(field.value(HexCoord::new(1, 0)), Some(UNREACHABLE));
        assert_eq!(field.value(HexCoord::new(0, 2)), Some(2.0));
        assert_eq!(field.value(HexCoord::new(1, 2)), Some(3.0));
        assert_eq!(field.value(HexCoord::new(2, 0)), Some(5.0));
    }

    #[test]
    fn isolated_cells_are_unreachable() {
        let mut field = HeatMap::new(3, 1);
        let wall = HexCoord::new(1, 0);

        field.compute(HexCoord::new(0, 0), |cell| cell != wall, MAX_COST);

        assert_eq!(field.value(HexCoord::new(2, 0)), Some(UNREACHABLE));
        assert!(!field.is_in_range(HexCoord::new(2, 0), 0, 5));
        assert!(field
            .shortest_path(HexCoord::new(0, 0), HexCoord::new(2, 0), |cell| cell != wall)
            .is_empty());
    }

    #[test]
    fn range_queries_ignore_cells_outside_the_field() {
        let mut field = HeatMap::new(3, 3);
        field.compute(HexCoord::new(0, 0), |_| true, MAX_COST);

        assert!(field.is_in_range(HexCoord::new(0, 0), 0, 0));
        assert!(field.is_in_range(HexCoord::new(2, 2), 4, 4));
        assert!(!field.is_in_range(HexCoord::new(2, 2), 0, 3));
        assert!(!field.is_in_range(HexCoord::new(-1, 0), -5, 5));
        assert!(!field.is_in_range(HexCoord::new(3, 0), 0, 9));
    }

    #[test]
    fn path_prefers_first_neighbor_on_ties() {
        let mut field = HeatMap::new(3, 3);
        field.compute(HexCoord::new(0, 0), |_| true, MAX_COST);

        let path = field.shortest_path(HexCoord::new(0, 0), HexCoord::new(1, 1), |_| true);

        assert_eq!(
            path,
            vec![HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(1, 1)]
        );
    }

    #[test]
    fn path_to_source_is_the_source_alone() {
        let mut field = HeatMap::new(2, 2);
        field.compute(HexCoord::new(1, 1), |_| true, MAX_COST);

        assert_eq!(
            field.shortest_path(HexCoord::new(1, 1), HexCoord::new(1, 1), |_| true),
            vec![HexCoord::new(1, 1)]
        );
    }
}
