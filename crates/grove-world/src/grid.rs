//! Bounded 2D occupancy grid.

use grove_core::{Location, Occupant, MOORE_OFFSETS};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// A bounded grid holding at most one occupant per cell.
///
/// Unlike a torus, neighbour queries are clamped: corner cells have three
/// neighbours and edge cells five.
#[derive(Debug, Clone)]
pub struct Grid {
    depth: i32,
    width: i32,
    cells: Vec<Option<Occupant>>,
}

impl Grid {
    pub fn new(depth: i32, width: i32) -> Self {
        assert!(
            depth > 0 && width > 0,
            "grid dimensions must be positive, got {depth}x{width}"
        );
        let size = (depth as usize) * (width as usize);
        Self {
            depth,
            width,
            cells: vec![None; size],
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn contains(&self, loc: Location) -> bool {
        (0..self.depth).contains(&loc.row) && (0..self.width).contains(&loc.col)
    }

    /// Put `occupant` at `loc`.
    ///
    /// Placing an occupant where it already is does nothing. Placing it in a
    /// cell held by something else panics: nothing is ever evicted silently.
    pub fn place(&mut self, occupant: Occupant, loc: Location) {
        let index = self.index(loc);
        match self.cells[index] {
            Some(current) if current != occupant => {
                panic!("cannot place {occupant:?} at {loc}: cell is held by {current:?}")
            }
            _ => self.cells[index] = Some(occupant),
        }
    }

    /// Empty the cell at `loc`
    pub fn clear(&mut self, loc: Location) {
        let index = self.index(loc);
        self.cells[index] = None;
    }

    /// Empty every cell
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    pub fn occupant_at(&self, loc: Location) -> Option<Occupant> {
        if !self.contains(loc) {
            return None;
        }
        self.cells[self.index(loc)]
    }

    pub fn is_free(&self, loc: Location) -> bool {
        self.contains(loc) && self.cells[self.index(loc)].is_none()
    }

    /// The in-bounds Moore neighbours of `loc`, in row-major scan order
    pub fn neighbors(&self, loc: Location) -> Vec<Location> {
        MOORE_OFFSETS
            .iter()
            .map(|&(dr, dc)| loc.offset(dr, dc))
            .filter(|neighbor| self.contains(*neighbor))
            .collect()
    }

    /// The empty cells among [`Grid::neighbors`], same order
    pub fn free_neighbors(&self, loc: Location) -> Vec<Location> {
        MOORE_OFFSETS
            .iter()
            .map(|&(dr, dc)| loc.offset(dr, dc))
            .filter(|neighbor| self.is_free(*neighbor))
            .collect()
    }

    /// One free neighbour chosen uniformly, or `None` when boxed in
    pub fn random_free_neighbor(&self, loc: Location, rng: &mut ChaCha8Rng) -> Option<Location> {
        self.free_neighbors(loc).choose(rng).copied()
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn index(&self, loc: Location) -> usize {
        assert!(
            self.contains(loc),
            "location {loc} is outside the {}x{} grid",
            self.depth,
            self.width
        );
        (loc.row * self.width + loc.col) as usize
    }

    /// Get location from index
    fn index_to_location(&self, index: usize) -> Location {
        let row = (index as i32) / self.width;
        let col = (index as i32) % self.width;
        Location::new(row, col)
    }

    /// Iterator over all occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Location, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|occupant| (self.index_to_location(i), occupant)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::AgentId;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn agent(id: u64) -> Occupant {
        Occupant::Agent(AgentId(id))
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 6);
        assert_eq!(grid.depth(), 4);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.cells.len(), 24);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_place_and_clear() {
        let mut grid = Grid::new(5, 5);
        let loc = Location::new(1, 3);

        grid.place(agent(1), loc);
        assert_eq!(grid.occupant_at(loc), Some(agent(1)));
        assert!(!grid.is_free(loc));

        grid.clear(loc);
        assert_eq!(grid.occupant_at(loc), None);
    }

    #[test]
    fn test_placing_same_occupant_twice_is_a_no_op() {
        let mut grid = Grid::new(3, 3);
        let loc = Location::new(0, 0);
        grid.place(Occupant::River, loc);
        grid.place(Occupant::River, loc);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    #[should_panic(expected = "cell is held by")]
    fn test_place_into_occupied_cell_panics() {
        let mut grid = Grid::new(3, 3);
        let loc = Location::new(1, 1);
        grid.place(agent(1), loc);
        grid.place(agent(2), loc);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_place_out_of_range_panics() {
        let mut grid = Grid::new(3, 3);
        grid.place(agent(1), Location::new(3, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_clear_out_of_range_panics() {
        let mut grid = Grid::new(3, 3);
        grid.clear(Location::new(0, -1));
    }

    #[test]
    fn test_neighbors_order_and_clamping() {
        let grid = Grid::new(5, 5);

        let centre = grid.neighbors(Location::new(2, 2));
        assert_eq!(
            centre,
            vec![
                Location::new(1, 1),
                Location::new(1, 2),
                Location::new(1, 3),
                Location::new(2, 1),
                Location::new(2, 3),
                Location::new(3, 1),
                Location::new(3, 2),
                Location::new(3, 3),
            ]
        );

        let corner = grid.neighbors(Location::new(0, 0));
        assert_eq!(
            corner,
            vec![Location::new(0, 1), Location::new(1, 0), Location::new(1, 1)]
        );

        assert_eq!(grid.neighbors(Location::new(0, 2)).len(), 5);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1, 1);
        assert!(grid.neighbors(Location::new(0, 0)).is_empty());
    }

    #[test]
    fn test_free_neighbors_filters_occupied() {
        let mut grid = Grid::new(3, 3);
        grid.place(agent(1), Location::new(0, 0));
        grid.place(Occupant::River, Location::new(0, 1));

        let free = grid.free_neighbors(Location::new(1, 1));
        assert_eq!(free.len(), 6);
        assert_eq!(free[0], Location::new(0, 2));
    }

    #[test]
    fn test_random_free_neighbor() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut grid = Grid::new(3, 3);
        let centre = Location::new(1, 1);

        for _ in 0..20 {
            let loc = grid.random_free_neighbor(centre, &mut rng).unwrap();
            assert!(grid.free_neighbors(centre).contains(&loc));
        }

        for loc in grid.neighbors(centre) {
            grid.place(Occupant::River, loc);
        }
        assert_eq!(grid.random_free_neighbor(centre, &mut rng), None);
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut grid = Grid::new(3, 3);
        grid.place(agent(2), Location::new(2, 0));
        grid.place(agent(1), Location::new(0, 2));

        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(
            cells,
            vec![(Location::new(0, 2), agent(1)), (Location::new(2, 0), agent(2))]
        );
    }

    proptest! {
        #[test]
        fn neighbors_are_adjacent_and_in_bounds(
            depth in 1i32..12,
            width in 1i32..12,
            row in 0i32..12,
            col in 0i32..12,
        ) {
            let grid = Grid::new(depth, width);
            let loc = Location::new(row % depth, col % width);
            let neighbors = grid.neighbors(loc);

            prop_assert!(neighbors.len() <= 8);
            for n in &neighbors {
                prop_assert!(grid.contains(*n));
                prop_assert_eq!(loc.chebyshev_distance(n), 1);
            }
            let expected = (0..depth)
                .flat_map(|r| (0..width).map(move |c| Location::new(r, c)))
                .filter(|other| loc.chebyshev_distance(other) == 1)
                .count();
            prop_assert_eq!(neighbors.len(), expected);
        }
    }
}
