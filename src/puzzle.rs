use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;

use crate::error::{GridError, SolveError};
use crate::solver::Solver;

/// Width and height of the board.
pub const SIDE: usize = 4;
/// Number of cells, and also the label carried by the blank.
pub const TILE_COUNT: usize = SIDE * SIDE;

/// Direction the blank travels when a move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Candidate order used by move generation.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Index the blank swaps with when it sits at `blank`, if the move stays
    /// on the board.
    pub fn target(&self, blank: usize) -> Option<usize> {
        if blank >= TILE_COUNT {
            return None;
        }
        match self {
            Move::Up if blank >= SIDE => Some(blank - SIDE),
            Move::Down if blank < TILE_COUNT - SIDE => Some(blank + SIDE),
            Move::Left if blank % SIDE != 0 => Some(blank - 1),
            Move::Right if blank % SIDE != SIDE - 1 => Some(blank + 1),
            _ => None,
        }
    }

    /// Arrow key that produces this move: the key names the direction the
    /// tile slides, which is opposite to the blank.
    pub fn arrow_key(&self) -> &'static str {
        match self {
            Move::Up => "ArrowDown",
            Move::Down => "ArrowUp",
            Move::Left => "ArrowRight",
            Move::Right => "ArrowLeft",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A numbered tile; 16 is the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    pub const BLANK: Tile = Tile(TILE_COUNT as u8);

    pub fn new(number: u8) -> Option<Self> {
        (1..=TILE_COUNT as u8).contains(&number).then_some(Tile(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }

    /// Cell index this tile occupies in the solved arrangement.
    pub fn goal_index(&self) -> usize {
        self.0 as usize - 1
    }
}

pub fn index_to_coordinates(index: usize) -> (usize, usize) {
    (index / SIDE, index % SIDE)
}

pub fn coordinates_to_index(row: usize, col: usize) -> usize {
    row * SIDE + col
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Tile; TILE_COUNT],
    blank_index: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// The solved arrangement: 1..=15 in row-major order, blank last.
    pub fn new() -> Self {
        let mut cells = [Tile::BLANK; TILE_COUNT];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = Tile(i as u8 + 1);
        }

        Self {
            cells,
            blank_index: TILE_COUNT - 1,
        }
    }

    /// Builds a grid from tile numbers in row-major order.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, GridError> {
        if numbers.len() != TILE_COUNT {
            return Err(GridError::WrongLength(numbers.len()));
        }

        let mut seen = [false; TILE_COUNT];
        let mut cells = [Tile::BLANK; TILE_COUNT];
        for (cell, &n) in cells.iter_mut().zip(numbers) {
            let tile = Tile::new(n).ok_or(GridError::OutOfRange(n))?;
            if std::mem::replace(&mut seen[tile.goal_index()], true) {
                return Err(GridError::Duplicate(n));
            }
            *cell = tile;
        }

        let blank_index = Self::find_blank(&cells);
        Ok(Self { cells, blank_index })
    }

    fn find_blank(cells: &[Tile; TILE_COUNT]) -> usize {
        cells
            .iter()
            .position(Tile::is_blank)
            .unwrap_or(TILE_COUNT - 1)
    }

    pub fn tiles(&self) -> &[Tile; TILE_COUNT] {
        &self.cells
    }

    pub fn numbers(&self) -> [u8; TILE_COUNT] {
        self.cells.map(|t| t.number())
    }

    pub fn blank_index(&self) -> usize {
        self.blank_index
    }

    /// Packs the arrangement into 64 bits, four per cell.
    pub fn key(&self) -> u64 {
        self.cells
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, t)| acc | ((t.goal_index() as u64) << (4 * i)))
    }

    pub fn scramble(&mut self) {
        self.scramble_with(&mut thread_rng());
    }

    /// Draws uniform permutations until one is solvable and not already
    /// solved.
    pub fn scramble_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            self.cells.shuffle(rng);
            self.blank_index = Self::find_blank(&self.cells);

            if self.is_solvable() && !self.is_solved() {
                break;
            }
        }
        log::trace!("scramble accepted after {attempts} draw(s)");
    }

    /// Slides the tile at `target` into the blank. Fails without touching the
    /// grid unless `target` is orthogonally adjacent to the blank.
    pub fn move_tile(&mut self, target: usize) -> bool {
        if target >= TILE_COUNT {
            return false;
        }

        let (row, col) = index_to_coordinates(target);
        let (blank_row, blank_col) = index_to_coordinates(self.blank_index);
        if row.abs_diff(blank_row) + col.abs_diff(blank_col) != 1 {
            return false;
        }

        self.cells.swap(target, self.blank_index);
        self.blank_index = target;
        true
    }

    pub fn apply_move(&mut self, movement: Move) -> bool {
        match movement.target(self.blank_index) {
            Some(target) => self.move_tile(target),
            None => false,
        }
    }

    /// Legal moves from the current blank position with the index each one
    /// swaps with.
    pub fn legal_moves(&self) -> impl Iterator<Item = (Move, usize)> {
        let blank = self.blank_index;
        Move::ALL
            .into_iter()
            .filter_map(move |m| m.target(blank).map(|t| (m, t)))
    }

    pub fn is_solved(&self) -> bool {
        self.cells[..TILE_COUNT - 1]
            .iter()
            .enumerate()
            .all(|(i, t)| t.goal_index() == i)
    }

    pub fn is_solvable(&self) -> bool {
        let (blank_row, _) = index_to_coordinates(self.blank_index);
        (self.count_inversions() + blank_row + 1) % 2 == 0
    }

    fn count_inversions(&self) -> usize {
        let numbers: Vec<u8> = self
            .cells
            .iter()
            .filter(|t| !t.is_blank())
            .map(Tile::number)
            .collect();

        numbers
            .iter()
            .enumerate()
            .map(|(i, &val)| numbers[i + 1..].iter().filter(|&&next| next < val).count())
            .sum()
    }

    pub fn solve(&self) -> Result<Vec<Move>, SolveError> {
        Solver::default().solve(self)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SIDE) {
            for tile in row {
                if tile.is_blank() {
                    write!(f, "   ")?;
                } else {
                    write!(f, "{:2} ", tile.number())?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid(numbers: [u8; TILE_COUNT]) -> Grid {
        Grid::from_numbers(&numbers).unwrap()
    }

    #[test]
    fn new_grid_is_solved() {
        let g = Grid::new();
        assert!(g.is_solved());
        assert!(g.is_solvable());
        assert_eq!(g.blank_index(), 15);
        assert_eq!(g.numbers()[0], 1);
    }

    #[test]
    fn coordinates_round_trip() {
        assert_eq!(index_to_coordinates(6), (1, 2));
        assert_eq!(coordinates_to_index(3, 1), 13);
    }

    #[test]
    fn from_numbers_rejects_bad_input() {
        assert_eq!(Grid::from_numbers(&[1, 2, 3]), Err(GridError::WrongLength(3)));

        let mut numbers: Vec<u8> = (1..=16).collect();
        numbers[0] = 17;
        assert_eq!(Grid::from_numbers(&numbers), Err(GridError::OutOfRange(17)));

        numbers[0] = 2;
        assert_eq!(Grid::from_numbers(&numbers), Err(GridError::Duplicate(2)));
    }

    #[test]
    fn move_tile_only_accepts_neighbors() {
        for blank in 0..TILE_COUNT {
            let mut start = Grid::new();
            // walk the blank to `blank` by swapping with the cell directly
            start.cells.swap(15, blank);
            start.blank_index = blank;

            for target in 0..TILE_COUNT + 2 {
                let mut g = start.clone();
                let adjacent = target < TILE_COUNT && {
                    let (r, c) = index_to_coordinates(target);
                    let (br, bc) = index_to_coordinates(blank);
                    r.abs_diff(br) + c.abs_diff(bc) == 1
                };

                assert_eq!(g.move_tile(target), adjacent, "blank {blank} target {target}");
                if adjacent {
                    assert_eq!(g.blank_index(), target);
                    assert_eq!(g.tiles()[blank], start.tiles()[target]);
                    assert!(g.tiles()[target].is_blank());
                } else {
                    assert_eq!(g, start);
                }
            }
        }
    }

    #[test]
    fn legal_moves_match_board_edges() {
        let corner = Grid::new();
        let moves: Vec<_> = corner.legal_moves().collect();
        assert_eq!(moves, vec![(Move::Up, 11), (Move::Left, 14)]);

        let mut center = Grid::new();
        assert!(center.apply_move(Move::Up));
        assert!(center.apply_move(Move::Left));
        assert_eq!(center.blank_index(), 10);
        assert_eq!(center.legal_moves().count(), 4);
    }

    #[test]
    fn apply_move_off_board_fails() {
        let mut g = Grid::new();
        assert!(!g.apply_move(Move::Down));
        assert!(!g.apply_move(Move::Right));
        assert_eq!(g, Grid::new());
    }

    #[test]
    fn swapped_last_tiles_are_unsolvable() {
        let g = grid([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 16]);
        assert!(!g.is_solvable());

        let g = grid([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 16, 14]);
        assert_eq!(g.blank_index(), 14);
        assert!(!g.is_solvable());
    }

    #[test]
    fn solvability_survives_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut g = Grid::new();
            g.cells.shuffle(&mut rng);
            g.blank_index = Grid::find_blank(&g.cells);
            let before = g.is_solvable();

            for _ in 0..20 {
                let moves: Vec<_> = g.legal_moves().collect();
                let (m, _) = moves[rng.gen_range(0..moves.len())];
                assert!(g.apply_move(m));
                assert_eq!(g.is_solvable(), before);
            }
        }
    }

    #[test]
    fn scramble_yields_solvable_unsolved_grids() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut g = Grid::new();
            g.scramble_with(&mut rng);
            assert!(g.is_solvable());
            assert!(!g.is_solved());
            assert!(g.tiles()[g.blank_index()].is_blank());
        }
    }

    #[test]
    fn key_distinguishes_arrangements() {
        let solved = Grid::new();
        let mut moved = solved.clone();
        moved.apply_move(Move::Up);
        assert_ne!(solved.key(), moved.key());
        moved.apply_move(Move::Down);
        assert_eq!(solved.key(), moved.key());
    }

    #[test]
    fn arrow_key_names_the_sliding_tile() {
        assert_eq!(Move::Up.arrow_key(), "ArrowDown");
        assert_eq!(Move::Right.arrow_key(), "ArrowLeft");
        assert_eq!(Move::Left.opposite(), Move::Right);
    }
}
