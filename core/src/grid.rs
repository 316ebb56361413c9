use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use smallvec::SmallVec;

use crate::*;

/// Rectangular board of tiles plus the rules it was created with.
///
/// The tracked blank coordinates always equal the set of blank cells, kept in
/// row-major order so that spawn indices mean the same thing everywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Array2<Tile>,
    blanks: Vec<Coord2>,
    config: GameConfig,
}

impl Grid {
    pub fn empty(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let cells = Array2::from_elem((config.rows(), config.cols()), Tile::Blank);
        Ok(Self::from_parts(cells, config))
    }

    /// Wraps existing cells, checking them against the configuration.
    pub fn from_cells(cells: Array2<Tile>, config: GameConfig) -> Result<Self> {
        config.validate()?;

        let (rows, cols) = cells.dim();
        if (rows, cols) != (config.rows(), config.cols()) {
            return Err(CorruptGame::InvalidDimensions {
                rows: config.rows(),
                cols: config.cols(),
                found_rows: rows,
                found_cols: cols,
            }
            .into());
        }

        if let Some(((row, col), _)) = cells.indexed_iter().find(|(_, tile)| match tile {
            Tile::Operator(op) => !config.operators.enables(*op),
            _ => false,
        }) {
            return Err(CorruptGame::InvalidTile { row, col }.into());
        }

        Ok(Self::from_parts(cells, config))
    }

    /// Builds a grid from row-major rows; every row must be `cols` wide.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R], config: GameConfig) -> Result<Self> {
        let expected = (config.rows(), config.cols());
        let mismatch = |found_rows, found_cols| CorruptGame::InvalidDimensions {
            rows: expected.0,
            cols: expected.1,
            found_rows,
            found_cols,
        };

        if rows.len() != expected.0 {
            let found_cols = rows.first().map_or(0, |row| row.as_ref().len());
            return Err(mismatch(rows.len(), found_cols).into());
        }
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != expected.1) {
            return Err(mismatch(rows.len(), row.as_ref().len()).into());
        }

        let flat: Vec<Tile> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        let cells = Array2::from_shape_vec(expected, flat)
            .map_err(|_| mismatch(expected.0, expected.1))?;
        Self::from_cells(cells, config)
    }

    /// Parses the text form produced by `Display`: one row per line, tokens
    /// separated by whitespace.
    pub fn parse_text(text: &str, config: GameConfig) -> Result<Self> {
        let rows = text
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.split_whitespace()
                    .enumerate()
                    .map(|(col, token)| {
                        Tile::parse_token(token).ok_or(CorruptGame::InvalidTile { row, col })
                    })
                    .collect::<core::result::Result<Vec<_>, _>>()
            })
            .collect::<core::result::Result<Vec<_>, _>>()?;
        Self::from_rows(&rows, config)
    }

    fn from_parts(cells: Array2<Tile>, config: GameConfig) -> Self {
        let mut grid = Self {
            cells,
            blanks: Vec::with_capacity(config.total_cells().into()),
            config,
        };
        grid.recompute_blanks();
        grid
    }

    fn recompute_blanks(&mut self) {
        self.blanks.clear();
        self.blanks.extend(
            self.cells
                .indexed_iter()
                .filter(|(_, tile)| tile.is_blank())
                .map(|((row, col), _)| (row as Coord, col as Coord)),
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn cells(&self) -> &Array2<Tile> {
        &self.cells
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn blanks(&self) -> &[Coord2] {
        &self.blanks
    }

    pub fn blank_count(&self) -> usize {
        self.blanks.len()
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Fills tracked blanks by position in the blank list as it stands before
    /// the call, then stops tracking them.
    pub(crate) fn fill_blanks(&mut self, picks: &[(usize, Tile)]) {
        for &(index, tile) in picks {
            self.cells[self.blanks[index].to_nd_index()] = tile;
        }

        let mut filled: SmallVec<[usize; 4]> = picks.iter().map(|&(index, _)| index).collect();
        filled.sort_unstable_by(|a, b| b.cmp(a));
        for index in filled {
            self.blanks.remove(index);
        }
    }

    /// Cells as they would be after sliding, without touching the grid.
    pub fn slid(&self, direction: Direction) -> Result<Array2<Tile>> {
        let axis = direction.lane_axis();
        let enabled = self.config.operators;
        let mut next = self.cells.clone();
        let mut line = Line::new();

        for mut lane in next.lanes_mut(axis) {
            line.clear();
            line.extend(lane.iter().copied());
            let reduced = reduce_line(&line, direction.toward(), enabled)?;
            for (cell, tile) in lane.iter_mut().zip(reduced) {
                *cell = tile;
            }
        }

        Ok(next)
    }

    /// Slides every line toward `direction`. Returns whether anything moved.
    pub fn slide(&mut self, direction: Direction) -> Result<bool> {
        let next = self.slid(direction)?;
        if next == self.cells {
            return Ok(false);
        }

        self.cells = next;
        self.recompute_blanks();
        Ok(true)
    }

    pub fn is_won(&self) -> bool {
        let target = self.config.win_value;
        self.numbers().any(|value| value == target)
    }

    pub fn is_out_of_bounds(&self) -> bool {
        let bound = self.config.bound;
        self.numbers().any(|value| !(-bound..=bound).contains(&value))
    }

    /// Directions whose slide would change the grid; none once the grid is won.
    pub fn valid_moves(&self) -> Result<DirectionSet> {
        if self.is_won() {
            return Ok(DirectionSet::empty());
        }

        let mut moves = DirectionSet::empty();
        for direction in Direction::ALL {
            if self.slid(direction)? != self.cells {
                moves |= direction.flag();
            }
        }
        Ok(moves)
    }

    /// Lost when out of bounds or stuck, unless the grid is already won.
    pub fn is_lost(&self, valid_moves: DirectionSet) -> bool {
        !self.is_won() && (self.is_out_of_bounds() || valid_moves.is_empty())
    }

    pub fn status(&self, valid_moves: DirectionSet) -> GameState {
        if self.is_won() {
            GameState::Won
        } else if self.is_lost(valid_moves) {
            GameState::Lost
        } else {
            GameState::InProgress
        }
    }

    fn numbers(&self) -> impl Iterator<Item = i64> + '_ {
        self.cells.iter().filter_map(|tile| tile.as_number())
    }
}

impl Index<Coord2> for Grid {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for (col, tile) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{tile}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn grid(text: &str) -> Grid {
        let rows = text.lines().count() as Coord;
        let cols = text.lines().next().map_or(0, |l| l.split_whitespace().count()) as Coord;
        Grid::parse_text(text, GameConfig::standard().with_size((rows, cols))).unwrap()
    }

    fn assert_blanks_consistent(grid: &Grid) {
        let expected: Vec<Coord2> = grid
            .cells()
            .indexed_iter()
            .filter(|(_, tile)| tile.is_blank())
            .map(|((r, c), _)| (r as Coord, c as Coord))
            .collect();
        assert_eq!(grid.blanks(), expected.as_slice());
    }

    const NO_OPERATIONS: &str = "1 . 2\n. 3 .\n4 5 .\n";

    const ALREADY_WON: &str = "\
1 2 3 4 5 6 7
8 9 10 11 12 13 14
15 16 17 18 19 20 21
22 23 24 25 26 27 28
29 30 31 32 33 34 35
36 37 38 39 40 41 67
";

    const ALREADY_LOST: &str = "\
1001 1001 1001 1001 1001 1001 1001
1001 1001 1001 1001 1001 1001 1001
1001 1001 1001 1001 1001 1001 1001
1001 1001 1001 1001 1001 1001 1001
1001 1001 1001 1001 1001 1001 1001
1001 1001 1001 1001 1001 1001 1001
";

    const FULL_BUT_NOT_LOST: &str = "\
1 + 3 - 5 + 7
8 - 10 + 12 - 14
15 + 17 - 19 + 21
22 - 24 + 26 - 28
29 + 31 - 33 + 35
36 - 38 + 40 - 42
";

    #[test]
    fn empty_grid_tracks_every_cell() {
        let grid = Grid::empty(GameConfig::standard()).unwrap();

        assert_eq!(grid.blank_count(), 42);
        assert_eq!(grid.blank_count(), usize::from(grid.config().total_cells()));
        assert_blanks_consistent(&grid);
        assert!(!grid.is_won());
    }

    #[test]
    fn fill_blanks_indexes_the_list_before_the_call() {
        let mut grid = grid(NO_OPERATIONS);
        assert_eq!(grid.blanks(), [(0, 1), (1, 0), (1, 2), (2, 2)]);

        grid.fill_blanks(&[(1, Tile::Number(7)), (3, Tile::Operator(Operator::Addition))]);

        assert_eq!(grid[(1, 0)], Tile::Number(7));
        assert_eq!(grid[(2, 2)], Tile::Operator(Operator::Addition));
        assert_eq!(grid.blanks(), [(0, 1), (1, 2)]);
        assert_blanks_consistent(&grid);
    }

    #[test]
    fn slides_without_operators_compact_lines() {
        let cases = [
            (Direction::Left, "1 2 .\n3 . .\n4 5 .\n"),
            (Direction::Right, ". 1 2\n. . 3\n. 4 5\n"),
            (Direction::Up, "1 3 2\n4 5 .\n. . .\n"),
            (Direction::Down, ". . .\n1 3 .\n4 5 2\n"),
        ];

        for (direction, expected) in cases {
            let mut subject = grid(NO_OPERATIONS);
            assert!(subject.slide(direction).unwrap());
            assert_eq!(subject.to_string(), expected, "sliding {direction}");
            assert_blanks_consistent(&subject);
        }
        assert_eq!(grid(NO_OPERATIONS).valid_moves().unwrap(), DirectionSet::all());
        assert_eq!(grid(NO_OPERATIONS).status(DirectionSet::all()), GameState::InProgress);
    }

    #[test]
    fn vertical_slides_collapse_columns() {
        let mut subject = grid("1 .\n+ .\n2 .\n- .\n7 4\n");

        subject.slide(Direction::Up).unwrap();
        assert_eq!(subject.to_string(), "3 4\n- .\n7 .\n. .\n. .\n");

        let mut subject = grid("1 .\n+ .\n2 .\n- .\n7 4\n");
        subject.slide(Direction::Down).unwrap();
        assert_eq!(subject.to_string(), ". .\n. .\n1 .\n+ .\n-5 4\n");
    }

    #[test]
    fn won_grid_has_no_moves_and_does_not_change() {
        let mut subject = grid(ALREADY_WON);
        let before = subject.clone();

        for direction in Direction::ALL {
            assert!(!subject.slide(direction).unwrap());
        }
        assert_eq!(subject, before);
        assert!(subject.is_won());
        assert_eq!(subject.valid_moves().unwrap(), DirectionSet::empty());
        assert!(!subject.is_lost(DirectionSet::empty()));
        assert_eq!(subject.status(DirectionSet::empty()), GameState::Won);
    }

    #[test]
    fn out_of_bounds_grid_is_lost_in_every_direction() {
        let mut subject = grid(ALREADY_LOST);
        let before = subject.clone();

        for direction in Direction::ALL {
            assert!(!subject.slide(direction).unwrap());
            assert_eq!(subject, before);
        }
        assert!(subject.is_out_of_bounds());
        assert!(subject.is_lost(subject.valid_moves().unwrap()));
        assert!(subject.is_lost(DirectionSet::all()));
    }

    #[test]
    fn full_grid_can_still_collapse_rows() {
        let mut subject = grid(FULL_BUT_NOT_LOST);

        assert_eq!(subject.blank_count(), 0);
        assert_eq!(
            subject.valid_moves().unwrap(),
            DirectionSet::LEFT | DirectionSet::RIGHT
        );

        assert!(!subject.slide(Direction::Up).unwrap());
        assert!(subject.slide(Direction::Left).unwrap());
        assert_eq!(
            subject.to_string().lines().next(),
            Some("4 - 12 . . . .")
        );
        assert_blanks_consistent(&subject);
    }

    #[test]
    fn win_takes_precedence_over_loss() {
        let subject = grid("67 1\n1 1001\n");

        assert!(subject.is_won());
        assert!(subject.is_out_of_bounds());
        assert!(!subject.is_lost(DirectionSet::empty()));
        assert_eq!(subject.status(DirectionSet::empty()), GameState::Won);
    }

    #[test]
    fn bounds_are_symmetric() {
        assert!(!grid("1000 -1000\n").is_out_of_bounds());
        assert!(grid("-1001 .\n").is_out_of_bounds());
        assert!(!grid("+ .\n").is_out_of_bounds());
    }

    #[test]
    fn dry_run_does_not_mutate() {
        let subject = grid(NO_OPERATIONS);
        let before = subject.clone();

        let slid = subject.slid(Direction::Left).unwrap();

        assert_ne!(&slid, subject.cells());
        assert_eq!(subject, before);
    }

    #[test]
    fn from_rows_rejects_bad_shapes_and_tiles() {
        let config = GameConfig::standard().with_size((2, 2));
        let short = [vec![Tile::Blank, Tile::Blank], vec![Tile::Blank]];
        let mul = [
            vec![Tile::Operator(Operator::Multiplication), Tile::Blank],
            vec![Tile::Blank, Tile::Blank],
        ];

        assert_eq!(
            Grid::from_rows(&short, config.clone()),
            Err(GameError::Corrupt(CorruptGame::InvalidDimensions {
                rows: 2,
                cols: 2,
                found_rows: 2,
                found_cols: 1,
            }))
        );
        assert_eq!(
            Grid::from_rows(&mul, config.clone()),
            Err(GameError::Corrupt(CorruptGame::InvalidTile { row: 0, col: 0 }))
        );
        assert!(Grid::from_rows::<Vec<Tile>>(&[], config).is_err());
    }

    #[test]
    fn text_form_round_trips() {
        let subject = grid(FULL_BUT_NOT_LOST);
        let text = subject.to_string();

        assert_eq!(Grid::parse_text(&text, subject.config().clone()).unwrap(), subject);
        assert_eq!(
            Grid::parse_text("1 ?\n", GameConfig::standard().with_size((1, 2))),
            Err(GameError::Corrupt(CorruptGame::InvalidTile { row: 0, col: 1 }))
        );
    }
}
