use super::*;
use smallvec::SmallVec;

/// Per-turn spawn matching the browser client.
///
/// Blank positions are chosen first by [`TileRng::sample_indices`] over the whole
/// blank list. Each chosen blank then draws the operator-or-digit coin and
/// its tile, in sample order.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnGenerator {
    tiles_per_turn: u8,
    operator_spawn_rate: f64,
    operators: SmallVec<[Operator; 3]>,
    digits: SmallVec<[u8; 10]>,
}

impl SpawnGenerator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tiles_per_turn: config.tiles_per_turn,
            operator_spawn_rate: config.operator_spawn_rate,
            operators: config.operators.operators().collect(),
            digits: config.digits.iter().copied().collect(),
        }
    }

    fn draw_tile<R: TileRng>(&self, rng: &mut R) -> Option<Tile> {
        if rng.next_bool(self.operator_spawn_rate) {
            rng.choose(&self.operators).map(|&op| Tile::Operator(op))
        } else {
            rng.choose(&self.digits).map(|&digit| Tile::Number(digit.into()))
        }
    }
}

impl TileGenerator for SpawnGenerator {
    fn generate<R: TileRng>(&self, grid: &mut Grid, rng: &mut R) -> Vec<Placement> {
        let blank_count = grid.blank_count();
        let amount = blank_count.min(self.tiles_per_turn.into());
        if amount < self.tiles_per_turn.into() {
            log::debug!(
                "Only {} blanks left for {} spawns",
                blank_count,
                self.tiles_per_turn
            );
        }

        let mut picks: SmallVec<[(usize, Tile); 4]> = SmallVec::new();
        let mut placements = Vec::with_capacity(amount);
        for index in rng.sample_indices(blank_count, amount) {
            let Some(tile) = self.draw_tile(rng) else {
                log::warn!("Nothing to spawn, pool for the drawn kind is empty");
                break;
            };
            let coords = grid.blanks()[index];
            log::debug!("Spawned {} at {:?}", tile, coords);
            picks.push((index, tile));
            placements.push(Placement { coords, tile });
        }

        grid.fill_blanks(&picks);
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn blank_grid() -> Grid {
        Grid::empty(GameConfig::standard()).unwrap()
    }

    #[test]
    fn seed_s1_places_reproducible_tiles() {
        let mut grid = blank_grid();
        let mut rng = SeedRng::new("s1");

        let placements = generate_tiles(&mut grid, &mut rng);

        assert_eq!(
            placements,
            vec![
                Placement {
                    coords: (5, 3),
                    tile: Tile::Operator(Operator::Addition),
                },
                Placement {
                    coords: (4, 6),
                    tile: Tile::Operator(Operator::Subtraction),
                },
            ]
        );
        assert_eq!(grid.blank_count(), 40);
        assert!(!grid.blanks().contains(&(5, 3)));
        assert_eq!(grid[(4, 6)], Tile::Operator(Operator::Subtraction));
    }

    #[test]
    fn positions_are_sampled_before_any_tile_is_drawn() {
        let mut grid = blank_grid();
        let mut rng = SeedRng::new("order");
        let mut expected_rng = rng.clone();

        let placements = generate_tiles(&mut grid, &mut rng);

        let blanks = Grid::empty(GameConfig::standard()).unwrap().blanks().to_vec();
        let digits: [i64; 10] = core::array::from_fn(|digit| digit as i64);
        let picked = expected_rng.sample_indices(blanks.len(), 2);
        let expected: Vec<Placement> = picked
            .into_iter()
            .map(|index| {
                let tile = if expected_rng.next_bool(0.67) {
                    Tile::Operator(*expected_rng.choose(&Operator::ALL[..2]).unwrap())
                } else {
                    Tile::Number(*expected_rng.choose(&digits).unwrap())
                };
                Placement {
                    coords: blanks[index],
                    tile,
                }
            })
            .collect();
        assert_eq!(placements, expected);
        assert_eq!(rng, expected_rng);
    }

    #[test]
    fn shuffle_runs_even_without_spawns() {
        let config = GameConfig {
            tiles_per_turn: 0,
            ..GameConfig::standard()
        };
        let mut grid = Grid::empty(config).unwrap();
        let mut rng = SeedRng::new("idle");
        let mut expected_rng = rng.clone();

        assert!(generate_tiles(&mut grid, &mut rng).is_empty());
        expected_rng.sample_indices(42, 0);
        assert_eq!(rng, expected_rng);
        assert_eq!(grid.blank_count(), 42);
    }

    #[test]
    fn same_seed_and_blanks_give_same_placements() {
        for seed in ["a", "b", "repro-seed-123"] {
            let (mut first, mut second) = (blank_grid(), blank_grid());
            let placed_first = generate_tiles(&mut first, &mut SeedRng::new(seed));
            let placed_second = generate_tiles(&mut second, &mut SeedRng::new(seed));

            assert_eq!(placed_first, placed_second);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn spawns_only_onto_blanks_and_stops_when_full() {
        let config = GameConfig {
            tiles_per_turn: 5,
            ..GameConfig::standard().with_size((1, 3))
        };
        let mut grid = Grid::empty(config).unwrap();
        let mut rng = SeedRng::new("full");

        let placements = generate_tiles(&mut grid, &mut rng);

        assert_eq!(placements.len(), 3);
        assert_eq!(grid.blank_count(), 0);
        assert!(generate_tiles(&mut grid, &mut rng).is_empty());
    }

    #[test]
    fn spawn_rate_selects_tile_kind() {
        let only_operators = GameConfig {
            operator_spawn_rate: 1.0,
            tiles_per_turn: 10,
            ..GameConfig::standard()
        };
        let mut grid = Grid::empty(only_operators).unwrap();
        let placements = generate_tiles(&mut grid, &mut SeedRng::new("ops"));
        assert!(placements.iter().all(|p| p.tile.is_operator()));
        assert!(placements.iter().all(|p| p.tile.as_operator() != Some(Operator::Multiplication)));

        let only_sevens = GameConfig {
            operator_spawn_rate: 0.0,
            digits: vec![7],
            tiles_per_turn: 10,
            ..GameConfig::standard()
        };
        let mut grid = Grid::empty(only_sevens).unwrap();
        let placements = generate_tiles(&mut grid, &mut SeedRng::new("digits"));
        assert_eq!(placements.len(), 10);
        assert!(placements.iter().all(|p| p.tile == Tile::Number(7)));
    }
}
