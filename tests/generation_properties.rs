//! Property tests for the generation invariants.

use gemmaze::generation::{utils, GenerationConfig, Generator, MapGenerator};
use gemmaze::{build_maze, sample_positions};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;

proptest! {
    #[test]
    fn start_pocket_is_always_walkable(
        seed in any::<u64>(),
        width in 6u32..=8,
        height in 6u32..=8,
        density in 0.15f64..0.95,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = build_maze(width, height, density, &mut rng).unwrap();

        prop_assert!(grid.is_walkable(0, 0));
        prop_assert!(grid.is_walkable(1, 0));
        prop_assert!(grid.is_walkable(0, 1));
        prop_assert_eq!(grid.width(), width);
        prop_assert_eq!(grid.height(), height);
        prop_assert_eq!(grid.cell_count(), (width * height) as usize);
    }

    #[test]
    fn sampling_respects_count_exclusions_and_walkability(
        seed in any::<u64>(),
        count in 0usize..12,
        density in 0.15f64..0.25,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = build_maze(8, 8, density, &mut rng).unwrap();
        let exclude: HashSet<(u32, u32)> = [(0, 0), (1, 0), (0, 1)].into_iter().collect();

        let sampled = sample_positions(&grid, count, &exclude, &mut rng);
        prop_assert!(sampled.len() <= count);

        let mut seen = HashSet::new();
        for pos in &sampled {
            prop_assert!(grid.is_walkable(pos.x, pos.y));
            prop_assert!(!exclude.contains(&pos.cell()));
            prop_assert!(seen.insert(pos.cell()), "duplicate position sampled");
        }
    }

    #[test]
    fn exhausted_sampling_returns_every_candidate(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = build_maze(6, 6, 0.2, &mut rng).unwrap();

        let walkable: HashSet<(u32, u32)> = grid.walkable_cells().collect();
        let sampled: HashSet<(u32, u32)> =
            sample_positions(&grid, walkable.len() + 10, &HashSet::new(), &mut rng)
                .iter()
                .map(|p| p.cell())
                .collect();
        prop_assert_eq!(sampled, walkable);
    }

    #[test]
    fn multi_level_maps_hold_their_invariants(seed in any::<u64>()) {
        let config = GenerationConfig::multi_level(seed);
        let mut rng = utils::create_rng(&config);
        let generator = MapGenerator::multi_level(1);
        let map = generator.generate(&config, &mut rng).unwrap();

        prop_assert!((2..=3).contains(&map.level_count()));
        prop_assert_eq!(map.teleport_gates.len(), map.level_count() - 1);
        prop_assert_eq!(map.start.level_index(), 0);
        prop_assert_eq!(map.exit.level_index() as usize, map.level_count() - 1);

        let blue: u32 = map.levels.iter().map(|l| l.blue_gems.len() as u32).sum();
        let red: u32 = map.levels.iter().map(|l| l.red_gems.len() as u32).sum();
        prop_assert_eq!(map.required_blue_gems, blue);
        prop_assert_eq!(map.required_red_gems, red);

        for (i, gate) in map.teleport_gates.iter().enumerate() {
            prop_assert_eq!(gate.entry().level_index() as usize, i);
            prop_assert_eq!(gate.exit().level_index() as usize, i + 1);
        }

        for level in &map.levels {
            let mut seen = HashSet::new();
            for pos in level.placements() {
                prop_assert!(level.maze.is_walkable(pos.x, pos.y));
                prop_assert!(seen.insert(pos.cell()), "entity lists overlap");
            }
        }

        prop_assert!(generator.validate(&map, &config).is_ok());
    }

    #[test]
    fn single_level_maps_hold_their_invariants(seed in any::<u64>()) {
        let config = GenerationConfig::single_level(seed);
        let mut rng = utils::create_rng(&config);
        let generator = MapGenerator::single_level(1);
        let map = generator.generate(&config, &mut rng).unwrap();

        prop_assert_eq!(map.level_count(), 1);
        prop_assert!(map.teleport_gates.is_empty());
        prop_assert_eq!(map.start.cell(), (0, 0));

        let level = &map.levels[0];
        prop_assert!(level.maze.is_walkable(map.exit.x, map.exit.y));
        prop_assert!(level.placements().all(|p| p.cell() != map.exit.cell()));
        prop_assert_ne!(map.exit.cell(), (0, 0));

        prop_assert!(generator.validate(&map, &config).is_ok());
    }
}
