use lane_defence_core::{CellCoord, LevelGrid, TileGrid, Vec2};
use lane_defence_system_path_builder::build;

fn level(rows: &[&str]) -> LevelGrid {
    LevelGrid::parse(&rows.join("\n"), 50.0).expect("test level must parse")
}

#[test]
fn follows_a_winding_lane_in_order() {
    let grid = level(&[
        "wwwwww",
        "+++www",
        "ww+www",
        "ww+++w",
        "wwwwww",
    ]);

    let path = build(&grid);

    assert_eq!(
        path.cells(),
        &[
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(2, 2),
            CellCoord::new(2, 3),
            CellCoord::new(3, 3),
            CellCoord::new(4, 3),
        ]
    );
    assert_eq!(path.points().len(), path.cells().len());
    assert_eq!(path.end(), Some(Vec2::new(225.0, 175.0)));
}

#[test]
fn converts_cells_to_tile_centres() {
    let grid = level(&["w++w"]).with_offset(Vec2::new(10.0, 20.0));

    let path = build(&grid);

    assert_eq!(
        path.points(),
        &[Vec2::new(85.0, 45.0), Vec2::new(135.0, 45.0)]
    );
    assert_eq!(path.start(), Some(grid.world_center_of(CellCoord::new(1, 0))));
    assert_eq!(path.end(), Some(grid.world_center_of(CellCoord::new(2, 0))));
    assert!(!path.is_degenerate());
}

#[test]
fn isolated_lane_tiles_produce_single_point_path() {
    let grid = level(&["+ww", "ww+"]);

    let path = build(&grid);

    assert_eq!(path.cells(), &[CellCoord::new(0, 0)]);
    assert_eq!(path.len(), 1);
    assert!(path.is_degenerate());
}

#[test]
fn branching_lane_is_truncated_at_first_dead_end() {
    // The walk prefers +x, so it runs east into the dead end at (3, 1) and
    // never visits the southern branch.
    let grid = level(&[
        "wwwww",
        "++++w",
        "w+www",
        "w+www",
    ]);

    let path = build(&grid);

    assert_eq!(
        path.cells(),
        &[
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(3, 1),
        ]
    );
}

#[test]
fn rebuilding_the_same_grid_is_deterministic() {
    let grid = level(&["+++", "w w", "+++"]);
    assert_eq!(build(&grid), build(&grid));
}
