#![cfg(feature = "serde")]

use warden_nav::{NavGrid, Navigator, Vec3};

#[test]
fn nav_grid_roundtrips_via_serde() {
    let mut grid = NavGrid::new(8, 6, 0.5).with_floor_y(1.0);
    for z in 0..5 {
        grid.set_blocked(3, z, true);
    }

    let json = serde_json::to_string(&grid).expect("serialize grid");
    let grid2: NavGrid = serde_json::from_str(&json).expect("deserialize grid");

    assert_eq!(grid, grid2);

    let start = Vec3::new(0.25, 1.0, 0.25);
    let goal = Vec3::new(3.75, 1.0, 0.25);
    let path1 = grid.find_path(start, goal).expect("path");
    let path2 = grid2.find_path(start, goal).expect("path");
    assert_eq!(path1.points, path2.points);
}
