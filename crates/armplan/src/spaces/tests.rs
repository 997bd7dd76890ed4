use super::*;
use crate::geom::Segment;
use crate::sample::{draw_obstacles, ObstacleSampleCfg, ReplayToken};

fn store() -> Spaces {
    Spaces::new(ArmCfg::default()).unwrap()
}

#[test]
fn obstacle_footprint_is_rasterised_inclusively() {
    let mut s = store();
    s.add_obstacle(Rectangle::axis_aligned(40.0, 40.0, 44.0, 44.0))
        .unwrap();
    assert_eq!(s.wspace().count(Marker::Occupied), 25);
    assert_eq!(s.wspace().get(Cell::new(40, 44)), Marker::Occupied);
    assert_eq!(s.wspace().get(Cell::new(45, 44)), Marker::Free);
}

#[test]
fn footprint_does_not_depend_on_edge_direction() {
    let square = Rectangle::axis_aligned(40.0, 40.0, 44.0, 44.0);
    let reversed = Rectangle {
        top: Segment::new(44.0, 44.0, 40.0, 44.0),
        left: Segment::new(40.0, 44.0, 40.0, 40.0),
        ..square
    };
    let mut s = store();
    s.add_obstacle(reversed).unwrap();
    assert_eq!(s.wspace().count(Marker::Occupied), 25);
    assert_eq!(s.wspace().get(Cell::new(42, 42)), Marker::Occupied);
}

#[test]
fn footprint_is_clipped_to_the_workspace() {
    let mut s = store();
    s.add_obstacle(Rectangle::axis_aligned(-10.0, 390.0, 2.0, 420.0))
        .unwrap();
    // x in 0..=2, y in 390..=394
    assert_eq!(s.wspace().count(Marker::Occupied), 15);
}

#[test]
fn obstacle_list_is_bounded() {
    let mut s = store();
    for i in 0..10 {
        let x = 10.0 * i as f64;
        s.add_obstacle(Rectangle::axis_aligned(x, 300.0, x + 2.0, 302.0))
            .unwrap();
    }
    let err = s
        .add_obstacle(Rectangle::axis_aligned(0.0, 0.0, 1.0, 1.0))
        .unwrap_err();
    assert_eq!(err, CapacityExceeded { limit: 10 });
    assert_eq!(s.obstacles().len(), 10);
}

#[test]
fn unreachable_tips_are_occupied() {
    let mut s = store();
    s.generate_cspace().unwrap();
    // theta0 = 0, theta1 = 90: both links along +x, tip at x = 397 (outside 395).
    assert_eq!(s.cspace().get(Cell::new(0, 90)), Marker::Occupied);
    // Both links straight up: tip at (197, 230).
    assert_eq!(s.cspace().get(Cell::new(90, 90)), Marker::Free);
    // theta0 = 90, theta1 = 0: second link along +x, tip at (297, 130).
    assert_eq!(s.cspace().get(Cell::new(90, 0)), Marker::Free);
}

#[test]
fn first_link_collision_occupies_whole_column() {
    let mut s = store();
    // On the 45° ray of the first link from (197, 30).
    s.add_obstacle(Rectangle::axis_aligned(250.0, 80.0, 260.0, 90.0))
        .unwrap();
    s.generate_cspace().unwrap();
    let dim = s.cfg().cspace_dim();
    assert!((0..dim).all(|t1| s.cspace().get(Cell::new(45, t1)) == Marker::Occupied));
    assert_eq!(s.cspace().get(Cell::new(135, 90)), Marker::Free);
}

#[test]
fn second_link_collision_occupies_single_cells() {
    let mut s = store();
    // Below the (90°, 0°) second link, whose centreline runs at y = 130.
    let obstacle = Rectangle::axis_aligned(270.0, 120.0, 280.0, 125.0);
    assert!(!obstacle.collides_with(&Segment::new(197.0, 130.0, 297.0, 130.0)));
    s.add_obstacle(obstacle).unwrap();
    s.generate_cspace().unwrap();
    // Caught by the link's width, not its centreline.
    assert_eq!(s.cspace().get(Cell::new(90, 0)), Marker::Occupied);
    assert_eq!(s.cspace().get(Cell::new(90, 10)), Marker::Occupied);
    // The rest of the column is untouched.
    assert_eq!(s.cspace().get(Cell::new(90, 90)), Marker::Free);
}

#[test]
fn regeneration_is_deterministic() {
    let cfg = ArmCfg::default();
    let obstacles = draw_obstacles(
        &cfg,
        ObstacleSampleCfg::default(),
        ReplayToken { seed: 7, index: 3 },
    );
    let mut s = Spaces::new(cfg).unwrap();
    for o in obstacles {
        s.add_obstacle(o).unwrap();
    }
    s.generate_cspace().unwrap();
    let first = s.cspace().clone();
    s.generate_cspace().unwrap();
    assert_eq!(&first, s.cspace());
}

#[test]
fn late_obstacle_invalidates_cspace() {
    let mut s = store();
    s.generate_cspace().unwrap();
    assert!(s.is_generated());
    s.add_obstacle(Rectangle::axis_aligned(250.0, 80.0, 260.0, 90.0))
        .unwrap();
    assert!(!s.is_generated());
    s.ensure_generated().unwrap();
    assert!(s.is_generated());
    assert_eq!(s.cspace().get(Cell::new(45, 0)), Marker::Occupied);
}

#[test]
fn reset_clears_everything() {
    let mut s = store();
    s.add_obstacle(Rectangle::axis_aligned(40.0, 40.0, 44.0, 44.0))
        .unwrap();
    s.generate_cspace().unwrap();
    s.reset();
    assert!(s.obstacles().is_empty());
    assert_eq!(s.wspace().count(Marker::Occupied), 0);
    assert_eq!(s.cspace().count(Marker::Occupied), 0);
    assert!(!s.is_generated());
}

#[test]
fn staging_is_an_independent_copy() {
    let mut s = store();
    s.generate_cspace().unwrap();
    let mut st = Staging::for_cfg(s.cfg());
    s.stage_into(&mut st);
    assert_eq!(&st.cspace, s.cspace());
    st.cspace.set(Cell::new(90, 90), Marker::Start);
    st.wspace.set(Cell::new(1, 1), Marker::End);
    assert_eq!(s.cspace().get(Cell::new(90, 90)), Marker::Free);
    st.cleanup();
    assert_eq!(&st.cspace, s.cspace());
    assert_eq!(&st.wspace, s.wspace());
}
