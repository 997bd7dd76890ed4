use super::*;
use crate::error::PlanningError;
use crate::spaces::{Cell, Grid, Marker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn is_neighbour(a: Cell, b: Cell) -> bool {
    let dx = a.x as i64 - b.x as i64;
    let dy = a.y as i64 - b.y as i64;
    (dx, dy) != (0, 0) && dx.abs() <= 1 && dy.abs() <= 1
}

fn assert_walkable(grid: &Grid, path: &[Cell]) {
    for w in path.windows(2) {
        assert!(is_neighbour(w[0], w[1]), "{:?} -> {:?}", w[0], w[1]);
    }
    for c in path {
        assert_ne!(grid.get(*c), Marker::Occupied, "{c:?}");
    }
}

#[test]
fn arena_reuses_freed_slots_and_respects_capacity() {
    let mut a = Arena::with_capacity(2);
    let n0 = a.alloc(Node::root(Cell::new(0, 0), 0)).unwrap();
    let n1 = a.alloc(Node::root(Cell::new(1, 0), 1)).unwrap();
    assert!(a.alloc(Node::root(Cell::new(2, 0), 2)).is_none());
    assert_eq!(a.live(), 2);
    let freed = a.free(n0);
    assert_eq!(freed.cell, Cell::new(0, 0));
    assert!(a.get(n0).is_none());
    let n2 = a.alloc(Node::root(Cell::new(2, 0), 2)).unwrap();
    assert_eq!(n2, n0);
    assert_eq!(a[n1].dist, 1);
    a.clear();
    assert_eq!(a.live(), 0);
    assert!(a.get(n1).is_none());
}

#[test]
#[should_panic(expected = "stale search node")]
fn stale_ids_are_rejected() {
    let mut a = Arena::with_capacity(1);
    let id = a.alloc(Node::root(Cell::new(0, 0), 0)).unwrap();
    a.free(id);
    let _dist = a[id].dist;
}

#[test]
fn frontier_is_sorted_and_fifo_among_ties() {
    let mut a = Arena::with_capacity(8);
    let mut f = Frontier::new();
    let dists = [3, 1, 3, 2, 1, 0];
    let ids: Vec<NodeId> = dists
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let id = a.alloc(Node::root(Cell::new(i, 0), d)).unwrap();
            f.insert(&mut a, id);
            id
        })
        .collect();
    assert_eq!(f.len(), 6);
    let mut order = Vec::new();
    while let Some(id) = f.pop(&mut a) {
        order.push(id);
    }
    assert_eq!(
        order,
        vec![ids[5], ids[1], ids[4], ids[3], ids[0], ids[2]]
    );
    assert!(f.is_empty());
}

#[test]
fn heuristic_uses_nearest_goal_rounded_up() {
    let goals = [Cell::new(10, 0), Cell::new(3, 4)];
    assert_eq!(heuristic(Cell::new(0, 0), &goals), 5);
    assert_eq!(heuristic(Cell::new(1, 1), &goals), 4); // sqrt(13) = 3.6
    assert_eq!(heuristic(Cell::new(10, 0), &goals), 0);
}

#[test]
fn first_neighbour_is_up() {
    let mut g = Grid::new(10);
    g.set(Cell::new(5, 6), Marker::End);
    let mut s = GreedySearch::new(64, 10);
    let path = s.run(&g, Cell::new(5, 5), &[Cell::new(5, 6)]).unwrap();
    assert_eq!(path, vec![Cell::new(5, 5), Cell::new(5, 6)]);
    assert_eq!(s.live_nodes(), 0);
}

#[test]
fn start_on_goal_is_a_single_step() {
    let mut g = Grid::new(4);
    g.set(Cell::new(1, 1), Marker::End);
    let mut s = GreedySearch::new(8, 10);
    let path = s.run(&g, Cell::new(1, 1), &[Cell::new(1, 1)]).unwrap();
    assert_eq!(path, vec![Cell::new(1, 1)]);
}

#[test]
fn open_grid_runs_straight_to_goal() {
    let mut g = Grid::new(50);
    let goal = Cell::new(40, 10);
    g.set(goal, Marker::End);
    let mut s = GreedySearch::new(4096, 300);
    let path = s.run(&g, Cell::new(0, 0), &[goal]).unwrap();
    assert_eq!(path.first(), Some(&Cell::new(0, 0)));
    assert_eq!(path.last(), Some(&goal));
    // Greedy, not optimal: close to the 8-connected lower bound of 41 cells.
    assert!((41..=45).contains(&path.len()), "{}", path.len());
    assert_walkable(&g, &path);
}

#[test]
fn walls_are_routed_around() {
    let mut g = Grid::new(20);
    for y in 0..15 {
        g.set(Cell::new(10, y), Marker::Occupied);
    }
    let goal = Cell::new(15, 2);
    g.set(goal, Marker::End);
    let mut s = GreedySearch::new(1024, 300);
    let path = s.run(&g, Cell::new(5, 2), &[goal]).unwrap();
    assert_eq!(path.last(), Some(&goal));
    assert!(path.iter().any(|c| c.y >= 15));
    assert_walkable(&g, &path);
    assert_eq!(s.live_nodes(), 0);
}

#[test]
fn enclosed_goal_reports_no_path() {
    let mut g = Grid::new(12);
    for i in 6..=10 {
        for j in [6, 10] {
            g.set(Cell::new(i, j), Marker::Occupied);
            g.set(Cell::new(j, i), Marker::Occupied);
        }
    }
    g.set(Cell::new(8, 8), Marker::End);
    let mut s = GreedySearch::new(1024, 300);
    let err = s.run(&g, Cell::new(0, 0), &[Cell::new(8, 8)]).unwrap_err();
    assert_eq!(err, PlanningError::NoPathFound);
    assert_eq!(s.live_nodes(), 0);
}

#[test]
fn dead_branches_are_released_as_they_die() {
    // One free row, no reachable goal: both branches from the start die out.
    let mut g = Grid::new(5);
    g.fill(Marker::Occupied);
    for x in 0..5 {
        g.set(Cell::new(x, 2), Marker::Free);
    }
    let mut s = GreedySearch::new(16, 10);
    let err = s.run(&g, Cell::new(2, 2), &[Cell::new(4, 4)]).unwrap_err();
    assert_eq!(err, PlanningError::NoPathFound);
    let stats = s.stats();
    assert_eq!(stats.allocated, 5);
    assert_eq!(stats.released_early, 5);
    assert_eq!(stats.expanded, 5);
}

#[test]
fn exhausted_arena_terminates_with_no_path() {
    let mut g = Grid::new(30);
    let goal = Cell::new(29, 29);
    g.set(goal, Marker::End);
    let mut s = GreedySearch::new(4, 300);
    // Walls force wide expansion before the goal can be approached.
    for x in 0..29 {
        g.set(Cell::new(x, 1), Marker::Occupied);
    }
    let err = s.run(&g, Cell::new(0, 0), &[goal]).unwrap_err();
    assert_eq!(err, PlanningError::NoPathFound);
    assert_eq!(s.live_nodes(), 0);
}

#[test]
fn overlong_path_is_rejected_not_truncated() {
    let mut g = Grid::new(50);
    let goal = Cell::new(49, 49);
    g.set(goal, Marker::End);
    let mut s = GreedySearch::new(4096, 10);
    let err = s.run(&g, Cell::new(0, 0), &[goal]).unwrap_err();
    assert_eq!(err, PlanningError::PathTooLong { limit: 10 });
    assert_eq!(s.live_nodes(), 0);
}

#[test]
fn serpentine_maze_forces_backtracking_and_releases_everything() {
    let dim = 40;
    let mut g = Grid::new(dim);
    // Full walls every fourth row, each with one gap at alternating ends, so
    // no diagonal step can slip through.
    for (k, y) in (4..dim).step_by(4).enumerate() {
        let gap = if k % 2 == 0 { dim - 1 } else { 0 };
        for x in (0..dim).filter(|&x| x != gap) {
            g.set(Cell::new(x, y), Marker::Occupied);
        }
    }
    let goal = Cell::new(0, dim - 1);
    g.set(goal, Marker::End);
    let mut s = GreedySearch::new(16384, 1000);
    let path = s.run(&g, Cell::new(0, 0), &[goal]).unwrap();
    assert_eq!(path.last(), Some(&goal));
    assert!(path.len() > 300, "{}", path.len());
    assert_walkable(&g, &path);
    assert!(s.stats().released_early > 0);
    assert_eq!(s.live_nodes(), 0);

    // Same maze, arena too small to hold the frontier.
    let mut small = GreedySearch::new(64, 1000);
    let err = small.run(&g, Cell::new(0, 0), &[goal]).unwrap_err();
    assert_eq!(err, PlanningError::NoPathFound);
    assert_eq!(small.live_nodes(), 0);
}

#[test]
fn random_mazes_always_terminate_cleanly() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..25 {
        let dim = rng.gen_range(8..40);
        let mut g = Grid::new(dim);
        for y in 0..dim {
            for x in 0..dim {
                if rng.gen_bool(0.35) {
                    g.set(Cell::new(x, y), Marker::Occupied);
                }
            }
        }
        let start = Cell::new(0, 0);
        let goal = Cell::new(dim - 1, dim - 1);
        g.set(start, Marker::Start);
        g.set(goal, Marker::End);
        let mut s = GreedySearch::new(rng.gen_range(4..512), 300);
        match s.run(&g, start, &[goal]) {
            Ok(path) => {
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
                assert_walkable(&g, &path);
            }
            Err(e) => assert!(matches!(
                e,
                PlanningError::NoPathFound | PlanningError::PathTooLong { .. }
            )),
        }
        assert_eq!(s.live_nodes(), 0);
    }
}
