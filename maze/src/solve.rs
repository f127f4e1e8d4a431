//! Backtracking depth-first search over a [`Board`].
//!
//! The search walks the board's shared cursor. Starting from the tile under
//! the cursor it marks each tile it enters as visited, tries the neighbors in
//! [`PRIORITY`] order and stops at the first path that reaches the goal. A
//! neighbor whose exploration failed is invalidated and never entered again,
//! so every tile is entered at most once per search.

use std::thread;
use std::time::Duration;

use log::{debug, trace};

use crate::grid::{Board, Direction};

/// Order in which the neighbors of a tile are tried
pub const PRIORITY: [Direction; 4] = [
    Direction::Down,
    Direction::Right,
    Direction::Up,
    Direction::Left,
];

/// Pause after each visited tile when stepping is shown
pub const STEP_DELAY: Duration = Duration::from_millis(10);

/// One level of the search: the tile under the cursor when it was pushed
struct Frame {
    /// how the cursor got onto this tile, `None` for the tile the search began on
    entered_by: Option<Direction>,
    /// index into PRIORITY of the next neighbor to try
    next: usize,
}

/// Enter the tile under the cursor. Returns true if it is the goal.
fn enter(board: &Board, show_step: bool) -> bool {
    let tile = board.current();
    tile.visit();
    trace!("visiting {}", board.cursor());

    if show_step {
        thread::sleep(STEP_DELAY);
    }

    tile.is_goal()
}

fn is_eligible(board: &Board, direction: Direction) -> bool {
    match board.neighbor(direction) {
        Some(point) => {
            let tile = board.tile(point);
            !tile.is_visited() && tile.is_valid()
        }
        None => false,
    }
}

/// Search for a path from the cursor to the goal.
///
/// On success the cursor is left on the goal and the visited and valid tiles
/// form the path. On failure the cursor is back where it started.
pub fn search(board: &Board, show_step: bool) -> bool {
    let mut visited = 1;

    if enter(board, show_step) {
        debug!("search reached the goal after {} tiles", visited);
        return true;
    }

    let mut frames = vec![Frame {
        entered_by: None,
        next: 0,
    }];

    while let Some(frame) = frames.last_mut() {
        let candidate = (frame.next..PRIORITY.len()).find(|&i| is_eligible(board, PRIORITY[i]));

        match candidate {
            Some(i) => {
                frame.next = i + 1;

                let direction = PRIORITY[i];
                board.move_to(direction);
                visited += 1;

                if enter(board, show_step) {
                    debug!("search reached the goal after {} tiles", visited);
                    return true;
                }

                frames.push(Frame {
                    entered_by: Some(direction),
                    next: 0,
                });
            }
            None => {
                // dead end: prune this tile and go back to where we came from
                let Some(direction) = frame.entered_by else {
                    break;
                };
                frames.pop();

                trace!("abandoning {}", board.cursor());
                board.current().invalidate();
                board.move_to(direction.opposite());
            }
        }
    }

    debug!("no path to the goal, {} tiles explored", visited);
    false
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::{Grid, Point};
    use crate::tile::Size;
    use crate::util::parse_text;
    use std::collections::{HashSet, VecDeque};

    fn open_grid(columns: usize, rows: usize) -> Grid {
        let grid = Grid::new(columns, rows, Size::new(columns as f32, rows as f32));
        for row in 0..rows {
            for col in 0..columns {
                grid.set_path_at(Point::new(row, col), true);
            }
        }
        grid
    }

    /// Search on the calling thread, bypassing the worker
    fn search_now(grid: &Grid) -> bool {
        let board: &Board = grid;
        search(board, false)
    }

    fn marks(grid: &Grid) -> Vec<(bool, bool)> {
        grid.tiles()
            .map(|(_, t)| (t.is_visited(), t.is_valid()))
            .collect()
    }

    /// cells reachable from start through non-wall tiles
    fn reachable(grid: &Grid) -> HashSet<Point> {
        let mut seen = HashSet::from([grid.start()]);
        let mut queue = VecDeque::from([grid.start()]);
        while let Some(p) = queue.pop_front() {
            let mut next = Vec::new();
            if p.row > 0 {
                next.push(Point::new(p.row - 1, p.col));
            }
            if p.col > 0 {
                next.push(Point::new(p.row, p.col - 1));
            }
            if p.row + 1 < grid.rows() {
                next.push(Point::new(p.row + 1, p.col));
            }
            if p.col + 1 < grid.columns() {
                next.push(Point::new(p.row, p.col + 1));
            }
            for n in next {
                let t = grid.tile(n);
                if (t.is_path() || t.is_goal()) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    #[test]
    fn test_open_grid_follows_priority() {
        let grid = open_grid(3, 3);

        assert!(search_now(&grid));
        assert_eq!(grid.cursor(), grid.goal());
        assert_eq!(
            grid.solution(),
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2),
            ]
        );
        assert_eq!(grid.tiles().filter(|(_, t)| t.is_visited()).count(), 5);
    }

    #[test]
    fn test_blocked_corner() {
        // every tile other than start and goal is a wall
        let grid = Grid::new(2, 2, Size::new(2.0, 2.0));
        grid.set_path_at(Point::new(0, 1), false);
        grid.set_path_at(Point::new(1, 0), false);

        assert!(!search_now(&grid));
        assert_eq!(grid.cursor(), grid.start());
        assert!(grid.tile(grid.start()).is_valid());
        assert!(!grid.tile(grid.goal()).is_visited());
    }

    #[test]
    fn test_backtracking_prunes_dead_ends() {
        let grid = parse_text(
            "S...\n\
             .##.\n\
             .#..\n\
             .#.G",
        )
        .unwrap();

        assert!(search_now(&grid));
        // down the left column is a dead end, then right along the top
        for row in 1..4 {
            let t = grid.tile(Point::new(row, 0));
            assert!(t.is_visited() && !t.is_valid());
        }
        assert_eq!(
            grid.solution(),
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(0, 3),
                Point::new(1, 3),
                Point::new(2, 3),
                Point::new(3, 3),
            ]
        );
        assert!(!grid.tile(Point::new(2, 2)).is_visited());
    }

    #[test]
    fn test_no_path_invalidates_reachable() {
        let grid = parse_text(
            "S..#.\n\
             .#.#.\n\
             ...#.\n\
             ####G",
        )
        .unwrap();
        let reachable = reachable(&grid);

        assert!(!search_now(&grid));
        for (point, tile) in grid.tiles() {
            if point == grid.start() {
                assert!(tile.is_valid() && tile.is_visited());
            } else if reachable.contains(&point) {
                assert!(!tile.is_valid(), "{} should be pruned", point);
                assert!(tile.is_visited());
            } else {
                assert!(!tile.is_visited());
            }
        }
    }

    #[test]
    fn test_path_is_connected() {
        let grid = parse_text(
            "S.#....\n\
             #...##.\n\
             .#.#...\n\
             ...#.#.\n\
             .#...#G",
        )
        .unwrap();

        assert!(search_now(&grid));
        let path = grid.solution();
        assert!(path.contains(&grid.start()));
        assert!(path.contains(&grid.goal()));

        // every traversed tile except the goal has a successor on the path
        for p in &path {
            if *p == grid.goal() {
                continue;
            }
            let neighbors = path
                .iter()
                .filter(|q| p.row.abs_diff(q.row) + p.col.abs_diff(q.col) == 1)
                .count();
            assert!(neighbors >= 1);
        }
        assert!(grid.tiles().filter(|(_, t)| t.is_visited()).count() <= 35);
    }

    #[test]
    fn test_deterministic_after_un_solve() {
        let grid = parse_text(
            "S.....\n\
             .####.\n\
             .#..#.\n\
             ...#..\n\
             ##...G",
        )
        .unwrap();

        let first = search_now(&grid);
        let first_marks = marks(&grid);

        grid.un_solve();
        let second = search_now(&grid);

        assert_eq!(first, second);
        assert_eq!(first_marks, marks(&grid));
    }

    #[test]
    fn test_deep_maze() {
        // serpentine corridor, forces a long chain of frames
        let columns = 200;
        let rows = 201;
        let grid = Grid::new(columns, rows, Size::new(columns as f32, rows as f32));
        for row in (0..rows).step_by(2) {
            for col in 0..columns {
                grid.set_path_at(Point::new(row, col), true);
            }
            if row + 1 < rows {
                let col = if (row / 2) % 2 == 0 { columns - 1 } else { 0 };
                grid.set_path_at(Point::new(row + 1, col), true);
            }
        }

        assert!(search_now(&grid));
        assert_eq!(grid.cursor(), grid.goal());
    }
}
