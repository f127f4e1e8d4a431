use std::fmt::Display;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;

use crate::solve::search;
use crate::task::{SolveHandle, SolveTask};
use crate::tile::{Rect, Size, Tile, TileColor};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

/// The tiles and the traversal cursor. This is the part of a [`Grid`] that is
/// shared with the solve worker.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    // row-major, one single vec
    tiles: Vec<Tile>,
    cursor_row: AtomicUsize,
    cursor_col: AtomicUsize,
}

impl Board {
    fn new(columns: usize, rows: usize, tile_size: Size) -> Self {
        let mut tiles = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                tiles.push(Tile::new(Rect {
                    x: col as f32 * tile_size.width,
                    y: row as f32 * tile_size.height,
                    width: tile_size.width,
                    height: tile_size.height,
                }));
            }
        }

        let board = Self {
            rows,
            columns,
            tiles,
            cursor_row: AtomicUsize::new(0),
            cursor_col: AtomicUsize::new(0),
        };
        board.tile(board.start()).set_as_start();
        board.tile(board.goal()).set_as_goal();
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        Point { row: 0, col: 0 }
    }

    pub fn goal(&self) -> Point {
        Point {
            row: self.rows - 1,
            col: self.columns - 1,
        }
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// Panics if the point lies outside the board
    pub fn tile(&self, point: Point) -> &Tile {
        assert!(self.is_valid(point), "{} is outside the board", point);
        &self.tiles[point.row * self.columns + point.col]
    }

    /// Iterate over all tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Point, &Tile)> {
        let columns = self.columns;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            (
                Point {
                    row: i / columns,
                    col: i % columns,
                },
                tile,
            )
        })
    }

    pub fn cursor(&self) -> Point {
        Point {
            row: self.cursor_row.load(Ordering::Relaxed),
            col: self.cursor_col.load(Ordering::Relaxed),
        }
    }

    fn set_cursor(&self, point: Point) {
        self.cursor_row.store(point.row, Ordering::Relaxed);
        self.cursor_col.store(point.col, Ordering::Relaxed);
    }

    /// Moves the cursor back to the start tile
    pub(crate) fn park_cursor(&self) {
        self.set_cursor(self.start());
    }

    /// The tile under the cursor
    pub fn current(&self) -> &Tile {
        self.tile(self.cursor())
    }

    pub fn has_up(&self) -> bool {
        self.cursor().row > 0
    }

    pub fn has_down(&self) -> bool {
        self.cursor().row < self.rows - 1
    }

    pub fn has_left(&self) -> bool {
        self.cursor().col > 0
    }

    pub fn has_right(&self) -> bool {
        self.cursor().col < self.columns - 1
    }

    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.has_up(),
            Direction::Down => self.has_down(),
            Direction::Left => self.has_left(),
            Direction::Right => self.has_right(),
        }
    }

    /// The point one step from the cursor, if it is on the board
    pub fn neighbor(&self, direction: Direction) -> Option<Point> {
        if !self.has(direction) {
            return None;
        }
        let Point { row, col } = self.cursor();
        Some(match direction {
            Direction::Up => Point { row: row - 1, col },
            Direction::Down => Point { row: row + 1, col },
            Direction::Left => Point { row, col: col - 1 },
            Direction::Right => Point { row, col: col + 1 },
        })
    }

    /// Moves the cursor one step. Panics if that would leave the board.
    pub fn move_to(&self, direction: Direction) {
        match self.neighbor(direction) {
            Some(point) => self.set_cursor(point),
            None => panic!(
                "cannot move {} from {}: no tile in that direction",
                direction,
                self.cursor()
            ),
        }
    }

    pub fn move_up(&self) {
        self.move_to(Direction::Up);
    }

    pub fn move_down(&self) {
        self.move_to(Direction::Down);
    }

    pub fn move_left(&self) {
        self.move_to(Direction::Left);
    }

    pub fn move_right(&self) {
        self.move_to(Direction::Right);
    }
}

/// A fixed-size maze together with the worker that solves it.
///
/// Edits, [`Grid::un_solve`], [`Grid::reset`] and [`Grid::solve`] must only be
/// called while [`Grid::is_solving`] is false; they panic otherwise.
/// [`Grid::draw`] may be called at any time.
#[derive(Debug)]
pub struct Grid {
    board: Arc<Board>,
    task: SolveTask,
    tile_size: Size,
}

impl Grid {
    /// Creates a `columns` x `rows` grid drawn onto a surface of the given size.
    /// All tiles start out as walls except the start and goal.
    pub fn new(columns: usize, rows: usize, surface: Size) -> Self {
        assert!(
            columns > 0 && rows > 0 && columns * rows >= 2,
            "a grid needs at least two tiles, got {}x{}",
            columns,
            rows
        );

        let tile_size = Size {
            width: surface.width / columns as f32,
            height: surface.height / rows as f32,
        };

        Self {
            board: Arc::new(Board::new(columns, rows, tile_size)),
            task: SolveTask::spawn(),
            tile_size,
        }
    }

    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    pub fn map_pixel_to_cell(&self, x: f32, y: f32) -> Point {
        let col = (x / self.tile_size.width).floor().max(0.0) as usize;
        let row = (y / self.tile_size.height).floor().max(0.0) as usize;

        // a position exactly on the far edge belongs to the last tile
        Point {
            row: row.min(self.rows() - 1),
            col: col.min(self.columns() - 1),
        }
    }

    pub fn set_as_path(&self, x: f32, y: f32) {
        self.set_path_at(self.map_pixel_to_cell(x, y), true);
    }

    pub fn set_as_wall(&self, x: f32, y: f32) {
        self.set_path_at(self.map_pixel_to_cell(x, y), false);
    }

    /// Marks the tile as path or wall. Start and goal are left untouched.
    pub fn set_path_at(&self, point: Point, value: bool) {
        self.assert_idle("edit");

        let tile = self.tile(point);
        if tile.is_start() || tile.is_goal() {
            return;
        }
        tile.set_path(value);
    }

    pub fn is_solving(&self) -> bool {
        self.task.is_busy()
    }

    /// Makes every path tile traversable again while keeping the drawn maze
    pub fn un_solve(&self) {
        self.assert_idle("un_solve");

        self.board.park_cursor();
        for (_, tile) in self.board.tiles() {
            if tile.is_path() || tile.is_start() || tile.is_goal() {
                tile.validate();
                tile.unvisit();
            }
        }
    }

    /// Discards all edits and search results
    pub fn reset(&self) {
        self.assert_idle("reset");

        self.board.park_cursor();
        for (_, tile) in self.board.tiles() {
            tile.reset();
        }
    }

    /// Starts a search from the start tile on the solve worker and returns
    /// without waiting for it.
    pub fn solve(&self, show_step: bool) -> Result<SolveHandle, anyhow::Error> {
        self.assert_idle("solve");
        assert!(
            self.cursor() == self.start() && !self.tile(self.start()).is_visited(),
            "the grid holds a previous search, call un_solve first"
        );

        debug!(
            "submitting solve of {}x{} grid (show_step = {})",
            self.columns(),
            self.rows(),
            show_step
        );

        let board = Arc::clone(&self.board);
        self.task.submit(move || {
            let found = search(&board, show_step);
            board.park_cursor();
            found
        })
    }

    /// Hands every tile's region and color to `paint`, in row-major order
    pub fn draw(&self, mut paint: impl FnMut(&Rect, TileColor)) {
        for (_, tile) in self.board.tiles() {
            paint(tile.rect(), tile.render_color());
        }
    }

    /// The tiles currently marked as part of the found path
    pub fn solution(&self) -> Vec<Point> {
        self.board
            .tiles()
            .filter(|(_, tile)| tile.is_visited() && tile.is_valid())
            .map(|(point, _)| point)
            .collect()
    }

    fn assert_idle(&self, operation: &str) {
        assert!(
            !self.is_solving(),
            "{} called while a solve is running",
            operation
        );
    }
}

impl Deref for Grid {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.columns() {
                let tile = self.tile(Point { row, col });
                let c = if tile.is_start() {
                    'S'
                } else if tile.is_goal() {
                    'G'
                } else {
                    match tile.render_color() {
                        TileColor::Black => '#',
                        TileColor::White => '.',
                        TileColor::Green => '*',
                        TileColor::Grey => 'x',
                        TileColor::Red => unreachable!("only start and goal are red"),
                    }
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
