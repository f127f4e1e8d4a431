use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};

const PATH: u8 = 1 << 0;
const VISITED: u8 = 1 << 1;
const VALID: u8 = 1 << 2;
const START: u8 = 1 << 3;
const GOAL: u8 = 1 << 4;

/// Size of the surface the grid is drawn onto, in pixels
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel region covered by a single tile
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TileColor {
    Red,
    Black,
    Green,
    Grey,
    White,
}

impl TileColor {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            TileColor::Red => [255, 0, 0],
            TileColor::Black => [0, 0, 0],
            TileColor::Green => [0, 255, 0],
            TileColor::Grey => [105, 105, 105],
            TileColor::White => [255, 255, 255],
        }
    }
}

impl Display for TileColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TileColor::Red => "red",
                TileColor::Black => "black",
                TileColor::Green => "green",
                TileColor::Grey => "grey",
                TileColor::White => "white",
            }
        )
    }
}

/// The state of one cell of the maze.
///
/// All flags are kept in a single atomic byte so a tile can be read by the
/// renderer while the solve worker updates it. Every method takes `&self`;
/// callers are responsible for never having two writers at the same time.
#[derive(Debug)]
pub struct Tile {
    rect: Rect,
    flags: AtomicU8,
}

impl Tile {
    /// A new tile is a wall that has never been visited
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            flags: AtomicU8::new(0),
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    fn flags(&self) -> u8 {
        self.flags.load(Ordering::Relaxed)
    }

    fn set(&self, mask: u8) {
        self.flags.fetch_or(mask, Ordering::Relaxed);
    }

    fn clear(&self, mask: u8) {
        self.flags.fetch_and(!mask, Ordering::Relaxed);
    }

    /// Turns the tile into a path (valid) or a wall (invalid), forgetting any
    /// earlier search result on it.
    pub fn set_path(&self, value: bool) {
        if value {
            self.set(PATH | VALID);
        } else {
            self.clear(PATH | VALID);
        }
        self.unvisit();
    }

    pub fn set_as_start(&self) {
        self.set(START | VALID);
    }

    pub fn set_as_goal(&self) {
        self.set(GOAL | VALID);
    }

    pub fn visit(&self) {
        self.set(VISITED);
    }

    pub fn unvisit(&self) {
        self.clear(VISITED);
    }

    pub fn validate(&self) {
        self.set(VALID);
    }

    pub fn invalidate(&self) {
        self.clear(VALID);
    }

    /// Returns the tile to its construction state. Start and goal stay valid.
    pub fn reset(&self) {
        let keep = self.flags() & (START | GOAL);
        let flags = if keep != 0 { keep | VALID } else { 0 };
        self.flags.store(flags, Ordering::Relaxed);
    }

    pub fn is_path(&self) -> bool {
        self.flags() & PATH != 0
    }

    pub fn is_visited(&self) -> bool {
        self.flags() & VISITED != 0
    }

    pub fn is_valid(&self) -> bool {
        self.flags() & VALID != 0
    }

    pub fn is_start(&self) -> bool {
        self.flags() & START != 0
    }

    pub fn is_goal(&self) -> bool {
        self.flags() & GOAL != 0
    }

    pub fn render_color(&self) -> TileColor {
        // single load so the color is derived from one consistent snapshot
        let flags = self.flags();

        if flags & (START | GOAL) != 0 {
            TileColor::Red
        } else if flags & PATH == 0 {
            TileColor::Black
        } else if flags & VISITED != 0 {
            if flags & VALID != 0 {
                TileColor::Green
            } else {
                TileColor::Grey
            }
        } else {
            TileColor::White
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tile() -> Tile {
        Tile::new(Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        })
    }

    #[test]
    fn test_new_tile_is_wall() {
        let t = tile();
        assert!(!t.is_path());
        assert!(!t.is_valid());
        assert!(!t.is_visited());
        assert_eq!(t.render_color(), TileColor::Black);
    }

    #[test]
    fn test_set_path_forgets_search() {
        let t = tile();
        t.set_path(true);
        t.visit();
        t.invalidate();
        assert_eq!(t.render_color(), TileColor::Grey);

        t.set_path(true);
        assert!(t.is_valid());
        assert!(!t.is_visited());
        assert_eq!(t.render_color(), TileColor::White);

        t.visit();
        t.set_path(false);
        assert!(!t.is_valid());
        assert!(!t.is_visited());
        assert_eq!(t.render_color(), TileColor::Black);
    }

    #[test]
    fn test_colors() {
        let t = tile();
        t.set_path(true);
        t.visit();
        assert_eq!(t.render_color(), TileColor::Green);
        t.invalidate();
        assert_eq!(t.render_color(), TileColor::Grey);
        t.unvisit();
        assert_eq!(t.render_color(), TileColor::White);

        assert_eq!(TileColor::Grey.rgb(), [105, 105, 105]);
        assert_eq!(TileColor::Green.to_string(), "green");
    }

    #[test]
    fn test_start_and_goal_stay_valid() {
        let start = tile();
        start.set_as_start();
        assert!(start.is_valid());
        assert!(!start.is_path());
        assert_eq!(start.render_color(), TileColor::Red);

        start.visit();
        start.reset();
        assert!(start.is_start());
        assert!(start.is_valid());
        assert!(!start.is_visited());

        let goal = tile();
        goal.set_as_goal();
        goal.reset();
        assert!(goal.is_goal());
        assert!(goal.is_valid());
        assert_eq!(goal.render_color(), TileColor::Red);
    }

    #[test]
    fn test_reset() {
        let t = tile();
        t.set_path(true);
        t.visit();
        t.reset();
        assert!(!t.is_path());
        assert!(!t.is_visited());
        assert!(!t.is_valid());
    }

    #[test]
    fn test_rect_contains() {
        let t = tile();
        assert!(t.rect().contains(0.0, 9.9));
        assert!(!t.rect().contains(10.0, 5.0));
    }
}
