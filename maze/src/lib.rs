pub mod grid;
pub mod solve;
pub mod task;
pub mod tile;
pub mod util;

pub use grid::{Board, Direction, Grid, Point};
pub use solve::{search, PRIORITY, STEP_DELAY};
pub use task::{Mailbox, SolveHandle, SolveTask};
pub use tile::{Rect, Size, Tile, TileColor};
