use anyhow::{anyhow, bail};
use image::{DynamicImage, GenericImageView};

use crate::{Grid, Point, Size};

/// Builds a grid from an image, one tile per pixel. Dark pixels (red channel
/// below 128) become walls. Start and goal are fixed regardless of the image.
pub fn parse_img(img: &DynamicImage) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    if width * height < 2 {
        bail!("image of {}x{} pixels is too small for a maze", width, height);
    }

    let grid = Grid::new(width, height, Size::new(width as f32, height as f32));

    for row in 0..height {
        for col in 0..width {
            let p = img.get_pixel(col as u32, row as u32);
            grid.set_path_at(Point { row, col }, p.0[0] >= 128);
        }
    }

    Ok(grid)
}

/// Builds a grid from text, one line per row.
///
/// `#` is a wall, `.` or a space is a path. `S` and `G` may only appear at the
/// top-left and bottom-right corner, which are always the start and goal.
pub fn parse_text(text: &str) -> Result<Grid, anyhow::Error> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .collect();

    let rows = lines.len();
    let columns = lines.first().map(|line| line.chars().count()).unwrap_or(0);

    if rows * columns < 2 {
        bail!("a maze needs at least two tiles");
    }

    let grid = Grid::new(columns, rows, Size::new(columns as f32, rows as f32));

    for (row, line) in lines.iter().enumerate() {
        if line.chars().count() != columns {
            bail!(
                "row {} has {} tiles, expected {}",
                row,
                line.chars().count(),
                columns
            );
        }

        for (col, c) in line.chars().enumerate() {
            let point = Point { row, col };
            let fixed = point == grid.start() || point == grid.goal();

            match c {
                '.' | ' ' => grid.set_path_at(point, true),
                '#' if fixed => bail!("{} must not be a wall", point),
                '#' => grid.set_path_at(point, false),
                'S' if point == grid.start() => {}
                'G' if point == grid.goal() => {}
                'S' | 'G' => bail!("'{}' at {} is not allowed, start and goal are fixed", c, point),
                _ => return Err(anyhow!("unknown tile '{}' at {}", c, point)),
            }
        }
    }

    Ok(grid)
}
