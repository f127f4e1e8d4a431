use std::fmt::Display;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_COLUMNS: usize = 20;
pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_SURFACE: f32 = 720.0;

/// Interactive maze solver. Draw paths with the mouse and press space to solve.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// Grid dimensions expressed as COLUMNSxROWS (for example 20x20).
    #[arg(
        short = 's',
        long = "size",
        value_name = "COLUMNSxROWS",
        default_value_t = GridSize { columns: DEFAULT_COLUMNS, rows: DEFAULT_ROWS }
    )]
    pub size: GridSize,
    /// Width and height of the square drawing surface in pixels.
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = DEFAULT_SURFACE,
        value_parser = parse_surface
    )]
    pub surface: f32,
}

/// Grid dimensions parsed from a COLUMNSxROWS command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (columns, rows) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format COLUMNSxROWS".to_string())?;

        let columns = columns
            .trim()
            .parse::<usize>()
            .map_err(|error| format!("invalid columns: {error}"))?;
        let rows = rows
            .trim()
            .parse::<usize>()
            .map_err(|error| format!("invalid rows: {error}"))?;

        if columns == 0 || rows == 0 || columns * rows < 2 {
            return Err("the grid needs room for a separate start and goal".to_string());
        }

        Ok(Self { columns, rows })
    }
}

fn parse_surface(value: &str) -> Result<f32, String> {
    let pixels: f32 = value
        .parse()
        .map_err(|error| format!("invalid surface size: {error}"))?;

    if !(64.0..=4096.0).contains(&pixels) {
        return Err("surface size must be between 64 and 4096 pixels".to_string());
    }
    Ok(pixels)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grid_size() {
        assert_eq!(
            "30x12".parse::<GridSize>(),
            Ok(GridSize {
                columns: 30,
                rows: 12
            })
        );
        assert_eq!(
            " 2 X 1 ".parse::<GridSize>(),
            Ok(GridSize {
                columns: 2,
                rows: 1
            })
        );
        assert!("1x1".parse::<GridSize>().is_err());
        assert!("0x5".parse::<GridSize>().is_err());
        assert!("20".parse::<GridSize>().is_err());
        assert!("ax5".parse::<GridSize>().is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["maze-solver"]);
        assert_eq!(settings.size.to_string(), "20x20");
        assert_eq!(settings.surface, DEFAULT_SURFACE);
    }

    #[test]
    fn test_arguments() {
        let settings = Settings::try_parse_from(["maze-solver", "-s", "8x6", "--surface", "480"])
            .unwrap();
        assert_eq!(
            settings.size,
            GridSize {
                columns: 8,
                rows: 6
            }
        );
        assert_eq!(settings.surface, 480.0);

        assert!(Settings::try_parse_from(["maze-solver", "--surface", "10"]).is_err());
    }
}
