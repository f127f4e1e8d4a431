use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use maze::util::{parse_img, parse_text};

/// Solve a maze read from a text or image file and print the result.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Maze file. Text mazes use `#` for walls and `.` for paths.
    #[arg(value_name = "MAZE")]
    maze: PathBuf,
    /// Read the maze from an image, one tile per pixel, dark pixels are walls.
    #[arg(long)]
    image: bool,
    /// Pause after every visited tile.
    #[arg(long)]
    show_step: bool,
}

fn main() -> Result<ExitCode, anyhow::Error> {
    env_logger::init();
    let args = CliArgs::parse();

    let grid = if args.image {
        let img = image::open(&args.maze)
            .with_context(|| format!("failed to open image {}", args.maze.display()))?;
        parse_img(&img)?
    } else {
        let text = std::fs::read_to_string(&args.maze)
            .with_context(|| format!("failed to read {}", args.maze.display()))?;
        parse_text(&text).with_context(|| format!("invalid maze in {}", args.maze.display()))?
    };
    info!("loaded {}x{} maze", grid.columns(), grid.rows());

    let found = grid.solve(args.show_step)?.wait();

    print!("{}", grid);
    if found {
        println!("path found ({} cells)", grid.solution().len());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("no path found");
        Ok(ExitCode::FAILURE)
    }
}
