use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze::{Grid, Point, Size};

fn open_grid(size: usize) -> Grid {
    let grid = Grid::new(size, size, Size::new(size as f32, size as f32));
    for (point, _) in grid.tiles() {
        grid.set_path_at(point, true);
    }
    grid
}

/// Horizontal corridors joined at alternating ends, the search has to walk
/// every path tile before reaching the goal.
fn serpentine_grid(size: usize) -> Grid {
    let grid = Grid::new(size, size, Size::new(size as f32, size as f32));
    for row in (0..size).step_by(2) {
        for col in 0..size {
            grid.set_path_at(Point { row, col }, true);
        }
        if row + 1 < size {
            let col = if (row / 2) % 2 == 0 { size - 1 } else { 0 };
            grid.set_path_at(Point { row: row + 1, col }, true);
        }
    }
    grid
}

fn bench_grid(c: &mut Criterion, name: &str, grid: Grid) {
    c.bench_function(name, |b| {
        b.iter(|| {
            grid.un_solve();
            let found = grid.solve(black_box(false)).unwrap().wait();
            assert!(found);
        })
    });
}

pub fn open_small(c: &mut Criterion) {
    bench_grid(c, "open_20", open_grid(20));
}

pub fn open_large(c: &mut Criterion) {
    bench_grid(c, "open_200", open_grid(200));
}

pub fn serpentine(c: &mut Criterion) {
    // odd size so the last row is a corridor ending at the goal
    bench_grid(c, "serpentine_101", serpentine_grid(101));
}

criterion_group!(benches, open_small, open_large, serpentine);
criterion_main!(benches);
