use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dem::{Grid, Header};
use geo::geometry::Coord;
use horizon::{
    AngleTable, Azimuth, DirectionSet, ElevationUnit, LinearUnit, Node, ScanConfig, Scanner,
    Survey,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const CELL_SIZE: f64 = 10.0;
const SIDE: usize = 2001;

/// Rolling synthetic terrain, 20 km on a side, centered on the
/// origin.
fn synthetic_grid() -> Grid {
    let corner = -(SIDE as f64 / 2.0) * CELL_SIZE;
    let header = Header {
        ncols: SIDE,
        nrows: SIDE,
        xll: corner,
        yll: corner,
        cell_size: CELL_SIZE,
        nodata: Header::DEFAULT_NODATA,
        endian: Default::default(),
    };
    let mut samples = Vec::with_capacity(SIDE * SIDE);
    for row in 0..SIDE {
        for col in 0..SIDE {
            let x = corner + (col as f64 + 0.5) * CELL_SIZE;
            let y = -corner - (row as f64 + 0.5) * CELL_SIZE;
            let elev = 500.0 + 120.0 * (x / 900.0).sin() * (y / 1300.0).cos() + x / 50.0;
            samples.push(elev as f32);
        }
    }
    Grid::from_samples(header, samples).unwrap()
}

fn config(km: f64, directions: DirectionSet) -> ScanConfig {
    ScanConfig::builder()
        .max_search_km(km)
        .cell_size(CELL_SIZE)
        .elevation_unit(ElevationUnit::Meters)
        .linear_unit(LinearUnit::Meter)
        .directions(directions)
        .build()
        .unwrap()
}

fn single_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scan");
    let grid = synthetic_grid();
    let node = Node::new(1, Coord { x: 120.0, y: -340.0 });

    for km in [1.0, 5.0, 9.0] {
        let config = config(km, DirectionSet::Three);
        let station = node.resolve(&grid, &config).unwrap();
        let scanner = Scanner::new(&config, &grid);
        group.bench_with_input(BenchmarkId::new("west", km), &station, |b, s| {
            b.iter(|| scanner.scan(s, Azimuth::West))
        });
    }
}

fn survey(c: &mut Criterion) {
    let mut group = c.benchmark_group("Survey");
    let grid = synthetic_grid();
    let nodes: Vec<Node> = (0..500)
        .map(|i| {
            let x = ((i * 37) % 1000) as f64 * 8.0 - 4000.0;
            let y = ((i * 91) % 1000) as f64 * 8.0 - 4000.0;
            Node::new(i, Coord { x, y })
        })
        .collect();
    let config = config(1.0, DirectionSet::Seven);

    group.bench_with_input("500 nodes", &nodes, |b, nodes| {
        b.iter(|| {
            Survey::new(&config, &grid)
                .run(nodes, &AngleTable::new())
                .unwrap()
        })
    });
}

criterion_group!(benches, single_scan, survey);
criterion_main!(benches);
