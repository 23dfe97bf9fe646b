mod export;
mod nodes;
mod options;
mod progress;
mod staged;

use anyhow::{Context, Result};
use clap::Parser;
use dem::Grid;
use horizon::{AngleTable, ScanConfig, SpatialRef, Survey};
use indicatif::ProgressDrawTarget;
use log::info;
use nodes::NodeFile;
use options::Cli;
use progress::ProgressSink;
use std::time::Instant;
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let now = Instant::now();
    let nodes_name = cli.nodes.display().to_string();
    let dem_name = cli.dem.display().to_string();

    let node_prj = cli.node_prj();
    let node_ref = SpatialRef::from_prj(&node_prj)
        .with_context(|| format!("reading {}", node_prj.display()))?;
    let dem_prj = cli.dem_prj();
    let dem_ref = SpatialRef::from_prj(&dem_prj)
        .with_context(|| format!("reading {}", dem_prj.display()))?;
    let linear_unit = node_ref.ensure_compatible(&nodes_name, &dem_ref, &dem_name)?;

    let grid = Grid::open(&cli.dem, cli.grid_mode.into())
        .with_context(|| format!("opening {dem_name}"))?;
    let config = ScanConfig::builder()
        .max_search_km(cli.max_search_km)
        .cell_size(grid.cell_size())
        .elevation_unit(cli.elevation_units)
        .linear_unit(linear_unit)
        .directions(cli.directions)
        .build()?;

    let mut node_file =
        NodeFile::open(&cli.nodes).with_context(|| format!("reading {nodes_name}"))?;
    info!(
        "scanning {} nodes toward {} directions up to {} km, {}, {:?}",
        node_file.nodes().len(),
        cli.directions,
        cli.max_search_km,
        node_ref.name(),
        linear_unit,
    );

    let table = AngleTable::new();
    let pb = progress::bar("Scanning nodes".to_string(), node_file.nodes().len() as u64);
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(4));
    let sink = ProgressSink {
        table: &table,
        bar: &pb,
    };
    let records = Survey::new(&config, &grid).run(node_file.nodes(), &sink)?;
    pb.finish();

    // Nothing is replaced until every output is completely written.
    node_file.set_angles(&table);
    let nodes_out = cli.nodes_out();
    let staged_nodes = node_file
        .stage(&nodes_out)
        .with_context(|| format!("writing {}", nodes_out.display()))?;
    let staged_records = export::stage(&records, cli.format, &cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    staged_records.commit()?;
    staged_nodes.commit()?;
    export::copy_prj(&node_prj, &cli.out)?;

    info!(
        "wrote {} detail records to {} in {:?}",
        records.len(),
        cli.out.display(),
        now.elapsed()
    );
    Ok(())
}
