use std::{env, error::Error, hint::black_box, path::PathBuf, time::Instant};

use glam::Vec3;
use log::{error, info, warn};
use mesh_octree::{
    MeshData, Octree, OctreeConfig, Ray, WalkMode,
    collision::{altitude, ground_contact, pick_nearest},
    stats::{BenchmarkRecord, QueryStats},
    terrain::HeightmapTerrain,
};

const BENCHMARK_CSV: &str = "benchmarks/octree.csv";
const TERRAIN_SPACING: f32 = 2.0;
const TERRAIN_SEED: u32 = 99;

struct Args {
    config: Option<PathBuf>,
    benchmark: bool,
    size: usize,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        config: None,
        benchmark: false,
        size: 64,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--benchmark" | "-b" => args.benchmark = true,
            "--config" => args.config = Some(it.next().ok_or("--config needs a path")?.into()),
            "--size" => args.size = it.next().ok_or("--size needs a value")?.parse()?,
            other => warn!("Ignoring unknown argument {other}"),
        }
    }
    if args.size == 0 {
        return Err("--size must be at least 1".into());
    }
    Ok(args)
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => OctreeConfig::load(path)?,
        None => OctreeConfig::default(),
    };

    info!("Generating {0}x{0} terrain", args.size);
    let mesh = HeightmapTerrain::new(args.size, TERRAIN_SPACING, TERRAIN_SEED).generate()?;

    if args.benchmark {
        println!("Running in benchmark mode...");
        return run_benchmark(&mesh);
    }
    run_queries(Octree::with_config(mesh, &config))
}

fn run_queries(tree: Octree) -> Result<(), Box<dyn Error>> {
    let bounds = *tree.bounds();
    let center = bounds.center();

    // Lander hovering above the middle of the terrain
    let lander = Vec3::new(center.x, bounds.max.y + 20.0, center.z);
    let below = altitude(&tree, lander);
    match below {
        Some(hit) => info!("Altitude: {:.2} above point {}", hit.distance, hit.point_index),
        None => warn!("No terrain below lander at {lander}"),
    }

    // Touching down exactly on the surface point found below
    let contact = below.and_then(|hit| ground_contact(&tree, hit.position));
    if let Some(contact) = contact {
        info!("Ground contact at {} with normal {:?}", contact.position, contact.normal);
    }

    // Mouse pick from a camera outside the terrain corner, aimed at the center
    let camera = Vec3::new(bounds.min.x - 10.0, bounds.max.y + 30.0, bounds.min.z - 10.0);
    let ray = Ray::new(camera, (center - camera).normalize());
    let picked = pick_nearest(&tree, &ray, camera);
    match picked {
        Some(hit) => info!("Picked point {} at {}", hit.point_index, hit.position),
        None => warn!("Pick ray missed the terrain"),
    }

    let mut boxes_per_level = vec![0usize; 4];
    tree.walk(WalkMode::DepthLimited(4), |_, depth| {
        boxes_per_level[depth as usize] += 1
    });
    info!("Outline boxes for the first 4 levels: {boxes_per_level:?}");

    let summary = serde_json::json!({
        "bounds": bounds,
        "max_levels": tree.max_levels(),
        "stats": tree.stats(),
        "altitude": below,
        "contact": contact,
        "pick": picked,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// Brute force counterpart of `Octree::locate`: first index whose vertex sits at `point`
fn linear_lookup(mesh: &MeshData, point: Vec3) -> Option<u32> {
    mesh.indices()
        .iter()
        .copied()
        .find(|&index| mesh.vertex(index) == Some(point))
}

fn run_benchmark(mesh: &MeshData) -> Result<(), Box<dyn Error>> {
    let points = mesh.vertices();
    for levels in 2..=10 {
        let start = Instant::now();
        let tree = Octree::create(mesh.clone(), levels);
        let build = start.elapsed();

        let octree = QueryStats::measure(&format!("octree, {levels} levels"), points.len(), || {
            for point in points {
                black_box(tree.locate(*point));
            }
        });
        let linear = QueryStats::measure("linear scan", points.len(), || {
            for point in points {
                black_box(linear_lookup(mesh, *point));
            }
        });
        octree.print_query_stats();
        linear.print_query_stats();

        let record = BenchmarkRecord {
            max_levels: levels,
            tree: tree.stats(),
            build,
            octree,
            linear,
        };
        if let Err(err) = record.save_csv(BENCHMARK_CSV) {
            error!("Could not save benchmark results to {BENCHMARK_CSV}: {err}");
        }
    }
    Ok(())
}
