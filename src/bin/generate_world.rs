//! World generator binary: builds terrain and a few trees, meshes them in
//! chunks, and reports per-chunk statistics.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     JSON generation config (defaults apply for missing fields)
//!   --seed <SEED>       Override the config seed
//!   --width <N>         Override map width
//!   --height <N>        Override map height
//!   --length <N>        Override map length
//!   --chunk <N>         Override chunk size
//!   --trees <N>         Trees to grow along the map diagonal (default: 1)
//!   --crossed-leaves    Mesh leaves as crossed planes
//!   --jobs <N>          Max parallel chunk extractions (default: all cores)
//!   --manifest <PATH>   Write per-chunk statistics as JSON

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use voxgen::core::logging;
use voxgen::generation::{ChunkSink, GenerationConfig, GenerationPipeline, GenerationStats, MeshLayer};
use voxgen::mesh::{MeshBuffers, MeshStyle};
use voxgen::voxel::chunk::ChunkCoord;

/// Collects per-chunk rows for the manifest.
#[derive(Default)]
struct ChunkReport {
    rows: Vec<serde_json::Value>,
}

impl ChunkSink for ChunkReport {
    fn on_chunk_ready(&mut self, layer: MeshLayer, coord: ChunkCoord, mesh: MeshBuffers) {
        self.rows.push(json!({
            "layer": format!("{:?}", layer),
            "x": coord.x,
            "y": coord.y,
            "z": coord.z,
            "vertices": mesh.vertex_count(),
            "triangles": mesh.triangle_count(),
        }));
    }
}

fn main() -> voxgen::core::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => GenerationConfig::load(&PathBuf::from(path))?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = parse_i32_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(width) = parse_u32_arg(&args, "--width") {
        config.map_width = width;
    }
    if let Some(height) = parse_u32_arg(&args, "--height") {
        config.map_height = height;
    }
    if let Some(length) = parse_u32_arg(&args, "--length") {
        config.map_length = length;
    }
    if let Some(chunk) = parse_u32_arg(&args, "--chunk") {
        config.chunk_size = chunk;
    }
    if args.iter().any(|a| a == "--crossed-leaves") {
        config.tree.leaf_mesh = MeshStyle::CrossedPlanes;
    }
    let tree_count = parse_u32_arg(&args, "--trees").unwrap_or(1);
    let manifest_path = parse_str_arg(&args, "--manifest").map(PathBuf::from);

    if let Some(jobs) = parse_u32_arg(&args, "--jobs") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs as usize)
            .build_global()
            .expect("Failed to configure thread pool");
    }

    let pipeline = GenerationPipeline::new(config)?;
    let config = pipeline.config();

    println!("=== Voxgen World Generator ===");
    println!("Seed:  {}", config.seed);
    println!("Map:   {} x {} x {}", config.map_width, config.map_height, config.map_length);
    println!("Chunk: {} (trees {})", config.chunk_size, config.tree.chunk_size);
    println!("Leaves: {:?}", config.tree.leaf_mesh);
    println!();

    let start = Instant::now();
    let mut report = ChunkReport::default();
    let terrain = pipeline.run_terrain(&mut report);
    print_stats("Terrain", &terrain);

    let mut trees = GenerationStats::default();
    for i in 0..tree_count {
        let x = (i * config.map_width / tree_count.max(1)) as f32;
        let z = (i * config.map_length / tree_count.max(1)) as f32;
        let tree = pipeline.generate_tree(x, z);
        trees.merge(pipeline.mesh_tree(&tree, &mut report));
    }
    if tree_count > 0 {
        print_stats("Trees", &trees);
    }

    println!();
    println!("=== Generation Complete ({:.1}ms) ===", start.elapsed().as_secs_f64() * 1000.0);

    if let Some(path) = manifest_path {
        let manifest = json!({
            "config": config,
            "terrain": stats_json(&terrain),
            "trees": stats_json(&trees),
            "chunks": report.rows,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        println!("Manifest: {}", path.display());
    }

    Ok(())
}

fn print_stats(label: &str, stats: &GenerationStats) {
    println!(
        "{:8} {} solid voxels, {}/{} chunks emitted, {} quads",
        format!("{}:", label),
        stats.solid_voxels, stats.chunks_emitted, stats.chunks_visited, stats.quads_emitted
    );
}

fn stats_json(stats: &GenerationStats) -> serde_json::Value {
    json!({
        "chunks_visited": stats.chunks_visited,
        "chunks_emitted": stats.chunks_emitted,
        "quads": stats.quads_emitted,
        "solid_voxels": stats.solid_voxels,
    })
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
