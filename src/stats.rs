use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{BufWriter, Write},
    path::Path,
    time::{Duration, Instant},
};

use log::info;
use serde::Serialize;

/// Shape of a built tree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: u32,
    pub max_leaf_points: usize,
    /// Length of the root point list, i.e. the mesh index count
    pub point_refs: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryStats {
    pub title: String,
    pub queries: usize,
    pub elapsed: Duration,
}

impl QueryStats {
    /// Runs `queries` once and records how long it took
    pub fn measure<F>(title: &str, queries: usize, f: F) -> QueryStats
    where
        F: FnOnce(),
    {
        let start = Instant::now();
        f();
        Self {
            title: title.to_string(),
            queries,
            elapsed: start.elapsed(),
        }
    }

    pub fn per_query_micros(&self) -> f64 {
        if self.queries == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1_000_000.0 / self.queries as f64
    }

    pub fn print_query_stats(&self) {
        info!(
            "{}: {} queries in {:.3?}, {:.3}µs per query",
            self.title,
            self.queries,
            self.elapsed,
            self.per_query_micros()
        )
    }
}

/// One benchmark run: a tree build plus octree and brute force lookups of the same points
pub struct BenchmarkRecord {
    pub max_levels: u32,
    pub tree: TreeStats,
    pub build: Duration,
    pub octree: QueryStats,
    pub linear: QueryStats,
}

impl BenchmarkRecord {
    /// Initializes the CSV file by writing a header if it doesn't exist yet
    fn init_csv(path: &Path) -> Result<(), std::io::Error> {
        // Ensure parent directories exist
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        // Only create the file if it doesn't exist
        if !path.exists() {
            let mut file = File::create(path)?;
            writeln!(
                file,
                "MaxLevels,Nodes,Leaves,Depth,LargestLeaf,Queries,BuildSeconds,OctreeMicros,LinearMicros"
            )?;
        }

        Ok(())
    }

    /// Appends this record to the CSV file at `path`
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let path = path.as_ref();
        Self::init_csv(path)?;

        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{},{},{},{},{},{},{:.4},{:.3},{:.3}",
            self.max_levels,
            self.tree.node_count,
            self.tree.leaf_count,
            self.tree.max_depth,
            self.tree.max_leaf_points,
            self.octree.queries,
            self.build.as_secs_f64(),
            self.octree.per_query_micros(),
            self.linear.per_query_micros(),
        )?;

        Ok(())
    }
}
