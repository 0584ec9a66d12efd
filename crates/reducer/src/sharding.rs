//! Shard planning.
//!
//! Files are dealt to shards round-robin, so shard `i` gets files
//! `i, i + k, i + 2k, ...` of the sorted listing. Each file keeps its
//! position in that listing so partial results can be merged in listing
//! order whatever the worker count.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use vacancy_core::{Error, Result};

/// Number of workers for `inputs` independent inputs.
///
/// `configured = 0` means half the available parallelism, rounded down and
/// at least one. The result never exceeds `inputs` unless `inputs` is zero.
pub fn worker_count(configured: usize, inputs: usize) -> usize {
    let workers = if configured == 0 {
        let available = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        (available / 2).max(1)
    } else {
        configured
    };
    workers.min(inputs.max(1))
}

/// CSV files directly inside `dir`, sorted by path.
pub fn discover_csv_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::empty_input(format!(
            "no CSV files in {}",
            dir.display()
        )));
    }

    files.sort();
    Ok(files)
}

/// A file and its position in the sorted input listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardInput {
    pub position: usize,
    pub path: PathBuf,
}

/// Assignment of input files to shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    shards: Vec<Vec<ShardInput>>,
}

impl ShardPlan {
    /// Deal `files` round-robin over `workers` shards.
    ///
    /// Shards that would receive no file are not created.
    pub fn round_robin(files: Vec<PathBuf>, workers: usize) -> Self {
        let count = workers.max(1).min(files.len());
        let mut shards = vec![Vec::new(); count];
        for (position, path) in files.into_iter().enumerate() {
            shards[position % count].push(ShardInput { position, path });
        }
        Self { shards }
    }

    pub fn shards(&self) -> &[Vec<ShardInput>] {
        &self.shards
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

/// Split a slice into at most `shards` contiguous, non-empty chunks.
pub fn chunk_slice<T>(items: &[T], shards: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    let chunk_size = items.len().div_ceil(shards.max(1));
    items.chunks(chunk_size).collect()
}
