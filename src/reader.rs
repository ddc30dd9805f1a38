use std::fs::File;
use std::io::{BufRead, BufReader, Read};

use anyhow::{Context, Result};
use brotli::Decompressor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{NodeRecord, TreeNode};

const DEFAULT_MAX_DEPTH: usize = 4;
const DEFAULT_MAX_CHILDREN: usize = 5;

/// Label stems of different lengths, so generated trees mix nodes that start
/// expanded and collapsed under the default policy.
const STEMS: [&str; 8] = ["n", "leaf", "item", "group", "branch", "cluster", "module", "category"];

/// Source of a tree to render.
pub trait TreeReader {
    /// Opens and parses a tree file
    fn read(&self, file_path: &str) -> Result<TreeNode>;
}

/// Reads a nested `{name, children}` JSON document (`.json`, `.json.br`).
pub struct JsonTreeReader;

impl TreeReader for JsonTreeReader {
    fn read(&self, file_path: &str) -> Result<TreeNode> {
        let mut text = String::new();
        open(file_path)?
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read file: {}", file_path))?;
        TreeNode::from_json_str(&text)
            .with_context(|| format!("Invalid tree in {}", file_path))
    }
}

/// Reads one `NodeRecord` per line (`.jsonl`, `.jsonl.br`).
pub struct RecordTreeReader;

impl TreeReader for RecordTreeReader {
    fn read(&self, file_path: &str) -> Result<TreeNode> {
        let reader = open(file_path)?;
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result
                .with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: NodeRecord = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse record at line {}", line_num + 1))?;
            records.push(record);
        }

        log::debug!("read {} records from {}", records.len(), file_path);
        TreeNode::from_records(&records)
            .with_context(|| format!("Invalid records in {}", file_path))
    }
}

/// Generates a random tree; the file path is ignored.
pub struct RandomTreeReader {
    max_depth: usize,
    max_children: usize,
    seed: u64,
}

impl RandomTreeReader {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_children: DEFAULT_MAX_CHILDREN,
            seed: 42, // Default seed for reproducibility
        }
    }

    pub fn with_config(max_depth: usize, max_children: usize, seed: u64) -> Self {
        Self {
            max_depth,
            max_children,
            seed,
        }
    }

    /// Builds the tree without going through a file.
    pub fn generate(&self) -> TreeNode {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut next_id = 0;
        let mut root = generate_node(&mut rng, 0, self.max_depth, self.max_children, &mut next_id);
        root.name = "root".to_string();
        root
    }
}

impl Default for RandomTreeReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeReader for RandomTreeReader {
    fn read(&self, _file_path: &str) -> Result<TreeNode> {
        Ok(self.generate())
    }
}

fn generate_node(rng: &mut StdRng, depth: usize, max_depth: usize, max_children: usize, next_id: &mut u64) -> TreeNode {
    let id = *next_id;
    *next_id += 1;
    let stem = STEMS[rng.gen_range(0..STEMS.len())];
    let name = if stem.len() == 7 {
        stem.to_string()
    } else {
        format!("{}{}", stem, id)
    };

    let mut children = Vec::new();
    if depth < max_depth {
        // The root always has children so the card is never a lone dot.
        let min = usize::from(depth == 0 && max_children > 0);
        let count = rng.gen_range(min..=max_children);
        for _ in 0..count {
            children.push(generate_node(rng, depth + 1, max_depth, max_children, next_id));
        }
    }

    TreeNode { name, children }
}

/// Reads a tree, picking the reader from the file extension.
///
/// `.jsonl` (optionally `.br`-compressed) is read as records, anything else
/// as nested JSON.
pub fn read_tree(file_path: &str) -> Result<TreeNode> {
    let plain = file_path.strip_suffix(".br").unwrap_or(file_path);
    if plain.ends_with(".jsonl") {
        RecordTreeReader.read(file_path)
    } else {
        JsonTreeReader.read(file_path)
    }
}

fn open(file_path: &str) -> Result<Box<dyn BufRead>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path))?;

    let reader: Box<dyn BufRead> = if file_path.ends_with(".br") {
        let decompressor = Decompressor::new(file, 4096);
        Box::new(BufReader::new(decompressor))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}
