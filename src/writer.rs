use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use anyhow::{Result, Context};
use brotli::enc::BrotliEncoderParams;
use brotli::CompressorWriter;

use crate::data::{NodeRecord, TreeNode};

pub struct TreeWriter {
    writer: Box<dyn Write>,
    record_count: usize,
}

impl TreeWriter {
    /// Creates a new TreeWriter for the specified file path.
    ///
    /// Automatically enables Brotli compression if the file path ends with `.br`
    /// (e.g., `tree.json.br` or `tree.jsonl.br`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use treecard::TreeWriter;
    /// # use treecard::data::TreeNode;
    /// # fn main() -> anyhow::Result<()> {
    /// let tree = TreeNode::with_children("root", vec![TreeNode::leaf("a")]);
    ///
    /// let mut writer = TreeWriter::new("tree.jsonl.br")?;
    /// writer.write_tree(&tree)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(file_path: &str) -> Result<Self> {
        let file = File::create(file_path)
            .with_context(|| format!("Failed to create file: {}", file_path))?;

        let writer: Box<dyn Write> = if file_path.ends_with(".br") {
            let buf_writer = BufWriter::new(file);
            let params = BrotliEncoderParams {
                quality: 6,  // Balanced compression
                lgwin: 22,   // Window size
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(buf_writer, 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(TreeWriter {
            writer,
            record_count: 0,
        })
    }

    /// Wraps an arbitrary sink, e.g. stdout. Output is not compressed.
    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        TreeWriter {
            writer,
            record_count: 0,
        }
    }

    pub fn write_record(&mut self, id: u64, parent_id: Option<u64>, name: &str) -> Result<()> {
        let record = NodeRecord {
            id,
            parent_id,
            name: name.to_string(),
        };
        self.write_line(&record)?;
        self.record_count += 1;
        Ok(())
    }

    /// Writes `tree` as records with breadth-first ids, root first.
    pub fn write_tree(&mut self, tree: &TreeNode) -> Result<()> {
        let mut queue: VecDeque<(&TreeNode, Option<u64>)> = VecDeque::from([(tree, None)]);
        let mut next_id = 0u64;

        while let Some((node, parent_id)) = queue.pop_front() {
            let id = next_id;
            next_id += 1;
            self.write_record(id, parent_id, &node.name)?;
            for child in &node.children {
                queue.push_back((child, Some(id)));
            }
        }
        Ok(())
    }

    /// Writes `tree` as a single nested JSON document.
    pub fn write_nested(&mut self, tree: &TreeNode) -> Result<()> {
        self.write_line(tree)?;
        self.record_count += tree.node_count();
        Ok(())
    }

    /// Number of nodes written so far.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .context("Failed to serialize to JSON")?;

        writeln!(self.writer, "{}", json)
            .context("Failed to write line")?;

        self.writer.flush()
            .context("Failed to flush writer")?;

        Ok(())
    }
}

impl Drop for TreeWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
