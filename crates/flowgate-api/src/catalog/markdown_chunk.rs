//! # Markdown Chunk Workflow
//!
//! Splits a markdown document into chunks. The chunking itself happens in the
//! backend; this module owns the trigger schema and fills in option defaults
//! so the backend always receives a complete [`ChunkOptions`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{step, TriggerKind, WorkflowDefinition};
use crate::extractors::Validate;

pub const DEFAULT_SIZE: u32 = 512;
pub const DEFAULT_OVERLAP: u32 = 50;
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Splitting strategy. When absent the backend picks one from the document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    Recursive,
    Character,
    Token,
    Markdown,
    Html,
    Json,
    Latex,
}

/// Which side of a chunk keeps the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChunkOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ChunkStrategy>,
    /// Maximum size of each chunk.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Characters or tokens shared between neighbouring chunks.
    #[serde(default = "default_overlap")]
    pub overlap: u32,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub is_separator_regex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_separator: Option<KeepSeparator>,
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_overlap() -> u32 {
    DEFAULT_OVERLAP
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            strategy: None,
            size: DEFAULT_SIZE,
            overlap: DEFAULT_OVERLAP,
            separator: default_separator(),
            is_separator_regex: false,
            keep_separator: None,
        }
    }
}

impl Validate for ChunkOptions {
    fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("chunkOptions.size must be greater than 0".into());
        }
        if self.overlap >= self.size {
            return Err(format!(
                "chunkOptions.overlap ({}) must be smaller than chunkOptions.size ({})",
                self.overlap, self.size
            ));
        }
        if self.separator.is_empty() {
            return Err("chunkOptions.separator must not be empty".into());
        }
        Ok(())
    }
}

/// Trigger data for `markdown-chunk`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkdownChunkTrigger {
    pub markdown_text: String,
    #[serde(default)]
    pub chunk_options: ChunkOptions,
}

impl Validate for MarkdownChunkTrigger {
    fn validate(&self) -> Result<(), String> {
        self.chunk_options.validate()
    }
}

pub fn workflow() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "markdown-chunk".to_string(),
        description: "Splits markdown text into chunks for retrieval".to_string(),
        steps: vec![step(
            "chunk-markdown",
            "Converts markdown text into chunks using the configured strategy",
        )],
        trigger: TriggerKind::MarkdownChunk,
    }
}
