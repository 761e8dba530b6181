//! Error types for assembly operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::tree::PartId;

/// Errors that can occur while editing or querying an assembly.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// A referenced part is not in the tree.
    #[error("part {id:?} not found in assembly")]
    NotFound {
        /// The missing part id.
        id: PartId,
    },

    /// A part cannot be its own parent.
    #[error("part {id:?} cannot be its own parent")]
    SelfParent {
        /// The part id.
        id: PartId,
    },

    /// The new parent is a descendant of the child.
    #[error("cannot attach {child:?} to {parent:?}: {parent:?} is a descendant of {child:?}")]
    CyclicReparent {
        /// Part being re-parented.
        child: PartId,
        /// Requested parent.
        parent: PartId,
    },

    /// The parent links already contain a cycle.
    #[error("parent chain of {id:?} contains a cycle")]
    CyclicGraph {
        /// Part whose ancestor walk revisited an id.
        id: PartId,
    },

    /// Two sockets on one part share an id.
    #[error("socket id '{socket}' is declared twice")]
    DuplicateSocket {
        /// The repeated socket id.
        socket: String,
    },

    /// Removal was rejected because the part still has children.
    #[error("part {id:?} still has {count} child part(s)")]
    HasChildren {
        /// The part id.
        id: PartId,
        /// Number of direct children.
        count: usize,
    },

    /// A resize asked for a non-positive or non-finite extent.
    #[error("invalid dimensions {dims:?}: every extent must be positive")]
    InvalidDims {
        /// Requested (L, W, H).
        dims: [f64; 3],
    },

    /// Editor settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file is not valid TOML.
    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings file could not be read.
    #[error("failed to read settings at {path}: {source}")]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;
