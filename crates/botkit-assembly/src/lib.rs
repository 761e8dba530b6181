#![warn(missing_docs)]

//! Robot assembly editing for botkit.
//!
//! An assembly is a forest of [`Part`]s held in a [`PartTree`] arena. Each
//! part stores only its transform relative to its parent; world transforms
//! are recomputed on demand, so moving a parent moves everything attached
//! to it.
//!
//! The editing flow for a dragged part is:
//!
//! 1. [`find_snap`] previews the closest connector/mount pair for a proposed
//!    pose, without touching the tree.
//! 2. [`PartTree::commit_snap`] (or [`Command::CommitSnap`]) attaches the part
//!    to the mount's owner, converting the snapped world pose into the new
//!    parent's frame.
//!
//! All other edits go through [`PartTree::apply`] with a [`Command`].
//!
//! # Example
//!
//! ```
//! use botkit_assembly::{find_snap, PartTree, Part, SnapSettings};
//! use botkit_ir::{Category, Socket, Specs};
//! use botkit_math::Transform;
//!
//! let block = |sku: &str| {
//!     Part::new(sku, Category::Accessory, Specs::Accessory { weight: 1.0, dims: [0.2; 3] })
//! };
//!
//! let mut tree = PartTree::new();
//! let base = tree.insert(block("BASE").with_socket(Socket::mount("top", [0.0, 0.1, 0.0]))).unwrap();
//! let lid = tree.insert(block("LID").with_socket(Socket::connector("bottom", [0.0, -0.1, 0.0]))).unwrap();
//!
//! let drag = Transform::translation(0.05, 0.25, 0.0);
//! let hit = find_snap(&tree, lid, &drag, &SnapSettings::default()).unwrap().unwrap();
//! tree.commit_snap(lid, &hit).unwrap();
//!
//! assert_eq!(tree.get(lid).unwrap().parent_id(), Some(base));
//! ```

mod command;
mod error;
mod parametric;
mod part;
mod settings;
mod snap;
mod solver;
mod tree;

pub use command::{Command, Outcome};
pub use error::{AssemblyError, Result};
pub use parametric::recalculate_sockets;
pub use part::{socket_frame, Part};
pub use settings::{EditSettings, EditorSettings};
pub use snap::{find_snap, SnapCandidate, SnapRotation, SnapSettings, DEFAULT_SNAP_THRESHOLD};
pub use solver::world_to_local;
pub use tree::{PartId, PartTree, RemovalPolicy};
