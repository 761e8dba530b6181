//! Edit commands.
//!
//! Every interactive edit is expressed as a [`Command`] and applied through
//! [`PartTree::apply`], the single mutation entry point for hosts.

use botkit_ir::{ComponentRecord, Dims};
use botkit_math::{Axis, Transform, Vec3};
use tracing::{debug, info};

use crate::error::{AssemblyError, Result};
use crate::parametric::recalculate_sockets;
use crate::part::Part;
use crate::snap::SnapCandidate;
use crate::tree::{PartId, PartTree, RemovalPolicy};

/// An edit to an assembly.
#[derive(Debug, Clone)]
pub enum Command {
    /// Instantiate a catalog record.
    Add {
        /// Catalog record to snapshot.
        record: ComponentRecord,
        /// Parent part, or `None` for a root part.
        parent: Option<PartId>,
        /// Pose relative to `parent`.
        local: Transform,
    },
    /// Replace a part's local pose.
    Move {
        /// Part to move.
        part: PartId,
        /// New pose relative to the current parent.
        local: Transform,
    },
    /// Attach a part to the target of a snap preview.
    CommitSnap {
        /// Part being dropped.
        part: PartId,
        /// Result of [`find_snap`](crate::find_snap).
        candidate: SnapCandidate,
    },
    /// Move a part to the root, keeping its world pose.
    Detach {
        /// Part to detach.
        part: PartId,
    },
    /// Rotate a part about one of its own axes.
    Rotate {
        /// Part to rotate.
        part: PartId,
        /// Local axis.
        axis: Axis,
        /// Angle in radians.
        increment: f64,
    },
    /// Copy a part (specs, sockets and pose) next to the original, under
    /// the same parent. Children are not copied.
    Duplicate {
        /// Part to copy.
        part: PartId,
        /// Translation added to the copy, in the parent frame.
        offset: Vec3,
    },
    /// Remove a part.
    Remove {
        /// Part to remove.
        part: PartId,
        /// Handling of its children.
        policy: RemovalPolicy,
    },
    /// Change a part's dimensions and recompute its sockets.
    Resize {
        /// Part to resize.
        part: PartId,
        /// New (L, W, H) in meters.
        dims: Dims,
    },
}

/// What a successful [`Command`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new part was inserted.
    Added(PartId),
    /// An existing part was modified.
    Updated(PartId),
    /// These parts were removed, the requested one first.
    Removed(Vec<PartId>),
}

impl PartTree {
    /// Apply one edit. On error the tree is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Add { record, parent, local } => {
                let mut part = Part::from_record(&record).with_local(local);
                if let Some(parent) = parent {
                    part = part.with_parent(parent);
                }
                let id = self.insert(part)?;
                info!(?id, sku = %record.sku, "added part");
                Ok(Outcome::Added(id))
            }
            Command::Move { part, local } => {
                self.set_local(part, local)?;
                Ok(Outcome::Updated(part))
            }
            Command::CommitSnap { part, candidate } => {
                self.commit_snap(part, &candidate)?;
                Ok(Outcome::Updated(part))
            }
            Command::Detach { part } => {
                self.detach(part)?;
                Ok(Outcome::Updated(part))
            }
            Command::Rotate {
                part,
                axis,
                increment,
            } => {
                let local = self
                    .get(part)?
                    .local()
                    .then(&Transform::rotation_about_axis(&axis.dir(), increment));
                self.set_local(part, local)?;
                debug!(?part, ?axis, increment, "rotated part");
                Ok(Outcome::Updated(part))
            }
            Command::Duplicate { part, offset } => {
                let original = self.get(part)?;
                let local = Transform::from_parts(
                    original.local_position() + offset,
                    original.local().rotation(),
                );
                let copy = original.clone().with_local(local);
                let id = self.insert(copy)?;
                info!(?id, source = ?part, "duplicated part");
                Ok(Outcome::Added(id))
            }
            Command::Remove { part, policy } => {
                let removed = self.remove(part, policy)?;
                info!(?part, count = removed.len(), "removed parts");
                Ok(Outcome::Removed(removed.iter().map(Part::id).collect()))
            }
            Command::Resize { part, dims } => {
                if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
                    return Err(AssemblyError::InvalidDims { dims });
                }
                let target = self.get_mut(part)?;
                let sockets = recalculate_sockets(target.category(), target.sockets(), dims);
                let specs = target.specs().with_dims(dims);
                target.set_specs(specs, sockets);
                debug!(?part, ?dims, "resized part");
                Ok(Outcome::Updated(part))
            }
        }
    }
}
