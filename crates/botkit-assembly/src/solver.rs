//! Conversions between world and local poses when a part changes parent.

use botkit_math::Transform;
use tracing::debug;

use crate::error::Result;
use crate::snap::SnapCandidate;
use crate::tree::{PartId, PartTree};

/// Express a world pose in the frame of `parent`.
///
/// Without a parent the world pose is already the local pose. Otherwise the
/// inverse of the parent's world transform is applied, so that
/// `parent_world.then(&local)` reproduces `world`.
pub fn world_to_local(tree: &PartTree, parent: Option<PartId>, world: &Transform) -> Result<Transform> {
    match parent {
        None => Ok(*world),
        Some(parent) => Ok(tree.world_transform(parent)?.inverse().then(world)),
    }
}

impl PartTree {
    /// Attach `active` to the candidate's target part at the candidate's
    /// world pose.
    ///
    /// The re-parent is validated before anything is written, and the new
    /// local pose and parent link are stored together. On error the tree is
    /// unchanged.
    pub fn commit_snap(&mut self, active: PartId, candidate: &SnapCandidate) -> Result<()> {
        let target = candidate.target_part;
        self.check_reparent(active, Some(target))?;
        let local = world_to_local(self, Some(target), &candidate.world())?;

        let part = self.get_mut(active)?;
        part.set_local(local);
        part.set_parent(Some(target));
        debug!(
            ?active,
            ?target,
            source_socket = %candidate.source_socket,
            target_socket = %candidate.target_socket,
            "committed snap"
        );
        Ok(())
    }

    /// Move `child` under `new_parent` without moving it in the world.
    pub fn reparent_keep_world(&mut self, child: PartId, new_parent: Option<PartId>) -> Result<()> {
        self.check_reparent(child, new_parent)?;
        let world = self.world_transform(child)?;
        let local = world_to_local(self, new_parent, &world)?;

        let part = self.get_mut(child)?;
        part.set_local(local);
        part.set_parent(new_parent);
        Ok(())
    }

    /// Detach a part to the root, keeping its world pose.
    pub fn detach(&mut self, id: PartId) -> Result<()> {
        self.reparent_keep_world(id, None)
    }
}
