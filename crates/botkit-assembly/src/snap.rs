//! Socket snapping.
//!
//! While a part is dragged, [`find_snap`] looks for the closest pair of a
//! connector on the dragged part and a mount on any other part that is not
//! below it in the hierarchy. The search is read-only; committing a hit is
//! done by [`PartTree::commit_snap`](crate::PartTree::commit_snap).

use botkit_ir::SocketKind;
use botkit_math::{Point3, Rotation, Transform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::part::socket_frame;
use crate::tree::{PartId, PartTree};

/// Default snap distance in meters.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.3;

/// How the orientation of a snapped part is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapRotation {
    /// Keep the proposed orientation; only the position moves.
    #[default]
    Keep,
    /// Rotate the part so the connector frame coincides with the mount frame.
    AlignToMount,
}

/// Snap search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Maximum connector-to-mount distance in meters.
    pub threshold: f64,
    /// Orientation handling.
    pub rotation: SnapRotation,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            rotation: SnapRotation::Keep,
        }
    }
}

/// The best connector/mount pair found by [`find_snap`].
///
/// `position` and `rotation` are the world pose the active part's origin
/// takes when the snap is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate {
    /// Part that owns the mount.
    pub target_part: PartId,
    /// Mount socket id on the target part.
    pub target_socket: String,
    /// Connector socket id on the active part.
    pub source_socket: String,
    /// World position for the active part's origin.
    pub position: Vec3,
    /// World orientation for the active part.
    pub rotation: Rotation,
    /// Connector-to-mount distance before snapping.
    pub distance: f64,
}

impl SnapCandidate {
    /// World pose as a transform.
    pub fn world(&self) -> Transform {
        Transform::from_parts(self.position, self.rotation)
    }
}

struct MountFrame<'a> {
    part: PartId,
    socket: &'a str,
    world: Transform,
}

/// Find the closest connector/mount pair for `active` posed at
/// `proposed_local` (relative to its current parent).
///
/// Only connectors on the active part are sources and only mounts on other
/// parts are targets. Parts in the active part's subtree are skipped, so a
/// snap can never produce a cycle. A pair wins only if it is strictly closer
/// than both the best pair so far and `settings.threshold`; on ties the
/// first pair in connector order, then part order, then mount order wins.
///
/// # Errors
///
/// [`AssemblyError::NotFound`](crate::AssemblyError::NotFound) if `active`
/// is missing, or any error from resolving world transforms.
pub fn find_snap(
    tree: &PartTree,
    active: PartId,
    proposed_local: &Transform,
    settings: &SnapSettings,
) -> Result<Option<SnapCandidate>> {
    let part = tree.get(active)?;
    let proposed_world = tree.parent_world_transform(active)?.then(proposed_local);

    let connectors: Vec<_> = part
        .sockets()
        .iter()
        .filter(|s| s.kind == SocketKind::Connector)
        .map(|s| (s, proposed_world.apply_point(&to_point(s.position))))
        .collect();
    if connectors.is_empty() {
        return Ok(None);
    }

    let excluded = tree.subtree(active);
    let mut mounts = Vec::new();
    for (id, target) in tree.iter() {
        if excluded.contains(&id) {
            continue;
        }
        let mut target_mounts = target
            .sockets()
            .iter()
            .filter(|s| s.kind == SocketKind::Mount)
            .peekable();
        if target_mounts.peek().is_none() {
            continue;
        }
        let target_world = tree.world_transform(id)?;
        mounts.extend(target_mounts.map(|s| MountFrame {
            part: id,
            socket: &s.id,
            world: target_world.then(&socket_frame(s)),
        }));
    }

    let mut best: Option<(usize, usize, f64)> = None;
    for (ci, (_, connector_world)) in connectors.iter().enumerate() {
        for (mi, mount) in mounts.iter().enumerate() {
            let distance = (mount.world.position() - connector_world.coords).norm();
            let limit = best.map_or(settings.threshold, |(_, _, d)| d.min(settings.threshold));
            if distance < limit {
                best = Some((ci, mi, distance));
            }
        }
    }

    let Some((ci, mi, distance)) = best else {
        return Ok(None);
    };
    let (connector, _) = connectors[ci];
    let mount = &mounts[mi];

    let rotation = match settings.rotation {
        SnapRotation::Keep => proposed_world.rotation(),
        SnapRotation::AlignToMount => {
            mount.world.rotation() * socket_frame(connector).rotation().inverse()
        }
    };
    let position = mount.world.position() - rotation * to_point(connector.position).coords;

    debug!(
        ?active,
        target = ?mount.part,
        source_socket = %connector.id,
        target_socket = mount.socket,
        distance,
        "snap candidate"
    );

    Ok(Some(SnapCandidate {
        target_part: mount.part,
        target_socket: mount.socket.to_string(),
        source_socket: connector.id.clone(),
        position,
        rotation,
        distance,
    }))
}

fn to_point([x, y, z]: [f64; 3]) -> Point3 {
    Point3::new(x, y, z)
}
