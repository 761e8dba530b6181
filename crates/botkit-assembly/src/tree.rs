//! The part arena and its hierarchy queries.

use std::collections::HashSet;

use botkit_ir::duplicate_socket_id;
use botkit_math::Transform;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, error, warn};

use crate::error::{AssemblyError, Result};
use crate::part::Part;

new_key_type! {
    /// Assembly-scoped part identifier.
    pub struct PartId;
}

/// What happens to the children of a removed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Refuse to remove a part that still has children.
    #[default]
    Reject,
    /// Remove the part and its whole subtree.
    Cascade,
    /// Detach the children to the root, keeping their world pose.
    PromoteToRoot,
}

/// Owns every part of one assembly, keyed by [`PartId`].
///
/// World transforms are never stored; they are recomputed from the local
/// transforms on each call, so editing any ancestor is immediately visible
/// in its descendants.
///
/// # Example
///
/// ```
/// use botkit_assembly::{Part, PartTree};
/// use botkit_ir::{Category, Specs};
///
/// let specs = Specs::Accessory { weight: 1.0, dims: [0.1, 0.1, 0.1] };
/// let mut tree = PartTree::new();
/// let base = tree.insert(Part::new("BASE", Category::Accessory, specs.clone()).with_position(1.0, 0.0, 0.0)).unwrap();
/// let top = tree
///     .insert(Part::new("TOP", Category::Accessory, specs).with_position(0.0, 2.0, 0.0).with_parent(base))
///     .unwrap();
///
/// let world = tree.world_transform(top).unwrap();
/// assert!((world.position().x - 1.0).abs() < 1e-12);
/// assert!((world.position().y - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PartTree {
    parts: SlotMap<PartId, Part>,
}

impl PartTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Part management
    // =========================================================================

    /// Add a part and return its id.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::NotFound`] if the part names a parent that is not
    ///   in the tree.
    /// - [`AssemblyError::DuplicateSocket`] if two sockets share an id.
    pub fn insert(&mut self, mut part: Part) -> Result<PartId> {
        if let Some(parent) = part.parent_id() {
            if !self.parts.contains_key(parent) {
                return Err(AssemblyError::NotFound { id: parent });
            }
        }
        if let Some(socket) = duplicate_socket_id(part.sockets()) {
            return Err(AssemblyError::DuplicateSocket {
                socket: socket.to_string(),
            });
        }
        let id = self.parts.insert_with_key(|id| {
            part.set_id(id);
            part
        });
        debug!(?id, "inserted part");
        Ok(id)
    }

    /// Get a part by id.
    pub fn get(&self, id: PartId) -> Result<&Part> {
        self.parts.get(id).ok_or(AssemblyError::NotFound { id })
    }

    pub(crate) fn get_mut(&mut self, id: PartId) -> Result<&mut Part> {
        self.parts.get_mut(id).ok_or(AssemblyError::NotFound { id })
    }

    /// Check if a part exists.
    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains_key(id)
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate over `(id, part)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts.iter()
    }

    /// Iterate over all parts.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    /// Replace a part's local transform.
    pub fn set_local(&mut self, id: PartId, local: Transform) -> Result<()> {
        self.get_mut(id)?.set_local(local);
        Ok(())
    }

    /// Remove a part according to `policy` and return the removed parts,
    /// the requested one first.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::NotFound`] if `id` is not in the tree.
    /// - [`AssemblyError::HasChildren`] under [`RemovalPolicy::Reject`] when
    ///   the part has children.
    pub fn remove(&mut self, id: PartId, policy: RemovalPolicy) -> Result<Vec<Part>> {
        self.get(id)?;
        let children = self.children(id);

        let doomed = match policy {
            RemovalPolicy::Reject if !children.is_empty() => {
                return Err(AssemblyError::HasChildren {
                    id,
                    count: children.len(),
                });
            }
            RemovalPolicy::Reject => vec![id],
            RemovalPolicy::Cascade => self.subtree(id),
            RemovalPolicy::PromoteToRoot => {
                // Resolve every world pose before touching any link.
                let promoted = children
                    .iter()
                    .map(|&child| Ok((child, self.world_transform(child)?)))
                    .collect::<Result<Vec<_>>>()?;
                for (child, world) in promoted {
                    let part = self.get_mut(child)?;
                    part.set_local(world);
                    part.set_parent(None);
                }
                vec![id]
            }
        };

        let removed: Vec<Part> = doomed
            .into_iter()
            .filter_map(|doomed_id| self.parts.remove(doomed_id))
            .collect();
        debug!(?id, count = removed.len(), ?policy, "removed parts");
        Ok(removed)
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Direct children of a part.
    pub fn children(&self, id: PartId) -> Vec<PartId> {
        self.parts
            .iter()
            .filter(|(_, p)| p.parent_id() == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// Parts with no parent.
    pub fn roots(&self) -> Vec<PartId> {
        self.parts
            .iter()
            .filter(|(_, p)| p.parent_id().is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// The part and all of its descendants, breadth first.
    pub fn subtree(&self, id: PartId) -> Vec<PartId> {
        let mut out = vec![id];
        let mut next = 0;
        while next < out.len() {
            let current = out[next];
            next += 1;
            for child in self.children(current) {
                // A corrupted cyclic tree must not grow this forever.
                if !out.contains(&child) {
                    out.push(child);
                }
            }
        }
        out
    }

    /// Ancestors of a part, nearest first.
    ///
    /// The walk is iterative and tracks visited ids, so a corrupted cyclic
    /// parent graph fails with [`AssemblyError::CyclicGraph`].
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::NotFound`] if `id` or any referenced ancestor is
    ///   missing.
    /// - [`AssemblyError::CyclicGraph`] if the walk revisits an id.
    pub fn ancestors(&self, id: PartId) -> Result<Vec<PartId>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::with_capacity(self.parts.len());
        visited.insert(id);

        let mut current = self.get(id)?.parent_id();
        while let Some(parent_id) = current {
            if !visited.insert(parent_id) || visited.len() > self.parts.len() {
                error!(?id, ?parent_id, "parent chain revisits a part; assembly tree is corrupted");
                return Err(AssemblyError::CyclicGraph { id });
            }
            let parent = self.get(parent_id)?;
            chain.push(parent_id);
            current = parent.parent_id();
        }
        Ok(chain)
    }

    /// Whether `id` sits anywhere below `ancestor`.
    pub fn is_descendant_of(&self, id: PartId, ancestor: PartId) -> Result<bool> {
        Ok(self.ancestors(id)?.contains(&ancestor))
    }

    /// World transform of a part: the local transforms of every ancestor,
    /// composed root first, then the part's own.
    ///
    /// # Errors
    ///
    /// Same as [`PartTree::ancestors`].
    pub fn world_transform(&self, id: PartId) -> Result<Transform> {
        let part = self.get(id)?;
        let mut world = Transform::identity();
        for ancestor in self.ancestors(id)?.into_iter().rev() {
            world = world.then(self.get(ancestor)?.local());
        }
        Ok(world.then(part.local()))
    }

    /// World transform of a part's parent, or identity for a root part.
    pub fn parent_world_transform(&self, id: PartId) -> Result<Transform> {
        match self.get(id)?.parent_id() {
            Some(parent) => self.world_transform(parent),
            None => Ok(Transform::identity()),
        }
    }

    /// Change only the parent link of `child`.
    ///
    /// The local transform is left as is, so unless the caller converted the
    /// pose into the new parent's frame first the part visibly jumps. See
    /// [`PartTree::commit_snap`] and [`PartTree::detach`] for moves that
    /// keep the world pose.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::NotFound`] if either part is missing.
    /// - [`AssemblyError::SelfParent`] if `new_parent == Some(child)`.
    /// - [`AssemblyError::CyclicReparent`] if `new_parent` is a descendant
    ///   of `child`. The tree is left unchanged.
    pub fn reparent(&mut self, child: PartId, new_parent: Option<PartId>) -> Result<()> {
        self.check_reparent(child, new_parent)?;
        self.get_mut(child)?.set_parent(new_parent);
        debug!(?child, ?new_parent, "reparented part");
        Ok(())
    }

    /// Validate a re-parent without applying it.
    pub(crate) fn check_reparent(&self, child: PartId, new_parent: Option<PartId>) -> Result<()> {
        self.get(child)?;
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if parent == child {
            warn!(?child, "rejected re-parent onto itself");
            return Err(AssemblyError::SelfParent { id: child });
        }
        if self.ancestors(parent)?.contains(&child) {
            warn!(?child, ?parent, "rejected re-parent onto a descendant");
            return Err(AssemblyError::CyclicReparent { child, parent });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_parent(&mut self, id: PartId, parent: Option<PartId>) {
        self.parts[id].set_parent(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botkit_ir::{Category, Socket, Specs};
    use botkit_math::{EulerXyz, Tolerance, Vec3};
    use std::f64::consts::FRAC_PI_2;

    fn block(sku: &str) -> Part {
        Part::new(
            sku,
            Category::Accessory,
            Specs::Accessory {
                weight: 1.0,
                dims: [0.1, 0.1, 0.1],
            },
        )
    }

    /// A -> B -> C, each with a distinct offset and rotation.
    fn chain(tree: &mut PartTree) -> (PartId, PartId, PartId) {
        let a = tree
            .insert(
                block("A")
                    .with_position(1.0, 0.0, 0.0)
                    .with_rotation(EulerXyz::new(0.0, 0.0, FRAC_PI_2)),
            )
            .unwrap();
        let b = tree
            .insert(
                block("B")
                    .with_position(0.0, 2.0, 0.0)
                    .with_rotation(EulerXyz::new(FRAC_PI_2, 0.0, 0.0))
                    .with_parent(a),
            )
            .unwrap();
        let c = tree
            .insert(block("C").with_position(0.0, 0.0, 3.0).with_parent(b))
            .unwrap();
        (a, b, c)
    }

    #[test]
    fn test_root_world_equals_local() {
        let mut tree = PartTree::new();
        let local = Transform::from_euler(Vec3::new(0.3, -1.0, 2.0), EulerXyz::new(0.1, 0.2, 0.3));
        let id = tree.insert(block("R").with_local(local)).unwrap();
        assert!(tree.world_transform(id).unwrap().approx_eq(&local, &Tolerance::DEFAULT));
    }

    #[test]
    fn test_three_level_chain_composes_in_order() {
        let mut tree = PartTree::new();
        let (a, b, c) = chain(&mut tree);

        let expected = tree
            .get(a)
            .unwrap()
            .local()
            .then(tree.get(b).unwrap().local())
            .then(tree.get(c).unwrap().local());
        let world = tree.world_transform(c).unwrap();
        assert!(world.approx_eq(&expected, &Tolerance::DEFAULT));
    }

    #[test]
    fn test_editing_root_moves_grandchild() {
        let mut tree = PartTree::new();
        let (a, _, c) = chain(&mut tree);
        let before = tree.world_transform(c).unwrap();

        let moved = tree.get(a).unwrap().local().then(&Transform::translation(0.0, 0.0, 5.0));
        tree.set_local(a, moved).unwrap();

        let after = tree.world_transform(c).unwrap();
        assert!((after.position() - before.position()).norm() > 4.9);
    }

    #[test]
    fn test_world_transform_of_missing_part() {
        let mut tree = PartTree::new();
        let id = tree.insert(block("X")).unwrap();
        tree.remove(id, RemovalPolicy::Reject).unwrap();
        assert!(matches!(
            tree.world_transform(id),
            Err(AssemblyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_insert_requires_existing_parent() {
        let mut tree = PartTree::new();
        let ghost = tree.insert(block("G")).unwrap();
        tree.remove(ghost, RemovalPolicy::Reject).unwrap();
        let err = tree.insert(block("X").with_parent(ghost)).unwrap_err();
        assert!(matches!(err, AssemblyError::NotFound { id } if id == ghost));
    }

    #[test]
    fn test_insert_rejects_duplicate_socket_ids() {
        let mut tree = PartTree::new();
        let part = block("X")
            .with_socket(Socket::mount("m", [0.0; 3]))
            .with_socket(Socket::connector("m", [0.0; 3]));
        assert!(matches!(
            tree.insert(part),
            Err(AssemblyError::DuplicateSocket { socket }) if socket == "m"
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_reparent_onto_self_rejected() {
        let mut tree = PartTree::new();
        let (a, _, _) = chain(&mut tree);
        assert!(matches!(
            tree.reparent(a, Some(a)),
            Err(AssemblyError::SelfParent { .. })
        ));
    }

    #[test]
    fn test_reparent_onto_descendant_rejected() {
        let mut tree = PartTree::new();
        let (a, b, c) = chain(&mut tree);

        for target in [b, c] {
            let err = tree.reparent(a, Some(target)).unwrap_err();
            assert!(matches!(err, AssemblyError::CyclicReparent { child, parent } if child == a && parent == target));
            assert_eq!(tree.get(a).unwrap().parent_id(), None);
        }
    }

    #[test]
    fn test_reparent_changes_link_only() {
        let mut tree = PartTree::new();
        let (a, _, c) = chain(&mut tree);
        let local = *tree.get(c).unwrap().local();

        tree.reparent(c, Some(a)).unwrap();
        assert_eq!(tree.get(c).unwrap().parent_id(), Some(a));
        assert_eq!(tree.get(c).unwrap().local(), &local);

        tree.reparent(c, None).unwrap();
        assert!(tree.roots().contains(&c));
    }

    #[test]
    fn test_corrupted_cycle_is_detected() {
        let mut tree = PartTree::new();
        let (a, _, c) = chain(&mut tree);
        tree.corrupt_parent(a, Some(c));

        assert!(matches!(
            tree.world_transform(c),
            Err(AssemblyError::CyclicGraph { id }) if id == c
        ));
        assert!(matches!(
            tree.ancestors(a),
            Err(AssemblyError::CyclicGraph { .. })
        ));
        // The subtree walk terminates too.
        assert_eq!(tree.subtree(a).len(), 3);
    }

    #[test]
    fn test_hierarchy_queries() {
        let mut tree = PartTree::new();
        let (a, b, c) = chain(&mut tree);
        let d = tree.insert(block("D").with_parent(a)).unwrap();

        assert_eq!(tree.roots(), vec![a]);
        assert_eq!(tree.children(a), vec![b, d]);
        assert_eq!(tree.ancestors(c).unwrap(), vec![b, a]);
        assert!(tree.is_descendant_of(c, a).unwrap());
        assert!(!tree.is_descendant_of(a, c).unwrap());
        assert_eq!(tree.subtree(a), vec![a, b, d, c]);
    }

    #[test]
    fn test_remove_reject_with_children() {
        let mut tree = PartTree::new();
        let (a, b, c) = chain(&mut tree);
        assert!(matches!(
            tree.remove(b, RemovalPolicy::Reject),
            Err(AssemblyError::HasChildren { count: 1, .. })
        ));
        assert_eq!(tree.len(), 3);

        let removed = tree.remove(c, RemovalPolicy::Reject).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].sku_id(), "C");
        assert!(tree.contains(a) && tree.contains(b));
    }

    #[test]
    fn test_remove_cascade_takes_subtree() {
        let mut tree = PartTree::new();
        let (a, b, _) = chain(&mut tree);
        let other = tree.insert(block("O")).unwrap();

        let removed = tree.remove(b, RemovalPolicy::Cascade).unwrap();
        let skus: Vec<_> = removed.iter().map(|p| p.sku_id().to_string()).collect();
        assert_eq!(skus, vec!["B", "C"]);
        assert_eq!(tree.len(), 2);
        assert!(tree.contains(a) && tree.contains(other));
    }

    #[test]
    fn test_remove_promote_keeps_world_pose() {
        let mut tree = PartTree::new();
        let (_, b, c) = chain(&mut tree);
        let world_before = tree.world_transform(c).unwrap();

        tree.remove(b, RemovalPolicy::PromoteToRoot).unwrap();

        let part = tree.get(c).unwrap();
        assert_eq!(part.parent_id(), None);
        let world_after = tree.world_transform(c).unwrap();
        assert!(world_after.approx_eq(&world_before, &Tolerance::ROUND_TRIP));
    }
}
