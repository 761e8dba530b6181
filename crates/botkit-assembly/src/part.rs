//! Individual parts in an assembly.
//!
//! A [`Part`] is a catalog component placed in the assembly: a snapshot of
//! the catalog record (specs, sockets, price) plus a local transform and an
//! optional parent link.

use botkit_ir::{Category, ComponentRecord, LocalizedString, Socket, Specs};
use botkit_math::{EulerXyz, Transform, Vec3};

use crate::tree::PartId;

/// A single part in an assembly.
///
/// The local transform positions the part relative to its parent, or to the
/// world origin when it has none. Parts are built with the `with_*` methods
/// and then handed to [`PartTree::insert`](crate::PartTree::insert), which
/// assigns the id; afterwards they only change through the tree.
///
/// # Example
///
/// ```
/// use botkit_assembly::Part;
/// use botkit_ir::{Category, Socket, Specs};
///
/// let part = Part::new(
///     "PLATE-01",
///     Category::Platform,
///     Specs::Accessory { weight: 1.0, dims: [0.4, 0.3, 0.02] },
/// )
/// .with_position(0.0, 0.2, 0.0)
/// .with_socket(Socket::mount("mount-top", [0.0, 0.01, 0.0]));
///
/// assert_eq!(part.sku_id(), "PLATE-01");
/// assert_eq!(part.sockets().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Part {
    id: PartId,
    sku_id: String,
    name: LocalizedString,
    category: Category,
    model_ref: String,
    unit_price: f64,
    local: Transform,
    specs: Specs,
    sockets: Vec<Socket>,
    parent_id: Option<PartId>,
}

impl Part {
    /// Create a part with identity transform, no sockets and no parent.
    pub fn new(sku_id: impl Into<String>, category: Category, specs: Specs) -> Self {
        Self {
            id: PartId::default(),
            sku_id: sku_id.into(),
            name: LocalizedString::new(),
            category,
            model_ref: String::new(),
            unit_price: 0.0,
            local: Transform::identity(),
            specs,
            sockets: Vec::new(),
            parent_id: None,
        }
    }

    /// Instantiate a catalog record. Specs and sockets are copied, so later
    /// catalog changes do not affect the part.
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            name: record.name.clone(),
            model_ref: record.model_ref.clone(),
            unit_price: record.list_price,
            sockets: record.sockets.clone(),
            ..Self::new(record.sku.clone(), record.category, record.specs.clone())
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: LocalizedString) -> Self {
        self.name = name;
        self
    }

    /// Set the unit price.
    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = price;
        self
    }

    /// Append a socket.
    pub fn with_socket(mut self, socket: Socket) -> Self {
        self.sockets.push(socket);
        self
    }

    /// Replace all sockets.
    pub fn with_sockets(mut self, sockets: Vec<Socket>) -> Self {
        self.sockets = sockets;
        self
    }

    /// Set the local translation, keeping the rotation.
    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.local = Transform::from_parts(Vec3::new(x, y, z), self.local.rotation());
        self
    }

    /// Set the local rotation, keeping the translation.
    pub fn with_rotation(mut self, rotation: EulerXyz) -> Self {
        self.local = Transform::from_euler(self.local.position(), rotation);
        self
    }

    /// Set the whole local transform.
    pub fn with_local(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    /// Attach to `parent` on insertion.
    pub fn with_parent(mut self, parent: PartId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Assembly-scoped id. Null until inserted into a tree.
    pub fn id(&self) -> PartId {
        self.id
    }

    /// SKU of the originating catalog component.
    pub fn sku_id(&self) -> &str {
        &self.sku_id
    }

    /// Display name.
    pub fn name(&self) -> &LocalizedString {
        &self.name
    }

    /// Catalog category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Opaque geometry reference.
    pub fn model_ref(&self) -> &str {
        &self.model_ref
    }

    /// List price snapshotted at creation.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Transform relative to the parent (or world).
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Local translation.
    pub fn local_position(&self) -> Vec3 {
        self.local.position()
    }

    /// Local rotation as X-Y-Z intrinsic angles.
    pub fn local_rotation(&self) -> EulerXyz {
        self.local.euler()
    }

    /// Physical specification.
    pub fn specs(&self) -> &Specs {
        &self.specs
    }

    /// Attachment points, in declaration order.
    pub fn sockets(&self) -> &[Socket] {
        &self.sockets
    }

    /// Socket by id.
    pub fn socket(&self, id: &str) -> Option<&Socket> {
        self.sockets.iter().find(|s| s.id == id)
    }

    /// Parent part, if attached.
    pub fn parent_id(&self) -> Option<PartId> {
        self.parent_id
    }

    /// Weight in kg.
    pub fn weight(&self) -> f64 {
        self.specs.weight()
    }

    pub(crate) fn set_id(&mut self, id: PartId) {
        self.id = id;
    }

    pub(crate) fn set_local(&mut self, local: Transform) {
        self.local = local;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<PartId>) {
        self.parent_id = parent;
    }

    pub(crate) fn set_specs(&mut self, specs: Specs, sockets: Vec<Socket>) {
        self.specs = specs;
        self.sockets = sockets;
    }
}

/// Frame of a socket in its part's local space.
pub fn socket_frame(socket: &Socket) -> Transform {
    let [x, y, z] = socket.position;
    let [rx, ry, rz] = socket.rotation.unwrap_or([0.0; 3]);
    Transform::from_euler(Vec3::new(x, y, z), EulerXyz::new(rx, ry, rz))
}
