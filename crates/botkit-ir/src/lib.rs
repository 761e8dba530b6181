//! Data model shared across the botkit robot assembly tools.
//!
//! This crate defines the plain, serializable records that flow between the
//! catalog, the assembly engine, the validator and the command-line front
//! end: component specs, sockets, catalog records and operating
//! requirements. It holds no behaviour beyond small accessors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Physical dimensions `[length, width, height]` in meters.
pub type Dims = [f64; 3];

/// 3D vector with f64 components (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation as X-Y-Z intrinsic axis angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    /// Angle about X.
    pub x: f64,
    /// Angle about Y.
    pub y: f64,
    /// Angle about Z.
    pub z: f64,
}

impl Euler {
    /// Create a new set of angles (radians).
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Role of a socket in a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketKind {
    /// Receiving side. May only be the target of a snap.
    Mount,
    /// Attaching side. May only be the source of a snap.
    Connector,
}

/// A named attachment point in a part's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Identifier, unique within the owning part.
    pub id: String,
    /// Offset from the part origin.
    pub position: [f64; 3],
    /// Orientation as X-Y-Z intrinsic angles (radians).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    /// Mount or connector.
    #[serde(rename = "type")]
    pub kind: SocketKind,
}

impl Socket {
    /// A receiving socket at `position`.
    pub fn mount(id: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            id: id.into(),
            position,
            rotation: None,
            kind: SocketKind::Mount,
        }
    }

    /// An attaching socket at `position`.
    pub fn connector(id: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            id: id.into(),
            position,
            rotation: None,
            kind: SocketKind::Connector,
        }
    }

    /// Set the socket orientation.
    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// Return the first socket id that appears more than once, if any.
pub fn duplicate_socket_id(sockets: &[Socket]) -> Option<&str> {
    sockets.iter().enumerate().find_map(|(i, s)| {
        sockets[..i]
            .iter()
            .any(|earlier| earlier.id == s.id)
            .then_some(s.id.as_str())
    })
}

/// Physical specification of a component, tagged by kind.
///
/// Every variant carries `weight` (kg) and `dims` (meters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Specs {
    /// Drive base. Carries the payload.
    Chassis {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
        /// Carrying capacity in kg.
        max_payload: f64,
        /// Top speed in m/s.
        max_speed: f64,
        /// Steepest climbable slope in degrees.
        climb_angle: f64,
    },
    /// Energy source.
    Battery {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
        /// Energy capacity in Wh.
        capacity: f64,
        /// Nominal voltage in V.
        voltage: f64,
        /// Maximum continuous output in W.
        max_output: f64,
    },
    /// Perception device.
    Sensor {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
        /// Power draw in W.
        power: f64,
        /// Range in meters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<f64>,
        /// Horizontal field of view in degrees.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fov_h: Option<f64>,
        /// Vertical field of view in degrees.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fov_v: Option<f64>,
    },
    /// Motor, gripper, pan/tilt unit and the like.
    Actuator {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
        /// Power draw in W.
        power: f64,
        /// Peak force in N.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_force: Option<f64>,
        /// Peak speed (m/s or deg/s).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_speed: Option<f64>,
    },
    /// On-board computer.
    Compute {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
        /// Power draw in W.
        power: f64,
        /// AI throughput in TOPS.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tops: Option<f64>,
    },
    /// Passive part (plates, brackets, covers).
    Accessory {
        /// Weight in kg.
        weight: f64,
        /// Dimensions in meters.
        dims: Dims,
    },
}

impl Specs {
    /// Weight in kg.
    pub fn weight(&self) -> f64 {
        match self {
            Specs::Chassis { weight, .. }
            | Specs::Battery { weight, .. }
            | Specs::Sensor { weight, .. }
            | Specs::Actuator { weight, .. }
            | Specs::Compute { weight, .. }
            | Specs::Accessory { weight, .. } => *weight,
        }
    }

    /// Dimensions in meters.
    pub fn dims(&self) -> Dims {
        match self {
            Specs::Chassis { dims, .. }
            | Specs::Battery { dims, .. }
            | Specs::Sensor { dims, .. }
            | Specs::Actuator { dims, .. }
            | Specs::Compute { dims, .. }
            | Specs::Accessory { dims, .. } => *dims,
        }
    }

    /// Same specs with new dimensions. The variant never changes.
    pub fn with_dims(&self, new_dims: Dims) -> Self {
        let mut specs = self.clone();
        match &mut specs {
            Specs::Chassis { dims, .. }
            | Specs::Battery { dims, .. }
            | Specs::Sensor { dims, .. }
            | Specs::Actuator { dims, .. }
            | Specs::Compute { dims, .. }
            | Specs::Accessory { dims, .. } => *dims = new_dims,
        }
        specs
    }

    /// Power consumed in W. Only sensors, actuators and compute draw power.
    pub fn power_draw(&self) -> f64 {
        match self {
            Specs::Sensor { power, .. }
            | Specs::Actuator { power, .. }
            | Specs::Compute { power, .. } => *power,
            _ => 0.0,
        }
    }

    /// Lowercase variant name, as used in the `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Specs::Chassis { .. } => "chassis",
            Specs::Battery { .. } => "battery",
            Specs::Sensor { .. } => "sensor",
            Specs::Actuator { .. } => "actuator",
            Specs::Compute { .. } => "compute",
            Specs::Accessory { .. } => "accessory",
        }
    }

    /// Whether this is a chassis.
    pub fn is_chassis(&self) -> bool {
        matches!(self, Specs::Chassis { .. })
    }

    /// Whether this is a battery.
    pub fn is_battery(&self) -> bool {
        matches!(self, Specs::Battery { .. })
    }
}

/// Catalog category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Drive bases.
    Chassis,
    /// Batteries.
    Battery,
    /// Sensors.
    Sensor,
    /// Actuators.
    Actuator,
    /// Computers.
    Compute,
    /// Mounting platforms and plates.
    Platform,
    /// Everything else.
    Accessory,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 7] = [
        Category::Chassis,
        Category::Battery,
        Category::Sensor,
        Category::Actuator,
        Category::Compute,
        Category::Platform,
        Category::Accessory,
    ];

    /// Upper-case tag, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Chassis => "CHASSIS",
            Category::Battery => "BATTERY",
            Category::Sensor => "SENSOR",
            Category::Actuator => "ACTUATOR",
            Category::Compute => "COMPUTE",
            Category::Platform => "PLATFORM",
            Category::Accessory => "ACCESSORY",
        }
    }
}

/// Text keyed by locale (`"en"`, `"zh"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(pub BTreeMap<String, String>);

impl LocalizedString {
    /// Create an empty string table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation.
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Text for `locale`, falling back to English, then Chinese, then "".
    pub fn get(&self, locale: &str) -> &str {
        [locale, "en", "zh"]
            .iter()
            .find_map(|l| self.0.get(*l))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A component as listed by the catalog.
///
/// Sockets may be declared either next to `specs` or inside it; both lists
/// end up in [`ComponentRecord::sockets`], top-level entries first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawComponentRecord")]
pub struct ComponentRecord {
    /// Catalog row identifier.
    pub id: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Category tag.
    pub category: Category,
    /// Display name.
    pub name: LocalizedString,
    /// Long description.
    #[serde(default)]
    pub description: Option<LocalizedString>,
    /// Physical specification.
    pub specs: Specs,
    /// Declared attachment points.
    #[serde(default)]
    pub sockets: Vec<Socket>,
    /// Opaque geometry reference for the renderer.
    pub model_ref: String,
    /// Thumbnail path.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// List price.
    #[serde(rename = "priceList")]
    pub list_price: f64,
}

/// Wire shape of a [`ComponentRecord`] before the nested sockets are lifted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComponentRecord {
    id: String,
    sku: String,
    category: Category,
    name: LocalizedString,
    #[serde(default)]
    description: Option<LocalizedString>,
    specs: SpecsWithSockets,
    #[serde(default)]
    sockets: Vec<Socket>,
    model_ref: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(rename = "priceList")]
    list_price: f64,
}

#[derive(Deserialize)]
struct SpecsWithSockets {
    #[serde(flatten)]
    specs: Specs,
    #[serde(default)]
    sockets: Vec<Socket>,
}

impl From<RawComponentRecord> for ComponentRecord {
    fn from(raw: RawComponentRecord) -> Self {
        let mut sockets = raw.sockets;
        sockets.extend(raw.specs.sockets);
        Self {
            id: raw.id,
            sku: raw.sku,
            category: raw.category,
            name: raw.name,
            description: raw.description,
            specs: raw.specs.specs,
            sockets,
            model_ref: raw.model_ref,
            thumbnail: raw.thumbnail,
            list_price: raw.list_price,
        }
    }
}

/// Environment the robot has to operate in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingRequirements {
    /// Required ground slope in degrees.
    pub slope: f64,
    /// Free-form environment tag (e.g. "indoor", "outdoor").
    pub environment: String,
}

impl Default for OperatingRequirements {
    fn default() -> Self {
        Self {
            slope: 0.0,
            environment: "indoor".to_string(),
        }
    }
}

/// One placed component in a [`Design`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    /// Caller-chosen identifier, unique within the design.
    pub id: String,
    /// SKU to instantiate from the catalog.
    pub sku: String,
    /// Local position relative to `parent`.
    #[serde(default)]
    pub position: Vec3,
    /// Local rotation relative to `parent`.
    #[serde(default)]
    pub rotation: Euler,
    /// Identifier of the parent component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Dimension override (parametric resize).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<Dims>,
}

/// A validation request: a list of placed components plus requirements.
///
/// This is the input format of the command-line tools, not a storage
/// format for assemblies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Design {
    /// Placed components.
    pub parts: Vec<PlacedComponent>,
    /// Operating requirements, if the design states its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<OperatingRequirements>,
}

impl Design {
    /// Create an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
