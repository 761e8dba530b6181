//! Built-in catalog used when the real source is unreachable.

use botkit_ir::{Category, ComponentRecord, LocalizedString, Socket, Specs};

use crate::{Catalog, Result};

/// Fixed offline catalog with at least one component per category.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl Catalog for FallbackCatalog {
    fn components(&self) -> Result<Vec<ComponentRecord>> {
        Ok(fallback_components())
    }
}

fn name(en: &str, zh: &str) -> LocalizedString {
    LocalizedString::new()
        .with("en", format!("{en} (Offline)"))
        .with("zh", format!("{zh} (离线)"))
}

/// The built-in component list.
pub fn fallback_components() -> Vec<ComponentRecord> {
    vec![
        ComponentRecord {
            id: "fallback-chassis-01".to_string(),
            sku: "CHASSIS-GENERIC-01".to_string(),
            category: Category::Chassis,
            name: name("Generic Medium Diff-Drive Chassis", "通用中型差速底盘"),
            description: Some(
                LocalizedString::new()
                    .with(
                        "en",
                        "Basic chassis for indoor/outdoor smooth surfaces, 80kg payload.",
                    )
                    .with("zh", "适用于室内外平滑路面的基础底盘，载重80kg。"),
            ),
            specs: Specs::Chassis {
                weight: 30.0,
                dims: [0.6, 0.5, 0.3],
                max_payload: 80.0,
                max_speed: 1.2,
                climb_angle: 15.0,
            },
            sockets: vec![
                Socket::mount("mount-top-center", [0.0, 0.15, 0.0]),
                Socket::mount("mount-front", [0.0, 0.1, 0.25]),
                Socket::mount("mount-rear", [0.0, 0.1, -0.25]),
            ],
            model_ref: "chassis".to_string(),
            thumbnail: Some("/assets/thumbnails/chassis.png".to_string()),
            list_price: 4500.0,
        },
        ComponentRecord {
            id: "fallback-battery-01".to_string(),
            sku: "BATTERY-24V-20AH".to_string(),
            category: Category::Battery,
            name: name("24V High-Perf Lithium Battery", "24V 高性能锂电池包"),
            description: Some(
                LocalizedString::new()
                    .with("en", "Long-range LiFePO4 battery for extended operation.")
                    .with("zh", "长续航磷酸铁锂电池，适合长时间作业。"),
            ),
            specs: Specs::Battery {
                weight: 3.5,
                dims: [0.2, 0.1, 0.1],
                capacity: 480.0,
                voltage: 24.0,
                max_output: 500.0,
            },
            sockets: vec![Socket::connector("connector-bottom", [0.0, -0.05, 0.0])],
            model_ref: "battery".to_string(),
            thumbnail: None,
            list_price: 1200.0,
        },
        ComponentRecord {
            id: "fallback-lidar-01".to_string(),
            sku: "LIDAR-VLP16".to_string(),
            category: Category::Sensor,
            name: name("16-Channel LiDAR", "16线激光雷达"),
            description: None,
            specs: Specs::Sensor {
                weight: 0.8,
                dims: [0.1, 0.1, 0.08],
                power: 8.0,
                range: Some(100.0),
                fov_h: None,
                fov_v: Some(30.0),
            },
            sockets: vec![Socket::connector("connector-bottom", [0.0, -0.04, 0.0])],
            model_ref: "lidar".to_string(),
            thumbnail: None,
            list_price: 8000.0,
        },
        ComponentRecord {
            id: "fallback-camera-01".to_string(),
            sku: "CAM-RGBD-PRO".to_string(),
            category: Category::Sensor,
            name: name("Pro RGBD Depth Camera", "专业RGBD深度相机"),
            description: None,
            specs: Specs::Sensor {
                weight: 0.3,
                dims: [0.12, 0.03, 0.03],
                power: 3.0,
                range: Some(10.0),
                fov_h: Some(87.0),
                fov_v: None,
            },
            sockets: vec![Socket::connector("connector-bottom", [0.0, -0.015, 0.0])],
            model_ref: "camera".to_string(),
            thumbnail: None,
            list_price: 1500.0,
        },
        ComponentRecord {
            id: "fallback-pan-tilt-01".to_string(),
            sku: "ACT-PAN-TILT-01".to_string(),
            category: Category::Actuator,
            name: name("Pan-Tilt Servo Head", "云台舵机"),
            description: None,
            specs: Specs::Actuator {
                weight: 1.2,
                dims: [0.12, 0.12, 0.15],
                power: 12.0,
                max_force: Some(50.0),
                max_speed: Some(180.0),
            },
            sockets: vec![
                Socket::connector("connector-bottom", [0.0, -0.075, 0.0]),
                Socket::mount("mount-top", [0.0, 0.075, 0.0]),
            ],
            model_ref: "pan_tilt".to_string(),
            thumbnail: None,
            list_price: 2200.0,
        },
        ComponentRecord {
            id: "fallback-compute-01".to_string(),
            sku: "COMPUTE-EDGE-AI-01".to_string(),
            category: Category::Compute,
            name: name("Edge AI Compute Module", "边缘AI计算模块"),
            description: None,
            specs: Specs::Compute {
                weight: 0.6,
                dims: [0.11, 0.11, 0.07],
                power: 25.0,
                tops: Some(100.0),
            },
            sockets: vec![Socket::connector("connector-bottom", [0.0, -0.035, 0.0])],
            model_ref: "compute".to_string(),
            thumbnail: None,
            list_price: 6000.0,
        },
        ComponentRecord {
            id: "fallback-plate-01".to_string(),
            sku: "PLATFORM-PLATE-01".to_string(),
            category: Category::Platform,
            name: name("Aluminium Mounting Plate", "铝制安装板"),
            description: None,
            specs: Specs::Accessory {
                weight: 1.0,
                dims: [0.4, 0.3, 0.02],
            },
            sockets: vec![
                Socket::connector("connector-bottom", [0.0, -0.01, 0.0]),
                Socket::mount("mount-top", [0.0, 0.01, 0.0]),
                Socket::mount("mount-front", [0.2, 0.01, 0.0]),
                Socket::mount("mount-back", [-0.2, 0.01, 0.0]),
            ],
            model_ref: "plate".to_string(),
            thumbnail: None,
            list_price: 300.0,
        },
        ComponentRecord {
            id: "fallback-bumper-01".to_string(),
            sku: "ACC-BUMPER-01".to_string(),
            category: Category::Accessory,
            name: name("Soft Bumper", "软质防撞条"),
            description: None,
            specs: Specs::Accessory {
                weight: 0.4,
                dims: [0.5, 0.05, 0.05],
            },
            sockets: vec![Socket::connector("connector-back", [0.0, 0.0, -0.025])],
            model_ref: "bumper".to_string(),
            thumbnail: None,
            list_price: 150.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use botkit_ir::duplicate_socket_id;

    #[test]
    fn test_every_category_is_covered() {
        let components = fallback_components();
        for category in Category::ALL {
            assert!(
                components.iter().any(|c| c.category == category),
                "no fallback component for {}",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_skus_and_sockets_are_unique() {
        let components = fallback_components();
        for (i, c) in components.iter().enumerate() {
            assert!(components[..i].iter().all(|other| other.sku != c.sku));
            assert_eq!(duplicate_socket_id(&c.sockets), None, "{}", c.sku);
        }
    }

    #[test]
    fn test_names_are_marked_offline() {
        for c in fallback_components() {
            assert!(c.name.get("en").ends_with("(Offline)"));
        }
    }
}
