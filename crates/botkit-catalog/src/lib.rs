#![warn(missing_docs)]

//! Component catalog access for botkit.
//!
//! The catalog is a read-only lookup service that returns
//! [`ComponentRecord`]s by SKU. Parts snapshot the record they were created
//! from, so the catalog is only consulted when adding parts.
//!
//! [`WithFallback`] wraps any source and substitutes the built-in
//! [`FallbackCatalog`] when the source fails or is empty, which keeps the
//! tools usable offline.
//!
//! # Example
//!
//! ```
//! use botkit_catalog::{Catalog, FallbackCatalog};
//!
//! let chassis = FallbackCatalog.lookup("CHASSIS-GENERIC-01").unwrap();
//! assert!(chassis.is_some());
//! ```

mod error;
mod fallback;

pub use error::{CatalogError, Result};
pub use fallback::{fallback_components, FallbackCatalog};

use std::path::{Path, PathBuf};

use botkit_ir::ComponentRecord;
use tracing::{debug, warn};

/// A source of component records.
pub trait Catalog {
    /// All active components.
    fn components(&self) -> Result<Vec<ComponentRecord>>;

    /// The component with the given SKU, if listed.
    fn lookup(&self, sku: &str) -> Result<Option<ComponentRecord>> {
        Ok(self.components()?.into_iter().find(|c| c.sku == sku))
    }
}

/// A catalog stored as a JSON array of [`ComponentRecord`]s.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Catalog backed by the JSON file at `path`. The file is read on every
    /// query.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a JSON array of records.
    pub fn parse(json: &str) -> Result<Vec<ComponentRecord>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Catalog for JsonCatalog {
    fn components(&self) -> Result<Vec<ComponentRecord>> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CatalogError::Unavailable(format!("{} does not exist", self.path.display()))
            } else {
                CatalogError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let components = Self::parse(&json)?;
        debug!(count = components.len(), path = %self.path.display(), "loaded catalog");
        Ok(components)
    }
}

/// Wraps a catalog source and answers from [`FallbackCatalog`] whenever the
/// source errors or lists nothing.
#[derive(Debug, Clone)]
pub struct WithFallback<C> {
    source: C,
}

impl<C: Catalog> WithFallback<C> {
    /// Wrap `source`.
    pub fn new(source: C) -> Self {
        Self { source }
    }

    /// The wrapped source.
    pub fn source(&self) -> &C {
        &self.source
    }
}

impl<C: Catalog> Catalog for WithFallback<C> {
    fn components(&self) -> Result<Vec<ComponentRecord>> {
        match self.source.components() {
            Ok(components) if !components.is_empty() => Ok(components),
            Ok(_) => {
                warn!("catalog source is empty, using built-in fallback catalog");
                FallbackCatalog.components()
            }
            Err(err) => {
                warn!(error = %err, "catalog source failed, using built-in fallback catalog");
                FallbackCatalog.components()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl Catalog for Offline {
        fn components(&self) -> Result<Vec<ComponentRecord>> {
            Err(CatalogError::Unavailable("database down".into()))
        }
    }

    struct Fixed(Vec<ComponentRecord>);

    impl Catalog for Fixed {
        fn components(&self) -> Result<Vec<ComponentRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_lookup_by_sku() {
        let lidar = FallbackCatalog.lookup("LIDAR-VLP16").unwrap().unwrap();
        assert_eq!(lidar.specs.power_draw(), 8.0);
        assert!(FallbackCatalog.lookup("NOPE").unwrap().is_none());
    }

    #[test]
    fn test_fallback_on_error() {
        let catalog = WithFallback::new(Offline);
        let components = catalog.components().unwrap();
        assert_eq!(components, fallback_components());
    }

    #[test]
    fn test_fallback_on_empty_source() {
        let catalog = WithFallback::new(Fixed(Vec::new()));
        assert!(catalog.lookup("CHASSIS-GENERIC-01").unwrap().is_some());
    }

    #[test]
    fn test_source_wins_when_available() {
        let mut only = fallback_components();
        only.truncate(1);
        let catalog = WithFallback::new(Fixed(only.clone()));
        assert_eq!(catalog.components().unwrap(), only);
        assert!(catalog.lookup("LIDAR-VLP16").unwrap().is_none());
    }

    #[test]
    fn test_missing_json_file_is_unavailable() {
        let catalog = JsonCatalog::new("/definitely/not/here/catalog.json");
        assert_eq!(catalog.path(), Path::new("/definitely/not/here/catalog.json"));
        assert!(matches!(
            catalog.components(),
            Err(CatalogError::Unavailable(_))
        ));
        let wrapped = WithFallback::new(catalog);
        assert!(wrapped.source().components().is_err());
        assert!(wrapped.components().is_ok());
    }

    #[test]
    fn test_parse_records_with_sockets_inside_specs() {
        let json = r#"[{
            "id": "fallback-chassis-01",
            "sku": "CHASSIS-GENERIC-01",
            "category": "CHASSIS",
            "name": { "zh": "通用中型差速底盘", "en": "Generic Medium Diff-Drive Chassis" },
            "specs": {
                "type": "chassis",
                "weight": 30,
                "dims": [0.6, 0.5, 0.3],
                "max_payload": 80,
                "max_speed": 1.2,
                "climb_angle": 15,
                "sockets": [
                    { "id": "mount-top-center", "position": [0, 0.15, 0], "type": "mount" },
                    { "id": "mount-front", "position": [0, 0.1, 0.25], "type": "mount" }
                ]
            },
            "modelRef": "chassis",
            "priceList": 4500
        }]"#;
        let parsed = JsonCatalog::parse(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].sockets.len(), 2);
        assert_eq!(parsed[0].sockets[0].id, "mount-top-center");
    }

    #[test]
    fn test_parse_json_records() {
        let json = serde_json::to_string(&fallback_components()).unwrap();
        let parsed = JsonCatalog::parse(&json).unwrap();
        assert_eq!(parsed.len(), fallback_components().len());
        assert!(JsonCatalog::parse("{ not json").is_err());
    }
}
