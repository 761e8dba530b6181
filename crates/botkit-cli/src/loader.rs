//! Turning a design file into a part tree.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use botkit_assembly::{Command, Outcome, PartId, PartTree};
use botkit_catalog::Catalog;
use botkit_ir::{ComponentRecord, Design, PlacedComponent};
use botkit_math::{EulerXyz, Transform, Vec3};
use tracing::info;

/// A design instantiated into a tree, with the file's ids mapped to parts.
pub struct LoadedDesign {
    pub tree: PartTree,
    pub ids: BTreeMap<String, PartId>,
    /// File ids in the order they appear in the design.
    pub order: Vec<String>,
}

impl LoadedDesign {
    /// Part for a design id.
    pub fn part(&self, id: &str) -> Result<PartId> {
        match self.ids.get(id) {
            Some(&part) => Ok(part),
            None => bail!("no part with id '{id}' in design"),
        }
    }

    /// Design id of a part, if it came from the file.
    pub fn name_of(&self, part: PartId) -> Option<&str> {
        self.ids
            .iter()
            .find(|(_, p)| **p == part)
            .map(|(name, _)| name.as_str())
    }

    /// Register a copy of `original` under the first free name of the form
    /// `original-copy`, `original-copy-2`, ... and return that name.
    pub fn add_copy(&mut self, original: &str, part: PartId) -> String {
        let base = format!("{original}-copy");
        let name = std::iter::once(base.clone())
            .chain((2..).map(|n| format!("{base}-{n}")))
            .find(|name| !self.ids.contains_key(name))
            .unwrap_or(base);
        self.ids.insert(name.clone(), part);
        self.order.push(name.clone());
        name
    }
}

pub fn read_design(path: &Path) -> Result<Design> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read design {}", path.display()))?;
    Design::from_json(&json).with_context(|| format!("invalid design {}", path.display()))
}

/// Instantiate every placed component from `catalog`.
///
/// Parents are inserted before their children regardless of file order.
pub fn instantiate(design: &Design, catalog: &dyn Catalog) -> Result<LoadedDesign> {
    let mut by_id: BTreeMap<&str, &PlacedComponent> = BTreeMap::new();
    for placed in &design.parts {
        if by_id.insert(&placed.id, placed).is_some() {
            bail!("duplicate part id '{}'", placed.id);
        }
    }
    for placed in &design.parts {
        if let Some(parent) = &placed.parent {
            if !by_id.contains_key(parent.as_str()) {
                bail!("part '{}' references unknown parent '{parent}'", placed.id);
            }
        }
    }

    let records: BTreeMap<String, ComponentRecord> = catalog
        .components()?
        .into_iter()
        .map(|record| (record.sku.clone(), record))
        .collect();

    let mut tree = PartTree::new();
    let mut ids: BTreeMap<String, PartId> = BTreeMap::new();
    let mut pending: Vec<&PlacedComponent> = design.parts.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for placed in pending {
            let parent = match &placed.parent {
                None => None,
                Some(parent) => match ids.get(parent) {
                    Some(&id) => Some(id),
                    None => {
                        deferred.push(placed);
                        continue;
                    }
                },
            };
            let id = add(&mut tree, placed, parent, &records)?;
            ids.insert(placed.id.clone(), id);
        }
        if deferred.len() == before {
            let names: Vec<_> = deferred.iter().map(|p| p.id.as_str()).collect();
            bail!("parent links form a cycle among: {}", names.join(", "));
        }
        pending = deferred;
    }

    info!(parts = tree.len(), "instantiated design");
    Ok(LoadedDesign {
        tree,
        ids,
        order: design.parts.iter().map(|p| p.id.clone()).collect(),
    })
}

fn add(
    tree: &mut PartTree,
    placed: &PlacedComponent,
    parent: Option<PartId>,
    records: &BTreeMap<String, ComponentRecord>,
) -> Result<PartId> {
    let record = records
        .get(&placed.sku)
        .cloned()
        .with_context(|| format!("unknown SKU '{}' for part '{}'", placed.sku, placed.id))?;
    let local = Transform::from_euler(
        Vec3::new(placed.position.x, placed.position.y, placed.position.z),
        EulerXyz::new(placed.rotation.x, placed.rotation.y, placed.rotation.z),
    );

    let id = match tree.apply(Command::Add {
        record,
        parent,
        local,
    })? {
        Outcome::Added(id) => id,
        other => bail!("unexpected outcome {other:?} while adding '{}'", placed.id),
    };
    if let Some(dims) = placed.dims {
        tree.apply(Command::Resize { part: id, dims })
            .with_context(|| format!("failed to resize '{}'", placed.id))?;
    }
    Ok(id)
}
