//! botkit CLI - robot assembly tools
//!
//! Lists the component catalog, checks designs against payload, power and
//! climb limits, and previews socket snapping and edits from the terminal.

use anyhow::{bail, Result};
use botkit_assembly::{find_snap, Command, EditorSettings, Outcome, RemovalPolicy, SnapCandidate};
use botkit_catalog::{Catalog, FallbackCatalog, JsonCatalog, WithFallback};
use botkit_math::{Axis, EulerXyz, Transform, Vec3};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod loader;

use loader::LoadedDesign;

#[derive(Parser)]
#[command(name = "botkit")]
#[command(about = "Robot assembly tools: catalog, snapping and physics checks", long_about = None)]
struct Cli {
    /// Editor settings file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "botkit.toml")]
    config: PathBuf,

    /// Catalog JSON file. The built-in catalog is used when it is missing or empty.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log everything, including snap candidates
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog components
    Catalog {
        /// Locale for names (default: from settings)
        #[arg(long)]
        locale: Option<String>,
    },
    /// Check a design against payload, power and climb limits
    Validate {
        /// Design file (JSON)
        design: PathBuf,
        /// Required slope in degrees (overrides the design and settings)
        #[arg(long, allow_negative_numbers = true)]
        slope: Option<f64>,
        /// Environment tag (overrides the design and settings)
        #[arg(long)]
        environment: Option<String>,
    },
    /// Print the world pose of every part
    Transforms {
        /// Design file (JSON)
        design: PathBuf,
    },
    /// Find the snap target for a part dragged to a new pose
    Snap {
        /// Design file (JSON)
        design: PathBuf,
        /// Id of the dragged part
        #[arg(long)]
        part: String,
        /// Proposed position relative to the current parent: x,y,z (meters)
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        position: Vec<f64>,
        /// Proposed rotation relative to the current parent: x,y,z (degrees)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        rotation: Option<Vec<f64>>,
        /// Attach the part to the snap target and print the resulting poses
        #[arg(long)]
        commit: bool,
    },
    /// Apply one edit to a design and print the resulting poses
    Edit {
        /// Design file (JSON)
        design: PathBuf,
        /// Id of the part to edit
        #[arg(long)]
        part: String,
        #[command(subcommand)]
        action: EditAction,
    },
}

#[derive(Subcommand)]
enum EditAction {
    /// Rotate by the configured increment about a local axis
    Rotate {
        #[arg(value_enum)]
        axis: AxisArg,
        /// Rotate the other way
        #[arg(long)]
        reverse: bool,
    },
    /// Copy the part, offset by the configured duplicate offset
    Duplicate,
    /// Move the part to the root, keeping its world pose
    Detach,
    /// Remove the part
    Remove {
        /// What happens to its children
        #[arg(long, value_enum, default_value = "reject")]
        policy: PolicyArg,
    },
    /// Change the part's dimensions: length,width,height (meters)
    Resize {
        #[arg(required = true, value_delimiter = ',')]
        dims: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Reject,
    Cascade,
    Promote,
}

impl From<PolicyArg> for RemovalPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Reject => RemovalPolicy::Reject,
            PolicyArg::Cascade => RemovalPolicy::Cascade,
            PolicyArg::Promote => RemovalPolicy::PromoteToRoot,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let settings = EditorSettings::load(&cli.config)?;
    let catalog: Box<dyn Catalog> = match &cli.catalog {
        Some(path) => Box::new(WithFallback::new(JsonCatalog::new(path))),
        None => Box::new(FallbackCatalog),
    };
    info!("botkit v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Catalog { locale } => {
            list_catalog(catalog.as_ref(), locale.as_deref().unwrap_or(&settings.locale))?;
        }
        Commands::Validate {
            design,
            slope,
            environment,
        } => {
            let design = loader::read_design(&design)?;
            let mut requirements = design
                .requirements
                .clone()
                .unwrap_or_else(|| settings.requirements.clone());
            if let Some(slope) = slope {
                requirements.slope = slope;
            }
            if let Some(environment) = environment {
                requirements.environment = environment;
            }
            let loaded = loader::instantiate(&design, catalog.as_ref())?;
            let verdict = botkit_physics::validate_tree(&loaded.tree, &requirements);
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Transforms { design } => {
            let loaded = loader::instantiate(&loader::read_design(&design)?, catalog.as_ref())?;
            print_transforms(&loaded)?;
        }
        Commands::Snap {
            design,
            part,
            position,
            rotation,
            commit,
        } => {
            let mut loaded = loader::instantiate(&loader::read_design(&design)?, catalog.as_ref())?;
            let id = loaded.part(&part)?;
            let position = triple(&position, "--position")?;
            let rotation = match rotation {
                Some(r) => triple(&r, "--rotation")?,
                None => [0.0; 3],
            };
            let proposed = Transform::from_euler(
                Vec3::new(position[0], position[1], position[2]),
                EulerXyz::from_degrees(rotation[0], rotation[1], rotation[2]),
            );

            let Some(candidate) = find_snap(&loaded.tree, id, &proposed, &settings.snap)? else {
                println!("No mount within {} m of a connector on '{part}'", settings.snap.threshold);
                return Ok(());
            };
            println!("{}", serde_json::to_string_pretty(&SnapReport::new(&loaded, &candidate))?);

            if commit {
                loaded.tree.apply(Command::CommitSnap {
                    part: id,
                    candidate,
                })?;
                println!();
                print_transforms(&loaded)?;
            }
        }
        Commands::Edit {
            design,
            part,
            action,
        } => {
            let mut loaded = loader::instantiate(&loader::read_design(&design)?, catalog.as_ref())?;
            let id = loaded.part(&part)?;
            let command = match action {
                EditAction::Rotate { axis, reverse } => {
                    let step = settings.edit.rotate_increment();
                    Command::Rotate {
                        part: id,
                        axis: axis.into(),
                        increment: if reverse { -step } else { step },
                    }
                }
                EditAction::Duplicate => Command::Duplicate {
                    part: id,
                    offset: settings.edit.duplicate_offset(),
                },
                EditAction::Detach => Command::Detach { part: id },
                EditAction::Remove { policy } => Command::Remove {
                    part: id,
                    policy: policy.into(),
                },
                EditAction::Resize { dims } => Command::Resize {
                    part: id,
                    dims: triple(&dims, "dims")?,
                },
            };

            match loaded.tree.apply(command)? {
                Outcome::Added(copy) => {
                    loaded.add_copy(&part, copy);
                }
                Outcome::Removed(removed) => {
                    loaded.ids.retain(|_, p| !removed.contains(p));
                    let ids = &loaded.ids;
                    loaded.order.retain(|name| ids.contains_key(name));
                    println!("Removed {} part(s)", removed.len());
                }
                Outcome::Updated(_) => {}
            }
            print_transforms(&loaded)?;
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn triple(values: &[f64], what: &str) -> Result<[f64; 3]> {
    match values {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => bail!("{what} takes exactly three comma-separated values"),
    }
}

fn list_catalog(catalog: &dyn Catalog, locale: &str) -> Result<()> {
    let components = catalog.components()?;
    for c in &components {
        println!(
            "{:<20} {:<10} {:>9.2}  {}",
            c.sku,
            c.category.as_str(),
            c.list_price,
            c.name.get(locale)
        );
    }
    println!("\n{} component(s)", components.len());
    Ok(())
}

fn print_transforms(loaded: &LoadedDesign) -> Result<()> {
    for name in &loaded.order {
        let id = loaded.part(name)?;
        let part = loaded.tree.get(id)?;
        let world = loaded.tree.world_transform(id)?;
        let p = world.position();
        let r = world.euler();
        let parent = part
            .parent_id()
            .and_then(|parent| loaded.name_of(parent))
            .unwrap_or("-");
        println!(
            "{name:<16} {:<20} parent={parent:<12} pos=({:.4}, {:.4}, {:.4}) rot=({:.2}, {:.2}, {:.2})",
            part.sku_id(),
            p.x,
            p.y,
            p.z,
            r.x.to_degrees(),
            r.y.to_degrees(),
            r.z.to_degrees()
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapReport {
    target: String,
    target_socket: String,
    source_socket: String,
    distance: f64,
    position: [f64; 3],
    rotation_deg: [f64; 3],
}

impl SnapReport {
    fn new(loaded: &LoadedDesign, candidate: &SnapCandidate) -> Self {
        let euler = Transform::from_parts(candidate.position, candidate.rotation).euler();
        Self {
            target: loaded
                .name_of(candidate.target_part)
                .unwrap_or("?")
                .to_string(),
            target_socket: candidate.target_socket.clone(),
            source_socket: candidate.source_socket.clone(),
            distance: candidate.distance,
            position: [candidate.position.x, candidate.position.y, candidate.position.z],
            rotation_deg: [euler.x.to_degrees(), euler.y.to_degrees(), euler.z.to_degrees()],
        }
    }
}
