//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use unitstore::cache::store::DestroyReport;
use unitstore::core::config::LIBPATH_ENV;
use unitstore::core::model::{Meta, ResultItem, ResultSet, StoreError};
use unitstore::core::render::{OutputFormat, RenderConfig, Renderer};
use unitstore::{DesignUnit, FindOptions, Ident, Library, Session, StoreConfig, UnitKind};

/// unitstore - create, inspect and maintain compiled unit libraries.
#[derive(Parser, Debug)]
#[command(name = "unitstore")]
#[command(
    author,
    version,
    about,
    long_about = r#"unitstore manages library directories of compiled design units.

A library is a directory tagged with a _NVC_LIB marker file, holding one file
per unit. Library names are case-insensitive; the directory is always the
lower-cased name.

Every command prints result items in the selected format (default: jsonl).

Examples:
    unitstore new work
    unitstore put work WORK.TOP --kind entity --source top.vhd
    unitstore units work
    unitstore --search find ieee -v
    unitstore destroy work
"#
)]
pub struct Cli {
    /// Directory that holds (and is searched first for) libraries.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "DIR",
        long_help = "Directory in which new libraries are created. It is also the first\n\
location searched when resolving a library name."
    )]
    pub root: PathBuf,

    /// Extra search directories, colon separated.
    #[arg(
        long,
        global = true,
        env = LIBPATH_ENV,
        value_name = "PATHS",
        long_help = "Colon-separated list of extra directories to search for libraries.\n\n\
Only consulted with --search, after ROOT and before the installation data directory."
    )]
    pub lib_path: Option<String>,

    /// Override the installation data directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Maximum number of units held per open library.
    #[arg(
        long,
        global = true,
        value_name = "N",
        long_help = "Upper bound on the units cached per open library. Adding a unit past\n\
the bound fails. Unbounded when omitted."
    )]
    pub max_units: Option<usize>,

    /// Search beyond ROOT when resolving a library.
    #[arg(
        long,
        global = true,
        long_help = "Resolve library names through the full search path: ROOT, then each\n\
entry of --lib-path, then the installation data directory."
    )]
    pub search: bool,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        value_enum,
        ignore_case = true,
        default_value = "jsonl",
        value_name = "FORMAT"
    )]
    pub format: OutputFormat,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose mode (list searched directories on failed lookups, debug logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty library under ROOT.
    #[command(long_about = "Create ROOT/<name> (lower-cased) and tag it with a marker file.\n\
Fails if anything already exists at that path.\n\n\
Example:\n\
  unitstore new work\n")]
    New {
        /// Library name.
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Resolve a library name and print where it lives.
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Load every unit of a library and list them.
    Units {
        #[arg(value_name = "LIBRARY")]
        library: String,
    },

    /// Add (or replace) a unit in a library and save it.
    #[command(long_about = "Store a design unit in a library. The unit file is named after UNIT.\n\n\
Examples:\n\
  unitstore put work WORK.PKG --kind package\n\
  unitstore put work WORK.TOP --kind entity --depends WORK.PKG --source top.vhd\n")]
    Put {
        #[arg(value_name = "LIBRARY")]
        library: String,

        /// Unit name, used verbatim as the file name.
        #[arg(value_name = "UNIT")]
        unit: String,

        /// Unit kind (entity/architecture/package/package_body/configuration).
        #[arg(long, value_name = "KIND")]
        kind: String,

        /// Units this one depends on (comma-separated).
        #[arg(long, value_name = "UNITS", value_delimiter = ',')]
        depends: Vec<String>,

        /// File whose contents are stored as the unit's source text.
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,
    },

    /// Print one unit of a library.
    Show {
        #[arg(value_name = "LIBRARY")]
        library: String,

        #[arg(value_name = "UNIT")]
        unit: String,
    },

    /// Print the real path of a library, or of a file inside it.
    Path {
        #[arg(value_name = "LIBRARY")]
        library: String,

        #[arg(value_name = "FILE")]
        file: Option<String>,
    },

    /// Delete a library directory and everything in it.
    Destroy {
        #[arg(value_name = "LIBRARY")]
        library: String,
    },
}

fn library_item(library: &Library<DesignUnit>) -> ResultItem {
    ResultItem::library(
        library.name().as_str(),
        library.path().to_string_lossy().to_string(),
    )
    .with_meta(Meta {
        units: Some(library.len()),
        temporary: library.is_temporary(),
        ..Default::default()
    })
}

fn unit_item(library: &Library<DesignUnit>, unit: &DesignUnit) -> Result<ResultItem> {
    let ident = unit.name;
    Ok(ResultItem::unit(library.name().as_str(), ident.as_str())
        .with_data(serde_json::to_value(unit)?)
        .with_meta(Meta {
            dirty: library.is_dirty(&ident),
            ..Default::default()
        }))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let renderer = Renderer::with_config(RenderConfig::with_pretty(cli.format, cli.pretty));

    let mut config = StoreConfig::default()
        .with_current_dir(&cli.root)
        .with_lib_path(cli.lib_path)
        .with_unit_capacity(cli.max_units);
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    let mut session: Session<DesignUnit> = Session::new(config);
    let options = FindOptions {
        verbose: cli.verbose,
        search: cli.search,
    };

    let mut results = ResultSet::new();

    match cli.command {
        Commands::New { name } => {
            let id = session.new_library(&name)?;
            results.push(library_item(session.library(id)?));
        }

        Commands::Find { name } => {
            let id = session.require(&name, options)?;
            results.push(library_item(session.library(id)?));
        }

        Commands::Units { library } => {
            let id = session.require(&library, options)?;
            let lib = session.library_mut(id)?;
            lib.load_all()?;
            let lib = &*lib;
            for unit in lib.units() {
                results.push(unit_item(lib, unit)?);
            }
        }

        Commands::Put {
            library,
            unit,
            kind,
            depends,
            source,
        } => {
            let kind: UnitKind = kind.parse().map_err(anyhow::Error::msg)?;
            let mut design = DesignUnit::new(unit.as_str(), kind)
                .with_depends(depends.iter().map(|d| Ident::new(d)).collect());
            if let Some(path) = &source {
                design = design.with_source(read_source(path)?);
            }

            let id = session.require(&library, options)?;
            session.set_work(id)?;
            let work = session.work()?;
            let lib = session.library_mut(work)?;
            let stored = lib.put(design)?;
            lib.save()?;
            results.push(unit_item(lib, &stored)?);
        }

        Commands::Show { library, unit } => {
            let id = session.require(&library, options)?;
            let lib = session.library_mut(id)?;
            let Some(found) = lib.get(&Ident::new(&unit))? else {
                bail!("unit {} not found in library {}", unit, lib.name());
            };
            results.push(unit_item(lib, &found)?);
        }

        Commands::Path { library, file } => {
            let id = session.require(&library, options)?;
            let path = session.library(id)?.realpath(file.as_deref())?;
            results.push(ResultItem::path(path.to_string_lossy().to_string()));
        }

        Commands::Destroy { library } => {
            let id = session.require(&library, options)?;
            let item = library_item(session.library(id)?);
            let DestroyReport { removed, failures } = session.destroy(id)?;
            results.push(item);
            if failures > 0 {
                results.push(ResultItem::error(StoreError::new(
                    "DESTROY_INCOMPLETE",
                    format!(
                        "library {}: {} entries removed, {} could not be removed",
                        library, removed, failures
                    ),
                )));
            }
        }
    }

    renderer
        .render_to(&results, std::io::stdout().lock())
        .context("Failed to write output")?;
    Ok(())
}
