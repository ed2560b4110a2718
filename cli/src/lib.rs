use anyhow::{anyhow, Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use ontosheet::config::Config;
use ontosheet::decode::DelimitedDecoder;
use ontosheet::format::{detect_format, parse_extension};
use ontosheet::graph::ExportFormat;
use ontosheet::merge::InsertMode;
use ontosheet::predicates::FIXED_COLUMN_COUNT;
use ontosheet::session::example_rows;
use ontosheet::workspace::{find_workspace_root, Workspace, WORKSPACE_DIR};
use std::env::current_dir;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "ontosheet")]
#[command(about = "Author an ontology as a spreadsheet and export it as RDF")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

/// Values that make up the generated ontology settings.
#[derive(Debug, Clone, Default, clap::Args)]
struct SettingsArgs {
    /// Base IRI the ontology IRI is built from, e.g. http://example.org
    #[clap(long)]
    base_iri: Option<String>,
    /// Human-readable ontology label; its PascalCase form ends the ontology IRI
    #[clap(long)]
    label: Option<String>,
    #[clap(long)]
    creator: Option<String>,
    #[clap(long)]
    description: Option<String>,
    /// Separator between the base IRI and the ontology name, usually '/' or '#'
    #[clap(long)]
    delimiter: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Append,
    Replace,
}

impl From<ModeArg> for InsertMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Append => InsertMode::Append,
            ModeArg::Replace => InsertMode::Replace,
        }
    }
}

fn parse_export_format(key: &str) -> std::result::Result<ExportFormat, String> {
    key.parse::<ExportFormat>().map_err(|e| e.to_string())
}

#[derive(Debug, Subcommand)]
enum SettingsCommands {
    /// Print the stored ontology settings
    Show,
    /// Regenerate the ontology settings, keeping imports and unspecified values
    Set {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Debug, Subcommand)]
enum ImportsCommands {
    /// List owl:imports and whether their source has been loaded
    List,
    /// Add an IRI to owl:imports
    Add { iri: String },
    /// Store the ontology text for an import from a local file
    Load { iri: String, file: PathBuf },
}

#[derive(Debug, Subcommand)]
enum PrefixCommands {
    /// List the prefixes used to resolve compact names
    List,
    /// Add a prefix (does not overwrite an existing one)
    Add { name: String, iri: String },
    /// Remove a prefix
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
enum PredicateCommands {
    /// List the custom predicate columns
    List,
    /// Add a custom predicate column; every row gets an empty cell for it
    Add { iri: String },
}

#[derive(Debug, Subcommand)]
enum RowsCommands {
    /// Print the table as tab-separated values
    List,
    /// Append empty rows
    Add { count: usize },
    /// Set "is defined by" to the ontology IRI wherever it is empty
    FillDefinedBy,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new ontosheet workspace in the current directory
    Init {
        /// Overwrite the workspace if it already exists
        #[clap(long, default_value = "false")]
        overwrite: bool,
        /// Seed the table with example rows
        #[clap(long, default_value = "false")]
        example: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Prints the version of the ontosheet binary
    Version,
    /// Prints the status of the workspace
    Status,
    /// Report whether a file name looks like a spreadsheet or an ontology
    Detect { file: String },
    /// Validate a spreadsheet and merge its rows into the table
    Import {
        file: PathBuf,
        /// How imported rows are combined with the table; defaults to the configured mode
        #[clap(long, short, value_enum)]
        mode: Option<ModeArg>,
        /// Treat the first row as data rather than a header
        #[clap(long, default_value = "false")]
        no_header: bool,
    },
    /// Export the table as RDF
    Export {
        /// One of ttl, rdf, jsonld, nt, trig; defaults to the configured format
        #[clap(long, short, value_parser = parse_export_format)]
        format: Option<ExportFormat>,
        /// File to write to; prints to stdout if omitted
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Show or change the ontology settings
    #[command(subcommand)]
    Settings(SettingsCommands),
    /// Manage owl:imports
    #[command(subcommand)]
    Imports(ImportsCommands),
    /// Manage prefixes
    #[command(subcommand)]
    Prefix(PrefixCommands),
    /// Manage custom predicate columns
    #[command(subcommand)]
    Predicate(PredicateCommands),
    /// Inspect and edit table rows
    #[command(subcommand)]
    Rows(RowsCommands),
}

pub fn run() -> Result<()> {
    ontosheet::init_logging();
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ontosheet::init_logging();
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

/// ONTOSHEET_DIR takes precedence; it may name the workspace root or the `.ontosheet`
/// directory itself.
fn workspace_root_from_env() -> Option<PathBuf> {
    let dir = std::env::var("ONTOSHEET_DIR").ok().map(PathBuf::from)?;
    if dir.file_name().map(|n| n == WORKSPACE_DIR).unwrap_or(false) {
        dir.parent().map(|p| p.to_path_buf())
    } else {
        Some(dir)
    }
}

fn require_workspace() -> Result<Workspace> {
    let root = workspace_root_from_env()
        .or_else(find_workspace_root)
        .ok_or_else(|| anyhow!("Not in an ontosheet workspace. Run `ontosheet init` to create one."))?;
    info!("Using workspace at {}", root.display());
    Workspace::load(&root)
}

fn apply_settings_args(config: &mut Config, args: SettingsArgs) {
    if let Some(base_iri) = args.base_iri {
        config.base_iri = base_iri;
    }
    if let Some(label) = args.label {
        config.label = label;
    }
    if let Some(creator) = args.creator {
        config.creator = creator;
    }
    if let Some(description) = args.description {
        config.description = description;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
}

fn execute(cmd: Cli) -> Result<()> {
    // ONTOSHEET_LOG has already been copied into RUST_LOG; the flags override both.
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    match cmd.command {
        Commands::Init {
            overwrite,
            example,
            settings,
        } => {
            let root = match workspace_root_from_env() {
                Some(root) => root,
                None => current_dir()?,
            };
            if root.join(WORKSPACE_DIR).exists() && !overwrite {
                println!("An ontosheet workspace already exists in: {}", root.display());
                println!("Use --overwrite to re-initialize.");
                return Ok(());
            }
            let mut config = Config::default();
            apply_settings_args(&mut config, settings);
            if cmd.verbose || cmd.debug {
                config.print();
            }
            let rows = if example { example_rows() } else { vec![] };
            let mut workspace = Workspace::init(&root, config, rows, overwrite)?;
            let settings = workspace.session.settings_mut().load()?;
            println!("Initialized ontosheet workspace for {}", settings.iri);
        }
        Commands::Version => {
            println!("ontosheet {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Status => {
            let mut workspace = require_workspace()?;
            print_status(&mut workspace)?;
        }
        Commands::Detect { file } => {
            let extension = parse_extension(&file);
            println!("{}", detect_format(&extension));
        }
        Commands::Import {
            file,
            mode,
            no_header,
        } => {
            let mut workspace = require_workspace()?;
            let mode = mode
                .map(InsertMode::from)
                .unwrap_or(workspace.config.insert_mode);
            let has_header_row = workspace.config.has_header_row && !no_header;
            let report = workspace.session.import_file(
                &file,
                has_header_row,
                mode,
                &DelimitedDecoder,
            )?;
            if !report.ignored_columns.is_empty() {
                println!("Ignored columns: {}", report.ignored_columns.join(", "));
            }
            println!(
                "{} rows added ({} total, mode: {})",
                report.stats.appended, report.stats.total, mode
            );
            workspace.save()?;
        }
        Commands::Export { format, output } => {
            let mut workspace = require_workspace()?;
            let format = format.unwrap_or(workspace.config.export_format);
            let export = workspace.session.export(format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &export.text)?;
                    println!("Wrote {} to {}", format.name(), path.display());
                }
                None => print!("{}", export.text),
            }
        }
        Commands::Settings(settings_cmd) => {
            let mut workspace = require_workspace()?;
            match settings_cmd {
                SettingsCommands::Show => {
                    let settings = workspace.session.settings_mut().load()?;
                    settings.print();
                }
                SettingsCommands::Set { settings } => {
                    apply_settings_args(&mut workspace.config, settings);
                    let config = workspace.config.clone();
                    let updated = workspace.session.settings_mut().update(
                        &config.base_iri,
                        &config.label,
                        &config.creator,
                        &config.description,
                        &config.delimiter,
                    )?;
                    workspace.save()?;
                    updated.print();
                }
            }
        }
        Commands::Imports(imports_cmd) => {
            let mut workspace = require_workspace()?;
            let settings = workspace.session.settings_mut();
            match imports_cmd {
                ImportsCommands::List => {
                    for status in settings.import_status()? {
                        let marker = if status.loaded { "loaded" } else { "not loaded" };
                        println!("{} ({})", status.iri, marker);
                    }
                }
                ImportsCommands::Add { iri } => {
                    if settings.add_import(&iri)? {
                        println!("Added import {}", iri);
                    } else {
                        println!("Import {} is already present", iri);
                    }
                }
                ImportsCommands::Load { iri, file } => {
                    let text = std::fs::read_to_string(&file)?;
                    if !settings.store_import_source(&iri, &text)? {
                        return Err(anyhow!(
                            "{} is not a valid RDF/OWL file",
                            file.display()
                        ));
                    }
                    println!("Loaded {} for {}", file.display(), iri);
                }
            }
        }
        Commands::Prefix(prefix_cmd) => {
            let mut workspace = require_workspace()?;
            match prefix_cmd {
                PrefixCommands::List => {
                    for (prefix, namespace) in workspace.session.prefixes().iter() {
                        println!("{}: {}", prefix, namespace);
                    }
                }
                PrefixCommands::Add { name, iri } => {
                    if !workspace.session.prefixes_mut().add(&name, &iri) {
                        return Err(anyhow!("Prefix '{}' is already defined", name));
                    }
                    workspace.save()?;
                    println!("Added prefix {}: {}", name, iri);
                }
                PrefixCommands::Remove { name } => {
                    if workspace.session.prefixes_mut().remove(&name).is_none() {
                        return Err(anyhow!("Prefix '{}' is not defined", name));
                    }
                    workspace.save()?;
                    println!("Removed prefix {}", name);
                }
            }
        }
        Commands::Predicate(predicate_cmd) => {
            let mut workspace = require_workspace()?;
            match predicate_cmd {
                PredicateCommands::List => {
                    let predicates = workspace.session.predicates().custom_predicates();
                    for (i, predicate) in predicates.iter().enumerate() {
                        println!("{}\t{}", FIXED_COLUMN_COUNT + i, predicate);
                    }
                }
                PredicateCommands::Add { iri } => {
                    if !workspace.session.add_custom_predicate(&iri) {
                        return Err(anyhow!("Predicate '{}' is empty or already present", iri));
                    }
                    workspace.save()?;
                    println!("Added predicate column {}", iri.trim());
                }
            }
        }
        Commands::Rows(rows_cmd) => {
            let mut workspace = require_workspace()?;
            match rows_cmd {
                RowsCommands::List => {
                    println!("{}", workspace.session.predicates().column_headers().join("\t"));
                    for row in workspace.session.rows() {
                        println!("{}", row.join("\t"));
                    }
                }
                RowsCommands::Add { count } => {
                    workspace.session.add_rows(count)?;
                    workspace.save()?;
                    println!("{} row(s) added", count);
                }
                RowsCommands::FillDefinedBy => {
                    let updated = workspace.session.fill_is_defined_by()?;
                    workspace.save()?;
                    println!("Set isDefinedBy on {} row(s)", updated);
                }
            }
        }
    }

    Ok(())
}

fn print_status(workspace: &mut Workspace) -> Result<()> {
    let root: &Path = workspace.root();
    println!("Workspace: {}", root.display());
    let rows = workspace.session.rows();
    let filled = rows.iter().filter(|r| r.iter().any(|c| !c.is_empty())).count();
    println!("Rows: {} ({} non-empty)", rows.len(), filled);
    println!(
        "Custom predicates: {}",
        workspace.session.predicates().custom_predicates().len()
    );
    println!("Prefixes: {}", workspace.session.prefixes().len());
    let settings = workspace.session.settings_mut();
    match settings.stored()? {
        Some(stored) => {
            println!("Ontology: {}", stored.iri);
            println!("Version: {}", stored.version_info);
        }
        None => println!("Ontology: (settings not generated)"),
    }
    let imports = settings.import_status()?;
    let loaded = imports.iter().filter(|s| s.loaded).count();
    println!("Imports: {} ({} loaded)", imports.len(), loaded);
    Ok(())
}
