use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use personalia_application::ReconciliationOptions;
use personalia_core::AppError;
use tracing_subscriber::EnvFilter;

/// Command-line surface. Every option can also come from its
/// `PERSONALIA_*` environment variable.
#[derive(Debug, Parser)]
#[command(name = "personalia")]
#[command(about = "Reconcile declared employee columns and resolve role capabilities")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    map: MapArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Match declared table/column pairs against a schema snapshot (default)")]
    Map(MapArgs),
    #[command(about = "Print the capabilities resolved for a set of roles")]
    Capabilities(CapabilitiesArgs),
}

#[derive(Debug, Clone, Args)]
struct MapArgs {
    #[arg(
        long, env = "PERSONALIA_SCHEMA_PATH", value_name = "PATH",
        help = "Schema snapshot JSON file"
    )]
    schema_path: Option<PathBuf>,
    #[arg(
        long, env = "PERSONALIA_DECLARATIONS_PATH", value_name = "PATH",
        help = "Column declarations JSON file"
    )]
    declarations_path: Option<PathBuf>,
    #[arg(
        long, env = "PERSONALIA_REPORT_PATH", value_name = "PATH",
        help = "Write the report here instead of stdout"
    )]
    report_path: Option<PathBuf>,
    #[arg(
        long, env = "PERSONALIA_DEFAULT_SCHEMA", default_value = "dbo",
        help = "Schema prefix for bare table names"
    )]
    default_schema: String,
    #[arg(
        long, env = "PERSONALIA_SUGGESTION_THRESHOLD", default_value_t = 0.6,
        value_parser = parse_threshold, help = "Minimum similarity for a suggestion"
    )]
    suggestion_threshold: f64,
    #[arg(
        long, env = "PERSONALIA_SUGGESTION_LIMIT", default_value_t = 3,
        help = "Maximum suggestions per record"
    )]
    suggestion_limit: usize,
}

#[derive(Debug, Clone, Args)]
struct CapabilitiesArgs {
    #[arg(
        long, env = "PERSONALIA_ACCESS_CONTROL_PATH", value_name = "PATH",
        help = "Access-control snapshot JSON file"
    )]
    access_control_path: PathBuf,
    #[arg(
        long, env = "PERSONALIA_ROLES", value_delimiter = ',', required = true,
        help = "Raw role names, comma separated"
    )]
    roles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub schema_path: PathBuf,
    pub declarations_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub options: ReconciliationOptions,
}

#[derive(Debug, Clone)]
pub struct CapabilitiesConfig {
    pub access_control_path: PathBuf,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CliConfig {
    Map(MapConfig),
    Capabilities(CapabilitiesConfig),
}

impl CliConfig {
    /// Parses the process arguments, exiting with usage on bad input.
    pub fn load() -> Result<Self, AppError> {
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> Result<Self, AppError> {
        match cli.command {
            None => MapConfig::try_from(cli.map).map(Self::Map),
            Some(Command::Map(args)) => MapConfig::try_from(args).map(Self::Map),
            Some(Command::Capabilities(args)) => Ok(Self::Capabilities(CapabilitiesConfig {
                access_control_path: args.access_control_path,
                roles: args.roles,
            })),
        }
    }
}

impl TryFrom<MapArgs> for MapConfig {
    type Error = AppError;

    fn try_from(args: MapArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            schema_path: required_path(args.schema_path, "PERSONALIA_SCHEMA_PATH")?,
            declarations_path: required_path(
                args.declarations_path,
                "PERSONALIA_DECLARATIONS_PATH",
            )?,
            report_path: args.report_path,
            options: ReconciliationOptions {
                default_schema: args.default_schema,
                suggestion_threshold: args.suggestion_threshold,
                suggestion_limit: args.suggestion_limit,
            },
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_path(value: Option<PathBuf>, name: &str) -> Result<PathBuf, AppError> {
    value
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold = value
        .parse::<f64>()
        .map_err(|error| format!("invalid threshold '{value}': {error}"))?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!("threshold must be between 0 and 1, got {threshold}"));
    }

    Ok(threshold)
}
