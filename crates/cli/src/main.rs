use anyhow::Context;
use api_shared::warnings_res;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use crm_core::constants::DIRECTORY_FILE_ENV;
use crm_core::{CoreConfig, Directory, DisplayNameResolver, ExportOptions, TaskService};
use fhir::{FhirError, TaskCodec, TaskData, ValidationGate};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "CRM FHIR Task conversion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a FHIR Task file for structural validity
    Validate {
        /// FHIR Task JSON file (`-` for stdin)
        file: PathBuf,
    },
    /// Convert a FHIR Task into an internal task
    Import {
        /// FHIR Task JSON file (`-` for stdin)
        file: PathBuf,
        /// Display-name directory YAML (defaults to CRM_DIRECTORY_FILE)
        #[arg(long)]
        directory: Option<String>,
    },
    /// Convert an internal task into a FHIR Task
    Export {
        /// Internal task JSON file (`-` for stdin)
        file: PathBuf,
        /// Display-name directory YAML (defaults to CRM_DIRECTORY_FILE)
        #[arg(long)]
        directory: Option<String>,
        /// Original creation time (RFC 3339); defaults to now
        #[arg(long)]
        authored_on: Option<DateTime<Utc>>,
        /// Execution period start (RFC 3339)
        #[arg(long)]
        period_start: Option<DateTime<Utc>>,
    },
    /// Look up a display name in a directory file
    Lookup {
        /// Resource type (Patient, Practitioner or Case)
        resource_type: String,
        /// Resource identifier
        id: String,
        /// Display-name directory YAML
        #[arg(long)]
        directory: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crm_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { file }) => {
            let resource = TaskCodec::parse_json(&read_input(&file)?)?;
            match ValidationGate::check(&resource) {
                Ok(()) => println!("valid"),
                Err(FhirError::InvalidResource { violations }) => {
                    anyhow::bail!("invalid Task resource: {}", violations.join(", "));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::Import { file, directory }) => {
            let service = task_service(directory)?;
            let imported = service.import_json(&read_input(&file)?)?;
            print_warnings(&imported.warnings);
            println!("{}", serde_json::to_string_pretty(&imported.task)?);
        }
        Some(Commands::Export {
            file,
            directory,
            authored_on,
            period_start,
        }) => {
            let service = task_service(directory)?;
            let task: TaskData = serde_json::from_str(&read_input(&file)?)
                .context("internal task JSON does not match the task schema")?;
            let options = ExportOptions {
                authored_on,
                period_start,
            };
            let exported = service.export(&task, options)?;
            print_warnings(&exported.warnings);
            println!("{}", TaskCodec::render_json(&exported.resource)?);
        }
        Some(Commands::Lookup {
            resource_type,
            id,
            directory,
        }) => {
            let directory = Directory::load(&directory)?;
            match directory.resolve_display_name(&resource_type, &id) {
                Some(name) => println!("{name}"),
                None => anyhow::bail!("no display name for {resource_type}/{id}"),
            }
        }
        None => {
            println!("Use 'crm --help' for commands");
        }
    }

    Ok(())
}

/// Read the whole of `path`, or stdin when `path` is `-`.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `--directory` wins over the environment; neither means names are left unset.
fn task_service(directory: Option<String>) -> anyhow::Result<TaskService> {
    let directory = directory.or_else(|| std::env::var(DIRECTORY_FILE_ENV).ok());
    let cfg = CoreConfig::from_env_values(directory, None)?;
    Ok(TaskService::new(crm_core::resolver_from_config(&cfg)?))
}

fn print_warnings(warnings: &[fhir::UnmappableEnumWarning]) {
    for warning in warnings_res(warnings) {
        eprintln!("warning: {}", warning.message);
    }
}
