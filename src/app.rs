use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use toml::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_FORMAT, DEFAULT_OUTPUT_SUBDIR, DEFAULT_PAR2_VOLUMES, DEFAULT_REDUNDANCY_PERCENT};
use crate::settings::{self, Settings};
use crate::tool::SystemRunner;
use crate::types::{ArchiveFormat, ProducedFile};
use crate::ui::display::{format_bytes, render_value, show_done, show_settings, show_step, show_summary};
use crate::ui::progress::Spinner;
use crate::{archive, parity, validation};

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a directory, archive it and add PAR2 recovery data.
    Pack(PackArgs),

    /// Read or change persisted settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
pub struct PackArgs {
    /// Directory to archive.
    source_dir: PathBuf,

    /// Archive format: tar, iso or dmg.
    #[arg(short, long)]
    format: Option<String>,

    /// Output directory for the archive and its recovery files.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PAR2 redundancy in percent.
    #[arg(short, long)]
    redundancy: Option<u32>,

    /// Number of PAR2 recovery volumes.
    #[arg(short = 'n', long = "par2-volumes")]
    par2_volumes: Option<u32>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Store a value, e.g. `pack.redundancy_percent 20`.
    Set { key: String, value: String },

    /// Print a single value.
    Get { key: String },

    /// Print every setting, defaults included.
    List,
}

#[derive(Parser)]
#[command(name = "lam", version, about = "Langzeitarchiv-Manager: validate, pack and protect directories for long-term storage.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

/// Fully resolved options of a pack run.
#[derive(Debug, PartialEq, Eq)]
struct PackPlan {
    format: ArchiveFormat,
    output_dir: PathBuf,
    redundancy_percent: u32,
    par2_volumes: u32,
}

impl PackPlan {
    /// Resolves every option as flag, then persisted setting, then built-in default.
    fn resolve(args: &PackArgs, settings: &Settings, home: &Path) -> Result<Self> {
        let format_name = match &args.format {
            Some(name) => name.clone(),
            None => text_setting(settings, "pack.default_format")?.unwrap_or_else(|| DEFAULT_FORMAT.to_owned()),
        };
        let format = ArchiveFormat::parse(&format_name)?;

        let output_dir = match &args.output {
            Some(dir) => dir.clone(),
            None => match text_setting(settings, "pack.output_dir")? {
                Some(raw) => settings::expand_tilde(&raw, home),
                None => DEFAULT_OUTPUT_SUBDIR.iter().fold(home.to_path_buf(), |dir, part| dir.join(part)),
            },
        };

        let redundancy_percent = match args.redundancy {
            Some(value) => value,
            None => count_setting(settings, "pack.redundancy_percent", DEFAULT_REDUNDANCY_PERCENT)?,
        };
        let par2_volumes = match args.par2_volumes {
            Some(value) => value,
            None => count_setting(settings, "pack.par2_volumes", DEFAULT_PAR2_VOLUMES)?,
        };

        Ok(Self { format, output_dir, redundancy_percent, par2_volumes })
    }
}

/// Reads a text setting; an empty string counts as unset.
fn text_setting(settings: &Settings, key: &str) -> Result<Option<String>> {
    match settings.get(key) {
        None => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => bail!("setting {key} must be text, found {other}"),
    }
}

/// Reads a count setting. Decimals are truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_setting(settings: &Settings, key: &str, default: i64) -> Result<u32> {
    let value = settings.get(key).unwrap_or(Value::Integer(default));
    let count = match &value {
        Value::Integer(number) => u32::try_from(*number).ok(),
        Value::Float(number) if number.is_finite() && number.trunc() >= 0.0 && number.trunc() <= f64::from(u32::MAX) => Some(number.trunc() as u32),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    count.with_context(|| format!("setting {key} must be a non-negative integer, found {value}"))
}

impl App {
    pub fn init() -> Result<Self> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Pack(args) => Self::pack(&args).await,
            Commands::Config(command) => Self::config(command),
        }
    }

    async fn pack(args: &PackArgs) -> Result<()> {
        let settings = Settings::open()?;
        let home = settings::home_dir()?;
        let plan = PackPlan::resolve(args, &settings, &home)?;
        debug!(?plan, "resolved pack options");

        let source_dir = args.source_dir.as_path();

        show_step("Validating", &format!("{} …", source_dir.display()));
        validation::validate(source_dir).context("validation failed")?;
        show_done("Validation passed.");

        show_step(&format!("Creating {} archive in", plan.format.label()), &format!("{} …", plan.output_dir.display()));
        let spinner = Spinner::new(&format!("Writing {} archive", plan.format.label()));
        let archive_path = archive::create_archive(&SystemRunner, source_dir, &plan.output_dir, plan.format).await.context("packaging failed")?;
        spinner.finish();

        let archive = ProducedFile::stat(&archive_path).with_context(|| format!("cannot read archive {}", archive_path.display()))?;
        show_done(&format!("Archive created: {} ({})", archive.path.display(), format_bytes(archive.size)));

        show_step("Creating PAR2 redundancy data", &format!("({}%) …", plan.redundancy_percent));
        let spinner = Spinner::new("Running par2");
        let parity_paths = parity::create(&SystemRunner, &archive_path, plan.redundancy_percent, plan.par2_volumes).await.context("PAR2 creation failed")?;
        spinner.finish();

        let parity_files = parity_paths.iter().map(|path| ProducedFile::stat(path).with_context(|| format!("cannot read {}", path.display()))).collect::<Result<Vec<_>>>()?;
        let parity_size: u64 = parity_files.iter().map(|f| f.size).sum();
        show_done(&format!("PAR2 files created: {} file(s) ({})", parity_files.len(), format_bytes(parity_size)));

        show_summary(&archive, &parity_files, plan.redundancy_percent);
        Ok(())
    }

    fn config(command: ConfigCommand) -> Result<()> {
        let settings = Settings::open()?;
        debug!(path = %settings.path().display(), "using settings file");

        match command {
            ConfigCommand::Set { key, value } => {
                let stored = settings.set(&key, &value).with_context(|| format!("cannot store {key}"))?;
                show_done(&format!("Set {key} = {}", render_value(&stored.into())));
            }
            ConfigCommand::Get { key } => {
                let Some(value) = settings.get(&key) else {
                    bail!("Key not found: {key}");
                };
                println!("{key} = {}", render_value(&value));
            }
            ConfigCommand::List => show_settings(&settings::flatten(&settings.list_all())),
        }

        Ok(())
    }
}
