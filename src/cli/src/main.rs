//! CLI for stencil.
//!
//! Renders Procfile manifests for generated projects, fetches templates from
//! version control and cuts releases of a template repository.

use chrono::{Days, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stencil::context::parse_extra_context;
use stencil::templates::PROCFILE_TEMPLATE;
use stencil::{
    render_manifest, replay, resolve_context, vcs, write_manifest, ChangelogError, ContextSources,
    GenerateError, ReleaseConfig, ReleaseOutcome, Releaser, UserConfig,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// stencil - Render project manifests, fetch templates and cut releases.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the Procfile of a generated project.
    Manifest(ManifestArgs),
    /// Clone a template repository.
    Clone(CloneArgs),
    /// Cut a release from the pull requests merged on a day.
    Changelog(ChangelogArgs),
}

#[derive(Args, Debug)]
struct ManifestArgs {
    /// JSON file declaring the template variables.
    #[arg(long)]
    context: Option<PathBuf>,

    /// User config file (falls back to STENCIL_CONFIG, then ~/.stencilrc).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra context values, as KEY=VALUE.
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    extra: Vec<String>,

    /// Reuse the context recorded by the previous run.
    #[arg(long)]
    replay: bool,

    /// Name the context is recorded under for replay.
    #[arg(long, default_value = "default")]
    template_name: String,

    /// Write a Procfile into this directory instead of printing it.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Overwrite an existing Procfile.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct CloneArgs {
    /// Repository URL, optionally prefixed with git+ or hg+.
    url: String,

    /// Branch, tag or commit to check out.
    #[arg(long)]
    checkout: Option<String>,

    /// Directory to clone into.
    #[arg(long, default_value = ".")]
    clone_to_dir: PathBuf,

    /// Replace an existing clone.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct ChangelogArgs {
    /// Repository checkout root.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Merge date to release, YYYY-MM-DD (defaults to yesterday, UTC).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Alternative release notes template.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Print the release notes without writing or publishing anything.
    #[arg(long)]
    dry_run: bool,
}

/// Failure of a subcommand.
enum Failure {
    Generate(GenerateError),
    Changelog(ChangelogError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Manifest(args) => run_manifest(args).map_err(Failure::Generate),
        Command::Clone(args) => run_clone(args).await.map_err(Failure::Generate),
        Command::Changelog(args) => run_changelog(args).await.map_err(Failure::Changelog),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(Failure::Generate(e)) => {
            error!(kind = %e.kind(), error = %e, "Generation failed");
            ExitCode::from(1)
        }
        Err(Failure::Changelog(e)) => {
            error!(error = %e, "Release failed");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output) on stderr, so rendered
///   output on stdout stays clean
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Resolves the context and renders the manifest.
fn run_manifest(args: ManifestArgs) -> Result<(), GenerateError> {
    let config = UserConfig::load(args.config.as_deref())?;
    let renderer = config.renderer()?;
    let extra_context = parse_extra_context(&args.extra)?;

    let context = resolve_context(
        ContextSources {
            context_file: args.context.as_deref(),
            extra_context: &extra_context,
            replay: args.replay,
            template_name: &args.template_name,
        },
        &config,
    )?;
    if !args.replay {
        replay::dump(config.replay_dir(), &args.template_name, &context)?;
    }

    let template = match config.manifest_template() {
        Some(path) => std::fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => PROCFILE_TEMPLATE.to_string(),
    };
    let rendered = render_manifest(&renderer, &template, &context)?;

    match args.output_dir {
        Some(dir) => {
            let path = write_manifest(&dir, &rendered, args.overwrite)?;
            info!(path = %path.display(), "Manifest written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Clones a template repository.
async fn run_clone(args: CloneArgs) -> Result<(), GenerateError> {
    let path = vcs::clone(
        &args.url,
        args.checkout.as_deref(),
        &args.clone_to_dir,
        args.overwrite,
    )
    .await?;
    println!("{}", path.display());
    Ok(())
}

/// Cuts a release.
async fn run_changelog(args: ChangelogArgs) -> Result<(), ChangelogError> {
    let merged_date = match args.date {
        Some(date) => date,
        None => yesterday(),
    };

    let mut config = ReleaseConfig::from_env(args.root)?.with_dry_run(args.dry_run);
    if let Some(template) = args.template {
        config = config.with_template_path(template);
    }

    let releaser = Releaser::new(config)?;
    match releaser.run(merged_date).await? {
        ReleaseOutcome::NothingMerged => println!("Nothing was merged on {merged_date}."),
        ReleaseOutcome::NothingNotable => {
            println!("Pull requests merged on {merged_date} aren't worth a changelog mention.")
        }
        ReleaseOutcome::Released {
            release,
            summary,
            published,
        } => {
            println!("## {release}\n{summary}");
            if !published {
                println!("(dry run: nothing written or published)");
            }
        }
    }
    Ok(())
}

fn yesterday() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
