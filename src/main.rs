use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use git_versioner::cli::{self, RunArgs, RunReport, ScopeReport};
use git_versioner::config::DEFAULT_CONFIG_FILE;
use git_versioner::git::AncestryStrategy;
use git_versioner::resolver::{TagOutcome, DEFAULT_REMOTE};
use git_versioner::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-versioner",
    version,
    about = "Compute semantic versions per scope from git tags and tag the current commit"
)]
struct Args {
    #[arg(short, long, help = "Only compute the version of this scope")]
    environment: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path to the git repository")]
    path: PathBuf,

    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file, relative to --path")]
    config: PathBuf,

    #[arg(short, long, help = "Build number appended as build metadata")]
    build_number: Option<u64>,

    #[arg(long, help = "Create tags locally without pushing them")]
    no_push: bool,

    #[arg(long, default_value = DEFAULT_REMOTE, help = "Remote to push tags to")]
    remote: String,

    #[arg(long, help = "Preview what would happen without creating tags")]
    dry_run: bool,

    #[arg(long, value_enum, default_value_t = AncestryStrategy::FirstParent, help = "Commits counted for prerelease numbers")]
    ancestry: AncestryStrategy,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

impl From<Args> for RunArgs {
    fn from(args: Args) -> Self {
        RunArgs {
            path: args.path,
            config: args.config,
            environment: args.environment,
            build_number: args.build_number,
            push: !args.no_push,
            remote: args.remote,
            ancestry: args.ancestry,
            dry_run: args.dry_run,
        }
    }
}

/// Set up logging on stderr so stdout only carries versions.
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_new("git_versioner=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if verbose {
        tracing::debug!("Debug logging enabled");
    }
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let run_args = RunArgs::from(args);
    let report = match cli::run(&run_args) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    print_report(&report, &run_args);

    if report.has_failures() {
        std::process::exit(1);
    }
}

fn print_report(report: &RunReport, args: &RunArgs) {
    for scope in &report.scopes {
        print_scope(scope, report.single_scope, args);
    }
}

fn print_scope(report: &ScopeReport, single_scope: bool, args: &RunArgs) {
    let resolution = match &report.resolution {
        Ok(resolution) => resolution,
        Err(e) => {
            ui::display_error(&format!("{}: {}", report.scope, e));
            return;
        }
    };

    for warning in &resolution.warnings {
        ui::display_boundary_warning(warning);
    }

    let label = (!single_scope).then_some(report.scope.as_str());
    ui::display_version(label, &resolution.version);

    match &report.tagging {
        Some(Ok(outcome)) => {
            ui::display_tag_outcome(outcome);
            if let TagOutcome::Created { tag, pushed: false } = outcome {
                ui::display_manual_push_instruction(tag, &args.remote);
            }
        }
        Some(Err(e)) => {
            ui::display_error(&format!("{}: {}", report.scope, e));
        }
        None => {}
    }
}
