use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use multi_release::cli::{load_plan_workspace, plan_workspace};
use multi_release::config::{self, Config};
use multi_release::domain::{resolve_next_version, BumpStrategy, RangePrefix};
use multi_release::ui;

#[derive(Parser)]
#[command(
    name = "multi-release",
    version,
    about = "Plan coordinated releases of the packages of a monorepo"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute next versions and dependency range updates from a plan file
    Plan {
        #[arg(help = "JSON plan file")]
        plan: PathBuf,

        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<String>,

        #[arg(short, long, help = "Branch to release from")]
        branch: Option<String>,

        #[arg(long, help = "Print the plan as JSON")]
        json: bool,

        #[arg(long, help = "Write updated dependency ranges back to manifests")]
        write: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },

    /// Print the range a dependent declares once a dependency is released
    Range {
        #[arg(help = "Currently declared range, e.g. ^1.0.0")]
        current: String,

        #[arg(help = "Next version of the dependency")]
        next: String,

        #[arg(
            short,
            long,
            default_value = "override",
            value_parser = ["override", "satisfy", "inherit", "ignore"]
        )]
        strategy: String,

        #[arg(short, long, help = "Operator for overridden ranges: ^ or ~")]
        prefix: Option<String>,
    },

    /// Show configured release branches and exit
    Branches {
        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Plan {
            plan,
            config,
            branch,
            json,
            write,
            yes,
        } => run_plan(plan, config.as_deref(), branch, json, write, yes),
        Command::Range {
            current,
            next,
            strategy,
            prefix,
        } => {
            let resolved = resolve_next_version(
                &current,
                &next,
                BumpStrategy::from(strategy),
                RangePrefix::from(prefix.unwrap_or_default()),
            );
            println!("{}", resolved);
            Ok(())
        }
        Command::Branches { config } => {
            let config = load_config_or_exit(config.as_deref());
            ui::display_available_branches(&config.branches);
            Ok(())
        }
    }
}

/// Console logging to stderr, controlled by RUST_LOG (default: warn)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn load_config_or_exit(config_path: Option<&str>) -> Config {
    match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    }
}

fn run_plan(
    plan_path: PathBuf,
    config_path: Option<&str>,
    branch: Option<String>,
    json: bool,
    write: bool,
    yes: bool,
) -> Result<()> {
    let config = load_config_or_exit(config_path);

    let workspace = match load_plan_workspace(&plan_path) {
        Ok(workspace) => workspace,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Branch: argument, then plan file, then ask
    let branch = match branch.or_else(|| workspace.branch.clone()) {
        Some(branch) => branch,
        None => {
            let configured: Vec<String> =
                config.branches.iter().map(|b| b.name.clone()).collect();
            ui::select_branch(&configured)?
        }
    };

    let plan = match plan_workspace(workspace, &branch, &config) {
        Ok(plan) => plan,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    for warning in &plan.warnings {
        ui::display_plan_warning(warning);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        ui::display_plan(&plan);
    }

    if !write {
        return Ok(());
    }

    let pending = plan.manifests_to_write().count();
    if pending == 0 {
        ui::display_status("No manifest needs updating");
        return Ok(());
    }

    if !yes && !ui::confirm_action(&format!("Write {} updated manifest(s)?", pending))? {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    for path in plan.write_manifests()? {
        ui::display_success(&format!("Updated {}", path.display()));
    }

    Ok(())
}
