//! Main workflow orchestration logic
//!
//! Runs the plan workflow on a plan file. Keeps CLI argument parsing and
//! prompting in main.rs, apart from the planning itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::domain::BranchContext;
use crate::plan::{PlanFile, PlanWorkspace, Planner, ReleasePlan};

/// Arguments for the plan workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanWorkflowArgs {
    /// Path to the JSON plan file
    pub plan_path: PathBuf,

    /// Branch to release from, overriding the plan file's
    pub branch: Option<String>,
}

/// Read a plan file and the manifests it points to.
///
/// Manifest paths are relative to the directory holding the plan file.
pub fn load_plan_workspace(plan_path: &Path) -> Result<PlanWorkspace> {
    let plan = PlanFile::read(plan_path)
        .with_context(|| format!("Failed to read plan file '{}'", plan_path.display()))?;
    let base_dir = plan_path.parent().unwrap_or_else(|| Path::new("."));
    debug!(base_dir = %base_dir.display(), packages = plan.packages.len(), "loaded plan file");
    Ok(plan.into_workspace(base_dir)?)
}

/// Plan the release of a loaded workspace from `branch`.
///
/// The branch must be one of the configured release branches; its
/// pre-release channel comes from the configuration.
pub fn plan_workspace(
    workspace: PlanWorkspace,
    branch: &str,
    config: &Config,
) -> Result<ReleasePlan> {
    let branch = BranchContext::from_config(branch, &config.branches)?;
    let source = workspace.source;
    let planner = Planner::new(config, branch, &source, &source);
    Ok(planner.plan(workspace.packages)?)
}

/// Main plan workflow
///
/// Orchestrates the planning process:
/// 1. Load the plan file and its manifests
/// 2. Pick the branch (argument, then plan file)
/// 3. Resolve last releases, release types and next versions
///
/// # Arguments
///
/// * `args` - Workflow arguments (plan path, branch)
/// * `config` - Release configuration
///
/// # Returns
///
/// The release plan, or an error if the plan file is invalid or no
/// configured branch is given
pub fn run_plan_workflow(args: PlanWorkflowArgs, config: &Config) -> Result<ReleasePlan> {
    let workspace = load_plan_workspace(&args.plan_path)?;
    let branch = args
        .branch
        .or_else(|| workspace.branch.clone())
        .ok_or_else(|| anyhow::anyhow!("No branch given on the command line or in the plan file"))?;
    plan_workspace(workspace, &branch, config)
}
