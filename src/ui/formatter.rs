//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! `format_*` functions build the text and are tested; `display_*` print it.

use console::style;

use crate::config::BranchConfig;
use crate::plan::{PlannedRelease, ReleasePlan};
use crate::resolver::RangeChange;
use crate::warning::PlanWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One line per package: name, type and version change.
///
/// Packages that do not release show their current version, or `-` when
/// they were never released.
pub fn format_release_row(release: &PlannedRelease, name_width: usize) -> String {
    let from = release.last_version.as_deref().unwrap_or("-");
    let change = match &release.next_version {
        Some(next) => format!("{} -> {}", from, next),
        None => from.to_string(),
    };
    format!(
        "{:<width$}  {:<5}  {}",
        release.name,
        release.next_type.to_string(),
        change,
        width = name_width
    )
}

/// A rewritten dependency range, e.g. `dependencies.core: ^1.0.0 -> 2.0.0`
pub fn format_range_change(change: &RangeChange) -> String {
    format!(
        "{}.{}: {} -> {}",
        change.scope, change.name, change.from, change.to
    )
}

/// A configured branch with its pre-release channel, if any
pub fn format_branch(branch: &BranchConfig) -> String {
    match branch.channel() {
        Some(channel) => format!("{} (prerelease: {})", branch.name, channel),
        None => branch.name.clone(),
    }
}

/// Display the release plan as a table.
///
/// Releasing packages are highlighted; rewritten dependency ranges are
/// listed under their package.
pub fn display_plan(plan: &ReleasePlan) {
    let header = match &plan.channel {
        Some(channel) => format!("Release plan for '{}' ({})", plan.branch, channel),
        None => format!("Release plan for '{}'", plan.branch),
    };
    println!("\n{}", style(header).bold());

    let name_width = plan
        .releases
        .iter()
        .map(|release| release.name.len())
        .max()
        .unwrap_or(0);

    for release in &plan.releases {
        let row = format_release_row(release, name_width);
        if release.is_release() {
            println!("  {}", style(row).green());
        } else {
            println!("  {}", style(row).dim());
        }
        for change in &release.dependency_updates {
            println!("      {}", style(format_range_change(change)).cyan());
        }
    }

    let releasing = plan.releasing().count();
    println!(
        "\n{} of {} packages will be released",
        releasing,
        plan.releases.len()
    );
}

/// Display a plan warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The plan warning to display
pub fn display_plan_warning(warning: &PlanWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the branches configured for releases.
///
/// # Arguments
/// * `branches` - Configured branches
pub fn display_available_branches(branches: &[BranchConfig]) {
    println!("{}", style("Configured branches:").bold());
    for branch in branches {
        println!("  - {}", format_branch(branch));
    }
}
