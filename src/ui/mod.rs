//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;
use console::style;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_available_branches, display_error, display_plan, display_plan_warning,
    display_status, display_success,
};

/// Prompts user to select a branch from available options.
///
/// If only one branch is available, returns it directly without prompting.
/// Otherwise displays numbered list and accepts 1-based index selection.
/// Default selection is the first branch (index 1) if user presses Enter.
///
/// # Arguments
/// * `available_branches` - List of branch names to choose from
///
/// # Returns
/// * `Ok(String)` - The selected branch name
/// * `Err` - If there is no branch or the selection is invalid
pub fn select_branch(available_branches: &[String]) -> Result<String> {
    match available_branches {
        [] => return Err(anyhow::anyhow!("No release branches configured")),
        [only] => return Ok(only.clone()),
        _ => {}
    }

    println!("\n{}", style("Release branches:").bold());
    for (i, branch) in available_branches.iter().enumerate() {
        println!("  {}. {}", i + 1, branch);
    }

    print!(
        "\nSelect a branch (1-{}) [default: 1]: ",
        available_branches.len()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    parse_selection(input.trim(), available_branches.len())
        .map(|index| available_branches[index].clone())
        .ok_or_else(|| anyhow::anyhow!("Invalid selection"))
}

/// Turn a 1-based selection into an index, empty input picking the first
fn parse_selection(selection: &str, count: usize) -> Option<usize> {
    let index = if selection.is_empty() {
        1
    } else {
        selection.parse::<usize>().ok()?
    };
    (1..=count).contains(&index).then(|| index - 1)
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Displays the given prompt and accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
///
/// # Arguments
/// * `prompt` - The prompt message to display (without the "(y/N): " suffix)
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
