use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracklog_core::diff::{DiffLineType, FileDiff};

pub fn run(repo_path: &Path, file: &str, execute: bool) -> Result<()> {
    let repo = super::open_repo(repo_path)?;
    let plan = repo.plan_revert(file)?;

    println!("{}", "Revert Preview".bold().cyan());
    println!("  {}: {}", "File".bold(), plan.file_name);
    println!("  {}: {}", "Latest Hash".bold(), plan.latest.content_hash);
    println!("  {}: {}", "Expected Hash".bold(), plan.prior.content_hash);
    println!(
        "  {}: {}",
        "Recorded".bold(),
        plan.prior.timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    let current = repo.read_file(file)?;
    let baseline = repo.config().baseline_content(file);
    print_diff(&FileDiff::between(file, &current, &baseline));

    if !execute {
        println!("{}", "This is a preview only.".yellow());
        println!(
            "Run with {} to actually perform the revert",
            "--execute".cyan()
        );
        return Ok(());
    }

    println!("{}", "Performing revert...".bold());
    repo.revert(file)?;
    println!(
        "{}",
        "✓ File reverted to the previous version".green().bold()
    );

    Ok(())
}

fn print_diff(diff: &FileDiff) {
    println!("{}", "━".repeat(80).bright_black());
    println!("{}", diff.file_name.white().bold());
    println!();

    if diff.binary {
        println!("  {}", "[Binary file or unable to generate diff]".dimmed());
    } else if diff.is_unchanged() {
        println!("  {}", "[Already at baseline content]".dimmed());
    } else {
        for line in &diff.diff_lines {
            let (prefix, color): (&str, fn(&str) -> colored::ColoredString) = match line.line_type
            {
                DiffLineType::Addition => ("+", |s| s.green()),
                DiffLineType::Deletion => ("-", |s| s.red()),
                DiffLineType::Context => (" ", |s| s.normal()),
            };
            print!("{}", color(&format!("{}{}", prefix, line.content)));
        }
    }
    println!();
}
