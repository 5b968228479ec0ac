use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path, files: &[String]) -> Result<()> {
    let repo = super::open_repo(repo_path)?;

    for file in files {
        repo.add_file(file)?;
        println!("  {} {}", "+".green(), file);
    }

    println!();
    println!(
        "{}",
        format!("✓ Added {} file(s)", files.len()).green().bold()
    );
    println!("Run {} to record them", "tracklog commit <file>".cyan());

    Ok(())
}
