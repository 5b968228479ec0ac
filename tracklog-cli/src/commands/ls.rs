use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path) -> Result<()> {
    let repo = super::open_repo(repo_path)?;
    let files = repo.list_files()?;

    if files.is_empty() {
        println!("{}", "No tracked files".yellow());
        return Ok(());
    }

    println!("{}", "Tracked files in the repository:".bold());
    for file in &files {
        println!("  • {}", file);
    }

    Ok(())
}
