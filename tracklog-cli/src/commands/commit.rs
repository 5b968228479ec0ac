use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path, file: &str, content: Option<String>) -> Result<()> {
    let repo = super::open_repo(repo_path)?;

    if let Some(content) = content {
        repo.write_file(file, content.as_bytes())?;
    }

    println!("{}", "Committing changes...".bold());
    let record = repo.commit(file)?;

    println!("{}", "✓ Changes committed successfully!".green().bold());
    println!("  {}: {}", "File".bold(), record.file_name);
    println!("  {}: {}", "Hash".bold(), record.content_hash);
    println!(
        "  {}: {}",
        "Date".bold(),
        record.timestamp.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
