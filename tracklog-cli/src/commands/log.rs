use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path, file: Option<&str>, limit: Option<usize>, json: bool) -> Result<()> {
    let repo = super::open_repo(repo_path)?;
    let records = repo.history(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No commits yet".yellow());
        return Ok(());
    }

    println!("{}", "Commit History".bold().cyan());
    println!();

    let to_show = limit.unwrap_or(records.len()).min(records.len());

    for record in records.iter().rev().take(to_show) {
        println!(
            "{} {}",
            "commit".yellow().bold(),
            record.content_hash.to_string().yellow()
        );
        println!("{}: {}", "File".bold(), record.file_name);
        println!(
            "{}: {}",
            "Date".bold(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    if records.len() > to_show {
        println!(
            "{}",
            format!("... and {} more commits", records.len() - to_show).dimmed()
        );
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
