use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(repo_path: &Path) -> Result<()> {
    let repo = super::open_repo(repo_path)?;

    match repo.check_integrity() {
        Ok(report) => {
            println!("{}", "✓ Integrity check passed".green().bold());
            println!("  {}: {}", "Records".bold(), report.records);
            println!("  {}: {}", "Checksum".bold(), report.checksum);
            println!("  {}: {}", "Mode".bold(), repo.config().checksum.as_str());
            Ok(())
        }
        Err(e) if e.is_integrity_violation() => {
            println!("{}", "✗ Integrity check failed".red().bold());
            println!("  {}", e.to_string().red());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
