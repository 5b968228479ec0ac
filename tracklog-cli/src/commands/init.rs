use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracklog_core::{Config, Repository};

pub fn run(path: PathBuf, config: Config) -> Result<()> {
    let repo = Repository::init(&path, config)?;
    let config = repo.config();

    println!("{}", "✓ Repository initialized".green().bold());
    println!("  {}: {}", "Path".bold(), repo.path().display());
    println!("  {}: {}", "Commit log".bold(), repo.log().path().display());
    println!("  {}: {}", "Hash".bold(), config.hash.as_str());
    println!("  {}: {}", "Checksum".bold(), config.checksum.as_str());
    println!("  {}: {}", "Revert target".bold(), config.revert_target.as_str());

    Ok(())
}
