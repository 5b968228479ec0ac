use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::path::PathBuf;
use std::thread;
use tracklog_core::models::validate_file_name;
use tracklog_core::{CommitRecord, Config, Repository};

/// Runs init → add → list → commit → log → revert → check against a new
/// repository, prompting for each name. Any failing step ends the session
/// with an error.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme::default();

    let repo_name: String = Input::with_theme(&theme)
        .with_prompt("Enter the name of the repository")
        .interact_text()?;
    let repo = Repository::init(PathBuf::from(&repo_name), Config::default())
        .context("Repository initialization failed")?;
    println!(
        "{} {}",
        "✓ Repository initialized in:".green(),
        repo.path().display()
    );
    println!();

    let file = prompt_file_name(&theme, "Enter the name of the file to add")?;
    repo.add_file(&file).context("File addition failed")?;
    println!("{} {}", "✓ File added to repository:".green(), file);
    println!();

    println!("{}", "Tracked files in the repository:".bold());
    for name in repo.list_files()? {
        println!("  • {}", name);
    }
    println!();

    let file = prompt_file_name(&theme, "Enter the name of the file to commit changes")?;
    let first = commit_update(&repo, &file)?;

    println!("{}", "Commit log:".bold());
    for record in repo.history(None)? {
        println!("  {}", record.to_line().dimmed());
    }
    println!();

    let again = Confirm::with_theme(&theme)
        .with_prompt(format!("Record a second commit of {} before reverting?", file))
        .default(true)
        .interact()?;
    if again {
        // Same content in the same second would repeat the first line.
        let wait = wait_for_next_second(first.timestamp, Utc::now());
        thread::sleep(wait.to_std().unwrap_or_default());
        commit_update(&repo, &file)?;
    }

    let file = prompt_file_name(&theme, "Enter the name of the file to revert")?;
    repo.revert(&file).context("Unable to revert file")?;
    println!("{}", "✓ File reverted successfully".green());
    println!();

    let report = repo
        .check_integrity()
        .context("Commit log integrity check failed")?;
    println!(
        "{} ({} records, checksum {})",
        "✓ Commit log integrity check passed".green().bold(),
        report.records,
        report.checksum
    );

    Ok(())
}

fn prompt_file_name(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let name = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|name: &String| -> std::result::Result<(), String> {
            validate_file_name(name).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(name)
}

/// Replaces the file with its "updated" content and commits it.
fn commit_update(repo: &Repository, file: &str) -> Result<CommitRecord> {
    repo.write_file(file, format!("Updated content for {}\n", file).as_bytes())
        .context("Unable to commit changes")?;
    let record = repo.commit(file).context("Unable to commit changes")?;
    println!(
        "{} {} ({})",
        "✓ Changes committed for file:".green(),
        file,
        record.content_hash
    );
    println!();
    Ok(record)
}

/// Time left until the second after `timestamp` begins.
fn wait_for_next_second(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let next = timestamp + Duration::seconds(1);
    if now >= next {
        Duration::zero()
    } else {
        next - now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wait_within_same_second() {
        let committed = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let now = committed + Duration::milliseconds(300);

        assert_eq!(
            wait_for_next_second(committed, now),
            Duration::milliseconds(700)
        );
    }

    #[test]
    fn test_no_wait_once_second_has_passed() {
        let committed = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        for now in [
            committed + Duration::seconds(1),
            committed + Duration::milliseconds(2500),
        ] {
            assert_eq!(wait_for_next_second(committed, now), Duration::zero());
        }
    }
}
