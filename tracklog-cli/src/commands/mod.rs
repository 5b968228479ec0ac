pub mod add;
pub mod check;
pub mod commit;
pub mod init;
pub mod log;
pub mod ls;
pub mod revert;
pub mod walkthrough;

use anyhow::{Context, Result};
use std::path::Path;
use tracklog_core::Repository;

pub fn open_repo(path: &Path) -> Result<Repository> {
    tracing::debug!("Opening repository at {:?}", path);
    Repository::open(path).with_context(|| {
        format!(
            "No tracklog repository at {}. Run 'tracklog init' first.",
            path.display()
        )
    })
}
