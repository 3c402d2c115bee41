use std::path::Path;

use crate::foundation::error::MuxResult;

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MuxResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
