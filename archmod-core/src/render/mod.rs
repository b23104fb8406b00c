//! Text renderings of coupling graphs and clustering results.
//!
//! Renderers build a `String`; writing it to a file or the console is left
//! to the caller.

pub mod dot;
pub mod text;

use std::path::Path;

use crate::error::RenderError;

/// Write rendered output to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, content: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
