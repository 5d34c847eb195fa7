//! Handler for `craftpack check`.

use std::path::PathBuf;

use miette::Result;

use craftpack_ops::ops_check::{self, CheckOptions};
use craftpack_util::errors::CraftpackError;

pub fn exec(manifest: Option<PathBuf>, index: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(CraftpackError::Io)?;
    ops_check::check(&cwd, &CheckOptions { manifest, index })
}
