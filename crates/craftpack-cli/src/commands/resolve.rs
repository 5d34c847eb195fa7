//! Handler for `craftpack resolve`.

use miette::Result;

use craftpack_ops::ops_resolve::{self, ResolveOptions};
use craftpack_util::errors::CraftpackError;

pub async fn exec(opts: &ResolveOptions) -> Result<()> {
    let project_root = std::env::current_dir().map_err(CraftpackError::Io)?;
    ops_resolve::resolve(&project_root, opts).await
}
