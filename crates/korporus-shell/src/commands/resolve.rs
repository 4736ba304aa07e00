//! `korporus resolve`.

use anyhow::{Context, Result};
use korporus_config::Config;
use korporus_federation::resolve_entry;
use url::Url;

pub(crate) fn run(config: &Config, entry: &str) -> Result<()> {
    let origin = Url::parse(&config.shell.base_url)
        .with_context(|| format!("invalid base URL '{}'", config.shell.base_url))?;
    println!("{}", resolve_entry(&origin, entry)?);
    Ok(())
}
