//! `korporus mount`.

use anyhow::{Result, bail};
use colored::Colorize;
use korporus_shell::{Host, LoadState};

/// Discover, then load and mount `app_id` and print the rendered view.
pub(crate) async fn run(host: &Host, app_id: &str, settings: bool) -> Result<()> {
    host.discover().await;
    let mut session = host.mount(app_id).await?;

    if let LoadState::Error(message) = session.state() {
        eprintln!("{} {}", "Failed to load".red().bold(), session.manifest().name);
        bail!("{message}");
    }

    if settings {
        session.toggle_settings();
    }
    println!(
        "{} {} from {}",
        "Mounted".green().bold(),
        session.manifest().name,
        session.entry()
    );
    println!("{}", session.render());
    Ok(())
}
