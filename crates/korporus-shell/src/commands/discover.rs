//! `korporus discover`.

use colored::Colorize;
use korporus_shell::Host;

/// Discover and list the valid apps. Invalid or unreachable manifests are
/// logged and skipped.
pub(crate) async fn run(host: &Host) {
    let requested = host.config().manifests.urls.len();
    let found = host.discover().await;
    println!(
        "{}",
        format!("Discovered {found} of {requested} app manifest(s)")
            .cyan()
            .bold()
    );

    for app in host.registry().apps().iter() {
        println!(
            "  {} {} v{}  {}",
            app.id.bold(),
            app.name,
            app.version,
            app.remote_entry.dimmed()
        );
        let slots: Vec<String> = app
            .slots
            .iter()
            .map(|(slot, tag)| format!("{slot}={tag}"))
            .collect();
        println!("    slots: {}", slots.join(", "));
    }
}
