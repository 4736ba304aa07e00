//! `korporus ports`.

use colored::Colorize;
use korporus_config::{Config, SHELL_APP_ID};

pub(crate) fn run(config: &Config) {
    println!("{}", "Port assignments:".cyan());
    for (app_id, entry) in config.ports.iter() {
        let role = if app_id == SHELL_APP_ID {
            "host".dimmed()
        } else {
            "remote".normal()
        };
        println!(
            "  {:<16} dev {:<6} preview {:<6} {role}",
            app_id.bold(),
            entry.dev,
            entry.preview
        );
    }
}
