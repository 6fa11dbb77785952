//! Inspect command handler.

use color_eyre::Result;

use crate::config::load_settings;
use crate::defaults::SERVICE_KEYS;
use crate::{Builder, Definitions};

use super::App;

impl App {
    /// Build the container from the resolved settings and list its services.
    pub fn run_inspect(&self, resolve: bool) -> Result<()> {
        let settings = load_settings(self.config.as_deref())?;
        tracing::info!("Loaded {} top-level settings keys", settings.len());

        let container = Builder::build(settings, Definitions::new())?;
        let mut failures = 0;

        println!("{:<20} {:<10} STATUS", "SERVICE", "DEFINED");
        for key in SERVICE_KEYS {
            let defined = if container.has(key) { "yes" } else { "no" };
            let status = if resolve {
                match container.get_service(key) {
                    Ok(_) => "resolved".to_string(),
                    Err(err) => {
                        failures += 1;
                        format!("error: {err}")
                    }
                }
            } else if container.is_resolved(key) {
                "resolved".to_string()
            } else {
                "lazy".to_string()
            };
            println!("{key:<20} {defined:<10} {status}");
        }

        let extra: Vec<String> = container
            .names()
            .into_iter()
            .filter(|name| !SERVICE_KEYS.contains(&name.as_str()))
            .collect();
        if !extra.is_empty() {
            println!();
            println!("Additional definitions: {}", extra.join(", "));
        }

        if failures > 0 {
            return Err(color_eyre::eyre::eyre!(
                "{} default service(s) failed to resolve",
                failures
            ));
        }
        Ok(())
    }
}
