//! Settings command handler.

use color_eyre::Result;

use crate::config::load_settings;
use crate::defaults::SETTINGS;
use crate::{Builder, Definitions, Settings};

use super::App;

impl App {
    /// Print the framework settings the container would serve.
    pub fn run_settings(&self) -> Result<()> {
        let settings = load_settings(self.config.as_deref())?;
        let container = Builder::build(settings, Definitions::new())?;
        let merged = container.get::<Settings>(SETTINGS)?;

        println!("{}", serde_json::to_string_pretty(&*merged)?);
        Ok(())
    }
}
