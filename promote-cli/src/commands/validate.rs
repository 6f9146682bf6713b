//! `promote validate`: check a step config without rendering.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use promote_step::{RemoteRenderStep, StepRunner};

/// Arguments for `promote validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Step config file (YAML or JSON).
    #[arg(long, short = 'c')]
    pub config: PathBuf,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let config = super::load_config(&self.config)?;
        let step = RemoteRenderStep::new();
        step.validate(&config)
            .with_context(|| format!("'{}' is not a valid {} config", self.config.display(), step.name()))?;
        println!("{} '{}' is valid", "✓".green(), self.config.display());
        Ok(())
    }
}
