//! `promote render`: run the remote render step against a working directory.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use promote_step::{RemoteRenderStep, StepContext, StepRunner};

/// Arguments for `promote render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Step config file (YAML or JSON).
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Working directory manifests are written under (defaults to the current directory).
    #[arg(long, short = 'w')]
    pub work_dir: Option<PathBuf>,

    /// Give up once this much time has passed, e.g. `2m` or `90s`.
    #[arg(long)]
    pub deadline: Option<humantime::Duration>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let config = super::load_config(&self.config)?;
        let work_dir = match self.work_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let mut ctx = StepContext::new(work_dir);
        if let Some(deadline) = self.deadline {
            let at = Instant::now()
                .checked_add(*deadline)
                .with_context(|| format!("deadline '{deadline}' is too far in the future"))?;
            ctx = ctx.with_deadline(at);
        }

        let step = RemoteRenderStep::new();
        let outcome = step.run(&ctx, &config);
        if outcome.is_success() {
            println!("{} {} succeeded", "✓".green(), step.name());
            return Ok(());
        }

        let message = outcome.message.unwrap_or_else(|| "unknown error".to_owned());
        eprintln!("{} {} errored", "✗".red(), step.name());
        bail!(message)
    }
}
