//! Plot runner: one session, one raster plot, optional on-screen display.

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::engine::ScriptEngine;
use crate::script::{self, Curve, DISPLAY_SECONDS};

mod temp_plot;

pub use temp_plot::TempPlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write the image, report its path, remove it.
    Raster,
    /// Raster, then hold an interactive window open.
    RasterThenDisplay,
    /// Only the interactive window.
    DisplayOnly,
}

impl Mode {
    pub fn from_flags(display: bool, display_only: bool) -> Self {
        match (display, display_only) {
            (_, true) => Mode::DisplayOnly,
            (true, false) => Mode::RasterThenDisplay,
            (false, false) => Mode::Raster,
        }
    }

    fn writes_file(self) -> bool {
        matches!(self, Mode::Raster | Mode::RasterThenDisplay)
    }

    fn displays(self) -> bool {
        matches!(self, Mode::RasterThenDisplay | Mode::DisplayOnly)
    }
}

pub struct PlotRunner<E> {
    engine: E,
    curve: Curve,
    display_device: String,
}

impl<E: ScriptEngine> PlotRunner<E> {
    pub fn new(engine: E, curve: Curve, display_device: impl Into<String>) -> Self {
        Self {
            engine,
            curve,
            display_device: display_device.into(),
        }
    }

    pub async fn run(&self, args: &[String], mode: Mode, out: &mut impl Write) -> Result<()> {
        let mut session = self
            .engine
            .initialize(args)
            .await
            .context("failed to initialize R session")?;

        if mode.writes_file() {
            self.plot_to_file(&mut session, out).await?;
        }
        if mode.displays() {
            self.plot_to_screen(&mut session).await?;
        }

        self.engine
            .shutdown(session)
            .await
            .context("failed to close R session")
    }

    /// Render to a fresh temp file, print its path, then delete it.
    pub async fn plot_to_file(&self, session: &mut E::Session, out: &mut impl Write) -> Result<PathBuf> {
        let value = self
            .engine
            .evaluate(session, &script::raster_script(&self.curve))
            .await
            .context("raster plot failed")?;
        let plot = TempPlot::new(value);
        let path = plot.path().to_path_buf();

        writeln!(out, "Could use plot in {}", path.display())?;
        out.flush()?;

        plot.remove()
            .with_context(|| format!("failed to remove {}", path.display()))?;
        info!(path = %path.display(), "removed temporary plot");
        Ok(path)
    }

    /// Draw on an interactive device and block while it is shown.
    pub async fn plot_to_screen(&self, session: &mut E::Session) -> Result<()> {
        let script = script::display_script(&self.curve, &self.display_device, DISPLAY_SECONDS);
        info!(device = %self.display_device, seconds = DISPLAY_SECONDS, "showing plot");
        self.engine
            .evaluate_quiet(session, &script)
            .await
            .context("interactive plot failed")
    }
}
