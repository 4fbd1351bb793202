use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "rplot", about = "Plot a curve through an R session", version)]
#[command(group(ArgGroup::new("display_mode").args(["display", "display_only"]).multiple(false)))]
pub struct Cli {
    /// Curve to plot: `square` (x^2), `cubic` (x^3-x^2), or any R expression in `x`.
    #[arg(long)]
    pub curve: Option<String>,

    /// After writing and removing the image, open an interactive window and hold it open.
    #[arg(long)]
    pub display: bool,

    /// Only open the interactive window; no image file is written.
    #[arg(long = "display-only")]
    pub display_only: bool,

    /// Arguments forwarded verbatim to the R session (pass them after `--`).
    #[arg(value_name = "R_ARGS", last = true)]
    pub r_args: Vec<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
