//! Plotting scripts submitted to the R session.

use std::fmt::Write as _;

use anyhow::{bail, Result};

/// Lower domain bound passed to `curve()`.
pub const DOMAIN_FROM: i32 = -10;
/// Upper domain bound passed to `curve()`.
pub const DOMAIN_TO: i32 = 10;
/// Number of sample points passed to `curve()`.
pub const SAMPLES: u32 = 200;
/// How long the interactive window is held open, in seconds.
pub const DISPLAY_SECONDS: u32 = 30;

/// A curve over the fixed domain; only the expression varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    expr: String,
}

impl Curve {
    /// Resolve a preset name (`square`, `cubic`) or take the text as an R expression in `x`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let expr = match text.to_ascii_lowercase().as_str() {
            "square" => "x^2",
            "cubic" => "x^3-x^2",
            _ => text,
        };
        if expr.is_empty() {
            bail!("curve expression is empty");
        }
        Ok(Self { expr: expr.to_string() })
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    fn call(&self) -> String {
        format!("curve({}, {}, {}, {})", self.expr, DOMAIN_FROM, DOMAIN_TO, SAMPLES)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self { expr: "x^2".into() }
    }
}

/// Script that renders the curve into a PNG at a fresh `tempfile()` path and yields that path.
pub fn raster_script(curve: &Curve) -> String {
    format!(
        "tmpf <- tempfile('curve'); png(tmpf); {}; dev.off(); tmpf",
        curve.call()
    )
}

/// Script that opens an interactive device, draws the curve and sleeps.
pub fn display_script(curve: &Curve, device: &str, seconds: u32) -> String {
    format!("{}(); {}; Sys.sleep({});", device, curve.call(), seconds)
}

/// Quote `text` as an R double-quoted string literal.
pub fn r_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
