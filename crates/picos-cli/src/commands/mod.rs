pub mod capture;
pub mod config;
pub mod info;
pub mod preview;

use anyhow::{Context, Result};

/// Parse a `WIDTHxHEIGHT` sensor size argument.
pub fn parse_sensor(s: &str) -> Result<(usize, usize)> {
    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    Ok((
        w.trim().parse().context("bad sensor width")?,
        h.trim().parse().context("bad sensor height")?,
    ))
}
