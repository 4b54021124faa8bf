//! Conversion request parsing and output file rendering

use anyhow::{Context, Result, anyhow, bail, ensure};
use std::fmt::Display;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("Invalid currency code: '{}'", code);
    }
    Ok(code.to_uppercase())
}

impl ConversionRequest {
    /// Validates raw CLI input. Codes are upper-cased.
    pub fn parse(from: &str, to: &str, amount: &str) -> Result<Self> {
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid amount '{}': {}", amount, e))?;
        ensure!(amount.is_finite(), "Invalid amount '{}': not finite", amount);

        Ok(ConversionRequest {
            from: normalize_code(from)?,
            to: normalize_code(to)?,
            amount,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub request: ConversionRequest,
    pub rate: f64,
    pub converted: f64,
}

impl Conversion {
    pub fn new(request: ConversionRequest, rate: f64) -> Self {
        let converted = request.amount * rate;
        Conversion {
            request,
            rate,
            converted,
        }
    }
}

/// Shortest round-trip rendering of `amount`. Magnitudes below 1e-4 or from
/// 1e16 up use a signed, two-digit exponent (`1e-05`, `1e+16`); integral
/// values otherwise keep a trailing `.0`.
fn format_amount(amount: f64) -> String {
    let sci = format!("{amount:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if amount == 0.0 || (-4..16).contains(&exp) {
        let plain = amount.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ConversionRequest { from, to, amount } = &self.request;
        writeln!(
            f,
            "{} {from} = {:.4} {to}",
            format_amount(*amount),
            self.converted
        )?;
        writeln!(f, "Rate: 1 {from} = {:.6} {to}", self.rate)
    }
}

/// Writes the conversion to `path`, replacing any previous content. With no
/// conversion the file is left empty.
pub fn write_output(path: &Path, conversion: Option<&Conversion>) -> Result<()> {
    let content = conversion.map(|c| c.to_string()).unwrap_or_default();
    fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

pub fn write_error(path: &Path, error: &anyhow::Error) -> Result<()> {
    fs::write(path, format!("Error: {error:#}\n"))
        .with_context(|| format!("Failed to write error to output file: {}", path.display()))
}
