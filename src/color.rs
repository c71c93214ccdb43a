//! Color token resolution and gradient generation.
//!
//! Tokens are either hex strings (`#c0ffee`, `c0ffee`, `#abc`) or named
//! colors. Hex tokens pass through [`normalize`] unchanged; names resolve
//! against the W3C table first, then the X11 table.

use crate::error::{LayerError, Result};
use regex::Regex;

mod names;

fn hex_color_regex() -> Regex {
    Regex::new(r"^#?([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("regex for hex colors")
}

/// Whether a token is a 3- or 6-digit hex color, with or without `#`.
pub fn is_hex_color(token: &str) -> bool {
    hex_color_regex().is_match(token)
}

/// Resolve a color token to a hex value.
///
/// Hex tokens are returned unchanged, case preserved. Named tokens are looked
/// up case-insensitively (spaces ignored) and resolve to lowercase `#rrggbb`.
pub fn normalize(token: &str) -> Result<String> {
    if is_hex_color(token) {
        return Ok(token.to_string());
    }

    let key = lookup_key(token);
    for table in [names::W3C, names::X11] {
        if let Some((_, packed)) = table.iter().find(|(name, _)| *name == key) {
            let hex = encode_rgb(unpack_rgb(*packed));
            tracing::debug!(token, resolved = %hex, "resolved named color");
            return Ok(hex);
        }
    }
    Err(LayerError::UnrecognizedColor(token.to_string()))
}

/// Nearest named color for a token, by RGB distance over the W3C table.
///
/// Lossy; used for human-readable summaries, never for round-tripping.
pub fn name_of(token: &str) -> Result<String> {
    let rgb = parse_rgb(&normalize(token)?)?;
    let nearest = names::W3C
        .iter()
        .min_by_key(|(_, packed)| distance_squared(rgb, unpack_rgb(*packed)))
        .map(|(name, _)| (*name).to_string());
    nearest.ok_or_else(|| LayerError::UnrecognizedColor(token.to_string()))
}

/// Generate a linear RGB gradient of exactly `steps` colors.
///
/// Each channel advances by `(end - start) / steps` per step, truncated to an
/// integer. Step 0 is the start color; the end color is never emitted.
pub fn gradient(start: &str, end: &str, steps: usize) -> Result<Vec<String>> {
    if steps == 0 {
        return Err(LayerError::Validation(
            "gradient requires at least one step".to_string(),
        ));
    }

    let start_rgb = parse_rgb(&normalize(start)?)?;
    let end_rgb = parse_rgb(&normalize(end)?)?;

    let channel_step = |from: u8, to: u8| (to as f64 - from as f64) / steps as f64;
    let r_step = channel_step(start_rgb[0], end_rgb[0]);
    let g_step = channel_step(start_rgb[1], end_rgb[1]);
    let b_step = channel_step(start_rgb[2], end_rgb[2]);

    let mut colors = Vec::with_capacity(steps);
    for step in 0..steps {
        let at = |from: u8, per: f64| (from as f64 + per * step as f64) as u8;
        colors.push(encode_rgb([
            at(start_rgb[0], r_step),
            at(start_rgb[1], g_step),
            at(start_rgb[2], b_step),
        ]));
    }
    Ok(colors)
}

fn lookup_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn unpack_rgb(packed: u32) -> [u8; 3] {
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

fn encode_rgb(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn parse_rgb(hex: &str) -> Result<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let bytes = digits.as_bytes();
    let invalid = || LayerError::UnrecognizedColor(hex.to_string());

    match bytes.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, byte) in rgb.iter_mut().zip(bytes) {
                *slot = nibble(*byte).ok_or_else(invalid)? * 17;
            }
            Ok(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (slot, pair) in rgb.iter_mut().zip(bytes.chunks(2)) {
                let hi = nibble(pair[0]).ok_or_else(invalid)?;
                let lo = nibble(pair[1]).ok_or_else(invalid)?;
                *slot = hi * 16 + lo;
            }
            Ok(rgb)
        }
        _ => Err(invalid()),
    }
}

fn distance_squared(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}
