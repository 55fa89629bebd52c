//! Pre-rendered raster tile catalog.
//!
//! Tiles are produced by the renderer as files named
//! `<x>x<y>_<zoom>x.png`, where `x` and `y` are signed decimals and `zoom`
//! is an unsigned decimal, e.g. `-1200x3400.5_2x.png`.  A [`Tile`] is the
//! parsed catalog entry; it carries no geometry.

use std::path::Path;

use crate::MapResult;

/// Catalog entry for one pre-rendered tile.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Tile {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    /// Parse a tile file name.  Returns `None` for anything else found in a
    /// tile directory.
    pub fn from_file_name(name: &str) -> Option<Tile> {
        let stem = name.strip_suffix("x.png")?;
        let (coords, zoom) = stem.rsplit_once('_')?;
        let (x, y) = coords.split_once('x')?;
        Some(Tile {
            x:    parse_decimal(x, true)?,
            y:    parse_decimal(y, true)?,
            zoom: parse_decimal(zoom, false)?,
        })
    }

    /// The file name this tile is stored under.
    pub fn file_name(&self) -> String {
        format!("{}x{}_{}x.png", self.x, self.y, self.zoom)
    }
}

/// Parse `-?\d+(\.\d*)?`; the sign is only accepted when `signed`.
fn parse_decimal(s: &str, signed: bool) -> Option<f64> {
    let digits = match s.strip_prefix('-') {
        Some(rest) if signed => rest,
        Some(_) => return None,
        None => s,
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let well_formed = !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return None;
    }
    s.parse().ok()
}

/// Parse every tile file name in `names`, ignoring the rest.  Results are
/// ordered by file name.
pub fn tile_catalog<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Tile> {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_unstable();
    names.into_iter().filter_map(Tile::from_file_name).collect()
}

/// List `dir` and parse the tile catalog it contains.
pub fn read_tile_catalog(dir: &Path) -> MapResult<Vec<Tile>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(tile_catalog(names.iter().map(String::as_str)))
}
