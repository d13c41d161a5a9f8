//! Optional color theme loaded from a TOML manifest.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use fleetdeck_rendering::Color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Color overrides applied on top of the built-in map palette.
///
/// Every field is optional; `None` falls back to the defaults shipped with
/// the rendering crate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Theme {
    /// Window clear color behind the map.
    pub background: Option<Color>,
    /// Border color of the hovered tile.
    pub hover_border: Option<Color>,
}

impl Theme {
    /// Loads a theme manifest from the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read theme manifest at {}",
                manifest_path.display()
            )
        })?;
        parse_manifest(&contents)
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    colors: ManifestColors,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestColors {
    background: Option<String>,
    hover_border: Option<String>,
}

fn parse_manifest(contents: &str) -> Result<Theme> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse theme manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported theme manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let background = manifest
        .colors
        .background
        .as_deref()
        .map(parse_hex_color)
        .transpose()
        .context("invalid `background` color")?;
    let hover_border = manifest
        .colors
        .hover_border
        .as_deref()
        .map(parse_hex_color)
        .transpose()
        .context("invalid `hover_border` color")?;

    Ok(Theme {
        background,
        hover_border,
    })
}

fn parse_hex_color(text: &str) -> Result<Color> {
    let digits = match text.strip_prefix('#') {
        Some(digits) => digits,
        None => bail!("color `{text}` must start with `#`"),
    };
    if digits.len() != 6 {
        bail!("color `{text}` must be six hex digits");
    }
    let value =
        u32::from_str_radix(digits, 16).with_context(|| format!("color `{text}` is not hex"))?;

    let red = ((value >> 16) & 0xFF) as u8;
    let green = ((value >> 8) & 0xFF) as u8;
    let blue = (value & 0xFF) as u8;
    Ok(Color::from_rgb_u8(red, green, blue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_manifest() {
        let manifest = r##"
            version = 1

            [colors]
            background = "#101214"
            hover_border = "#FFD700"
        "##;

        let theme = parse_manifest(manifest).expect("manifest should parse");
        assert_eq!(theme.background, Some(Color::from_rgb_u8(0x10, 0x12, 0x14)));
        assert_eq!(
            theme.hover_border,
            Some(Color::from_rgb_u8(0xFF, 0xD7, 0x00))
        );
    }

    #[test]
    fn missing_colors_fall_back_to_defaults() {
        let theme = parse_manifest("version = 1").expect("manifest should parse");
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn rejects_unsupported_versions_and_unknown_keys() {
        assert!(parse_manifest("version = 2").is_err());

        let unknown_key = r##"
            version = 1

            [colors]
            sky = "#84C5E2"
        "##;
        assert!(parse_manifest(unknown_key).is_err());
    }

    #[test]
    fn rejects_malformed_hex_colors() {
        assert!(parse_hex_color("84C5E2").is_err());
        assert!(parse_hex_color("#84C5").is_err());
        assert!(parse_hex_color("#84C5EG").is_err());
        assert_eq!(
            parse_hex_color("#84C5E2").expect("valid color"),
            Color::from_rgb_u8(0x84, 0xC5, 0xE2)
        );
    }
}
