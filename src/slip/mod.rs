//! Slip rendering: printable HTML and a flattened PNG export.
//!
//! Both paths read from [`SlipFields`]. The PNG path never touches the HTML;
//! it draws primitives onto a fixed canvas so the export is a single image.

mod fields;
mod html;
mod layout;
mod raster;
mod theme;

pub use fields::SlipFields;
pub use theme::SlipTheme;

use std::path::Path;

use ab_glyph::FontArc;

use crate::models::VoterRecord;
use html::render_slip_page;
use layout::layout_slip;
use raster::rasterize;

/// Title handed to native share sheets.
pub const SHARE_TITLE: &str = "Voter Slip";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("slip font unavailable: {0}")]
    FontUnavailable(String),
    #[error("drawing surface error: {0}")]
    Surface(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Load a TrueType/OpenType font for slip text.
pub fn load_font(path: &Path) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path)
        .map_err(|e| RenderError::FontUnavailable(format!("{}: {e}", path.display())))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| RenderError::FontUnavailable(format!("{}: {e}", path.display())))
}

/// Theme plus the font used for PNG exports.
pub struct SlipRenderer {
    theme: SlipTheme,
    font: Option<FontArc>,
}

impl SlipRenderer {
    pub fn new(theme: SlipTheme, font: Option<FontArc>) -> Self {
        Self { theme, font }
    }

    /// Build a renderer, keeping HTML slips available even when the font is missing.
    pub fn load(theme: SlipTheme, font_path: &Path) -> Self {
        let font = match load_font(font_path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("{e}; PNG export is disabled until a font is configured");
                None
            }
        };
        Self::new(theme, font)
    }

    pub fn can_export(&self) -> bool {
        self.font.is_some()
    }

    pub fn html(&self, voter: &VoterRecord) -> String {
        render_slip_page(&SlipFields::from_voter(voter), &self.theme)
    }

    pub fn png(&self, voter: &VoterRecord) -> Result<Vec<u8>, RenderError> {
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| RenderError::FontUnavailable("no slip font loaded".to_string()))?;
        let canvas = layout_slip(&SlipFields::from_voter(voter), &self.theme);
        rasterize(&canvas, font, self.theme.scale)
    }
}

/// Download file name for a voter's slip.
pub fn export_file_name(voter: &VoterRecord) -> String {
    let stem: String = voter
        .voter_number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let stem = if stem.is_empty() {
        voter
            .id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect()
    } else {
        stem
    };
    format!("voter-slip-{stem}.png")
}

#[cfg(test)]
pub(crate) fn find_system_font() -> Option<FontArc> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ]
    .iter()
    .find_map(|p| load_font(Path::new(p)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_voter;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_export_without_font_is_an_error() {
        let renderer = SlipRenderer::load(SlipTheme::classic(), Path::new("/nonexistent/font.ttf"));
        assert!(!renderer.can_export());
        let err = renderer.png(&sample_voter("v1", "1")).unwrap_err();
        assert!(matches!(err, RenderError::FontUnavailable(_)));
    }

    #[test]
    fn test_png_export_with_system_font() {
        let Some(font) = find_system_font() else {
            return;
        };
        let mut theme = SlipTheme::classic();
        theme.scale = 1.0;
        let renderer = SlipRenderer::new(theme, Some(font));
        let png = renderer.png(&sample_voter("v1", "12345678901234")).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);

        // IHDR width/height follow the signature and chunk header.
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        assert_eq!((width, height), (800, 500));
    }

    #[test]
    fn test_file_name_uses_voter_number() {
        let voter = sample_voter("v1", "2611 0042");
        assert_eq!(export_file_name(&voter), "voter-slip-26110042.png");

        let voter = sample_voter("abc-9", "");
        assert_eq!(export_file_name(&voter), "voter-slip-abc-9.png");
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            load_font(&path),
            Err(RenderError::FontUnavailable(_))
        ));
    }
}
