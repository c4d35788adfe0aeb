//! Slip colour and typography presets.
//!
//! One renderer draws every variant; presets only change these values.

/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS hex form, alpha ignored.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Voter-number font steps, shrinking as the number grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSizes {
    pub large: f32,
    pub medium: f32,
    pub small: f32,
    /// Lengths above this use `medium`.
    pub medium_above: usize,
    /// Lengths above this use `small`.
    pub small_above: usize,
}

impl NumberSizes {
    pub fn size_for(&self, number: &str) -> f32 {
        let len = number.chars().count();
        if len > self.small_above {
            self.small
        } else if len > self.medium_above {
            self.medium
        } else {
            self.large
        }
    }
}

impl Default for NumberSizes {
    fn default() -> Self {
        Self {
            large: 44.0,
            medium: 36.0,
            small: 30.0,
            medium_above: 10,
            small_above: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlipTheme {
    pub name: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub footer_note: &'static str,
    pub watermark: Option<&'static str>,
    pub background: Rgba,
    pub accent: Rgba,
    pub on_accent: Rgba,
    pub label: Rgba,
    pub value: Rgba,
    pub muted: Rgba,
    pub card_fill: Rgba,
    pub card_border: Rgba,
    /// Centre names longer than this many characters go onto a second line.
    pub center_wrap_chars: usize,
    pub number_sizes: NumberSizes,
    /// Supersampling factor applied to the 800×500 logical canvas.
    pub scale: f32,
}

impl SlipTheme {
    pub fn classic() -> Self {
        Self {
            name: "classic",
            title: "ভোটার স্লিপ",
            subtitle: "নির্বাচন কমিশন বাংলাদেশ",
            footer_note: "দ্রষ্টব্য: এটি কোনো অফিসিয়াল কাজে ব্যবহারযোগ্য নয়।",
            watermark: None,
            background: Rgba::rgb(255, 255, 255),
            accent: Rgba::rgb(0, 114, 188),
            on_accent: Rgba::rgb(255, 255, 255),
            label: Rgba::rgb(100, 116, 139),
            value: Rgba::rgb(15, 23, 42),
            muted: Rgba::rgb(148, 163, 184),
            card_fill: Rgba::rgb(241, 245, 249),
            card_border: Rgba::rgb(203, 213, 225),
            center_wrap_chars: 25,
            number_sizes: NumberSizes::default(),
            scale: 4.0,
        }
    }

    pub fn emerald() -> Self {
        Self {
            name: "emerald",
            watermark: Some("DEMO COPY"),
            accent: Rgba::rgb(4, 120, 87),
            card_fill: Rgba::rgb(236, 253, 245),
            card_border: Rgba::rgb(167, 243, 208),
            ..Self::classic()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(Self::classic()),
            "emerald" => Some(Self::emerald()),
            _ => None,
        }
    }
}

impl Default for SlipTheme {
    fn default() -> Self {
        Self::classic()
    }
}
