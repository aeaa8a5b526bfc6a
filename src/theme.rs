//! Color palettes and embedded fonts for the two dial variants.

/// Color representation for dial elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

pub const REGULAR_FONT: &[u8] = include_bytes!("DejaVuSans.ttf");
pub const BOLD_FONT: &[u8] = include_bytes!("DejaVuSans-Bold.ttf");

/// Palette and font for one dial variant.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Window background behind the dial.
    pub background: Color,
    /// Outermost circle.
    pub rim: Color,
    /// Middle circle.
    pub ring: Color,
    /// Inner circle the labels and needle sit on.
    pub face: Color,
    /// Stroked arc window behind the label ring.
    pub arc_window: Color,
    pub tick: Color,
    pub label_text: Color,
    pub needle: Color,
    /// Large disc at the needle pivot.
    pub hub: Color,
    /// Small disc on top of the hub.
    pub hub_dot: Color,
    /// Readout badge fill.
    pub badge: Color,
    pub badge_text: Color,
    /// Step button fill.
    pub button: Color,
    pub button_text: Color,
    pub font_data: &'static [u8],
}

impl Theme {
    /// Light background with blue rings, the default look.
    pub fn light_blue() -> Self {
        Self {
            background: Color::new(0xff, 0xff, 0xff),
            rim: Color::new(0xcc, 0xcc, 0xcc),
            ring: Color::new(0x1e, 0x88, 0xe5),
            face: Color::new(0x15, 0x65, 0xc0),
            arc_window: Color::new(0x00, 0x00, 0x00),
            tick: Color::new(0xff, 0xeb, 0x3b),
            label_text: Color::new(0xff, 0xff, 0xff),
            needle: Color::new(0xff, 0xeb, 0x3b),
            hub: Color::new(0x00, 0x00, 0x00),
            hub_dot: Color::new(0xff, 0xeb, 0x3b),
            badge: Color::new(0x1e, 0x88, 0xe5),
            badge_text: Color::new(0xff, 0xff, 0xff),
            button: Color::new(0x1e, 0x88, 0xe5),
            button_text: Color::new(0xff, 0xff, 0xff),
            font_data: REGULAR_FONT,
        }
    }

    /// Dark background with orange rings and a bold face.
    pub fn dark_amber() -> Self {
        Self {
            background: Color::new(0x12, 0x12, 0x12),
            rim: Color::new(0x2e, 0x2e, 0x2e),
            ring: Color::new(0xfb, 0x8c, 0x00),
            face: Color::new(0xef, 0x6c, 0x00),
            arc_window: Color::new(0x00, 0x00, 0x00),
            tick: Color::new(0xff, 0xd5, 0x4f),
            label_text: Color::new(0xff, 0xff, 0xff),
            needle: Color::new(0xff, 0xd5, 0x4f),
            hub: Color::new(0x00, 0x00, 0x00),
            hub_dot: Color::new(0xff, 0xd5, 0x4f),
            badge: Color::new(0xfb, 0x8c, 0x00),
            badge_text: Color::new(0xff, 0xff, 0xff),
            button: Color::new(0xfb, 0x8c, 0x00),
            button_text: Color::new(0xff, 0xff, 0xff),
            font_data: BOLD_FONT,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light_blue()
    }
}
