use palette::rgb::channels::Rgba;
use palette::{LinSrgb, Mix, Srgb};
use strum::{Display, EnumIter, EnumString};

/// An 8-bit sRGB colour.
pub type Rgb = Srgb<u8>;

/// CSS form of a colour, `#rrggbb`.
#[must_use]
pub fn css_hex(color: Rgb) -> String {
    format!("#{color:x}")
}

/// `0xRRGGBB`, as spreadsheet writers expect.
#[must_use]
pub fn packed_rgb(color: Rgb) -> u32 {
    color.into_u32::<Rgba>() >> 8
}

/// A three-stop colour scale used to shade numeric cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum ColorScale {
    GnBu,
    RdYlGn,
    Greys,
    RdGy,
    Greens,
    Blues,
    RdBu,
}

impl ColorScale {
    #[must_use]
    pub const fn stops(self) -> [Rgb; 3] {
        match self {
            Self::GnBu => [Rgb::new(0xf7, 0xfc, 0xf0), Rgb::new(0x7b, 0xcc, 0xc4), Rgb::new(0x08, 0x40, 0x81)],
            Self::RdYlGn => [Rgb::new(0xd7, 0x30, 0x27), Rgb::new(0xff, 0xff, 0xbf), Rgb::new(0x1a, 0x98, 0x50)],
            Self::Greys => [Rgb::new(0xff, 0xff, 0xff), Rgb::new(0x96, 0x96, 0x96), Rgb::new(0x25, 0x25, 0x25)],
            Self::RdGy => [Rgb::new(0xb2, 0x18, 0x2b), Rgb::new(0xff, 0xff, 0xff), Rgb::new(0x4d, 0x4d, 0x4d)],
            Self::Greens => [Rgb::new(0xf7, 0xfc, 0xf5), Rgb::new(0x74, 0xc4, 0x76), Rgb::new(0x00, 0x44, 0x1b)],
            Self::Blues => [Rgb::new(0xf7, 0xfb, 0xff), Rgb::new(0x6b, 0xae, 0xd6), Rgb::new(0x08, 0x30, 0x6b)],
            Self::RdBu => [Rgb::new(0xb2, 0x18, 0x2b), Rgb::new(0xf7, 0xf7, 0xf7), Rgb::new(0x21, 0x66, 0xac)],
        }
    }

    /// Colour at position `t` in `[0, 1]`, mixed in linear light; out-of-range positions are clamped.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "Positions are in [0, 1]")]
    pub fn color_at(self, t: f64) -> Rgb {
        let [low, mid, high] = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = t as f32;
        let (from, to, factor) = if t < 0.5 { (low, mid, t * 2.0) } else { (mid, high, (t - 0.5) * 2.0) };

        let from: LinSrgb<f32> = from.into_linear();
        let to: LinSrgb<f32> = to.into_linear();
        Srgb::from_linear(from.mix(to, factor))
    }
}

/// Named highlight colours for conditional formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CondColor {
    Red,
    Green,
}

impl CondColor {
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Red => Rgb::new(0xd9, 0x53, 0x4f),
            Self::Green => Rgb::new(0x5c, 0xb8, 0x5c),
        }
    }
}
