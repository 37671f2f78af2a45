use indexmap::IndexMap;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categorical palettes
// ---------------------------------------------------------------------------

const TABLEAU10: [(u8, u8, u8); 10] = [
    (0x4e, 0x79, 0xa7),
    (0xf2, 0x8e, 0x2c),
    (0xe1, 0x57, 0x59),
    (0x76, 0xb7, 0xb2),
    (0x59, 0xa1, 0x4f),
    (0xed, 0xc9, 0x49),
    (0xaf, 0x7a, 0xa1),
    (0xff, 0x9d, 0xa7),
    (0x9c, 0x75, 0x5f),
    (0xba, 0xb0, 0xab),
];

/// Which colours series keys are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Fixed ten-colour scheme, cycled when there are more keys.
    #[default]
    Tableau10,
    /// `n` evenly spaced hues, never repeats.
    Hues,
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: series key → hex colour
// ---------------------------------------------------------------------------

/// Maps series keys, in domain order, to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: IndexMap<String, String>,
    default_color: String,
}

impl ColorMap {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>, palette: Palette) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        let colors: Vec<Srgb<u8>> = match palette {
            Palette::Tableau10 => TABLEAU10
                .iter()
                .cycle()
                .take(keys.len())
                .map(|&(r, g, b)| Srgb::new(r, g, b))
                .collect(),
            Palette::Hues => generate_palette(keys.len()),
        };
        let mapping = keys
            .into_iter()
            .zip(colors)
            .map(|(k, c)| (k.to_string(), to_hex(c)))
            .collect();

        ColorMap {
            mapping,
            default_color: "#808080".to_string(),
        }
    }

    pub fn color_for(&self, key: &str) -> &str {
        self.mapping
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Sequential ramps: measure → hex colour
// ---------------------------------------------------------------------------

/// Three-stop approximations of the ColorBrewer ramps the charts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRamp {
    #[default]
    YlOrRd,
    RdYlGn,
}

impl ColorRamp {
    fn stops(self) -> [(u8, u8, u8); 3] {
        match self {
            ColorRamp::YlOrRd => [(0xff, 0xff, 0xcc), (0xfd, 0x8d, 0x3c), (0x80, 0x00, 0x26)],
            ColorRamp::RdYlGn => [(0xa5, 0x00, 0x26), (0xff, 0xff, 0xbf), (0x00, 0x68, 0x37)],
        }
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn at(self, t: f64) -> String {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = t as f32;
        let [a, b, c] = self.stops().map(|(r, g, b)| lin(r, g, b));
        let mixed = if t <= 0.5 {
            a.mix(b, t * 2.0)
        } else {
            b.mix(c, (t - 0.5) * 2.0)
        };
        to_hex(Srgb::<f32>::from_linear(mixed).into_format())
    }

    /// Colour for `value` within `[min, max]`. A zero-width domain maps to
    /// the first stop.
    pub fn scaled(self, value: f64, [min, max]: [f64; 2]) -> String {
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.0 };
        self.at(t)
    }
}

fn lin(r: u8, g: u8, b: u8) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}
