use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categorical palette (matplotlib "tab10")
const TAB10: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Tab10,
    Spectrum,
    Rainbow,
    Fire,
    Ocean,
    Forest,
    Purple,
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab10" | "category" => Ok(Self::Tab10),
            "spectrum" => Ok(Self::Spectrum),
            "rainbow" => Ok(Self::Rainbow),
            "fire" => Ok(Self::Fire),
            "ocean" => Ok(Self::Ocean),
            "forest" => Ok(Self::Forest),
            "purple" => Ok(Self::Purple),
            "mono" | "monochrome" => Ok(Self::Monochrome),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

impl ColorScheme {
    /// Get color for a given position (0.0 to 1.0) and intensity (0.0 to 1.0)
    pub fn get_color(&self, position: f32, intensity: f32) -> (u8, u8, u8) {
        let (h, s, l) = match self {
            ColorScheme::Tab10 => {
                let i = (position.clamp(0.0, 1.0) * TAB10.len() as f32) as usize;
                return TAB10[i.min(TAB10.len() - 1)];
            }
            ColorScheme::Spectrum => {
                // purple -> blue -> cyan -> green -> yellow -> red
                let hue = 270.0 - (position * 270.0);
                (hue, 0.9, 0.4 + intensity * 0.3)
            }
            ColorScheme::Rainbow => {
                let hue = position * 360.0;
                (hue, 0.85, 0.5 + intensity * 0.2)
            }
            ColorScheme::Fire => {
                let hue = position * 60.0;
                (hue, 0.95, 0.3 + intensity * 0.4)
            }
            ColorScheme::Ocean => {
                let hue = 180.0 + position * 60.0;
                (hue, 0.8, 0.3 + intensity * 0.35)
            }
            ColorScheme::Forest => {
                let hue = 80.0 + position * 60.0;
                (hue, 0.75, 0.25 + intensity * 0.35)
            }
            ColorScheme::Purple => {
                let hue = 270.0 + position * 60.0;
                (hue, 0.8, 0.35 + intensity * 0.3)
            }
            ColorScheme::Monochrome => (0.0, 0.0, 0.35 + intensity * 0.55),
        };

        let hsl = Hsl::new(h, s, l);
        let rgb: Srgb = hsl.into_color();

        (
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }

    /// Color of the `index`-th of `count` plotted groups.
    ///
    /// Tab10 cycles through its ten entries; the gradient schemes spread the
    /// groups evenly over their range.
    pub fn series_color(&self, index: usize, count: usize) -> (u8, u8, u8) {
        match self {
            ColorScheme::Tab10 => TAB10[index % TAB10.len()],
            ColorScheme::Monochrome => {
                let intensity = 1.0 - index as f32 / count.max(1) as f32;
                self.get_color(0.0, intensity)
            }
            _ => {
                let position = index as f32 / count.max(1) as f32;
                self.get_color(position, 0.6)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Tab10 => "tab10",
            ColorScheme::Spectrum => "spectrum",
            ColorScheme::Rainbow => "rainbow",
            ColorScheme::Fire => "fire",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Forest => "forest",
            ColorScheme::Purple => "purple",
            ColorScheme::Monochrome => "monochrome",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Tab10,
            ColorScheme::Spectrum,
            ColorScheme::Rainbow,
            ColorScheme::Fire,
            ColorScheme::Ocean,
            ColorScheme::Forest,
            ColorScheme::Purple,
            ColorScheme::Monochrome,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|c| c == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab10_cycles_after_ten_groups() {
        let scheme = ColorScheme::Tab10;
        assert_eq!(scheme.series_color(0, 12), (31, 119, 180));
        assert_eq!(scheme.series_color(10, 12), scheme.series_color(0, 12));
        assert_ne!(scheme.series_color(1, 12), scheme.series_color(0, 12));
    }

    #[test]
    fn gradient_schemes_give_distinct_colors() {
        for scheme in ColorScheme::all() {
            let a = scheme.series_color(0, 4);
            let b = scheme.series_color(2, 4);
            assert_ne!(a, b, "{} repeats a color", scheme.name());
        }
    }

    #[test]
    fn names_parse_back() {
        for scheme in ColorScheme::all() {
            assert_eq!(scheme.name().parse::<ColorScheme>().unwrap(), *scheme);
        }
        assert!("plaid".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn next_wraps_around() {
        assert_eq!(ColorScheme::Monochrome.next(), ColorScheme::Tab10);
    }
}
