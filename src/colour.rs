//! RGB colours for highlighting and pattern validity.

use std::fmt;
use std::str::FromStr;

use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colours, keyed by lowercase name without separators.
/// Please keep names sorted alphabetically.
const NAMED_COLOURS: Map<&'static str, Colour> = phf_map! {
    "black" => Colour { r: 0x00, g: 0x00, b: 0x00 },
    "blue" => Colour { r: 0x00, g: 0x00, b: 0xff },
    "cyan" => Colour { r: 0x00, g: 0xff, b: 0xff },
    "darkblue" => Colour { r: 0x00, g: 0x00, b: 0x80 },
    "darkcyan" => Colour { r: 0x00, g: 0x80, b: 0x80 },
    "darkgray" => Colour { r: 0x80, g: 0x80, b: 0x80 },
    "darkgreen" => Colour { r: 0x00, g: 0x80, b: 0x00 },
    "darkgrey" => Colour { r: 0x80, g: 0x80, b: 0x80 },
    "darkmagenta" => Colour { r: 0x80, g: 0x00, b: 0x80 },
    "darkred" => Colour { r: 0x80, g: 0x00, b: 0x00 },
    "darkyellow" => Colour { r: 0x80, g: 0x80, b: 0x00 },
    "gray" => Colour { r: 0xa0, g: 0xa0, b: 0xa4 },
    "green" => Colour { r: 0x00, g: 0xff, b: 0x00 },
    "grey" => Colour { r: 0xa0, g: 0xa0, b: 0xa4 },
    "lightgray" => Colour { r: 0xc0, g: 0xc0, b: 0xc0 },
    "lightgrey" => Colour { r: 0xc0, g: 0xc0, b: 0xc0 },
    "magenta" => Colour { r: 0xff, g: 0x00, b: 0xff },
    "orange" => Colour { r: 0xff, g: 0xa5, b: 0x00 },
    "red" => Colour { r: 0xff, g: 0x00, b: 0x00 },
    "white" => Colour { r: 0xff, g: 0xff, b: 0xff },
    "yellow" => Colour { r: 0xff, g: 0xff, b: 0x00 },
};

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Colour = Colour::rgb(0xff, 0xff, 0xff);
    pub const RED: Colour = Colour::rgb(0xff, 0x00, 0x00);
    pub const YELLOW: Colour = Colour::rgb(0xff, 0xff, 0x00);
    pub const DARK_GREEN: Colour = Colour::rgb(0x00, 0x80, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Darken by `factor` percent: 150 divides the brightness by 1.5.
    /// Factors of 100 or less return the colour unchanged.
    pub fn darker(self, factor: u32) -> Colour {
        if factor <= 100 {
            return self;
        }
        let scale = |c: u8| (u32::from(c) * 100 / factor) as u8;
        Colour::rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourError(String);

impl fmt::Display for ColourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not a colour: {:?}", self.0)
    }
}

impl std::error::Error for ColourError {}

impl FromStr for Colour {
    type Err = ColourError;

    /// Accepts `#rgb`, `#rrggbb` or a colour name such as `darkGreen`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ColourError(s.to_string());
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            let width = match hex.len() {
                3 => 1,
                6 => 2,
                _ => return Err(err()),
            };
            let channel = |i: usize| -> Result<u8, ColourError> {
                let v = u8::from_str_radix(&hex[i * width..(i + 1) * width], 16)
                    .map_err(|_| err())?;
                Ok(if width == 1 { v * 0x11 } else { v })
            };
            return Ok(Colour::rgb(channel(0)?, channel(1)?, channel(2)?));
        }
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        NAMED_COLOURS.get(key.as_str()).copied().ok_or_else(err)
    }
}

impl From<Colour> for crossterm::style::Color {
    fn from(c: Colour) -> Self {
        crossterm::style::Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!("#ff8000".parse(), Ok(Colour::rgb(0xff, 0x80, 0x00)));
        assert_eq!("#f80".parse(), Ok(Colour::rgb(0xff, 0x88, 0x00)));
        assert!("#ff80".parse::<Colour>().is_err());
        assert!("#gg0000".parse::<Colour>().is_err());
    }

    #[test]
    fn parses_names() {
        assert_eq!("darkGreen".parse(), Ok(Colour::DARK_GREEN));
        assert_eq!("dark_green".parse(), Ok(Colour::DARK_GREEN));
        assert_eq!(" Yellow ".parse(), Ok(Colour::YELLOW));
        assert!("chartreuse-ish".parse::<Colour>().is_err());
    }

    #[test]
    fn darker_by_150() {
        assert_eq!(Colour::YELLOW.darker(150), Colour::rgb(170, 170, 0));
        assert_eq!(Colour::RED.darker(150), Colour::rgb(170, 0, 0));
        assert_eq!(Colour::RED.darker(100), Colour::RED);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Colour::DARK_GREEN.to_string(), "#008000");
    }

    #[test]
    fn converts_to_terminal_colour() {
        let c: crossterm::style::Color = Colour::RED.into();
        assert_eq!(c, crossterm::style::Color::Rgb { r: 255, g: 0, b: 0 });
    }
}
