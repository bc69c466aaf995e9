use std::io::Write;

/// A colour, expressed in RGB, CMYK or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Set this colour as the non-stroking (fill) colour, which is what text is painted with
    #[allow(clippy::write_with_newline)]
    pub(crate) fn write_fill(&self, content: &mut Vec<u8>) -> std::io::Result<()> {
        match *self {
            Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
            Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} k\n"),
            Colour::Grey { g } => write!(content, "{g} g\n"),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_operators() {
        let mut out = Vec::new();
        colours::BLACK.write_fill(&mut out).unwrap();
        Colour::new_rgb_bytes(255, 0, 0).write_fill(&mut out).unwrap();
        assert_eq!(out, b"0 g\n1 0 0 rg\n");
    }
}
