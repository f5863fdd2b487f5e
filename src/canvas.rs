//! Drawing surface contract and the built-in SVG implementation.
//!
//! The layout engine issues paint commands through the [`Canvas`]
//! trait and never depends on a concrete surface. [`SvgCanvas`]
//! accumulates those commands into a self-contained SVG string that
//! can be displayed in any SVG-capable view.

use serde::{Deserialize, Serialize};

/// Font size of music-font symbols at scale 1.0 (SVG user units).
const MUSIC_FONT_SIZE: f64 = 34.0;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for SVG/HTML surfaces.
    pub fn css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }
}

/// A symbol of the music notation font (SMuFL codepoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicSymbol {
    ClefG,
    ClefF,
    ClefC,
    ClefTab,
    ClefPercussion,
    NoteheadBlack,
    NoteheadHalf,
    NoteheadWhole,
    NoteheadDoubleWhole,
    NoteheadSlash,
    RestQuadrupleWhole,
    RestDoubleWhole,
    RestWhole,
    RestHalf,
    RestQuarter,
    RestEighth,
    RestSixteenth,
    RestThirtySecond,
    RestSixtyFourth,
    RestOneHundredTwentyEighth,
    RestTwoHundredFiftySixth,
    AccidentalSharp,
    AccidentalFlat,
    AccidentalNatural,
    AccidentalDoubleSharp,
    AccidentalDoubleFlat,
    SimileMarkSimple,
    SimileMarkDouble,
    TremoloPickingOne,
    TremoloPickingTwo,
    TremoloPickingThree,
}

impl MusicSymbol {
    /// SMuFL codepoint of the symbol.
    pub fn codepoint(&self) -> char {
        match self {
            MusicSymbol::ClefG => '\u{E050}',
            MusicSymbol::ClefF => '\u{E062}',
            MusicSymbol::ClefC => '\u{E05C}',
            MusicSymbol::ClefTab => '\u{E06D}',
            MusicSymbol::ClefPercussion => '\u{E069}',
            MusicSymbol::NoteheadBlack => '\u{E0A4}',
            MusicSymbol::NoteheadHalf => '\u{E0A3}',
            MusicSymbol::NoteheadWhole => '\u{E0A2}',
            MusicSymbol::NoteheadDoubleWhole => '\u{E0A0}',
            MusicSymbol::NoteheadSlash => '\u{E100}',
            MusicSymbol::RestQuadrupleWhole => '\u{E4E1}',
            MusicSymbol::RestDoubleWhole => '\u{E4E2}',
            MusicSymbol::RestWhole => '\u{E4E3}',
            MusicSymbol::RestHalf => '\u{E4E4}',
            MusicSymbol::RestQuarter => '\u{E4E5}',
            MusicSymbol::RestEighth => '\u{E4E6}',
            MusicSymbol::RestSixteenth => '\u{E4E7}',
            MusicSymbol::RestThirtySecond => '\u{E4E8}',
            MusicSymbol::RestSixtyFourth => '\u{E4E9}',
            MusicSymbol::RestOneHundredTwentyEighth => '\u{E4EA}',
            MusicSymbol::RestTwoHundredFiftySixth => '\u{E4EB}',
            MusicSymbol::AccidentalSharp => '\u{E262}',
            MusicSymbol::AccidentalFlat => '\u{E260}',
            MusicSymbol::AccidentalNatural => '\u{E261}',
            MusicSymbol::AccidentalDoubleSharp => '\u{E263}',
            MusicSymbol::AccidentalDoubleFlat => '\u{E264}',
            MusicSymbol::SimileMarkSimple => '\u{E500}',
            MusicSymbol::SimileMarkDouble => '\u{E501}',
            MusicSymbol::TremoloPickingOne => '\u{E220}',
            MusicSymbol::TremoloPickingTwo => '\u{E221}',
            MusicSymbol::TremoloPickingThree => '\u{E222}',
        }
    }
}

/// Primitive drawing operations the engine issues in paint order.
///
/// Fill operations use the current color set by [`Canvas::set_color`].
pub trait Canvas {
    fn set_color(&mut self, color: &Color);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64);
    fn fill_text(&mut self, x: f64, y: f64, text: &str, size: f64);
    /// Draw a music-font symbol with its baseline origin at (x, y),
    /// scaled by `glyph_scale`.
    fn fill_music_symbol(&mut self, x: f64, y: f64, glyph_scale: f64, symbol: MusicSymbol);
}

// ═══════════════════════════════════════════════════════════════════════
// SvgCanvas
// ═══════════════════════════════════════════════════════════════════════

/// A [`Canvas`] that accumulates SVG elements and produces the final
/// document string.
pub struct SvgCanvas {
    elements: Vec<String>,
    color: Color,
    width: f64,
    height: f64,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            color: Color::rgb(0, 0, 0),
            width,
            height,
        }
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

impl Canvas for SvgCanvas {
    fn set_color(&mut self, color: &Color) {
        self.color = *color;
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, self.color.css(), width
        ));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, self.color.css()
        ));
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
            cx, cy, r, self.color.css()
        ));
    }

    fn fill_text(&mut self, x: f64, y: f64, text: &str, size: f64) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" text-anchor="middle">{}</text>"#,
            x, y, size, self.color.css(), Self::escape(text)
        ));
    }

    fn fill_music_symbol(&mut self, x: f64, y: f64, glyph_scale: f64, symbol: MusicSymbol) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="Bravura, music" font-size="{:.1}" fill="{}">&#x{:X};</text>"#,
            x,
            y,
            MUSIC_FONT_SIZE * glyph_scale,
            self.color.css(),
            symbol.codepoint() as u32
        ));
    }
}
