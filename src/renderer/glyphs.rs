//! Positioned drawable primitives and the left-to-right glyph group.
//!
//! A glyph is the smallest visual unit the renderers position: it has
//! an offset relative to its parent, a width, and one paint operation.
//! Groups lay their children out left-to-right by summing widths.

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::Duration;

/// Music-font rest symbol for a duration.
pub fn rest_symbol(duration: Duration) -> MusicSymbol {
    match duration {
        Duration::QuadrupleWhole => MusicSymbol::RestQuadrupleWhole,
        Duration::DoubleWhole => MusicSymbol::RestDoubleWhole,
        Duration::Whole => MusicSymbol::RestWhole,
        Duration::Half => MusicSymbol::RestHalf,
        Duration::Quarter => MusicSymbol::RestQuarter,
        Duration::Eighth => MusicSymbol::RestEighth,
        Duration::Sixteenth => MusicSymbol::RestSixteenth,
        Duration::ThirtySecond => MusicSymbol::RestThirtySecond,
        Duration::SixtyFourth => MusicSymbol::RestSixtyFourth,
        Duration::OneHundredTwentyEighth => MusicSymbol::RestOneHundredTwentyEighth,
        Duration::TwoHundredFiftySixth => MusicSymbol::RestTwoHundredFiftySixth,
    }
}

/// Music-font notehead symbol for a duration.
pub fn notehead_symbol(duration: Duration) -> MusicSymbol {
    match duration {
        Duration::QuadrupleWhole | Duration::DoubleWhole => MusicSymbol::NoteheadDoubleWhole,
        Duration::Whole => MusicSymbol::NoteheadWhole,
        Duration::Half => MusicSymbol::NoteheadHalf,
        _ => MusicSymbol::NoteheadBlack,
    }
}

/// One fret number within a tablature chord.
#[derive(Debug, Clone)]
pub struct TabNoteEntry {
    /// Vertical offset of the string line, relative to the chord origin.
    pub y: f64,
    pub text: String,
}

/// Fret numbers of one beat, stacked on their string lines.
#[derive(Debug, Clone)]
pub struct TabChordGlyph {
    pub notes: Vec<TabNoteEntry>,
    /// Width of the widest fret number; the chord's tie/slur anchor
    /// sits at half this width.
    pub note_string_width: f64,
    pub font_size: f64,
}

/// One notehead within a standard-notation chord.
#[derive(Debug, Clone)]
pub struct ScoreNoteHead {
    /// Vertical offset of the staff step, relative to the chord origin.
    pub y: f64,
    pub symbol: MusicSymbol,
}

/// Noteheads of one beat on a standard staff.
#[derive(Debug, Clone)]
pub struct ScoreChordGlyph {
    pub heads: Vec<ScoreNoteHead>,
    pub stem_up: bool,
    pub glyph_scale: f64,
}

impl ScoreChordGlyph {
    /// Vertical extent of the chord's heads (top, bottom).
    pub fn head_span(&self) -> (f64, f64) {
        let mut top = f64::MAX;
        let mut bottom = f64::MIN;
        for head in &self.heads {
            top = top.min(head.y);
            bottom = bottom.max(head.y);
        }
        if self.heads.is_empty() {
            (0.0, 0.0)
        } else {
            (top, bottom)
        }
    }
}

/// Paint operation of a glyph.
#[derive(Debug, Clone)]
pub enum GlyphKind {
    /// Pure spacing, nothing painted.
    Space,
    Circle {
        radius: f64,
    },
    /// A music-font symbol drawn at the glyph origin.
    Symbol {
        symbol: MusicSymbol,
        glyph_scale: f64,
    },
    /// Plain text centered within the glyph width.
    Text {
        text: String,
        size: f64,
    },
    /// Thin vertical separator closing a bar.
    BarSeparator {
        height: f64,
    },
    TimeSignature {
        numerator: i32,
        denominator: i32,
        font_size: f64,
    },
    TabChord(TabChordGlyph),
    ScoreChord(ScoreChordGlyph),
    /// Whammy-bar dive drawn as a down-up line pair below the beat.
    WhammyDive {
        height: f64,
    },
}

/// Smallest positioned visual unit.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Offset relative to the owning group/container.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Invisible glyphs keep their width for alignment but paint nothing.
    pub visible: bool,
    pub kind: GlyphKind,
}

impl Glyph {
    pub fn new(y: f64, width: f64, kind: GlyphKind) -> Self {
        Self {
            x: 0.0,
            y,
            width,
            visible: true,
            kind,
        }
    }

    pub fn space(width: f64) -> Self {
        Self::new(0.0, width, GlyphKind::Space)
    }

    /// Draw this glyph at the absolute offset (cx + x, cy + y).
    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        let x = cx + self.x;
        let y = cy + self.y;
        match &self.kind {
            GlyphKind::Space => {}
            GlyphKind::Circle { radius } => canvas.fill_circle(x, y, *radius),
            GlyphKind::Symbol { symbol, glyph_scale } => {
                canvas.fill_music_symbol(x, y, *glyph_scale, *symbol)
            }
            GlyphKind::Text { text, size } => {
                canvas.fill_text(x + self.width / 2.0, y, text, *size)
            }
            GlyphKind::BarSeparator { height } => canvas.fill_rect(x, y, self.width, *height),
            GlyphKind::TimeSignature { numerator, denominator, font_size } => {
                let center = x + self.width / 2.0;
                canvas.fill_text(center, y, &numerator.to_string(), *font_size);
                canvas.fill_text(center, y + font_size, &denominator.to_string(), *font_size);
            }
            GlyphKind::TabChord(chord) => {
                let center = x + chord.note_string_width / 2.0;
                for note in &chord.notes {
                    canvas.fill_text(center, y + note.y, &note.text, chord.font_size);
                }
            }
            GlyphKind::ScoreChord(chord) => {
                for head in &chord.heads {
                    canvas.fill_music_symbol(x, y + head.y, chord.glyph_scale, head.symbol);
                }
            }
            GlyphKind::WhammyDive { height } => {
                let mid = x + self.width / 2.0;
                canvas.line(x, y, mid, y + height, 1.0);
                canvas.line(mid, y + height, x + self.width, y, 1.0);
            }
        }
    }
}

/// Ordered glyph container laying children out left-to-right.
#[derive(Debug, Clone, Default)]
pub struct GlyphGroup {
    /// Offset relative to the owning renderer/container.
    pub x: f64,
    pub y: f64,
    /// Aggregate width of all added glyphs.
    pub width: f64,
    pub glyphs: Vec<Glyph>,
}

impl GlyphGroup {
    /// Append a glyph at the current group end.
    pub fn add_glyph(&mut self, mut glyph: Glyph) {
        glyph.x = self.width;
        self.width += glyph.width;
        self.glyphs.push(glyph);
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        for glyph in &self.glyphs {
            glyph.paint(cx + self.x, cy + self.y, canvas);
        }
    }
}
