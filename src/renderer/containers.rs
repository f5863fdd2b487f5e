//! Beat and voice containers of the glyph containment tree.
//!
//! A voice container owns the ordered beat containers of one voice; a
//! beat container owns the pre-notes and on-notes glyph sub-trees of
//! one beat plus the tie decorations anchored to it. Containers are
//! recreated wholesale on every full layout pass; only the negotiated
//! sizing persists in the shared layouting info.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::model::{Beat, Voice};

use super::beaming::BeamingHelper;
use super::constants::*;
use super::glyphs::GlyphGroup;
use super::layouting::BarLayoutingInfo;

/// One beat's laid-out glyph sub-trees.
pub struct BeatContainer<'a> {
    pub beat: &'a Beat,
    pub voice_index: usize,
    /// Offset relative to the owning voice container.
    pub x: f64,
    /// Full cell width including the inter-beat spacing.
    pub width: f64,
    /// Glyphs before the notes (accidentals, grace decorations).
    pub pre_notes: GlyphGroup,
    /// The note/rest glyphs themselves.
    pub on_notes: GlyphGroup,
    /// Horizontal anchor for ties and slurs, relative to the on-notes
    /// group: glyph midpoint for empty beats, rest midpoint for rests,
    /// note-chord midpoint otherwise.
    pub center_x: f64,
    /// Decorations anchored to the beat (whammy curves, tremolo marks).
    pub ties: Vec<super::glyphs::Glyph>,
    pub beaming: Option<Rc<RefCell<BeamingHelper>>>,
}

impl<'a> BeatContainer<'a> {
    pub fn new(beat: &'a Beat, voice_index: usize) -> Self {
        Self {
            beat,
            voice_index,
            x: 0.0,
            width: 0.0,
            pre_notes: GlyphGroup::default(),
            on_notes: GlyphGroup::default(),
            center_x: 0.0,
            ties: Vec::new(),
            beaming: None,
        }
    }

    /// Position the sub-trees and compute the cell width.
    pub fn do_layout(&mut self, scale: f64) {
        self.pre_notes.x = 0.0;
        self.on_notes.x = self.pre_notes.x + self.pre_notes.width;
        let content = self.on_notes.x + self.on_notes.width;
        self.width = if self.beat.empty {
            content.max(EMPTY_BEAT_WIDTH * scale)
        } else {
            content + BEAT_PADDING * scale
        };
        if self.center_x == 0.0 {
            self.center_x = self.on_notes.width / 2.0;
        }
    }

    /// Tie/slur anchor relative to the beat cell origin.
    pub fn on_time_x(&self) -> f64 {
        self.on_notes.x + self.center_x
    }

    /// Push the current stem position into the beaming helper.
    pub fn update_beaming_helper(&self, voice_x: f64) {
        if let Some(helper) = &self.beaming {
            helper
                .borrow_mut()
                .register_beat_line_x(self.beat.index, voice_x + self.x + self.on_time_x());
        }
    }

    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let x = cx + self.x;
        self.pre_notes.paint(x, cy, canvas);
        self.on_notes.paint(x, cy, canvas);
        for tie in &self.ties {
            tie.paint(x, cy, canvas);
        }
    }
}

/// One voice's laid-out beats within a bar.
pub struct VoiceContainer<'a> {
    pub voice: &'a Voice,
    /// Offset relative to the owning renderer.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Beat containers ordered by beat index.
    pub beat_glyphs: Vec<BeatContainer<'a>>,
}

impl<'a> VoiceContainer<'a> {
    pub fn new(voice: &'a Voice) -> Self {
        Self {
            voice,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            beat_glyphs: Vec::new(),
        }
    }

    pub fn add_glyph(&mut self, container: BeatContainer<'a>) {
        self.beat_glyphs.push(container);
    }

    /// Lay the beats out left-to-right at their natural widths.
    pub fn do_layout(&mut self, scale: f64) {
        let mut x = 0.0;
        for container in &mut self.beat_glyphs {
            container.x = x;
            container.do_layout(scale);
            x += container.width;
        }
        self.width = x;
        self.register_beaming();
    }

    /// Contribute this voice's per-beat widths into the shared record.
    pub fn register_layouting_info(&self, info: &mut BarLayoutingInfo) {
        for container in &self.beat_glyphs {
            info.update_min_beat_width(container.beat.index, container.width);
        }
    }

    /// Reposition every beat at the negotiated column widths.
    pub fn apply_layouting_info(&mut self, info: &BarLayoutingInfo) {
        let mut x = 0.0;
        for container in &mut self.beat_glyphs {
            container.x = x;
            let negotiated = info.min_beat_width(container.beat.index);
            container.width = negotiated.max(container.width);
            x += container.width;
        }
        self.width = x;
        self.register_beaming();
    }

    /// Stretch or compress the beat cells to a justified width.
    pub fn scale_to_width(&mut self, width: f64) {
        if self.width <= 0.0 {
            self.width = width;
            return;
        }
        let factor = width / self.width;
        for container in &mut self.beat_glyphs {
            container.x *= factor;
            container.width *= factor;
        }
        self.width = width;
        self.register_beaming();
    }

    fn register_beaming(&self) {
        for container in &self.beat_glyphs {
            container.update_beaming_helper(self.x);
        }
    }

    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        for container in &self.beat_glyphs {
            container.paint(cx + self.x, cy + self.y, canvas);
        }
    }
}
