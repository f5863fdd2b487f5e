//! Percussion bar renderer: noteheads on importer-resolved staff lines.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::{Bar, Beat, Duration, Note, Staff, Voice};
use crate::settings::Settings;

use super::bar::{BarRenderer, BarRendererBase};
use super::constants::*;
use super::containers::BeatContainer;
use super::glyphs::{rest_symbol, Glyph, GlyphKind, ScoreChordGlyph, ScoreNoteHead};
use super::layouting::BarLayoutingInfo;

pub struct PercussionBarRenderer<'a> {
    base: BarRendererBase<'a>,
    staff: &'a Staff,
}

impl<'a> PercussionBarRenderer<'a> {
    pub fn new(
        staff: &'a Staff,
        bar: Option<&'a Bar>,
        settings: &'a Settings,
        layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    ) -> Self {
        let mut base = BarRendererBase::new(bar, settings, layouting_info);
        let scale = settings.display.scale;
        base.top_padding = STAVE_PADDING * scale;
        base.bottom_padding = STAVE_PADDING * scale;
        base.height = base.top_padding
            + (SCORE_LINE_COUNT as f64 - 1.0) * STAVE_LINE_SPACING * scale
            + base.bottom_padding;
        Self { base, staff }
    }

    /// y of a staff step (0 = top line, counting down in half-line steps).
    pub fn get_percussion_y(&self, steps: i32) -> f64 {
        self.base.top_padding + steps as f64 * STAVE_LINE_SPACING * self.base.scale() / 2.0
    }

    fn show_time_signature(&self) -> bool {
        let bar = match self.base.bar {
            Some(bar) => bar,
            None => return false,
        };
        match bar.index.checked_sub(1).and_then(|i| self.staff.bars.get(i)) {
            Some(previous) => previous.time_signature != bar.time_signature,
            None => true,
        }
    }

    fn create_beat_container(&self, voice: &'a Voice, beat: &'a Beat) -> BeatContainer<'a> {
        let scale = self.base.scale();
        let mut container = BeatContainer::new(beat, voice.index);

        if beat.empty {
            // placeholder beat
        } else if beat.is_rest() {
            let steps = if beat.duration == Duration::Whole { 2 } else { 4 };
            let y = self.get_percussion_y(steps);
            let rest = Glyph::new(
                y,
                REST_WIDTH * scale,
                GlyphKind::Symbol {
                    symbol: rest_symbol(beat.duration),
                    glyph_scale: scale,
                },
            );
            container.center_x = rest.width / 2.0;
            container.on_notes.add_glyph(rest);
        } else {
            let mut heads = Vec::new();
            for note in beat.notes.iter().filter(|n| n.is_visible) {
                let steps = note.percussion_line.unwrap_or(4);
                heads.push(ScoreNoteHead {
                    y: self.get_percussion_y(steps),
                    symbol: MusicSymbol::NoteheadBlack,
                });
            }
            let width = NOTEHEAD_WIDTH * scale;
            let chord = ScoreChordGlyph { heads, stem_up: true, glyph_scale: scale };
            container.center_x = width / 2.0;
            container
                .on_notes
                .add_glyph(Glyph::new(0.0, width, GlyphKind::ScoreChord(chord)));
        }
        container
    }
}

impl<'a> BarRenderer<'a> for PercussionBarRenderer<'a> {
    fn base(&self) -> &BarRendererBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BarRendererBase<'a> {
        &mut self.base
    }

    fn create_pre_beat_glyphs(&mut self) {
        self.base.record_line_start();
        let scale = self.base.scale();
        if self.base.is_first_of_line() {
            let clef_y = self.get_percussion_y(4);
            self.base.add_pre_beat_glyph(Glyph::new(
                clef_y,
                CLEF_WIDTH * scale,
                GlyphKind::Symbol {
                    symbol: MusicSymbol::ClefPercussion,
                    glyph_scale: scale,
                },
            ));
        }
        if self.show_time_signature() {
            if let Some(bar) = self.base.bar {
                let signature_y = self.get_percussion_y(4);
                self.base.add_pre_beat_glyph(Glyph::new(
                    signature_y,
                    TIME_SIG_WIDTH * scale,
                    GlyphKind::TimeSignature {
                        numerator: bar.time_signature.numerator,
                        denominator: bar.time_signature.denominator,
                        font_size: TIME_SIG_FONT_SIZE * scale,
                    },
                ));
            }
        }
    }

    fn create_beat_glyphs(&mut self) {
        let bar = match self.base.bar {
            Some(bar) => bar,
            None => return,
        };
        for voice in &bar.voices {
            if !self.base.has_container_for(voice.index) {
                continue;
            }
            for beat in &voice.beats {
                let container = self.create_beat_container(voice, beat);
                self.base.add_beat_glyph(container);
            }
        }
    }

    fn create_post_beat_glyphs(&mut self) {
        let scale = self.base.scale();
        let height = (SCORE_LINE_COUNT as f64 - 1.0) * STAVE_LINE_SPACING * scale;
        self.base.add_post_beat_glyph(Glyph::new(
            self.base.top_padding,
            BAR_SEPARATOR_WIDTH * scale,
            GlyphKind::BarSeparator { height },
        ));
    }

    fn paint_background(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let base = &self.base;
        canvas.set_color(&base.settings.display.resources.stave_line_color);
        for line in 0..SCORE_LINE_COUNT {
            let y = cy + base.y + self.get_percussion_y(line as i32 * 2);
            canvas.line(
                cx + base.x,
                y,
                cx + base.x + base.width,
                y,
                STAVE_LINE_WIDTH * base.scale(),
            );
        }
    }

    fn get_note_y(&self, note: &Note) -> f64 {
        self.get_percussion_y(note.percussion_line.unwrap_or(4))
    }
}
