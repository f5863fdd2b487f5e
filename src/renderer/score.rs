//! Standard notation bar renderer: noteheads and rests on a five-line
//! staff.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::{Accidental, Bar, Beat, Clef, Duration, Note, Staff, Voice};
use crate::settings::Settings;

use super::bar::{BarRenderer, BarRendererBase};
use super::constants::*;
use super::containers::BeatContainer;
use super::glyphs::{
    notehead_symbol, rest_symbol, Glyph, GlyphKind, ScoreChordGlyph, ScoreNoteHead,
};
use super::layouting::BarLayoutingInfo;

/// Diatonic step index of the top staff line for each clef (C0 = 0).
fn top_line_step_index(clef: Clef) -> i32 {
    match clef {
        Clef::Treble => 38,  // F5
        Clef::Bass => 26,    // A3
        Clef::Alto => 32,    // G4
        Clef::Tenor => 30,   // E4
        Clef::Neutral => 38, // treated like treble for pitched content
    }
}

fn accidental_symbol(accidental: Accidental) -> MusicSymbol {
    match accidental {
        Accidental::Sharp => MusicSymbol::AccidentalSharp,
        Accidental::Flat => MusicSymbol::AccidentalFlat,
        Accidental::Natural => MusicSymbol::AccidentalNatural,
        Accidental::DoubleSharp => MusicSymbol::AccidentalDoubleSharp,
        Accidental::DoubleFlat => MusicSymbol::AccidentalDoubleFlat,
    }
}

pub struct ScoreBarRenderer<'a> {
    base: BarRendererBase<'a>,
    staff: &'a Staff,
}

impl<'a> ScoreBarRenderer<'a> {
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

    fn half_step(&self) -> f64 {
        STAVE_LINE_SPACING * self.base.scale() / 2.0
    }

    /// y of a staff step (0 = top line, counting down in half-line
    /// steps; negative values sit above the staff).
    pub fn get_score_y(&self, steps: i32) -> f64 {
        self.base.top_padding + steps as f64 * self.half_step()
    }

    fn note_steps(&self, note: &Note) -> i32 {
        let clef = self.base.bar.map_or(Clef::Treble, |b| b.clef);
        match &note.pitch {
            Some(pitch) => top_line_step_index(clef) - pitch.step_index(),
            None => 4,
        }
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
            // placeholder beat, anchor falls back to the cell middle
        } else if beat.is_rest() {
            // whole rests hang under the second line, all others sit on
            // the middle line
            let steps = if beat.duration == Duration::Whole { 2 } else { 4 };
            let y = self.get_score_y(steps);
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
            if beat.dots > 0 {
                container.on_notes.add_glyph(Glyph::space(DOT_SPACING * scale));
                for _ in 0..beat.dots {
                    container.on_notes.add_glyph(Glyph::new(
                        y,
                        DOT_RADIUS * scale * 2.0,
                        GlyphKind::Circle { radius: DOT_RADIUS * scale },
                    ));
                }
            }
        } else {
            let glyph_scale = if beat.is_grace() { scale * GRACE_SCALE } else { scale };
            let mut heads = Vec::new();
            let mut steps_sum = 0i32;
            for note in beat.notes.iter().filter(|n| n.is_visible) {
                let steps = self.note_steps(note);
                steps_sum += steps;
                let y = self.get_score_y(steps);
                if let Some(accidental) = note.accidental {
                    container.pre_notes.add_glyph(Glyph::new(
                        y,
                        ACCIDENTAL_WIDTH * scale,
                        GlyphKind::Symbol {
                            symbol: accidental_symbol(accidental),
                            glyph_scale,
                        },
                    ));
                }
                heads.push(ScoreNoteHead { y, symbol: notehead_symbol(beat.duration) });
            }
            let head_count = heads.len().max(1) as i32;
            // stems point up for chords sitting below the middle line
            let stem_up = steps_sum / head_count > 4;
            let width = NOTEHEAD_WIDTH * glyph_scale;
            let chord = ScoreChordGlyph { heads, stem_up, glyph_scale };
            let top_y = chord.head_span().0;
            container.center_x = width / 2.0;
            container
                .on_notes
                .add_glyph(Glyph::new(0.0, width, GlyphKind::ScoreChord(chord)));
            if beat.dots > 0 {
                container.on_notes.add_glyph(Glyph::space(DOT_SPACING * scale));
                for _ in 0..beat.dots {
                    container.on_notes.add_glyph(Glyph::new(
                        top_y,
                        DOT_RADIUS * scale * 2.0,
                        GlyphKind::Circle { radius: DOT_RADIUS * scale },
                    ));
                }
            }
        }
        container
    }
}

impl<'a> BarRenderer<'a> for ScoreBarRenderer<'a> {
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
            let clef = self.base.bar.map_or(Clef::Treble, |b| b.clef);
            let (symbol, steps) = match clef {
                Clef::Treble => (MusicSymbol::ClefG, 6),
                Clef::Bass => (MusicSymbol::ClefF, 2),
                Clef::Alto => (MusicSymbol::ClefC, 4),
                Clef::Tenor => (MusicSymbol::ClefC, 2),
                Clef::Neutral => (MusicSymbol::ClefPercussion, 4),
            };
            let clef_y = self.get_score_y(steps);
            self.base.add_pre_beat_glyph(Glyph::new(
                clef_y,
                CLEF_WIDTH * scale,
                GlyphKind::Symbol { symbol, glyph_scale: scale },
            ));
        }
        if self.show_time_signature() {
            if let Some(bar) = self.base.bar {
                let signature_y = self.get_score_y(4);
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
            let y = cy + base.y + self.get_score_y(line as i32 * 2);
            canvas.line(
                cx + base.x,
                y,
                cx + base.x + base.width,
                y,
                STAVE_LINE_WIDTH * base.scale(),
            );
        }
    }

    fn paint_decorations(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let scale = self.base.scale();
        canvas.set_color(&self.base.settings.display.resources.main_glyph_color);
        let origin_x = cx + self.base.x;
        let origin_y = cy + self.base.y;
        for container in self.base.voice_containers() {
            for bc in &container.beat_glyphs {
                if bc.beat.is_rest() || bc.beat.empty {
                    continue;
                }
                if bc.beat.duration == Duration::Whole
                    || bc.beat.duration == Duration::DoubleWhole
                    || bc.beat.duration == Duration::QuadrupleWhole
                {
                    continue;
                }
                let chord = bc.on_notes.glyphs.iter().find_map(|g| match &g.kind {
                    GlyphKind::ScoreChord(chord) => Some((g, chord)),
                    _ => None,
                });
                let (glyph, chord) = match chord {
                    Some(found) => found,
                    None => continue,
                };
                let (top, bottom) = chord.head_span();
                let stem_length = STEM_LENGTH * scale;
                let (stem_x, y1, y2) = if chord.stem_up {
                    (
                        container.x + bc.x + bc.on_notes.x + glyph.x + glyph.width,
                        bottom,
                        top - stem_length,
                    )
                } else {
                    (container.x + bc.x + bc.on_notes.x + glyph.x, top, bottom + stem_length)
                };
                canvas.line(
                    origin_x + stem_x,
                    origin_y + y1,
                    origin_x + stem_x,
                    origin_y + y2,
                    STEM_WIDTH * scale,
                );
                if let Some(helper) = &bc.beaming {
                    let helper = helper.borrow();
                    if helper.has_beams() && helper.is_start(bc.beat.index) {
                        if let (Some(min), Some(max)) = (helper.min_x(), helper.max_x()) {
                            let beam_y = origin_y + y2;
                            canvas.line(
                                origin_x + min,
                                beam_y,
                                origin_x + max,
                                beam_y,
                                BEAM_THICKNESS * scale,
                            );
                        }
                    }
                }
            }
        }
    }

    fn get_note_y(&self, note: &Note) -> f64 {
        self.get_score_y(self.note_steps(note))
    }
}
