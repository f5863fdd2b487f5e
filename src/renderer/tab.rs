//! Tablature bar renderer: fret numbers on string lines.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::{Bar, Beat, Duration, Note, Staff, Voice};
use crate::settings::{Settings, TabRhythmMode};

use super::bar::{BarRenderer, BarRendererBase};
use super::constants::*;
use super::containers::BeatContainer;
use super::glyphs::{rest_symbol, Glyph, GlyphKind, TabChordGlyph, TabNoteEntry};
use super::layouting::BarLayoutingInfo;

/// Rest placement on a tablature staff: (string line, vertical
/// correction). Eighth and sixteenth rests sit between the lines and
/// carry an extra offset.
fn tab_rest_line(duration: Duration) -> (f64, f64) {
    match duration {
        Duration::Whole => (2.0, 0.0),
        Duration::Eighth | Duration::Sixteenth => (2.0, 5.0),
        _ => (3.0, 0.0),
    }
}

pub struct TabBarRenderer<'a> {
    base: BarRendererBase<'a>,
    staff: &'a Staff,
}

impl<'a> TabBarRenderer<'a> {
    pub fn new(
        staff: &'a Staff,
        bar: Option<&'a Bar>,
        settings: &'a Settings,
        layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    ) -> Self {
        let mut base = BarRendererBase::new(bar, settings, layouting_info);
        let scale = settings.display.scale;
        let lines = staff.string_count().max(1);
        base.top_padding = STAVE_PADDING * scale;
        base.bottom_padding = STAVE_PADDING * scale;
        base.height = base.top_padding
            + (lines as f64 - 1.0) * STAVE_LINE_SPACING * scale
            + base.bottom_padding;
        Self { base, staff }
    }

    fn line_offset(&self) -> f64 {
        STAVE_LINE_SPACING * self.base.scale()
    }

    fn line_count(&self) -> usize {
        self.staff.string_count().max(1)
    }

    /// y of a string line (0 = top line), plus a correction in
    /// unscaled units.
    pub fn get_tab_y(&self, line: f64, correction: f64) -> f64 {
        self.base.top_padding + line * self.line_offset() + correction * self.base.scale()
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
        let settings = self.base.settings;
        let mut container = BeatContainer::new(beat, voice.index);

        if beat.empty {
            // placeholder beat: no glyphs, the anchor falls back to the
            // cell middle
        } else if beat.is_rest() {
            let (line, correction) = tab_rest_line(beat.duration);
            let y = self.get_tab_y(line, correction);
            let mut rest = Glyph::new(
                y,
                REST_WIDTH * scale,
                GlyphKind::Symbol {
                    symbol: rest_symbol(beat.duration),
                    glyph_scale: scale,
                },
            );
            rest.visible = settings.notation.show_tab_rests;
            container.center_x = rest.width / 2.0;
            container.on_notes.add_glyph(rest);
            if beat.dots > 0 && settings.notation.show_tab_rests {
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
            let is_grace = settings.notation.small_grace_tab_notes && beat.is_grace();
            let font_scale = if is_grace { GRACE_SCALE } else { 1.0 };
            let mut notes = Vec::new();
            let mut note_string_width = 0.0f64;
            for note in beat.notes.iter().filter(|n| n.is_visible) {
                let string = note.string.unwrap_or(1);
                let text = note.fret.unwrap_or(0).to_string();
                let width = text.len() as f64 * NOTE_NUMBER_DIGIT_WIDTH * scale * font_scale;
                note_string_width = note_string_width.max(width);
                notes.push(TabNoteEntry {
                    y: self.get_tab_y((string - 1) as f64, 4.0 * font_scale),
                    text,
                });
            }
            let chord = TabChordGlyph {
                notes,
                note_string_width,
                font_size: NOTE_NUMBER_FONT_SIZE * scale * font_scale,
            };
            container.center_x = note_string_width / 2.0;
            container
                .on_notes
                .add_glyph(Glyph::new(0.0, note_string_width, GlyphKind::TabChord(chord)));

            if let Some(speed) = beat.tremolo_speed {
                let (symbol, offset) = match speed {
                    Duration::ThirtySecond => (MusicSymbol::TremoloPickingThree, 10.0),
                    Duration::Sixteenth => (MusicSymbol::TremoloPickingTwo, 5.0),
                    _ => (MusicSymbol::TremoloPickingOne, 0.0),
                };
                let mut mark = Glyph::new(
                    -(TREMOLO_OVERFLOW - offset) * scale,
                    0.0,
                    GlyphKind::Symbol { symbol, glyph_scale: scale },
                );
                mark.x = TREMOLO_X_OFFSET * scale;
                container.ties.push(mark);
            }

            if beat.whammy_bar {
                let dive = Glyph::new(
                    self.get_tab_y(self.line_count() as f64 - 1.0, 4.0),
                    WHAMMY_WIDTH * scale,
                    GlyphKind::WhammyDive { height: WHAMMY_OVERFLOW * scale * 0.75 },
                );
                container.ties.push(dive);
            }

            if beat.dots > 0 && settings.notation.rhythm_mode != TabRhythmMode::Hidden {
                let y = self.get_tab_y(self.line_count() as f64, settings.notation.rhythm_height);
                container.on_notes.add_glyph(Glyph::space(DOT_SPACING * scale));
                for _ in 0..beat.dots {
                    container.on_notes.add_glyph(Glyph::new(
                        y,
                        DOT_RADIUS * scale * 2.0,
                        GlyphKind::Circle { radius: DOT_RADIUS * scale },
                    ));
                }
            }
        }
        container
    }
}

impl<'a> BarRenderer<'a> for TabBarRenderer<'a> {
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
            let clef_y = self.get_tab_y((self.line_count() as f64 - 1.0) / 2.0, 12.0);
            self.base.add_pre_beat_glyph(Glyph::new(
                clef_y,
                CLEF_WIDTH * scale,
                GlyphKind::Symbol { symbol: MusicSymbol::ClefTab, glyph_scale: scale },
            ));
        }
        if self.show_time_signature() {
            if let Some(bar) = self.base.bar {
                let signature_y = self.get_tab_y(1.0, 4.0);
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
        let scale = self.base.scale();
        for voice in &bar.voices {
            if !self.base.has_container_for(voice.index) {
                continue;
            }
            for beat in &voice.beats {
                let container = self.create_beat_container(voice, beat);
                if beat.tremolo_speed.is_some() {
                    self.base.register_overflow_top(TREMOLO_OVERFLOW * scale);
                }
                if beat.whammy_bar {
                    self.base.register_overflow_bottom(WHAMMY_OVERFLOW * scale);
                }
                self.base.add_beat_glyph(container);
            }
        }
    }

    fn create_post_beat_glyphs(&mut self) {
        let scale = self.base.scale();
        let height = (self.line_count() as f64 - 1.0) * self.line_offset();
        self.base.add_post_beat_glyph(Glyph::new(
            self.base.top_padding,
            BAR_SEPARATOR_WIDTH * scale,
            GlyphKind::BarSeparator { height },
        ));
    }

    fn paint_background(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let base = &self.base;
        canvas.set_color(&base.settings.display.resources.stave_line_color);
        for line in 0..self.line_count() {
            let y = cy + base.y + self.get_tab_y(line as f64, 0.0);
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
        let settings = self.base.settings;
        if settings.notation.rhythm_mode == TabRhythmMode::Hidden {
            return;
        }
        let scale = self.base.scale();
        canvas.set_color(&settings.display.resources.main_glyph_color);
        let stem_top = self.get_tab_y(self.line_count() as f64, 0.0);
        let stem_bottom = stem_top + settings.notation.rhythm_height * scale;
        let origin_x = cx + self.base.x;
        let origin_y = cy + self.base.y;
        for container in self.base.voice_containers() {
            for bc in &container.beat_glyphs {
                if bc.beat.is_rest() || bc.beat.empty {
                    continue;
                }
                let x = origin_x + container.x + bc.x + bc.on_time_x();
                canvas.line(x, origin_y + stem_top, x, origin_y + stem_bottom, STEM_WIDTH * scale);
                match settings.notation.rhythm_mode {
                    TabRhythmMode::ShowWithBeams => {
                        if let Some(helper) = &bc.beaming {
                            let helper = helper.borrow();
                            if helper.has_beams() && helper.is_start(bc.beat.index) {
                                if let (Some(min), Some(max)) = (helper.min_x(), helper.max_x()) {
                                    canvas.line(
                                        origin_x + min,
                                        origin_y + stem_bottom,
                                        origin_x + max,
                                        origin_y + stem_bottom,
                                        BEAM_THICKNESS * scale,
                                    );
                                }
                            }
                        }
                    }
                    TabRhythmMode::ShowWithBars => {
                        if bc.beat.duration.is_beamable() {
                            canvas.line(
                                x,
                                origin_y + stem_bottom,
                                x + DOT_SPACING * scale,
                                origin_y + stem_bottom,
                                BEAM_THICKNESS * scale,
                            );
                        }
                    }
                    TabRhythmMode::Hidden => {}
                }
            }
        }
    }

    fn get_note_y(&self, note: &Note) -> f64 {
        let string = note.string.unwrap_or(1);
        self.get_tab_y((string - 1) as f64, 0.0)
    }
}
