//! Slash bar renderer: rhythm slashes on a single line.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{Canvas, MusicSymbol};
use crate::model::{Bar, Beat, Staff, Voice};
use crate::settings::Settings;

use super::bar::{BarRenderer, BarRendererBase};
use super::constants::*;
use super::containers::BeatContainer;
use super::glyphs::{rest_symbol, Glyph, GlyphKind};
use super::layouting::BarLayoutingInfo;

pub struct SlashBarRenderer<'a> {
    base: BarRendererBase<'a>,
    staff: &'a Staff,
}

impl<'a> SlashBarRenderer<'a> {
    pub fn new(
        staff: &'a Staff,
        bar: Option<&'a Bar>,
        settings: &'a Settings,
        layouting_info: Rc<RefCell<BarLayoutingInfo>>,
    ) -> Self {
        let mut base = BarRendererBase::new(bar, settings, layouting_info);
        let scale = settings.display.scale;
        // one line, with room for the slash body around it
        base.top_padding = (STAVE_PADDING + STAVE_LINE_SPACING) * scale;
        base.bottom_padding = (STAVE_PADDING + STAVE_LINE_SPACING) * scale;
        base.height = base.top_padding + base.bottom_padding;
        Self { base, staff }
    }

    fn line_y(&self) -> f64 {
        self.base.top_padding
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
            let rest = Glyph::new(
                self.line_y(),
                REST_WIDTH * scale,
                GlyphKind::Symbol {
                    symbol: rest_symbol(beat.duration),
                    glyph_scale: scale,
                },
            );
            container.center_x = rest.width / 2.0;
            container.on_notes.add_glyph(rest);
        } else {
            let slash = Glyph::new(
                self.line_y(),
                NOTEHEAD_WIDTH * scale,
                GlyphKind::Symbol {
                    symbol: MusicSymbol::NoteheadSlash,
                    glyph_scale: scale,
                },
            );
            container.center_x = slash.width / 2.0;
            container.on_notes.add_glyph(slash);
            if beat.dots > 0 {
                container.on_notes.add_glyph(Glyph::space(DOT_SPACING * scale));
                for _ in 0..beat.dots {
                    container.on_notes.add_glyph(Glyph::new(
                        self.line_y() - STAVE_LINE_SPACING * scale,
                        DOT_RADIUS * scale * 2.0,
                        GlyphKind::Circle { radius: DOT_RADIUS * scale },
                    ));
                }
            }
        }
        container
    }
}

impl<'a> BarRenderer<'a> for SlashBarRenderer<'a> {
    fn base(&self) -> &BarRendererBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BarRendererBase<'a> {
        &mut self.base
    }

    fn create_pre_beat_glyphs(&mut self) {
        self.base.record_line_start();
        let scale = self.base.scale();
        if self.show_time_signature() {
            if let Some(bar) = self.base.bar {
                self.base.add_pre_beat_glyph(Glyph::new(
                    self.line_y() - STAVE_LINE_SPACING * scale,
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
        self.base.add_post_beat_glyph(Glyph::new(
            self.line_y() - STAVE_LINE_SPACING * scale,
            BAR_SEPARATOR_WIDTH * scale,
            GlyphKind::BarSeparator { height: STAVE_LINE_SPACING * 2.0 * scale },
        ));
    }

    fn paint_background(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let base = &self.base;
        canvas.set_color(&base.settings.display.resources.stave_line_color);
        let y = cy + base.y + self.line_y();
        canvas.line(
            cx + base.x,
            y,
            cx + base.x + base.width,
            y,
            STAVE_LINE_WIDTH * base.scale(),
        );
    }
}
