//! stafflib — bar-level layout and glyph composition engine for staff
//! and tablature notation.
//!
//! The engine lays out one bar per stave as a tree of positioned
//! glyphs, negotiates consistent beat spacing across the parallel
//! staves of a bar column, justifies bars to a requested line width,
//! paints through an abstract drawing surface, and derives the
//! interactive geometry used for hit-testing and cursor placement.
//!
//! # Example
//! ```
//! use stafflib::canvas::SvgCanvas;
//! use stafflib::model::{Bar, Beat, Duration, Note, Staff, StaffKind, Voice};
//! use stafflib::renderer::{BarColumn, TabBarRenderer};
//! use stafflib::settings::Settings;
//!
//! let mut staff = Staff::new(0, StaffKind::Tab);
//! staff.string_tuning = vec![64, 59, 55, 50, 45, 40];
//! let mut bar = Bar::new(0);
//! let mut voice = Voice::new(0);
//! let mut beat = Beat::new(0, Duration::Quarter);
//! beat.notes.push(Note::fretted(1, 3));
//! voice.beats.push(beat);
//! bar.voices.push(voice);
//! staff.bars.push(bar);
//!
//! let settings = Settings::default();
//! let mut column = BarColumn::new(0);
//! let renderer = TabBarRenderer::new(
//!     &staff,
//!     staff.bars.first(),
//!     &settings,
//!     column.layouting_info(),
//! );
//! column.add_renderer(Box::new(renderer));
//!
//! column.do_layout();
//! while column.align() {}
//! column.finalize();
//!
//! let mut canvas = SvgCanvas::new(400.0, 120.0);
//! column.paint(0.0, 0.0, &mut canvas);
//! assert!(canvas.build().starts_with("<svg"));
//! ```

pub mod canvas;
pub mod model;
pub mod renderer;
pub mod settings;

pub use canvas::{Canvas, Color, MusicSymbol, SvgCanvas};
pub use renderer::{
    BarColumn, BarLayoutingInfo, BarRenderer, BarRendererBase, BeatXPosition, BoundsLookup,
    PercussionBarRenderer, ScoreBarRenderer, SlashBarRenderer, TabBarRenderer,
};
pub use settings::Settings;
