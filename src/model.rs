//! Data model for the score content consumed by the layout engine.
//!
//! These structures capture the musical information the bar renderers
//! need: staves, bars, voices, beats and notes. The engine treats the
//! model as structurally valid and read-only for the duration of a
//! layout pass; importers populate it and own its validation rules.

use serde::{Deserialize, Serialize};

/// Rhythmic duration of a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    QuadrupleWhole,
    DoubleWhole,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneHundredTwentyEighth,
    TwoHundredFiftySixth,
}

impl Duration {
    /// Number of beam lines connecting beats of this duration
    /// (0 for quarter notes and longer).
    pub fn beam_count(&self) -> u32 {
        match self {
            Duration::Eighth => 1,
            Duration::Sixteenth => 2,
            Duration::ThirtySecond => 3,
            Duration::SixtyFourth => 4,
            Duration::OneHundredTwentyEighth => 5,
            Duration::TwoHundredFiftySixth => 6,
            _ => 0,
        }
    }

    /// Whether beats of this duration connect to neighbours with a beam.
    pub fn is_beamable(&self) -> bool {
        self.beam_count() > 0
    }
}

/// Kind of grace note attached to a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraceType {
    None,
    /// Played before the beat it ornaments.
    BeforeBeat,
    /// Played on the beat it ornaments.
    OnBeat,
}

/// Repeat-the-previous-bar marking replacing normal bar content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimileMark {
    None,
    /// This bar repeats the previous bar.
    Simple,
    /// First bar of a two-bar repeat group.
    FirstOfDouble,
    /// Second bar of a two-bar repeat group; must stay on the same
    /// line as the first.
    SecondOfDouble,
}

/// Clef at the start of a bar (standard notation staves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
    /// Percussion clef (no pitch reference).
    Neutral,
}

/// Chromatic accidental shown before a notehead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Flat,
    Natural,
    DoubleSharp,
    DoubleFlat,
}

/// Time signature of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: i32,
    pub denominator: i32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { numerator: 4, denominator: 4 }
    }
}

/// Pitch of a note on a standard staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pitch {
    /// Note name: A, B, C, D, E, F, G
    pub step: String,
    /// Octave number (middle C = C4)
    pub octave: i32,
}

impl Pitch {
    /// Absolute diatonic step index (C0 = 0), used for staff placement.
    pub fn step_index(&self) -> i32 {
        let step = match self.step.as_str() {
            "C" => 0,
            "D" => 1,
            "E" => 2,
            "F" => 3,
            "G" => 4,
            "A" => 5,
            "B" => 6,
            _ => 0,
        };
        self.octave * 7 + step
    }
}

/// A single note within a beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// String number for tablature staves (1 = top string line).
    pub string: Option<i32>,
    /// Fret number for tablature staves.
    pub fret: Option<i32>,
    /// Pitch for standard notation staves.
    pub pitch: Option<Pitch>,
    /// Staff-step line for percussion staves (0 = top line, resolved
    /// by the importer from the instrument articulation).
    pub percussion_line: Option<i32>,
    /// Accidental for standard notation staves.
    pub accidental: Option<Accidental>,
    /// Hidden notes keep their rhythmic role but produce no glyph.
    pub is_visible: bool,
}

impl Note {
    /// A tablature note on `string` at `fret`.
    pub fn fretted(string: i32, fret: i32) -> Self {
        Self {
            string: Some(string),
            fret: Some(fret),
            pitch: None,
            percussion_line: None,
            accidental: None,
            is_visible: true,
        }
    }

    /// A pitched note for standard notation staves.
    pub fn pitched(step: &str, octave: i32) -> Self {
        Self {
            string: None,
            fret: None,
            pitch: Some(Pitch { step: step.to_string(), octave }),
            percussion_line: None,
            accidental: None,
            is_visible: true,
        }
    }

    /// A percussion note on the given staff-step line.
    pub fn percussion(line: i32) -> Self {
        Self {
            string: None,
            fret: None,
            pitch: None,
            percussion_line: Some(line),
            accidental: None,
            is_visible: true,
        }
    }
}

/// A rhythmic event (notes or rest) within a voice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Position of this beat within its voice.
    pub index: usize,
    pub duration: Duration,
    /// Number of augmentation dots.
    pub dots: u8,
    pub grace_type: GraceType,
    /// Tremolo picking speed, if the beat is tremolo picked.
    pub tremolo_speed: Option<Duration>,
    /// Whether a whammy-bar dive is attached to this beat.
    pub whammy_bar: bool,
    /// Placeholder beats mark a voice as having no playable content
    /// while keeping the bar present (an empty voice carries exactly
    /// one such beat).
    pub empty: bool,
    pub notes: Vec<Note>,
}

impl Beat {
    pub fn new(index: usize, duration: Duration) -> Self {
        Self {
            index,
            duration,
            dots: 0,
            grace_type: GraceType::None,
            tremolo_speed: None,
            whammy_bar: false,
            empty: false,
            notes: Vec::new(),
        }
    }

    /// A rest of the given duration.
    pub fn rest(index: usize, duration: Duration) -> Self {
        Self::new(index, duration)
    }

    /// The placeholder beat of an empty voice.
    pub fn placeholder(index: usize) -> Self {
        let mut beat = Self::new(index, Duration::Whole);
        beat.empty = true;
        beat
    }

    /// Whether this beat is an explicit rest (no notes, not a placeholder).
    pub fn is_rest(&self) -> bool {
        self.notes.is_empty() && !self.empty
    }

    pub fn is_grace(&self) -> bool {
        self.grace_type != GraceType::None
    }
}

/// An independent rhythmic line within a bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    /// Position of this voice within its bar (0 = primary voice).
    pub index: usize,
    pub beats: Vec<Beat>,
}

impl Voice {
    pub fn new(index: usize) -> Self {
        Self { index, beats: Vec::new() }
    }

    /// A voice is empty when it holds no playable content at all.
    pub fn is_empty(&self) -> bool {
        self.beats.iter().all(|b| b.empty)
    }
}

/// One measure of music on one stave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Position of this bar within its staff.
    pub index: usize,
    pub clef: Clef,
    pub time_signature: TimeSignature,
    pub simile_mark: SimileMark,
    pub voices: Vec<Voice>,
}

impl Bar {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            clef: Clef::Treble,
            time_signature: TimeSignature::default(),
            simile_mark: SimileMark::None,
            voices: Vec::new(),
        }
    }

    /// A bar is structurally empty when every voice is empty.
    pub fn is_empty(&self) -> bool {
        self.voices.iter().all(|v| v.is_empty())
    }
}

/// Notation kind of a staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffKind {
    Standard,
    Tab,
    Percussion,
    Slash,
}

/// One horizontal notation track for an instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    /// Position of this staff within its track.
    pub index: usize,
    pub kind: StaffKind,
    /// Open-string MIDI numbers for tablature staves, ordered from the
    /// top string line down. Empty for non-tab staves.
    pub string_tuning: Vec<i32>,
    pub bars: Vec<Bar>,
}

impl Staff {
    pub fn new(index: usize, kind: StaffKind) -> Self {
        Self {
            index,
            kind,
            string_tuning: Vec::new(),
            bars: Vec::new(),
        }
    }

    /// Number of string lines a tablature staff renders.
    pub fn string_count(&self) -> usize {
        self.string_tuning.len()
    }
}

/// An instrument with one or more staves (e.g. standard + tab).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub index: usize,
    pub name: String,
    pub staves: Vec<Staff>,
}

impl Track {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            staves: Vec::new(),
        }
    }
}

/// A complete score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub title: Option<String>,
    pub tracks: Vec<Track>,
}

impl Score {
    pub fn new() -> Self {
        Self { title: None, tracks: Vec::new() }
    }

    /// Number of bars in the longest staff of the score.
    pub fn bar_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|t| t.staves.iter())
            .map(|s| s.bars.len())
            .max()
            .unwrap_or(0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}
