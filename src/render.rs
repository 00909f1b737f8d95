use itertools::Itertools;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// No typed character at this index yet
    Untyped,
    Correct,
    Incorrect,
}

/// One reference character with its diff classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub class: CharClass,
    pub caret: bool,
}

/// Classify every reference character against the typed text.
///
/// Typed characters past the end of the reference are not represented.
pub fn classify(reference: &str, typed: &str, cursor: usize, running: bool) -> Vec<Glyph> {
    let mut typed = typed.chars();
    reference
        .chars()
        .enumerate()
        .map(|(idx, ch)| {
            let class = match typed.next() {
                None => CharClass::Untyped,
                Some(t) if t == ch => CharClass::Correct,
                Some(_) => CharClass::Incorrect,
            };
            Glyph {
                ch,
                class,
                caret: running && idx == cursor,
            }
        })
        .collect()
}

pub fn classify_session(session: &Session) -> Vec<Glyph> {
    classify(
        session.reference(),
        session.typed(),
        session.cursor(),
        session.is_running(),
    )
}

/// A maximal run of glyphs sharing class and caret flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub class: CharClass,
    pub caret: bool,
    pub text: String,
}

pub fn runs(glyphs: &[Glyph]) -> Vec<Run> {
    glyphs
        .iter()
        .chunk_by(|g| (g.class, g.caret))
        .into_iter()
        .map(|((class, caret), group)| Run {
            class,
            caret,
            text: group.map(|g| g.ch).collect(),
        })
        .collect()
}
