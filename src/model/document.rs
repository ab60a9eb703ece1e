use std::collections::BTreeMap;

use super::{Body, TextContainer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteKind {
    Footnote,
    Endnote,
}

impl NoteKind {
    pub fn part_path(self) -> &'static str {
        match self {
            NoteKind::Footnote => crate::package::FOOTNOTES_PART,
            NoteKind::Endnote => crate::package::ENDNOTES_PART,
        }
    }

    /// Local name of the note element (`w:footnote`/`w:endnote`).
    pub fn element_name(self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Endnote => "endnote",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: String,
    /// `w:type` (`separator`, `continuationSeparator`, ...); `None` for regular notes.
    pub note_type: Option<String>,
    pub body: Body,
}

impl Note {
    pub fn is_separator(&self) -> bool {
        self.note_type.is_some()
    }
}

/// Everything parsed from a package: main body plus auxiliary parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub body: Body,
    /// Header bodies keyed by relationship id.
    pub headers: BTreeMap<String, Body>,
    pub footers: BTreeMap<String, Body>,
    pub footnotes: BTreeMap<String, Note>,
    pub endnotes: BTreeMap<String, Note>,
}

impl Document {
    pub fn get_text(&self) -> String {
        self.body.get_text()
    }

    pub fn paragraph_count(&self) -> usize {
        self.body.all_paragraphs().len()
    }

    pub fn footnote(&self, id: &str) -> Option<&Note> {
        self.footnotes.get(id)
    }

    pub fn endnote(&self, id: &str) -> Option<&Note> {
        self.endnotes.get(id)
    }
}
