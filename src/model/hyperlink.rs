use super::Run;

/// `w:hyperlink`: an external target (through `r:id`) or an internal bookmark.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hyperlink {
    pub rel_id: Option<String>,
    pub anchor: Option<String>,
    /// Resolved URL for external links.
    pub target: Option<String>,
    pub tooltip: Option<String>,
    pub runs: Vec<Run>,
}

impl Hyperlink {
    pub fn get_text(&self) -> String {
        self.runs.iter().map(Run::get_text).collect()
    }

    pub fn is_internal(&self) -> bool {
        self.target.is_none() && self.anchor.is_some()
    }
}
