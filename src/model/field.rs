/// Field instruction keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Page,
    NumPages,
    SectionPages,
    Date,
    Time,
    Ref,
    PageRef,
    Hyperlink,
    Toc,
    Seq,
    MergeField,
    If,
    Other(String),
}

impl FieldType {
    /// Classify an instruction by its first word, case-insensitively.
    pub fn from_instruction(instruction: &str) -> Self {
        let keyword = instruction
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();
        match keyword.as_str() {
            "PAGE" => FieldType::Page,
            "NUMPAGES" => FieldType::NumPages,
            "SECTIONPAGES" => FieldType::SectionPages,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "REF" => FieldType::Ref,
            "PAGEREF" => FieldType::PageRef,
            "HYPERLINK" => FieldType::Hyperlink,
            "TOC" => FieldType::Toc,
            "SEQ" => FieldType::Seq,
            "MERGEFIELD" => FieldType::MergeField,
            "IF" => FieldType::If,
            _ => FieldType::Other(keyword),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    /// `fldChar` begin/separate/end spread over runs.
    #[default]
    Complex,
    /// `w:fldSimple`.
    Simple,
}

/// A computed field. Cached result text from the source is not kept.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub instruction: String,
    pub field_type: FieldType,
    /// `\x` switches with their argument, e.g. `\* MERGEFORMAT`, `\h`.
    pub switches: Vec<String>,
    pub kind: FieldKind,
    /// Complex fields nested inside this one's instruction.
    pub nested: Vec<Field>,
    pub dirty: bool,
    pub raw_xml: Option<String>,
}

impl Field {
    pub fn new(instruction: &str, kind: FieldKind) -> Self {
        let instruction = instruction.trim().to_string();
        Self {
            field_type: FieldType::from_instruction(&instruction),
            switches: parse_switches(&instruction),
            instruction,
            kind,
            nested: Vec::new(),
            dirty: false,
            raw_xml: None,
        }
    }

    /// First argument after the keyword, unquoted (`REF _Ref123 \h` → `_Ref123`).
    pub fn argument(&self) -> Option<String> {
        let rest = self.instruction.trim_start();
        let rest = rest.split_once(char::is_whitespace)?.1.trim_start();
        if rest.starts_with('\\') {
            return None;
        }
        if let Some(quoted) = rest.strip_prefix('"') {
            return quoted.split_once('"').map(|(arg, _)| arg.to_string());
        }
        rest.split_whitespace().next().map(String::from)
    }
}

fn parse_switches(instruction: &str) -> Vec<String> {
    let mut switches = Vec::new();
    let mut tokens = instruction.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if !token.starts_with('\\') {
            continue;
        }
        let mut switch = token.to_string();
        let takes_argument =
            matches!(token, "\\*" | "\\@" | "\\#" | "\\o" | "\\b" | "\\c" | "\\s" | "\\l");
        if takes_argument {
            if let Some(next) = tokens.next_if(|t| !t.starts_with('\\')) {
                switch.push(' ');
                switch.push_str(next);
            }
        }
        switches.push(switch);
    }
    switches
}
