//! Access to the parts of an OPC package.
//!
//! The parser never touches ZIP entries directly; it asks a [`PackageReader`]
//! for part XML, relationship maps and binary payloads. [`ZipPackage`] reads a
//! real `.docx`, [`MemoryPackage`] serves parts from memory.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";
pub const ENDNOTES_PART: &str = "word/endnotes.xml";

pub const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_TYPE_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
pub const REL_TYPE_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub const REL_TYPE_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
pub const REL_TYPE_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub target: String,
    pub rel_type: String,
    pub target_mode: Option<String>,
}

impl Relationship {
    pub fn is_external(&self) -> bool {
        self.target_mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("External"))
    }

    /// Last path segment of the relationship type URI, e.g. `image`.
    pub fn kind(&self) -> &str {
        self.rel_type.rsplit('/').next().unwrap_or(&self.rel_type)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Relationships {
    by_id: BTreeMap<String, Relationship>,
}

impl Relationships {
    pub fn parse(xml_content: &str) -> Result<Self> {
        let xml = roxmltree::Document::parse(xml_content)?;
        let mut by_id = BTreeMap::new();
        for node in xml.root_element().children() {
            if node.tag_name().name() != "Relationship" {
                continue;
            }
            let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) else {
                continue;
            };
            by_id.insert(
                id.to_string(),
                Relationship {
                    id: id.to_string(),
                    target: target.to_string(),
                    rel_type: node.attribute("Type").unwrap_or("").to_string(),
                    target_mode: node.attribute("TargetMode").map(String::from),
                },
            );
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    pub fn insert(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), rel);
    }

    pub fn by_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.by_id
            .values()
            .filter(move |r| r.rel_type == kind || r.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Source of package parts.
///
/// Implementations are read-only from the caller's point of view; lookups
/// that miss return `None` (or an empty map) rather than an error.
pub trait PackageReader {
    fn get_xml_content(&self, part_path: &str) -> Option<String>;

    fn get_binary_content(&self, path: &str) -> Option<Vec<u8>>;

    fn part_names(&self) -> Vec<String>;

    fn get_relationships(&self, rels_path: &str) -> Relationships {
        let Some(xml) = self.get_xml_content(rels_path) else {
            return Relationships::default();
        };
        match Relationships::parse(&xml) {
            Ok(rels) => rels,
            Err(e) => {
                log::warn!("Ignoring malformed relationships part {rels_path}: {e}");
                Relationships::default()
            }
        }
    }

    /// Relationships of a part, e.g. "word/header1.xml" → "word/_rels/header1.xml.rels".
    fn part_relationships(&self, part_path: &str) -> Relationships {
        self.get_relationships(&rels_path_for(part_path))
    }
}

pub fn rels_path_for(part_path: &str) -> String {
    let part_path = part_path.trim_start_matches('/');
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part_path}.rels"),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
///
/// `("word/document.xml", "media/image1.png")` → `word/media/image1.png`,
/// `("word/header1.xml", "../customXml/item1.xml")` → `customXml/item1.xml`,
/// absolute targets (`/word/media/x.png`) are taken from the package root.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let base = source_part
        .trim_start_matches('/')
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("");
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// A package backed by a ZIP archive.
pub struct ZipPackage<R: Read + Seek> {
    archive: RefCell<zip::ZipArchive<R>>,
}

impl ZipPackage<std::fs::File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        Self::new(file)
    }
}

impl<'a> ZipPackage<std::io::Cursor<&'a [u8]>> {
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        Self::new(std::io::Cursor::new(data))
    }
}

impl<R: Read + Seek> ZipPackage<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)
            .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }
}

impl<R: Read + Seek> PackageReader for ZipPackage<R> {
    fn get_xml_content(&self, part_path: &str) -> Option<String> {
        let bytes = self.get_binary_content(part_path)?;
        match String::from_utf8(bytes) {
            Ok(s) => Some(s.trim_start_matches('\u{feff}').to_string()),
            Err(_) => {
                log::warn!("Part {part_path} is not valid UTF-8");
                None
            }
        }
    }

    fn get_binary_content(&self, path: &str) -> Option<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut entry = archive.by_name(path.trim_start_matches('/')).ok()?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn part_names(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(|s| s.to_string())
            .collect()
    }
}

/// A package held entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryPackage {
    parts: HashMap<String, Vec<u8>>,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.parts
            .insert(path.trim_start_matches('/').to_string(), content.into());
    }

    /// Load every entry of a ZIP archive.
    pub fn from_zip<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
        let mut parts = HashMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_string(), data);
        }
        Ok(Self { parts })
    }
}

impl PackageReader for MemoryPackage {
    fn get_xml_content(&self, part_path: &str) -> Option<String> {
        let bytes = self.parts.get(part_path.trim_start_matches('/'))?;
        String::from_utf8(bytes.clone())
            .ok()
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
    }

    fn get_binary_content(&self, path: &str) -> Option<Vec<u8>> {
        self.parts.get(path.trim_start_matches('/')).cloned()
    }

    fn part_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parts.keys().cloned().collect();
        names.sort();
        names
    }
}
