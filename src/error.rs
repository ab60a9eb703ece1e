use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A part the caller asked for is not in the package.
    #[error("missing part: {0}")]
    MissingPart(String),

    #[error("invalid DOCX: {0}")]
    InvalidDocx(String),

    #[error("invalid value {value:?} for {element}@{attribute}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement { expected: String, found: String },
}
