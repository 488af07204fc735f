use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfDarkError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document open error: {0}")]
    DocumentOpenError(String),

    #[error("Page render error: {0}")]
    PageRenderError(String),

    #[error("Empty input: {0}")]
    EmptyInputError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`PdfDarkError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl PdfDarkError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a document open error.
    document_open => DocumentOpenError,
    /// Create a page render error.
    page_render => PageRenderError,
    /// Create an empty input error.
    empty_input => EmptyInputError,
    /// Create a write error.
    write => WriteError,
}

impl From<lopdf::Error> for PdfDarkError {
    fn from(e: lopdf::Error) -> Self {
        Self::WriteError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfDarkError>;
