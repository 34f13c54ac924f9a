use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GwascatError {
    #[error("invalid study accession: {0}")]
    InvalidStudyAccession(String),

    #[error("study not found in index: {0}")]
    StudyNotFound(String),

    #[error("ambiguous study accession {study}: {matches} index rows match")]
    AmbiguousStudy { study: String, matches: usize },

    #[error("invalid summary statistics location: {0}")]
    InvalidLocation(String),

    #[error("unsupported protocol for summary statistics download: {0}")]
    UnsupportedProtocol(String),

    #[error("expected exactly one .h.tsv.gz file under harmonised/, found {found}")]
    HarmonisedLayout { found: usize },

    #[error("FTP transfer failed: {0}")]
    Ftp(String),

    #[error("GWAS Catalog API request failed: {0}")]
    CatalogHttp(String),

    #[error("GWAS Catalog API returned status {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("unexpected study metadata shape: {0}")]
    MetadataShape(String),

    #[error("required column not found: {0}")]
    MissingColumn(String),

    #[error("dataframe operation failed: {0}")]
    Dataframe(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
