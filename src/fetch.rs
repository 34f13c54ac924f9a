use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use polars::prelude::*;
use suppaftp::FtpStream;
use suppaftp::types::FileType;
use tracing::{debug, info, warn};

use crate::error::GwascatError;

const HARMONISED_DIR: &str = "harmonised";
const HARMONISED_SUFFIX: &str = ".h.tsv.gz";
const NULL_TOKEN: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpLocation {
    pub host: String,
    pub path: String,
}

impl FtpLocation {
    // The catalog mirrors harmonised sumstats on an FTP server under the
    // same host and path as the HTTP download link.
    pub fn from_uri(uri: &str) -> Result<Self, GwascatError> {
        let Some((scheme, rest)) = uri.split_once("://") else {
            return Err(GwascatError::UnsupportedProtocol(uri.to_string()));
        };
        if !matches!(scheme, "http" | "https") {
            return Err(GwascatError::UnsupportedProtocol(uri.to_string()));
        }
        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host, format!("/{path}")),
            None => (rest, String::new()),
        };
        if host.is_empty() {
            return Err(GwascatError::UnsupportedProtocol(uri.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            path,
        })
    }
}

pub trait SumstatSource: Send + Sync {
    fn fetch_harmonised(&self, location: &FtpLocation) -> Result<Vec<u8>, GwascatError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FtpSumstatSource;

impl FtpSumstatSource {
    pub fn new() -> Self {
        Self
    }
}

impl SumstatSource for FtpSumstatSource {
    fn fetch_harmonised(&self, location: &FtpLocation) -> Result<Vec<u8>, GwascatError> {
        let addr = format!("{}:21", location.host);
        debug!("connecting to {addr}");
        let mut ftp =
            FtpStream::connect(&addr).map_err(|err| GwascatError::Ftp(err.to_string()))?;
        ftp.set_mode(suppaftp::Mode::ExtendedPassive);
        ftp.login("anonymous", "anonymous")
            .map_err(|err| GwascatError::Ftp(err.to_string()))?;
        ftp.transfer_type(FileType::Binary)
            .map_err(|err| GwascatError::Ftp(err.to_string()))?;

        let dir = format!("{}/{HARMONISED_DIR}", location.path);
        ftp.cwd(&dir)
            .map_err(|err| GwascatError::Ftp(err.to_string()))?;
        let names = ftp
            .nlst(None)
            .map_err(|err| GwascatError::Ftp(err.to_string()))?;
        let file = select_harmonised_file(names)?;
        info!("retrieving {file} from {}", location.host);

        let reader = ftp
            .retr_as_buffer(&file)
            .map_err(|err| GwascatError::Ftp(err.to_string()))?;
        if let Err(err) = ftp.quit() {
            warn!("failed to close FTP session gracefully: {err}");
        }
        Ok(reader.into_inner())
    }
}

pub fn select_harmonised_file(names: Vec<String>) -> Result<String, GwascatError> {
    let mut candidates: Vec<String> = names
        .into_iter()
        .filter(|name| name.ends_with(HARMONISED_SUFFIX))
        .collect();
    if candidates.len() != 1 {
        return Err(GwascatError::HarmonisedLayout {
            found: candidates.len(),
        });
    }
    Ok(candidates.remove(0))
}

pub fn decode_harmonised_tsv(bytes: &[u8]) -> Result<DataFrame, GwascatError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .map_err(|err| GwascatError::Ftp(err.to_string()))?;
    parse_sumstat_tsv(content)
}

fn parse_sumstat_tsv(content: Vec<u8>) -> Result<DataFrame, GwascatError> {
    CsvReadOptions::default()
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b'\t')
                .with_null_values(Some(NullValues::AllColumnsSingle(NULL_TOKEN.into()))),
        )
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()
        .map_err(|err| GwascatError::Dataframe(err.to_string()))
}
