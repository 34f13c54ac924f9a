use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use polars::prelude::*;
use tracing::debug;

use crate::error::GwascatError;

#[derive(Debug, Clone)]
pub struct CacheStore {
    root: Utf8PathBuf,
}

impl CacheStore {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn ensure_root(&self) -> Result<(), GwascatError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| GwascatError::Filesystem(err.to_string()))
    }

    pub fn entry_path(&self, stem: &str) -> Utf8PathBuf {
        self.root.join(format!("{stem}.parquet"))
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.entry_path(stem).as_std_path().exists()
    }

    pub fn load(&self, stem: &str) -> Result<DataFrame, GwascatError> {
        let path = self.entry_path(stem);
        debug!("loading cached sumstat from {path}");
        LazyFrame::scan_parquet(path.as_std_path(), ScanArgsParquet::default())
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?
            .collect()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))
    }

    // An entry, once written, is final: no checksum and no staleness check.
    pub fn materialize(
        &self,
        stem: &str,
        df: &mut DataFrame,
    ) -> Result<Utf8PathBuf, GwascatError> {
        let mut content = Vec::new();
        ParquetWriter::new(&mut content)
            .finish(df)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let path = self.entry_path(stem);
        write_bytes_atomic(&path, &content)?;
        Ok(path)
    }
}

pub fn cache_entry_name(uri: &str) -> Result<String, GwascatError> {
    let stem = uri.rsplit('/').next().unwrap_or("");
    if stem.is_empty() {
        return Err(GwascatError::InvalidLocation(uri.to_string()));
    }
    Ok(stem.to_string())
}

pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), GwascatError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| GwascatError::Filesystem(err.to_string()))?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(tmp_path.as_std_path(), content)
        .map_err(|err| GwascatError::Filesystem(err.to_string()))?;
    fs::rename(tmp_path.as_std_path(), path.as_std_path())
        .map_err(|err| GwascatError::Filesystem(err.to_string()))?;
    Ok(())
}
