use polars::prelude::DataFrame;
use tracing::info;

use crate::domain::StudyAccession;
use crate::error::GwascatError;
use crate::fetch::{FtpLocation, SumstatSource, decode_harmonised_tsv};
use crate::index::StudyIndex;
use crate::store::{CacheStore, cache_entry_name};
use crate::sumstat::Sumstat;

#[derive(Clone)]
pub struct App<S: SumstatSource> {
    store: CacheStore,
    source: S,
}

impl<S: SumstatSource> App<S> {
    pub fn new(store: CacheStore, source: S) -> Self {
        Self { store, source }
    }

    pub fn fetch_sumstat(
        &self,
        index: &StudyIndex,
        study: &StudyAccession,
    ) -> Result<Sumstat, GwascatError> {
        let uri = index.find_sumstat(study)?;
        info!("resolved {study} to {uri}");
        let df = self.load_or_fetch(&uri)?;
        Ok(Sumstat::new(df))
    }

    // Explicit two-branch cache decision: a hit loads straight from disk,
    // a miss downloads, materializes, and loads the fresh entry. Both
    // branches return through the disk load.
    fn load_or_fetch(&self, uri: &str) -> Result<DataFrame, GwascatError> {
        let entry = cache_entry_name(uri)?;
        self.store.ensure_root()?;
        if self.store.contains(&entry) {
            info!("found sumstat under {}", self.store.entry_path(&entry));
            return self.store.load(&entry);
        }

        info!("no cached sumstat for {entry}, downloading");
        let location = FtpLocation::from_uri(uri)?;
        let compressed = self.source.fetch_harmonised(&location)?;
        let mut df = decode_harmonised_tsv(&compressed)?;
        let path = self.store.materialize(&entry, &mut df)?;
        info!("cache completed at {path}");
        self.store.load(&entry)
    }
}
