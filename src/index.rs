use polars::prelude::*;

use crate::domain::StudyAccession;
use crate::error::GwascatError;

pub const ACCESSION_COLUMN: &str = "STUDY ACCESSION";
pub const LOCATION_COLUMN: &str = "SUMMARY STATS LOCATION";

#[derive(Clone)]
pub struct StudyIndex {
    df: LazyFrame,
}

impl StudyIndex {
    // Catalog study index releases are tab-separated with single-quote
    // quoting around free-text fields.
    pub fn from_catalog_studies(path: &str) -> Result<Self, GwascatError> {
        let df = LazyCsvReader::new(path)
            .with_separator(b'\t')
            .with_quote_char(Some(b'\''))
            .with_has_header(true)
            .finish()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        Ok(Self { df })
    }

    pub fn find_study(&self, study: &StudyAccession) -> StudyIndex {
        let df = self
            .df
            .clone()
            .filter(col(ACCESSION_COLUMN).eq(lit(study.as_str())));
        StudyIndex { df }
    }

    pub fn find_sumstat(&self, study: &StudyAccession) -> Result<String, GwascatError> {
        let rows = self
            .find_study(study)
            .df
            .select([col(LOCATION_COLUMN)])
            .collect()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;

        match rows.height() {
            0 => Err(GwascatError::StudyNotFound(study.to_string())),
            1 => {
                let location = rows
                    .column(LOCATION_COLUMN)
                    .map_err(|err| GwascatError::Dataframe(err.to_string()))?
                    .str()
                    .map_err(|err| GwascatError::Dataframe(err.to_string()))?
                    .get(0)
                    .ok_or_else(|| {
                        GwascatError::InvalidLocation(format!(
                            "no summary stats location recorded for {study}"
                        ))
                    })?;
                Ok(location.to_string())
            }
            matches => Err(GwascatError::AmbiguousStudy {
                study: study.to_string(),
                matches,
            }),
        }
    }

    pub fn collect(&self) -> Result<DataFrame, GwascatError> {
        self.df
            .clone()
            .collect()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))
    }
}
