use std::time::Duration;

use polars::prelude::*;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::info;

use crate::domain::StudyAccession;
use crate::error::GwascatError;

pub const DEFAULT_API_ENDPOINT: &str = "https://www.ebi.ac.uk/gwas/rest/api";

const LINK_FIELDS: [(&str, &str); 7] = [
    ("Associations", "associations"),
    ("AssociationsByStudySummary", "associationsByStudySummary"),
    ("BackgroundEfoTraits", "backgroundEfoTraits"),
    ("EfoTraits", "efoTraits"),
    ("Self", "self"),
    ("Snps", "snps"),
    ("Study", "study"),
];

pub trait CatalogApi: Send + Sync {
    fn fetch_study(&self, study: &StudyAccession) -> Result<Value, GwascatError>;
}

#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    endpoint: String,
}

impl CatalogHttpClient {
    pub fn new(endpoint: &str) -> Result<Self, GwascatError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gwascat/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GwascatError::CatalogHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| GwascatError::CatalogHttp(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Result<Value, GwascatError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| GwascatError::CatalogHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "GWAS Catalog API request failed".to_string());
            return Err(GwascatError::CatalogStatus { status, message });
        }
        response
            .json()
            .map_err(|err| GwascatError::CatalogHttp(err.to_string()))
    }
}

impl CatalogApi for CatalogHttpClient {
    // The API root advertises a templated studies URI; the template is
    // stripped before the per-study request.
    fn fetch_study(&self, study: &StudyAccession) -> Result<Value, GwascatError> {
        let root = self.get_json(&self.endpoint)?;
        let studies_uri = root["_links"]["studies"]["href"].as_str().ok_or_else(|| {
            GwascatError::MetadataShape("_links.studies.href missing from API root".to_string())
        })?;
        let studies_uri = strip_uri_template(studies_uri);
        info!("fetching study {study} from {studies_uri}");
        self.get_json(&format!("{studies_uri}/{study}"))
    }
}

pub fn strip_uri_template(uri: &str) -> String {
    let pattern = Regex::new(r"\{.*\}").unwrap();
    pattern.replace_all(uri, "").into_owned()
}

pub fn parse_study_metadata(metadata: &Value) -> Result<DataFrame, GwascatError> {
    let mut columns: Vec<Column> = Vec::new();
    for (column, field) in LINK_FIELDS {
        let href = metadata["_links"][field]["href"].as_str().ok_or_else(|| {
            GwascatError::MetadataShape(format!("_links.{field}.href missing"))
        })?;
        columns.push(Column::new(column.into(), [href]));
    }

    let accession = metadata["accessionId"]
        .as_str()
        .ok_or_else(|| GwascatError::MetadataShape("accessionId missing".to_string()))?;
    columns.push(Column::new("AccessionId".into(), [accession]));

    // The API reports the trait either as a plain string or nested under
    // diseaseTrait.trait depending on the endpoint version.
    let disease_trait = metadata["diseaseTrait"]
        .as_str()
        .or_else(|| metadata["diseaseTrait"]["trait"].as_str())
        .ok_or_else(|| GwascatError::MetadataShape("diseaseTrait missing".to_string()))?;
    columns.push(Column::new("DiseaseTrait".into(), [disease_trait]));

    let full_pvalue_set = metadata["fullPvalueSet"]
        .as_bool()
        .ok_or_else(|| GwascatError::MetadataShape("fullPvalueSet missing".to_string()))?;
    columns.push(Column::new("FullPvalueSet".into(), [full_pvalue_set]));

    DataFrame::new(columns).map_err(|err| GwascatError::Dataframe(err.to_string()))
}
