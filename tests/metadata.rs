use assert_matches::assert_matches;
use gwascat::error::GwascatError;
use gwascat::metadata::parse_study_metadata;
use serde_json::json;

fn study_json() -> serde_json::Value {
    json!({
        "_links": {
            "associations": {"href": "https://api/studies/GCST001/associations"},
            "associationsByStudySummary": {"href": "https://api/studies/GCST001/associationsByStudySummary"},
            "backgroundEfoTraits": {"href": "https://api/studies/GCST001/backgroundEfoTraits"},
            "efoTraits": {"href": "https://api/studies/GCST001/efoTraits"},
            "self": {"href": "https://api/studies/GCST001"},
            "snps": {"href": "https://api/studies/GCST001/snps"},
            "study": {"href": "https://api/studies/GCST001"},
        },
        "accessionId": "GCST001",
        "diseaseTrait": {"trait": "Asthma"},
        "fullPvalueSet": true,
    })
}

#[test]
fn parse_metadata_flattens_to_single_row() {
    let df = parse_study_metadata(&study_json()).unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(df.width(), 10);

    let accession = df.column("AccessionId").unwrap().str().unwrap().get(0);
    assert_eq!(accession, Some("GCST001"));

    let disease_trait = df.column("DiseaseTrait").unwrap().str().unwrap().get(0);
    assert_eq!(disease_trait, Some("Asthma"));

    let full_pvalue_set = df.column("FullPvalueSet").unwrap().bool().unwrap().get(0);
    assert_eq!(full_pvalue_set, Some(true));

    let self_link = df.column("Self").unwrap().str().unwrap().get(0);
    assert_eq!(self_link, Some("https://api/studies/GCST001"));
}

#[test]
fn parse_metadata_accepts_plain_string_trait() {
    let mut value = study_json();
    value["diseaseTrait"] = json!("Asthma");
    let df = parse_study_metadata(&value).unwrap();
    let disease_trait = df.column("DiseaseTrait").unwrap().str().unwrap().get(0);
    assert_eq!(disease_trait, Some("Asthma"));
}

#[test]
fn parse_metadata_rejects_missing_link() {
    let mut value = study_json();
    value["_links"].as_object_mut().unwrap().remove("snps");
    let err = parse_study_metadata(&value).unwrap_err();
    assert_matches!(err, GwascatError::MetadataShape(_));
}

#[test]
fn parse_metadata_rejects_missing_accession() {
    let mut value = study_json();
    value.as_object_mut().unwrap().remove("accessionId");
    let err = parse_study_metadata(&value).unwrap_err();
    assert_matches!(err, GwascatError::MetadataShape(_));
}
