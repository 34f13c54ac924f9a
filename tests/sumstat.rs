use assert_matches::assert_matches;
use gwascat::error::GwascatError;
use gwascat::sumstat::{NEGLOG_PVALUE_COLUMN, Sumstat};
use polars::prelude::*;

fn chromosome_labels(df: &DataFrame) -> Vec<String> {
    df.column("chromosome")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|label| label.unwrap().to_string())
        .collect()
}

fn positions(df: &DataFrame) -> Vec<i64> {
    df.column("base_pair_location")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|pos| pos.unwrap())
        .collect()
}

#[test]
fn sort_orders_string_chromosomes() {
    let df = df!(
        "chromosome" => ["X", "2", "1", "MT", "10", "Y"],
        "base_pair_location" => [5i64, 1, 2, 9, 4, 7],
    )
    .unwrap();

    let sorted = Sumstat::new(df).sort().unwrap();
    assert_eq!(
        chromosome_labels(sorted.df()),
        vec!["1", "2", "10", "X", "Y", "MT"]
    );
}

#[test]
fn sort_orders_positions_within_chromosome() {
    let df = df!(
        "chromosome" => ["1", "2", "1", "1"],
        "base_pair_location" => [200i64, 50, 100, 300],
    )
    .unwrap();

    let sorted = Sumstat::new(df).sort().unwrap();
    assert_eq!(chromosome_labels(sorted.df()), vec!["1", "1", "1", "2"]);
    assert_eq!(positions(sorted.df()), vec![100, 200, 300, 50]);
}

#[test]
fn sort_places_unrecognized_labels_last() {
    let df = df!(
        "chromosome" => ["MT", "scaffold_17", "1"],
        "base_pair_location" => [1i64, 2, 3],
    )
    .unwrap();

    let sorted = Sumstat::new(df).sort().unwrap();
    assert_eq!(
        chromosome_labels(sorted.df()),
        vec!["1", "MT", "scaffold_17"]
    );
}

#[test]
fn sort_handles_numeric_chromosomes() {
    let df = df!(
        "chromosome" => [2i64, 1, 1],
        "base_pair_location" => [10i64, 30, 20],
    )
    .unwrap();

    let sorted = Sumstat::new(df).sort().unwrap();
    let chromosomes: Vec<i64> = sorted
        .df()
        .column("chromosome")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect();
    assert_eq!(chromosomes, vec![1, 1, 2]);
    assert_eq!(positions(sorted.df()), vec![20, 30, 10]);
}

#[test]
fn sort_prefers_harmonized_pair() {
    let df = df!(
        "chromosome" => ["1", "2"],
        "base_pair_location" => [1i64, 2],
        "hm_chrom" => [2i64, 1],
        "hm_pos" => [10i64, 20],
    )
    .unwrap();

    let sorted = Sumstat::new(df).sort().unwrap();
    let hm_chrom: Vec<i64> = sorted
        .df()
        .column("hm_chrom")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect();
    assert_eq!(hm_chrom, vec![1, 2]);
}

#[test]
fn sort_without_chromosome_columns_fails() {
    let df = df!("p_value" => [0.5f64]).unwrap();
    let err = Sumstat::new(df).sort().unwrap_err();
    assert_matches!(err, GwascatError::MissingColumn(_));
}

#[test]
fn neglog_pvalue_values() {
    let df = df!(
        "p_value" => [Some(0.01f64), Some(1.0), None],
    )
    .unwrap();

    let transformed = Sumstat::new(df).neglog_pvalue().unwrap();
    let neglog = transformed.df().column(NEGLOG_PVALUE_COLUMN).unwrap();
    let neglog = neglog.f64().unwrap();
    assert!((neglog.get(0).unwrap() - 2.0).abs() < 1e-12);
    assert!(neglog.get(1).unwrap().abs() < 1e-12);
    assert!(neglog.get(2).is_none());
}

#[test]
fn neglog_pvalue_requires_column() {
    let df = df!("chromosome" => ["1"]).unwrap();
    let err = Sumstat::new(df).neglog_pvalue().unwrap_err();
    assert_matches!(err, GwascatError::MissingColumn(_));
}

#[test]
fn drop_nullable_variants_removes_null_rsids() {
    let df = df!(
        "rsid" => [Some("rs1"), None, Some("rs3"), None],
        "p_value" => [0.1f64, 0.2, 0.3, 0.4],
    )
    .unwrap();

    let filtered = Sumstat::new(df).drop_nullable_variants().unwrap();
    assert_eq!(filtered.df().height(), 2);
    assert_eq!(filtered.df().column("rsid").unwrap().null_count(), 0);
}

#[test]
fn drop_nullable_variants_falls_back_to_harmonized_id() {
    let df = df!(
        "hm_variant_id" => [Some("1_100_A_G"), None],
        "p_value" => [0.1f64, 0.2],
    )
    .unwrap();

    let filtered = Sumstat::new(df).drop_nullable_variants().unwrap();
    assert_eq!(filtered.df().height(), 1);
}

#[test]
fn drop_nullable_variants_requires_identifier_column() {
    let df = df!("p_value" => [0.1f64]).unwrap();
    let err = Sumstat::new(df).drop_nullable_variants().unwrap_err();
    assert_matches!(err, GwascatError::MissingColumn(_));
}

#[test]
fn transform_chain_composes() {
    let df = df!(
        "chromosome" => ["2", "1", "1"],
        "base_pair_location" => [10i64, 300, 100],
        "p_value" => [0.01f64, 0.1, 1.0],
        "rsid" => [Some("rs1"), Some("rs2"), None],
    )
    .unwrap();

    let view = Sumstat::new(df)
        .drop_nullable_variants()
        .unwrap()
        .sort()
        .unwrap()
        .neglog_pvalue()
        .unwrap();

    assert_eq!(view.df().height(), 2);
    assert_eq!(chromosome_labels(view.df()), vec!["1", "2"]);
    let neglog = view.df().column(NEGLOG_PVALUE_COLUMN).unwrap();
    let neglog = neglog.f64().unwrap();
    assert!((neglog.get(0).unwrap() - 1.0).abs() < 1e-12);
    assert!((neglog.get(1).unwrap() - 2.0).abs() < 1e-12);
}
