use camino::Utf8Path;
use plotly::common::{Marker, Mode};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use polars::prelude::*;
use tracing::debug;

use crate::error::GwascatError;

pub const CHROMOSOME_COLUMN: &str = "chromosome";
pub const POSITION_COLUMN: &str = "base_pair_location";
pub const PVALUE_COLUMN: &str = "p_value";
pub const RSID_COLUMN: &str = "rsid";
pub const HM_VARIANT_ID_COLUMN: &str = "hm_variant_id";
pub const HM_CHROMOSOME_COLUMN: &str = "hm_chrom";
pub const HM_POSITION_COLUMN: &str = "hm_pos";
pub const NEGLOG_PVALUE_COLUMN: &str = "neglog_p_value";

const ORDER_KEY_COLUMN: &str = "chromosome_order";

// Fixed total order over chromosome labels; process-constant, not derived
// from input.
const CHROMOSOME_ORDER: [&str; 25] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "MT",
];

// Labels outside the fixed list have no rank and sort after every ranked
// chromosome.
pub fn chromosome_rank(label: &str) -> Option<u32> {
    CHROMOSOME_ORDER
        .iter()
        .position(|symbol| *symbol == label)
        .map(|idx| idx as u32 + 1)
}

#[derive(Debug, Clone)]
pub struct Sumstat {
    df: DataFrame,
}

impl Sumstat {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_df(self) -> DataFrame {
        self.df
    }

    fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    pub fn drop_nullable_variants(self) -> Result<Self, GwascatError> {
        let column = [RSID_COLUMN, HM_VARIANT_ID_COLUMN]
            .into_iter()
            .find(|name| self.has_column(name))
            .ok_or_else(|| {
                GwascatError::MissingColumn(format!("{RSID_COLUMN} or {HM_VARIANT_ID_COLUMN}"))
            })?;
        debug!("dropping rows with null {column}");
        let mask = self
            .df
            .column(column)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?
            .is_not_null();
        let df = self
            .df
            .filter(&mask)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        Ok(Self { df })
    }

    pub fn sort(self) -> Result<Self, GwascatError> {
        if self.has_column(HM_CHROMOSOME_COLUMN) && self.has_column(HM_POSITION_COLUMN) {
            let df = self
                .df
                .sort(
                    [HM_CHROMOSOME_COLUMN, HM_POSITION_COLUMN],
                    SortMultipleOptions::default(),
                )
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
            return Ok(Self { df });
        }
        if !self.has_column(CHROMOSOME_COLUMN) {
            return Err(GwascatError::MissingColumn(CHROMOSOME_COLUMN.to_string()));
        }
        if !self.has_column(POSITION_COLUMN) {
            return Err(GwascatError::MissingColumn(POSITION_COLUMN.to_string()));
        }

        let chromosome = self
            .df
            .column(CHROMOSOME_COLUMN)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        if chromosome.dtype() != &DataType::String {
            let df = self
                .df
                .sort(
                    [CHROMOSOME_COLUMN, POSITION_COLUMN],
                    SortMultipleOptions::default(),
                )
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
            return Ok(Self { df });
        }

        let order = {
            let labels = chromosome
                .str()
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
            let ranks: UInt32Chunked = labels
                .into_iter()
                .map(|label| label.and_then(chromosome_rank))
                .collect();
            ranks.with_name(ORDER_KEY_COLUMN.into()).into_series()
        };
        let mut df = self.df;
        df.with_column(order)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let df = df
            .sort(
                [ORDER_KEY_COLUMN, POSITION_COLUMN],
                SortMultipleOptions::default().with_nulls_last(true),
            )
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let df = df
            .drop(ORDER_KEY_COLUMN)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        Ok(Self { df })
    }

    pub fn neglog_pvalue(self) -> Result<Self, GwascatError> {
        if !self.has_column(PVALUE_COLUMN) {
            return Err(GwascatError::MissingColumn(PVALUE_COLUMN.to_string()));
        }
        let neglog = {
            let pvalues = self
                .df
                .column(PVALUE_COLUMN)
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?
                .cast(&DataType::Float64)
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
            let pvalues = pvalues
                .f64()
                .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
            // log10 of zero or a negative p-value degrades to inf/NaN
            // rather than failing; nulls stay null.
            pvalues
                .apply_values(|p| -p.log10())
                .with_name(NEGLOG_PVALUE_COLUMN.into())
                .into_series()
        };
        let mut df = self.df;
        df.with_column(neglog)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        Ok(Self { df })
    }

    pub fn manhattan(self, out: &Utf8Path) -> Result<(), GwascatError> {
        let view = self.drop_nullable_variants()?.sort()?.neglog_pvalue()?;

        let chromosome = view
            .df
            .column(CHROMOSOME_COLUMN)
            .map_err(|_| GwascatError::MissingColumn(CHROMOSOME_COLUMN.to_string()))?
            .cast(&DataType::String)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let labels = chromosome
            .str()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let positions = view
            .df
            .column(POSITION_COLUMN)
            .map_err(|_| GwascatError::MissingColumn(POSITION_COLUMN.to_string()))?
            .cast(&DataType::Float64)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let positions = positions
            .f64()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;
        let neglog = view
            .df
            .column(NEGLOG_PVALUE_COLUMN)
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?
            .f64()
            .map_err(|err| GwascatError::Dataframe(err.to_string()))?;

        // Rows are already in plotting order; consecutive rows with the
        // same label form one trace.
        let mut groups: Vec<(String, Vec<f64>, Vec<f64>)> = Vec::new();
        for idx in 0..view.df.height() {
            let (Some(label), Some(x), Some(y)) =
                (labels.get(idx), positions.get(idx), neglog.get(idx))
            else {
                continue;
            };
            match groups.last_mut() {
                Some((current, xs, ys)) if current == label => {
                    xs.push(x);
                    ys.push(y);
                }
                _ => groups.push((label.to_string(), vec![x], vec![y])),
            }
        }

        let mut plot = Plot::new();
        for (label, xs, ys) in groups {
            let trace = Scatter::new(xs, ys)
                .mode(Mode::Markers)
                .marker(Marker::new().size(4))
                .name(&label);
            plot.add_trace(trace);
        }
        let layout = Layout::new()
            .title("Manhattan plot".to_string())
            .x_axis(Axis::new().title("position".to_string()))
            .y_axis(Axis::new().title("-log10(p)".to_string()));
        plot.set_layout(layout);
        plot.write_html(out.as_std_path());
        Ok(())
    }
}
