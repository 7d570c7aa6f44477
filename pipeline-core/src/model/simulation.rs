use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::strategy::Strategy;
use super::table::{CellValue, MetricTable};

/// Column names of the published simulation artifact, in file order.
pub const SIMULATION_COLUMNS: [&str; 5] =
    ["strategy", "profit", "drawdown", "win_rate", "strategy_score"];

/// One synthetic Monte Carlo run for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrial {
    pub strategy: Strategy,
    pub profit: f64,
    /// Percentage.
    pub drawdown: f64,
    /// Percentage.
    pub win_rate: f64,
    pub strategy_score: f64,
}

/// Errors raised when a loaded table does not have the simulation shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrialParseError {
    #[error("Missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {row}: {source}")]
    UnknownStrategy {
        row: usize,
        source: super::strategy::UnknownStrategy,
    },

    #[error("Row {row}: column '{column}' is not numeric")]
    NonNumeric { row: usize, column: &'static str },
}

/// Ordered collection of trials, strategy-then-trial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationTable {
    trials: Vec<SimulationTrial>,
}

impl SimulationTable {
    pub fn new(trials: Vec<SimulationTrial>) -> Self {
        Self { trials }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationTrial> {
        self.trials.iter()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Serializes the table as CSV with a header row.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if self.trials.is_empty() {
            writer.write_record(SIMULATION_COLUMNS)?;
        }
        for trial in &self.trials {
            writer.serialize(trial)?;
        }
        writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }

    /// Reads a table previously loaded from the simulation artifact.
    ///
    /// Every label must be one of the known strategies and every metric cell
    /// numeric; otherwise the whole table is rejected.
    pub fn from_metric_table(table: &MetricTable) -> Result<Self, TrialParseError> {
        let [strategy_col, profit_col, drawdown_col, win_rate_col, score_col] =
            SIMULATION_COLUMNS;
        for column in SIMULATION_COLUMNS {
            if table.column_index(column).is_none() {
                return Err(TrialParseError::MissingColumn(column));
            }
        }

        let numeric = |row_index: usize, cell: Option<&CellValue>, column: &'static str| {
            cell.and_then(CellValue::as_f64)
                .ok_or(TrialParseError::NonNumeric {
                    row: row_index,
                    column,
                })
        };

        let mut trials = Vec::with_capacity(table.len());
        for (index, row) in table.rows().enumerate() {
            let label = row
                .get(strategy_col)
                .map(|cell| cell.to_string())
                .unwrap_or_default();
            let strategy = label
                .parse::<Strategy>()
                .map_err(|source| TrialParseError::UnknownStrategy { row: index, source })?;

            trials.push(SimulationTrial {
                strategy,
                profit: numeric(index, row.get(profit_col), profit_col)?,
                drawdown: numeric(index, row.get(drawdown_col), drawdown_col)?,
                win_rate: numeric(index, row.get(win_rate_col), win_rate_col)?,
                strategy_score: numeric(index, row.get(score_col), score_col)?,
            });
        }

        Ok(Self { trials })
    }
}

impl FromIterator<SimulationTrial> for SimulationTable {
    fn from_iter<I: IntoIterator<Item = SimulationTrial>>(iter: I) -> Self {
        Self {
            trials: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SimulationTable {
    type Item = &'a SimulationTrial;
    type IntoIter = std::slice::Iter<'a, SimulationTrial>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(strategy: Strategy, profit: f64) -> SimulationTrial {
        SimulationTrial {
            strategy,
            profit,
            drawdown: 10.0,
            win_rate: 60.0,
            strategy_score: 0.4 * 60.0 + 0.3 * profit + 0.2 * (profit / 10.0) - 1.0,
        }
    }

    #[test]
    fn csv_has_expected_header_and_rows() {
        let table = SimulationTable::new(vec![trial(Strategy::Trend, 100.0)]);
        let csv = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("strategy,profit,drawdown,win_rate,strategy_score")
        );
        assert!(lines.next().unwrap().starts_with("Trend,100.0,10.0,60.0,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_table_still_writes_header() {
        let csv = SimulationTable::default().to_csv_bytes().unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "strategy,profit,drawdown,win_rate,strategy_score\n"
        );
    }

    #[test]
    fn rejects_unknown_strategy_label() {
        let csv = "strategy,profit,drawdown,win_rate,strategy_score\nMomentum,1,5,60,20\n";
        let metric = MetricTable::from_csv_bytes(csv.as_bytes()).unwrap();
        let err = SimulationTable::from_metric_table(&metric).unwrap_err();
        assert!(matches!(err, TrialParseError::UnknownStrategy { row: 0, .. }));
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "strategy,profit,drawdown,win_rate\nTrend,1,5,60\n";
        let metric = MetricTable::from_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(
            SimulationTable::from_metric_table(&metric),
            Err(TrialParseError::MissingColumn("strategy_score"))
        );
    }

    #[test]
    fn rejects_non_numeric_metric() {
        let csv = "strategy,profit,drawdown,win_rate,strategy_score\nSwing,n/a,5,60,20\n";
        let metric = MetricTable::from_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(
            SimulationTable::from_metric_table(&metric),
            Err(TrialParseError::NonNumeric {
                row: 0,
                column: "profit"
            })
        );
    }
}
