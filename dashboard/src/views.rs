//! Text rendering of the dashboard sections.
//!
//! Every section loads its own artifact; a failed load turns into a notice
//! inside that section and the remaining sections still render.

use pipeline_core::{
    ArtifactKind, LoadError, MetricTable, MetricTableLoader, PreferencesStore, SimulationTable,
    Strategy, ThresholdSet,
};
use std::fmt;
use strategy_lab::{evaluate, GateDecision, Selection};

use crate::args::DataMode;

/// Rows shown per table; the rest is summarized.
pub const MAX_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{}", self.body.trim_end())
    }
}

pub fn render(sections: &[Section]) -> String {
    sections
        .iter()
        .map(Section::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a table with padded columns, truncated to `max_rows`.
pub fn render_table(table: &MetricTable, max_rows: usize) -> String {
    if table.columns().is_empty() {
        return "(no data)\n".to_string();
    }

    let shown: Vec<Vec<String>> = table
        .rows()
        .take(max_rows)
        .map(|row| row.cells().iter().map(|cell| cell.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns().iter().map(String::len).collect();
    for row in &shown {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&format_line(table.columns().iter().map(String::as_str), &widths));
    out.push('\n');
    for row in &shown {
        out.push_str(&format_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    if table.len() > shown.len() {
        out.push_str(&format!("... {} more rows\n", table.len() - shown.len()));
    }
    out
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn notice(what: &str, err: &LoadError) -> String {
    if err.is_not_found() {
        format!("No {} found.", what)
    } else {
        format!("No {} available: {}", what, err)
    }
}

fn describe_selection(selection: &Selection, thresholds: &ThresholdSet) -> String {
    let metrics = &selection.metrics;
    let mut out = format!(
        "Best strategy: {} (score {:.2})\n\
         Average win rate {:.2}% (min {:.2}%), profit factor {:.2} (min {:.2}), risk/reward {:.2} (min {:.2})\n",
        selection.strategy,
        selection.mean_score,
        metrics.avg_win_rate,
        thresholds.win_rate,
        metrics.avg_profit_factor,
        thresholds.profit_factor,
        metrics.avg_risk_reward,
        thresholds.risk_reward
    );
    match &selection.decision {
        GateDecision::Approved => out.push_str("Verdict: cleared for live deployment\n"),
        GateDecision::Rejected(reason) => {
            out.push_str(&format!("Verdict: not deployable ({})\n", reason))
        }
    }
    out
}

async fn strategy_results_section(
    loader: &MetricTableLoader,
    thresholds: &ThresholdSet,
) -> Section {
    let title = "Strategy Simulation Results";
    let table = match loader.load(ArtifactKind::StrategyPerformance).await {
        Ok(table) => table,
        Err(e) => return Section::new(title, notice("strategy simulation results", &e)),
    };

    let mut body = render_table(&table, MAX_ROWS);
    match SimulationTable::from_metric_table(&table) {
        Ok(trials) => match evaluate(&trials, thresholds) {
            Some(selection) => {
                body.push('\n');
                body.push_str(&describe_selection(&selection, thresholds));
            }
            None => body.push_str("\nNo trials to rank.\n"),
        },
        Err(e) => body.push_str(&format!("\nCannot rank strategies: {}\n", e)),
    }
    Section::new(title, body)
}

async fn table_section(loader: &MetricTableLoader, kind: ArtifactKind, title: &str) -> Section {
    match loader.load(kind).await {
        Ok(table) => Section::new(title, render_table(&table, MAX_ROWS)),
        Err(e) => Section::new(title, notice(kind.describe(), &e)),
    }
}

fn thresholds_section(thresholds: &ThresholdSet) -> Section {
    Section::new(
        "Risk Control Settings",
        format!(
            "Win rate >= {:.2}%\nProfit factor >= {:.2}\nRisk/reward >= {:.2}\nMax drawdown {:.2}%\nPositive days {}",
            thresholds.win_rate,
            thresholds.profit_factor,
            thresholds.risk_reward,
            thresholds.max_drawdown,
            thresholds.positive_days
        ),
    )
}

/// Sections of the admin dashboard.
pub async fn admin_report(loader: &MetricTableLoader, thresholds: &ThresholdSet) -> Vec<Section> {
    vec![
        strategy_results_section(loader, thresholds).await,
        table_section(loader, ArtifactKind::MarketPerformance, "Market Performance Reports").await,
        thresholds_section(thresholds),
        table_section(
            loader,
            ArtifactKind::InferenceResults { live: true },
            "Live Inference Monitoring",
        )
        .await,
    ]
}

/// Sections of the user dashboard. Batch mode leaves the inference section
/// empty.
pub async fn user_report(
    loader: &MetricTableLoader,
    preferences: &PreferencesStore,
    mode: DataMode,
) -> Vec<Section> {
    let strategies = match loader.load(ArtifactKind::StrategyPerformance).await {
        Ok(_) => {
            let mut body = String::from("Trading styles: ");
            body.push_str(
                &Strategy::ALL
                    .iter()
                    .map(Strategy::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            body.push('\n');
            match preferences.load().await {
                Ok(saved) => body.push_str(&format!(
                    "Saved trading style: {}\n",
                    saved.trading_style
                )),
                Err(e) if e.is_not_found() => body.push_str("No saved preferences.\n"),
                Err(e) => body.push_str(&format!("Saved preferences unavailable: {}\n", e)),
            }
            body
        }
        Err(e) => notice("strategy simulation results", &e),
    };

    let inference_title = "Live Inference Monitoring";
    let inference = match mode {
        DataMode::Live => {
            table_section(
                loader,
                ArtifactKind::InferenceResults { live: true },
                inference_title,
            )
            .await
        }
        DataMode::Batch => Section::new(inference_title, ""),
    };

    vec![
        Section::new("Select Your Trading Strategy", strategies),
        table_section(loader, ArtifactKind::MarketPerformance, "Market Performance Reports").await,
        inference,
    ]
}
