use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use super::strategy::Strategy;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{name} = {value} is outside the allowed range {min}..={max}")]
pub struct ThresholdError {
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Deployment thresholds, overridable per dashboard session.
///
/// Only `win_rate`, `profit_factor` and `risk_reward` are consulted by the
/// deployment gate; `max_drawdown` and `positive_days` are carried along and
/// persisted with the user's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Minimum average win rate (%).
    pub win_rate: f64,
    pub profit_factor: f64,
    pub risk_reward: f64,
    /// Maximum drawdown (%).
    pub max_drawdown: f64,
    pub positive_days: u32,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            win_rate: 55.0,
            profit_factor: 1.5,
            risk_reward: 2.0,
            max_drawdown: 15.0,
            positive_days: 3,
        }
    }
}

impl ThresholdSet {
    pub const WIN_RATE_RANGE: RangeInclusive<f64> = 50.0..=70.0;
    pub const PROFIT_FACTOR_RANGE: RangeInclusive<f64> = 1.0..=2.0;
    pub const RISK_REWARD_RANGE: RangeInclusive<f64> = 1.0..=3.0;
    pub const MAX_DRAWDOWN_RANGE: RangeInclusive<f64> = 5.0..=20.0;
    pub const POSITIVE_DAYS_RANGE: RangeInclusive<u32> = 1..=7;

    /// Checks operator input against the ranges the dashboards offer.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        check("win_rate", self.win_rate, Self::WIN_RATE_RANGE)?;
        check("profit_factor", self.profit_factor, Self::PROFIT_FACTOR_RANGE)?;
        check("risk_reward", self.risk_reward, Self::RISK_REWARD_RANGE)?;
        check("max_drawdown", self.max_drawdown, Self::MAX_DRAWDOWN_RANGE)?;
        let days = Self::POSITIVE_DAYS_RANGE;
        check(
            "positive_days",
            f64::from(self.positive_days),
            f64::from(*days.start())..=f64::from(*days.end()),
        )
    }
}

fn check(name: &'static str, value: f64, range: RangeInclusive<f64>) -> Result<(), ThresholdError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ThresholdError {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Trading style and risk settings saved from the user dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub trading_style: Strategy,
    pub risk_settings: ThresholdSet,
}

impl UserPreferences {
    pub fn new(trading_style: Strategy, risk_settings: ThresholdSet) -> Self {
        Self {
            trading_style,
            risk_settings,
        }
    }
}
