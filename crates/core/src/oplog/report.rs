// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregates over buffered log entries

use super::entry::{LogEntry, LogLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error rate above which a report recommends investigation
pub const ERROR_RATE_THRESHOLD: f64 = 0.10;
/// Average duration above which an operation is called out as slow
pub const SLOW_OPERATION_MS: f64 = 2000.0;
/// Buffer fill ratio above which a report suggests exporting
pub const BUFFER_PRESSURE_RATIO: f64 = 0.9;
const RECENT_ERROR_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: usize,
    pub by_level: BTreeMap<String, usize>,
    pub by_layer: BTreeMap<String, usize>,
    /// Keyed by `layer.operation`
    pub by_operation: BTreeMap<String, usize>,
    /// Mean over entries that carry a duration
    pub average_duration_ms: Option<f64>,
    /// Share of entries at error level, in `[0, 1]`
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetrics {
    pub count: usize,
    pub min_duration_ms: Option<u64>,
    pub avg_duration_ms: Option<f64>,
    pub max_duration_ms: Option<u64>,
    /// Share of entries with an outcome that succeeded, in `[0, 1]`
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogReport {
    pub generated_at: DateTime<Utc>,
    pub buffered: usize,
    pub capacity: usize,
    pub stats: LogStats,
    pub performance: BTreeMap<String, OperationMetrics>,
    pub recent_errors: Vec<LogEntry>,
    pub recommendations: Vec<String>,
}

pub fn compute_stats<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> LogStats {
    let mut stats = LogStats::default();
    let mut errors = 0usize;
    let mut durations = Vec::new();

    for entry in entries {
        stats.total += 1;
        *stats
            .by_level
            .entry(entry.level.to_string())
            .or_default() += 1;
        *stats
            .by_layer
            .entry(entry.layer.to_string())
            .or_default() += 1;
        *stats.by_operation.entry(entry.operation_key()).or_default() += 1;
        if entry.level == LogLevel::Error {
            errors += 1;
        }
        if let Some(ms) = entry.duration_ms {
            durations.push(ms);
        }
    }

    if !durations.is_empty() {
        stats.average_duration_ms =
            Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64);
    }
    if stats.total > 0 {
        stats.error_rate = errors as f64 / stats.total as f64;
    }
    stats
}

pub fn compute_performance<'a>(
    entries: impl IntoIterator<Item = &'a LogEntry>,
) -> BTreeMap<String, OperationMetrics> {
    #[derive(Default)]
    struct Acc {
        count: usize,
        durations: Vec<u64>,
        outcomes: usize,
        successes: usize,
    }

    let mut by_key: BTreeMap<String, Acc> = BTreeMap::new();
    for entry in entries {
        let acc = by_key.entry(entry.operation_key()).or_default();
        acc.count += 1;
        if let Some(ms) = entry.duration_ms {
            acc.durations.push(ms);
        }
        if let Some(ok) = entry.success {
            acc.outcomes += 1;
            if ok {
                acc.successes += 1;
            }
        }
    }

    by_key
        .into_iter()
        .map(|(key, acc)| {
            let avg = (!acc.durations.is_empty())
                .then(|| acc.durations.iter().sum::<u64>() as f64 / acc.durations.len() as f64);
            let success_rate = if acc.outcomes == 0 {
                1.0
            } else {
                acc.successes as f64 / acc.outcomes as f64
            };
            let metrics = OperationMetrics {
                count: acc.count,
                min_duration_ms: acc.durations.iter().copied().min(),
                avg_duration_ms: avg,
                max_duration_ms: acc.durations.iter().copied().max(),
                success_rate,
            };
            (key, metrics)
        })
        .collect()
}

pub fn build_report(entries: &[LogEntry], capacity: usize, now: DateTime<Utc>) -> LogReport {
    let stats = compute_stats(entries);
    let performance = compute_performance(entries);

    let recent_errors: Vec<LogEntry> = entries
        .iter()
        .rev()
        .filter(|e| e.level == LogLevel::Error)
        .take(RECENT_ERROR_LIMIT)
        .cloned()
        .collect();

    let mut recommendations = Vec::new();
    if stats.error_rate > ERROR_RATE_THRESHOLD {
        recommendations.push(format!(
            "error rate is {:.1}% (above {:.0}%); investigate failing operations",
            stats.error_rate * 100.0,
            ERROR_RATE_THRESHOLD * 100.0
        ));
    }
    for (key, metrics) in &performance {
        if let Some(avg) = metrics.avg_duration_ms.filter(|avg| *avg > SLOW_OPERATION_MS) {
            recommendations.push(format!(
                "operation {key} averages {avg:.0}ms (above 2s); consider optimizing it"
            ));
        }
    }
    if !recent_errors.is_empty() {
        recommendations.push(format!(
            "{} recent error(s) recorded; review recentErrors",
            recent_errors.len()
        ));
    }
    if capacity > 0 && entries.len() as f64 >= capacity as f64 * BUFFER_PRESSURE_RATIO {
        recommendations.push(format!(
            "log buffer holds {}/{} entries; export logs or raise logger.buffer_capacity",
            entries.len(),
            capacity
        ));
    }

    LogReport {
        generated_at: now,
        buffered: entries.len(),
        capacity,
        stats,
        performance,
        recent_errors,
        recommendations,
    }
}
