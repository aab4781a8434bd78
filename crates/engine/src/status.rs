// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System status and snapshot payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wk_adapters::{BackupStats, MirrorHealth};
use wk_core::{Action, CrossLayerReport, WorldRules, WorldState};
use wk_storage::MirrorCounters;

/// Availability of one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub available: bool,
    /// Persisted records
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreStatus {
    pub(crate) fn from_count<E: std::fmt::Display>(count: Result<usize, E>) -> Self {
        match count {
            Ok(count) => Self {
                available: true,
                count,
                error: None,
            },
            Err(e) => Self {
                available: false,
                count: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatuses {
    pub blueprint: StoreStatus,
    pub actions: StoreStatus,
    pub states: StoreStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub buffered: usize,
    pub capacity: usize,
    pub error_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub checked_at: DateTime<Utc>,
    pub data_dir: String,
    /// Every store is available
    pub healthy: bool,
    pub stores: StoreStatuses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_state_version: Option<u64>,
    pub mirror: MirrorHealth,
    /// Mirrored and pending writes, keyed by store
    pub mirror_ledger: BTreeMap<String, MirrorCounters>,
    pub backup: BackupStats,
    pub logs: LogSummary,
}

/// Point-in-time export of all three stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSnapshot {
    pub created_at: DateTime<Utc>,
    pub rules: WorldRules,
    pub actions: Vec<Action>,
    pub state: WorldState,
    pub consistency: CrossLayerReport,
    /// File the snapshot was written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
