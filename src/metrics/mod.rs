//! Counters describing what a figure session did, convertible to log events.

use serde_json::json;

use crate::logging::{LogEvent, LogLevel, event_with, kv};

#[derive(Debug, Default, Clone)]
pub struct FigureMetrics {
    layouts_resolved: u64,
    panels_entered: u64,
    instructions_emitted: u64,
    scalebars_computed: u64,
    saves: u64,
}

impl FigureMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolve(&mut self) {
        self.layouts_resolved = self.layouts_resolved.saturating_add(1);
    }

    pub fn record_panel(&mut self) {
        self.panels_entered = self.panels_entered.saturating_add(1);
    }

    pub fn record_instructions(&mut self, count: usize) {
        if count > 0 {
            self.instructions_emitted = self.instructions_emitted.saturating_add(count as u64);
        }
    }

    pub fn record_scalebar(&mut self) {
        self.scalebars_computed = self.scalebars_computed.saturating_add(1);
    }

    pub fn record_save(&mut self) {
        self.saves = self.saves.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            layouts_resolved: self.layouts_resolved,
            panels_entered: self.panels_entered,
            instructions_emitted: self.instructions_emitted,
            scalebars_computed: self.scalebars_computed,
            saves: self.saves,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub layouts_resolved: u64,
    pub panels_entered: u64,
    pub instructions_emitted: u64,
    pub scalebars_computed: u64,
    pub saves: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        event_with(
            LogLevel::Info,
            target,
            "figure_metrics",
            [
                kv("layouts_resolved", json!(self.layouts_resolved)),
                kv("panels_entered", json!(self.panels_entered)),
                kv("instructions_emitted", json!(self.instructions_emitted)),
                kv("scalebars_computed", json!(self.scalebars_computed)),
                kv("saves", json!(self.saves)),
            ],
        )
    }
}
