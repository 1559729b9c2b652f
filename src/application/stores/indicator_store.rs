use leptos::*;

use crate::domain::market_data::{IndicatorConfig, IndicatorKind, Panel};

/// Indicators added to the chart, in insertion order.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorStore {
    indicators: RwSignal<Vec<IndicatorConfig>>,
}

impl Default for IndicatorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorStore {
    pub fn new() -> Self {
        Self { indicators: create_rw_signal(Vec::new()) }
    }

    /// Add an instance with the kind's defaults and return its id.
    pub fn add_indicator(&self, kind: IndicatorKind) -> String {
        let config = IndicatorConfig::with_defaults(kind);
        let id = config.id.clone();
        self.indicators.update(|list| list.push(config));
        id
    }

    pub fn remove_indicator(&self, id: &str) {
        self.indicators.update(|list| list.retain(|c| c.id != id));
    }

    pub fn toggle_visibility(&self, id: &str) {
        self.modify(id, |c| c.visible = !c.visible);
    }

    pub fn set_parameter(&self, id: &str, name: &str, value: f64) {
        self.modify(id, |c| {
            c.parameters.insert(name.to_string(), value);
        });
    }

    pub fn set_color(&self, id: &str, color: &str) {
        self.modify(id, |c| c.color = color.to_string());
    }

    pub fn get(&self, id: &str) -> Option<IndicatorConfig> {
        self.indicators.with(|list| list.iter().find(|c| c.id == id).cloned())
    }

    pub fn list(&self) -> Vec<IndicatorConfig> {
        self.indicators.get()
    }

    /// Visible indicators overlaid on the price series.
    pub fn main_panel(&self) -> Vec<IndicatorConfig> {
        self.visible_in(Panel::Main)
    }

    /// Visible indicators drawn in the sub-chart.
    pub fn lower_panel(&self) -> Vec<IndicatorConfig> {
        self.visible_in(Panel::Lower)
    }

    fn visible_in(&self, panel: Panel) -> Vec<IndicatorConfig> {
        self.indicators
            .with(|list| list.iter().filter(|c| c.visible && c.panel == panel).cloned().collect())
    }

    fn modify(&self, id: &str, f: impl FnOnce(&mut IndicatorConfig)) {
        self.indicators.update(|list| {
            if let Some(config) = list.iter_mut().find(|c| c.id == id) {
                f(config);
            }
        });
    }
}
