use leptos::*;

use crate::domain::chart::ChartType;
use crate::domain::drawing::DrawingScope;
use crate::domain::market_data::{Symbol, TimeInterval};

/// Selected market, timeframe and chart style.
#[derive(Debug, Clone, Copy)]
pub struct TradingStore {
    symbol: RwSignal<Option<Symbol>>,
    timeframe: RwSignal<TimeInterval>,
    chart_type: RwSignal<ChartType>,
}

impl TradingStore {
    pub fn new(symbol: Option<Symbol>, timeframe: TimeInterval) -> Self {
        Self {
            symbol: create_rw_signal(symbol),
            timeframe: create_rw_signal(timeframe),
            chart_type: create_rw_signal(ChartType::Candlestick),
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol.get()
    }

    pub fn set_symbol(&self, symbol: Option<Symbol>) {
        self.symbol.set(symbol);
    }

    pub fn timeframe(&self) -> TimeInterval {
        self.timeframe.get()
    }

    pub fn set_timeframe(&self, timeframe: TimeInterval) {
        self.timeframe.set(timeframe);
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type.get()
    }

    pub fn set_chart_type(&self, chart_type: ChartType) {
        self.chart_type.set(chart_type);
    }

    /// Drawing scope for the current selection. Without a symbol the scope is
    /// incomplete and persistence skips it.
    pub fn scope_for(&self, user_id: &str) -> DrawingScope {
        let symbol = self.symbol.with(|s| s.as_ref().map(|s| s.value().to_string()).unwrap_or_default());
        DrawingScope::new(user_id, symbol, self.timeframe.get().as_wire_str())
    }
}
