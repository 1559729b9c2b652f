use leptos::*;

use crate::domain::drawing::{
    Drawing, DrawingId, DrawingSnapshot, DrawingTool, FibonacciRetracement, HorizontalLine, TrendLine,
};

/// Reactive drawing state for the current chart.
///
/// Every mutation goes through a signal, so effects reading the store re-run
/// right after the change. The store does no I/O.
#[derive(Debug, Clone, Copy)]
pub struct DrawingStore {
    active_tool: RwSignal<DrawingTool>,
    horizontal_lines: RwSignal<Vec<HorizontalLine>>,
    trend_lines: RwSignal<Vec<TrendLine>>,
    fibonacci_retracements: RwSignal<Vec<FibonacciRetracement>>,
}

impl Default for DrawingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingStore {
    pub fn new() -> Self {
        Self {
            active_tool: create_rw_signal(DrawingTool::None),
            horizontal_lines: create_rw_signal(Vec::new()),
            trend_lines: create_rw_signal(Vec::new()),
            fibonacci_retracements: create_rw_signal(Vec::new()),
        }
    }

    pub fn active_tool(&self) -> DrawingTool {
        self.active_tool.get()
    }

    pub fn active_tool_signal(&self) -> ReadSignal<DrawingTool> {
        self.active_tool.read_only()
    }

    pub fn set_active_tool(&self, tool: DrawingTool) {
        self.active_tool.set(tool);
    }

    pub fn horizontal_lines(&self) -> Vec<HorizontalLine> {
        self.horizontal_lines.get()
    }

    pub fn trend_lines(&self) -> Vec<TrendLine> {
        self.trend_lines.get()
    }

    pub fn fibonacci_retracements(&self) -> Vec<FibonacciRetracement> {
        self.fibonacci_retracements.get()
    }

    // Adding a drawing finishes the tool's job.

    pub fn add_horizontal_line(&self, line: HorizontalLine) {
        self.horizontal_lines.update(|lines| lines.push(line));
        self.active_tool.set(DrawingTool::None);
    }

    pub fn add_trend_line(&self, line: TrendLine) {
        self.trend_lines.update(|lines| lines.push(line));
        self.active_tool.set(DrawingTool::None);
    }

    pub fn add_fibonacci_retracement(&self, fib: FibonacciRetracement) {
        self.fibonacci_retracements.update(|fibs| fibs.push(fib));
        self.active_tool.set(DrawingTool::None);
    }

    pub fn add(&self, drawing: Drawing) {
        match drawing {
            Drawing::Horizontal(line) => self.add_horizontal_line(line),
            Drawing::Trend(line) => self.add_trend_line(line),
            Drawing::Fibonacci(fib) => self.add_fibonacci_retracement(fib),
        }
    }

    pub fn remove_horizontal_line(&self, id: &DrawingId) {
        remove_where(self.horizontal_lines, |line| &line.id == id);
    }

    pub fn remove_trend_line(&self, id: &DrawingId) {
        remove_where(self.trend_lines, |line| &line.id == id);
    }

    pub fn remove_fibonacci_retracement(&self, id: &DrawingId) {
        remove_where(self.fibonacci_retracements, |fib| &fib.id == id);
    }

    /// Remove a drawing of any kind.
    pub fn remove(&self, id: &DrawingId) {
        self.remove_horizontal_line(id);
        self.remove_trend_line(id);
        self.remove_fibonacci_retracement(id);
    }

    pub fn clear_all(&self) {
        self.horizontal_lines.set(Vec::new());
        self.trend_lines.set(Vec::new());
        self.fibonacci_retracements.set(Vec::new());
        self.active_tool.set(DrawingTool::None);
    }

    /// Re-key a drawing, e.g. once the backend has assigned its own id.
    /// Returns whether a drawing with `old` was found.
    pub fn replace_id(&self, old: &DrawingId, new: &DrawingId) -> bool {
        replace_where(self.horizontal_lines, |line| &mut line.id, old, new)
            || replace_where(self.trend_lines, |line| &mut line.id, old, new)
            || replace_where(self.fibonacci_retracements, |fib| &mut fib.id, old, new)
    }

    pub fn contains(&self, id: &DrawingId) -> bool {
        self.horizontal_lines.with(|lines| lines.iter().any(|l| &l.id == id))
            || self.trend_lines.with(|lines| lines.iter().any(|l| &l.id == id))
            || self.fibonacci_retracements.with(|fibs| fibs.iter().any(|f| &f.id == id))
    }

    /// Current drawings; tracked, so an effect calling this re-runs on change.
    pub fn snapshot(&self) -> DrawingSnapshot {
        DrawingSnapshot {
            horizontal_lines: self.horizontal_lines.get(),
            trend_lines: self.trend_lines.get(),
            fibonacci_retracements: self.fibonacci_retracements.get(),
        }
    }

    pub fn snapshot_untracked(&self) -> DrawingSnapshot {
        DrawingSnapshot {
            horizontal_lines: self.horizontal_lines.get_untracked(),
            trend_lines: self.trend_lines.get_untracked(),
            fibonacci_retracements: self.fibonacci_retracements.get_untracked(),
        }
    }

    pub fn len(&self) -> usize {
        self.horizontal_lines.with(Vec::len)
            + self.trend_lines.with(Vec::len)
            + self.fibonacci_retracements.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_where<T: 'static>(signal: RwSignal<Vec<T>>, matches: impl Fn(&T) -> bool) {
    // Skip the notification when nothing matches.
    if signal.with_untracked(|items| items.iter().any(&matches)) {
        signal.update(|items| items.retain(|item| !matches(item)));
    }
}

fn replace_where<T: 'static>(
    signal: RwSignal<Vec<T>>,
    id_of: impl Fn(&mut T) -> &mut DrawingId,
    old: &DrawingId,
    new: &DrawingId,
) -> bool {
    let mut found = false;
    signal.update(|items| {
        for item in items.iter_mut() {
            let id = id_of(item);
            if id == old {
                *id = new.clone();
                found = true;
            }
        }
    });
    found
}
