// src/progress.rs
use std::io::{self, Write};

/// Lightweight progress reporting used by long-running fetches.
/// Purely observational: nothing in the pipelines depends on what a sink does.
pub trait Progress {
    /// Called at the start of a phase with the number of items (if known).
    fn begin(&mut self, _label: &str, _total: usize) {}

    /// `completed` of `total` items are done.
    fn advance(&mut self, _completed: usize, _total: usize) {}

    /// Called at the end of a phase, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Lend an optional sink to a callee while keeping it for later phases.
pub fn reborrow<'a>(progress: &'a mut Option<&mut dyn Progress>) -> Option<&'a mut dyn Progress> {
    progress.as_mut().map(|p| &mut **p as &mut dyn Progress)
}

/// Single-line bar on stderr, redrawn in place.
pub struct ConsoleProgress {
    label: String,
    width: usize,
    active: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { label: s!(), width: 40, active: false }
    }

    fn draw(&self, completed: usize, total: usize) {
        let mut err = io::stderr().lock();
        let _ = write!(err, "\r{}", render_bar(&self.label, completed, total, self.width));
        let _ = err.flush();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, label: &str, total: usize) {
        self.label = s!(label);
        self.active = true;
        self.draw(0, total);
    }

    fn advance(&mut self, completed: usize, total: usize) {
        self.draw(completed, total);
    }

    fn finish(&mut self) {
        if self.active {
            eprintln!();
            self.active = false;
        }
    }
}

/// `label |████------| 40.0% (8/20)`
pub fn render_bar(label: &str, completed: usize, total: usize, width: usize) -> String {
    let completed = completed.min(total);
    let (pct, filled) = if total == 0 {
        (100.0, width)
    } else {
        (completed as f64 * 100.0 / total as f64, width * completed / total)
    };
    format!(
        "{label} |{}{}| {pct:.1}% ({completed}/{total})",
        "█".repeat(filled),
        "-".repeat(width - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(render_bar("fights", 2, 4, 4), "fights |██--| 50.0% (2/4)");
        assert_eq!(render_bar("fights", 4, 4, 4), "fights |████| 100.0% (4/4)");
    }

    #[derive(Default)]
    struct Labels(Vec<String>);

    impl Progress for Labels {
        fn begin(&mut self, label: &str, _total: usize) {
            self.0.push(s!(label));
        }
    }

    fn phase(label: &str, progress: Option<&mut dyn Progress>) {
        if let Some(p) = progress {
            p.begin(label, 1);
        }
    }

    #[test]
    fn one_sink_serves_several_phases() {
        let mut labels = Labels::default();
        let mut progress: Option<&mut dyn Progress> = Some(&mut labels);
        phase("fights", reborrow(&mut progress));
        phase("fighters", reborrow(&mut progress));
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        assert_eq!(labels.0, vec![s!("fights"), s!("fighters")]);

        let mut none: Option<&mut dyn Progress> = None;
        assert!(reborrow(&mut none).is_none());
    }

    #[test]
    fn bar_handles_empty_and_overshoot() {
        assert_eq!(render_bar("x", 0, 0, 3), "x |███| 100.0% (0/0)");
        assert_eq!(render_bar("x", 9, 3, 3), "x |███| 100.0% (3/3)");
    }
}
