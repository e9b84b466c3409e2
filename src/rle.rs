/// A maximal run of one repeated symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub symbol: u8,
    /// Number of consecutive occurrences (at least 1)
    pub length: usize,
}

impl Run {
    pub fn new(symbol: u8, length: usize) -> Self {
        Self { symbol, length }
    }
}

/// Collapses `data` into maximal runs; adjacent runs never share a symbol.
pub fn collapse(data: &[u8]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &symbol in data {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.length += 1,
            _ => runs.push(Run::new(symbol, 1)),
        }
    }
    runs
}

/// Expands runs back into the symbol sequence, in order.
pub fn expand(runs: &[Run]) -> Vec<u8> {
    let total = runs.iter().map(|run| run.length).sum();
    let mut out = Vec::with_capacity(total);
    for run in runs {
        out.extend(std::iter::repeat(run.symbol).take(run.length));
    }
    out
}
