use std::io::{self, Write};

use atom_tally::AtomCounts;

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

const MAX_DISTRIBUTION_ROWS: usize = 15;

/// Totals over a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub formulas: usize,
    pub parsed: usize,
    pub failed: usize,
    /// Every element seen, summed over all parsed formulas.
    pub combined: AtomCounts,
}

pub fn print_formula_summary(formula: &str, counts: &AtomCounts) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_formula_summary(&mut out, formula, counts);
}

pub fn print_element_distribution(counts: &AtomCounts) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_element_distribution(&mut out, "Element Distribution", counts);
}

pub fn print_batch_summary(stats: &BatchStats) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Formulas", format!("{}", stats.formulas)),
        ("Parsed", format!("{}", stats.parsed)),
        ("Failed", format!("{}", stats.failed)),
        ("Distinct Elements", format!("{}", stats.combined.len())),
        ("Total Atoms", format!("{}", stats.combined.total_atoms())),
    ];
    print_kv_table(&mut out, "Batch Summary", &rows);

    if !stats.combined.is_empty() {
        write_element_distribution(&mut out, "Combined Element Distribution", &stats.combined);
    }
}

fn write_formula_summary(out: &mut impl Write, formula: &str, counts: &AtomCounts) {
    let rows = vec![
        ("Formula", formula.to_string()),
        ("Compact", counts.to_string()),
        ("Elements", format!("{}", counts.len())),
        ("Total Atoms", format!("{}", counts.total_atoms())),
    ];
    print_kv_table(out, "Formula Summary", &rows);
}

fn write_element_distribution(out: &mut impl Write, title: &str, counts: &AtomCounts) {
    let mut sorted: Vec<(String, u64)> = counts
        .iter()
        .map(|(symbol, n)| (symbol.to_string(), n))
        .collect();
    // Largest first; ties stay alphabetical.
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    print_distribution_table(out, title, &sorted, counts.total_atoms());
}

fn print_distribution_table(out: &mut impl Write, title: &str, data: &[(String, u64)], total: u64) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Element", "Count", "Share",
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, count) in data.iter().take(MAX_DISTRIBUTION_ROWS) {
        let pct = if total == 0 {
            0.0
        } else {
            (*count as f64 / total as f64) * 100.0
        };
        let bar = make_bar(pct, max_bar_width);
        let dist_cell = format!("{}  {:>5.1}%", bar, pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            truncate(&count.to_string(), count_w),
            dist_cell,
        );
    }

    if data.len() > MAX_DISTRIBUTION_ROWS {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            "...",
            "...",
            format!("({} more elements)", data.len() - MAX_DISTRIBUTION_ROWS),
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 18usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
