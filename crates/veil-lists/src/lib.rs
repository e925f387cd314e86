//! Veil Pattern List Compiler
//!
//! This crate compiles line-oriented host lists into a `PatternStore`.

pub mod optimizer;
pub mod parser;

pub use optimizer::{optimize_store, OptimizeStats};
pub use parser::{parse_line, parse_pattern_list, ListEntry, ParseStats, ParsedList};

/// Parse and optimize several lists into one store.
pub fn compile_lists<'a>(lists: impl IntoIterator<Item = &'a str>) -> (veil_core::PatternStore, ParseStats, OptimizeStats) {
    let mut store = veil_core::PatternStore::new();
    let mut totals = ParseStats::default();

    for text in lists {
        let parsed = parse_pattern_list(text);
        totals.lines += parsed.stats.lines;
        totals.comments += parsed.stats.comments;
        totals.entries += parsed.stats.entries;
        totals.skipped += parsed.stats.skipped;
        store.extend(parsed.store);
    }

    let optimized = optimize_store(&mut store);
    log::info!(
        "compiled {} entries into {} patterns ({} duplicates, {} skipped lines)",
        totals.entries,
        optimized.after,
        optimized.deduped,
        totals.skipped
    );
    (store, totals, optimized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_lists_merges_and_dedupes() {
        let (store, parse, optimize) = compile_lists(["a.example\nb.example\n", "! second\nA.example\n@@c.example\n"]);
        assert_eq!(store.blocked_hosts, vec!["a.example", "b.example"]);
        assert_eq!(store.allowed_hosts, vec!["c.example"]);
        assert_eq!(parse.entries, 4);
        assert_eq!(parse.comments, 1);
        assert_eq!(optimize.deduped, 1);
    }
}
