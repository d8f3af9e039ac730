use indicatif::ProgressStyle;
use probr_core::scanner::ProgressCallback;
use std::sync::Arc;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn scan_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} Probing targets... {pos}/{len} sealed ({elapsed})")
        .map(|style| style.tick_strings(TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Styles the progress bar attached to `span`.
pub fn prepare(span: &Span) {
    span.pb_set_style(&scan_style());
}

/// Mirrors the sealed count onto the bar. Carries counts, never results.
pub fn progress_callback(span: Span) -> ProgressCallback {
    Arc::new(move |sealed: usize, total: usize| {
        span.pb_set_length(total as u64);
        span.pb_set_position(sealed as u64);
    })
}
