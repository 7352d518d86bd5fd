//! Progress bars, hidden when stderr is not a terminal.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

fn is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Bar for paginated record fetching. Starts as a spinner; the query runner
/// sets the length once the server reports a total.
pub fn fetch_bar() -> ProgressBar {
    if !is_tty() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:<18.cyan} {pos:>6}/{len:6} {wide_bar:.green/dim}",
        )
        .expect("invalid template"),
    );
    bar.set_prefix("fetching samples");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Bar over a known item count (author resolution).
pub fn count_bar(len: u64, label: &str) -> ProgressBar {
    if !is_tty() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:<18.cyan} {pos:>6}/{len:6} {wide_bar:.green/dim}",
        )
        .expect("invalid template"),
    );
    bar.set_prefix(label.to_string());
    bar
}
