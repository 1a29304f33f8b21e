use crate::{args::APP_BANNER, config::RunConfig, metrics::RunSummary};

const KIB: u64 = 1 << 10;
const BYTE_UNITS: [&str; 7] = ["KB", "MB", "GB", "TB", "PB", "EB", "ZB"];

pub(crate) fn print_banner(config: &RunConfig) {
    println!("\n\t{}\n", APP_BANNER);
    println!("Target URL:\t{}", config.url);
    println!("Requests:\t{}", config.requests.get());
    println!("Concurrent:\t{}", config.concurrency.get());
    println!("Max errors:\t{}", config.error_limit);
    println!("Processors:\t{}\n", config.worker_threads);
}

pub(crate) fn print_waiting() {
    println!("Waiting for replies...\n");
}

pub(crate) fn print_summary(summary: &RunSummary) {
    println!("Replies:\t{}", summary.completed);
    println!("Total size:\t{}", format_bytes(summary.total_bytes));
    println!("Total time:\t{:?}", summary.duration);
    println!("Average time:\t{:?}\n", summary.average());
}

/// Formats a byte count with binary units and two decimals, rounded half up, e.g. `14.65KB`.
pub(crate) fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{bytes}.00B");
    }

    let mut unit_size = KIB;
    let mut suffix = "KB";
    for (index, candidate) in BYTE_UNITS.iter().enumerate().skip(1) {
        let Some(next) = u32::try_from(index)
            .ok()
            .and_then(|exp| KIB.checked_pow(exp.saturating_add(1)))
        else {
            break;
        };
        if bytes < next {
            break;
        }
        unit_size = next;
        suffix = *candidate;
    }

    let mut whole = bytes.checked_div(unit_size).unwrap_or(0);
    let unit = u128::from(unit_size);
    let mut frac = u128::from(bytes.checked_rem(unit_size).unwrap_or(0))
        .saturating_mul(100)
        .saturating_add(unit.checked_div(2).unwrap_or(0))
        .checked_div(unit)
        .unwrap_or(0);
    // Rounding half up can carry into the whole part.
    if frac >= 100 {
        whole = whole.saturating_add(1);
        frac = 0;
    }
    format!("{whole}.{frac:02}{suffix}")
}
