//! Rendering tick spans for logs and CLI output.
//!
//! One tick is one second of governance time. Spans print the largest unit
//! that fits and the one below it, so a two-day delay reads `2d 0h`.

use gavel_types::Tick;

const UNITS: [(&str, u64); 4] = [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

/// Render a span such as a voting period or a timelock delay.
pub fn format_span(ticks: u64) -> String {
    let Some(first) = UNITS.iter().position(|(_, size)| ticks >= *size) else {
        return "0s".to_string();
    };
    UNITS[first..]
        .iter()
        .take(2)
        .scan(ticks, |rest, (suffix, size)| {
            let count = *rest / size;
            *rest %= size;
            Some(format!("{count}{suffix}"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// How long until `target` as seen from `now`: `in 2d 0h`, or `due` once
/// `now` has reached it.
pub fn format_until(target: Tick, now: Tick) -> String {
    if now >= target {
        return "due".to_string();
    }
    format!("in {}", format_span(target.value() - now.value()))
}
