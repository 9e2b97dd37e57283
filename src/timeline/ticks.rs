use chrono::NaiveTime;

use super::viewport::Viewport;

/// Candidate ruler granularities in minutes, coarsest first.
pub const TICK_INTERVALS: [u32; 6] = [120, 60, 30, 15, 10, 5];

/// Finest interval whose on-screen spacing is still at least `min_spacing_px`.
///
/// Walks from the coarsest candidate towards finer ones and stops at the
/// first one that would crowd the ruler, so the result can only shrink as
/// `px_per_min` grows.
pub fn tick_interval(px_per_min: f64, min_spacing_px: f64) -> u32 {
    let mut chosen = TICK_INTERVALS[0];
    for &candidate in &TICK_INTERVALS[1..] {
        if px_per_min * f64::from(candidate) >= min_spacing_px {
            chosen = candidate;
        } else {
            break;
        }
    }
    chosen
}

/// Tick times covering the visible window, clipped to `[0, horizon]`.
pub fn tick_times(viewport: &Viewport, interval: u32) -> Vec<u32> {
    let step = f64::from(interval.max(1));
    let lo = viewport.start().max(0.0);
    let hi = viewport.end().min(viewport.horizon());

    let mut ticks = Vec::new();
    let mut t = (lo / step).ceil() * step;
    while t <= hi {
        ticks.push(t as u32);
        t += step;
    }
    ticks
}

/// Label every `k`-th tick so labels stay `min_spacing_px` apart.
///
/// The interval never gets coarser than two hours, so on multi-day
/// horizons tick lines are denser than their labels can be.
pub fn label_stride(px_per_min: f64, interval: u32, min_spacing_px: f64) -> usize {
    let spacing = px_per_min * f64::from(interval.max(1));
    if !spacing.is_finite() || spacing <= 0.0 {
        return 1;
    }
    ((min_spacing_px / spacing).ceil() as usize).max(1)
}

/// Whether `tick` carries a label for the given stride.
pub fn is_labelled(tick: u32, interval: u32, stride: usize) -> bool {
    let index = (tick / interval.max(1)) as usize;
    index % stride.max(1) == 0
}

/// `HH:MM` ruler label; times past the first day carry a `+Nd` suffix.
pub fn format_tick_label(minute: u32) -> String {
    let days = minute / 1440;
    let within_day = minute % 1440;
    let clock = NaiveTime::from_num_seconds_from_midnight_opt(within_day * 60, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();
    if days == 0 {
        clock
    } else {
        format!("{clock} +{days}d")
    }
}
