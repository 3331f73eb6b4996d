//! Pure aggregation kernel. Operates on in-memory observation slices so the
//! windowing, tie-break and truncation rules are testable without a store.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{db::models::PriceObservationRow, shared::WeeklyWindow};

use super::models::PriceSummary;

/// Computes min/max/mean over the given observations, or `None` when there
/// are none. The mean is truncated toward zero, not rounded.
pub(crate) fn summarize<'a>(
    observations: impl IntoIterator<Item = &'a PriceObservationRow>,
) -> Option<PriceSummary> {
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    // Prices are bounded but histories are not; accumulate wide.
    let mut sum: i128 = 0;
    let mut count: i128 = 0;

    for observation in observations {
        let price = observation.price.as_i64();

        if price < min {
            min = price;
        }
        if price > max {
            max = price;
        }
        sum += price as i128;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(PriceSummary {
        min,
        max,
        avg: (sum / count) as i64,
    })
}

/// Selects the observation with the maximal `recorded_at`. Equal timestamps
/// are broken by the smallest observation id, so the result never depends on
/// scan order.
pub(crate) fn latest(observations: &[PriceObservationRow]) -> Option<&PriceObservationRow> {
    observations.iter().max_by(|a, b| {
        a.recorded_at
            .cmp(&b.recorded_at)
            .then_with(|| b.id.cmp(&a.id))
    })
}

/// Partitions observations by the UTC calendar date of `recorded_at` and
/// summarizes each partition. Dates without observations produce no entry.
pub(crate) fn daily_partitions(
    observations: &[PriceObservationRow],
) -> BTreeMap<NaiveDate, PriceSummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&PriceObservationRow>> = BTreeMap::new();

    for observation in observations {
        by_date
            .entry(observation.recorded_at.date_naive())
            .or_default()
            .push(observation);
    }

    by_date
        .into_iter()
        .filter_map(|(date, rows)| summarize(rows.iter().copied()).map(|summary| (date, summary)))
        .collect()
}

/// Summarizes observations inside the trailing window `(as_of - window,
/// as_of]`. The window slides with `as_of` and is not calendar-aligned.
pub(crate) fn window_summary(
    observations: &[PriceObservationRow],
    as_of: DateTime<Utc>,
    window: WeeklyWindow,
) -> Option<PriceSummary> {
    let start = as_of - window.as_duration();

    summarize(
        observations
            .iter()
            .filter(|observation| observation.recorded_at > start && observation.recorded_at <= as_of),
    )
}
