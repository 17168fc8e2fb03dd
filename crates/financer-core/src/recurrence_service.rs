//! Materializes the due occurrences of periodical finances.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use financer_domain::Finance;

use crate::{Clock, CoreError, LedgerStore};

/// Outcome of one expansion pass.
#[derive(Debug, Clone, Default)]
pub struct ExpansionReport {
    /// Newly created occurrences, in generation order.
    pub generated: Vec<Finance>,
    /// Seeds whose stored recurrence group had to be filled in.
    pub relinked: Vec<Finance>,
}

impl ExpansionReport {
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.relinked.is_empty()
    }
}

/// Brings every recurrence series up to date with the current moment.
pub struct RecurrenceService;

impl RecurrenceService {
    /// Generates the missing occurrences of every periodical finance in `store` and commits
    /// them with a single save. A failed save rolls the store back.
    pub fn expand(
        store: &mut dyn LedgerStore,
        clock: &dyn Clock,
    ) -> Result<ExpansionReport, CoreError> {
        let finances = store.fetch_all()?;
        let report = Self::plan(&finances, clock.now());
        if report.is_empty() {
            debug!("no periodical finances due");
            return Ok(report);
        }

        if let Err(err) = Self::stage(store, &report).and_then(|()| store.save()) {
            warn!("expansion rolled back: {}", err);
            store.rollback();
            return Err(err);
        }

        info!(
            generated = report.generated.len(),
            relinked = report.relinked.len(),
            "periodical finances expanded"
        );
        Ok(report)
    }

    /// Computes the occurrences due at `now` without touching any store.
    pub fn plan(finances: &[Finance], now: DateTime<Utc>) -> ExpansionReport {
        let series = collect_series_entries(finances);
        let mut seeds: Vec<&Finance> = finances
            .iter()
            .filter(|finance| finance.is_recurrence_seed())
            .collect();
        seeds.sort_by_key(|finance| (finance.date, finance.id));

        let mut report = ExpansionReport::default();
        let mut visited = HashSet::new();
        for seed in seeds {
            let Some(group) = seed.recurrence_series() else {
                continue;
            };
            if !visited.insert(group) {
                debug!(seed = %seed.id, %group, "skipping second seed of recurrence group");
                continue;
            }
            let members = series.get(&group).map(Vec::as_slice).unwrap_or(&[]);
            report.generated.extend(occurrences_due(seed, members, now));
            if seed.recurrence_group.is_none() {
                let mut linked = seed.clone();
                linked.recurrence_group = Some(group);
                report.relinked.push(linked);
            }
        }
        report
    }

    fn stage(store: &mut dyn LedgerStore, report: &ExpansionReport) -> Result<(), CoreError> {
        for seed in &report.relinked {
            store.update(seed.clone())?;
        }
        for occurrence in &report.generated {
            store.insert(occurrence.clone())?;
        }
        Ok(())
    }
}

fn collect_series_entries(finances: &[Finance]) -> HashMap<Uuid, Vec<&Finance>> {
    let mut map: HashMap<Uuid, Vec<&Finance>> = HashMap::new();
    for finance in finances {
        if let Some(group) = finance.recurrence_series() {
            map.entry(group).or_default().push(finance);
        }
    }
    map
}

/// Latest member of the series; equal dates resolve to the lowest id.
pub(crate) fn anchor<'a>(seed: &'a Finance, members: &[&'a Finance]) -> &'a Finance {
    members
        .iter()
        .copied()
        .chain(std::iter::once(seed))
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| b.id.cmp(&a.id)))
        .unwrap_or(seed)
}

/// Every occurrence due between the anchor and `now`, dated `seed.date + n * period`.
///
/// `n` continues after the periods already materialized up to the anchor, so a pass that
/// follows an earlier one only adds the new periods and never repeats a date.
fn occurrences_due(seed: &Finance, members: &[&Finance], now: DateTime<Utc>) -> Vec<Finance> {
    let period_days = i64::from(seed.period_duration);
    if period_days <= 0 {
        return Vec::new();
    }
    let anchor = anchor(seed, members);
    let elapsed_days = (now - anchor.date).num_days();
    let due = elapsed_days / period_days;
    if due <= 0 {
        return Vec::new();
    }

    // Periods already materialized between the seed and the anchor.
    let materialized = ((anchor.date - seed.date).num_days() / period_days).max(0);
    debug!(
        seed = %seed.id,
        anchor = %anchor.date,
        due,
        materialized,
        "generating occurrences"
    );
    (0..due)
        .map(|index| {
            let offset = Duration::days((materialized + index + 1) * period_days);
            seed.occurrence_at(seed.date + offset)
        })
        .collect()
}
