//! Daily aggregation of the 3-hourly forecast feed.

use std::collections::HashMap;

use crate::model::{DailySummary, ForecastEntry};

/// Entries collected for one calendar date.
#[derive(Debug, Default)]
struct DayGroup<'a> {
    temperatures: Vec<f64>,
    /// Distinct descriptions with their counts, in first-seen order.
    descriptions: Vec<(&'a str, usize)>,
}

impl<'a> DayGroup<'a> {
    fn push(&mut self, entry: &'a ForecastEntry) {
        self.temperatures.push(entry.temperature);

        match self.descriptions.iter_mut().find(|(d, _)| *d == entry.description) {
            Some((_, count)) => *count += 1,
            None => self.descriptions.push((entry.description.as_str(), 1)),
        }
    }

    fn average(&self) -> f64 {
        self.temperatures.iter().sum::<f64>() / self.temperatures.len() as f64
    }

    /// Most frequent description. On a tie the one seen first wins.
    fn dominant(&self) -> &'a str {
        let mut best: Option<(&'a str, usize)> = None;
        for &(desc, count) in &self.descriptions {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((desc, count));
            }
        }
        best.map(|(d, _)| d).unwrap_or_default()
    }
}

/// Groups entries by calendar date and summarises each day.
///
/// Days come out in the order their first entry appears in `entries`, not
/// sorted by date. Partial days are averaged over whatever slots exist.
pub fn summarize_daily(entries: &[ForecastEntry]) -> Vec<DailySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut days: Vec<(&str, DayGroup<'_>)> = Vec::new();

    for entry in entries {
        let date = entry.date();
        let slot = *index.entry(date).or_insert_with(|| {
            days.push((date, DayGroup::default()));
            days.len() - 1
        });
        days[slot].1.push(entry);
    }

    days.into_iter()
        .map(|(date, group)| DailySummary {
            date: date.to_string(),
            average_temperature: group.average(),
            dominant_description: group.dominant().to_string(),
        })
        .collect()
}
