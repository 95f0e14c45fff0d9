use crate::models::{ChartPoint, ChartResponse, Record};

/// Display form for chart dates, month and day zero-padded.
pub const CHART_DATE_FORMAT: &str = "%m/%d";

/// Charts are only worth drawing once there is more than one record.
pub const MIN_RECORDS_FOR_CHARTS: usize = 2;

/// Records newest first. The sort is stable, so equal dates keep insertion
/// order.
pub fn history_view(records: &[Record]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Records that carry a weight or a food amount, oldest first.
pub fn chart_view(records: &[Record]) -> Vec<ChartPoint> {
    let mut plotted: Vec<&Record> = records
        .iter()
        .filter(|record| record.weight.is_some() || record.food.is_some())
        .collect();
    plotted.sort_by_key(|record| record.date);

    plotted
        .into_iter()
        .map(|record| ChartPoint {
            id: record.id,
            date: record.date.format(CHART_DATE_FORMAT).to_string(),
            food: record.food,
            weight: record.weight,
        })
        .collect()
}

pub fn chart_response(records: &[Record]) -> ChartResponse {
    ChartResponse {
        show_charts: records.len() >= MIN_RECORDS_FOR_CHARTS,
        points: chart_view(records),
    }
}
