//! Bundled two-year sample dataset

use super::{SourceRecord, YearBatch};

/// The 2021/2022 antimicrobial-usage sample.
///
/// `raw_metric_a` is pooled days, `raw_metric_b` is percentage of days.
pub fn sample_batches() -> Vec<YearBatch> {
    vec![
        YearBatch::new(
            2021,
            vec![
                SourceRecord::new("Antibiotic A", 120.0, 60.0),
                SourceRecord::new("Antibiotic B", 200.0, 75.0),
            ],
        ),
        YearBatch::new(
            2022,
            vec![
                SourceRecord::new("Antibiotic A", 130.0, 65.0),
                SourceRecord::new("Antibiotic B", 210.0, 80.0),
            ],
        ),
    ]
}

/// Same sample with spectrum labels, for the per-category doughnut view
pub fn sample_batches_with_categories() -> Vec<YearBatch> {
    let mut batches = sample_batches();
    for batch in &mut batches {
        for record in &mut batch.records {
            let category = if record.name == "Antibiotic A" { "Narrow" } else { "Broad" };
            record.category = Some(category.to_string());
        }
    }
    batches
}
