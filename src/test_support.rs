use chrono::NaiveDate;

use crate::domain::estimate::ThreePointEstimate;
use crate::domain::task::TaskEstimate;
use crate::services::pert_sampler::DurationSampler;

// A mock DurationSampler that always returns the most likely value
#[derive(Default)]
pub struct MockSampler {
    pub calls: usize,
}

impl DurationSampler for MockSampler {
    fn sample(&mut self, estimate: &ThreePointEstimate) -> f64 {
        self.calls += 1;
        f64::from(estimate.most_likely)
    }
}

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_task(name: &str, most_likely: u32) -> TaskEstimate {
    TaskEstimate::create(
        name,
        "Resource 1",
        None,
        most_likely,
        on_date(2024, 12, 7),
        None,
        None,
    )
    .unwrap()
}
