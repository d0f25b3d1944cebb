use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation_types::{ConfidenceResult, HistogramBin};

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

/// Buckets `values` into `bin_count` equal-width bins between their minimum
/// and maximum. Returns no bins for empty input or a zero bin count.
pub fn build_histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_size = (max - min) / bin_count as f64;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|index| {
            let start = min + index as f64 * bin_size;
            let end = start + bin_size;
            HistogramBin {
                start,
                end,
                label: format!("{}-{} days", start.round(), end.round()),
                count: 0,
            }
        })
        .collect();

    for value in values {
        bins[bin_index(*value, min, bin_size, bin_count)].count += 1;
    }
    bins
}

/// `min(floor((value - min) / bin_size), bin_count - 1)`. A zero-width
/// histogram puts everything into the first bin.
pub fn bin_index(value: f64, min: f64, bin_size: f64, bin_count: usize) -> usize {
    if bin_count == 0 || !(bin_size > 0.0) {
        return 0;
    }
    let index = ((value - min) / bin_size).floor();
    if !(index > 0.0) {
        return 0;
    }
    (index as usize).min(bin_count - 1)
}

pub fn write_histogram_png(
    output_path: &str,
    confidence: &ConfidenceResult,
) -> Result<(), HistogramError> {
    render_histogram_png(output_path, confidence)
}

fn render_histogram_png(
    output_path: &str,
    confidence: &ConfidenceResult,
) -> Result<(), HistogramError> {
    if confidence.histogram.is_empty() {
        return Ok(());
    }

    // Give a zero-width histogram one day of room so the bar stays visible.
    let (x_min, x_max) = if confidence.max - confidence.min < f64::EPSILON {
        (confidence.min - 0.5, confidence.max + 0.5)
    } else {
        (confidence.min, confidence.max)
    };
    let bar_width = (x_max - x_min) / confidence.histogram.len() as f64;
    let max_count = confidence
        .histogram
        .iter()
        .map(|bin| bin.count)
        .max()
        .unwrap_or(1);
    let y_max = max_count + max_count / 10 + 1;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Project Duration Distribution", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0..y_max)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Duration in days")
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{value:.1}"))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(confidence.histogram.iter().enumerate().map(|(index, bin)| {
            let start = x_min + index as f64 * bar_width;
            Rectangle::new([(start, 0), (start + bar_width, bin.count)], bar_style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let markers = [
        ("P20", confidence.p20.days, RGBColor(46, 160, 67)),
        ("P50", confidence.p50.days, RGBColor(230, 145, 30)),
        ("P90", confidence.p90.days, RGBColor(204, 40, 40)),
    ];
    for (label, days, color) in markers {
        chart
            .draw_series(LineSeries::new(
                vec![(days, 0), (days, y_max)],
                ShapeStyle::from(&color).stroke_width(2),
            ))
            .map_err(|e| HistogramError::Render(e.to_string()))?
            .label(format!("{label}: {days:.1} days"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn build_histogram_splits_range_into_equal_bins() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let bins = build_histogram(&values, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].label, "0-2 days");
        assert_eq!(bins[4].label, "8-10 days");
        let counts: Vec<usize> = bins.iter().map(|bin| bin.count).collect();
        // 10 == max lands in the last bin instead of a sixth one.
        assert_eq!(counts, vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn build_histogram_routes_identical_values_to_first_bin() {
        let bins = build_histogram(&[0.0; 25], 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 25);
        assert!(bins[1..].iter().all(|bin| bin.count == 0));
        assert_eq!(bins[0].label, "0-0 days");
    }

    #[test]
    fn build_histogram_is_empty_without_values_or_bins() {
        assert!(build_histogram(&[], 10).is_empty());
        assert!(build_histogram(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn bin_index_guards_last_bin_and_zero_width() {
        assert_eq!(bin_index(16.0, 6.0, 1.0, 10), 9);
        assert_eq!(bin_index(6.0, 6.0, 1.0, 10), 0);
        assert_eq!(bin_index(11.5, 6.0, 1.0, 10), 5);
        assert_eq!(bin_index(6.0, 6.0, 0.0, 10), 0);
    }

    proptest! {
        #[test]
        fn bin_counts_sum_to_number_of_values(
            values in proptest::collection::vec(0.0f64..500.0, 1..300),
            bin_count in 1usize..40,
        ) {
            let bins = build_histogram(&values, bin_count);
            prop_assert_eq!(bins.len(), bin_count);
            prop_assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), values.len());

            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            if max > min {
                prop_assert!(bins[bin_count - 1].count >= 1);
            }
        }
    }
}
