//! Human-readable, JSON and plot output of an analysis.

use plotters::prelude::*;
use shared::Timestamp;
use std::fmt;
use std::path::Path;

use crate::analysis::{EdgeStats, FlashAnalysisResult};
use crate::light_curve::LightCurve;

fn format_time(ts: &Timestamp) -> String {
    match ts.to_datetime() {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string(),
        None => ts.to_string(),
    }
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &EdgeStats) -> fmt::Result {
    writeln!(
        f,
        "  {:<5} edge: frame {:.4} ± {:.4}   {} ± {:.6} s",
        edge.goalpost,
        edge.edge_at,
        edge.edge_sigma,
        format_time(&edge.time_at_edge),
        edge.edge_sigma_seconds
    )?;
    writeln!(
        f,
        "         bottom {:.3} ± {:.3}, top {:.3} ± {:.3}, point {:.3} (delta {:.4})",
        edge.bottom_mean,
        edge.bottom_std,
        edge.top_mean,
        edge.top_std,
        edge.point_intensity,
        edge.sub_frame_delta
    )?;
    writeln!(
        f,
        "         SNR p={:.2} b={:.2} a={:.2}; sigma frame={:.4} ratio={:.4}",
        edge.p_snr, edge.b_snr, edge.a_snr, edge.sigma_frame, edge.sigma_frame_from_ratio
    )
}

/// Multi-line terminal summary of an analysis.
pub struct Report<'a>(pub &'a FlashAnalysisResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Flash Edge Analysis")?;
        writeln!(f, "===================")?;
        writeln!(f, "  baseline            {:.3}", result.baseline)?;

        let Some(detection) = result.detection.as_ref() else {
            return writeln!(f, "  no flash detected");
        };

        writeln!(
            f,
            "  flash onset frame   {} (threshold {:.3})",
            detection.onset_frame, detection.threshold
        )?;
        writeln!(
            f,
            "  max / mid level     {:.3} / {:.3}",
            detection.max_flash_level, detection.mid_flash_level
        )?;
        writeln!(f)?;

        for edge in [&result.left, &result.right].into_iter().flatten() {
            write_edge(f, edge)?;
        }

        if let Some(span) = result.span() {
            writeln!(f)?;
            writeln!(
                f,
                "  span: {:.4} ± {:.4} frames, {:.6} ± {:.6} s",
                span.frames, span.sigma_frames, span.seconds, span.sigma_seconds
            )?;
        }

        if !result.flash_intensity_valid {
            writeln!(f)?;
            writeln!(
                f,
                "  WARNING: flash too bright for a photometric sigma; edge sigmas are fixed"
            )?;
        }

        Ok(())
    }
}

/// Multi-line summary for the terminal.
pub fn format_report(result: &FlashAnalysisResult) -> String {
    Report(result).to_string()
}

/// Write the result as pretty JSON.
pub fn write_json(path: &Path, result: &FlashAnalysisResult) -> std::io::Result<()> {
    shared::config_storage::save_json(path, result)
}

/// Plot the light curve with the baseline, mid level and both goalposts.
pub fn plot_light_curve(
    path: &Path,
    light_curve: &LightCurve,
    result: &FlashAnalysisResult,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = light_curve.samples();
    let x_max = samples.len().max(1) as f64;
    let y_max = samples.iter().copied().fold(0.0_f64, f64::max) * 1.1 + 1.0;

    let root = BitMapBackend::new(path, (1600, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Light Curve", ("sans-serif", 32).into_font().color(&BLACK))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Frame")
        .y_desc("Intensity")
        .axis_desc_style(("sans-serif", 20))
        .label_style(("sans-serif", 16))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, &v)| (i as f64 + 0.5, v)),
            BLUE,
        ))?
        .label("Intensity")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, result.baseline), (x_max, result.baseline)],
            BLACK,
        )))?
        .label("Baseline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    if let Some(detection) = result.detection.as_ref() {
        let mid = detection.mid_flash_level;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, mid), (x_max, mid)],
                GREEN,
            )))?
            .label("Mid flash level")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    }

    for edge in [&result.left, &result.right].into_iter().flatten() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(edge.edge_at, 0.0), (edge.edge_at, y_max)],
                RED.stroke_width(2),
            )))?
            .label(format!("{} edge {:.3}", edge.goalpost, edge.edge_at))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_flash;
    use crate::config::AnalysisConfig;
    use crate::light_curve::FrameTimeBase;
    use tempfile::TempDir;

    fn pulse() -> LightCurve {
        let mut samples = vec![100.0; 120];
        samples[30..60].fill(500.0);
        samples[30] = 300.0;
        LightCurve::new(samples).unwrap()
    }

    fn analyzed() -> FlashAnalysisResult {
        let lc = pulse();
        let starts = (0..120)
            .map(|i| Timestamp::new(1_714_532_645, 0).offset_by_seconds(i as f64 * 0.04).unwrap())
            .collect();
        let tb = FrameTimeBase::new(starts, vec![0.04; 120]).unwrap();
        let config = AnalysisConfig {
            num_pixels: 25,
            ..Default::default()
        };
        analyze_flash(&lc, &tb, &config).unwrap()
    }

    #[test]
    fn test_report_mentions_both_edges() {
        let report = format_report(&analyzed());
        assert!(report.contains("left  edge: frame 30.5000"));
        assert!(report.contains("right edge: frame 30.5000"));
        assert!(report.contains("2024-05-01T03:04:06.220000000Z"));
        assert!(report.contains("span: 0.0000"));
        assert!(!report.contains("WARNING"));
    }

    #[test]
    fn test_report_without_flash() {
        let lc = LightCurve::new(vec![100.0; 20]).unwrap();
        let starts = (0..20).map(|i| Timestamp::new(i, 0)).collect();
        let tb = FrameTimeBase::new(starts, vec![1.0; 20]).unwrap();
        let result = analyze_flash(&lc, &tb, &AnalysisConfig::default()).unwrap();
        assert!(format_report(&result).contains("no flash detected"));
    }

    #[test]
    fn test_plot_renders_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("light_curve.png");
        plot_light_curve(&path, &pulse(), &analyzed()).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_json_output() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("result.json");
        write_json(&path, &analyzed()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["left"]["goalpost"], "left");
        assert_eq!(value["right"]["transition_index"], 30);
    }
}
