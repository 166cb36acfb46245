//! Inline SVG bar charts for reports.

use crate::domain::slot_stats::{OptimizeFor, SlotStats};

const WIDTH: f64 = 640.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 6.0;
const LABEL_WIDTH: f64 = 150.0;
const VALUE_WIDTH: f64 = 80.0;
const POSITIVE_FILL: &str = "#2563eb";
const NEGATIVE_FILL: &str = "rgba(239,68,68,0.8)";

/// Horizontal bar per slot, scaled so the largest magnitude spans the plot.
/// Negative values extend left of a shared zero line.
pub fn generate_slot_bar_svg(rows: &[SlotStats], metric: OptimizeFor) -> String {
    let values: Vec<(String, f64)> = rows
        .iter()
        .filter_map(|r| metric.value(r).map(|v| (r.slot.to_string(), v)))
        .filter(|(_, v)| v.is_finite())
        .collect();

    if values.is_empty() {
        return format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="40"><text x="10" y="25" font-size="13" fill="#6b7280">No {} data to chart</text></svg>"##,
            metric.label()
        );
    }

    let max_pos = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let max_neg = values.iter().map(|(_, v)| -*v).fold(0.0_f64, f64::max);
    let span = max_pos + max_neg;
    let plot_width = WIDTH - LABEL_WIDTH - VALUE_WIDTH;
    let scale = if span > 0.0 { plot_width / span } else { 0.0 };
    let zero_x = LABEL_WIDTH + max_neg * scale;
    let height = values.len() as f64 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{height:.0}" viewBox="0 0 {WIDTH:.0} {height:.0}" font-family="sans-serif" font-size="12">"#
    );

    for (i, (label, value)) in values.iter().enumerate() {
        let y = BAR_GAP + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let bar_width = value.abs() * scale;
        let (x, fill) = if *value >= 0.0 {
            (zero_x, POSITIVE_FILL)
        } else {
            (zero_x - bar_width, NEGATIVE_FILL)
        };
        let text_y = y + BAR_HEIGHT * 0.7;
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{text_y:.1}" text-anchor="end">{label}</text>"#,
            LABEL_WIDTH - 8.0
        ));
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{BAR_HEIGHT:.0}" fill="{fill}"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{text_y:.1}">{}</text>"#,
            WIDTH - VALUE_WIDTH + 6.0,
            format_value(*value, metric)
        ));
    }

    svg.push_str(&format!(
        r##"<line x1="{zero_x:.1}" y1="0" x2="{zero_x:.1}" y2="{height:.0}" stroke="#374151" stroke-width="1"/>"##
    ));
    svg.push_str("</svg>");
    svg
}

fn format_value(value: f64, metric: OptimizeFor) -> String {
    match metric {
        OptimizeFor::Pnl => format!("{value:.2}"),
        OptimizeFor::Pcr => format!("{:.1}%", value * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_slot::TimeSlot;
    use chrono::Weekday;

    fn row(weekday: Weekday, pnl: f64, pcr: Option<f64>) -> SlotStats {
        SlotStats {
            slot: TimeSlot::new(weekday, 10, 0).unwrap(),
            pnl,
            pcr,
            trades: 1,
            total_pnl: pnl,
        }
    }

    #[test]
    fn empty_rows_render_placeholder() {
        let svg = generate_slot_bar_svg(&[], OptimizeFor::Pnl);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No PnL data to chart"));
    }

    #[test]
    fn one_bar_per_row_with_labels() {
        let rows = vec![row(Weekday::Mon, 120.0, Some(0.4)), row(Weekday::Tue, 60.0, None)];
        let svg = generate_slot_bar_svg(&rows, OptimizeFor::Pnl);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Monday 10:00 AM"));
        assert!(svg.contains("120.00"));
        assert!(svg.contains(POSITIVE_FILL));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn negative_values_use_negative_fill() {
        let rows = vec![row(Weekday::Mon, -40.0, None), row(Weekday::Tue, 80.0, None)];
        let svg = generate_slot_bar_svg(&rows, OptimizeFor::Pnl);
        assert!(svg.contains(NEGATIVE_FILL));
        assert!(svg.contains(POSITIVE_FILL));
    }

    #[test]
    fn rows_without_metric_value_are_skipped() {
        let rows = vec![row(Weekday::Mon, 10.0, Some(0.25)), row(Weekday::Tue, 10.0, None)];
        let svg = generate_slot_bar_svg(&rows, OptimizeFor::Pcr);
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains("25.0%"));
    }
}
