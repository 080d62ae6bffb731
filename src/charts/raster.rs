//! Bar charts rendered to SVG with `plotters`.
//!
//! Only the SVG backend is used, so no system fonts or image codecs are
//! needed at runtime.

use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

use super::{render_err, ChartPayload};
use crate::error::ReportError;

// ---

pub const SVG_MIME: &str = "image/svg+xml";

const SIZE: (u32, u32) = (1200, 600);
const CAPTION_FONT: (&str, i32) = ("sans-serif", 28);

/// Colour of the sensor-type census bars.
pub const CENSUS_COLOR: RGBColor = RGBColor(0x48, 0x78, 0xd0);
/// Colour of the top-users bars.
pub const TOP_USERS_COLOR: RGBColor = RGBColor(0x69, 0xb3, 0xa2);

/// Axis text for a bar chart.
pub struct Labels<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub value: &'a str,
}

fn label_at(bars: &[(String, u64)], key: &SegmentValue<u32>) -> String {
    match key {
        SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn value_max(bars: &[(String, u64)]) -> u64 {
    bars.iter().map(|(_, v)| *v).max().unwrap_or(0) + 1
}

/// Vertical bars, one per `(label, value)`, left to right in input order.
pub fn vertical_bars(
    labels: &Labels<'_>,
    bars: &[(String, u64)],
    color: RGBColor,
) -> Result<ChartPayload, ReportError> {
    // ---
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let n = bars.len() as u32;
        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, CAPTION_FONT.into_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u64..value_max(bars))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|key| label_at(bars, key))
            .x_desc(labels.category)
            .y_desc(labels.value)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(8)
                    .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(ChartPayload::Image {
        mime: SVG_MIME,
        bytes: svg.into_bytes(),
    })
}

/// Horizontal bars, the first input bar drawn at the top.
pub fn horizontal_bars(
    labels: &Labels<'_>,
    bars: &[(String, u64)],
    color: RGBColor,
) -> Result<ChartPayload, ReportError> {
    // ---
    // Segment 0 sits at the bottom of the y axis, so flip the input
    let flipped: Vec<(String, u64)> = bars.iter().rev().cloned().collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let n = flipped.len() as u32;
        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, CAPTION_FONT.into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(180)
            .build_cartesian_2d(0u64..value_max(&flipped), (0u32..n).into_segmented())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(flipped.len())
            .y_label_formatter(&|key| label_at(&flipped, key))
            .x_desc(labels.value)
            .y_desc(labels.category)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::horizontal(&chart)
                    .style(color.filled())
                    .margin(6)
                    .data(flipped.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(ChartPayload::Image {
        mime: SVG_MIME,
        bytes: svg.into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn labels() -> Labels<'static> {
        Labels {
            title: "Sensors by type",
            category: "Type",
            value: "Count",
        }
    }

    fn svg_text(payload: ChartPayload) -> String {
        match payload {
            ChartPayload::Image { mime, bytes } => {
                assert_eq!(mime, SVG_MIME);
                String::from_utf8(bytes).unwrap()
            }
            other => panic!("expected an image, got {other:?}"),
        }
    }

    #[test]
    fn test_vertical_bars_render_svg_with_labels() {
        // ---
        let bars = vec![("temp".to_string(), 2), ("hum".to_string(), 1)];
        let svg = svg_text(vertical_bars(&labels(), &bars, CENSUS_COLOR).unwrap());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Sensors by type"));
        assert!(svg.contains("temp"));
        assert!(svg.contains("hum"));
    }

    #[test]
    fn test_horizontal_bars_render_svg_with_labels() {
        // ---
        let bars = vec![("Ana".to_string(), 5), ("Desconocido".to_string(), 3)];
        let svg = svg_text(horizontal_bars(&labels(), &bars, TOP_USERS_COLOR).unwrap());

        assert!(svg.contains("Ana"));
        assert!(svg.contains("Desconocido"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        // ---
        let bars = vec![("co2".to_string(), 4)];
        let a = vertical_bars(&labels(), &bars, CENSUS_COLOR).unwrap();
        let b = vertical_bars(&labels(), &bars, CENSUS_COLOR).unwrap();
        assert_eq!(a, b);
    }
}
