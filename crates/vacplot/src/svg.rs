#![forbid(unsafe_code)]

//! SVG backend.
//!
//! [`SvgExporter`] renders one frame of a [`Chart`]: the plotting group
//! translated by the margins, dashed axes with round ticks, axis labels, the
//! 1:1 "Demand=Supply" reference line with its annotations, every
//! positioned point at its current radius, and the ownership legend in a
//! band below the plot.
//!
//! Points are drawn in scene paint order. Points without a committed
//! position (entering points still collapsing) are skipped.

use std::fmt::{self, Write};

use vacplot_core::Rgb;
use vacplot_runtime::Chart;

/// Extent of the reference line and the data coordinates of the annotations.
const REFERENCE_LINE_END: f64 = 140.0;
const ANNOTATIONS: [(&str, f64, f64); 3] = [
    ("Demand=Supply", 130.0, 145.0),
    ("Oversubscription", 25.0, 115.0),
    ("Poor demand", 125.0, 35.0),
];

/// Height of the legend band appended below the drawing surface.
const LEGEND_BAND: f64 = 30.0;

/// SVG exporter settings.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Color of axes, axis labels and the reference line.
    pub axis_color: Rgb,
    /// Background fill; `None` leaves the canvas transparent.
    pub background: Option<Rgb>,
    /// Font family for every text element.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Approximate tick count on the x axis.
    pub x_ticks: usize,
    /// Approximate tick count on the y axis.
    pub y_ticks: usize,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            axis_color: Rgb::new(0xba, 0xd0, 0xd1),
            background: None,
            font_family: "sans-serif".into(),
            font_size: 11.0,
            x_ticks: 7,
            y_ticks: 5,
        }
    }
}

impl SvgExporter {
    /// Render the chart's current scene to an SVG document.
    #[must_use]
    pub fn export(&self, chart: &Chart) -> String {
        let mut out = String::with_capacity(4096 + chart.scene().len() * 96);
        self.write_svg(chart, &mut out).unwrap();
        out
    }

    /// Render the chart's current scene into `out`.
    pub fn write_svg<W: Write>(&self, chart: &Chart, out: &mut W) -> fmt::Result {
        let area = chart.area();
        let margin = area.margin();
        let width = area.width();
        let height = area.height() + LEGEND_BAND;

        write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            num(width),
            num(height),
            num(width),
            num(height),
        )?;
        if let Some(background) = self.background {
            write!(out, "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>")?;
        }
        write!(
            out,
            "<g class=\"plot\" transform=\"translate({},{})\" font-family=\"{}\" font-size=\"{}\">",
            num(margin.left),
            num(margin.top),
            escape(&self.font_family),
            num(self.font_size),
        )?;

        self.write_axes(chart, out)?;
        self.write_reference(chart, out)?;
        write_points(chart, out)?;
        out.write_str("</g>")?;

        self.write_legend(chart, out)?;
        out.write_str("</svg>\n")
    }

    fn write_axes<W: Write>(&self, chart: &Chart, out: &mut W) -> fmt::Result {
        let area = chart.area();
        let scales = chart.scales();
        let (inner_w, inner_h) = (area.inner_width(), area.inner_height());
        let color = self.axis_color;

        write!(
            out,
            "<g class=\"axis x\" transform=\"translate(0,{})\" stroke-dasharray=\"1.5,1.5\">\
             <line x1=\"0\" y1=\"0\" x2=\"{}\" y2=\"0\" stroke=\"{color}\"/>",
            num(inner_h),
            num(inner_w),
        )?;
        for tick in scales.x.ticks(self.x_ticks) {
            write!(
                out,
                "<text x=\"{}\" y=\"6\" dy=\"0.71em\" text-anchor=\"middle\" fill=\"{color}\">{}</text>",
                num(scales.x.map(tick)),
                num(tick),
            )?;
        }
        out.write_str("</g>")?;

        write!(
            out,
            "<g class=\"axis y\" stroke-dasharray=\"1.5,1.5\">\
             <line x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{}\" stroke=\"{color}\"/>",
            num(inner_h),
        )?;
        for tick in scales.y.ticks(self.y_ticks) {
            write!(
                out,
                "<text x=\"-6\" y=\"{}\" dy=\"0.32em\" text-anchor=\"end\" fill=\"{color}\">{}</text>",
                num(scales.y.map(tick)),
                num(tick),
            )?;
        }
        out.write_str("</g>")?;

        write!(
            out,
            "<text class=\"label x\" x=\"{}\" y=\"{}\" dy=\"1em\" text-anchor=\"middle\" fill=\"{color}\">Initial vacancies</text>",
            num(inner_w / 2.0),
            num(inner_h + 30.0),
        )?;
        write!(
            out,
            "<text class=\"label y\" transform=\"rotate(-90)\" x=\"{}\" y=\"-60\" dy=\"1em\" text-anchor=\"middle\" fill=\"{color}\">Applications</text>",
            num(-inner_h / 2.0),
        )
    }

    fn write_reference<W: Write>(&self, chart: &Chart, out: &mut W) -> fmt::Result {
        let scales = chart.scales();
        let point = |x: f64, y: f64| (num(scales.x.map(x)), num(scales.y.map(y)));
        let (x1, y1) = point(0.0, 0.0);
        let (x2, y2) = point(REFERENCE_LINE_END, REFERENCE_LINE_END);
        write!(
            out,
            "<line class=\"reference\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{}\"/>",
            self.axis_color,
        )?;
        for (text, x, y) in ANNOTATIONS {
            let (x, y) = point(x, y);
            write!(
                out,
                "<text class=\"annotation\" x=\"{x}\" y=\"{y}\" fill=\"{}\">{text}</text>",
                self.axis_color,
            )?;
        }
        Ok(())
    }

    fn write_legend<W: Write>(&self, chart: &Chart, out: &mut W) -> fmt::Result {
        let area = chart.area();
        write!(
            out,
            "<g class=\"legend\" transform=\"translate({},{})\" font-family=\"{}\" font-size=\"{}\">",
            num(area.margin().left),
            num(area.height() + 8.0),
            escape(&self.font_family),
            num(self.font_size),
        )?;
        let swatch = self.font_size;
        let mut x = 0.0;
        for entry in chart.legend() {
            write!(
                out,
                "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\
                 <text x=\"{}\" y=\"{}\" class=\"legend-text\">{}</text>",
                num(x),
                num(swatch),
                num(swatch),
                entry.color,
                num(x + swatch + 4.0),
                num(swatch * 0.85),
                escape(&entry.label),
            )?;
            x += swatch + 4.0 + legend_label_width(&entry.label, self.font_size) + 16.0;
        }
        out.write_str("</g>")
    }
}

fn write_points<W: Write>(chart: &Chart, out: &mut W) -> fmt::Result {
    out.write_str("<g class=\"points\">")?;
    for point in chart.scene().iter() {
        let (Some((cx, cy)), Some(fill)) = (point.position(), point.fill()) else {
            continue;
        };
        write!(
            out,
            "<circle class=\"dot\" data-id=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\" opacity=\"{}\"/>",
            point.key().index(),
            num(cx),
            num(cy),
            num(point.radius()),
            num(point.opacity()),
        )?;
    }
    out.write_str("</g>")
}

/// Rough text advance for laying out legend entries side by side.
fn legend_label_width(label: &str, font_size: f64) -> f64 {
    label.chars().count() as f64 * font_size * 0.6
}

/// Compact number formatting: at most three decimals, no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}
