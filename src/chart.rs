use crate::models::Entry;
use crate::render::escape_html;
use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 44.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const TICKS: usize = 4;

/// Weight over time across the whole store, regardless of the month filter.
/// `labels[i]` is the date of `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl WeightSeries {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut points: Vec<(&str, f64)> = entries
            .iter()
            .filter_map(|entry| Some((entry.date()?, entry.finite_weight()?)))
            .collect();
        points.sort_by(|a, b| a.0.cmp(b.0));

        let (labels, values) = points
            .into_iter()
            .map(|(date, weight)| (date.to_string(), weight))
            .unzip();
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A drawn chart. Owned by a [`ChartSlot`]; replacing it drops the old one.
#[derive(Debug, Clone, Serialize)]
pub struct WeightChart {
    pub generation: u64,
    #[serde(flatten)]
    pub series: WeightSeries,
    #[serde(skip)]
    pub svg: String,
}

impl WeightChart {
    pub fn draw(generation: u64, series: WeightSeries) -> Self {
        let svg = render_svg(&series);
        Self {
            generation,
            series,
            svg,
        }
    }
}

/// Holds the one live chart.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<WeightChart>,
    generation: u64,
}

impl ChartSlot {
    /// Releases the previous chart, then draws a new one from `entries`.
    pub fn redraw(&mut self, entries: &[Entry]) -> &WeightChart {
        if let Some(previous) = self.current.take() {
            debug!("discarding weight chart #{}", previous.generation);
        }
        self.generation += 1;
        let chart = WeightChart::draw(self.generation, WeightSeries::from_entries(entries));
        debug!("drew weight chart #{} with {} points", chart.generation, chart.series.len());
        self.current.insert(chart)
    }

    pub fn current(&self) -> Option<&WeightChart> {
        self.current.as_ref()
    }
}

pub fn render_svg(series: &WeightSeries) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"weightChart\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" role=\"img\" aria-label=\"Weight over time\">"
    );
    svg.push_str(SVG_STYLE);

    if series.is_empty() {
        svg.push_str(
            "<text class=\"chart-label\" x=\"50%\" y=\"50%\" text-anchor=\"middle\">No weight data yet</text></svg>",
        );
        return svg;
    }

    let (mut min, mut max) = series
        .values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if min == max {
        min -= 1.0;
        max += 1.0;
    }

    // Halved so `max - min` stays finite for weights near f64::MAX.
    let half_range = max / 2.0 - min / 2.0;
    let count = series.len();
    let x_step = if count > 1 {
        (WIDTH - PADDING_X * 2.0) / (count - 1) as f64
    } else {
        0.0
    };
    let plot_height = HEIGHT - TOP - PADDING_Y;
    let x = |index: usize| PADDING_X + index as f64 * x_step;
    let y = |value: f64| {
        let share = if half_range > 0.0 {
            (value / 2.0 - min / 2.0) / half_range
        } else {
            0.5
        };
        HEIGHT - PADDING_Y - share * plot_height
    };

    for tick in 0..=TICKS {
        let value = (min / 2.0 + half_range * tick as f64 / TICKS as f64) * 2.0;
        let y_pos = y(value);
        let _ = write!(
            svg,
            "<line class=\"chart-grid\" x1=\"{PADDING_X}\" y1=\"{y_pos:.2}\" x2=\"{}\" y2=\"{y_pos:.2}\" />\
             <text class=\"chart-label\" x=\"{}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
            WIDTH - PADDING_X,
            PADDING_X - 10.0,
            y_pos + 4.0,
            axis_value(value)
        );
    }

    let path: Vec<String> = series
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let cmd = if index == 0 { 'M' } else { 'L' };
            format!("{cmd} {:.2} {:.2}", x(index), y(*value))
        })
        .collect();
    let _ = write!(svg, "<path class=\"chart-line\" d=\"{}\" />", path.join(" "));

    for (index, value) in series.values.iter().enumerate() {
        let _ = write!(
            svg,
            "<circle class=\"chart-point\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"4\"><title>{}: {value}</title></circle>",
            x(index),
            y(*value),
            escape_html(&series.labels[index])
        );
    }

    let label_every = count.div_ceil(8).max(1);
    for (index, label) in series.labels.iter().enumerate() {
        if index % label_every != 0 {
            continue;
        }
        let _ = write!(
            svg,
            "<text class=\"chart-label\" x=\"{:.2}\" y=\"{}\" text-anchor=\"middle\">{}</text>",
            x(index),
            HEIGHT - PADDING_Y + 18.0,
            escape_html(label.get(5..).unwrap_or(label.as_str()))
        );
    }

    svg.push_str("</svg>");
    svg
}

fn axis_value(value: f64) -> String {
    if value.abs() >= 1e15 {
        return format!("{value:.1e}");
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

const SVG_STYLE: &str = "<style>\
.chart-line{fill:none;stroke:#ff6b4a;stroke-width:3}\
.chart-point{fill:#fff;stroke:#ff6b4a;stroke-width:2}\
.chart-grid{stroke:rgba(47,72,88,.12)}\
.chart-label{fill:#7a746d;font-size:11px;font-family:sans-serif}\
</style>";
