use crate::core::summarize::global_max;
use crate::domain::model::{AverageRecord, GroupedSummaries, Record, TimePoint};
use crate::render::scale::{BandScale, LinearScale, OrdinalScale, CATEGORY_PALETTE};
use crate::render::svg::{num, Group, SvgDocument, SvgElement, TextAnchor};

const TICK_COUNT: usize = 10;
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer size of a chart and the margins around its plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Layout {
    pub fn new(width: u32, height: u32, top: f64) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            margin: Margin {
                top,
                right: 30.0,
                bottom: 40.0,
                left: 40.0,
            },
        }
    }

    /// Box plot layout: a taller top margin than the other charts.
    pub fn box_plot(width: u32, height: u32) -> Self {
        Self::new(width, height, 40.0)
    }

    pub fn standard(width: u32, height: u32) -> Self {
        Self::new(width, height, 20.0)
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    fn document(&self) -> (SvgDocument, Group) {
        let doc = SvgDocument::new(self.width, self.height);
        let plot = Group::translated(self.margin.left, self.margin.top);
        (doc, plot)
    }

    fn value_scale(&self, max: Option<f64>) -> LinearScale {
        LinearScale::new((0.0, max.unwrap_or(0.0)), (self.inner_height(), 0.0))
    }

    fn axis_labels(&self, plot: &mut Group, x_label: &str, y_label: &str) {
        let (w, h) = (self.inner_width(), self.inner_height());
        plot.text(
            w / 2.0,
            h + self.margin.bottom - 10.0,
            x_label,
            Some(TextAnchor::Middle),
        );
        plot.push(SvgElement::Text {
            x: -h / 2.0,
            y: -self.margin.left + 20.0,
            dy: None,
            text: y_label.to_string(),
            anchor: Some(TextAnchor::Middle),
            rotate: Some(-90.0),
            fill: None,
        });
    }

    fn axes(&self, plot: &mut Group, x: &BandScale, y: &LinearScale) {
        let mut bottom = bottom_axis(x);
        bottom.translate = Some((0.0, self.inner_height()));
        plot.group(bottom);
        plot.group(left_axis(y));
    }
}

fn axis_group(anchor: TextAnchor) -> Group {
    Group::new()
        .with_attr("fill", "none")
        .with_attr("font-size", 10)
        .with_attr("font-family", "sans-serif")
        .with_attr("text-anchor", anchor.as_str())
}

fn domain_path(d: String) -> SvgElement {
    SvgElement::Path {
        d,
        fill: None,
        stroke: Some("currentColor".to_string()),
        stroke_width: None,
        class: Some("domain".to_string()),
    }
}

fn tick(offset: (f64, f64), line_to: (f64, f64), label: String, at: (f64, f64), dy: &str) -> SvgElement {
    let mut group = Group::translated(offset.0, offset.1)
        .with_class("tick")
        .with_attr("opacity", 1);
    group.push(SvgElement::Line {
        x1: 0.0,
        y1: 0.0,
        x2: line_to.0,
        y2: line_to.1,
        stroke: "currentColor".to_string(),
        stroke_width: None,
    });
    group.push(SvgElement::Text {
        x: at.0,
        y: at.1,
        dy: Some(dy.to_string()),
        text: label,
        anchor: None,
        rotate: None,
        fill: Some("currentColor".to_string()),
    });
    SvgElement::Group(group)
}

/// Category axis under the plot; ticks sit at band centres.
pub fn bottom_axis(scale: &BandScale) -> Group {
    let mut group = axis_group(TextAnchor::Middle);
    let (r0, r1) = scale.range();
    group.push(domain_path(format!(
        "M{},{}V0H{}V{}",
        num(r0),
        num(TICK_SIZE),
        num(r1),
        num(TICK_SIZE)
    )));
    for key in scale.domain() {
        if let Some(x) = scale.center(key) {
            group.push(tick(
                (x, 0.0),
                (0.0, TICK_SIZE),
                key.clone(),
                (0.0, TICK_SIZE + TICK_PADDING),
                "0.71em",
            ));
        }
    }
    group
}

/// Value axis on the left of the plot.
pub fn left_axis(scale: &LinearScale) -> Group {
    let mut group = axis_group(TextAnchor::End);
    let (r0, r1) = scale.range();
    group.push(domain_path(format!(
        "M{},{}H0V{}H{}",
        num(-TICK_SIZE),
        num(r0),
        num(r1),
        num(-TICK_SIZE)
    )));
    let format = scale.tick_format(TICK_COUNT);
    for value in scale.ticks(TICK_COUNT) {
        group.push(tick(
            (0.0, scale.scale(value)),
            (-TICK_SIZE, 0.0),
            format(value),
            (-(TICK_SIZE + TICK_PADDING), 0.0),
            "0.32em",
        ));
    }
    group
}

/// Box-and-whisker chart of like counts per platform.
///
/// The value axis spans `[0, max]` over every record, not just the summaries.
pub fn box_plot(records: &[Record], summaries: &GroupedSummaries, layout: &Layout) -> SvgDocument {
    let (mut doc, mut plot) = layout.document();
    let x = BandScale::new(
        records.iter().map(|r| r.group_key.as_str()),
        (0.0, layout.inner_width()),
    )
    .padding(0.1);
    let y = layout.value_scale(global_max(records.iter().map(|r| r.value)));

    for (platform, q) in summaries.iter() {
        let Some(left) = x.position(platform) else {
            tracing::warn!("Group '{}' has no band on the x axis, skipping", platform);
            continue;
        };
        let box_width = x.bandwidth();
        let center = left + box_width / 2.0;

        plot.line((center, y.scale(q.max)), (center, y.scale(q.min)), "black");
        plot.rect(
            left,
            y.scale(q.q3),
            box_width,
            y.scale(q.q1) - y.scale(q.q3),
            "steelblue",
        );
        plot.push(SvgElement::Line {
            x1: left,
            y1: y.scale(q.median),
            x2: left + box_width,
            y2: y.scale(q.median),
            stroke: "white".to_string(),
            stroke_width: Some(2.0),
        });
    }

    layout.axis_labels(&mut plot, "Platform", "Likes");
    layout.axes(&mut plot, &x, &y);
    doc.push(SvgElement::Group(plot));
    doc
}

/// Average likes per platform, one bar per post type, with a colour legend.
pub fn grouped_bar_chart(rows: &[AverageRecord], layout: &Layout) -> SvgDocument {
    let (mut doc, mut plot) = layout.document();
    let (w, h) = (layout.inner_width(), layout.inner_height());

    let x0 = BandScale::new(rows.iter().map(|r| r.platform.as_str()), (0.0, w)).padding(0.1);
    let x1 = BandScale::new(
        rows.iter().map(|r| r.post_type.as_str()),
        (0.0, x0.bandwidth()),
    )
    .padding(0.05)
    .round(true);
    let y = layout.value_scale(global_max(rows.iter().map(|r| r.avg_likes)));
    let color = OrdinalScale::new(rows.iter().map(|r| r.post_type.as_str()), &CATEGORY_PALETTE);

    for row in rows {
        let (Some(group_x), Some(bar_x)) = (x0.position(&row.platform), x1.position(&row.post_type))
        else {
            continue;
        };
        let mut bar_group = Group::translated(group_x, 0.0).with_class("bar-group");
        let top = y.scale(row.avg_likes);
        bar_group.rect(bar_x, top, x1.bandwidth(), h - top, color.color(&row.post_type));
        plot.group(bar_group);
    }

    layout.axis_labels(&mut plot, "Platform", "Average Likes");
    layout.axes(&mut plot, &x0, &y);

    let mut legend = Group::translated(w - 150.0, layout.margin.top).with_class("legend");
    for (i, post_type) in color.domain().iter().enumerate() {
        let offset = i as f64 * 20.0;
        legend.rect(0.0, offset, 20.0, 20.0, color.color(post_type));
        legend.text(30.0, offset + 10.0, post_type, None);
    }
    plot.group(legend);

    doc.push(SvgElement::Group(plot));
    doc
}

/// Average likes over time as a single smooth line.
pub fn line_chart(points: &[TimePoint], layout: &Layout) -> SvgDocument {
    let (mut doc, mut plot) = layout.document();
    let x = BandScale::new(
        points.iter().map(|p| p.date.as_str()),
        (0.0, layout.inner_width()),
    )
    .padding(0.1);
    let y = layout.value_scale(global_max(points.iter().map(|p| p.avg_likes)));

    let coords: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| x.position(&p.date).map(|px| (px, y.scale(p.avg_likes))))
        .collect();

    if let Some(d) = natural_curve_path(&coords) {
        plot.push(SvgElement::Path {
            d,
            fill: Some("none".to_string()),
            stroke: Some("steelblue".to_string()),
            stroke_width: Some(2.0),
            class: Some("line".to_string()),
        });
    }

    layout.axis_labels(&mut plot, "Date", "Average Likes");
    layout.axes(&mut plot, &x, &y);
    doc.push(SvgElement::Group(plot));
    doc
}

/// Bézier control points of a natural cubic spline through `v`.
///
/// Solves the tridiagonal system with the Thomas algorithm; returns the first
/// and second control point of each of the `v.len() - 1` segments.
fn natural_control_points(v: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = v.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = v[0] + 2.0 * v[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * v[i] + 2.0 * v[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * v[n - 1] + v[n];

    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }

    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (v[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * v[i + 1] - a[i + 1];
    }
    (a, b)
}

/// SVG path data through `points`; `None` when there is nothing to draw.
pub fn natural_curve_path(points: &[(f64, f64)]) -> Option<String> {
    let (first, rest) = points.split_first()?;
    let mut d = format!("M{},{}", num(first.0), num(first.1));

    match rest.len() {
        0 => {}
        1 => d.push_str(&format!("L{},{}", num(rest[0].0), num(rest[0].1))),
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (px0, px1) = natural_control_points(&xs);
            let (py0, py1) = natural_control_points(&ys);
            for (i, end) in rest.iter().enumerate() {
                d.push_str(&format!(
                    "C{},{},{},{},{},{}",
                    num(px0[i]),
                    num(py0[i]),
                    num(px1[i]),
                    num(py1[i]),
                    num(end.0),
                    num(end.1)
                ));
            }
        }
    }
    Some(d)
}
