pub mod charts;
pub mod scale;
pub mod svg;

pub use charts::{box_plot, grouped_bar_chart, line_chart, Layout};
pub use svg::SvgDocument;
