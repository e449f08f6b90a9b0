//! Minimal SVG document model.
//!
//! Charts are assembled from a handful of primitives and serialised to a
//! standalone `<svg>` string. Nothing here knows about data or scales.

use std::fmt::Write as FmtWrite;

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: Option<f64>,
    },
    Path {
        d: String,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
        class: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        dy: Option<String>,
        text: String,
        anchor: Option<TextAnchor>,
        rotate: Option<f64>,
        fill: Option<String>,
    },
    Group(Group),
}

/// A `<g>` with an optional translation and inherited presentation attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub translate: Option<(f64, f64)>,
    pub class: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgElement>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translated(x: f64, y: f64) -> Self {
        Self {
            translate: Some((x, y)),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn push(&mut self, element: SvgElement) {
        self.children.push(element);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.push(SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill: fill.to_string(),
        });
    }

    pub fn line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), stroke: &str) {
        self.push(SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: stroke.to_string(),
            stroke_width: None,
        });
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, anchor: Option<TextAnchor>) {
        self.push(SvgElement::Text {
            x,
            y,
            dy: None,
            text: text.to_string(),
            anchor,
            rotate: None,
            fill: None,
        });
    }

    pub fn group(&mut self, group: Group) {
        self.push(SvgElement::Group(group));
    }

    /// All elements below this group, depth first.
    pub fn descendants(&self) -> Vec<&SvgElement> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            if let SvgElement::Group(group) = child {
                out.extend(group.descendants());
            }
        }
        out
    }
}

/// Root of an SVG image.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    root: Group,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            root: Group::new(),
        }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn push(&mut self, element: SvgElement) {
        self.root.push(element);
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            num(self.width),
            num(self.height)
        );
        for child in &self.root.children {
            write_element(&mut out, child);
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Shortest round-trip formatting; whole numbers print without a fraction.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        // 避免輸出 -0
        return "0".to_string();
    }
    format!("{}", value)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn write_element(out: &mut String, element: &SvgElement) {
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                escape_xml(fill)
            );
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" x2="{}" y1="{}" y2="{}" stroke="{}""#,
                num(*x1),
                num(*x2),
                num(*y1),
                num(*y2),
                escape_xml(stroke)
            );
            if let Some(w) = stroke_width {
                let _ = write!(out, r#" stroke-width="{}""#, num(*w));
            }
            out.push_str("/>");
        }
        SvgElement::Path {
            d,
            fill,
            stroke,
            stroke_width,
            class,
        } => {
            out.push_str("<path");
            if let Some(class) = class {
                let _ = write!(out, r#" class="{}""#, escape_xml(class));
            }
            let _ = write!(out, r#" d="{}""#, escape_xml(d));
            if let Some(fill) = fill {
                let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
            }
            if let Some(stroke) = stroke {
                let _ = write!(out, r#" stroke="{}""#, escape_xml(stroke));
            }
            if let Some(w) = stroke_width {
                let _ = write!(out, r#" stroke-width="{}""#, num(*w));
            }
            out.push_str("/>");
        }
        SvgElement::Text {
            x,
            y,
            dy,
            text,
            anchor,
            rotate,
            fill,
        } => {
            let _ = write!(out, r#"<text x="{}" y="{}""#, num(*x), num(*y));
            if let Some(dy) = dy {
                let _ = write!(out, r#" dy="{}""#, escape_xml(dy));
            }
            if let Some(anchor) = anchor {
                let _ = write!(out, r#" text-anchor="{}""#, anchor.as_str());
            }
            if let Some(angle) = rotate {
                let _ = write!(out, r#" transform="rotate({})""#, num(*angle));
            }
            if let Some(fill) = fill {
                let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
            }
            let _ = write!(out, ">{}</text>", escape_xml(text));
        }
        SvgElement::Group(group) => {
            out.push_str("<g");
            if let Some(class) = &group.class {
                let _ = write!(out, r#" class="{}""#, escape_xml(class));
            }
            if let Some((x, y)) = group.translate {
                let _ = write!(out, r#" transform="translate({},{})""#, num(x), num(y));
            }
            for (name, value) in &group.attrs {
                let _ = write!(out, r#" {}="{}""#, name, escape_xml(value));
            }
            out.push('>');
            for child in &group.children {
                write_element(out, child);
            }
            out.push_str("</g>");
        }
    }
}
