// Band, linear and ordinal scales: data domains to pixel ranges.

use std::collections::HashMap;

/// Evenly spaced bands for discrete keys.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Builds a scale over the unique keys of `keys`, in first-seen order.
    pub fn new<I, S>(keys: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for key in keys {
            let key = key.as_ref();
            if !index.contains_key(key) {
                index.insert(key.to_string(), domain.len());
                domain.push(key.to_string());
            }
        }

        let mut scale = Self {
            domain,
            index,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            start: range.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Sets inner and outer padding together.
    pub fn padding(mut self, padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        self.padding_inner = padding;
        self.padding_outer = padding;
        self.rescale();
        self
    }

    /// Snap band starts and widths to whole pixels.
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (lo, hi) = if reverse { (r1, r0) } else { (r0, r1) };

        let mut step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }

        // 反向範圍時從高端往回排
        if reverse {
            start += step * (n - 1.0);
            step = -step;
        }

        self.start = start;
        self.step = step;
        self.bandwidth = bandwidth;
    }

    /// Start of the band for `key`, `None` when the key is not in the domain.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index
            .get(key)
            .map(|&i| self.start + self.step * i as f64)
    }

    /// Middle of the band for `key`.
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step.abs()
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Continuous mapping from `[d0, d1]` onto `[r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        // 退化的定義域一律映射到範圍中點
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (value - d0) / span
        };
        r0 + t * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Roughly `count` round-numbered ticks covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if !(d0.is_finite() && d1.is_finite()) || count == 0 {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }

        let reverse = d1 < d0;
        let (start, stop) = if reverse { (d1, d0) } else { (d0, d1) };
        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }

        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| {
                if inc < 0.0 {
                    i as f64 / -inc
                } else {
                    i as f64 * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }

    /// Formatter matching the precision of `ticks(count)`.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let (d0, d1) = self.domain;
        let step = tick_step(d0.min(d1), d0.max(d1), count as f64);
        let decimals = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        move |value| format_grouped(value, decimals)
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Tick index bounds and increment; a negative increment means "divide by".
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !(step.is_finite() && step > 0.0) {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        inc = 10f64.powf(-power) / factor;
        i1 = (start * inc).round();
        i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        tick_bounds(i1, i2, -inc, count)
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        tick_bounds(i1, i2, inc, count)
    }
}

/// Subnormal spans overflow the increment to `inf`; those yield no ticks.
fn tick_bounds(i1: f64, i2: f64, inc: f64, count: f64) -> Option<(i64, i64, f64)> {
    if !(inc.is_finite() && i1.is_finite() && i2.is_finite()) {
        return None;
    }
    if i2 - i1 > count.max(1.0) * 10.0 {
        return None;
    }
    Some((i1 as i64, i2 as i64, inc))
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    match tick_spec(start, stop, count) {
        Some((_, _, inc)) if inc < 0.0 => 1.0 / -inc,
        Some((_, _, inc)) => inc,
        None => 0.0,
    }
}

/// Fixed decimals with `,` thousands separators, e.g. `12,500.5`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('−');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Cycles a colour palette over a key domain.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    domain: Vec<String>,
    palette: Vec<String>,
}

pub const CATEGORY_PALETTE: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

impl OrdinalScale {
    pub fn new<I, S>(keys: I, palette: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domain: Vec<String> = Vec::new();
        for key in keys {
            if !domain.iter().any(|k| k == key.as_ref()) {
                domain.push(key.as_ref().to_string());
            }
        }
        Self {
            domain,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn color(&self, key: &str) -> &str {
        if self.palette.is_empty() {
            return "black";
        }
        let pos = self
            .domain
            .iter()
            .position(|k| k == key)
            .unwrap_or(self.domain.len());
        &self.palette[pos % self.palette.len()]
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_band_scale_with_padding() {
        // n=3, padding 0.1: step = 730 / 3.1
        let scale = BandScale::new(["Instagram", "Facebook", "Twitter"], (0.0, 730.0)).padding(0.1);
        let step = 730.0 / 3.1;
        assert!(approx(scale.step(), step));
        assert!(approx(scale.bandwidth(), step * 0.9));
        assert!(approx(scale.position("Instagram").unwrap(), step * 0.1));
        assert!(approx(scale.position("Twitter").unwrap(), step * 2.1));
        assert!(scale.position("LinkedIn").is_none());
    }

    #[test]
    fn test_band_scale_dedupes_keys() {
        let scale = BandScale::new(["A", "B", "A", "C", "B"], (0.0, 300.0));
        assert_eq!(scale.domain(), ["A", "B", "C"]);
        assert!(approx(scale.position("C").unwrap(), 200.0));
        assert!(approx(scale.center("A").unwrap(), 50.0));
    }

    #[test]
    fn test_band_scale_rounding() {
        let scale = BandScale::new(["Image", "Link", "Video"], (0.0, 212.0))
            .padding(0.05)
            .round(true);
        // step = floor(212 / 3.05) = 69
        assert_eq!(scale.step(), 69.0);
        assert_eq!(scale.bandwidth(), 66.0);
        assert_eq!(scale.position("Image"), Some(4.0));
        assert_eq!(scale.position("Video"), Some(142.0));
    }

    #[test]
    fn test_band_scale_empty_domain() {
        let scale = BandScale::new(Vec::<String>::new(), (0.0, 100.0)).padding(0.1);
        assert!(scale.domain().is_empty());
        assert!(scale.position("x").is_none());
    }

    #[test]
    fn test_linear_scale_maps_and_inverts_range() {
        let y = LinearScale::new((0.0, 1000.0), (340.0, 0.0));
        assert_eq!(y.scale(0.0), 340.0);
        assert_eq!(y.scale(1000.0), 0.0);
        assert_eq!(y.scale(500.0), 170.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let y = LinearScale::new((0.0, 0.0), (340.0, 0.0));
        assert_eq!(y.scale(0.0), 170.0);
        assert_eq!(y.ticks(10), vec![0.0]);
    }

    #[test]
    fn test_linear_ticks() {
        let y = LinearScale::new((0.0, 1000.0), (340.0, 0.0));
        let ticks = y.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[3], 300.0);
        assert_eq!(ticks[10], 1000.0);

        let y = LinearScale::new((0.0, 987.0), (340.0, 0.0));
        assert_eq!(y.ticks(10).last(), Some(&900.0));

        let y = LinearScale::new((0.0, 1.0), (100.0, 0.0));
        let ticks = y.ticks(5);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_subnormal_domain_has_no_ticks() {
        let y = LinearScale::new((0.0, 1e-320), (340.0, 0.0));
        assert!(y.ticks(10).is_empty());
        assert_eq!(y.tick_format(10)(0.0), "0");
    }

    #[test]
    fn test_tick_format_precision() {
        let format = LinearScale::new((0.0, 12000.0), (0.0, 1.0)).tick_format(10);
        assert_eq!(format(2000.0), "2,000");
        assert_eq!(format(12000.0), "12,000");

        let format = LinearScale::new((0.0, 1.0), (0.0, 1.0)).tick_format(10);
        assert_eq!(format(0.3), "0.3");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1234567.0, 0), "1,234,567");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-1500.25, 2), "−1,500.25");
        assert_eq!(format_grouped(-0.0, 0), "0");
    }

    #[test]
    fn test_ordinal_scale_cycles_palette() {
        let color = OrdinalScale::new(["Image", "Link", "Video", "Story"], &CATEGORY_PALETTE);
        assert_eq!(color.color("Image"), "#1f77b4");
        assert_eq!(color.color("Video"), "#2ca02c");
        assert_eq!(color.color("Story"), "#1f77b4");
    }
}
