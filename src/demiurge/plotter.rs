//! 📊 Trait plotter - bar chart as SVG and as terminal text
//!
//! The y axis is pinned to [0, 100] regardless of the data.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use super::traits::{TraitScores, SCORE_MAX};
use crate::utils::escape_html;

pub const DEFAULT_CHART_FILE: &str = "personality.svg";

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title: String,
    pub y_label: String,
    pub bar_color: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Personality Traits".to_string(),
            y_label: "Scores".to_string(),
            bar_color: "skyblue".to_string(),
            width: 640,
            height: 384,
        }
    }
}

pub struct TraitPlotter {
    style: ChartStyle,
}

impl Default for TraitPlotter {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

// plot area margins
const LEFT: f32 = 64.0;
const RIGHT: f32 = 24.0;
const TOP: f32 = 44.0;
const BOTTOM: f32 = 56.0;

impl TraitPlotter {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Standalone SVG document, one bar per trait
    pub fn to_svg(&self, scores: &TraitScores) -> String {
        let w = self.style.width as f32;
        let h = self.style.height as f32;
        let plot_w = w - LEFT - RIGHT;
        let plot_h = h - TOP - BOTTOM;
        let baseline = TOP + plot_h;
        let slot = plot_w / scores.iter().count() as f32;
        let bar_w = slot * 0.8;

        let mut svg = String::new();
        // writing into a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
            self.style.width, self.style.height, self.style.width, self.style.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="16" text-anchor="middle">{}</text>"#,
            LEFT + plot_w / 2.0,
            TOP / 2.0 + 6.0,
            escape_html(&self.style.title)
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 16 {:.1})">{}</text>"#,
            TOP + plot_h / 2.0,
            TOP + plot_h / 2.0,
            escape_html(&self.style.y_label)
        );

        for tick in (0..=100).step_by(20) {
            let y = baseline - plot_h * tick as f32 / SCORE_MAX;
            let _ = writeln!(
                svg,
                r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
                LEFT,
                LEFT + plot_w
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{tick}</text>"#,
                LEFT - 6.0,
                y + 4.0
            );
        }

        for (i, (t, value)) in scores.iter().enumerate() {
            let bar_h = plot_h * value / SCORE_MAX;
            let x = LEFT + slot * i as f32 + (slot - bar_w) / 2.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                baseline - bar_h,
                escape_html(&self.style.bar_color),
                t.name(),
                format_score(value)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
                x + bar_w / 2.0,
                baseline + 18.0,
                t.name()
            );
        }

        let _ = writeln!(
            svg,
            r#"<line x1="{LEFT:.1}" y1="{TOP:.1}" x2="{LEFT:.1}" y2="{baseline:.1}" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{LEFT:.1}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
            LEFT + plot_w
        );
        svg.push_str("</svg>\n");
        svg
    }

    pub fn write_svg(&self, scores: &TraitScores, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_svg(scores))
            .with_context(|| format!("writing chart to {}", path.display()))?;
        tracing::info!(path = %path.display(), "chart written");
        Ok(())
    }

    /// Horizontal bars for the terminal, `width` cells for a score of 100
    pub fn to_text(&self, scores: &TraitScores, width: usize) -> String {
        let name_w = scores.iter().map(|(t, _)| t.name().len()).max().unwrap_or(0);
        let mut out = format!("{}\n", self.style.title);
        for (t, value) in scores.iter() {
            let cells = ((value / SCORE_MAX) * width as f32).round() as usize;
            let _ = writeln!(
                out,
                "{:<name_w$} |{:<width$}| {:>6}",
                t.name(),
                "█".repeat(cells),
                format_score(value),
            );
        }
        out
    }
}

/// Integers print bare, model scores keep two decimals
pub fn format_score(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::demiurge::traits::Trait;

    fn scores() -> TraitScores {
        TraitScores::new([85.0, 20.0, 50.0, 15.0, 90.0]).unwrap()
    }

    #[test]
    fn test_svg_has_one_bar_per_trait() {
        let svg = TraitPlotter::default().to_svg(&scores());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"fill="skyblue""#).count(), 5);
        for t in Trait::ALL {
            assert!(svg.contains(&format!(">{}</text>", t.name())));
        }
        assert!(svg.contains("Personality Traits"));
        assert!(svg.contains(">100</text>"));
    }

    #[test]
    fn test_axis_is_fixed_to_hundred() {
        let plotter = TraitPlotter::default();
        let low = TraitScores::new([1.0; 5]).unwrap();
        let svg = plotter.to_svg(&low);
        // ticks do not rescale with data
        assert!(svg.contains(">100</text>"));
        assert!(svg.contains(">0</text>"));
        // full plot height is 384 - 44 - 56 = 284, so a score of 1 is 2.8 tall
        assert!(svg.contains(r#"height="2.8""#));
    }

    #[test]
    fn test_text_chart() {
        let text = TraitPlotter::default().to_text(&scores(), 10);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("Extraversion"));
        assert_eq!(lines[5].matches('█').count(), 9);
        assert!(lines[3].ends_with("50"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(50.0), "50");
        assert_eq!(format_score(23.456), "23.46");
    }
}
