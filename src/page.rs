//! 🏛️ Page - both branches composed into one HTML document
//!
//! The avatar branch reports its own failures inline; the insights branch
//! renders regardless of what happened to the avatar.

use anyhow::Result;
use std::fmt::Write as _;

use crate::demiurge::describer::SUMMARY;
use crate::demiurge::plotter::format_score;
use crate::demiurge::{describe, Statement, TraitPlotter, TraitScores, TraitSource};
use crate::effigy::exporter::png_data_uri;
use crate::effigy::{download_link, AvatarBuilder, AvatarOptions, ImageExporter};
use crate::priests::PersonalityService;
use crate::utils::escape_html;

pub const TITLE: &str = "Advanced Avatar & Personality Insights";
const TAGLINE: &str = "Design a custom avatar, and get accurate insights into your personality traits using modern frameworks.";

#[derive(Debug, Clone, PartialEq)]
pub enum AvatarSection {
    Ready { image_uri: String, link: String },
    /// The selection did not resolve; nothing was written
    Invalid(String),
    /// Written, but gone before it could be embedded
    Missing(String),
}

/// Build → export → encode, with the two expected failures kept inline
pub fn avatar_section(options: &AvatarOptions, exporter: &ImageExporter) -> Result<AvatarSection> {
    let avatar = match AvatarBuilder::build(options) {
        Ok(avatar) => avatar,
        Err(err) => {
            tracing::warn!(%err, "avatar construction failed");
            return Ok(AvatarSection::Invalid(format!("Error creating avatar: {err}")));
        }
    };
    let path = exporter.export(&avatar)?;
    let encoded = png_data_uri(&path).and_then(|uri| Ok((uri, download_link(&path)?)));
    Ok(match encoded {
        Ok((image_uri, link)) => AvatarSection::Ready { image_uri, link },
        Err(err) => {
            tracing::warn!(%err, "avatar artifact missing");
            AvatarSection::Missing(format!("Image file not found! ({err})"))
        }
    })
}

#[derive(Debug, Clone)]
pub struct InsightsSection {
    pub source_label: &'static str,
    pub scores: TraitScores,
    pub statements: Vec<Statement>,
    pub chart_svg: String,
}

pub fn insights_section(
    source: &TraitSource,
    service: &PersonalityService,
    plotter: &TraitPlotter,
) -> Result<InsightsSection> {
    let scores = source.resolve(service)?;
    Ok(InsightsSection {
        source_label: source.label(),
        statements: describe(&scores),
        chart_svg: plotter.to_svg(&scores),
        scores,
    })
}

pub struct Page {
    pub avatar: AvatarSection,
    /// `None` until an analysis was requested
    pub insights: Option<InsightsSection>,
}

impl Page {
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>",
            title = escape_html(TITLE)
        );
        let _ = writeln!(html, "<h1>{}</h1>\n<p>{}</p>\n<hr>", escape_html(TITLE), TAGLINE);

        let _ = writeln!(html, "<h3>Your Customized Avatar</h3>");
        match &self.avatar {
            AvatarSection::Ready { image_uri, link } => {
                let _ = writeln!(
                    html,
                    "<figure><img src=\"{image_uri}\" alt=\"Your Avatar\"><figcaption>Your Avatar</figcaption></figure>\n<p>{link}</p>"
                );
            }
            AvatarSection::Invalid(message) | AvatarSection::Missing(message) => {
                let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
            }
        }

        let _ = writeln!(html, "<hr>\n<h2>Advanced Personality Insights</h2>");
        if let Some(insights) = &self.insights {
            let _ = writeln!(html, "<h3>Your Personality Profile</h3>");
            let _ = writeln!(
                html,
                "<p>Based on your {}, here are your insights:</p>",
                insights.source_label
            );
            let _ = writeln!(html, "<table>");
            for (t, v) in insights.scores.iter() {
                let _ = writeln!(
                    html,
                    "<tr><th>{} <small>({})</small></th><td>{}</td></tr>",
                    t.name(),
                    t.poles(),
                    format_score(v)
                );
            }
            let _ = writeln!(html, "</table>\n<ul>");
            for statement in &insights.statements {
                let _ = writeln!(
                    html,
                    "<li><strong>{}:</strong> {}</li>",
                    statement.label, statement.detail
                );
            }
            let _ = writeln!(html, "</ul>\n<p><strong>Summary:</strong> {SUMMARY}</p>");
            html.push_str(&insights.chart_svg);
        }

        let _ = writeln!(html, "<hr>\n<p><strong>App Built with Rust</strong></p>\n</body>\n</html>");
        html
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::demiurge::ManualScores;
    use crate::effigy::Category;
    use anyhow::anyhow;
    use tempfile::TempDir;

    fn no_model() -> PersonalityService {
        PersonalityService::new(|| Err(anyhow!("no model in tests")), 0)
    }

    #[test]
    fn test_valid_avatar_section() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = ImageExporter::new(temp_dir.path().join("avatar.png"));
        let section = avatar_section(&AvatarOptions::default(), &exporter).unwrap();
        match section {
            AvatarSection::Ready { image_uri, link } => {
                assert!(image_uri.starts_with("data:image/png;base64,"));
                assert!(link.contains(&image_uri));
            }
            other => panic!("expected a rendered avatar, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_avatar_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("avatar.png");
        let exporter = ImageExporter::new(&path);
        let options = AvatarOptions::default().with(Category::HairColor, "GREEN");

        let section = avatar_section(&options, &exporter).unwrap();
        assert!(matches!(section, AvatarSection::Invalid(ref m) if m.contains("GREEN")));
        assert!(!path.exists());
    }

    #[test]
    fn test_page_keeps_insights_after_avatar_error() {
        let plotter = TraitPlotter::default();
        let manual = ManualScores {
            extraversion: 85,
            agreeableness: 20,
            conscientiousness: 50,
            neuroticism: 15,
            openness: 90,
        };
        let insights =
            insights_section(&TraitSource::Manual(manual), &no_model(), &plotter).unwrap();
        assert_eq!(insights.statements.len(), 4);

        let page = Page {
            avatar: AvatarSection::Invalid("Error creating avatar: bad <value>".into()),
            insights: Some(insights),
        };
        let html = page.render_html();
        assert!(html.contains("bad &lt;value&gt;"));
        assert!(html.contains("<strong>Critical Thinker:</strong>"));
        assert!(html.contains("<svg"));
        assert!(html.contains(SUMMARY));
        assert!(html.contains("self-assessment"));
        assert!(html.contains("<th>Extraversion <small>(Outgoing vs. Reserved)</small></th><td>85</td>"));
    }

    #[test]
    fn test_page_without_analysis() {
        let page = Page {
            avatar: AvatarSection::Missing("Image file not found!".into()),
            insights: None,
        };
        let html = page.render_html();
        assert!(html.contains("Advanced Personality Insights"));
        assert!(!html.contains("Your Personality Profile"));
        assert!(html.ends_with("</html>\n"));
    }
}
