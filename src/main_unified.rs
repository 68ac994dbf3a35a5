//! AVATAR INSIGHTS - Unified Entry Point
//!
//! Avatar branch: Options → Build → Export PNG → Download link
//! Personality branch: Sliders | Text → Scores → Statements + Chart

mod demiurge;
mod effigy;
mod initiation;
mod logos;
mod page;
mod priests;
mod utils;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::demiurge::describer::SUMMARY;
use crate::demiurge::plotter::format_score;
use crate::demiurge::source::SLIDER_DEFAULT;
use crate::demiurge::{describe, ManualScores, TraitPlotter, TraitScores, TraitSource};
use crate::effigy::{download_link, AvatarBuilder, AvatarOptions, Category, ImageExporter};
use crate::initiation::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::page::{avatar_section, insights_section, Page};
use crate::priests::PersonalityService;
use crate::utils::resolve_path;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (created with defaults when missing)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Run on CPU rather than on GPU.
    #[arg(long)]
    cpu: bool,

    /// Hub model id of the personality classifier
    #[arg(long)]
    model_id: Option<String>,

    /// Model revision
    #[arg(long)]
    revision: Option<String>,

    /// Local checkpoint directory (config.json, tokenizer.json, weights)
    #[arg(long)]
    model_dir: Option<String>,

    /// Debug logging on stderr
    #[arg(long, short)]
    verbose: bool,

    /// Enable tracing (generates a trace-timestamp.json file).
    #[arg(long)]
    tracing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List avatar categories and their allowed values
    Options,
    /// Render the avatar to PNG and print its download link
    Avatar {
        #[command(flatten)]
        avatar: AvatarArgs,
        /// Output file (overrides the configured path)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Personality insights from sliders or free text
    Analyze {
        #[command(subcommand)]
        source: SourceArgs,
        /// Print scores and statements as JSON
        #[arg(long)]
        json: bool,
        /// Where to write the SVG chart (overrides the configured path)
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Write the full HTML page: avatar plus optional insights
    Page {
        #[command(flatten)]
        avatar: AvatarArgs,
        #[command(subcommand)]
        source: Option<SourceArgs>,
        /// Output file (overrides the configured path)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// One flag per avatar category; defaults are each category's first value
#[derive(ClapArgs, Debug)]
struct AvatarArgs {
    #[arg(long, default_value = "CIRCLE")]
    style: String,
    #[arg(long, default_value = "TANNED")]
    skin_color: String,
    #[arg(long, default_value = "NO_HAIR")]
    top_type: String,
    #[arg(long, default_value = "AUBURN")]
    hair_color: String,
    #[arg(long, default_value = "BLAZER_SHIRT")]
    clothe_type: String,
    #[arg(long, default_value = "BAT")]
    clothe_graphic_type: String,
    #[arg(long, default_value = "DEFAULT")]
    mouth_type: String,
    #[arg(long, default_value = "DEFAULT")]
    eye_type: String,
    #[arg(long, default_value = "DEFAULT")]
    eyebrow_type: String,
    #[arg(long, default_value = "DEFAULT")]
    accessories_type: String,
}

impl AvatarArgs {
    fn to_options(&self) -> AvatarOptions {
        AvatarOptions::empty()
            .with(Category::Style, &self.style)
            .with(Category::SkinColor, &self.skin_color)
            .with(Category::TopType, &self.top_type)
            .with(Category::HairColor, &self.hair_color)
            .with(Category::ClotheType, &self.clothe_type)
            .with(Category::ClotheGraphicType, &self.clothe_graphic_type)
            .with(Category::MouthType, &self.mouth_type)
            .with(Category::EyeType, &self.eye_type)
            .with(Category::EyebrowType, &self.eyebrow_type)
            .with(Category::AccessoriesType, &self.accessories_type)
    }
}

#[derive(Subcommand, Debug)]
enum SourceArgs {
    /// Self-assessment sliders, 0-100
    Manual {
        /// Outgoing vs. Reserved
        #[arg(long, default_value_t = SLIDER_DEFAULT, value_parser = clap::value_parser!(u8).range(0..=100))]
        extraversion: u8,
        /// Compassionate vs. Critical
        #[arg(long, default_value_t = SLIDER_DEFAULT, value_parser = clap::value_parser!(u8).range(0..=100))]
        agreeableness: u8,
        /// Organized vs. Careless
        #[arg(long, default_value_t = SLIDER_DEFAULT, value_parser = clap::value_parser!(u8).range(0..=100))]
        conscientiousness: u8,
        /// Sensitive vs. Confident
        #[arg(long, default_value_t = SLIDER_DEFAULT, value_parser = clap::value_parser!(u8).range(0..=100))]
        neuroticism: u8,
        /// Creative vs. Practical
        #[arg(long, default_value_t = SLIDER_DEFAULT, value_parser = clap::value_parser!(u8).range(0..=100))]
        openness: u8,
    },
    /// Describe your personality in a few sentences
    Text {
        description: String,
    },
}

impl SourceArgs {
    fn to_source(&self) -> TraitSource {
        match self {
            SourceArgs::Manual {
                extraversion,
                agreeableness,
                conscientiousness,
                neuroticism,
                openness,
            } => TraitSource::Manual(ManualScores {
                extraversion: *extraversion,
                agreeableness: *agreeableness,
                conscientiousness: *conscientiousness,
                neuroticism: *neuroticism,
                openness: *openness,
            }),
            SourceArgs::Text { description } => TraitSource::Inferred(description.clone()),
        }
    }
}

/// Config file first, then flags on top
fn effective_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_init(&resolve_path(&args.config))?.resolved();
    if args.cpu {
        config.model.force_cpu = true;
    }
    if let Some(model_id) = &args.model_id {
        config.model.model_id = model_id.clone();
    }
    if let Some(revision) = &args.revision {
        config.model.revision = revision.clone();
    }
    if let Some(dir) = &args.model_dir {
        config.model.model_dir = Some(resolve_path(dir));
    }
    config.validate()?;
    Ok(config)
}

fn print_options() {
    for category in Category::ALL {
        println!("{} ({})", category.label(), category.key());
        println!("    {}", category.values().join(", "));
    }
}

fn run_avatar(options: &AvatarOptions, exporter: &ImageExporter) -> Result<()> {
    // construction errors are user errors: report and skip the export
    let avatar = match AvatarBuilder::build(options) {
        Ok(avatar) => avatar,
        Err(err) => {
            eprintln!("❌ Error creating avatar: {err}");
            return Ok(());
        }
    };
    let path = exporter.export(&avatar)?;
    println!("🎨 Avatar written to {}", path.display());
    match download_link(&path) {
        Ok(link) => println!("{link}"),
        Err(err) => eprintln!("❌ {err}"),
    }
    Ok(())
}

fn print_insights(source: &TraitSource, scores: &TraitScores, plotter: &TraitPlotter) {
    println!("\n📋 Your Personality Profile");
    println!("Based on your {}, here are your insights:", source.label());
    for (t, v) in scores.iter() {
        println!("  {} ({}): {}", t.name(), t.poles(), format_score(v));
    }
    println!();
    for statement in describe(scores) {
        println!("  - {statement}");
    }
    println!("Summary: {SUMMARY}\n");
    print!("{}", plotter.to_text(scores, 40));
}

fn run_analyze(
    source: &TraitSource,
    service: &PersonalityService,
    chart_path: &std::path::Path,
    json: bool,
) -> Result<()> {
    if matches!(source, TraitSource::Inferred(_)) {
        println!("🔍 Analyzing your personality description...");
    }
    let scores = source.resolve(service)?;
    let plotter = TraitPlotter::default();
    plotter.write_svg(&scores, chart_path)?;

    if json {
        let report = serde_json::json!({
            "source": source.label(),
            "scores": scores,
            "statements": describe(&scores),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_insights(source, &scores, &plotter);
        println!("\n📊 Chart written to {}", chart_path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = initiation::init_tracing(args.verbose, args.tracing);

    let config = effective_config(&args)?;
    tracing::debug!(?config, "effective configuration");

    // the model is only touched if a text analysis runs
    let service = PersonalityService::from_config(&config.model);

    match &args.command {
        Command::Options => print_options(),
        Command::Avatar { avatar, output } => {
            let path = output.clone().unwrap_or_else(|| config.output.avatar_path.clone());
            run_avatar(&avatar.to_options(), &ImageExporter::new(path))?;
        }
        Command::Analyze {
            source,
            json,
            chart,
        } => {
            let chart_path = chart.clone().unwrap_or_else(|| config.output.chart_path.clone());
            run_analyze(&source.to_source(), &service, &chart_path, *json)?;
        }
        Command::Page {
            avatar,
            source,
            output,
        } => {
            let exporter = ImageExporter::new(config.output.avatar_path.clone());
            let avatar = avatar_section(&avatar.to_options(), &exporter)?;
            let insights = match source {
                Some(source) => Some(insights_section(
                    &source.to_source(),
                    &service,
                    &TraitPlotter::default(),
                )?),
                None => None,
            };
            let page = Page { avatar, insights };
            let path = output.clone().unwrap_or_else(|| config.output.page_path.clone());
            std::fs::write(&path, page.render_html())?;
            println!("🏛️ Page written to {}", path.display());
        }
    }
    Ok(())
}
