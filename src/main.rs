use bannersmith::render::{GimpBackend, RenderBackend};
use bannersmith::{config, fields, generate, output};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "bannersmith")]
#[command(about = "Generate event banners from layered GIMP templates")]
#[command(long_about = "\
Generate event banners from layered GIMP templates

A template is a normal .xcf file whose editable content lives in layers with
conventional names:

  Title1, Title2, SpeakerName, SpeakerTitle, Date, Time   # text layers
  SpeakerPhoto                                            # photo placeholder

Generation fills those layers from the command line and exports two files per
template — the editable .xcf and a flattened .png — named from the event date
and title (e.g. 2025-12-31-ai-worksho.png). Title1, SpeakerName, Date and
Time are required; the other layers are optional and may be absent from a
template entirely. A supplied photo is scaled to fit the SpeakerPhoto
placeholder, preserving its aspect ratio, and centered.

Requires GIMP 3.0+ (gimp-console is used when installed). The date field is
free-form: \"Dec 31\", \"2025-01-15\", \"March 3rd, 2026\" all work; year-less
dates assume the next occurrence.

Examples:

  # Single template
  bannersmith generate -t templates/banner.xcf -o ./out --title1 \"AI Meetup\" \\
      --speaker-name \"Jane Doe\" --date \"Feb 20\" --time \"7:00 PM\"

  # All templates in a directory, with a speaker photo
  bannersmith generate -T templates/ -o ./out --title1 \"AI Meetup\" \\
      --speaker-name \"Jane Doe\" --date \"Feb 20\" --photo speaker.jpg

Run 'bannersmith gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ~/.config/bannersmith/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate banners from one or more templates
    Generate(GenerateArgs),
    /// Report which conventional layers a template has
    Check {
        /// GIMP template file (.xcf)
        template: PathBuf,
    },
    /// List the .xcf templates in a directory
    Templates {
        /// Directory to list (default: template_directory from config)
        dir: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// GIMP template file(s) (.xcf)
    #[arg(long = "template", short = 't', value_name = "FILE")]
    templates: Vec<PathBuf>,

    /// Directory containing .xcf templates (all will be used)
    #[arg(long, short = 'T', value_name = "DIR")]
    template_dir: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Main title text
    #[arg(long, value_name = "TEXT")]
    title1: String,

    /// Subtitle text
    #[arg(long, default_value = "", value_name = "TEXT")]
    title2: String,

    /// Speaker name
    #[arg(long, value_name = "TEXT")]
    speaker_name: String,

    /// Speaker title/affiliation
    #[arg(long, default_value = "", value_name = "TEXT")]
    speaker_title: String,

    /// Event date (flexible format: "Jan 15", "2025-01-15", etc.)
    #[arg(long, value_name = "TEXT")]
    date: String,

    /// Event time (default: default_time from config)
    #[arg(long, value_name = "TEXT")]
    time: Option<String>,

    /// Speaker photo file
    #[arg(long, value_name = "FILE")]
    photo: Option<PathBuf>,

    /// Open each generated .xcf in GIMP afterwards
    #[arg(long)]
    open: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args, &config),
        Command::Check { template } => run_check(&template, &config),
        Command::Templates { dir } => {
            let dir = dir
                .or_else(|| config.template_directory.clone())
                .ok_or("no directory given and no template_directory in config")?;
            let templates = generate::find_templates(&dir)?;
            output::print_template_list(&dir, &templates);
            Ok(())
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}

fn backend_from(config: &config::ToolConfig) -> GimpBackend {
    GimpBackend::with_settings(config.engine.binary.clone(), config.engine.timeout_secs)
}

fn run_generate(
    args: GenerateArgs,
    config: &config::ToolConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut templates = Vec::new();

    // An explicit -T wins; the configured template directory only kicks in
    // when the command line names no templates at all.
    let dir = args.template_dir.clone().or_else(|| {
        if args.templates.is_empty() {
            config.template_directory.clone()
        } else {
            None
        }
    });
    if let Some(dir) = &dir {
        let found = generate::find_templates(dir)?;
        if found.is_empty() {
            return Err(format!("no .xcf files found in {}", dir.display()).into());
        }
        templates.extend(found);
    }
    for template in &args.templates {
        if !template.exists() {
            return Err(format!("template not found: {}", template.display()).into());
        }
        templates.push(template.clone());
    }
    if templates.is_empty() {
        return Err(
            "at least one of --template/-t or --template-dir/-T is required \
             (or set template_directory in the config)"
                .into(),
        );
    }

    let output_dir = args
        .output_dir
        .or_else(|| config.output_directory.clone())
        .ok_or("no output directory: pass --output-dir or set output_directory in the config")?;
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        if !args.quiet {
            println!("Created output directory: {}", output_dir.display());
        }
    }

    if let Some(photo) = &args.photo {
        if !photo.exists() {
            return Err(format!("photo not found: {}", photo.display()).into());
        }
    }

    let request = generate::GenerateRequest {
        templates,
        fields: fields::FieldSet {
            title1: args.title1,
            title2: args.title2,
            speaker_name: args.speaker_name,
            speaker_title: args.speaker_title,
            date: args.date,
            time: args.time.unwrap_or_else(|| config.default_time.clone()),
        },
        photo: args.photo,
        output_dir,
        today: Local::now().date_naive(),
        open_result: args.open,
    };

    let backend = backend_from(config);
    let summary = generate::generate_banners(&backend, &request)?;

    if args.quiet {
        for outcome in &summary.outcomes {
            if let Err(err) = &outcome.result {
                eprintln!("Error generating {}: {err}", outcome.template.display());
            }
        }
    } else {
        output::print_generate_summary(&summary);
    }

    if !summary.all_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_check(template: &Path, config: &config::ToolConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = backend_from(config);
    let manifest = backend.read_manifest(template)?;
    output::print_check_report(template, &manifest);

    let missing = fields::TextField::ALL
        .iter()
        .any(|f| f.is_required() && !manifest.contains(f.layer_name()));
    if missing {
        std::process::exit(1);
    }
    Ok(())
}
