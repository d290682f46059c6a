use clap::{Parser, Subcommand};
use cli::{parse_hex_color, parse_numbers, render_side, OutlineCliError, RenderJob, SideConfig};
use color_eyre::eyre::{Result, WrapErr};
use outline::{compose_comparison, EditCommand, OutlineStyle, OutlineStyleConfig, RasterBuffer};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render using a job configuration file (.toml or .json)
    Render {
        /// Path to the job configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Outline a single image from command line flags
    Quick {
        /// Image to outline
        #[arg(short, long)]
        image: PathBuf,
        /// Mask image (defaults to the image's own alpha channel)
        #[arg(short, long)]
        mask: Option<PathBuf>,
        /// Where to write the PNG result
        #[arg(short, long)]
        output: PathBuf,
        /// Outline thickness in pixels (1-100)
        #[arg(short, long, default_value_t = 10)]
        thickness: u32,
        /// Outline color as hex, e.g. ffffff
        #[arg(long, default_value = "ffffff")]
        color: String,
        /// Outline style: solid, gradient or glow
        #[arg(long, default_value = "solid")]
        style: OutlineStyle,
        /// Erase stroke as x,y,radius (repeatable)
        #[arg(long)]
        erase: Vec<String>,
        /// Exclude the outline segment under x,y (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Print the JSON schema of edit commands and job files
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { config } => {
            run_job(&config).await?;
        }
        Commands::Quick {
            image,
            mask,
            output,
            thickness,
            color,
            style,
            erase,
            exclude,
        } => {
            let side = quick_side(&image, mask.as_deref(), thickness, &color, style, &erase, &exclude)?;
            let started = Instant::now();
            let rendered = tokio::task::spawn_blocking(move || render_side(&side)).await??;
            info!("Rendered in {:?}", started.elapsed());
            save(&rendered, &output)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&EditCommand::schema())?);
            println!("{}", serde_json::to_string_pretty(&schemars::schema_for!(RenderJob))?);
        }
    }

    Ok(())
}

async fn run_job(config_path: &Path) -> Result<()> {
    let job = RenderJob::from_file(config_path)
        .wrap_err_with(|| format!("Failed to load job {}", config_path.display()))?;
    info!("Render job: {:?}", job);

    let started = Instant::now();
    let subject = job.subject.clone();
    let rendered = match job.after.clone() {
        Some(after) => {
            // Each side has its own session, so they render independently
            let before_task = tokio::task::spawn_blocking(move || render_side(&subject));
            let after_task = tokio::task::spawn_blocking(move || render_side(&after));
            let (before, after) = tokio::try_join!(before_task, after_task)?;
            compose_comparison(&before?, &after?, &job.comparison)
        }
        None => tokio::task::spawn_blocking(move || render_side(&subject)).await??,
    };
    info!("Rendered in {:?}", started.elapsed());

    save(&rendered, Path::new(&job.output))?;
    info!("✅ Outline written to {}", job.output);
    Ok(())
}

fn quick_side(
    image: &Path,
    mask: Option<&Path>,
    thickness: u32,
    color: &str,
    style: OutlineStyle,
    erase: &[String],
    exclude: &[String],
) -> Result<SideConfig, OutlineCliError> {
    let mut edits = Vec::with_capacity(erase.len() + exclude.len());
    for stroke in erase {
        let [x, y, radius] = parse_numbers::<3>("erase stroke", stroke)?;
        edits.push(EditCommand::Erase { x, y, radius });
    }
    for point in exclude {
        let [x, y] = parse_numbers::<2>("exclude point", point)?;
        edits.push(EditCommand::Exclude { x, y });
    }

    Ok(SideConfig {
        image: image.display().to_string(),
        mask: mask.map(|m| m.display().to_string()),
        outline: OutlineStyleConfig::new(parse_hex_color(color)?, thickness, style),
        edits,
    })
}

fn save(image: &RasterBuffer, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image
        .save(output)
        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
