use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Instant;
use thumbsmith::{BatchScheduler, Cli, Commands, RasterOps};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let started = Instant::now();

    match cli.command {
        Commands::Generate(args) => process_generate(args)?,
        Commands::Info { input } => process_info(input)?,
    }

    log::info!("runtime: {:.2?}", started.elapsed());

    Ok(())
}

fn process_generate(args: thumbsmith::GenerateArgs) -> anyhow::Result<()> {
    let config = args.into_run_config()?;
    config.validate()?;

    let scheduler = BatchScheduler::new(config.max_concurrency)?;
    let result = scheduler.run(&RasterOps::new(), &config)?;

    for report in result.failures() {
        eprintln!(
            "failed to generate {}: {}",
            report.output_path.display(),
            report.failure().map(|e| e.to_string()).unwrap_or_default()
        );
    }

    println!(
        "Generated {} of {} thumbnails",
        result.generated_count(),
        result.reports.len()
    );

    if result.any_failed() {
        anyhow::bail!("{} thumbnails failed", result.failed_count());
    }

    Ok(())
}

fn process_info(input: PathBuf) -> anyhow::Result<()> {
    use thumbsmith::{format_file_size, get_image_info};

    if !input.exists() {
        anyhow::bail!("File does not exist: {}", input.display());
    }

    let file_size = std::fs::metadata(&input)?.len();
    let (width, height, format) = get_image_info(&input)?;
    let aspect_ratio = width as f32 / height as f32;

    println!("=== Image Information ===");
    println!("File: {}", input.display());
    println!("Size: {}", format_file_size(file_size));
    println!("Dimensions: {} x {} pixels", width, height);
    println!("Aspect Ratio: {:.2}:1", aspect_ratio);
    println!("Format: {}", format);

    Ok(())
}
