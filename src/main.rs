use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use pothole_guard::cli::{CliArgs, MediaKindArg};
use pothole_guard::detector::Configuration;
use pothole_guard::geocode::{Coordinates, LocationResolver, NominatimResolver, NoopResolver};
use pothole_guard::pipeline::{MediaKind, Pipeline, PipelineConfig};
use pothole_guard::report;
use pothole_guard::settings::EffectiveSettings;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.list_backends {
        print_available_backends();
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_available_backends() {
    let available = Configuration::available_backends();
    if available.is_empty() {
        println!("no detection backends compiled into this build");
        return;
    }
    println!("available backends:");
    for backend in available {
        println!("  {backend}");
    }
}

async fn run(args: CliArgs) -> Result<(), Box<dyn Error>> {
    let settings = EffectiveSettings::resolve(&args)?;

    let input = args
        .input
        .clone()
        .ok_or("no input media path provided")?;
    let kind = match args.kind {
        Some(MediaKindArg::Image) => MediaKind::Image,
        Some(MediaKindArg::Video) => MediaKind::Video,
        None => MediaKind::from_path(&input).ok_or_else(|| {
            format!(
                "cannot infer media kind from {}; pass --kind image|video",
                input.display()
            )
        })?,
    };

    let coordinates = Coordinates::from_parts(args.lat.as_deref(), args.lon.as_deref());
    if coordinates.is_none() && (args.lat.is_some() || args.lon.is_some()) {
        eprintln!("incomplete or unparsable coordinates; reporting without an address");
    }

    let detector = Configuration {
        backend: settings.backend,
    }
    .create_detector()?;

    let resolver: Arc<dyn LocationResolver> = if settings.offline {
        Arc::new(NoopResolver)
    } else {
        Arc::new(NominatimResolver::new(
            &settings.user_agent,
            settings.timeout,
        )?)
    };

    let pipeline = Pipeline::with_config(
        detector,
        resolver,
        PipelineConfig {
            confidence_threshold: settings.confidence_threshold,
        },
    );

    let result = pipeline.process(&input, kind, coordinates).await?;

    println!("potholes: {}", result.severity_estimate);
    println!("address: {}", result.address);
    if let Some(coords) = result.coordinates {
        println!("coordinates: {coords}");
    }

    let written = report::export_images(&result, &settings.output_dir)?;
    for path in &written {
        println!("wrote {}", path.display());
    }

    Ok(())
}
