use anyhow::Result;
use clap::Parser;
use scriptox::app::App;
use scriptox::models::TargetLanguage;
use scriptox::upload::read_artifact;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "scriptox")]
#[command(about = "Convert handwritten lab records to clean digital code")]
struct CliArgs {
    /// Photo (JPEG/PNG) or PDF scan of the handwritten code.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Target language: C, Java, Python or C++.
    #[arg(short, long, value_parser = parse_language_arg)]
    lang: TargetLanguage,

    /// Declared MIME type, overriding detection from the file extension.
    #[arg(long, value_name = "TYPE")]
    mime: Option<String>,

    /// Also save the code into this directory.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the code as a fenced Markdown block.
    #[arg(long)]
    fenced: bool,
}

fn parse_language_arg(input: &str) -> std::result::Result<TargetLanguage, String> {
    input.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scriptox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let artifact = match read_artifact(&args.file, args.mime.as_deref()).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Could not read {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    let session = app.session();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            session.cancel();
        }
    });

    info!("Synthesizing {} code from {}", args.lang, args.file.display());

    match app.run(artifact, args.lang).await {
        Ok(Some(export)) => {
            if args.fenced {
                println!("{}", export.fenced());
            } else {
                println!("{}", export.contents);
            }
            if let Some(dir) = &args.output_dir {
                let path = export.write_to_dir(dir).await?;
                info!("Download ready: {} ({})", path.display(), export.mime_type);
            }
            Ok(())
        }
        Ok(None) => {
            warn!("No code was extracted from {}", args.file.display());
            std::process::exit(2);
        }
        Err(e) => {
            error!("Synthesis error: {}", e);
            std::process::exit(1);
        }
    }
}
