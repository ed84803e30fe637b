use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use unused_analyzer::config::{LogLevel, Settings};
use unused_analyzer::driver;

#[derive(Parser, Debug)]
#[command(name = "unused-analyzer", version, about)]
#[command(group = ArgGroup::new("input").required(true).args(["compile_commands", "commands_from", "ast_json"]))]
struct Args {
    /// Path to a compile_commands.json.
    #[arg(long)]
    compile_commands: Option<PathBuf>,

    /// File with one build command per line (`-` for stdin), e.g. the
    /// output of `ninja -t commands`.
    #[arg(long)]
    commands_from: Option<PathBuf>,

    /// Scan a single pre-produced AST dump (`-` for stdin).
    #[arg(long)]
    ast_json: Option<PathBuf>,

    /// Absolute project root; defaults to the current directory.
    #[arg(long)]
    project_root: Option<String>,

    /// The compiler's working directory; defaults to the project root.
    #[arg(long)]
    build_dir: Option<String>,

    /// Project-relative third-party subpath to skip (repeatable).
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Settings file; defaults to ./unused-analyzer.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Concurrent translation units.
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    #[arg(long)]
    no_cache: bool,

    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Report destination; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load(args.config.as_deref())?;

    // CLI flags are the last patch before normalization.
    if let Some(root) = &args.project_root {
        settings.scope.project_root = root.clone();
    }
    if let Some(build_dir) = &args.build_dir {
        settings.scope.build_dir = build_dir.clone();
    }
    if !args.exclude.is_empty() {
        settings.scope.exclude = args.exclude.clone();
    }
    if let Some(jobs) = args.jobs {
        settings.driver.jobs = jobs;
    }
    if args.no_cache {
        settings.driver.cache = false;
    }
    if let Some(cache_dir) = &args.cache_dir {
        settings.driver.cache_dir = cache_dir.display().to_string();
    }
    if args.verbose {
        settings.logging.level = LogLevel::Debug;
    }
    if let Some(log_file) = &args.log_file {
        settings.logging.file = log_file.display().to_string();
    }

    settings.normalize();
    Ok(settings)
}

fn init_tracing(settings: &Settings) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(settings.logging.directive()));

    let file_layer = (!settings.logging.file.is_empty()).then(|| {
        let path = PathBuf::from(&settings.logging.file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("unused-analyzer.log"));
        let appender = tracing_appender::rolling::never(dir, name);
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(settings.logging.directive()))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

async fn run(args: Args, settings: Settings) -> Result<Vec<(bool, String)>, Box<dyn std::error::Error>> {
    if let Some(dump) = &args.ast_json {
        let scope = settings.scope.to_scope_config();
        let records = if dump.as_os_str() == "-" {
            driver::analyze_dump(std::io::stdin().lock(), "<stdin>", &scope)?
        } else {
            let name = dump.display().to_string();
            driver::analyze_dump(File::open(dump)?, &name, &scope)?
        };
        return Ok(records);
    }

    let invocations = if let Some(path) = &args.compile_commands {
        driver::from_compile_commands(path)?
    } else if let Some(path) = &args.commands_from {
        let text = driver::read_command_stream(path)?;
        driver::from_command_stream(&text, &settings.scope.build_dir, &settings.driver.compilers)
    } else {
        Vec::new()
    };

    if invocations.is_empty() {
        info!("no compiler invocations found; nothing to analyze");
        return Ok(Vec::new());
    }

    Ok(driver::analyze_all(invocations, &settings).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("unused-analyzer: {e}");
            return ExitCode::FAILURE;
        },
    };

    init_tracing(&settings);
    info!("unused-analyzer v{}", env!("CARGO_PKG_VERSION"));

    let output = args.output.clone();
    let records = match run(args, settings).await {
        Ok(records) => records,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let written = match &output {
        Some(path) => {
            File::create(path).and_then(|mut file| driver::emit(&records, &mut file))
        },
        None => driver::emit(&records, &mut std::io::stdout().lock()),
    };

    match written {
        Ok(()) => {
            let dest = output.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
            info!("report written to {dest}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("failed to write report: {e}");
            ExitCode::FAILURE
        },
    }
}
