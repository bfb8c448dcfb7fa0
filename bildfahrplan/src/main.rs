use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bildfahrplan::compile::{LatexCompiler, LatexConfig};
use bildfahrplan::diagram::{DiagramError, RenderError, compile_diagram, generate};
use bildfahrplan::input::{LoadError, TimetableInput};
use bildfahrplan::output::{WriteError, write_artifact};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to generate diagram: {0}")]
    Diagram(#[from] DiagramError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Parser, Debug)]
#[command(name = "bildfahrplan", about = "Draw a graphical timetable from a JSON timetable")]
struct Cli {
    /// Timetable file.
    input: PathBuf,

    /// Output file. Defaults to the input name with `.pdf` (or `.tex` with `--tex-only`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the LaTeX document instead of compiling it.
    #[arg(long)]
    tex_only: bool,

    /// LaTeX engine to run.
    #[arg(long, env = "BILDFAHRPLAN_LATEX", default_value = "pdflatex")]
    latex: String,

    /// Time limit per compiler run, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Keep the compiler's working files in this directory.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// More log output; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self
                .input
                .with_extension(if self.tex_only { "tex" } else { "pdf" }),
        }
    }

    fn latex_config(&self) -> LatexConfig {
        let mut config = LatexConfig {
            program: self.latex.clone(),
            ..LatexConfig::default()
        }
        .with_timeout(Duration::from_secs(self.timeout));
        if let Some(dir) = &self.work_dir {
            config = config.with_work_dir(dir);
        }
        config
    }
}

fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    let input = TimetableInput::load(&cli.input).await?;
    let diagram = generate(&input.general.stations, &input.general.lines, &input.diagram)?;
    info!(pages = diagram.page_count(), "generated diagram");

    let bytes = if cli.tex_only {
        diagram.document().map_err(RenderError::from)?.into_bytes()
    } else {
        let compiler = LatexCompiler::new(cli.latex_config());
        compile_diagram(&diagram, &compiler).await?
    };

    let output = cli.output_path();
    write_artifact(&output, &bytes).await?;
    info!(path = %output.display(), "wrote output");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
