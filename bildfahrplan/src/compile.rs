//! Turning document source into a PDF.
//!
//! The diagram generator only produces text; compilation is delegated to a
//! [`Compiler`]. The real implementation runs `pdflatex` in a scratch
//! directory.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Base name of the files written to the working directory.
const JOB_NAME: &str = "fahrplan";

/// Lines of compiler output kept for diagnostics.
const DIAGNOSTIC_LINES: usize = 20;

/// Trailing lines of compiler output that only repeat the transcript location.
const TRANSCRIPT_FOOTER_LINES: usize = 3;

/// Errors raised while compiling a document.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Reading or writing the working files failed
    #[error("compiler I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compiler could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler reported an error
    #[error("{program} failed:\n{diagnostics}")]
    Failed {
        program: String,
        diagnostics: String,
    },

    /// The compiler did not finish in time and was killed
    #[error("{program} did not finish within {} s", timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    /// The compiler succeeded but left no output file
    #[error("{program} finished without producing {}", path.display())]
    MissingArtifact { program: String, path: PathBuf },
}

/// Something that turns document source into output bytes.
///
/// This abstraction allows the pipeline to be tested without a TeX
/// installation.
pub trait Compiler {
    fn compile(&self, source: &str) -> impl Future<Output = Result<Vec<u8>, CompileError>> + Send;
}

/// Configuration for [`LatexCompiler`].
#[derive(Debug, Clone)]
pub struct LatexConfig {
    /// Program to run.
    pub program: String,

    /// Arguments passed before the source file name.
    pub args: Vec<String>,

    /// Time limit for each compiler run.
    pub timeout: Duration,

    /// Number of runs. Page overlays need a second run to find the page
    /// anchors.
    pub passes: usize,

    /// Directory for the working files. A temporary directory is used and
    /// removed afterwards when unset.
    pub work_dir: Option<PathBuf>,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            timeout: Duration::from_secs(10),
            passes: 2,
            work_dir: None,
        }
    }
}

impl LatexConfig {
    /// Set a custom time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keep the working files in `dir`.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }
}

/// Runs a LaTeX engine as a child process.
#[derive(Debug, Clone, Default)]
pub struct LatexCompiler {
    config: LatexConfig,
}

impl LatexCompiler {
    pub fn new(config: LatexConfig) -> Self {
        Self { config }
    }

    async fn run(&self, dir: &Path) -> Result<Output, CompileError> {
        let program = &self.config.program;

        let mut command = Command::new(program);
        command
            .args(&self.config.args)
            .arg(format!("{JOB_NAME}.tex"))
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| CompileError::Timeout {
                program: program.clone(),
                timeout: self.config.timeout,
            })?
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })
    }
}

impl Compiler for LatexCompiler {
    async fn compile(&self, source: &str) -> Result<Vec<u8>, CompileError> {
        let program = &self.config.program;

        // The guard keeps a temporary directory alive until we're done
        let (dir, _guard) = match &self.config.work_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                (dir.clone(), None)
            }
            None => {
                let temp = tempfile::tempdir()?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };

        tokio::fs::write(dir.join(format!("{JOB_NAME}.tex")), source).await?;

        for pass in 1..=self.config.passes.max(1) {
            debug!(program = %program, pass, dir = %dir.display(), "running compiler");
            let output = self.run(&dir).await?;

            if !output.stderr.is_empty() {
                debug!(
                    program = %program,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "compiler wrote to stderr"
                );
            }
            if !output.status.success() {
                return Err(CompileError::Failed {
                    program: program.clone(),
                    diagnostics: diagnostic_tail(&String::from_utf8_lossy(&output.stdout)),
                });
            }
        }

        let path = dir.join(format!("{JOB_NAME}.pdf"));
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "compiled document");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CompileError::MissingArtifact {
                    program: program.clone(),
                    path,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// The part of a compiler transcript that explains a failure.
///
/// Keeps the last [`DIAGNOSTIC_LINES`] lines minus the transcript footer.
/// Short transcripts are returned whole.
pub fn diagnostic_tail(log: &str) -> String {
    let lines: Vec<&str> = log.lines().collect();
    if lines.len() <= TRANSCRIPT_FOOTER_LINES {
        return lines.join("\n");
    }
    let start = lines.len().saturating_sub(DIAGNOSTIC_LINES);
    let end = lines.len() - TRANSCRIPT_FOOTER_LINES;
    lines[start..end].join("\n")
}
