/// Plain-text extraction from the source rulebook.
///
/// The conversion itself is done by an external program (`pdftotext` by
/// default) run as a sub-process under a hard wall-clock timeout.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

/// Default budget for one extraction run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(500);

/// Longest budget honoured; larger requests are clamped to it.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("'{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("IO error while talking to sub-process: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a source document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, source: &Path) -> Result<String, SubprocessError>;
}

/// Runs `program [args..] <source> [trailing..]` and collects its standard
/// output.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    trailing: Vec<String>,
    timeout: Duration,
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::pdftotext()
    }
}

impl CommandExtractor {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            trailing: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `pdftotext -q <source> -`
    pub fn pdftotext() -> Self {
        Self::new("pdftotext").arg("-q").trailing_arg("-")
    }

    /// Append an argument placed before the source path.
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Append an argument placed after the source path.
    pub fn trailing_arg(mut self, arg: &str) -> Self {
        self.trailing.push(arg.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.min(MAX_TIMEOUT);
        self
    }

    pub fn timeout_budget(&self) -> Duration {
        self.timeout
    }
}

impl TextExtractor for CommandExtractor {
    fn extract_text(&self, source: &Path) -> Result<String, SubprocessError> {
        tracing::info!(program = %self.program, source = %source.display(), "extracting text");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .args(&self.trailing)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SubprocessError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Drain pipes concurrently; a full pipe would stall the child.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                tracing::warn!(program = %self.program, "extraction timed out, killing");
                child.kill()?;
                child.wait()?;
                return Err(SubprocessError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
        };

        let out = join_reader(stdout)?;
        let err = join_reader(stderr)?;

        if !status.success() {
            return Err(SubprocessError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&err).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&out).into_owned();
        tracing::info!(chars = text.len(), "extracted text");
        Ok(text)
    }
}

type Reader = thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(reader: Option<Reader>) -> Result<Vec<u8>, SubprocessError> {
    let Some(handle) = reader else {
        return Ok(Vec::new());
    };
    let bytes = handle.join().unwrap_or_else(|_| {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "pipe reader thread panicked",
        ))
    })?;
    Ok(bytes)
}

/// Extractor returning fixed text; for callers that already hold the
/// plain-text rulebook.
#[derive(Debug, Clone)]
pub struct StaticText(pub String);

impl TextExtractor for StaticText {
    fn extract_text(&self, _source: &Path) -> Result<String, SubprocessError> {
        Ok(self.0.clone())
    }
}
