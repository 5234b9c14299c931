use crate::{config, error::ConvertError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Converts a word processor file by running the external converter.
///
/// The tool writes `<stem>.pdf` into its own working directory, so the child
/// is started inside the output directory and the produced file is then moved
/// to `output` if the names differ. Our own working directory is untouched.
///
/// A file already sitting at `<stem>.pdf` is set aside for the duration of the
/// run: only a file written by this run counts as output, and a failed run
/// puts the previous file back.
pub fn convert(cfg: &config::Document, input: &Path, output: &Path) -> Result<(), ConvertError> {
    let input = input.canonicalize().map_err(ConvertError::io(input))?;
    let out_dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let produced = out_dir.join(format!("{stem}.pdf"));

    let stash = Stash::take(&produced, &out_dir)?;

    let outcome = run_tool(cfg, &input, &out_dir).and_then(|()| {
        if !produced.exists() {
            return Err(ConvertError::MissingOutput {
                path: produced.clone(),
            });
        }
        if produced != output {
            std::fs::rename(&produced, output).map_err(ConvertError::io(&produced))?;
        }
        Ok(())
    });

    match outcome {
        Ok(()) => {
            // Replaced in place: the old file goes away with the stash.
            if produced != output {
                if let Some(stash) = stash {
                    stash.restore();
                }
            }
            Ok(())
        }
        Err(err) => {
            discard(&produced);
            if let Some(stash) = stash {
                stash.restore();
            }
            Err(err)
        }
    }
}

fn run_tool(cfg: &config::Document, input: &Path, out_dir: &Path) -> Result<(), ConvertError> {
    debug!(
        "run {} {} {} in {}",
        cfg.binary,
        cfg.format_arg,
        input.display(),
        out_dir.display()
    );
    let mut cmd = Command::new(&cfg.binary);
    cmd.arg(&cfg.format_arg)
        .arg(input)
        .current_dir(out_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ConvertError::Process {
        program: cfg.binary.clone(),
        source,
    })?;

    let out = if cfg.timeout_seconds > 0 {
        wait_with_timeout(&mut child, &cfg.binary, Duration::from_secs(cfg.timeout_seconds))?
    } else {
        child.wait_with_output().map_err(|source| ConvertError::Process {
            program: cfg.binary.clone(),
            source,
        })?
    };

    if !out.status.success() {
        return Err(ConvertError::ExternalProcess {
            program: cfg.binary.clone(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    if !out.stderr.is_empty() {
        debug!(
            "{} stderr: {}",
            cfg.binary,
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }
    Ok(())
}

/// A pre-existing file moved into a temporary directory next to it.
struct Stash {
    _dir: tempfile::TempDir,
    saved: PathBuf,
    original: PathBuf,
}

impl Stash {
    fn take(path: &Path, out_dir: &Path) -> Result<Option<Self>, ConvertError> {
        if !path.exists() {
            return Ok(None);
        }
        let dir = tempfile::Builder::new()
            .prefix(".pdf-everything-")
            .tempdir_in(out_dir)
            .map_err(ConvertError::io(out_dir))?;
        let saved = dir.path().join("previous.pdf");
        std::fs::rename(path, &saved).map_err(ConvertError::io(path))?;
        debug!("set aside existing {}", path.display());
        Ok(Some(Self {
            _dir: dir,
            saved,
            original: path.to_path_buf(),
        }))
    }

    fn restore(self) {
        if let Err(err) = std::fs::rename(&self.saved, &self.original) {
            warn!(
                "could not restore {}: {err}",
                self.original.display()
            );
        }
    }
}

fn discard(path: &Path) {
    if path.exists() {
        if let Err(err) = std::fs::remove_file(path) {
            warn!("could not remove partial output {}: {err}", path.display());
        }
    }
}

fn wait_with_timeout(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> Result<Output, ConvertError> {
    let process_err = |source: std::io::Error| ConvertError::Process {
        program: program.to_string(),
        source,
    };

    // Drain pipes while waiting so a chatty converter can't block on a full
    // stdout/stderr buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let join = |handle: std::thread::JoinHandle<std::io::Result<Vec<u8>>>| {
        handle
            .join()
            .map_err(|_| std::io::Error::other("pipe reader thread panicked"))
            .and_then(|r| r)
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(process_err)? {
            let stdout = join(stdout_thread).map_err(process_err)?;
            let stderr = join(stderr_thread).map_err(process_err)?;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("{program} timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().map_err(process_err)?;
            let _ = join(stdout_thread);
            let stderr = join(stderr_thread).unwrap_or_default();
            return Err(ConvertError::Timeout {
                program: program.to_string(),
                secs: timeout.as_secs(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
