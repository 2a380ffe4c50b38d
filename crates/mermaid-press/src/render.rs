//! Rendering diagram source to images through an external command.
//!
//! The [`Renderer`] trait is the seam between the pipeline and whatever
//! turns diagram text into a picture. [`CommandRenderer`] drives a
//! mermaid-cli compatible program:
//!
//! ```text
//! <command> [args...] -i <input> -o <output> -b <background> -w <width>
//! ```
//!
//! The source is staged in a uniquely named temporary file that is removed
//! when the render returns, whatever the outcome. The command's output is
//! captured, never streamed, and its stderr is kept for failure reports.
//!
//! With a timeout configured, an overrunning renderer is killed and the
//! render counts as failed. Only the direct child is killed: processes it
//! started itself (mermaid-cli launches a headless Chromium) are not
//! signalled and may outlive it. Threads reading its pipes are left to
//! finish once those processes close them.

use std::{
    io::{Read, Write},
    path::Path,
    process::{Child, Command, Output, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::{config::RendererConfig, error::RenderError};

/// Interval between checks on a renderer running under a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Turns diagram source into an image file.
pub trait Renderer {
    /// Renders `source` to an image at `output`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when no image could be produced. The
    /// pipeline keeps the block in place, except for [`RenderError::Io`],
    /// which ends the run.
    fn render(&self, source: &str, output: &Path) -> Result<(), RenderError>;
}

/// [`Renderer`] backed by an external command such as `mmdc`.
#[derive(Debug, Clone, Default)]
pub struct CommandRenderer {
    config: RendererConfig,
}

impl CommandRenderer {
    /// Creates a renderer from its configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Returns the renderer configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(self.config.command());
        command
            .args(self.config.args())
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-b")
            .arg(self.config.background())
            .arg("-w")
            .arg(self.config.width().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> RenderError {
        RenderError::Spawn {
            command: self.config.command().to_string(),
            source,
        }
    }

    fn run(&self, mut command: Command) -> Result<Output, RenderError> {
        let Some(seconds) = self.config.timeout_secs() else {
            return command.output().map_err(|err| self.spawn_error(err));
        };

        let mut child = command.spawn().map_err(|err| self.spawn_error(err))?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        match wait_until(&mut child, Instant::now() + Duration::from_secs(seconds))? {
            Some(status) => Ok(Output {
                status,
                stdout: stdout.join().unwrap_or_default(),
                stderr: stderr.join().unwrap_or_default(),
            }),
            None => {
                warn!(seconds; "Renderer timed out, killing it");
                // The child may already have exited between the last poll and
                // the kill. Its own children can keep the pipes open, so the
                // drain threads are not joined.
                let _ = child.kill();
                child.wait()?;
                Err(RenderError::TimedOut { seconds })
            }
        }
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, source: &str, output: &Path) -> Result<(), RenderError> {
        let mut input = tempfile::Builder::new()
            .prefix("mermaid-press-")
            .suffix(".mmd")
            .tempfile()?;
        input.write_all(source.as_bytes())?;
        input.flush()?;

        debug!(
            command = self.config.command(),
            input = input.path().display().to_string(),
            output = output.display().to_string();
            "Invoking renderer"
        );

        let result = self.run(self.command(input.path(), output));
        close(input);

        let result = result?;
        if result.status.success() {
            info!(output = output.display().to_string(); "Diagram rendered");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(status:% = result.status, stderr; "Renderer failed");
            Err(RenderError::Failed {
                status: result.status,
                stderr,
            })
        }
    }
}

/// Removes the staged input. Dropping the file removes it as well, so a
/// failure here only loses the log line.
fn close(input: NamedTempFile) {
    let path = input.path().display().to_string();
    if let Err(err) = input.close() {
        warn!(path, err:%; "Failed to remove staged diagram source");
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Waits for `child` until `deadline`. Returns `None` if it is still running.
fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> Result<Option<std::process::ExitStatus>, RenderError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
