//! R session driven over the standard streams of a child process.
//!
//! Every script is shipped as an escaped string, evaluated in the global
//! environment under `tryCatch`, and its outcome is written back between a
//! begin line (`<marker>:ok` / `<marker>:err`) and an end line. Anything R
//! prints before the begin line is stray script output and is dropped.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::{debug, info};

use super::{EngineError, ScriptEngine};
use crate::process::{self, ProcessHandle};
use crate::script::r_string_literal;

#[derive(Debug, Clone)]
pub struct RProcessEngine {
    binary: String,
}

impl RProcessEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

pub struct RSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    seq: u64,
}

impl RSession {
    fn new(handle: ProcessHandle) -> Self {
        Self {
            child: handle.child,
            stdin: handle.stdin,
            stdout: BufReader::new(handle.stdout),
            seq: 0,
        }
    }

    async fn submit(&mut self, script: &str, quiet: bool) -> Result<String, EngineError> {
        self.seq += 1;
        let markers = Markers::new(std::process::id(), self.seq);
        let request = wrap_script(script, &markers, quiet);
        debug!(seq = self.seq, script, "submitting script");

        if let Err(e) = self.send(request.as_bytes()).await {
            return Err(self.write_failed(e).await);
        }

        match read_frame(&mut self.stdout, &markers).await? {
            Some(Frame::Ok(value)) => Ok(value),
            Some(Frame::Err(message)) => Err(EngineError::Script { message }),
            None => Err(self.exited().await),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdin.write_all(bytes).await?;
        self.stdin.flush().await
    }

    /// A closed stdin means R is gone; report how it ended.
    async fn write_failed(&mut self, err: io::Error) -> EngineError {
        if err.kind() == io::ErrorKind::BrokenPipe {
            self.exited().await
        } else {
            err.into()
        }
    }

    async fn exited(&mut self) -> EngineError {
        match self.child.wait().await {
            Ok(status) => EngineError::Exited { status },
            Err(e) => e.into(),
        }
    }
}

impl ScriptEngine for RProcessEngine {
    type Session = RSession;

    async fn initialize(&self, args: &[String]) -> Result<RSession, EngineError> {
        let handle = process::r::start_r(&self.binary, args)?;
        let mut session = RSession::new(handle);
        // Fails fast when R refuses its arguments or dies during startup.
        let version = session.submit("R.version.string", false).await?;
        info!(version = %version, "R session ready");
        Ok(session)
    }

    async fn evaluate(&self, session: &mut RSession, script: &str) -> Result<String, EngineError> {
        session.submit(script, false).await
    }

    async fn evaluate_quiet(&self, session: &mut RSession, script: &str) -> Result<(), EngineError> {
        session.submit(script, true).await.map(|_| ())
    }

    async fn shutdown(&self, mut session: RSession) -> Result<(), EngineError> {
        match session.send(b"quit(save = \"no\")\n").await {
            Ok(()) => {}
            // Already gone; the wait below still reaps it.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(e.into()),
        }
        drop(session.stdin);
        let status = session.child.wait().await?;
        debug!(%status, "R session closed");
        Ok(())
    }
}

/// Frame delimiters unique to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Markers {
    begin: String,
    end: String,
}

impl Markers {
    fn new(pid: u32, seq: u64) -> Self {
        Self {
            begin: format!("@@rplot:{pid}:{seq}:begin"),
            end: format!("@@rplot:{pid}:{seq}:end"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Ok(String),
    Err(String),
}

fn wrap_script(script: &str, markers: &Markers, quiet: bool) -> String {
    let value = if quiet {
        "\"\""
    } else {
        "paste(as.character(.rplot_v), collapse = \"\\n\")"
    };
    format!(
        concat!(
            "local({{\n",
            "  .rplot_r <- tryCatch({{\n",
            "    .rplot_v <- eval(parse(text = {script}), envir = globalenv())\n",
            "    list(ok = TRUE, value = {value})\n",
            "  }}, error = function(e) list(ok = FALSE, value = conditionMessage(e)))\n",
            "  cat(\"\\n\", {begin}, if (.rplot_r$ok) \":ok\" else \":err\", \"\\n\",\n",
            "      .rplot_r$value, \"\\n\", {end}, \"\\n\", sep = \"\")\n",
            "  flush(stdout())\n",
            "}})\n",
        ),
        script = r_string_literal(script),
        value = value,
        begin = r_string_literal(&markers.begin),
        end = r_string_literal(&markers.end),
    )
}

async fn next_line<R>(reader: &mut R) -> Result<Option<String>, EngineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Read one response frame; `None` means the stream closed first.
async fn read_frame<R>(reader: &mut R, markers: &Markers) -> Result<Option<Frame>, EngineError>
where
    R: AsyncBufRead + Unpin,
{
    let ok = loop {
        let Some(line) = next_line(reader).await? else {
            return Ok(None);
        };
        match line.strip_prefix(markers.begin.as_str()) {
            Some(":ok") => break true,
            Some(":err") => break false,
            Some(other) => {
                return Err(EngineError::Protocol(format!("unknown frame status `{other}`")));
            }
            None if line.is_empty() => {}
            None => debug!(output = %line, "discarding script output"),
        }
    };

    let mut body: Vec<String> = Vec::new();
    loop {
        let Some(line) = next_line(reader).await? else {
            return Ok(None);
        };
        if line == markers.end {
            break;
        }
        body.push(line);
    }
    let text = body.join("\n");
    Ok(Some(if ok { Frame::Ok(text) } else { Frame::Err(text) }))
}
