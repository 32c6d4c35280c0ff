// ABOUTME: SCP sink/source protocol over an SSH exec channel.
// ABOUTME: Uploads with `scp -t` and downloads with `scp -f`, one file per channel.

use super::client::Session;
use super::error::{Error, Result};
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use std::time::Duration;

/// Default permissions for uploaded files.
pub const DEFAULT_MODE: u32 = 0o644;

/// Quote a path for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// A parsed `C<mode> <length> <name>` file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub mode: u32,
    pub len: u64,
    pub name: String,
}

impl FileHeader {
    /// Parse a header line without its leading `C` and trailing newline.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.splitn(3, ' ');
        let (Some(mode), Some(len), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::Scp(format!("malformed file header: {line:?}")));
        };

        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| Error::Scp(format!("invalid file mode: {mode:?}")))?;
        let len = len
            .parse::<u64>()
            .map_err(|_| Error::Scp(format!("invalid file length: {len:?}")))?;

        Ok(Self {
            mode,
            len,
            name: name.to_string(),
        })
    }

    fn encode(&self) -> String {
        format!("C{:04o} {} {}\n", self.mode, self.len, self.name)
    }
}

/// Upload `contents` to `remote_path`, naming the file `name` in the header.
///
/// When `remote_path` is a directory the file lands at `remote_path/name`.
pub async fn upload(
    session: &Session,
    remote_path: &str,
    name: &str,
    contents: &[u8],
    timeout: Duration,
) -> Result<()> {
    let work = async {
        let mut scp = ScpChannel::open(session, &format!("scp -t {}", shell_quote(remote_path))).await?;
        scp.read_ack().await?;

        let header = FileHeader {
            mode: DEFAULT_MODE,
            len: contents.len() as u64,
            name: name.to_string(),
        };
        scp.send(header.encode().as_bytes()).await?;
        scp.read_ack().await?;

        scp.send(contents).await?;
        scp.send(&[0]).await?;
        scp.read_ack().await?;

        scp.finish().await
    };

    match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(Error::CommandTimeout(timeout)),
    }
}

/// Download a single remote file into memory.
pub async fn download(session: &Session, remote_path: &str, timeout: Duration) -> Result<Vec<u8>> {
    let work = async {
        let mut scp = ScpChannel::open(session, &format!("scp -f {}", shell_quote(remote_path))).await?;
        scp.send(&[0]).await?;

        let header = loop {
            match scp.read_byte().await? {
                b'C' => break FileHeader::parse(&scp.read_line().await?)?,
                // Timestamp records only appear with -p; acknowledge and move on.
                b'T' => {
                    scp.read_line().await?;
                    scp.send(&[0]).await?;
                }
                1 | 2 => return Err(Error::Scp(scp.read_line().await?)),
                other => {
                    return Err(Error::Scp(format!("unexpected record type {other:#04x}")));
                }
            }
        };

        scp.send(&[0]).await?;
        let len = usize::try_from(header.len)
            .map_err(|_| Error::Scp(format!("file too large: {} bytes", header.len)))?;
        let contents = scp.read_exact(len).await?;
        scp.read_ack().await?;
        scp.send(&[0]).await?;

        scp.finish().await?;
        Ok(contents)
    };

    match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(Error::CommandTimeout(timeout)),
    }
}

/// What has arrived on an scp channel so far.
#[derive(Debug, Default)]
struct Inbox {
    buffer: Vec<u8>,
    stderr: Vec<u8>,
    exit_status: Option<u32>,
    closed: bool,
}

impl Inbox {
    /// Record one channel message. EOF only ends the data stream; the exit
    /// status still follows it, so the channel counts as done on close.
    fn absorb(&mut self, msg: Option<ChannelMsg>) {
        match msg {
            Some(ChannelMsg::Data { data }) => self.buffer.extend_from_slice(&data),
            Some(ChannelMsg::ExtendedData { data, .. }) => self.stderr.extend_from_slice(&data),
            Some(ChannelMsg::ExitStatus { exit_status }) => self.exit_status = Some(exit_status),
            Some(ChannelMsg::Close) | None => self.closed = true,
            Some(_) => {}
        }
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    fn closed_error(&self) -> Error {
        let stderr = self.stderr();
        if stderr.is_empty() {
            Error::ChannelClosed
        } else {
            Error::Scp(stderr)
        }
    }

    fn exit_result(&self) -> Result<()> {
        match self.exit_status {
            Some(0) | None => Ok(()),
            Some(code) => Err(Error::Scp(format!(
                "scp exited with status {code}: {}",
                self.stderr()
            ))),
        }
    }
}

/// Buffered view of an scp exec channel.
struct ScpChannel {
    channel: Channel<Msg>,
    inbox: Inbox,
}

impl ScpChannel {
    async fn open(session: &Session, command: &str) -> Result<Self> {
        tracing::debug!("opening copy channel: {}", command);
        Ok(Self {
            channel: session.open_exec(command).await?,
            inbox: Inbox::default(),
        })
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.channel.data(data).await.map_err(Error::Protocol)
    }

    /// Pull the next message into the inbox. Returns false once the channel is done.
    async fn fill(&mut self) -> bool {
        if self.inbox.closed {
            return false;
        }
        let msg = self.channel.wait().await;
        self.inbox.absorb(msg);
        true
    }

    async fn ensure(&mut self, n: usize) -> Result<()> {
        while self.inbox.buffer.len() < n {
            if !self.fill().await {
                return Err(self.inbox.closed_error());
            }
        }
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        self.ensure(1).await?;
        Ok(self.inbox.buffer.remove(0))
    }

    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n).await?;
        Ok(self.inbox.buffer.drain(..n).collect())
    }

    async fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(pos) = self.inbox.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = self.inbox.buffer.drain(..=pos).collect();
                return Ok(String::from_utf8_lossy(&line[..pos]).to_string());
            }
            if !self.fill().await {
                return Err(self.inbox.closed_error());
            }
        }
    }

    async fn read_ack(&mut self) -> Result<()> {
        match self.read_byte().await? {
            0 => Ok(()),
            1 | 2 => Err(Error::Scp(self.read_line().await?)),
            other => Err(Error::Scp(format!("unexpected response byte {other:#04x}"))),
        }
    }

    /// Signal end of input and wait for the remote scp to exit.
    async fn finish(mut self) -> Result<()> {
        self.channel.eof().await.map_err(Error::Protocol)?;
        while self.inbox.exit_status.is_none() && self.fill().await {}
        self.inbox.exit_result()
    }
}
