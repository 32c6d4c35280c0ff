// ABOUTME: Copies files to and from the target over a bulk-copy session.
// ABOUTME: Missing credentials or an unreachable target yield false instead of an error.

use super::credentials::Role;
use super::error::{Error, Result};
use super::{Target, close};
use crate::output::Reporter;
use crate::ssh::{self, RemoteSession, SessionKind, Transport};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub struct FileTransferer<'a, T> {
    target: &'a Target<T>,
    reporter: &'a dyn Reporter,
}

impl<'a, T: Transport> FileTransferer<'a, T> {
    pub(super) fn new(target: &'a Target<T>, reporter: &'a dyn Reporter) -> Self {
        Self { target, reporter }
    }

    fn has_session(&self, role: Role) -> bool {
        self.target.sessions().get(role).is_some()
    }

    async fn open(&self, role: Role) -> Result<Option<T::Session>> {
        self.target.open(role, SessionKind::Copy).await
    }

    /// Upload everything `source` yields to `remote_path`.
    pub async fn upload_file<R>(&self, source: &mut R, remote_path: &str, role: Role) -> Result<bool>
    where
        R: AsyncRead + Unpin + Send,
    {
        if !self.has_session(role) {
            return Ok(false);
        }

        let mut contents = Vec::new();
        source.read_to_end(&mut contents).await?;

        let Some(mut session) = self.open(role).await? else {
            return Ok(false);
        };

        self.reporter.detail(&format!("Deploying File: {remote_path}"));
        let name = remote_name(remote_path);
        let result = session.upload(remote_path, name, &contents).await;
        close(session).await;

        result?;
        Ok(true)
    }

    /// Upload each existing local file into `remote_dir`, in order.
    ///
    /// Paths that do not exist are skipped without comment. The first copy
    /// that fails after the connect aborts the batch with an error.
    pub async fn upload_files<P>(&self, paths: &[P], remote_dir: &str, role: Role) -> Result<bool>
    where
        P: AsRef<Path>,
    {
        if !self.has_session(role) {
            return Ok(false);
        }

        let Some(mut session) = self.open(role).await? else {
            return Ok(false);
        };

        let result = self.upload_each(&mut session, paths, remote_dir).await;
        close(session).await;

        result?;
        Ok(true)
    }

    async fn upload_each<P: AsRef<Path>>(
        &self,
        session: &mut T::Session,
        paths: &[P],
        remote_dir: &str,
    ) -> Result<()> {
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                tracing::debug!("skipping missing file {}", path.display());
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::debug!("skipping file with unusable name {}", path.display());
                continue;
            };

            let contents = tokio::fs::read(path)
                .await
                .map_err(|source| Error::LocalResource {
                    path: path.to_path_buf(),
                    source,
                })?;

            self.reporter.detail(&format!("Deploying File: {name}"));
            session.upload(remote_dir, name, &contents).await?;
        }
        Ok(())
    }

    /// Download `remote_path` into `dest`.
    ///
    /// False when there is no session for the role, the target is unreachable,
    /// or the remote side refuses the copy (missing file, permissions).
    pub async fn download_file<W>(&self, remote_path: &str, dest: &mut W, role: Role) -> Result<bool>
    where
        W: AsyncWrite + Unpin + Send,
    {
        if !self.has_session(role) {
            return Ok(false);
        }

        let Some(mut session) = self.open(role).await? else {
            return Ok(false);
        };

        self.reporter.detail(&format!("Receiving File: {remote_path}"));
        let result = session.download(remote_path).await;
        close(session).await;

        let contents = match result {
            Ok(contents) => contents,
            Err(ssh::Error::Scp(reason)) => {
                tracing::warn!("download of {} refused: {}", remote_path, reason);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        dest.write_all(&contents).await?;
        dest.flush().await?;
        Ok(true)
    }
}

/// Last path component of a remote path.
fn remote_name(remote_path: &str) -> &str {
    remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(remote_path)
}
