// ABOUTME: Install state markers for the type state pattern, plus the recorded stage trail.
// ABOUTME: Markers gate which step can run next; Stage is what reports carry.

use serde::Serialize;
use std::fmt;

/// Connected and bundle extracted.
/// Available actions: `create_remote_dir()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Joined;

/// Remote staging directory exists.
/// Available actions: `upload()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Staged;

/// Package files are on the target.
/// Available actions: `install()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Uploaded;

/// Install command has run.
/// Available actions: `verify()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Installed;

/// Verdict fixed.
/// Available actions: `into_parts()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Verified;

/// A workflow stage as recorded in an install report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Connecting,
    Extracting,
    Joined,
    CreatingRemoteDir,
    Uploading,
    Installing,
    Verifying,
    Cleanup,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Connecting => "connecting",
            Stage::Extracting => "extracting",
            Stage::Joined => "joined",
            Stage::CreatingRemoteDir => "creating remote dir",
            Stage::Uploading => "uploading",
            Stage::Installing => "installing",
            Stage::Verifying => "verifying",
            Stage::Cleanup => "cleanup",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}
