//! Picker backed by an external filter program (dmenu, rofi -dmenu, fzf, ...).

use std::{io::ErrorKind, process::Stdio};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, trace};

use crate::{Error, Picker, Result};

/// Exit status dmenu-style programs use when the user dismisses the menu.
const CANCEL_STATUS: i32 = 1;

/// Runs a filter program, feeding labels on stdin and reading picks from stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DmenuPicker {
    command: String,
    args: Vec<String>,
}

impl Default for DmenuPicker {
    fn default() -> Self {
        Self::new("dmenu", Vec::new())
    }
}

impl DmenuPicker {
    /// Picker running `command` with `args`.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Program to run.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Picker for DmenuPicker {
    async fn pick(&self, input: &str) -> Result<String> {
        debug!(command = %self.command, args = ?self.args, "running picker");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let payload = input.as_bytes().to_vec();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(&payload).await {
                // The picker may exit before reading everything.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        fed?;

        if output.status.success() {
            let text = String::from_utf8(output.stdout)?;
            trace!(lines = text.lines().count(), "picker returned");
            return Ok(text);
        }
        if output.status.code() == Some(CANCEL_STATUS) && output.stdout.is_empty() {
            debug!("picker dismissed");
            return Ok(String::new());
        }
        Err(Error::Exit {
            command: self.command.clone(),
            code: output.status.code(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> DmenuPicker {
        DmenuPicker::new("sh", vec!["-c".into(), script.into()])
    }

    #[tokio::test]
    async fn echoes_selected_lines() {
        let out = sh("head -n 1").pick("one\ntwo\nthree").await.unwrap();
        assert_eq!(out, "one\n");
    }

    #[tokio::test]
    async fn cancel_is_empty_selection() {
        let out = sh("cat >/dev/null; exit 1").pick("one").await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn other_failures_propagate() {
        let err = sh("exit 3").pick("one").await.unwrap_err();
        assert!(matches!(err, Error::Exit { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let picker = DmenuPicker::new("quickswitch-no-such-picker", Vec::new());
        let err = picker.pick("x").await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
