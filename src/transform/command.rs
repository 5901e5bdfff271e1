use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use super::{Transform, TransformOptions};

/// Delegates to an external program.
///
/// The SVG source goes to stdin and the component source is read from
/// stdout. The program also receives `SVGS_COMPONENT_NAME`, `SVGS_TARGET`
/// and `SVGS_OPTIONS` (JSON) in its environment.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandTransform {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl Transform for CommandTransform {
    fn transform(
        &self,
        source: &str,
        options: &TransformOptions,
        component_name: &str,
    ) -> Result<String> {
        let options_json =
            serde_json::to_string(&options.options).context("Failed to serialize transform options")?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("SVGS_COMPONENT_NAME", component_name)
            .env("SVGS_TARGET", options.target.as_str())
            .env("SVGS_OPTIONS", options_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to run transform command `{}`", self.program))?;

        // Feed stdin from another thread so a chatty child cannot deadlock us
        let mut stdin = child.stdin.take().context("Transform stdin unavailable")?;
        let input = source.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .context("Failed to wait for transform command")?;

        let written = writer.join();

        if !output.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        match written {
            Ok(result) => result.context("Failed to write SVG to transform command")?,
            Err(_) => bail!("Transform stdin writer panicked"),
        }

        String::from_utf8(output.stdout).context("Transform command produced invalid UTF-8")
    }
}
