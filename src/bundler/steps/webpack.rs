//! External bundler invocation.

use crate::bundler::{
    builder::tool_detection::{NODE_VERSION, local_bin, resolve_tool},
    error::{Error, Result},
    settings::Settings,
    utils::fs,
};
use crate::cli::RuntimeConfig;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// What the bundler produced.
#[derive(Debug, Clone, Default)]
pub struct BundleReport {
    /// Command line that ran
    pub command: String,
    /// Files under the output tree with their sizes, sorted
    pub files: Vec<(PathBuf, u64)>,
    /// Output lines mentioning warnings
    pub warnings: Vec<String>,
}

impl BundleReport {
    /// Total size of the bundled files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|(_, size)| size).sum()
    }
}

/// Picks the bundler executable and its leading arguments.
///
/// A configured override wins; otherwise the project's own webpack binary,
/// and finally `npx webpack`.
fn bundler_command(settings: &Settings) -> Result<(PathBuf, Vec<String>)> {
    let root = settings.project_root();

    if let Some(spec) = &settings.tools().bundler {
        return Ok((resolve_tool(&spec.command, root)?, spec.args.clone()));
    }

    if let Some(webpack) = local_bin(root, "webpack") {
        return Ok((webpack, Vec::new()));
    }

    Ok((resolve_tool("npx", root)?, vec!["webpack".to_string()]))
}

/// Runs the bundler in the configured mode and waits for it to finish.
///
/// Output streams to the operator as it arrives. A non-zero exit, a spawn
/// failure, or a missing `dist/tmp/widgets` afterwards fails the step.
pub async fn run_webpack(settings: &Settings, runtime: &RuntimeConfig) -> Result<BundleReport> {
    let (program, mut args) = bundler_command(settings)?;
    let mode = settings.mode();
    args.extend([
        "--config".to_string(),
        settings.webpack_config_path().display().to_string(),
        "--mode".to_string(),
        mode.as_str().to_string(),
    ]);

    let command_line = format!("{} {}", program.display(), args.join(" "));
    if let Some(node) = NODE_VERSION.as_deref() {
        log::debug!("Bundling with node {}", node);
    }
    log::info!("Running {}", command_line);

    let mut child = Command::new(&program)
        .args(&args)
        .current_dir(settings.project_root())
        .env("NODE_ENV", mode.as_str())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|error| Error::CommandFailed {
            command: command_line.clone(),
            error,
        })?;

    runtime.progress("Webpack output:");

    // Drain both pipes together so neither can fill up and stall the child.
    let (stdout_lines, stderr_lines) = tokio::join!(
        drain_lines(child.stdout.take(), |line| runtime.indent(line)),
        drain_lines(child.stderr.take(), |_| {})
    );

    let status = child.wait().await.map_err(|error| Error::CommandFailed {
        command: command_line.clone(),
        error,
    })?;

    if !status.success() {
        return Err(Error::BundlerFailed {
            command: command_line,
            status,
            stderr: stderr_lines,
        });
    }

    for line in &stderr_lines {
        runtime.indent(line);
    }

    let output_dir = settings.bundle_output_dir();
    if !output_dir.is_dir() {
        return Err(Error::BundleMissing(output_dir));
    }

    let report = BundleReport {
        command: command_line,
        files: fs::list_files(&output_dir).await?,
        warnings: stdout_lines
            .iter()
            .chain(stderr_lines.iter())
            .filter(|line| line.to_ascii_lowercase().contains("warning"))
            .cloned()
            .collect(),
    };

    print_summary(&report, runtime);
    Ok(report)
}

/// Reads `reader` to EOF, one line at a time.
///
/// Lines that are not valid UTF-8 are decoded lossily; reading only stops at
/// EOF or an IO error, so the child never sees a closed pipe early.
async fn drain_lines<R>(reader: Option<R>, mut echo: impl FnMut(&str)) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(reader) = reader else {
        return captured;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                echo(&line);
                captured.push(line);
            }
            Err(e) => {
                log::warn!("Stopped reading bundler output: {}", e);
                break;
            }
        }
    }
    captured
}

fn print_summary(report: &BundleReport, runtime: &RuntimeConfig) {
    runtime.progress(&format!(
        "Bundled {} files ({})",
        report.files.len(),
        format_size(report.total_size())
    ));
    for (path, size) in &report.files {
        runtime.indent(&format!("{:>10}  {}", format_size(*size), path.display()));
    }
    for warning in &report.warnings {
        runtime.warn(warning);
    }
}

/// Formats a byte count for humans (`512 B`, `1.5 KiB`, `2.0 MiB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BuildMode, CommandSpec, ErrorKind, PackageSettings, SettingsBuilder, ToolSettings};
    use std::path::Path;
    use tempfile::tempdir;

    fn settings(root: &Path, script: &str, mode: BuildMode) -> Settings {
        SettingsBuilder::new()
            .project_root(root)
            .package_settings(PackageSettings {
                widget_name: "MyWidget".into(),
                version: "1.0.0".into(),
                description: None,
            })
            .mode(mode)
            .tool_settings(ToolSettings {
                bundler: Some(CommandSpec::new("sh", &["-c", script])),
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_mode_and_collects_output_files() {
        let dir = tempdir().unwrap();
        let script = "mkdir -p dist/tmp/widgets/com && \
                      printf \"$NODE_ENV\" > dist/tmp/widgets/com/MyWidget.js && \
                      echo 'WARNING in ./src/MyWidget.ts'";
        let settings = settings(dir.path(), script, BuildMode::Production);

        let report = run_webpack(&settings, &RuntimeConfig::quiet()).await.unwrap();

        assert_eq!(report.files, vec![(PathBuf::from("com").join("MyWidget.js"), 10)]);
        assert_eq!(report.warnings, vec!["WARNING in ./src/MyWidget.ts".to_string()]);
        assert!(report.command.contains("--mode production"));
        assert_eq!(
            std::fs::read_to_string(settings.bundle_output_dir().join("com/MyWidget.js")).unwrap(),
            "production"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_bundler_is_reported_with_stderr() {
        let dir = tempdir().unwrap();
        let settings = settings(
            dir.path(),
            "echo 'Module not found: ./missing' >&2; exit 2",
            BuildMode::Development,
        );

        let err = run_webpack(&settings, &RuntimeConfig::quiet()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Bundler);
        assert!(err.to_string().contains("Module not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn invalid_utf8_output_does_not_cut_the_bundler_off() {
        let dir = tempdir().unwrap();
        let script = "printf 'bad \\377 byte\\n'; printf 'err \\377\\n' >&2; sleep 0.5; \
                      mkdir -p dist/tmp/widgets && echo ok > dist/tmp/widgets/a.js && \
                      echo 'asset a.js emitted'";
        let settings = settings(dir.path(), script, BuildMode::Development);

        let report = run_webpack(&settings, &RuntimeConfig::quiet()).await.unwrap();

        assert_eq!(report.files, vec![(PathBuf::from("a.js"), 3)]);
    }

    #[tokio::test]
    async fn drained_lines_are_decoded_lossily() {
        let input: &[u8] = b"first\n\xffsecond\r\nlast";
        let mut echoed = Vec::new();

        let lines = drain_lines(Some(input), |line| echoed.push(line.to_string())).await;

        assert_eq!(lines, vec!["first", "\u{fffd}second", "last"]);
        assert_eq!(echoed, lines);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_without_output_is_an_error() {
        let dir = tempdir().unwrap();
        let settings = settings(dir.path(), "true", BuildMode::Development);

        let err = run_webpack(&settings, &RuntimeConfig::quiet()).await.unwrap_err();
        assert!(matches!(err, Error::BundleMissing(_)));
    }
}
