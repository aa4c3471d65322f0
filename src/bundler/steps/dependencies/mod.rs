//! Development dependency verification.
//!
//! Compares `devDependencies` against `node_modules`, installs what is
//! missing, and reports installed versions that fall outside their range.

mod range;

pub use range::{parse_npm_range, satisfies};

use crate::bundler::{
    builder::tool_detection::resolve_tool,
    error::{Error, Result},
    settings::{MismatchPolicy, Settings},
};
use semver::Version;
use std::path::Path;

/// Outcome of the dependency check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Number of declared dependencies inspected
    pub checked: usize,
    /// Dependencies that were missing and got installed
    pub installed: Vec<String>,
    /// `name@installed (wanted range)` for unsatisfied ranges
    pub mismatches: Vec<String>,
    /// Dependencies whose spec is not a version range
    pub unchecked: Vec<String>,
}

enum Installed {
    Missing,
    Present(String),
}

/// Verifies every declared development dependency.
///
/// Missing packages trigger one run of the configured installer in the
/// project root, after which the check is repeated. Version mismatches warn
/// or fail according to [`MismatchPolicy`].
pub async fn check_dependencies(settings: &Settings) -> Result<DependencyReport> {
    let declared = &settings.dependencies().dev_dependencies;
    let root = settings.project_root();
    let mut report = DependencyReport {
        checked: declared.len(),
        ..Default::default()
    };

    if declared.is_empty() {
        log::debug!("No devDependencies declared");
        return Ok(report);
    }

    let missing = missing_packages(root, declared.keys()).await?;
    if !missing.is_empty() {
        log::info!("Installing missing devDependencies: {}", missing.join(", "));
        run_installer(settings).await?;

        let still_missing = missing_packages(root, missing.iter()).await?;
        if !still_missing.is_empty() {
            return Err(Error::Dependency(format!(
                "still missing after `{}`: {}",
                settings.tools().install.display(),
                still_missing.join(", ")
            )));
        }
        report.installed = missing;
    }

    for (name, spec) in declared {
        let Some(alternatives) = parse_npm_range(spec) else {
            log::debug!("{} uses non-registry spec '{}', not version checked", name, spec);
            report.unchecked.push(name.clone());
            continue;
        };

        let Installed::Present(raw_version) = installed_version(root, name).await? else {
            continue;
        };

        match Version::parse(&raw_version) {
            Ok(version) if satisfies(&alternatives, &version) => {}
            Ok(_) => report
                .mismatches
                .push(format!("{name}@{raw_version} (wanted {spec})")),
            Err(e) => {
                log::warn!("{} has unparseable version '{}': {}", name, raw_version, e);
                report.unchecked.push(name.clone());
            }
        }
    }

    if !report.mismatches.is_empty() {
        match settings.dependencies().version_mismatch {
            MismatchPolicy::Warn => {
                for mismatch in &report.mismatches {
                    log::warn!("Version mismatch: {}", mismatch);
                }
            }
            MismatchPolicy::Fail => return Err(Error::DependencyMismatch(report.mismatches)),
        }
    }

    Ok(report)
}

async fn missing_packages<'a>(
    root: &Path,
    names: impl Iterator<Item = &'a String>,
) -> Result<Vec<String>> {
    let mut missing = Vec::new();
    for name in names {
        if let Installed::Missing = installed_version(root, name).await? {
            missing.push(name.clone());
        }
    }
    Ok(missing)
}

async fn installed_version(root: &Path, name: &str) -> Result<Installed> {
    let manifest = root.join("node_modules").join(name).join("package.json");

    let raw = match tokio::fs::read_to_string(&manifest).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Installed::Missing),
        Err(e) => {
            return Err(Error::Fs {
                context: "reading installed package manifest".into(),
                path: manifest,
                source: e,
            });
        }
    };

    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
        Error::Dependency(format!("{} is not valid JSON: {}", manifest.display(), e))
    })?;

    Ok(value
        .get("version")
        .and_then(|v| v.as_str())
        .map(|v| Installed::Present(v.to_string()))
        .unwrap_or(Installed::Missing))
}

async fn run_installer(settings: &Settings) -> Result<()> {
    let install = &settings.tools().install;
    let program = resolve_tool(&install.command, settings.project_root())
        .map_err(|e| Error::Dependency(format!("cannot install dependencies: {e}")))?;

    let status = tokio::process::Command::new(&program)
        .args(&install.args)
        .current_dir(settings.project_root())
        .status()
        .await
        .map_err(|e| Error::Dependency(format!("failed to run `{}`: {}", install.display(), e)))?;

    if !status.success() {
        return Err(Error::Dependency(format!(
            "`{}` exited with {}",
            install.display(),
            status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        CommandSpec, DependencySettings, ErrorKind, PackageSettings, SettingsBuilder, ToolSettings,
    };
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn settings(root: &Path, deps: &[(&str, &str)], policy: MismatchPolicy) -> Settings {
        settings_with_installer(root, deps, policy, CommandSpec::new("npm", &["install"]))
    }

    fn settings_with_installer(
        root: &Path,
        deps: &[(&str, &str)],
        policy: MismatchPolicy,
        install: CommandSpec,
    ) -> Settings {
        SettingsBuilder::new()
            .project_root(root)
            .package_settings(PackageSettings {
                widget_name: "W".into(),
                version: "1.0.0".into(),
                description: None,
            })
            .tool_settings(ToolSettings {
                install,
                ..Default::default()
            })
            .dependency_settings(DependencySettings {
                dev_dependencies: deps
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
                version_mismatch: policy,
            })
            .build()
            .unwrap()
    }

    fn install_fake(root: &Path, name: &str, version: &str) {
        let dir = root.join("node_modules").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("package.json"),
            format!(r#"{{ "name": "{name}", "version": "{version}" }}"#),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn satisfied_dependencies_pass() {
        let dir = tempdir().unwrap();
        install_fake(dir.path(), "webpack", "5.88.0");
        install_fake(dir.path(), "typescript", "5.2.2");

        let report = check_dependencies(&settings(
            dir.path(),
            &[("webpack", "^5.0.0"), ("typescript", "~5.2.0")],
            MismatchPolicy::Fail,
        ))
        .await
        .unwrap();

        assert_eq!(report.checked, 2);
        assert!(report.installed.is_empty());
        assert!(report.mismatches.is_empty());
    }

    #[tokio::test]
    async fn mismatch_warns_under_warn_policy() {
        let dir = tempdir().unwrap();
        install_fake(dir.path(), "webpack", "4.46.0");

        let report = check_dependencies(&settings(
            dir.path(),
            &[("webpack", "^5.0.0")],
            MismatchPolicy::Warn,
        ))
        .await
        .unwrap();

        assert_eq!(report.mismatches, vec!["webpack@4.46.0 (wanted ^5.0.0)".to_string()]);
    }

    #[tokio::test]
    async fn mismatch_fails_under_fail_policy() {
        let dir = tempdir().unwrap();
        install_fake(dir.path(), "webpack", "4.46.0");

        let err = check_dependencies(&settings(
            dir.path(),
            &[("webpack", "^5.0.0")],
            MismatchPolicy::Fail,
        ))
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert!(err.to_string().contains("webpack@4.46.0"));
    }

    #[tokio::test]
    async fn non_registry_specs_are_not_version_checked() {
        let dir = tempdir().unwrap();
        install_fake(dir.path(), "local-lib", "0.0.1");

        let report = check_dependencies(&settings(
            dir.path(),
            &[("local-lib", "file:../local-lib")],
            MismatchPolicy::Fail,
        ))
        .await
        .unwrap();

        assert_eq!(report.unchecked, vec!["local-lib".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_dependencies_run_the_installer() {
        let dir = tempdir().unwrap();
        let script = "mkdir -p node_modules/left-pad && \
                      echo '{\"version\": \"1.3.0\"}' > node_modules/left-pad/package.json";

        let report = check_dependencies(&settings_with_installer(
            dir.path(),
            &[("left-pad", "^1.0.0")],
            MismatchPolicy::Fail,
            CommandSpec::new("sh", &["-c", script]),
        ))
        .await
        .unwrap();

        assert_eq!(report.installed, vec!["left-pad".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn installer_that_installs_nothing_fails() {
        let dir = tempdir().unwrap();

        let err = check_dependencies(&settings_with_installer(
            dir.path(),
            &[("left-pad", "^1.0.0")],
            MismatchPolicy::Warn,
            CommandSpec::new("true", &[]),
        ))
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert!(err.to_string().contains("still missing"));
    }
}
