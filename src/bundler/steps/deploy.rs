//! Deployment of bundled assets into the host project.

use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::fs,
};

/// Copies `dist/tmp/widgets/**` into `{project}/deployment/web/widgets/`.
///
/// Same-path files are overwritten and nothing else in the destination is
/// removed. Returns the number of files copied.
pub async fn copy_to_deployment(settings: &Settings) -> Result<usize> {
    let source = settings.bundle_output_dir();
    if !source.is_dir() {
        return Err(Error::BundleMissing(source));
    }

    let target = settings.deployment_widgets_dir();
    let copied = fs::copy_dir_contents(&source, &target).await?;
    log::info!("Deployed {} files to {}", copied, target.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{PackageSettings, SettingsBuilder};
    use std::path::Path;
    use tempfile::tempdir;

    fn settings(root: &Path) -> Settings {
        SettingsBuilder::new()
            .project_root(root)
            .project_path(root.join("host"))
            .package_settings(PackageSettings {
                widget_name: "MyWidget".into(),
                version: "1.0.0".into(),
                description: None,
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn copies_tree_and_keeps_unrelated_files() {
        let dir = tempdir().unwrap();
        let settings = settings(dir.path());
        let out = settings.bundle_output_dir();
        std::fs::create_dir_all(out.join("com/acme")).unwrap();
        std::fs::write(out.join("com/acme/MyWidget.js"), "new").unwrap();

        let target = settings.deployment_widgets_dir();
        std::fs::create_dir_all(target.join("com/acme")).unwrap();
        std::fs::write(target.join("com/acme/MyWidget.js"), "old").unwrap();
        std::fs::write(target.join("Other.js"), "other").unwrap();

        assert_eq!(copy_to_deployment(&settings).await.unwrap(), 1);

        assert_eq!(
            std::fs::read_to_string(target.join("com/acme/MyWidget.js")).unwrap(),
            "new"
        );
        assert_eq!(std::fs::read_to_string(target.join("Other.js")).unwrap(), "other");
    }

    #[tokio::test]
    async fn missing_bundle_output_fails() {
        let dir = tempdir().unwrap();
        assert!(copy_to_deployment(&settings(dir.path())).await.is_err());
    }
}
