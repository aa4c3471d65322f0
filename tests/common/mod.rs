//! Shared fixtures for CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const WIDGET: &str = "MyWidget";

pub const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<widget id="com.acme.widget.MyWidget" pluginWidget="true">
    <name>My Widget</name>
    <properties>
        <propertyGroup caption="General">
            <property key="label" type="string" required="true">
                <caption>Label</caption>
                <description>Text shown on the button</description>
            </property>
            <property key="size" type="enumeration" defaultValue="small">
                <caption>Size</caption>
                <enumerationValues>
                    <enumerationValue key="small">Small</enumerationValue>
                    <enumerationValue key="large">Large</enumerationValue>
                </enumerationValues>
            </property>
        </propertyGroup>
    </properties>
</widget>"#;

/// Stand-in for webpack: writes a bundle whose size depends on the mode and
/// appends one line per run to `bundler.log`.
pub const FAKE_WEBPACK: &str = r#"echo "$NODE_ENV" >> bundler.log
mkdir -p dist/tmp/widgets/com/acme/widget
if [ "$NODE_ENV" = production ]; then
  printf 'a()' > dist/tmp/widgets/com/acme/widget/MyWidget.js
else
  printf '/* development build */\nfunction a() {\n  return 1;\n}\n' > dist/tmp/widgets/com/acme/widget/MyWidget.js
fi
printf '<package/>' > dist/tmp/widgets/package.xml
echo "asset MyWidget.js emitted""#;

/// A widget project in a temporary directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Project whose bundler runs `script` through `sh -c`.
    pub fn with_bundler(script: &str) -> Self {
        let project = Self::bare();
        project.write_manifest(serde_json::json!({
            "name": "my-widget",
            "widgetName": WIDGET,
            "version": "1.2.3",
            "config": {
                "projectPath": "host",
                "bundler": { "command": "sh", "args": ["-c", script] }
            }
        }));
        project.write("src/MyWidget.xml", DESCRIPTOR);
        project
    }

    /// Empty project directory.
    pub fn bare() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(path, contents).expect("write fixture");
    }

    pub fn write_manifest(&self, manifest: serde_json::Value) {
        self.write("package.json", &manifest.to_string());
    }

    /// Lines of `bundler.log`, one per bundler run.
    pub fn bundler_runs(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("bundler.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// The CLI, running inside the project.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("widget_bundler").expect("widget_bundler binary");
        cmd.current_dir(self.root());
        cmd
    }
}
