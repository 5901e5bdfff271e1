use std::fs;
use std::path::Path;
use svgs::config::{LayoutKind, Settings};
use svgs::error::{DuplicateError, SvgsError};
use svgs::storage::SaveOutcome;
use svgs::transform::{Target, Transform, TransformOptions};
use svgs::Svgs;
use tempfile::TempDir;

const ARROW: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M12 5v14"/></svg>"#;
const BELL: &str = r#"<svg viewBox="0 0 24 24"><path d="M6 8a6 6 0 0 1 12 0"/></svg>"#;
const PLAY: &str = r#"<svg viewBox="0 0 24 24"><polygon points="6 3 20 12 6 21 6 3"/></svg>"#;

fn write_asset(root: &Path, relative: &str, content: &str) {
    let path = root.join("assets").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Echoes the component name and target so output paths are easy to check
struct EchoTransform;

impl Transform for EchoTransform {
    fn transform(
        &self,
        _source: &str,
        options: &TransformOptions,
        component_name: &str,
    ) -> anyhow::Result<String> {
        Ok(format!("// {} ({})\n", component_name, options.target))
    }
}

#[test]
fn test_generate_from_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "arrow-up.svg", ARROW);
    write_asset(temp_dir.path(), "bell.svg", BELL);
    fs::write(
        temp_dir.path().join("svgs.toml"),
        "suffix = \"Icon\"\nindex = true\n",
    )?;

    let project = Svgs::new(temp_dir.path(), None)?;
    let summary = project.generate()?;

    assert_eq!(summary.components(), 2);
    let component = fs::read_to_string(temp_dir.path().join("src/components/ArrowUpIcon.tsx"))?;
    assert!(component.contains("export function ArrowUpIcon("));
    assert!(component.contains("width={size} height={size}"));
    assert!(temp_dir.path().join("src/components/BellIcon.tsx").exists());
    assert!(temp_dir.path().join("src/index.ts").exists());
    Ok(())
}

#[test]
fn test_multi_target_family_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "media/play.svg", PLAY);
    write_asset(temp_dir.path(), "alerts/bell.svg", BELL);

    let mut settings = Settings::new(temp_dir.path());
    settings.layout = LayoutKind::Family;
    settings.targets = vec![Target::Web, Target::Native];
    settings.index = true;

    let project = Svgs::from_settings(settings).with_transform(Box::new(EchoTransform));
    let summary = project.generate()?;

    assert_eq!(summary.files_written, 4);
    assert_eq!(summary.barrels, 6);
    for target in ["web", "native"] {
        let play = temp_dir.path().join(format!("src/{target}/media/components/Play.tsx"));
        assert_eq!(fs::read_to_string(play)?, format!("// Play ({target})\n"));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(format!("src/{target}/index.ts")))?,
            "export { Bell } from \"./alerts\";\nexport { Play } from \"./media\";\n"
        );
    }
    Ok(())
}

#[test]
fn test_duplicate_names_across_folders() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "media/bell.svg", BELL);
    write_asset(temp_dir.path(), "alerts/bell.svg", PLAY);

    let mut settings = Settings::new(temp_dir.path());
    settings.layout = LayoutKind::Family;

    let error = Svgs::from_settings(settings).generate().unwrap_err();
    match error {
        SvgsError::Duplicate(DuplicateError::Name { name, .. }) => assert_eq!(name, "Bell"),
        other => panic!("expected duplicate name, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_duplicate_content_reported_by_sync() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "bell.svg", BELL);
    write_asset(temp_dir.path(), "bell-copy.svg", BELL);

    let project = Svgs::from_settings(Settings::new(temp_dir.path()));
    let error = project.sync().unwrap_err().to_string();

    assert!(error.starts_with("Validation errors detected during change detection."));
    assert!(error.contains("Duplicate content"));
    assert!(!temp_dir.path().join(".svgs-cache.json").exists());
    Ok(())
}

#[test]
fn test_tampered_manifest_cannot_escape_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "bell.svg", BELL);
    let outside = temp_dir.path().join("keep.txt");
    fs::write(&outside, "important")?;

    let project = Svgs::from_settings(Settings::new(temp_dir.path()));
    project.generate()?;

    let manifest = temp_dir.path().join("src/.svgs-manifest.json");
    fs::write(
        &manifest,
        serde_json::to_string(&vec![
            outside.clone(),
            temp_dir.path().join("src/../keep.txt"),
        ])?,
    )?;

    project.clean()?;
    assert_eq!(fs::read_to_string(&outside)?, "important");
    Ok(())
}

#[test]
fn test_sync_roundtrip() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_asset(temp_dir.path(), "bell.svg", BELL);
    write_asset(temp_dir.path(), "arrow-up.svg", ARROW);

    let mut settings = Settings::new(temp_dir.path());
    settings.index = true;
    let project = Svgs::from_settings(settings);

    let first = project.sync()?;
    assert_eq!(first.converted, 2);
    assert_eq!(first.saved, SaveOutcome::Saved);

    let database: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join(".svgs-cache.json"))?)?;
    assert!(database.to_string().contains("\"componentName\":\"ArrowUp\""));

    assert!(project.status()?.is_empty());
    let second = project.sync()?;
    assert_eq!(second.saved, SaveOutcome::Clean);

    write_asset(temp_dir.path(), "play.svg", PLAY);
    let third = project.sync()?;
    assert_eq!(third.changes.added.len(), 1);
    assert!(fs::read_to_string(temp_dir.path().join("src/index.ts"))?.contains("Play"));
    Ok(())
}
