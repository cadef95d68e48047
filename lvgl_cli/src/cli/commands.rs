//! Command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use lvgl_core::deserialize::ImportReport;
use lvgl_core::file_io::{
    export_config_file, export_yaml_file, load_project, load_project_with_lock_check, save_project,
    FileLock,
};
use lvgl_core::foreign::to_yaml;
use lvgl_core::project::Project;
use lvgl_core::serialize::{ActionPlacement, SerializeOptions};
use lvgl_core::summary::render_summary;

use super::args::{Args, Commands};
use crate::config::{get_config_path, Config, ExportConfig, ExportFormat};
use crate::demo::demo_project;

pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Commands::New {
            path,
            width,
            height,
            color_depth,
            force,
        } => {
            let mut project = Project::new();
            project.display = config.display.clone();
            if let Some(width) = width {
                project.display.width = *width;
            }
            if let Some(height) = height {
                project.display.height = *height;
            }
            if let Some(depth) = color_depth {
                project.display.color_depth = *depth;
            }
            create_project(&project, path, *force)?;
            println!(
                "Created {} ({}x{}, {}-bit)",
                path.display(),
                project.display.width,
                project.display.height,
                project.display.color_depth
            );
        }
        Commands::Info { path, summary } => {
            print!("{}", describe(path, *summary)?);
        }
        Commands::Export {
            path,
            output,
            format,
            nested_actions,
        } => {
            let mut export = config.export.clone();
            if let Some(format) = format {
                export.format = *format;
            }
            if *nested_actions {
                export.actions = ActionPlacement::Nested;
            }
            let written = export_project(path, output.as_deref(), &export)?;
            println!("Exported {}", written.display());
        }
        Commands::Import {
            input,
            output,
            force,
        } => {
            let report = import_config(input, output, *force)?;
            print_report(&report);
            println!("Wrote {}", output.display());
        }
        Commands::Demo { dir } => {
            for path in write_demo(dir)? {
                println!("Wrote {}", path.display());
            }
        }
        Commands::ShowConfig { path, write } => show_config(args, config, *path, *write)?,
    }
    Ok(())
}

fn user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "lvgl_cli".to_string())
}

/// Save under the file lock, refusing to clobber unless forced.
fn create_project(project: &Project, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let _lock = FileLock::acquire(path, user_id())?;
    save_project(project, path)?;
    Ok(())
}

/// Text shown by `info`.
pub(crate) fn describe(path: &Path, summary: bool) -> Result<String> {
    let (imported, lock) = load_project_with_lock_check(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let project = &imported.project;

    if summary {
        return Ok(render_summary(project));
    }

    let mut out = format!(
        "{}\n  display: {}x{}, {}-bit, buffer {}\n  pages: {}\n",
        path.display(),
        project.display.width,
        project.display.height,
        project.display.color_depth,
        project.display.buffer_size,
        project.page_count()
    );
    for page in project.pages() {
        out.push_str(&format!(
            "    {}{} \"{}\": {} widget(s)\n",
            page.id,
            if page.is_default { " (default)" } else { "" },
            page.name,
            page.widget_count()
        ));
    }
    if let Some(lock) = lock {
        out.push_str(&format!(
            "  locked by {} on {} since {}\n",
            lock.user_id,
            lock.machine,
            lock.locked_at.to_rfc3339()
        ));
    }
    if !imported.report.is_clean() {
        out.push_str(&format!("  {} import warning(s)\n", imported.report.len()));
    }
    Ok(out)
}

/// Where `export` writes when no output is given:
/// `<dir>/<stem>_lvgl.<ext>`, with `dir` from the config or the input's own.
pub(crate) fn default_export_path(input: &Path, export: &ExportConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layout".to_string());
    let dir = export
        .output_dir
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}_lvgl.{}", stem, export.format.extension()))
}

pub(crate) fn export_project(input: &Path, output: Option<&Path>, export: &ExportConfig) -> Result<PathBuf> {
    let imported = load_project(input).with_context(|| format!("failed to open {}", input.display()))?;
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_export_path(input, export));
    let options = SerializeOptions {
        actions: export.actions,
    };

    match export.format {
        ExportFormat::Yaml => export_yaml_file(&imported.project, &target, &options)?,
        ExportFormat::Json => export_config_file(&imported.project, &target, &options)?,
    }
    info!(
        "exported {} widget(s) on {} page(s)",
        imported.project.widget_count(),
        imported.project.page_count()
    );
    Ok(target)
}

pub(crate) fn import_config(input: &Path, output: &Path, force: bool) -> Result<ImportReport> {
    let imported = load_project(input).with_context(|| format!("failed to import {}", input.display()))?;
    create_project(&imported.project, output, force)?;
    Ok(imported.report)
}

fn print_report(report: &ImportReport) {
    if report.is_clean() {
        return;
    }
    println!("{} warning(s):", report.len());
    for warning in &report.warnings {
        println!("  - {}", warning);
    }
}

/// Write the demo project file, its YAML export and a Markdown summary.
pub(crate) fn write_demo(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let project = demo_project()?;

    let project_path = dir.join("demo_project.json");
    save_project(&project, &project_path)?;

    let yaml_path = dir.join("demo_output.yaml");
    fs::write(&yaml_path, to_yaml(&project, &SerializeOptions::default())?)
        .with_context(|| format!("failed to write {}", yaml_path.display()))?;

    let summary_path = dir.join("demo_summary.md");
    fs::write(&summary_path, render_summary(&project))
        .with_context(|| format!("failed to write {}", summary_path.display()))?;

    info!(
        "demo: {}x{}, {} page(s), {} widget(s)",
        project.display.width,
        project.display.height,
        project.page_count(),
        project.widget_count()
    );
    Ok(vec![project_path, yaml_path, summary_path])
}

fn show_config(args: &Args, config: &Config, path_only: bool, write: bool) -> Result<()> {
    let path = args.config.clone().or_else(get_config_path);
    match &path {
        Some(path) => println!("Configuration file: {}", path.display()),
        None => println!("Configuration file: (no standard location)"),
    }
    if write {
        let Some(path) = &path else {
            bail!("no config location; pass --config <file>");
        };
        config.save(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }
    if path_only {
        return Ok(());
    }
    if !path.as_deref().is_some_and(Path::exists) {
        println!("(using defaults, no config file found)");
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvgl_core::project::MAIN_PAGE_ID;
    use tempfile::TempDir;

    const LEGACY_CONFIG: &str = "\
lvgl:
  displays:
    - width: 480
      height: 320
  pages:
    - id: home
      widgets:
        - btn:
            x: 10
            y: 10
        - gauge:
            x: 5
";

    #[test]
    fn test_create_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        create_project(&Project::new(), &path, false).unwrap();
        assert!(create_project(&Project::new(), &path, false).is_err());
        create_project(&Project::new(), &path, true).unwrap();
        // lock released after the save
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_describe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        create_project(&Project::new(), &path, false).unwrap();

        let text = describe(&path, false).unwrap();
        assert!(text.contains("display: 320x240, 16-bit, buffer 100%"));
        assert!(text.contains(&format!("{} (default) \"Main Page\": 0 widget(s)", MAIN_PAGE_ID)));
        assert!(!text.contains("locked by"));

        let summary = describe(&path, true).unwrap();
        assert!(summary.starts_with("# LVGL Project Summary"));
    }

    #[test]
    fn test_import_then_export() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("device.yaml");
        let project_path = dir.path().join("device.json");
        fs::write(&input, LEGACY_CONFIG).unwrap();

        let report = import_config(&input, &project_path, false).unwrap();
        assert_eq!(report.len(), 1);

        let reloaded = load_project(&project_path).unwrap();
        assert_eq!(reloaded.project.display.width, 480);
        assert!(reloaded.project.find_widget("home", "button_1").is_some());

        let export = ExportConfig::default();
        let written = export_project(&project_path, None, &export).unwrap();
        assert_eq!(written, dir.path().join("device_lvgl.yaml"));
        let yaml = fs::read_to_string(&written).unwrap();
        assert!(yaml.starts_with("lvgl:"));
        assert!(yaml.contains("- button:"));
    }

    #[test]
    fn test_default_export_path() {
        let mut export = ExportConfig {
            format: ExportFormat::Json,
            ..ExportConfig::default()
        };
        assert_eq!(
            default_export_path(Path::new("/work/panel.json"), &export),
            PathBuf::from("/work/panel_lvgl.json")
        );
        export.output_dir = Some(PathBuf::from("/out"));
        assert_eq!(
            default_export_path(Path::new("/work/panel.json"), &export),
            PathBuf::from("/out/panel_lvgl.json")
        );
    }

    #[test]
    fn test_write_demo() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("demo");
        let written = write_demo(&target).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));

        let loaded = load_project(&target.join("demo_project.json")).unwrap();
        assert_eq!(loaded.project.page_count(), 2);
        let summary = fs::read_to_string(target.join("demo_summary.md")).unwrap();
        assert!(summary.contains("volume_slider"));
    }
}
