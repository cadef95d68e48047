//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ExportFormat;

/// Create, inspect and convert LVGL layout projects and ESPHome `lvgl:` configs
#[derive(Parser, Debug)]
#[command(name = "lvgl_cli")]
#[command(version)]
#[command(about = "LVGL layout projects and ESPHome config export/import", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty project with one default page
    New {
        /// Project file to create
        path: PathBuf,

        /// Display width in pixels (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Display height in pixels (overrides config)
        #[arg(long)]
        height: Option<u32>,

        /// Colour depth in bits (overrides config)
        #[arg(long)]
        color_depth: Option<u8>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show pages, widgets and lock state of a project or config file
    Info {
        path: PathBuf,

        /// Print the full Markdown summary instead
        #[arg(long)]
        summary: bool,
    },

    /// Export a project as an ESPHome `lvgl:` config
    Export {
        /// Project file (or config) to read
        path: PathBuf,

        /// Output file (defaults to the input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Nest actions under an `actions` key instead of merging them
        #[arg(long)]
        nested_actions: bool,
    },

    /// Convert an ESPHome `lvgl:` config (YAML or JSON) into a project file
    Import {
        /// Config file to read
        input: PathBuf,

        /// Project file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Write the demo project, its YAML export and a summary
    Demo {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show the effective configuration
    ShowConfig {
        /// Only print the config file path
        #[arg(long)]
        path: bool,

        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let args = Args::parse_from([
            "lvgl_cli",
            "--log-level",
            "debug",
            "export",
            "layout.json",
            "--format",
            "json",
            "--nested-actions",
        ]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Commands::Export {
                path,
                output,
                format,
                nested_actions,
            } => {
                assert_eq!(path, PathBuf::from("layout.json"));
                assert!(output.is_none());
                assert_eq!(format, Some(ExportFormat::Json));
                assert!(nested_actions);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_new_with_overrides() {
        let args = Args::parse_from(["lvgl_cli", "new", "p.json", "--width", "480", "-f"]);
        match args.command {
            Commands::New { width, height, force, .. } => {
                assert_eq!(width, Some(480));
                assert!(height.is_none());
                assert!(force);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_output() {
        assert!(Args::try_parse_from(["lvgl_cli", "import", "lvgl.yaml"]).is_err());
    }
}
