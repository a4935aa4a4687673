use std::path::PathBuf;

use clap::Parser;
use smelter::cli::commands::settings::SettingsCommands;
use smelter::cli::{Cli, Commands};

#[test]
fn test_parse_analyze_defaults() {
    let cli = Cli::try_parse_from(vec!["smelter", "analyze"]).unwrap();

    match cli.command {
        Commands::Analyze(args) => {
            assert_eq!(args.paths, vec![PathBuf::from(".")]);
            assert!(!args.sequential);
            assert_eq!(args.jobs, None);
            assert_eq!(args.output, None);
            assert_eq!(args.extension, "java");
        }
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_analyze_sequential_with_output() {
    let cli = Cli::try_parse_from(vec![
        "smelter",
        "--config",
        "ci.yaml",
        "analyze",
        "src/main/java",
        "src/test/java",
        "--sequential",
        "--output",
        "report.txt",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("ci.yaml")));
    match cli.command {
        Commands::Analyze(args) => {
            assert_eq!(args.paths.len(), 2);
            assert!(args.sequential);
            assert_eq!(args.output, Some(PathBuf::from("report.txt")));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_format_write() {
    let cli = Cli::try_parse_from(vec!["smelter", "format", "Foo.java", "--write"]).unwrap();

    match cli.command {
        Commands::Format(args) => {
            assert_eq!(args.file, PathBuf::from("Foo.java"));
            assert!(args.write);
            assert!(args.settings.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_settings_export_default_path() {
    let cli = Cli::try_parse_from(vec!["smelter", "settings", "export"]).unwrap();

    match cli.command {
        Commands::Settings(args) => match args.command {
            SettingsCommands::Export { path } => assert!(path.is_none()),
            SettingsCommands::Show => panic!("Wrong settings command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_format_requires_file() {
    assert!(Cli::try_parse_from(vec!["smelter", "format"]).is_err());
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(vec!["smelter", "swarm", "start"]).is_err());
}
