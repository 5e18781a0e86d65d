//! Integration tests for the bazelrc-schema crate.

use std::fs;

use bazelrc_core::{RcParser, parse_command_line_args};
use bazelrc_schema::{FlagEntry, SchemaError, SchemaFile, ToolConfig, load_flag_schema};
use tempfile::TempDir;

fn sample_file() -> SchemaFile {
    SchemaFile {
        bazel_version: Some("7.1.0".to_string()),
        flags: vec![
            FlagEntry::value("jobs").with_abbreviation("j"),
            FlagEntry::boolean("keep_going").with_abbreviation("k"),
            FlagEntry::boolean("verbose_failures"),
        ],
    }
}

#[test]
fn json_and_yaml_files_load_the_same_schema() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("flags.json");
    let yaml = dir.path().join("flags.yaml");
    sample_file().save(&json).unwrap();
    sample_file().save(&yaml).unwrap();

    assert_eq!(SchemaFile::load(&json).unwrap(), sample_file());
    assert_eq!(SchemaFile::load(&yaml).unwrap(), sample_file());
    assert_eq!(load_flag_schema(&json).unwrap(), load_flag_schema(&yaml).unwrap());
}

#[test]
fn loaded_schema_drives_the_parser() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("flags.yml");
    fs::write(
        &schema_path,
        "flags:\n  - name: jobs\n    abbreviation: j\n  - name: keep_going\n    boolean: true\n    abbreviation: k\n",
    )
    .unwrap();
    let schema = load_flag_schema(&schema_path).unwrap();

    let parser = RcParser::new(dir.path().to_string_lossy(), &schema);
    let contents = parser
        .parse("build -k -j 8 --nokeep_going".as_bytes(), "/ws/.bazelrc")
        .unwrap();
    assert_eq!(contents.command("build").unwrap().values("keep_going").unwrap(), ["true", "false"]);
    assert_eq!(contents.flag_value("build", "jobs"), Some("8"));

    let args = parse_command_line_args(&schema, &["-k", "//pkg:all"]).unwrap();
    assert_eq!(args.targets, vec!["//pkg:all"]);
    assert_eq!(args.flags.flag_value("keep_going"), Some("true"));
}

#[test]
fn invalid_files_are_reported() {
    let dir = TempDir::new().unwrap();

    let bad_json = dir.path().join("flags.json");
    fs::write(&bad_json, "{ not json").unwrap();
    assert!(matches!(load_flag_schema(&bad_json), Err(SchemaError::JsonError(_))));

    let bad_abbreviation = dir.path().join("abbrev.yaml");
    fs::write(&bad_abbreviation, "flags:\n  - name: jobs\n    abbreviation: jo\n").unwrap();
    assert!(matches!(
        load_flag_schema(&bad_abbreviation),
        Err(SchemaError::InvalidAbbreviation { .. })
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(load_flag_schema(&missing), Err(SchemaError::IoError(_))));
}

#[test]
fn tool_config_round_trip_and_relative_paths() {
    let dir = TempDir::new().unwrap();
    sample_file().save(dir.path().join("flags.yaml")).unwrap();
    let config_path = dir.path().join("bazelrc.yaml");
    fs::write(&config_path, "schema: flags.yaml\nrc_files:\n  - .bazelrc\n").unwrap();

    let config = ToolConfig::load(&config_path).unwrap();
    assert_eq!(config.schema, Some(dir.path().join("flags.yaml")));
    assert_eq!(config.rc_files, vec![dir.path().join(".bazelrc")]);
    assert!(config.load_schema().unwrap().is_boolean("keep_going"));

    let saved = dir.path().join("saved.yaml");
    config.save(&saved).unwrap();
    assert_eq!(ToolConfig::load(&saved).unwrap(), config);
}
