use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cvforge::core::document::load_document;
use cvforge::core::schema::to_json_resume;
use cvforge::core::serialize::to_json_string;
use cvforge::{deep_merge, CliConfig, ConvertEngine, CvError, LocalStorage};
use serde_json::{json, Map, Value};
use std::fs;
use tempfile::TempDir;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// 測試完整的 json5schema 轉換流程（讀檔、合併、輸出）
#[test]
fn test_end_to_end_json_output_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("ada.json5");
    let output = temp_dir.path().join("out/ada.json");
    fs::write(
        &input,
        r#"{
  // version file
  name: "Ada",
  experience: [{company: "Acme", title: "Eng", start: "2020-01-01"}],
}"#,
    )?;

    let config = CliConfig::try_parse_from([
        "json5schema",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--json",
    ])?;
    ConvertEngine::new(LocalStorage::new(), config).run()?;

    let written: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(
        written["work"],
        json!([{
            "name": "Acme",
            "position": "Eng",
            "startDate": "2020-01-01",
            "endDate": today(),
            "highlights": []
        }])
    );
    assert_eq!(written["basics"], json!({"name": "Ada"}));
    assert!(written.get("interests").is_none());
    assert!(written.get("meta").is_none());

    Ok(())
}

#[test]
fn test_json5_output_has_provenance_header() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("ada.json5");
    fs::write(&input, "{name: 'Ada', keywords: ['rust']}")?;

    let config = CliConfig::try_parse_from([
        "json5schema",
        input.to_str().unwrap(),
        "--schema-url",
        "https://example.com/resume-schema",
    ])?;
    let text = ConvertEngine::new(LocalStorage::new(), config).run()?;

    let header: Vec<&str> = text.lines().take(3).collect();
    assert_eq!(header[0], "// JSON Resume schema: https://example.com/resume-schema");
    assert_eq!(
        header[1],
        format!("// Source: {}", fs::canonicalize(&input)?.display())
    );
    assert!(header[2].starts_with("// Generated: "));
    assert!(text.contains("interests: ["));

    let reparsed: Value = json5::from_str(&text)?;
    assert_eq!(reparsed["interests"][0]["name"], json!("Keywords"));

    Ok(())
}

#[test]
fn test_merge_flag_supplies_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let defaults = temp_dir.path().join("defaults.json5");
    let input = temp_dir.path().join("version.json5");
    fs::write(
        &defaults,
        "{name: 'Ada Lovelace', email: 'ada@example.com', github: 'https://github.com/ada', skills: ['Math']}",
    )?;
    fs::write(&input, "{title: 'Analyst', skills: ['Rust', 'Go']}")?;

    let config = CliConfig::try_parse_from([
        "json5schema",
        input.to_str().unwrap(),
        "--merge",
        defaults.to_str().unwrap(),
        "--json",
    ])?;
    let text = ConvertEngine::new(LocalStorage::new(), config).run()?;
    let value: Value = serde_json::from_str(&text)?;

    assert_eq!(value["basics"]["name"], json!("Ada Lovelace"));
    assert_eq!(value["basics"]["label"], json!("Analyst"));
    assert_eq!(value["basics"]["profiles"][0]["username"], json!("ada"));
    // 陣列整個取代，不做逐項合併
    assert_eq!(value["skills"][0]["keywords"], json!(["Rust", "Go"]));

    Ok(())
}

#[test]
fn test_missing_input_is_fatal_and_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("missing.json5");
    let output = temp_dir.path().join("out.json");

    let config = CliConfig::try_parse_from([
        "json5schema",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ])?;
    let err = ConvertEngine::new(LocalStorage::new(), config)
        .run()
        .unwrap_err();

    assert!(matches!(err, CvError::DocumentReadError { .. }));
    assert!(err.to_string().contains("missing.json5"));
    assert!(!output.exists());

    Ok(())
}

#[test]
fn test_profile_dedup_scenario() {
    let source = object(json!({
        "profiles": [{"network": "GitHub", "url": "https://github.com/x"}],
        "github": "https://github.com/x"
    }));

    let resume = to_json_resume(&source);
    let github_count = resume
        .basics
        .profiles
        .iter()
        .filter(|p| p.network().is_some_and(|n| n.eq_ignore_ascii_case("github")))
        .count();

    assert_eq!(github_count, 1);
}

#[test]
fn test_year_normalization_scenario() {
    let source = object(json!({"education": [
        {"provider": "MIT", "year": "2020"},
        {"provider": "MIT", "year": "May 2020"}
    ]}));

    let value = serde_json::to_value(to_json_resume(&source)).unwrap();

    assert_eq!(value["education"][0]["endDate"], json!("2020-01-01"));
    assert_eq!(value["education"][1]["endDate"], json!("May 2020"));
}

#[test]
fn test_conversion_is_deterministic_and_round_trips() {
    let base = object(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "profiles": [{"network": "LinkedIn", "url": "https://linkedin.com/in/ada"}],
        "projects": ["cvforge", {"name": "site", "url": "https://ada.dev"}],
        "matchScore": 0.9
    }));
    let overlay = object(json!({
        "title": "Engineer",
        "experience": [{"company": "Acme", "end": "2024-01-01", "achievements": ["Shipped"]}],
        "secondarySkills": ["Go"]
    }));

    let first = to_json_string(&to_json_resume(&deep_merge(&base, &overlay))).unwrap();
    let second = to_json_string(&to_json_resume(&deep_merge(&base, &overlay))).unwrap();
    assert_eq!(first, second);

    let reparsed: Value = serde_json::from_str(&first).unwrap();
    let expected = serde_json::to_value(to_json_resume(&deep_merge(&base, &overlay))).unwrap();
    assert_eq!(reparsed, expected);
}

#[test]
fn test_empty_overlay_and_overlay_precedence() {
    let base = object(json!({
        "name": "Ada",
        "nested": {"a": 1, "b": {"c": 2}},
        "skills": ["Rust"]
    }));
    assert_eq!(deep_merge(&base, &Map::new()), base);

    let overlay = object(json!({"name": "Grace", "nested": {"b": {"c": 3}}, "skills": []}));
    let merged = deep_merge(&base, &overlay);

    assert_eq!(merged["name"], json!("Grace"));
    assert_eq!(merged["nested"], json!({"a": 1, "b": {"c": 3}}));
    assert_eq!(merged["skills"], json!([]));
}

#[test]
fn test_type_mismatches_degrade_gracefully() {
    let source = object(json!({
        "name": null,
        "profiles": "not a list",
        "experience": {"company": "Acme"},
        "skills": "Rust",
        "projects": [1, true, null],
        "education": ["MIT"],
        "keywords": {"a": 1},
        "github": 42
    }));

    let value = serde_json::to_value(to_json_resume(&source)).unwrap();

    assert_eq!(
        value,
        json!({
            "basics": {"name": "Unknown"},
            "work": [],
            "skills": [],
            "projects": [],
            "education": []
        })
    );
}

#[test]
fn test_json5_output_reads_back_with_separator_characters() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("pasted.json5");
    let output = temp_dir.path().join("pasted.out.json5");
    fs::write(
        &input,
        r#"{name: "Ada", title: "Engineer\u2028Analyst", keywords: ["a\u2029b"]}"#,
    )?;

    let config = CliConfig::try_parse_from([
        "json5schema",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ])?;
    ConvertEngine::new(LocalStorage::new(), config).run()?;

    // 輸出必須能被同一個 JSON5 解析器讀回
    let document = load_document(&LocalStorage::new(), &output)?;

    assert_eq!(document["basics"]["label"], json!("Engineer\u{2028}Analyst"));
    assert_eq!(document["interests"][0]["keywords"], json!(["a\u{2029}b"]));

    Ok(())
}
