//! Integration tests for MockLoader against derived configuration structs.

use cfgmock::prelude::*;
use cfgmock::resolve::field_paths;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Default, PartialEq, Resolve)]
struct Nested {
    #[resolve(alias = "Field3")]
    field3: bool,
}

#[derive(Debug, Default, PartialEq, Resolve)]
struct Config {
    #[resolve(alias = "Field1")]
    field1: String,
    #[resolve(alias = "Field2")]
    field2: i64,
    #[resolve(nested, alias = "Nested")]
    nested: Nested,
}

#[derive(Debug, Default, PartialEq, Resolve)]
struct ConfigWithEmbeds {
    #[resolve(embed)]
    config: Config,
    #[resolve(alias = "Field4")]
    field4: f64,
}

fn mock_loader() -> MockLoader {
    MockLoader::new([
        ("Field1", Value::from("value1")),
        ("Field2", Value::from(2)),
        ("Nested.Field3", Value::from(true)),
    ])
}

fn expected_config() -> Config {
    Config {
        field1: "value1".to_string(),
        field2: 2,
        nested: Nested { field3: true },
    }
}

// ============================================================================
// Plain structures
// ============================================================================

#[test]
fn test_load() {
    let mut config = Config::default();
    mock_loader().load(&mut config).unwrap();
    assert_eq!(config, expected_config());
}

#[test]
fn test_override() {
    let mut loader = mock_loader();
    loader.set_override("Field1", "newvalue1");
    loader.set_override("Nested.Field3", false);

    let mut config = Config::default();
    loader.load(&mut config).unwrap();

    assert_eq!(config.field1, "newvalue1");
    assert_eq!(config.field2, 2);
    assert!(!config.nested.field3);
}

#[test]
fn test_field_name_and_alias_both_resolve() {
    let mut config = Config::default();
    MockLoader::new([
        ("field1", Value::from("by-name")),
        ("nested.field3", Value::from(true)),
    ])
    .load(&mut config)
    .unwrap();

    assert_eq!(config.field1, "by-name");
    assert!(config.nested.field3);
}

#[test]
fn test_mock_with_non_existent_field() {
    let mut config = Config::default();
    let err = MockLoader::new([
        ("Field1", Value::from("value1")),
        ("NonExistent", Value::from("x")),
    ])
    .load(&mut config)
    .unwrap_err();

    assert!(err.is_unknown_field());
    assert_eq!(err.path(), "NonExistent");
    assert_eq!(err.source_location(), Some(&SourceLocation::mock("NonExistent")));
    assert_eq!(config, Config::default());
}

#[test]
fn test_override_non_existent_field() {
    let mut config = Config::default();
    let err = mock_loader()
        .with_override("NonExistent", "x")
        .load(&mut config)
        .unwrap_err();

    assert!(err.is_unknown_field());
    assert_eq!(err.path(), "NonExistent");
    assert_eq!(
        err.source_location(),
        Some(&SourceLocation::overridden("NonExistent"))
    );
    assert_eq!(config, Config::default());
}

#[test]
fn test_unknown_field_suggestion() {
    let mut config = Config::default();
    let err = MockLoader::new([("Feild1", Value::from("x"))])
        .load(&mut config)
        .unwrap_err();

    assert_eq!(err.suggestion(), Some("Change 'Feild1' to 'Field1'".to_string()));
    assert!(err.to_string().contains("did you mean 'Field1'?"));
}

#[test]
fn test_path_through_scalar_is_unknown() {
    let mut config = Config::default();
    let err = MockLoader::new([("Field1.Extra", Value::from("x"))])
        .load(&mut config)
        .unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn test_path_ending_on_struct_is_unknown() {
    let mut config = Config::default();
    let err = MockLoader::new([("Nested", Value::from(true))])
        .load(&mut config)
        .unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn test_type_mismatch() {
    let mut config = Config::default();
    let err = MockLoader::new([("Field2", Value::from("two"))])
        .load(&mut config)
        .unwrap_err();

    match err {
        LoadError::TypeMismatch {
            path,
            expected,
            actual,
            ..
        } => {
            assert_eq!(path, "Field2");
            assert_eq!(expected, ValueKind::Integer);
            assert_eq!(actual, ValueKind::String);
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_bool_does_not_coerce_to_string() {
    let mut config = Config::default();
    let err = MockLoader::new([("Field1", Value::from(true))])
        .load(&mut config)
        .unwrap_err();
    assert!(err.is_type_mismatch());
}

// ============================================================================
// Embedded structures
// ============================================================================

#[test]
fn test_embedded_directly() {
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([
        ("Field1", Value::from("value1")),
        ("Field2", Value::from(2)),
        ("Nested.Field3", Value::from(true)),
        ("Field4", Value::from(4.5)),
    ])
    .load(&mut config)
    .unwrap();

    assert_eq!(config.config, expected_config());
    assert_eq!(config.field4, 4.5);
}

#[test]
fn test_embedded_indirectly() {
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([
        ("Config.Field1", Value::from("value1")),
        ("Config.Field2", Value::from(2)),
        ("Config.Nested.Field3", Value::from(true)),
        ("Field4", Value::from(4.5)),
    ])
    .load(&mut config)
    .unwrap();

    assert_eq!(config.config, expected_config());
    assert_eq!(config.field4, 4.5);
}

#[test]
fn test_override_embedded_directly() {
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([
        ("Field1", Value::from("value1")),
        ("Field2", Value::from(2)),
        ("Field4", Value::from(4.5)),
    ])
    .with_override("Field1", "newvalue1")
    .with_override("Field4", 5.5)
    .load(&mut config)
    .unwrap();

    assert_eq!(config.config.field1, "newvalue1");
    assert_eq!(config.config.field2, 2);
    assert_eq!(config.field4, 5.5);
}

#[test]
fn test_override_embedded_indirectly() {
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([
        ("Config.Field1", Value::from("value1")),
        ("Config.Nested.Field3", Value::from(true)),
    ])
    .with_override("Config.Field1", "newvalue1")
    .with_override("Config.Nested.Field3", false)
    .load(&mut config)
    .unwrap();

    assert_eq!(config.config.field1, "newvalue1");
    assert!(!config.config.nested.field3);
}

#[test]
fn test_override_wins_across_spellings() {
    // Promoted mock entry, qualified override.
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([("Field1", Value::from("value1"))])
        .with_override("Config.Field1", "newvalue1")
        .load(&mut config)
        .unwrap();
    assert_eq!(config.config.field1, "newvalue1");

    // Qualified mock entry, promoted override.
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([("Config.Field1", Value::from("value1"))])
        .with_override("Field1", "newvalue1")
        .load(&mut config)
        .unwrap();
    assert_eq!(config.config.field1, "newvalue1");
}

#[test]
fn test_embed_field_name_qualifies() {
    let mut config = ConfigWithEmbeds::default();
    MockLoader::new([("config.Field1", Value::from("value1"))])
        .load(&mut config)
        .unwrap();
    assert_eq!(config.config.field1, "value1");
}

#[test]
fn test_field_paths_of_embedding_struct() {
    let mut config = ConfigWithEmbeds::default();
    assert_eq!(
        field_paths(&mut config),
        vec!["Field1", "Field2", "Nested.Field3", "Field4"]
    );
}

// ============================================================================
// Idempotence and the Loader seam
// ============================================================================

#[test]
fn test_load_is_idempotent() {
    let loader = mock_loader().with_override("Field2", 3);

    let mut first = Config::default();
    loader.load(&mut first).unwrap();
    let mut second = Config::default();
    loader.load(&mut second).unwrap();
    loader.load(&mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_load_leaves_unaddressed_fields() {
    let mut config = Config {
        field2: 42,
        ..Config::default()
    };
    MockLoader::new([("Field1", Value::from("value1"))])
        .load(&mut config)
        .unwrap();

    assert_eq!(config.field1, "value1");
    assert_eq!(config.field2, 42);
}

fn load_with(loader: &dyn Loader) -> Result<Config, LoadError> {
    let mut config = Config::default();
    loader.load_into(&mut config)?;
    Ok(config)
}

#[test]
fn test_loader_seam() {
    assert_eq!(load_with(&mock_loader()).unwrap(), expected_config());
}

// ============================================================================
// JSON, tracing and verification
// ============================================================================

#[test]
fn test_from_json() {
    let json = serde_json::json!({
        "Config": { "Field1": "value1", "Nested": { "Field3": true } },
        "Field4": 4.5,
    });
    let mut config = ConfigWithEmbeds::default();
    MockLoader::from_json(&json)
        .unwrap()
        .load(&mut config)
        .unwrap();

    assert_eq!(config.config.field1, "value1");
    assert!(config.config.nested.field3);
    assert_eq!(config.field4, 4.5);
}

#[test]
fn test_from_json_rejects_arrays() {
    let json = serde_json::json!({ "Field1": ["a", "b"] });
    let err = MockLoader::from_json(&json).unwrap_err();
    assert_eq!(err.path(), "Field1");
}

#[test]
fn test_load_traced_reports_override() {
    let mut config = ConfigWithEmbeds::default();
    let trace = MockLoader::new([
        ("Field1", Value::from("value1")),
        ("Field4", Value::from(4.5)),
    ])
    .with_override("Config.Field1", "newvalue1")
    .load_traced(&mut config)
    .unwrap();

    assert_eq!(trace.trace_count(), 2);
    assert!(trace.was_overridden("Field1"));
    assert!(trace.was_overridden("Config.Field1"));
    assert!(!trace.was_overridden("Field4"));

    let field1 = trace.trace("Field1").unwrap();
    assert_eq!(field1.path(), "Config.Field1");
    assert_eq!(field1.final_value.source.layer, Layer::Override);
    assert_eq!(field1.final_value.value, Value::from("newvalue1"));
    assert_eq!(field1.source_count(), 2);

    assert_eq!(
        trace.overridden_paths().collect::<Vec<_>>(),
        vec!["Config.Field1"]
    );
    assert!(trace.trace_report().contains("<- overridden"));
}

#[test]
fn test_verify_collects_every_problem() {
    let mut config = ConfigWithEmbeds::default();
    let result = MockLoader::new([
        ("Field1", Value::from(1)),
        ("Field9", Value::from("x")),
    ])
    .with_override("Field4", "not a float")
    .verify(&mut config);

    match result {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 3);
            assert_eq!(errors.iter().filter(|e| e.is_unknown_field()).count(), 1);
            assert_eq!(errors.iter().filter(|e| e.is_type_mismatch()).count(), 2);
        }
        Validation::Success(_) => panic!("expected failure"),
    }
    assert_eq!(config, ConfigWithEmbeds::default());
}

#[test]
fn test_verify_checks_only_winning_entry() {
    let mut config = Config::default();
    let result = MockLoader::new([("Field2", Value::from("two"))])
        .with_override("Field2", 2)
        .verify(&mut config);
    assert!(result.is_success());
}

// ============================================================================
// Same-layer aliasing
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_same_layer_aliases_later_path_wins() {
    init_tracing();

    // "Config.Field1" sorts before "Field1", so the promoted spelling wins.
    let mut config = ConfigWithEmbeds::default();
    let trace = MockLoader::new([
        ("Field1", Value::from("promoted")),
        ("Config.Field1", Value::from("qualified")),
    ])
    .load_traced(&mut config)
    .unwrap();

    assert_eq!(config.config.field1, "promoted");
    let field1 = trace.trace("Config.Field1").unwrap();
    assert_eq!(field1.path(), "Field1");
    assert_eq!(field1.final_value.source.layer, Layer::Mock);
}

// ============================================================================
// Promotion depth
// ============================================================================

#[derive(Debug, Default, Resolve)]
struct Deep {
    #[resolve(alias = "X")]
    x: i64,
}

#[derive(Debug, Default, Resolve)]
struct Mid {
    #[resolve(embed)]
    deep: Deep,
}

#[derive(Debug, Default, Resolve)]
struct Shallow {
    #[resolve(alias = "X")]
    x: i64,
}

#[derive(Debug, Default, Resolve)]
struct Layered {
    #[resolve(embed)]
    mid: Mid,
    #[resolve(embed)]
    shallow: Shallow,
}

#[test]
fn test_shallower_promoted_field_wins() {
    let mut layered = Layered::default();
    MockLoader::new([("X", 7)]).load(&mut layered).unwrap();
    assert_eq!(layered.shallow.x, 7);
    assert_eq!(layered.mid.deep.x, 0);

    MockLoader::new([("Mid.X", 9)]).load(&mut layered).unwrap();
    assert_eq!(layered.mid.deep.x, 9);
    assert_eq!(layered.shallow.x, 7);
}
