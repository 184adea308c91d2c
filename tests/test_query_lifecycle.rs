use flatdb::catalog::catalog::RECORD_SIZE;
use flatdb::catalog::{Column, FieldType, TableSchema};
use flatdb::sql::{tokenize, Operator};
use flatdb::storage::{Row, Value};
use flatdb::{Config, ErrorCategory, ExecutionEngine};
use std::fs;
use tempfile::TempDir;

fn open_engine() -> (TempDir, ExecutionEngine) {
    let dir = TempDir::new().unwrap();
    let engine = ExecutionEngine::new(Config::new().data_dir(dir.path())).unwrap();
    (dir, engine)
}

fn temp_files(dir: &TempDir) -> Vec<String> {
    fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("__database_Temporary_"))
        .collect()
}

#[test]
fn test_row_encoding_survives_reload() {
    let schema = TableSchema::from_columns(
        "people",
        vec![
            Column::new("name", FieldType::String),
            Column::new("age", FieldType::Integer),
            Column::new("height", FieldType::Number),
            Column::new("active", FieldType::Boolean),
        ],
    );
    let row = Row::new(
        3,
        vec![
            Value::from("Bob Smith"),
            Value::Integer(-42),
            Value::Number(1.75),
            Value::Boolean(false),
        ],
    );

    let line = row.encode();
    assert_eq!(line, "3;'Bob Smith';-42;1.75;False\n");
    assert_eq!(Row::decode(&line, &schema).unwrap(), row);
}

#[test]
fn test_tokenizer_builds_clause_chain() {
    let chain = tokenize("SELECT users name='Bob' age>=18").unwrap();
    let clauses = chain.clauses();

    assert_eq!(clauses.len(), 3);
    assert_eq!(
        (clauses[0].keyword.as_str(), clauses[0].operator, clauses[0].value.as_str()),
        ("SELECT", Operator::Assign, "users")
    );
    assert_eq!(
        (clauses[1].keyword.as_str(), clauses[1].operator, clauses[1].value.as_str()),
        ("name", Operator::Equal, "Bob")
    );
    assert_eq!(
        (clauses[2].keyword.as_str(), clauses[2].operator, clauses[2].value.as_str()),
        ("age", Operator::GreaterOrEqual, "18")
    );
}

#[test]
fn test_duplicate_create_keeps_single_record() {
    let (_dir, engine) = open_engine();

    engine.execute("DATASET t a:INTEGER").unwrap();
    let err = engine.execute("DATASET t a:INTEGER").unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Schema);
    let len = fs::metadata(engine.config().catalog_path()).unwrap().len();
    assert_eq!(len as usize, RECORD_SIZE);
}

#[test]
fn test_select_with_comparison() {
    let (_dir, engine) = open_engine();
    engine.execute("DATASET people name:STRING age:INTEGER").unwrap();
    for (name, age) in [("Ann", 12), ("Bob", 18), ("Cid", 40), ("Dee", 17)] {
        engine
            .execute(&format!("INSERT_INTO people name='{}' age={}", name, age))
            .unwrap();
    }

    let names: Vec<String> = engine
        .execute("SELECT people age>=18")
        .unwrap()
        .rows
        .iter()
        .filter_map(|row| row.get(0).and_then(Value::as_str).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Bob", "Cid"]);
}

#[test]
fn test_failed_update_leaves_store_untouched() {
    let (dir, engine) = open_engine();
    engine.execute("DATASET t id:INTEGER name:STRING").unwrap();
    engine.execute("INSERT_INTO t id=1 name=a").unwrap();
    engine.execute("INSERT_INTO t id=2 name=b").unwrap();

    let store = dir.path().join("t");
    let before = fs::read(&store).unwrap();

    let err = engine.execute("UPDATE t id=1 nope:5").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);

    assert_eq!(fs::read(&store).unwrap(), before);
    assert!(temp_files(&dir).is_empty());
}

#[test]
fn test_update_with_unknown_predicate_column_leaves_store_untouched() {
    let (dir, engine) = open_engine();
    engine.execute("DATASET t id:INTEGER name:STRING").unwrap();
    engine.execute("INSERT_INTO t id=1 name=a").unwrap();
    engine.execute("INSERT_INTO t id=2 name=b").unwrap();

    let store = dir.path().join("t");
    let before = fs::read(&store).unwrap();

    let err = engine.execute("UPDATE t nope=1 name:x").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);

    assert_eq!(fs::read(&store).unwrap(), before);
    assert!(temp_files(&dir).is_empty());
}

#[test]
fn test_failed_delete_leaves_store_untouched() {
    let (dir, engine) = open_engine();
    engine.execute("DATASET t id:INTEGER").unwrap();
    engine.execute("INSERT_INTO t id=1").unwrap();
    engine.execute("INSERT_INTO t id=2").unwrap();

    let store = dir.path().join("t");
    let before = fs::read(&store).unwrap();

    let err = engine.execute("DELETE t nope=1").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);

    assert_eq!(fs::read(&store).unwrap(), before);
    assert!(temp_files(&dir).is_empty());
    assert_eq!(engine.execute("SELECT t").unwrap().rows.len(), 2);
}

#[test]
fn test_boolean_predicates_compare_equality() {
    let (_dir, engine) = open_engine();
    engine.execute("DATASET t id:INTEGER ok:BOOLEAN").unwrap();
    engine.execute("INSERT_INTO t id=1 ok=True").unwrap();
    engine.execute("INSERT_INTO t id=2 ok=False").unwrap();

    let indexes = |query: &str| -> Vec<u64> {
        engine
            .execute(query)
            .unwrap()
            .rows
            .iter()
            .map(|row| row.index())
            .collect()
    };
    assert_eq!(indexes("SELECT t ok<>True"), vec![0]);
    assert_eq!(indexes("SELECT t ok>False"), vec![1]);
    assert_eq!(indexes("SELECT t ok=True"), vec![0]);
}

#[test]
fn test_inserted_string_reads_back_unquoted() {
    let (_dir, engine) = open_engine();
    engine.execute("DATASET t name:STRING").unwrap();
    engine.execute("INSERT_INTO t name='Bob Smith'").unwrap();

    let rows = engine.execute("SELECT t").unwrap().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), Some(&Value::from("Bob Smith")));
}

#[test]
fn test_delete_keeps_remaining_rows_in_order() {
    let (dir, engine) = open_engine();
    engine.execute("DATASET t id:INTEGER even:BOOLEAN").unwrap();
    for id in 0..10 {
        let even = if id % 2 == 0 { "True" } else { "False" };
        engine
            .execute(&format!("INSERT_INTO t id={} even={}", id, even))
            .unwrap();
    }

    let result = engine.execute("DELETE t even=True").unwrap();
    assert_eq!(result.affected_rows, 5);

    let rows = engine.execute("SELECT t").unwrap().rows;
    let ids: Vec<i64> = rows
        .iter()
        .filter_map(|row| row.get(0).and_then(Value::as_i64))
        .collect();
    assert_eq!(ids, vec![1, 3, 5, 7, 9]);
    assert!(temp_files(&dir).is_empty());
}

#[test]
fn test_engine_reopens_existing_data() {
    let dir = TempDir::new().unwrap();
    {
        let engine = ExecutionEngine::new(Config::new().data_dir(dir.path())).unwrap();
        engine.execute("DATASET t id:INTEGER").unwrap();
        engine.execute("INSERT_INTO t id=7").unwrap();
    }

    let engine = ExecutionEngine::new(Config::new().data_dir(dir.path())).unwrap();
    let rows = engine.execute("SELECT t").unwrap().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), Some(&Value::Integer(7)));
}
