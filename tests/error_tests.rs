use primitive_db::*;

fn users_metadata() -> Metadata {
    create_table(
        &Metadata::new(),
        "users",
        &[
            ("name".to_string(), "str".to_string()),
            ("age".to_string(), "int".to_string()),
        ],
    )
    .unwrap()
}

fn condition(field: &str, value: Value) -> Predicate {
    let mut p = Predicate::new();
    p.insert(field.to_string(), value);
    p
}

#[test]
fn create_table_twice_keeps_first_schema() {
    let meta = users_metadata();
    let err = create_table(&meta, "users", &[("other".to_string(), "bool".to_string())]);
    assert!(matches!(err, Err(DbError::AlreadyExists(name)) if name == "users"));
    assert_eq!(meta["users"].column_list(), "ID:int, name:str, age:int");
}

#[test]
fn create_table_rejects_bad_definitions() {
    let empty = Metadata::new();
    assert!(matches!(
        create_table(&empty, "t", &[("x".to_string(), "float".to_string())]),
        Err(DbError::InvalidType(t)) if t == "float"
    ));
    assert!(matches!(
        create_table(
            &empty,
            "t",
            &[
                ("x".to_string(), "int".to_string()),
                ("x".to_string(), "str".to_string()),
            ]
        ),
        Err(DbError::DuplicateColumn(c)) if c == "x"
    ));
    assert!(matches!(
        create_table(&empty, "../escape", &[]),
        Err(DbError::InvalidName(_))
    ));
    assert!(matches!(
        create_table(&empty, "", &[]),
        Err(DbError::InvalidName(_))
    ));
}

#[test]
fn missing_table_is_not_found() {
    let meta = users_metadata();
    assert!(matches!(drop_table(&meta, "ghosts"), Err(DbError::NotFound(_))));
    assert!(matches!(describe_table(&meta, "ghosts", &[]), Err(DbError::NotFound(_))));
    assert!(matches!(
        insert_row(&meta, "ghosts", vec![Value::Int(1)], &[]),
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        delete_rows(&meta, "ghosts", &[], &Predicate::new()),
        Err(DbError::NotFound(_))
    ));
    assert!(matches!(
        update_rows(&meta, "ghosts", &[], &condition("a", Value::Int(1)), &Predicate::new()),
        Err(DbError::NotFound(_))
    ));
}

#[test]
fn insert_with_wrong_arity() {
    let meta = users_metadata();
    let err = insert_row(&meta, "users", vec![Value::str("Alice")], &[]).unwrap_err();
    assert!(matches!(err, DbError::InvalidArity { expected: 2, got: 1 }));
}

#[test]
fn insert_type_mismatch_names_column() {
    let meta = users_metadata();
    let (rows, _) =
        insert_row(&meta, "users", vec![Value::str("Alice"), Value::Int(30)], &[]).unwrap();

    let err = insert_row(&meta, "users", vec![Value::str("Bob"), Value::Bool(true)], &rows)
        .unwrap_err();
    match &err {
        DbError::TypeMismatch {
            column,
            value,
            expected,
        } => {
            assert_eq!(column, "age");
            assert_eq!(value, "true");
            assert_eq!(*expected, ColumnType::Int);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("age"));
    assert_eq!(rows.len(), 1, "rows unchanged after a failed insert");
}

#[test]
fn insert_rejects_non_string_for_str_column() {
    let meta = users_metadata();
    assert!(matches!(
        insert_row(&meta, "users", vec![Value::Int(7), Value::Int(30)], &[]),
        Err(DbError::TypeMismatch { column, .. }) if column == "name"
    ));
}

#[test]
fn insert_past_largest_id_is_refused() {
    let meta = users_metadata();
    let mut full = Row::with_id(i64::MAX);
    full.set("name", Value::str("Last"));
    full.set("age", Value::Int(1));
    let rows = vec![full];

    let err = insert_row(&meta, "users", vec![Value::str("Bob"), Value::Int(2)], &rows);
    assert!(matches!(err, Err(DbError::IdsExhausted(t)) if t == "users"));
}

#[test]
fn update_is_all_or_nothing() {
    let meta = users_metadata();
    let (rows, _) =
        insert_row(&meta, "users", vec![Value::str("Alice"), Value::Int(30)], &[]).unwrap();

    let mut set = condition("name", Value::str("Zed"));
    set.insert("age".to_string(), Value::str("old"));
    let err = update_rows(&meta, "users", &rows, &set, &Predicate::new()).unwrap_err();
    assert!(matches!(err, DbError::TypeMismatch { ref column, .. } if column == "age"));
    assert_eq!(rows[0].get("name"), Some(&Value::str("Alice")));

    let err = update_rows(
        &meta,
        "users",
        &rows,
        &condition("email", Value::str("a@b.c")),
        &Predicate::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DbError::UnknownColumn(c) if c == "email"));

    let err = update_rows(
        &meta,
        "users",
        &rows,
        &condition("ID", Value::Int(9)),
        &Predicate::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DbError::ProtectedColumn(_)));
}

#[test]
fn parser_grammar_violations() {
    assert!(matches!(
        parse_column_specs(&["name"]),
        Err(DbError::MalformedColumnSpec(t)) if t == "name"
    ));
    assert!(matches!(
        parse_column_specs(&["a:b:c"]),
        Err(DbError::MalformedColumnSpec(_))
    ));
    assert!(matches!(
        parse_column_specs(&[":int"]),
        Err(DbError::MalformedColumnSpec(_))
    ));

    assert!(matches!(parse_condition(&["age", "25"]), Err(DbError::MalformedCondition)));
    assert!(matches!(
        parse_condition(&["age", ">", "25"]),
        Err(DbError::MalformedCondition)
    ));
    assert!(matches!(
        parse_condition(&["age", "=", "25", "or", "x"]),
        Err(DbError::MalformedCondition)
    ));

    assert!(matches!(parse_insert_command("insert into users"), Err(DbError::SyntaxError(_))));
    assert!(matches!(
        parse_insert_command("insert users values (1)"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(
        parse_insert_command("insert into users values ()"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(parse_select_command("select users"), Err(DbError::SyntaxError(_))));
    assert!(matches!(
        parse_select_command("select from users extra"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(
        parse_select_command("select from users where age"),
        Err(DbError::MalformedCondition)
    ));
    assert!(matches!(
        parse_update_command("update users set age = 1"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(
        parse_update_command("update users where age = 1"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(
        parse_delete_command("delete from users"),
        Err(DbError::SyntaxError(_))
    ));
    assert!(matches!(tokenize("select 'open"), Err(DbError::SyntaxError(_))));
    assert!(matches!(tokenize("select \"open"), Err(DbError::SyntaxError(_))));
    assert!(matches!(tokenize("trailing \\"), Err(DbError::SyntaxError(_))));
}
