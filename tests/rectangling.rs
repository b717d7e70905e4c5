use anyhow::Result;
use rectangle::ingest::{read_table, table_from_values, Format};
use rectangle::*;
use serde_json::json;

fn gh_repos() -> Table {
    table_from_values(
        "json",
        vec![
            json!([
                {"id": 61160198, "name": "after", "owner": {"login": "gaborcsardi", "id": 660288}},
                {"id": 40500181, "name": "argufy", "owner": {"login": "gaborcsardi", "id": 660288}}
            ]),
            json!([
                {"id": 14756210, "name": "2013-11_sfu", "owner": {"login": "jennybc", "id": 599454}}
            ]),
            json!([]),
        ],
    )
}

#[test]
fn repos_longer_then_wider() -> Result<()> {
    let repos = lengthen(&gh_repos(), "json", &LengthenOptions::default().values_to("repo"))?;
    assert_eq!(repos.nrows(), 3);

    let repos = widen(&repos, "repo", &WidenOptions::default())?;
    assert_eq!(repos.names(), vec!["id", "name", "owner"]);

    // `owner` holds an `id` too, so the default policy refuses to clobber it
    let err = widen(&repos, "owner", &WidenOptions::default()).unwrap_err();
    assert_eq!(err, RectError::NameCollision { names: vec!["id".to_string()] });

    let repos = widen(&repos, "owner", &WidenOptions::default().names_sep("_"))?;
    assert_eq!(repos.names(), vec!["id", "name", "owner_login", "owner_id"]);
    assert_eq!(
        repos.describe(),
        vec![
            ("id", ColumnType::Integer),
            ("name", ColumnType::Character),
            ("owner_login", ColumnType::Character),
            ("owner_id", ColumnType::Integer),
        ]
    );
    Ok(())
}

#[test]
fn repos_hoist_leaves_rest_for_later() -> Result<()> {
    let repos = lengthen(&gh_repos(), "json", &LengthenOptions::default().values_to("repo"))?;
    let before = repos.nrows();

    let repos = hoist(
        &repos,
        "repo",
        &[
            ColumnSpec::new("name", Path::field("name")),
            ColumnSpec::new("login", Path::field("owner").push_field("login")),
        ],
        &HoistOptions::default(),
    )?;

    assert_eq!(repos.nrows(), before);
    assert_eq!(repos.names(), vec!["name", "login", "repo"]);

    // `owner.id` was not hoisted, so the owner branch stays whole
    let residual = &repos.column("repo").unwrap().values[0];
    assert_eq!(
        residual,
        &NestedValue::from(json!({"id": 61160198, "owner": {"login": "gaborcsardi", "id": 660288}}))
    );

    // and is still reachable from the residual column
    let repos = hoist(
        &repos,
        "repo",
        &[ColumnSpec::new("owner_id", Path::parse("owner.id")?)],
        &HoistOptions::default(),
    )?;
    assert_eq!(
        repos.column("owner_id").unwrap().values[2],
        NestedValue::from(599454i64)
    );
    Ok(())
}

#[test]
fn discs_hoist_deep_label() -> Result<()> {
    let discs = table_from_values(
        "disc",
        vec![
            json!({"labels": [{"name": "A"}, {"name": "B"}], "year": 1990}),
            json!({"year": 2015}),
        ],
    );

    let out = hoist(
        &discs,
        "disc",
        &[ColumnSpec::new("label", Path::parse("labels.1.name")?)],
        &HoistOptions::default(),
    )?;

    assert_eq!(out.column("label").unwrap().values[0], NestedValue::from("A"));
    assert_eq!(out.column("label").unwrap().values[1], NestedValue::Null);
    assert_eq!(
        out.column("disc").unwrap().values[0],
        NestedValue::from(json!({"labels": [{"name": "A"}, {"name": "B"}], "year": 1990}))
    );
    Ok(())
}

#[test]
fn characters_to_long_format() -> Result<()> {
    let input = br#"
        {"name": "Theon", "titles": ["Prince", "Captain"], "aliases": ["Reek"]}
        {"name": "Tyrion", "titles": [], "aliases": ["Imp", "Halfman", "Yollo"]}
    "#;
    let chars = read_table(&input[..], "char", Format::Ndjson)?;

    let chars = widen(&chars, "char", &WidenOptions::default())?;
    let chars = chars.pack(&["titles", "aliases"], "meta")?;
    let long = lengthen(&chars, "meta", &LengthenOptions::default().values_to("value").indices_to("what"))?;

    assert_eq!(long.names(), vec!["name", "value", "what"]);
    assert_eq!(long.nrows(), 4);

    let long = lengthen(&long, "value", &LengthenOptions::default())?;
    // Theon: 2 titles + 1 alias, Tyrion: 0 titles + 3 aliases
    assert_eq!(long.nrows(), 6);
    assert_eq!(long.column("what").unwrap().values[5], NestedValue::from("aliases"));
    Ok(())
}

#[test]
fn parallel_extraction_keeps_row_order() -> Result<()> {
    let rows: Vec<_> = (0..500)
        .map(|i| {
            if i % 3 == 0 {
                json!({"late": i, "n": i})
            } else {
                json!({"n": i})
            }
        })
        .collect();
    let table = table_from_values("x", rows);

    let wide = widen(&table, "x", &WidenOptions::default())?;

    assert_eq!(wide.names(), vec!["late", "n"]);
    let n = &wide.column("n").unwrap().values;
    assert!(n.iter().enumerate().all(|(i, v)| *v == NestedValue::from(i as i64)));
    Ok(())
}
