use super::*;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn particle_row(user: &str, content: &str) -> Value {
    json!({ "content": content, "type": 3, "user_id": user })
}

#[test]
fn params_parse_eq_filters_and_order() {
    let p = parse_params(&pairs(&[
        ("select", "*,tag(*)"),
        ("user_id", "eq.u1"),
        ("is_trashed", "eq.false"),
        ("order", "updated_at.desc"),
    ]))
    .unwrap();
    assert_eq!(p.select, "*,tag(*)");
    assert_eq!(
        p.filters,
        vec![
            ("user_id".to_string(), "u1".to_string()),
            ("is_trashed".to_string(), "false".to_string())
        ]
    );
    assert_eq!(p.order, Some(("updated_at".to_string(), false)));

    assert!(parse_params(&pairs(&[("name", "ilike.*x*")])).is_err());
}

#[test]
fn filters_compare_numbers_and_bools_as_text() {
    let row = json!({ "id": 7, "is_public": false, "user_id": "u1" });
    assert!(matches_filters(&row, &pairs(&[("id", "7"), ("is_public", "false")])));
    assert!(!matches_filters(&row, &pairs(&[("user_id", "u2")])));
}

#[test]
fn particle_insert_fills_defaults_and_checks_type() {
    let mut db = Db::seeded();
    let rows = insert_rows(&mut db, "particle", particle_row("u1", "note")).unwrap();
    let row = &rows[0];
    assert!(row["id"].as_str().is_some_and(|id| id.len() == 36));
    assert_eq!(row["is_archived"], false);
    assert_eq!(row["is_trashed"], false);
    assert!(row["created_at"].is_string());

    let bad = json!({ "content": "x", "type": 99, "user_id": "u1" });
    assert!(matches!(
        insert_rows(&mut db, "particle", bad),
        Err(RowError::Conflict(_))
    ));
    assert_eq!(db.rows("particle").len(), 1);
}

#[test]
fn select_embeds_tags_and_orders() {
    let mut db = Db::seeded();
    let a = insert_rows(&mut db, "particle", particle_row("u1", "a")).unwrap().remove(0);
    insert_rows(&mut db, "particle", particle_row("u1", "b")).unwrap();
    let tag = insert_rows(&mut db, "tag", json!({ "name": "work", "user_id": "u1" }))
        .unwrap()
        .remove(0);
    insert_rows(
        &mut db,
        "particle_tag",
        json!({ "particle_id": a["id"], "tag_id": tag["id"] }),
    )
    .unwrap();

    let params = parse_params(&pairs(&[("select", "*,tag(*)"), ("order", "content.desc")])).unwrap();
    let rows = select_rows(&db, "particle", &params);
    assert_eq!(rows[0]["content"], "b");
    assert_eq!(rows[1]["tag"][0]["name"], "work");
    assert_eq!(rows[0]["tag"].as_array().map(Vec::len), Some(0));

    let plain = parse_params(&pairs(&[])).unwrap();
    assert!(select_rows(&db, "particle", &plain)[0].get("tag").is_none());
}

#[test]
fn join_insert_rejects_missing_rows_and_duplicates() {
    let mut db = Db::seeded();
    let p = insert_rows(&mut db, "particle", particle_row("u1", "a")).unwrap().remove(0);
    let missing_tag = json!({ "particle_id": p["id"], "tag_id": 41 });
    assert!(matches!(
        insert_rows(&mut db, "particle_tag", missing_tag),
        Err(RowError::Conflict(_))
    ));

    let t = insert_rows(&mut db, "tag", json!({ "name": "x", "user_id": "u1" })).unwrap().remove(0);
    let join = json!({ "particle_id": p["id"], "tag_id": t["id"] });
    insert_rows(&mut db, "particle_tag", join.clone()).unwrap();
    assert!(insert_rows(&mut db, "particle_tag", join).is_err());
}

#[test]
fn deleting_a_particle_drops_its_join_rows() {
    let mut db = Db::seeded();
    let p = insert_rows(&mut db, "particle", particle_row("u1", "a")).unwrap().remove(0);
    let t = insert_rows(&mut db, "tag", json!({ "name": "x", "user_id": "u1" })).unwrap().remove(0);
    insert_rows(
        &mut db,
        "particle_tag",
        json!({ "particle_id": p["id"], "tag_id": t["id"] }),
    )
    .unwrap();

    let id = p["id"].as_str().unwrap().to_string();
    assert_eq!(delete_rows(&mut db, "particle", &pairs(&[("id", id.as_str())])).unwrap(), 1);
    assert!(db.rows("particle_tag").is_empty());
    assert_eq!(db.rows("tag").len(), 1);
}

#[test]
fn unfiltered_writes_and_type_writes_are_refused() {
    let mut db = Db::seeded();
    insert_rows(&mut db, "particle", particle_row("u1", "a")).unwrap();
    assert!(matches!(
        update_rows(&mut db, "particle", &[], json!({ "is_public": true })),
        Err(RowError::BadRequest(_))
    ));
    assert!(matches!(
        delete_rows(&mut db, "type", &pairs(&[("id", "1")])),
        Err(RowError::Forbidden(_))
    ));
    assert_eq!(db.rows("type").len(), 3);
}

#[test]
fn update_patches_matching_rows_only() {
    let mut db = Db::seeded();
    let a = insert_rows(&mut db, "particle", particle_row("u1", "a")).unwrap().remove(0);
    insert_rows(&mut db, "particle", particle_row("u1", "b")).unwrap();
    let id = a["id"].as_str().unwrap().to_string();

    let n = update_rows(&mut db, "particle", &pairs(&[("id", id.as_str())]), json!({ "is_public": true }))
        .unwrap();
    assert_eq!(n, 1);
    let public: Vec<&Value> = db
        .rows("particle")
        .iter()
        .filter(|r| r["is_public"] == true)
        .collect();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["content"], "a");
}
