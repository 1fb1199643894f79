use super::*;

#[test]
fn query_serializes_to_postgrest_pairs() {
    let q = Query::from("particle")
        .select("*,tag(*)")
        .eq("user_id", "u-1")
        .eq("is_trashed", false)
        .order("updated_at", false);
    assert_eq!(
        q.to_pairs(),
        vec![
            ("select".to_string(), "*,tag(*)".to_string()),
            ("user_id".to_string(), "eq.u-1".to_string()),
            ("is_trashed".to_string(), "eq.false".to_string()),
            ("order".to_string(), "updated_at.desc".to_string()),
        ]
    );
}

#[test]
fn default_query_selects_everything_unordered() {
    let q = Query::from("type");
    assert_eq!(q.to_pairs(), vec![("select".to_string(), "*".to_string())]);

    let q = q.order("id", true);
    assert_eq!(q.to_pairs()[1], ("order".to_string(), "id.asc".to_string()));
}
