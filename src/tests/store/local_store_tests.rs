use super::*;

#[test]
fn items_survive_reopen_and_can_be_removed() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let store = LocalStore::open(tmp.path()).unwrap();
        store.set_item("particle", "{\"x\":1}").unwrap();
        store.set_item("particle.otp-email", "me@example.com").unwrap();
    }

    let store = LocalStore::open(tmp.path()).unwrap();
    assert_eq!(
        store.get_item("particle").unwrap().as_deref(),
        Some("{\"x\":1}")
    );
    store.remove_item("particle").unwrap();
    assert_eq!(store.get_item("particle").unwrap(), None);
    assert_eq!(
        store.get_item("particle.otp-email").unwrap().as_deref(),
        Some("me@example.com")
    );
}

#[test]
fn config_round_trips_and_missing_config_is_none() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::open(tmp.path()).unwrap();
    assert!(store.read_config().unwrap().is_none());

    let cfg = ClientConfig::new("http://127.0.0.1:9/", "anon");
    assert_eq!(cfg.base_url, "http://127.0.0.1:9");
    store.write_config(&cfg).unwrap();
    assert_eq!(store.read_config().unwrap(), Some(cfg));
}

#[test]
fn unsupported_state_version_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::open(tmp.path()).unwrap();
    std::fs::write(
        tmp.path().join("state.json"),
        br#"{"version": 9, "items": {}}"#,
    )
    .unwrap();
    let err = store.get_item("particle").unwrap_err();
    assert!(format!("{:#}", err).contains("unsupported client state version 9"));
}

#[test]
fn memory_storage_is_a_plain_map() {
    let st = MemoryStorage::new();
    assert_eq!(st.get_item("k").unwrap(), None);
    st.set_item("k", "v").unwrap();
    assert_eq!(st.get_item("k").unwrap().as_deref(), Some("v"));
    st.remove_item("k").unwrap();
    assert_eq!(st.get_item("k").unwrap(), None);
}
