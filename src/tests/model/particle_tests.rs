use super::*;

fn particle_json(type_id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": "p-1",
        "title": null,
        "content": "https://example.com",
        "type": type_id,
        "is_public": true,
        "created_at": "2026-01-25T00:00:00Z",
        "tag": [{"id": 7, "name": "rust", "color": "#ff0000"}]
    })
}

#[test]
fn type_ids_map_to_exactly_one_kind() {
    assert_eq!(ParticleKind::from_id(1), Some(ParticleKind::Link));
    assert_eq!(ParticleKind::from_id(2), Some(ParticleKind::Image));
    assert_eq!(ParticleKind::from_id(3), Some(ParticleKind::Text));
    assert_eq!(ParticleKind::from_id(0), None);
    assert_eq!(ParticleKind::from_id(4), None);
    for kind in ParticleKind::ALL {
        assert_eq!(ParticleKind::from_id(kind.id()), Some(kind));
    }
}

#[test]
fn kind_parses_names_and_ids() {
    assert_eq!(ParticleKind::parse("link"), Some(ParticleKind::Link));
    assert_eq!(ParticleKind::parse(" IMAGE "), Some(ParticleKind::Image));
    assert_eq!(ParticleKind::parse("3"), Some(ParticleKind::Text));
    assert_eq!(ParticleKind::parse("video"), None);
}

#[test]
fn particle_decodes_embedded_tags_and_defaults() {
    let p: Particle = serde_json::from_value(particle_json(1)).unwrap();
    assert_eq!(p.id.as_str(), "p-1");
    assert!(p.is_public);
    assert!(!p.is_archived);
    assert_eq!(p.tags.len(), 1);
    assert_eq!(p.tags[0].id, TagId(7));
    assert_eq!(p.display_title(), "https://example.com");
    assert_eq!(p.body().unwrap(), ParticleBody::Link("https://example.com"));
}

#[test]
fn unknown_type_is_a_body_error() {
    let p: Particle = serde_json::from_value(particle_json(9)).unwrap();
    assert!(p.kind().is_none());
    assert!(p.body().is_err());
}

#[test]
fn session_expiry_is_derived_from_expires_in() {
    let s = AuthSession {
        access_token: "a".to_string(),
        refresh_token: None,
        token_type: "bearer".to_string(),
        expires_in: Some(3600),
        expires_at: None,
        user: AuthUser {
            id: "u".to_string(),
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            email: None,
        },
    }
    .with_expiry_from(1_000);
    assert_eq!(s.expires_at, Some(4_600));
    assert!(!s.is_expired_at(4_599));
    assert!(s.is_expired_at(4_600));
    assert!(s.user.is_authenticated());
}

#[test]
fn config_defaults_fill_bucket_and_storage_key() {
    let cfg: ClientConfig = serde_json::from_value(serde_json::json!({
        "version": 1,
        "base_url": "http://localhost:1",
        "anon_key": "anon"
    }))
    .unwrap();
    assert_eq!(cfg.bucket, "media");
    assert_eq!(cfg.storage_key, "particle");
    assert_eq!(cfg.otp_email_key(), "particle.otp-email");
    assert!(cfg.auxiliary_keys().contains(&cfg.otp_email_key()));
}
