use super::*;
use particle::model::ParticleId;

fn particle(id: &str) -> Particle {
    Particle {
        id: ParticleId(id.to_string()),
        title: None,
        content: format!("content {}", id),
        description: None,
        type_id: 3,
        is_public: false,
        is_archived: false,
        is_trashed: false,
        tags: Vec::new(),
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: None,
        user_id: Some("u1".to_string()),
    }
}

#[test]
fn exact_id_wins_over_longer_prefix_matches() {
    let rows = vec![particle("ab"), particle("abc"), particle("abd")];
    assert_eq!(resolve_particle(&rows, "ab").unwrap().id.as_str(), "ab");
}

#[test]
fn unique_prefix_resolves() {
    let rows = vec![particle("abc123"), particle("zzz999")];
    assert_eq!(resolve_particle(&rows, " zz ").unwrap().id.as_str(), "zzz999");
}

#[test]
fn ambiguous_missing_and_empty_ids_are_errors() {
    let rows = vec![particle("abc1"), particle("abc2")];
    let err = resolve_particle(&rows, "abc").unwrap_err().to_string();
    assert!(err.contains("ambiguous"), "{}", err);

    let err = resolve_particle(&rows, "x").unwrap_err().to_string();
    assert!(err.contains("no particle"), "{}", err);

    assert!(resolve_particle(&rows, "  ").is_err());
}
