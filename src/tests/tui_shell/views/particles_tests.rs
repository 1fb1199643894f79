use super::*;
use crate::model::{ParticleId, Tag, TagId};

fn particle(kind: i64, content: &str) -> Particle {
    Particle {
        id: ParticleId("p-1".to_string()),
        title: None,
        content: content.to_string(),
        description: None,
        type_id: kind,
        is_public: false,
        is_archived: false,
        is_trashed: false,
        tags: Vec::new(),
        created_at: "2024-05-02T10:00:00Z".to_string(),
        updated_at: None,
        user_id: Some("user-1".to_string()),
    }
}

fn ctx() -> RenderCtx {
    RenderCtx {
        now: time::OffsetDateTime::parse(
            "2024-05-02T12:00:00Z",
            &time::format_description::well_known::Rfc3339,
        )
        .unwrap(),
    }
}

#[test]
fn row_shows_icon_title_markers_age_and_tags() {
    let mut p = particle(1, "https://x.com");
    p.title = Some("X".to_string());
    p.is_public = true;
    p.is_archived = true;
    p.tags.push(Tag {
        id: TagId(4),
        name: "news".to_string(),
        color: None,
        user_id: None,
    });
    assert_eq!(row_line(&p, &ctx()), "🔗 X [public,archived]  2h ago  #news");
}

#[test]
fn row_uses_first_content_line_without_title() {
    let p = particle(3, "first line\nsecond");
    assert_eq!(row_line(&p, &ctx()), "💬 first line  2h ago");
}

#[test]
fn details_include_media_url_description_and_content() {
    let mut p = particle(2, "user-1/abc.png");
    p.description = Some("a cat".to_string());
    let lines = detail_lines(&p, Some("http://store.test/media/user-1/abc.png"));
    assert!(lines.contains(&"type: Image".to_string()));
    assert!(lines.contains(&"url: http://store.test/media/user-1/abc.png".to_string()));
    assert!(lines.contains(&"a cat".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("user-1/abc.png"));
}
