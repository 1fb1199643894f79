use serde_json::json;

use super::*;
use crate::hooks::{particles_query, tags_query};
use crate::model::TagId;
use crate::notify::{ToastLog, ToastStyle};
use crate::test_support::{Call, MemoryBackend};

struct Answer(bool);

impl Confirm for Answer {
    fn confirm(&mut self, _prompt: &ConfirmPrompt) -> bool {
        self.0
    }
}

#[derive(Default)]
struct FakeClipboard {
    copied: Vec<String>,
}

impl Clipboard for FakeClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String> {
        Ok(self.copied.last().cloned().unwrap_or_default())
    }
}

fn row(id: &str, type_id: i64, content: &str) -> serde_json::Value {
    json!({"id": id, "content": content, "type": type_id, "user_id": "user-1",
           "is_public": false, "is_archived": false, "is_trashed": false,
           "created_at": "2026-01-01T00:00:00Z", "updated_at": "2026-01-01T00:00:00Z"})
}

fn setup() -> (MemoryBackend, ParticlesHook) {
    let backend = MemoryBackend::with_types();
    backend.seed(
        "particle",
        vec![
            row("a", 3, "hello"),
            row("b", 1, "https://x.com"),
            row("c", 2, "user-1/abc_1.png"),
        ],
    );
    let mut hook = ParticlesHook::new(particles_query("user-1"));
    hook.mount(&backend);
    backend.clear_calls();
    (backend, hook)
}

fn find(hook: &ParticlesHook, id: &str) -> Particle {
    hook.data().iter().find(|p| p.id.as_str() == id).cloned().unwrap()
}

fn updates(b: &MemoryBackend) -> usize {
    b.count(|c| matches!(c, Call::Update(_)))
}

fn selects(b: &MemoryBackend) -> usize {
    b.count(|c| matches!(c, Call::Select(_)))
}

#[test]
fn publish_toggled_twice_restores_flag_with_one_update_and_revalidate_each() {
    let (backend, mut hook) = setup();
    let mut log = ToastLog::default();

    let p = find(&hook, "a");
    assert!(toggle_public(&backend, &mut hook, &p, &mut log));
    assert_eq!(updates(&backend), 1);
    assert_eq!(selects(&backend), 1);
    assert!(find(&hook, "a").is_public);
    assert_eq!(log.titles(), vec!["Publishing particle...", "Particle is public"]);

    let p = find(&hook, "a");
    assert!(toggle_public(&backend, &mut hook, &p, &mut log));
    assert_eq!(updates(&backend), 2);
    assert_eq!(selects(&backend), 2);
    assert!(!find(&hook, "a").is_public);
}

#[test]
fn archive_toggled_twice_restores_flag() {
    let (backend, mut hook) = setup();
    let mut log = ToastLog::default();

    let p = find(&hook, "b");
    toggle_archive(&backend, &mut hook, &p, &mut log);
    assert!(find(&hook, "b").is_archived);
    let p = find(&hook, "b");
    toggle_archive(&backend, &mut hook, &p, &mut log);
    assert!(!find(&hook, "b").is_archived);
    assert_eq!(updates(&backend), 2);
    assert_eq!(selects(&backend), 2);
}

#[test]
fn failed_toggle_keeps_stale_value_and_reports_backend_message() {
    let (backend, mut hook) = setup();
    let mut log = ToastLog::default();
    backend.fail_once("update:particle", "permission denied for table particle");

    let p = find(&hook, "a");
    assert!(!toggle_public(&backend, &mut hook, &p, &mut log));
    assert!(!find(&hook, "a").is_public);
    assert_eq!(selects(&backend), 1);
    let last = log.last().unwrap();
    assert_eq!(last.style, ToastStyle::Failure);
    assert_eq!(last.title, "permission denied for table particle");
}

#[test]
fn declined_destroy_issues_no_call() {
    let (backend, mut hook) = setup();
    let mut log = ToastLog::default();

    let p = find(&hook, "a");
    assert!(!destroy(&backend, &mut hook, &p, &mut Answer(false), &mut log));
    assert!(backend.calls().is_empty());
    assert!(log.toasts.is_empty());

    assert!(destroy(&backend, &mut hook, &p, &mut Answer(true), &mut log));
    assert_eq!(backend.count(|c| matches!(c, Call::Delete(_))), 1);
    assert!(hook.data().iter().all(|x| x.id.as_str() != "a"));
}

#[test]
fn copy_uses_public_url_for_images() {
    let (backend, hook) = setup();
    let mut clip = FakeClipboard::default();
    let mut log = ToastLog::default();

    copy_content(&backend, &find(&hook, "a"), &mut clip, &mut log);
    copy_content(&backend, &find(&hook, "c"), &mut clip, &mut log);
    assert_eq!(clip.copied[0], "hello");
    assert_eq!(
        clip.copied[1],
        "http://store.test/storage/v1/object/public/media/user-1/abc_1.png"
    );
}

#[test]
fn kind_filter_is_local_and_cycles() {
    let (backend, hook) = setup();
    let only_links = filter_by_kind(hook.data(), KindFilter::Only(ParticleKind::Link));
    assert_eq!(only_links.len(), 1);
    assert_eq!(only_links[0].id.as_str(), "b");
    assert_eq!(filter_by_kind(hook.data(), KindFilter::All).len(), 3);
    assert!(backend.calls().is_empty());

    let mut f = KindFilter::All;
    for _ in 0..4 {
        f = f.next();
    }
    assert_eq!(f, KindFilter::All);
}

#[test]
fn type_rows_label_filters_and_create_choices() {
    let backend = MemoryBackend::with_types();
    let mut types = crate::hooks::TypesHook::new(crate::hooks::types_query());
    types.mount(&backend);

    let link = KindFilter::Only(ParticleKind::Link);
    assert_eq!(link.label(types.data()), "🔗 Link");
    assert_eq!(KindFilter::All.label(types.data()), "All types");
    assert_eq!(link.label(&[]), "Link");

    let choices = kind_choices(types.data());
    assert_eq!(
        choices,
        vec![
            (ParticleKind::Link, "🔗 Link".to_string()),
            (ParticleKind::Image, "🖼 Image".to_string()),
            (ParticleKind::Text, "💬 Text".to_string()),
        ]
    );

    let odd = vec![
        TypeRow {
            id: 9,
            name: "Audio".to_string(),
            emoji: None,
        },
        TypeRow {
            id: 3,
            name: "Note".to_string(),
            emoji: Some(" ".to_string()),
        },
    ];
    assert_eq!(kind_choices(&odd), vec![(ParticleKind::Text, "Note".to_string())]);
    assert_eq!(kind_choices(&[]).len(), 3);
}

fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id: TagId(id),
        name: name.to_string(),
        color: None,
        user_id: Some("user-1".to_string()),
    }
}

#[test]
fn tag_choices_match_names_case_insensitively() {
    let (_, hook) = setup();
    let mut p = find(&hook, "a");
    let tags = vec![tag(1, "Rust"), tag(2, "rusty tools")];

    assert_eq!(tag_choices(&p, &tags, "  rust "), vec![TagChoice::Apply(tags[0].clone())]);

    p.tags.push(tags[0].clone());
    assert_eq!(tag_choices(&p, &tags, "RUST"), vec![TagChoice::Remove(tags[0].clone())]);

    let choices = tag_choices(&p, &tags, "rus");
    assert_eq!(
        choices[0],
        TagChoice::CreateAndApply {
            name: "rus".to_string()
        }
    );
    assert_eq!(choices.len(), 3);
    assert_eq!(tag_choices(&p, &tags, "").len(), 2);
}

#[test]
fn new_tag_creates_tag_and_join_then_toggle_removes_only_join() {
    let (backend, mut hook) = setup();
    let mut tags = TagsHook::new(tags_query("user-1"));
    tags.mount(&backend);
    let mut log = ToastLog::default();

    let p = find(&hook, "a");
    let choice = tag_choices(&p, tags.data(), "reading").remove(0);
    assert!(apply_tag_choice(&backend, &mut hook, Some(&mut tags), "user-1", &p, &choice, &mut log));
    assert_eq!(backend.rows("tag").len(), 1);
    assert_eq!(backend.rows("particle_tag").len(), 1);
    assert_eq!(tags.data().len(), 1);

    let p = find(&hook, "a");
    assert_eq!(p.tags.len(), 1);
    let choice = tag_choices(&p, tags.data(), "Reading").remove(0);
    assert!(matches!(choice, TagChoice::Remove(_)));
    assert!(apply_tag_choice(&backend, &mut hook, Some(&mut tags), "user-1", &p, &choice, &mut log));
    assert_eq!(backend.rows("tag").len(), 1);
    assert_eq!(backend.rows("particle_tag").len(), 0);
    assert!(find(&hook, "a").tags.is_empty());
}

#[test]
fn failed_join_deletes_the_new_tag_row() {
    let (backend, mut hook) = setup();
    let mut log = ToastLog::default();
    backend.fail_once("insert:particle_tag", "violates foreign key constraint");

    let p = find(&hook, "a");
    let choice = TagChoice::CreateAndApply {
        name: "orphan".to_string(),
    };
    assert!(!apply_tag_choice(&backend, &mut hook, None, "user-1", &p, &choice, &mut log));
    assert!(backend.rows("tag").is_empty());
    assert_eq!(backend.count(|c| *c == Call::Delete("tag".to_string())), 1);
    assert_eq!(log.last().unwrap().title, "violates foreign key constraint");
}
