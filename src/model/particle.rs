use serde::{Deserialize, Serialize};

use super::ids::ParticleId;
use super::tag::Tag;

/// The three well-known rows of the `type` relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Link,
    Image,
    Text,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [ParticleKind::Link, ParticleKind::Image, ParticleKind::Text];

    pub fn id(self) -> i64 {
        match self {
            ParticleKind::Link => 1,
            ParticleKind::Image => 2,
            ParticleKind::Text => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(ParticleKind::Link),
            2 => Some(ParticleKind::Image),
            3 => Some(ParticleKind::Text),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleKind::Link => "Link",
            ParticleKind::Image => "Image",
            ParticleKind::Text => "Text",
        }
    }

    /// Parses a user-supplied kind: a type name (any case) or its numeric id.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Self::from_id(id);
        }
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A row of the read-only `type` relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRow {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl TypeRow {
    pub fn kind(&self) -> Option<ParticleKind> {
        ParticleKind::from_id(self.id)
    }

    /// Display name, prefixed with the emoji when the row has one.
    pub fn label(&self) -> String {
        match self.emoji.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(emoji) => format!("{} {}", emoji, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,

    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub type_id: i64,

    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_trashed: bool,

    /// Embedded through `particle_tag` when the query selects `tag(*)`.
    #[serde(default, rename = "tag", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Particle content interpreted according to its type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParticleBody<'a> {
    Link(&'a str),
    Image { key: &'a str },
    Text(&'a str),
}

impl Particle {
    pub fn kind(&self) -> Option<ParticleKind> {
        ParticleKind::from_id(self.type_id)
    }

    pub fn body(&self) -> anyhow::Result<ParticleBody<'_>> {
        let kind = self
            .kind()
            .ok_or_else(|| anyhow::anyhow!("particle {} has unknown type {}", self.id, self.type_id))?;
        Ok(match kind {
            ParticleKind::Link => ParticleBody::Link(&self.content),
            ParticleKind::Image => ParticleBody::Image { key: &self.content },
            ParticleKind::Text => ParticleBody::Text(&self.content),
        })
    }

    /// Title when present, otherwise the raw content.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.content,
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t.id == tag.id)
    }
}

/// Insert payload for the `particle` relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewParticle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_id: i64,
    pub is_public: bool,
    pub user_id: String,
}
