use serde::{Deserialize, Serialize};

use super::ids::{ParticleId, TagId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub user_id: String,
}

/// Join row linking a particle to a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleTag {
    pub particle_id: ParticleId,
    pub tag_id: TagId,
}
