mod config;
mod ids;
mod particle;
mod session;
mod tag;

pub use self::config::{CONFIG_VERSION, ClientConfig, ClientState, CompletionConfig, OAuthConfig};
pub use self::ids::{ParticleId, TagId};
pub use self::particle::{NewParticle, Particle, ParticleBody, ParticleKind, TypeRow};
pub use self::session::{AUTHENTICATED_AUDIENCE, AuthSession, AuthUser, Profile};
pub use self::tag::{NewTag, ParticleTag, Tag};

#[cfg(test)]
#[path = "tests/model/particle_tests.rs"]
mod tests;
