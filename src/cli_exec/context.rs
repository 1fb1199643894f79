use particle::hooks::{ParticlesHook, particles_query};
use particle::model::{AuthUser, Particle};

use super::*;

/// An opened client with a signed-in user.
pub(super) struct Signed {
    pub(super) ctx: ClientContext,
    pub(super) user: AuthUser,
}

pub(super) fn open_context() -> Result<ClientContext> {
    ClientContext::open_default()
}

pub(super) fn with_signed_in<F>(f: F) -> Result<()>
where
    F: FnOnce(&Signed) -> Result<()>,
{
    let ctx = open_context()?;
    let auth = ctx.auth_hook();
    if let Some(err) = &auth.context().state().error {
        tracing::warn!(error = %err, "stored session unusable");
    }
    let user = auth
        .user()
        .cloned()
        .context("not signed in (run `particle login`)")?;
    let signed = Signed { ctx, user };
    f(&signed)
}

impl Signed {
    pub(super) fn user_id(&self) -> &str {
        &self.user.id
    }

    /// The signed-in user's particles, fetched once.
    pub(super) fn particles(&self) -> Result<ParticlesHook> {
        let mut hook = ParticlesHook::new(particles_query(self.user_id()));
        hook.mount(self.ctx.client.as_ref());
        if let Some(err) = hook.error() {
            anyhow::bail!("{}", err);
        }
        Ok(hook)
    }

    /// Particle by exact id or unique id prefix.
    pub(super) fn resolve(&self, hook: &ParticlesHook, id: &str) -> Result<Particle> {
        resolve_particle(hook.data(), id)
    }
}

pub(super) fn resolve_particle(particles: &[Particle], id: &str) -> Result<Particle> {
    let id = id.trim();
    if id.is_empty() {
        anyhow::bail!("particle id is empty");
    }
    if let Some(p) = particles.iter().find(|p| p.id.as_str() == id) {
        return Ok(p.clone());
    }
    let matches: Vec<&Particle> = particles
        .iter()
        .filter(|p| p.id.as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => anyhow::bail!("no particle with id {}", id),
        many => anyhow::bail!("ambiguous id prefix {} ({} matches)", id, many.len()),
    }
}

#[cfg(test)]
#[path = "../tests/cli_exec/context_tests.rs"]
mod tests;
