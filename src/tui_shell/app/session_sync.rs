use super::*;

impl App {
    /// Follows the session: the signed-in user's data is mounted, a sign-out
    /// drops it. Runs once per loop turn after the observer raised the flag.
    pub(in crate::tui_shell) fn sync_session(&mut self) {
        if !self.session_changed.swap(false, Ordering::SeqCst) {
            return;
        }

        let backend = self.ctx.client.as_ref();
        match self.auth.user().map(|u| u.id.clone()) {
            Some(uid) => {
                let query = particles_query(&uid);
                if self.particles.is_mounted() && self.particles.query() == &query {
                    return;
                }
                tracing::debug!(user = %uid, "mounting particle data");
                self.particles = ParticlesHook::new(query);
                self.tags = TagsHook::new(tags_query(&uid));
                self.types = TypesHook::new(types_query());
                self.particles.mount(backend);
                self.tags.mount(backend);
                self.types.mount(backend);
                self.selected = 0;
            }
            None => {
                if !self.particles.is_mounted() {
                    return;
                }
                tracing::debug!("session ended; dropping particle data");
                self.particles.teardown();
                self.tags.teardown();
                self.types.teardown();
                self.particles = ParticlesHook::new(particles_query(""));
                self.tags = TagsHook::new(tags_query(""));
                self.types = TypesHook::new(types_query());
                self.selected = 0;
                self.filter = KindFilter::All;
            }
        }
    }

    pub(in crate::tui_shell) fn refresh(&mut self) {
        let backend = self.ctx.client.as_ref();
        self.particles.revalidate(backend);
        self.tags.revalidate(backend);
        self.types.revalidate(backend);
        self.clamp_selection();
        match self.particles.error() {
            Some(err) => {
                let err = err.to_string();
                self.toast(Toast::failure(err));
            }
            None => {
                let n = self.particles.data().len();
                self.toast(Toast::success(format!("Loaded {} particle(s)", n)));
            }
        }
    }
}
