pub(super) mod login;
pub(super) mod particles;
