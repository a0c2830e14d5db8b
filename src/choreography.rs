pub(crate) mod hero_about;
pub(crate) mod stage;
