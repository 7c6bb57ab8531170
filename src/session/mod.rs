pub(crate) mod config;
pub(crate) mod engrave_session;
