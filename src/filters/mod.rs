pub(crate) mod blend;
pub(crate) mod capability;
pub(crate) mod engine;
pub(crate) mod kernel;
pub(crate) mod point;
pub(crate) mod tone;
pub(crate) mod unsharp;
