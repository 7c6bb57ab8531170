pub(crate) mod block_glyphs;
pub(crate) mod engraver;
pub(crate) mod fit;
pub(crate) mod layout;
pub(crate) mod metrics;
pub(crate) mod parley_glyphs;
