pub(crate) mod colors;
pub(crate) mod constants;

pub(crate) use colors::*;
pub(crate) use constants::*;
