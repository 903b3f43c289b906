pub(crate) mod board;
pub(crate) mod grid;
pub(crate) mod matcher;
pub(crate) mod randomizer;
