pub(crate) mod common;

mod verdict;
