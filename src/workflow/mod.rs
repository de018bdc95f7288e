pub mod changelog;
pub mod refs;
