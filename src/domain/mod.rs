pub mod annotation;
pub mod changelog;
pub mod commit;
pub mod refs;
pub mod version;
