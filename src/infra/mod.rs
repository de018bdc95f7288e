pub mod drupal_org;
pub mod gitlab;
pub mod http;
