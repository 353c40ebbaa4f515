mod extract;
mod sanitize;

pub use extract::{extract_body, NO_CONTENT};
pub use sanitize::sanitize;
