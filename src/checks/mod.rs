pub mod links;
pub mod lists;
pub mod template;

pub use links::{extract_links, LinkChecker, LinkFailure, LinkReport};
pub use lists::{sort_list_file, sort_list_files};
pub use template::check_template_leftovers;
