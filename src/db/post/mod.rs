pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub use delete::delete_post;
pub use get::{get_all_posts, get_post};
pub use post::create_post;
pub use put::update_post;
