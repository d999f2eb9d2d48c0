pub mod get;
pub mod post;

pub use get::get_all_reviews;
pub use post::create_review;
