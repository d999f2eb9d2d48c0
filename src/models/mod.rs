pub mod comment;
pub mod post;
pub mod review;
pub mod user;

pub use comment::Comment;
pub use post::Post;
pub use review::BookReview;
pub use user::User;
