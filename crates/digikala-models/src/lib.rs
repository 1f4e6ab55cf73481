pub mod comment;
pub mod product;
pub mod purchase;

pub use comment::CommentRecord;
pub use product::ProductId;
pub use purchase::PurchaseStatus;
