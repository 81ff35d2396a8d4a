mod browser;
mod catalog;
mod error;
mod favorite;
mod library;
mod rating;
mod share;

pub use browser::*;
pub use catalog::*;
pub use error::*;
pub use favorite::*;
pub use library::*;
pub use rating::*;
pub use share::*;
