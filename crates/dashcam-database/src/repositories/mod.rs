//! PostgreSQL implementations of the store traits.

pub mod account;
pub mod share;
pub mod token;
pub mod video;

pub use account::AccountRepository;
pub use share::ShareRepository;
pub use token::TokenRepository;
pub use video::VideoRepository;
