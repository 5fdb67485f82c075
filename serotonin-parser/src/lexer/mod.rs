mod errors;
mod lex;
mod span;
mod token;

pub use errors::TokenizerError;
pub use lex::{lex, BF_INSTRUCTIONS};
pub use span::Span;
pub use token::Token;
pub use token::TokenData;
pub use token::TokenKind;
