pub mod challenge;
pub mod response;
pub mod token;

pub use challenge::ChallengeVerdict;
pub use response::LookupResponse;
pub use token::OnepassToken;
