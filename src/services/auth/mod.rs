pub mod claims;
pub mod factory;
pub mod introspection;
pub mod jwt;
pub mod verifier;

pub use claims::Claims;
pub use factory::build_token_verifier;
pub use verifier::{NoopVerifier, TokenVerifier, VerifyError};
