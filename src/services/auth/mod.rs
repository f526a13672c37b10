pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod local;
pub mod principal;
pub mod strategy;
pub mod token_codec;

pub use dispatcher::AuthenticationDispatcher;
pub use error::AuthError;
pub use local::{LOCAL_AUTH_TYPE, LocalAuthenticationStrategy};
pub use principal::{AuthenticatedPrincipal, Credential};
pub use strategy::AuthenticationStrategy;
pub use token_codec::{IssuedToken, TokenClaims, TokenCodec, TokenError};
