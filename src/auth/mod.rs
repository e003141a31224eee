//! Authentication module
//!
//! Challenge-response bearer authentication with a client-side cache.
//!
//! The first request to a URL is probed unauthenticated; a 401 carrying a
//! bearer `WWW-Authenticate` challenge is cached for that exact URL, and
//! subsequent requests acquire a token straight from the cached challenge
//! without the extra round trip.

mod authenticator;
mod cache;
mod challenge;
mod provider;

pub use authenticator::{AuthOutcome, ChallengeAuthenticator};
pub use cache::ChallengeCache;
pub use challenge::BearerChallenge;
pub use provider::{FnTokenProvider, StaticTokenProvider, TokenProvider, TokenRequest};
