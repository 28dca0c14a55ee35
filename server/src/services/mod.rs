// server/src/services/mod.rs

//! Outbound integrations. Handlers only see the `ChatModel` and `TokenVerifier` traits;
//! the Gemini and Otpless clients are wired in at startup.

pub mod chat_service;
pub mod prompt;
pub mod verification_service;

pub use chat_service::{ChatError, ChatModel, GeminiChatModel};
pub use verification_service::{OtplessVerifier, TokenVerifier, Verification, VerificationError, VerifiedUser};
