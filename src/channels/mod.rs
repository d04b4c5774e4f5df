//! Messaging-surface adapters. Telegram is the only surface; everything
//! behind [`crate::engine::Engine`] is channel-agnostic.

mod telegram;

pub use telegram::TelegramChannel;
