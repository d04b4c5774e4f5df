use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};
use tracing::{error, info, warn};

use crate::engine::{Engine, Reply};

/// Maximum Telegram message length; longer replies are split.
const MAX_MESSAGE_LEN: usize = 4096;

/// Thin adapter between Telegram long polling and the engine: extracts
/// (user id, text), forwards to [`Engine::handle`], renders the reply.
pub struct TelegramChannel {
    bot: Bot,
    engine: Arc<Engine>,
}

impl TelegramChannel {
    pub fn new(bot_token: &str, engine: Arc<Engine>) -> Self {
        Self {
            bot: Bot::new(bot_token),
            engine,
        }
    }

    /// Run the dispatcher, restarting on crash with exponential backoff:
    /// 5s doubling to a 60s cap, reset after a stable run (60s+).
    pub async fn start_with_retry(self: Arc<Self>) {
        let initial_backoff = Duration::from_secs(5);
        let max_backoff = Duration::from_secs(60);
        let stable_threshold = Duration::from_secs(60);
        let mut backoff = initial_backoff;

        loop {
            info!("Starting Telegram dispatcher");
            let started = tokio::time::Instant::now();
            self.clone().start().await;
            let ran_for = started.elapsed();

            if ran_for >= stable_threshold {
                backoff = initial_backoff;
            }

            warn!(
                backoff_secs = backoff.as_secs(),
                ran_for_secs = ran_for.as_secs(),
                "Telegram dispatcher stopped, restarting"
            );
            tokio::time::sleep(backoff).await;
            backoff = std::cmp::min(backoff * 2, max_backoff);
        }
    }

    pub async fn start(self: Arc<Self>) {
        let handler = dptree::entry().branch(Update::filter_message().endpoint({
            let channel = Arc::clone(&self);
            move |msg: Message, bot: Bot| {
                let channel = Arc::clone(&channel);
                async move {
                    channel.handle_message(msg, bot).await;
                    respond(())
                }
            }
        }));

        Dispatcher::builder(self.bot.clone(), handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_message(&self, msg: Message, bot: Bot) {
        let Some(text) = msg.text() else {
            let _ = bot
                .send_message(msg.chat.id, "I can only process text messages.")
                .await;
            return;
        };

        // Stable per-user identity; chat id covers the (rare) case of a
        // message without a sender.
        let user_id = msg
            .from()
            .map(|u| u.id.0.to_string())
            .unwrap_or_else(|| msg.chat.id.to_string());

        let reply = self.engine.handle(&user_id, text).await;
        self.send_reply(&bot, msg.chat.id, reply).await;
    }

    async fn send_reply(&self, bot: &Bot, chat_id: ChatId, reply: Reply) {
        let markup = reply.keyboard.map(|rows| {
            let keyboard = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect())
                .collect::<Vec<Vec<_>>>();
            ReplyMarkup::Keyboard(KeyboardMarkup::new(keyboard).resize_keyboard(true))
        });

        let chunks = split_message(&reply.text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.into_iter().enumerate() {
            // Keyboard rides on the final chunk only.
            let request = bot.send_message(chat_id, chunk);
            let request = match (&markup, i == last) {
                (Some(markup), true) => request.reply_markup(markup.clone()),
                _ => request,
            };
            if let Err(e) = request.await {
                error!(chat_id = chat_id.0, "Failed to send message: {}", e);
                return;
            }
        }
    }
}

/// Split a message into chunks no longer than `max_len` characters,
/// preferring newline boundaries. Always returns at least one chunk.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.split_inclusive('\n') {
        let line_chars = line.chars().count();
        if current_chars + line_chars > max_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if line_chars > max_len {
            // A single oversized line is split mid-line.
            let mut buf = String::new();
            let mut buf_chars = 0;
            for c in line.chars() {
                if buf_chars == max_len {
                    chunks.push(std::mem::take(&mut buf));
                    buf_chars = 0;
                }
                buf.push(c);
                buf_chars += 1;
            }
            current = buf;
            current_chars = buf_chars;
        } else {
            current.push_str(line);
            current_chars += line_chars;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_one_chunk() {
        assert_eq!(split_message("hello", 4096), vec!["hello".to_string()]);
    }

    #[test]
    fn long_messages_split_on_newlines() {
        let text = format!("{}\n{}", "a".repeat(30), "b".repeat(30));
        let chunks = split_message(&text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with('a'));
        assert!(chunks[1].starts_with('b'));
    }

    #[test]
    fn oversized_single_line_is_hard_split() {
        let text = "x".repeat(100);
        let chunks = split_message(&text, 40);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn empty_text_is_one_empty_chunk() {
        assert_eq!(split_message("", 4096), vec![String::new()]);
    }
}
