use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{debug, warn};

use common::{Delivery, NotificationSink};

/// Posts notifications to a single Telegram chat or channel.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// `channel` is a numeric chat id (e.g. `-1001234567890`) or a public
    /// channel username, with or without the leading `@`.
    pub fn new(token: impl Into<String>, channel: &str) -> Self {
        Self::from_bot(Bot::new(token), channel)
    }

    pub fn from_bot(bot: Bot, channel: &str) -> Self {
        Self {
            bot,
            recipient: parse_recipient(channel),
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Delivery {
        match self.bot.send_message(self.recipient.clone(), text).await {
            Ok(_) => {
                debug!(recipient = ?self.recipient, "Telegram notification delivered");
                Delivery::Acknowledged
            }
            Err(e) => {
                warn!(recipient = ?self.recipient, error = %e, "Failed to send Telegram notification");
                Delivery::Failed
            }
        }
    }
}

fn parse_recipient(channel: &str) -> Recipient {
    let channel = channel.trim();
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel.starts_with('@') => Recipient::ChannelUsername(channel.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{channel}")),
    }
}
