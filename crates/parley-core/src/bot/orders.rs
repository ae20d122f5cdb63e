//! Order resolution and the admin allow-list.
//!
//! An order is a trailing marker (e.g. `!poem`) that selects an alternate
//! settings file for the bot and makes the message anonymous in history.
//! Orders are only honored for senders on the admin allow-list.

use std::path::{Path, PathBuf};

use parley_types::message::{ChatKind, InboundMessage};

/// The first configured order marker that `text` ends with.
pub fn resolve_order<'a>(text: &str, orders: &'a [String]) -> Option<&'a str> {
    orders
        .iter()
        .map(String::as_str)
        .find(|order| !order.is_empty() && text.ends_with(order))
}

/// Settings file for `bot`, optionally specialized by `order`.
///
/// `<dir>/<bot><order>.json`, e.g. `confs/luna_bot!poem.json`.
pub fn settings_path(dir: &Path, bot: &str, order: Option<&str>) -> PathBuf {
    dir.join(format!("{bot}{}.json", order.unwrap_or_default()))
}

/// Whether `message` asks `bot` for a reply.
///
/// - With an order: only when the sender is an admin.
/// - Without one: in private chats, in replies to the bot, or when the bot
///   is mentioned as `@<bot>`.
pub fn is_asked(message: &InboundMessage, order: Option<&str>, bot: &str, admins: &[String]) -> bool {
    if order.is_some() {
        return admins.iter().any(|admin| admin == &message.sender);
    }

    message.chat_kind == ChatKind::Private
        || message.replies_to(bot)
        || message.text.contains(&format!("@{bot}"))
}
