//! Formatting of messages into history lines.
//!
//! A line is the canonical text of one message. It is both what the
//! generation endpoint sees in a dialog and the key under which the message
//! is stored in a chat history.

use parley_types::message::InboundMessage;

/// Accessors the history needs from a message.
pub trait LineSource: Sync {
    fn text(&self) -> &str;
    fn sender(&self) -> &str;
    /// Order marker carried by the message, if any.
    fn order(&self) -> Option<&str> {
        None
    }
}

impl LineSource for InboundMessage {
    fn text(&self) -> &str {
        &self.text
    }

    fn sender(&self) -> &str {
        &self.sender
    }
}

/// A message together with the order resolved for it.
#[derive(Debug, Clone, Copy)]
pub struct OrderedMessage<'a> {
    pub message: &'a InboundMessage,
    pub order: Option<&'a str>,
}

impl LineSource for OrderedMessage<'_> {
    fn text(&self) -> &str {
        &self.message.text
    }

    fn sender(&self) -> &str {
        &self.message.sender
    }

    fn order(&self) -> Option<&str> {
        self.order
    }
}

/// Format a message into its line.
///
/// - Empty text or empty sender yields the empty string ("no line").
/// - A message whose text ends with its order marker is anonymous: the
///   marker is stripped and the rest is used verbatim.
/// - Otherwise the line is `"<Sender>: <text>"` with a title-cased sender.
pub fn format_line(message: &(impl LineSource + ?Sized)) -> String {
    let text = message.text();
    let sender = message.sender();
    if text.is_empty() || sender.is_empty() {
        return String::new();
    }

    if let Some(stripped) = message
        .order()
        .filter(|order| !order.is_empty())
        .and_then(|order| text.strip_suffix(order))
    {
        return stripped.to_string();
    }

    format!("{}: {text}", title_case(sender))
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// Letters, digits and underscores continue a word, and so do apostrophes
/// and periods inside one. Anything else (spaces, hyphens, slashes) starts
/// a new word: `mary-ann` becomes `Mary-Ann`, `luna_bot` becomes `Luna_bot`.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() || c == '_' {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            if !matches!(c, '\'' | '\u{2019}' | '.' | ':') {
                at_word_start = true;
            }
            result.push(c);
        }
    }
    result
}
