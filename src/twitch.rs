//! Anonymous Twitch IRC transport.
//!
//! Joins one channel as a `justinfan` guest and hands every `PRIVMSG` to a
//! [`ChatHandler`] in delivery order. Reconnects are handled inside
//! `twitch-irc`; anything it cannot recover from ends the session.

use crate::core::event::{BadgeLevels, ChatEvent};
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, info};
use twitch_irc::login::StaticLoginCredentials;
use twitch_irc::message::{NoticeMessage, PrivmsgMessage, ServerMessage};
use twitch_irc::{ClientConfig, SecureTCPTransport, TwitchIRCClient};

/// NOTICE ids Twitch sends when a join is refused.
const JOIN_REJECTION_IDS: &[&str] = &[
    "msg_channel_suspended",
    "msg_channel_blocked",
    "msg_banned",
    "msg_room_not_found",
    "tos_ban",
];

pub trait ChatHandler {
    fn handle(&mut self, event: ChatEvent);
}

impl<F: FnMut(ChatEvent)> ChatHandler for F {
    fn handle(&mut self, event: ChatEvent) {
        self(event)
    }
}

#[derive(Debug)]
pub enum TransportError {
    InvalidChannel { channel: String, reason: String },
    JoinRejected { channel: String, notice: String },
    Disconnected { channel: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidChannel { channel, reason } => {
                write!(f, "invalid channel name '{channel}': {reason}")
            }
            TransportError::JoinRejected { channel, notice } => {
                write!(f, "could not join '{channel}': {notice}")
            }
            TransportError::Disconnected { channel } => {
                write!(f, "connection to '{channel}' closed")
            }
        }
    }
}

impl StdError for TransportError {}

/// `#Shroud ` -> `shroud`
pub fn normalize_channel(channel: &str) -> String {
    channel.trim().trim_start_matches('#').to_lowercase()
}

/// Connect anonymously, join `channel` and feed `handler` until the
/// connection is lost or the join is refused.
pub async fn run<H: ChatHandler>(channel: &str, handler: &mut H) -> Result<(), TransportError> {
    let channel = normalize_channel(channel);
    let config = ClientConfig::default();
    let (mut incoming_messages, client) =
        TwitchIRCClient::<SecureTCPTransport, StaticLoginCredentials>::new(config);

    client
        .join(channel.clone())
        .map_err(|err| TransportError::InvalidChannel {
            channel: channel.clone(),
            reason: err.to_string(),
        })?;
    info!(channel = %channel, "join requested");

    while let Some(message) = incoming_messages.recv().await {
        match message {
            ServerMessage::Privmsg(msg) => handler.handle(event_from_privmsg(msg)),
            ServerMessage::Notice(notice) => {
                if let Some(err) = join_rejection(&channel, &notice) {
                    return Err(err);
                }
                debug!(notice = %notice.message_text, "ignoring notice");
            }
            ServerMessage::Join(join) => debug!(channel = %join.channel_login, "joined"),
            _ => {}
        }
    }

    Err(TransportError::Disconnected { channel })
}

fn join_rejection(channel: &str, notice: &NoticeMessage) -> Option<TransportError> {
    let id = notice.message_id.as_deref()?;
    is_join_rejection(id).then(|| TransportError::JoinRejected {
        channel: channel.to_string(),
        notice: notice.message_text.clone(),
    })
}

pub fn is_join_rejection(message_id: &str) -> bool {
    JOIN_REJECTION_IDS.contains(&message_id)
}

pub fn event_from_privmsg(msg: PrivmsgMessage) -> ChatEvent {
    let first_message = msg
        .source
        .tags
        .0
        .get("first-msg")
        .and_then(|value| value.as_deref())
        == Some("1");

    let badges: BadgeLevels = msg
        .badges
        .iter()
        .map(|badge| (badge.name.clone(), badge_level(&badge.version)))
        .collect();

    ChatEvent {
        id: msg.message_id,
        channel: msg.channel_login,
        sender_login: msg.sender.login,
        display_name: msg.sender.name,
        color: msg
            .name_color
            .map(|c| format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)),
        badges,
        message: msg.message_text,
        first_message,
        is_action: msg.is_action,
        sent_at: Some(msg.server_timestamp.to_rfc3339()),
    }
}

/// Badge versions are usually numeric (`subscriber/12`); anything else
/// counts as level 0 and is not displayed.
fn badge_level(version: &str) -> i64 {
    version.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twitch_irc::message::IRCMessage;

    fn privmsg(raw: &str) -> PrivmsgMessage {
        let irc = IRCMessage::parse(raw).expect("valid IRC line");
        PrivmsgMessage::try_from(irc).expect("valid PRIVMSG")
    }

    const FIRST_TIMER: &str = "@badge-info=subscriber/14;badges=moderator/1,subscriber/12,predictions/blue-1;color=#0000FF;display-name=JuN1oRRRR;emotes=;first-msg=1;flags=;id=e9d998c3-36f1-430f-89ec-6b887c28af36;mod=1;room-id=11148817;subscriber=1;tmi-sent-ts=1594545155039;turbo=0;user-id=29803735;user-type=mod :jun1orrrr!jun1orrrr@jun1orrrr.tmi.twitch.tv PRIVMSG #pajlada :dank cam";

    const REGULAR: &str = "@badge-info=;badges=;color=;display-name=Ann;emotes=;flags=;id=1b2c3d4e-0000-0000-0000-000000000000;mod=0;room-id=11148817;subscriber=0;tmi-sent-ts=1594545155039;turbo=0;user-id=12345;user-type= :ann!ann@ann.tmi.twitch.tv PRIVMSG #pajlada :\u{1}ACTION waves\u{1}";

    #[test]
    fn converts_privmsg_fields() {
        let event = event_from_privmsg(privmsg(FIRST_TIMER));

        assert_eq!(event.display_name, "JuN1oRRRR");
        assert_eq!(event.sender_login, "jun1orrrr");
        assert_eq!(event.channel, "pajlada");
        assert_eq!(event.message, "dank cam");
        assert_eq!(event.color.as_deref(), Some("#0000FF"));
        assert_eq!(event.id, "e9d998c3-36f1-430f-89ec-6b887c28af36");
        assert!(event.first_message);
        assert!(!event.is_action);
        assert!(event.sent_at.is_some());
        assert_eq!(
            event.badges.iter().collect::<Vec<_>>(),
            vec![("moderator", 1), ("subscriber", 12), ("predictions", 0)]
        );
    }

    #[test]
    fn missing_color_and_first_flag() {
        let event = event_from_privmsg(privmsg(REGULAR));

        assert_eq!(event.display_name, "Ann");
        assert_eq!(event.color, None);
        assert!(!event.first_message);
        assert!(event.badges.is_empty());
        assert!(event.is_action);
        assert_eq!(event.message, "waves");
    }

    #[test]
    fn channel_names_are_normalized() {
        assert_eq!(normalize_channel("  #Shroud "), "shroud");
        assert_eq!(normalize_channel("xqc"), "xqc");
    }

    #[test]
    fn recognizes_join_rejections() {
        assert!(is_join_rejection("msg_channel_suspended"));
        assert!(is_join_rejection("msg_banned"));
        assert!(!is_join_rejection("msg_slowmode"));
    }

    fn notice(raw: &str) -> NoticeMessage {
        let irc = IRCMessage::parse(raw).expect("valid IRC line");
        NoticeMessage::try_from(irc).expect("valid NOTICE")
    }

    #[test]
    fn suspended_channel_notice_is_fatal() {
        let msg = notice(
            "@msg-id=msg_channel_suspended :tmi.twitch.tv NOTICE #foo :This channel has been suspended.",
        );
        match join_rejection("foo", &msg) {
            Some(TransportError::JoinRejected { channel, notice }) => {
                assert_eq!(channel, "foo");
                assert_eq!(notice, "This channel has been suspended.");
            }
            other => panic!("expected a join rejection, got {other:?}"),
        }
    }

    #[test]
    fn other_notices_are_ignored() {
        let slowmode = notice(
            "@msg-id=msg_slowmode :tmi.twitch.tv NOTICE #foo :This room is in slow mode.",
        );
        assert!(join_rejection("foo", &slowmode).is_none());

        let untagged = notice(":tmi.twitch.tv NOTICE #foo :Login unsuccessful");
        assert!(untagged.message_id.is_none());
        assert!(join_rejection("foo", &untagged).is_none());
    }

    #[test]
    fn closures_are_handlers() {
        let mut seen = Vec::new();
        {
            let mut handler = |event: ChatEvent| seen.push(event.display_name);
            handler.handle(ChatEvent::new("Bob", "hi"));
        }
        assert_eq!(seen, vec!["Bob".to_string()]);
    }
}
