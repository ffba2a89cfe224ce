//! Conversion of teloxide messages into dispatcher events.

use dicebot_core::{
    ChatContext, ChatId, ChatKind, Command, CommandEvent, DiceEmoji, DiceEvent, Player, UserId,
};
use teloxide::types as tg;

pub fn chat_context(chat: &tg::Chat) -> ChatContext {
    ChatContext {
        id: ChatId(chat.id.0),
        kind: if chat.is_private() {
            ChatKind::Private
        } else {
            ChatKind::Group
        },
        title: chat.title().map(str::to_owned),
        username: chat.username().map(str::to_owned),
    }
}

pub fn player(user: &tg::User) -> Player {
    Player {
        id: UserId(user.id.0),
        first_name: user.first_name.clone(),
        username: user.username.clone(),
    }
}

pub fn dice_emoji(emoji: &tg::DiceEmoji) -> DiceEmoji {
    match emoji {
        tg::DiceEmoji::Dice => DiceEmoji::Die,
        tg::DiceEmoji::SlotMachine => DiceEmoji::SlotMachine,
        tg::DiceEmoji::Darts => DiceEmoji::Darts,
        tg::DiceEmoji::Basketball => DiceEmoji::Basketball,
        tg::DiceEmoji::Football => DiceEmoji::Football,
        tg::DiceEmoji::Bowling => DiceEmoji::Bowling,
    }
}

/// Parses a bot command from a text message.
///
/// `bot_username` filters out commands addressed to other bots
/// (`/start@OtherBot`).
pub fn parse_command(msg: &tg::Message, bot_username: Option<&str>) -> Option<Command> {
    Command::parse(msg.text()?, bot_username)
}

pub fn command_event(msg: &tg::Message, command: Command) -> CommandEvent {
    CommandEvent {
        command,
        chat: chat_context(&msg.chat),
        sender: msg.from.as_ref().map(|u| UserId(u.id.0)),
    }
}

/// Builds a dice event. Dice without a sender are skipped.
pub fn dice_event(msg: &tg::Message) -> Option<DiceEvent> {
    let dice = msg.dice()?;
    let user = msg.from.as_ref()?;
    Some(DiceEvent {
        chat: chat_context(&msg.chat),
        player: player(user),
        emoji: dice_emoji(&dice.emoji),
        value: dice.value,
        message_id: msg.id.0,
    })
}
