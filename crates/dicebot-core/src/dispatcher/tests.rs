//! Tests for the event dispatcher.

use std::sync::Arc;

use super::*;
use crate::testing::{MockGateway, MockPrize};
use crate::types::{DiceEmoji, Player};

const GROUP: i64 = -100_200;
const ADMIN: u64 = 11;
const OTHER_ADMIN: u64 = 12;
const PLAYER: u64 = 99;

fn group() -> ChatContext {
    ChatContext::group(GROUP, "Dice Club")
}

fn command(command: Command, chat: ChatContext, sender: u64) -> CommandEvent {
    CommandEvent {
        command,
        chat,
        sender: Some(UserId(sender)),
    }
}

fn roll(emoji: DiceEmoji, value: u8) -> DiceEvent {
    DiceEvent {
        chat: group(),
        player: Player::new(PLAYER, "Petya").with_username("petya"),
        emoji,
        value,
        message_id: 555,
    }
}

struct Harness {
    gateway: Arc<MockGateway>,
    dispatcher: EventDispatcher,
}

impl Harness {
    fn new(gateway: MockGateway, config: DispatchConfig) -> Self {
        let gateway = Arc::new(gateway);
        let dispatcher =
            EventDispatcher::new(Arc::new(SessionState::new()), gateway.clone(), config);
        Self { gateway, dispatcher }
    }

    fn with_admins() -> Self {
        Self::new(
            MockGateway::new().with_admins(GROUP, &[ADMIN, OTHER_ADMIN]),
            DispatchConfig::default(),
        )
    }

    fn state(&self) -> &SessionState {
        self.dispatcher.state()
    }

    async fn run(&self, cmd: Command, chat: ChatContext, sender: u64) -> CommandOutcome {
        self.dispatcher.handle_command(command(cmd, chat, sender)).await
    }

    /// Enables the bot in the group and selects `mode`.
    async fn enable(&self, mode: GameMode) {
        assert_eq!(self.run(Command::Start, group(), ADMIN).await, CommandOutcome::Applied);
        let cmd = match mode {
            GameMode::Cube => Command::Cube,
            GameMode::Slot => Command::Slot,
        };
        assert_eq!(self.run(cmd, group(), ADMIN).await, CommandOutcome::Applied);
    }

    async fn dice(&self, emoji: DiceEmoji, value: u8) -> DiceOutcome {
        let outcome = self.dispatcher.handle_dice(roll(emoji, value)).await;
        if let DiceOutcome::Win(delivery) = outcome {
            let recipients = delivery.recipients.clone();
            delivery.settle().await;
            return DiceOutcome::Win(Delivery {
                recipients,
                tasks: Vec::new(),
            });
        }
        outcome
    }

    fn recipients(outcome: &DiceOutcome) -> Vec<UserId> {
        match outcome {
            DiceOutcome::Win(delivery) => delivery.recipients.clone(),
            other => panic!("expected a win, got {:?}", other),
        }
    }
}

// Scenario 1
#[tokio::test]
async fn test_admin_start_in_group_enables_bot() {
    let h = Harness::with_admins();

    let outcome = h.run(Command::Start, group(), ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Applied);
    assert!(h.state().is_enabled().await);
    assert!(h.state().is_admin(UserId(ADMIN)).await);
    assert_eq!(h.gateway.sent_to(GROUP), vec![ENABLED_REPLY.to_string()]);
    assert_eq!(h.state().mode(ChatId(GROUP)).await, None);
}

#[tokio::test]
async fn test_start_in_group_applies_configured_start_mode() {
    let h = Harness::new(
        MockGateway::new().with_admins(GROUP, &[ADMIN]),
        DispatchConfig::default().with_start_mode(Some(GameMode::Slot)),
    );

    h.run(Command::Start, group(), ADMIN).await;

    assert_eq!(h.state().mode(ChatId(GROUP)).await, Some(GameMode::Slot));
}

#[tokio::test]
async fn test_non_admin_start_in_group_is_dropped() {
    let h = Harness::with_admins();

    let outcome = h.run(Command::Start, group(), PLAYER).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::NotAdmin));
    assert!(!h.state().is_enabled().await);
    assert!(!h.state().is_admin(UserId(PLAYER)).await);
    assert!(h.gateway.sent().is_empty());
}

#[tokio::test]
async fn test_private_start_registers_sender_regardless_of_flag() {
    let h = Harness::with_admins();

    let outcome = h.run(Command::Start, ChatContext::private(PLAYER as i64), PLAYER).await;

    assert_eq!(outcome, CommandOutcome::Applied);
    assert!(h.state().is_admin(UserId(PLAYER)).await);
    assert!(!h.state().is_enabled().await);
    assert_eq!(h.gateway.sent_to(PLAYER as i64), vec![SUBSCRIBED_REPLY.to_string()]);
    // No admin lookup needed for a private subscription.
    assert_eq!(h.gateway.admin_lookups(), 0);
}

#[tokio::test]
async fn test_private_start_never_touches_modes() {
    let h = Harness::new(
        MockGateway::new().with_admins(GROUP, &[ADMIN]),
        DispatchConfig::default().with_start_mode(Some(GameMode::Cube)),
    );
    h.run(Command::Start, group(), ADMIN).await;
    h.run(Command::Slot, group(), ADMIN).await;

    h.run(Command::Start, ChatContext::private(PLAYER as i64), PLAYER).await;

    assert_eq!(h.state().mode(ChatId(GROUP)).await, Some(GameMode::Slot));
    assert_eq!(h.state().mode(ChatId(PLAYER as i64)).await, None);
}

#[tokio::test]
async fn test_commands_other_than_start_are_inert_while_disabled() {
    let h = Harness::with_admins();

    for cmd in [Command::Off, Command::Cube, Command::Slot] {
        let outcome = h.run(cmd, group(), ADMIN).await;
        assert_eq!(outcome, CommandOutcome::Dropped(DropReason::Disabled), "{:?}", cmd);
    }

    assert!(!h.state().is_enabled().await);
    assert_eq!(h.state().mode(ChatId(GROUP)).await, None);
    assert!(h.gateway.sent().is_empty());
}

// Scenario 2
#[tokio::test]
async fn test_admin_selects_cube_mode() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    let outcome = h.run(Command::Cube, group(), OTHER_ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(h.state().mode(ChatId(GROUP)).await, Some(GameMode::Cube));
    assert_eq!(h.gateway.sent_to(GROUP).last().unwrap(), "🎲 Режим КУБИКА включён");
}

#[tokio::test]
async fn test_admin_selects_slot_mode() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    h.run(Command::Slot, group(), ADMIN).await;

    assert_eq!(h.state().mode(ChatId(GROUP)).await, Some(GameMode::Slot));
    assert_eq!(h.gateway.sent_to(GROUP).last().unwrap(), "🎰 Режим СЛОТА включён");
}

#[tokio::test]
async fn test_mode_commands_in_private_chat_are_dropped() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    let outcome = h.run(Command::Cube, ChatContext::private(ADMIN as i64), ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::PrivateChat));
    assert_eq!(h.state().mode(ChatId(ADMIN as i64)).await, None);
}

#[tokio::test]
async fn test_non_admin_cannot_select_mode() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    let outcome = h.run(Command::Slot, group(), PLAYER).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::NotAdmin));
    assert_eq!(h.state().mode(ChatId(GROUP)).await, None);
}

#[tokio::test]
async fn test_admin_off_disables_bot() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    let outcome = h.run(Command::Off, group(), OTHER_ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Applied);
    assert!(!h.state().is_enabled().await);
    assert_eq!(h.gateway.sent_to(GROUP).last().unwrap(), DISABLED_REPLY);
}

// Scenario 5
#[tokio::test]
async fn test_non_admin_off_is_dropped() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;
    let replies_before = h.gateway.sent().len();

    let outcome = h.run(Command::Off, group(), PLAYER).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::NotAdmin));
    assert!(h.state().is_enabled().await);
    assert_eq!(h.gateway.sent().len(), replies_before);
}

#[tokio::test]
async fn test_off_in_private_chat_is_dropped() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;

    let outcome = h.run(Command::Off, ChatContext::private(ADMIN as i64), ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::PrivateChat));
    assert!(h.state().is_enabled().await);
}

#[tokio::test]
async fn test_failed_admin_lookup_drops_command() {
    let h = Harness::new(
        MockGateway::new().with_admins(GROUP, &[ADMIN]).failing_admin_lookup(),
        DispatchConfig::default(),
    );

    let outcome = h.run(Command::Start, group(), ADMIN).await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::NotAdmin));
    assert!(!h.state().is_enabled().await);
    assert!(h.gateway.sent().is_empty());
}

#[tokio::test]
async fn test_command_without_sender_is_dropped() {
    let h = Harness::with_admins();

    let outcome = h
        .dispatcher
        .handle_command(CommandEvent {
            command: Command::Start,
            chat: group(),
            sender: None,
        })
        .await;

    assert_eq!(outcome, CommandOutcome::Dropped(DropReason::NoSender));
    assert_eq!(h.gateway.admin_lookups(), 0);
}

#[tokio::test]
async fn test_admin_rights_are_checked_on_every_command() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;
    h.run(Command::Cube, group(), ADMIN).await;
    h.run(Command::Slot, group(), ADMIN).await;

    assert_eq!(h.gateway.admin_lookups(), 3);
}

#[tokio::test]
async fn test_dice_ignored_while_disabled() {
    let h = Harness::with_admins();
    h.enable(GameMode::Cube).await;
    h.run(Command::Off, group(), ADMIN).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;

    assert!(matches!(outcome, DiceOutcome::Ignored(IgnoreReason::Disabled)));
}

#[tokio::test]
async fn test_dice_without_mode_never_notifies() {
    let h = Harness::with_admins();
    h.run(Command::Start, group(), ADMIN).await;
    let replies_before = h.gateway.sent().len();

    for (emoji, value) in [(DiceEmoji::Die, 6), (DiceEmoji::SlotMachine, 64)] {
        let outcome = h.dice(emoji, value).await;
        assert!(matches!(outcome, DiceOutcome::Ignored(IgnoreReason::NoMode)));
    }
    assert_eq!(h.gateway.sent().len(), replies_before);
}

#[tokio::test]
async fn test_mismatched_emoji_never_notifies() {
    let h = Harness::with_admins();
    h.enable(GameMode::Slot).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;
    assert!(matches!(outcome, DiceOutcome::Ignored(IgnoreReason::EmojiMismatch)));

    let outcome = h.dice(DiceEmoji::Darts, 64).await;
    assert!(matches!(outcome, DiceOutcome::Ignored(IgnoreReason::EmojiMismatch)));
    assert!(h.gateway.sent_to(ADMIN as i64).is_empty());
}

// Scenario 3
#[tokio::test]
async fn test_cube_six_notifies_registered_admins() {
    let h = Harness::with_admins();
    h.enable(GameMode::Cube).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;

    assert_eq!(Harness::recipients(&outcome), vec![UserId(ADMIN)]);
    let messages = h.gateway.sent_to(ADMIN as i64);
    assert_eq!(messages.len(), 1);
    let text = &messages[0];
    assert!(text.contains("\"Dice Club\""));
    assert!(text.contains("Игрок Petya выбил 6"));
    assert!(text.contains("https://t.me/petya"));
    assert!(text.contains(&format!("tg://openmessage?chat_id={}", GROUP)));
    assert!(text.contains(&format!("tg://openmessage?chat_id={}&message_id=555", GROUP)));
    // OTHER_ADMIN is a chat admin but never registered.
    assert!(h.gateway.sent_to(OTHER_ADMIN as i64).is_empty());
}

// Scenario 4
#[tokio::test]
async fn test_cube_values_below_six_do_nothing() {
    let h = Harness::with_admins();
    h.enable(GameMode::Cube).await;
    let sent_before = h.gateway.sent().len();

    for value in 1..=5 {
        assert!(matches!(h.dice(DiceEmoji::Die, value).await, DiceOutcome::Miss));
    }
    assert_eq!(h.gateway.sent().len(), sent_before);
}

#[tokio::test]
async fn test_slot_only_wins_on_jackpot() {
    let h = Harness::with_admins();
    h.enable(GameMode::Slot).await;

    assert!(matches!(h.dice(DiceEmoji::SlotMachine, 1).await, DiceOutcome::Miss));
    assert!(matches!(h.dice(DiceEmoji::SlotMachine, 63).await, DiceOutcome::Miss));
    assert!(h.dice(DiceEmoji::SlotMachine, 64).await.is_win());

    let messages = h.gateway.sent_to(ADMIN as i64);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("🎰 Игрок Petya выбил 777"));
}

#[tokio::test]
async fn test_chat_admin_policy_skips_registered_non_admins() {
    let h = Harness::with_admins();
    h.enable(GameMode::Cube).await;
    // Registered privately, but not an admin of GROUP.
    h.run(Command::Start, ChatContext::private(PLAYER as i64), PLAYER).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;

    assert_eq!(Harness::recipients(&outcome), vec![UserId(ADMIN)]);
    assert_eq!(h.gateway.sent_to(PLAYER as i64), vec![SUBSCRIBED_REPLY.to_string()]);
}

#[tokio::test]
async fn test_all_admins_policy_notifies_every_registered_user() {
    let h = Harness::new(
        MockGateway::new().with_admins(GROUP, &[ADMIN]),
        DispatchConfig::default().with_audience(AudiencePolicy::AllAdmins),
    );
    h.enable(GameMode::Cube).await;
    h.run(Command::Start, ChatContext::private(PLAYER as i64), PLAYER).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;

    assert_eq!(Harness::recipients(&outcome), vec![UserId(ADMIN), UserId(PLAYER)]);
    assert_eq!(h.gateway.sent_to(PLAYER as i64).len(), 2);
}

#[tokio::test]
async fn test_chat_admin_policy_fails_closed_when_lookup_fails() {
    let gateway = Arc::new(MockGateway::new().failing_admin_lookup());
    let state = Arc::new(SessionState::new());
    state.set_enabled(true).await;
    state.set_mode(ChatId(GROUP), GameMode::Cube).await;
    state.add_admin(UserId(ADMIN)).await;
    let dispatcher = EventDispatcher::new(state, gateway.clone(), DispatchConfig::default());

    let outcome = dispatcher.handle_dice(roll(DiceEmoji::Die, 6)).await;

    assert!(Harness::recipients(&outcome).is_empty());
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn test_failed_send_does_not_block_other_recipients() {
    let h = Harness::new(
        MockGateway::new()
            .with_admins(GROUP, &[ADMIN, OTHER_ADMIN])
            .unreachable(ADMIN as i64),
        DispatchConfig::default(),
    );
    h.enable(GameMode::Cube).await;
    h.run(Command::Start, ChatContext::private(OTHER_ADMIN as i64), OTHER_ADMIN).await;

    let outcome = h.dice(DiceEmoji::Die, 6).await;

    assert_eq!(
        Harness::recipients(&outcome),
        vec![UserId(ADMIN), UserId(OTHER_ADMIN)]
    );
    let delivered = h.gateway.sent_to(OTHER_ADMIN as i64);
    assert_eq!(delivered.len(), 2);
    assert!(delivered[1].starts_with("🚨"));
}

// Scenario 6
#[tokio::test]
async fn test_slot_jackpot_issues_prize_and_notifies() {
    let gateway = Arc::new(MockGateway::new().with_admins(GROUP, &[ADMIN]));
    let prize = Arc::new(MockPrize::new());
    let dispatcher = EventDispatcher::new(
        Arc::new(SessionState::new()),
        gateway.clone(),
        DispatchConfig::default(),
    )
    .with_prize_issuer(prize.clone());
    dispatcher.handle_command(command(Command::Start, group(), ADMIN)).await;
    dispatcher.handle_command(command(Command::Slot, group(), ADMIN)).await;

    match dispatcher.handle_dice(roll(DiceEmoji::SlotMachine, 64)).await {
        DiceOutcome::Win(delivery) => delivery.settle().await,
        other => panic!("expected a win, got {:?}", other),
    }

    assert_eq!(prize.issued(), vec![UserId(PLAYER)]);
    assert_eq!(gateway.sent_to(ADMIN as i64).len(), 1);
}

#[tokio::test]
async fn test_prize_outage_does_not_stop_notification() {
    let gateway = Arc::new(MockGateway::new().with_admins(GROUP, &[ADMIN]));
    let dispatcher = EventDispatcher::new(
        Arc::new(SessionState::new()),
        gateway.clone(),
        DispatchConfig::default(),
    )
    .with_prize_issuer(Arc::new(MockPrize::down()));
    dispatcher.handle_command(command(Command::Start, group(), ADMIN)).await;
    dispatcher.handle_command(command(Command::Slot, group(), ADMIN)).await;

    match dispatcher.handle_dice(roll(DiceEmoji::SlotMachine, 64)).await {
        DiceOutcome::Win(delivery) => delivery.settle().await,
        other => panic!("expected a win, got {:?}", other),
    }

    assert_eq!(gateway.sent_to(ADMIN as i64).len(), 1);
    assert!(dispatcher.state().is_enabled().await);
}

#[tokio::test]
async fn test_cube_win_does_not_issue_prize() {
    let gateway = Arc::new(MockGateway::new().with_admins(GROUP, &[ADMIN]));
    let prize = Arc::new(MockPrize::new());
    let dispatcher = EventDispatcher::new(
        Arc::new(SessionState::new()),
        gateway.clone(),
        DispatchConfig::default(),
    )
    .with_prize_issuer(prize.clone());
    dispatcher.handle_command(command(Command::Start, group(), ADMIN)).await;
    dispatcher.handle_command(command(Command::Cube, group(), ADMIN)).await;

    match dispatcher.handle_dice(roll(DiceEmoji::Die, 6)).await {
        DiceOutcome::Win(delivery) => delivery.settle().await,
        other => panic!("expected a win, got {:?}", other),
    }

    assert!(prize.issued().is_empty());
}
