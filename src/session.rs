//! A running game: the aggregate, its engine, and its notification queues.
//!
//! `Session` is the only place that appends to a game's log. An action is
//! recorded after the engine accepts it and never otherwise, so the log
//! always replays to the engine's current state.
//!
//! ## Queues
//!
//! - one game-wide message queue: creation notice and every outcome
//! - one chat queue per player: every chat line, from anyone
//!
//! Both are bounded by [`SessionConfig`] and drop their oldest entry when
//! full.

use tracing::{debug, info, warn};

use crate::core::{Action, GameState, Player, PlayerId, Seat, SeatMap, SessionConfig};
use crate::engine::{replay, Game, GameEngine};
use crate::error::{GameError, Result};
use crate::notify::{BoundedQueue, ChatMessage, Notification};

/// One live game.
///
/// ```
/// use turnworks::core::{Action, GameSetup, Player, PlayerId, SessionConfig};
/// use turnworks::games::tally::TallyEngine;
/// use turnworks::session::Session;
///
/// let game = GameSetup::builder()
///     .id("g-1")
///     .name("Tally")
///     .player(Player::new("A", "Allen"))
///     .player(Player::new("B", "Bob"))
///     .seed(1)
///     .build()
///     .unwrap()
///     .into_game();
///
/// let mut session =
///     Session::start(game, Box::new(TallyEngine::new()), &SessionConfig::default()).unwrap();
/// session.perform(&PlayerId::new("A"), Action::new("P")).unwrap();
///
/// assert_eq!(session.game().len(), 1);
/// assert_eq!(session.poll_message().unwrap().body(), "Created game Tally...");
/// ```
#[derive(Debug)]
pub struct Session {
    game: Game,
    engine: Box<dyn GameEngine>,
    state: GameState,
    messages: BoundedQueue<Notification>,
    chats: SeatMap<BoundedQueue<ChatMessage>>,
}

impl Session {
    /// Start a new game. The game's log must be empty.
    pub fn start(game: Game, mut engine: Box<dyn GameEngine>, config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        if !game.is_empty() {
            return Err(GameError::config(format!(
                "game {} already has {} actions; restore it instead",
                game.id(),
                game.len()
            )));
        }
        let setup = game.setup();
        setup.validate()?;

        let state = engine.start(&setup)?;
        let mut session = Self::assemble(game, engine, state, config);
        session.announce(format!("Created game {}...", session.game.name()));
        let outcome = session.state.outcome.text.clone();
        session.announce(outcome);

        info!(
            game = %session.game.id(),
            kind = session.engine.kind(),
            players = session.game.players().len(),
            "game started"
        );
        Ok(session)
    }

    /// Rebuild a session from a persisted game by replaying its log.
    pub fn restore(game: Game, mut engine: Box<dyn GameEngine>, config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let state = replay(&game, engine.as_mut())?;
        let mut session = Self::assemble(game, engine, state, config);
        session.announce(format!("Restored game {}.", session.game.name()));

        info!(
            game = %session.game.id(),
            kind = session.engine.kind(),
            actions = session.game.len(),
            finished = session.is_finished(),
            "game restored"
        );
        Ok(session)
    }

    fn assemble(
        game: Game,
        engine: Box<dyn GameEngine>,
        state: GameState,
        config: &SessionConfig,
    ) -> Self {
        let chats = SeatMap::new(game.players().len(), |_| {
            BoundedQueue::new(config.chat_capacity)
        });
        Self {
            game,
            engine,
            state,
            messages: BoundedQueue::new(config.message_capacity),
            chats,
        }
    }

    fn announce(&mut self, text: String) {
        self.messages.push(Notification::text(text));
    }

    fn seat_of(&self, id: &PlayerId) -> Result<(Seat, &Player)> {
        self.game
            .players()
            .iter()
            .enumerate()
            .find(|(_, p)| &p.id == id)
            .map(|(i, p)| (Seat(i as u8), p))
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }

    /// Apply `action` on behalf of `player`.
    ///
    /// Only the acting player may act. When the engine accepts the action
    /// it is appended to the log and its outcome is announced; when it
    /// doesn't, nothing changes.
    pub fn perform(&mut self, player: &PlayerId, action: Action) -> Result<GameState> {
        let (_, who) = self.seat_of(player)?;
        let reject = |reason: String| {
            warn!(game = %self.game.id(), player = %player, abbr = %action.abbr, reason = %reason, "action rejected");
            GameError::invalid_action(action.abbr.clone(), reason)
        };
        match &self.state.acting_player {
            None => return Err(reject("game is over".to_string())),
            Some(acting) if &acting.id != player => {
                return Err(reject(format!("it is {}'s turn, not {}'s", acting.name, who.name)));
            }
            Some(_) => {}
        }

        let state = self.engine.handle_action(&action).map_err(|e| {
            warn!(game = %self.game.id(), player = %player, abbr = %action.abbr, error = %e, "action rejected");
            e
        })?;

        debug!(
            game = %self.game.id(),
            player = %player,
            abbr = %action.abbr,
            index = self.game.len(),
            "action accepted"
        );
        self.game.record(action);
        self.announce(state.outcome.text.clone());
        if state.is_terminal() {
            info!(game = %self.game.id(), actions = self.game.len(), "game finished");
        }
        self.state = state.clone();
        Ok(state)
    }

    /// Send a chat line from `player` to everyone, the sender included.
    pub fn post_chat(&mut self, player: &PlayerId, text: impl Into<String>) -> Result<()> {
        let (_, who) = self.seat_of(player)?;
        let message = ChatMessage {
            from: player.clone(),
            who: who.name.clone(),
            text: text.into(),
        };
        for (_, queue) in self.chats.iter_mut() {
            queue.push(message.clone());
        }
        Ok(())
    }

    /// Oldest undelivered game message.
    pub fn poll_message(&mut self) -> Option<Notification> {
        self.messages.pop()
    }

    /// Oldest undelivered chat line for `player`.
    pub fn poll_chat(&mut self, player: &PlayerId) -> Result<Option<ChatMessage>> {
        let (seat, _) = self.seat_of(player)?;
        Ok(self.chats[seat].pop())
    }

    /// Messages waiting in the game queue.
    #[must_use]
    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn engine(&self) -> &dyn GameEngine {
        self.engine.as_ref()
    }

    /// Give up the aggregate, e.g. for archiving.
    #[must_use]
    pub fn into_game(self) -> Game {
        self.game
    }

    /// Client view for a reconnecting player.
    pub fn refresh_client(&self, player: &PlayerId) -> Result<serde_json::Value> {
        self.seat_of(player)?;
        self.engine.refresh_client(player)
    }

    #[must_use]
    pub fn debug(&self) -> String {
        format!(
            "game={} actions={} finished={}\n{}",
            self.game.id(),
            self.game.len(),
            self.is_finished(),
            self.engine.debug()
        )
    }

    /// No choices remain.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSetup;
    use crate::error::ErrorKind;
    use crate::games::tally::TallyEngine;

    fn game() -> Game {
        GameSetup::builder()
            .id("g")
            .name("Tally")
            .player(Player::new("A", "Allen"))
            .player(Player::new("B", "Bob"))
            .seed(3)
            .build()
            .unwrap()
            .into_game()
    }

    fn session(config: &SessionConfig) -> Session {
        Session::start(game(), Box::new(TallyEngine::new()), config).unwrap()
    }

    fn drain(session: &mut Session) -> Vec<String> {
        std::iter::from_fn(|| session.poll_message())
            .map(|n| n.body().to_string())
            .collect()
    }

    #[test]
    fn test_start_announces() {
        let mut s = session(&SessionConfig::default());
        assert_eq!(drain(&mut s), vec!["Created game Tally...", "Started game."]);
        assert!(!s.is_finished());
    }

    #[test]
    fn test_start_refuses_logged_game() {
        let mut g = game();
        g.record(Action::new("A"));
        let err = Session::start(g, Box::new(TallyEngine::new()), &SessionConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_perform_records_and_announces() {
        let mut s = session(&SessionConfig::default());
        drain(&mut s);
        let state = s.perform(&PlayerId::new("A"), Action::new("A")).unwrap();
        assert_eq!(state.outcome.text, "Allen acted.");
        assert_eq!(s.game().len(), 1);
        assert_eq!(drain(&mut s), vec!["Allen acted."]);
    }

    #[test]
    fn test_perform_wrong_player() {
        let mut s = session(&SessionConfig::default());
        let err = s.perform(&PlayerId::new("B"), Action::new("A")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAction);
        assert!(s.game().is_empty());
    }

    #[test]
    fn test_perform_unknown_player() {
        let mut s = session(&SessionConfig::default());
        let err = s.perform(&PlayerId::new("Z"), Action::new("A")).unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer(PlayerId::new("Z")));
    }

    #[test]
    fn test_rejected_action_leaves_log() {
        let mut s = session(&SessionConfig::default());
        let before = s.state().clone();
        assert!(s.perform(&PlayerId::new("A"), Action::new("X")).is_err());
        assert!(s.game().is_empty());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn test_finished_game_rejects() {
        let mut s = session(&SessionConfig::default());
        s.perform(&PlayerId::new("A"), Action::new("Q")).unwrap();
        assert!(s.is_finished());
        let err = s.perform(&PlayerId::new("A"), Action::new("A")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAction);
        assert_eq!(s.game().len(), 1);
    }

    #[test]
    fn test_chat_fans_out() {
        let mut s = session(&SessionConfig::default());
        s.post_chat(&PlayerId::new("B"), "hello").unwrap();

        for id in ["A", "B"] {
            let msg = s.poll_chat(&PlayerId::new(id)).unwrap().unwrap();
            assert_eq!(msg.who, "Bob");
            assert_eq!(msg.text, "hello");
        }
        assert!(s.poll_chat(&PlayerId::new("A")).unwrap().is_none());
        assert!(s.post_chat(&PlayerId::new("Z"), "x").is_err());
    }

    #[test]
    fn test_message_queue_is_bounded() {
        let mut s = session(&SessionConfig::default().with_message_capacity(2));
        for _ in 0..5 {
            s.perform(&PlayerId::new("A"), Action::new("A")).unwrap();
        }
        assert_eq!(s.pending_messages(), 2);
        assert_eq!(drain(&mut s), vec!["Allen acted.", "Allen acted."]);
    }

    #[test]
    fn test_restore_matches_live() {
        let config = SessionConfig::default();
        let mut live = session(&config);
        for (id, abbr) in [("A", "A"), ("A", "P"), ("B", "A")] {
            live.perform(&PlayerId::new(id), Action::new(abbr)).unwrap();
        }

        let restored =
            Session::restore(live.game().clone(), Box::new(TallyEngine::new()), &config).unwrap();
        assert_eq!(restored.state(), live.state());
        assert!(restored.engine().equals(live.engine()));
    }

    #[test]
    fn test_refresh_client_checks_player() {
        let s = session(&SessionConfig::default());
        assert!(s.refresh_client(&PlayerId::new("A")).is_ok());
        let err = s.refresh_client(&PlayerId::new("Q")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEntity);
    }

    #[test]
    fn test_start_refuses_game_that_could_not_reload() {
        let setup = GameSetup {
            id: crate::core::GameId::default(),
            name: "Tally".to_string(),
            players: vec![Player::new("A", "Allen"), Player::new("B", "Bob")],
            seed: 3,
        };
        let err = Session::start(setup.into_game(), Box::new(TallyEngine::new()), &SessionConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_started_game_reloads() {
        let mut s = session(&SessionConfig::default());
        s.perform(&PlayerId::new("A"), Action::new("A")).unwrap();
        let reloaded = Game::from_json(&s.game().to_json().unwrap()).unwrap();
        assert_eq!(&reloaded, s.game());
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = SessionConfig::default().with_chat_capacity(0);
        let err = Session::start(game(), Box::new(TallyEngine::new()), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
