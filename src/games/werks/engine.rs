//! The werks engine: phases, available moves and their handlers.

use serde::{Serialize, Serializer};
use tracing::debug;

use super::board::{Die, Factory, Firm, LocoBoard, MAX_CAPACITY, OPENING_ORDERS};
use super::catalog::{LocoCatalog, LocoSpec};
use crate::core::{
    Action, Choice, Event, GameId, GameRng, GameSetup, GameState, Payload, Player, PlayerId, Seat,
    SeatMap, SessionConfig,
};
use crate::engine::{snapshot_of, GameEngine};
use crate::error::{GameError, Result};
use crate::schedule::TurnOrder;

/// Phases of a turn, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Phase {
    Development = 0,
    Capacity = 1,
    Production = 2,
}

impl Phase {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Phase::Development => "Locomotive Development",
            Phase::Capacity => "Production Capacity",
            Phase::Production => "Locomotive Production",
        }
    }

    /// The phase after this one. Production wraps to the next turn's
    /// Development.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Development => Phase::Capacity,
            Phase::Capacity => Phase::Production,
            Phase::Production => Phase::Development,
        }
    }

    fn handler(self) -> PhaseHandler {
        HANDLERS[self as usize]
    }
}

/// Applies a validated move and describes it.
type PhaseHandler = fn(&mut Table, &LocoCatalog, &Move) -> String;

const HANDLERS: [PhaseHandler; 3] = [Table::develop, Table::expand, Table::produce];

/// A move available to the acting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Move {
    pub abbr: String,
    pub verb: &'static str,
    pub noun: String,
    pub cost: i64,
    #[serde(skip)]
    loco: Option<usize>,
}

impl Move {
    fn pass() -> Self {
        Self {
            abbr: "P".to_string(),
            verb: "Pass",
            noun: String::new(),
            cost: 0,
            loco: None,
        }
    }

    fn to_choice(&self) -> Choice {
        let text = if self.noun.is_empty() {
            self.verb.to_string()
        } else {
            format!("{} {} ({})", self.verb, self.noun, self.cost)
        };
        let choice = Choice::new(self.abbr.clone(), text);
        match Payload::encode(self) {
            Ok(detail) => choice.with_detail(detail),
            Err(_) => choice,
        }
    }
}

fn serialize_rng<S: Serializer>(rng: &GameRng, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    rng.state().serialize(serializer)
}

/// Everything that changes during a game.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    id: GameId,
    name: String,
    players: Vec<Player>,
    firms: SeatMap<Firm>,
    locos: Vec<LocoBoard>,
    turn: u32,
    turns: u32,
    phase: Phase,
    acting: Seat,
    finished: bool,
    order: TurnOrder,
    #[serde(serialize_with = "serialize_rng")]
    dice: GameRng,
}

impl Table {
    fn acting_name(&self) -> &str {
        &self.players[self.acting.index()].name
    }

    fn acting_firm(&self) -> &Firm {
        &self.firms[self.acting]
    }

    /// Can the acting player develop the locomotive at catalog position `i`?
    fn can_develop(&self, i: usize, spec: &LocoSpec) -> bool {
        let board = &self.locos[i];
        let firm = self.acting_firm();
        !board.obsolete
            && board.has_orders()
            && spec.development_cost <= firm.money
            && !firm.owns(&spec.key)
    }

    fn moves(&self, catalog: &LocoCatalog) -> Vec<Move> {
        if self.finished {
            return Vec::new();
        }

        let mut moves = Vec::new();
        match self.phase {
            Phase::Development => {
                for (i, spec) in catalog.iter().enumerate() {
                    if self.can_develop(i, spec) {
                        moves.push(Move {
                            abbr: format!("D:{}", spec.key),
                            verb: "Develop",
                            noun: spec.name.clone(),
                            cost: spec.development_cost,
                            loco: Some(i),
                        });
                    }
                }
            }
            Phase::Capacity => {
                let firm = self.acting_firm();
                for factory in &firm.factories {
                    let Some(i) = catalog.position(&factory.key) else {
                        continue;
                    };
                    let spec = &catalog.specs()[i];
                    if factory.capacity < MAX_CAPACITY && spec.production_cost <= firm.money {
                        moves.push(Move {
                            abbr: format!("C:{}", spec.key),
                            verb: "Expand",
                            noun: spec.name.clone(),
                            cost: spec.production_cost,
                            loco: Some(i),
                        });
                    }
                }
            }
            Phase::Production => {}
        }
        moves.push(Move::pass());
        moves
    }

    fn state(&self, catalog: &LocoCatalog, outcome: Event) -> GameState {
        if self.finished {
            return GameState::finished(outcome);
        }
        let choices = self.moves(catalog).iter().map(Move::to_choice).collect();
        GameState::awaiting(outcome, self.players[self.acting.index()].clone(), choices)
    }

    // === Phase handlers ===

    fn develop(&mut self, catalog: &LocoCatalog, chosen: &Move) -> String {
        let name = self.acting_name().to_string();
        let Some(i) = chosen.loco else {
            return format!("{name} passed.");
        };
        let spec = &catalog.specs()[i];
        let firm = &mut self.firms[self.acting];
        firm.factories.push(Factory::new(spec.key.clone()));
        firm.money -= spec.development_cost;
        self.first_development(catalog, i);
        format!("{name} developed {} for {}.", spec.name, spec.development_cost)
    }

    fn expand(&mut self, catalog: &LocoCatalog, chosen: &Move) -> String {
        let name = self.acting_name().to_string();
        let Some(i) = chosen.loco else {
            return format!("{name} passed.");
        };
        let spec = &catalog.specs()[i];
        let firm = &mut self.firms[self.acting];
        firm.money -= spec.production_cost;
        let capacity = match firm.factory_mut(&spec.key) {
            Some(factory) => {
                factory.capacity += 1;
                factory.capacity
            }
            None => 0,
        };
        format!("{name} expanded {} to capacity {capacity}.", spec.name)
    }

    fn produce(&mut self, _catalog: &LocoCatalog, _chosen: &Move) -> String {
        format!("{} passed.", self.acting_name())
    }

    /// The first factory for a locomotive opens its market: the initial
    /// order die becomes an existing order, the next generation gets
    /// initial orders, and generations two or more behind go obsolete.
    fn first_development(&mut self, catalog: &LocoCatalog, i: usize) {
        let board = &mut self.locos[i];
        if board.developed {
            return;
        }
        board.developed = true;
        if board.initial_orders.is_showing() {
            let die = board.initial_orders;
            board.initial_orders = Die::slot(true);
            if !board.place_existing(die) {
                debug!(game = %self.id, loco = i, "existing orders full, initial order discarded");
            }
        }

        let spec = &catalog.specs()[i];
        if let Some(j) = spec.upgrade_to.as_deref().and_then(|key| catalog.position(key)) {
            let next = &mut self.locos[j];
            if !next.developed && !next.initial_orders.is_showing() {
                next.initial_orders = Die::roll(&mut self.dice);
            }
        }
        for (j, other) in catalog.iter().enumerate() {
            if other.kind == spec.kind && u16::from(other.generation) + 2 <= u16::from(spec.generation) {
                self.locos[j].obsolete = true;
            }
        }
    }

    // === Turn flow ===

    /// Move to the next player, or close the phase when everyone has acted.
    fn advance(&mut self, catalog: &LocoCatalog, mut text: String) -> String {
        if let Some(seat) = self.order.next(false) {
            self.acting = seat;
            return text;
        }

        if self.phase == Phase::Production {
            text.push(' ');
            text.push_str(&self.pay_income(catalog));
            if self.turn >= self.turns {
                self.finished = true;
                text.push(' ');
                text.push_str(&self.final_standings());
                debug!(game = %self.id, turn = self.turn, "game over");
                return text;
            }
            self.turn += 1;
        }

        self.phase = self.phase.next();
        if let Some(seat) = self.order.next(true) {
            self.acting = seat;
        }
        debug!(game = %self.id, turn = self.turn, phase = self.phase.title(), "phase change");
        text.push_str(&format!(" Turn {}: {}.", self.turn, self.phase.title()));
        text
    }

    fn pay_income(&mut self, catalog: &LocoCatalog) -> String {
        let mut paid = Vec::with_capacity(self.players.len());
        for (seat, firm) in self.firms.iter_mut() {
            let mut earned = 0;
            for factory in firm.factories.iter_mut() {
                if let Some(spec) = catalog.get(&factory.key) {
                    earned += spec.income * i64::from(factory.capacity);
                    factory.units_sold += factory.capacity;
                }
            }
            firm.money += earned;
            paid.push(format!("{} +{earned}", self.players[seat.index()].name));
        }
        format!("Production paid {}.", paid.join(", "))
    }

    /// Richest player, lowest seat on a tie.
    fn winner(&self) -> Option<Seat> {
        self.firms
            .iter()
            .max_by(|(sa, a), (sb, b)| a.money.cmp(&b.money).then(sb.cmp(sa)))
            .map(|(seat, _)| seat)
    }

    fn final_standings(&self) -> String {
        match self.winner() {
            Some(seat) => format!(
                "Game over after {} turns. {} wins with {}.",
                self.turns,
                self.players[seat.index()].name,
                self.firms[seat].money
            ),
            None => format!("Game over after {} turns.", self.turns),
        }
    }

    fn loco_view(spec: &LocoSpec, board: &LocoBoard) -> Result<serde_json::Value> {
        let mut view = snapshot_of(spec)?;
        if let (Some(fields), serde_json::Value::Object(extra)) =
            (view.as_object_mut(), snapshot_of(board)?)
        {
            fields.extend(extra);
        }
        Ok(view)
    }
}

/// Locomotive development game.
///
/// Each turn runs Development, Capacity and Production. Players act once per
/// phase in turn order; when everyone has acted the next phase starts with
/// the start player.
///
/// ```
/// use turnworks::core::{Action, GameSetup, Player, SessionConfig};
/// use turnworks::engine::GameEngine;
/// use turnworks::games::werks::WerksEngine;
///
/// let setup = GameSetup::builder()
///     .id("w-1")
///     .name("Werks")
///     .player(Player::new("A", "Allen"))
///     .player(Player::new("B", "Bob"))
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut engine = WerksEngine::standard(&SessionConfig::default()).unwrap();
/// let state = engine.start(&setup).unwrap();
/// let abbrs: Vec<_> = state.choices.iter().map(|c| c.abbr.as_str()).collect();
/// assert_eq!(abbrs, vec!["D:p2", "P"]);
///
/// let state = engine.handle_action(&Action::new("D:p2")).unwrap();
/// assert_eq!(state.acting_player.unwrap().name, "Bob");
/// ```
#[derive(Clone, Debug)]
pub struct WerksEngine {
    catalog: LocoCatalog,
    starting_money: i64,
    turns: u32,
    table: Option<Table>,
}

impl WerksEngine {
    pub const KIND: &'static str = "werks";

    #[must_use]
    pub fn new(catalog: LocoCatalog, config: &SessionConfig) -> Self {
        Self {
            catalog,
            starting_money: config.starting_money,
            turns: config.turns,
            table: None,
        }
    }

    /// An engine using the built-in catalog.
    pub fn standard(config: &SessionConfig) -> Result<Self> {
        Ok(Self::new(LocoCatalog::standard()?, config))
    }

    #[must_use]
    pub fn catalog(&self) -> &LocoCatalog {
        &self.catalog
    }

    /// Current phase, once started.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.table.as_ref().map(|t| t.phase)
    }

    /// Current turn (1-based), once started.
    #[must_use]
    pub fn turn(&self) -> Option<u32> {
        self.table.as_ref().map(|t| t.turn)
    }

    /// Money of the player with `id`.
    #[must_use]
    pub fn money(&self, id: &PlayerId) -> Option<i64> {
        let table = self.table.as_ref()?;
        let seat = table.players.iter().position(|p| &p.id == id)?;
        table.firms.get(Seat(seat as u8)).map(|f| f.money)
    }

    /// Turn order, best first, once started.
    #[must_use]
    pub fn turn_order(&self) -> Vec<Seat> {
        self.table
            .as_ref()
            .map(|t| t.order.ranked_seats())
            .unwrap_or_default()
    }

    /// Moves open to the acting player.
    #[must_use]
    pub fn moves(&self) -> Vec<Move> {
        self.table
            .as_ref()
            .map(|t| t.moves(&self.catalog))
            .unwrap_or_default()
    }
}

impl GameEngine for WerksEngine {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn start(&mut self, setup: &GameSetup) -> Result<GameState> {
        setup.validate()?;
        let Some(opening) = self.catalog.specs().first() else {
            return Err(GameError::config("loco catalog is empty"));
        };
        if self.turns == 0 {
            return Err(GameError::config("turns must be at least 1"));
        }

        let mut dice = GameRng::new(setup.seed).for_context("dice");
        let mut locos: Vec<LocoBoard> = self.catalog.iter().map(LocoBoard::new).collect();
        locos[0].developed = true;
        for _ in 0..OPENING_ORDERS {
            let die = Die::roll(&mut dice);
            if !locos[0].place_existing(die) {
                return Err(GameError::config(format!(
                    "{} needs room for {OPENING_ORDERS} opening orders",
                    opening.key
                )));
            }
        }
        if let Some(second) = locos.get_mut(1) {
            second.initial_orders = Die::roll(&mut dice);
        }

        let count = setup.players.len();
        let mut firms = SeatMap::new(count, |_| {
            let mut firm = Firm::new(self.starting_money);
            firm.factories.push(Factory::new(opening.key.clone()));
            firm
        });
        let money: SeatMap<i64> = firms.values().map(|f| f.money).collect();
        let mut order = TurnOrder::from_money(&money);
        for (position, seat) in order.ranked_seats().into_iter().enumerate() {
            firms[seat].turn_order = position;
        }
        let acting = order
            .next(false)
            .ok_or_else(|| GameError::config("a game needs at least one player"))?;

        let table = Table {
            id: setup.id.clone(),
            name: setup.name.clone(),
            players: setup.players.clone(),
            firms,
            locos,
            turn: 1,
            turns: self.turns,
            phase: Phase::Development,
            acting,
            finished: false,
            order,
            dice,
        };
        let outcome = Event::text(format!(
            "Started game {}. Turn 1: {}.",
            table.name,
            Phase::Development.title()
        ));
        let state = table.state(&self.catalog, outcome);
        self.table = Some(table);
        Ok(state)
    }

    fn handle_action(&mut self, action: &Action) -> Result<GameState> {
        let table = self
            .table
            .as_mut()
            .ok_or_else(|| GameError::invalid_action(&action.abbr, "game not started"))?;
        if table.finished {
            return Err(GameError::invalid_action(&action.abbr, "game is over"));
        }

        let chosen = table
            .moves(&self.catalog)
            .into_iter()
            .find(|m| m.abbr == action.abbr)
            .ok_or_else(|| GameError::invalid_action(&action.abbr, "not an offered choice"))?;

        let handler = table.phase.handler();
        let text = handler(table, &self.catalog, &chosen);
        let text = table.advance(&self.catalog, text);
        Ok(table.state(&self.catalog, Event::new(action.abbr.clone(), text)))
    }

    fn refresh_client(&self, player: &PlayerId) -> Result<serde_json::Value> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
        let seat = table
            .players
            .iter()
            .position(|p| &p.id == player)
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;

        let players: Vec<_> = table
            .players
            .iter()
            .zip(table.firms.values())
            .enumerate()
            .map(|(i, (p, firm))| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "money": firm.money,
                    "factories": firm.factories,
                    "isCurrent": !table.finished && i == table.acting.index(),
                    "turnOrder": firm.turn_order,
                })
            })
            .collect();
        let locos = self
            .catalog
            .iter()
            .zip(&table.locos)
            .map(|(spec, board)| Table::loco_view(spec, board))
            .collect::<Result<Vec<_>>>()?;
        let actions = if !table.finished && seat == table.acting.index() {
            table.moves(&self.catalog)
        } else {
            Vec::new()
        };

        Ok(serde_json::json!({
            "game": {
                "id": table.id,
                "name": table.name,
                "turn": table.turn,
                "turns": table.turns,
                "phase": table.phase.title(),
                "currentPlayer": table.acting.index(),
                "finished": table.finished,
                "players": players,
                "locos": locos,
            },
            "actions": {
                "phase": table.phase.title(),
                "actions": actions,
            },
            "you": player,
        }))
    }

    fn debug(&self) -> String {
        let Some(table) = &self.table else {
            return format!("kind={}\nstarted=false\n", Self::KIND);
        };
        let mut out = format!(
            "id={}\nname={}\nturn={}/{}\nphase={}\nacting={}\nfinished={}\n",
            table.id,
            table.name,
            table.turn,
            table.turns,
            table.phase.title(),
            table.acting_name(),
            table.finished
        );
        for (seat, firm) in table.firms.iter() {
            let factories: Vec<_> = firm
                .factories
                .iter()
                .map(|f| format!("{}x{}", f.key, f.capacity))
                .collect();
            out.push_str(&format!(
                "{} money={} order={} factories={}\n",
                table.players[seat.index()].name,
                firm.money,
                firm.turn_order,
                factories.join(",")
            ));
        }
        out
    }

    fn snapshot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "catalog": snapshot_of(self.catalog.specs())?,
            "startingMoney": self.starting_money,
            "turns": self.turns,
            "table": snapshot_of(&self.table)?,
        }))
    }
}
