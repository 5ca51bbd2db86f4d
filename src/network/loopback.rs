//=========================================================================
// Loopback Runner
//=========================================================================
//
// In-process `NetworkRunner` with no transport. Auto host-or-client
// always hosts since there is nobody to join. Remote players can be
// simulated with `join_remote` / `disconnect`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use glam::Vec3;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{
    GameMode, NetworkError, NetworkInputData, NetworkObjectId, NetworkRunner, PlayerRef, RunnerEvent,
};
use crate::core::task::{AsyncOperation, OperationStatus};

//=== Constants ===========================================================

const DEFAULT_PLAYERS: u32 = 4;
const HOST_PLAYER: PlayerRef = PlayerRef(0);
const CLIENT_PLAYER: PlayerRef = PlayerRef(1);

//=== State ===============================================================

#[derive(Debug)]
struct LoopbackState {
    running: bool,
    starting: bool,
    server: bool,
    local_player: Option<PlayerRef>,
    default_players: u32,
    start_ticks: u32,
    fail_next_start: Option<String>,

    next_object: u64,
    objects: HashMap<NetworkObjectId, (PlayerRef, Vec3)>,
    player_objects: HashMap<PlayerRef, NetworkObjectId>,
    events: VecDeque<RunnerEvent>,
    last_input: Option<NetworkInputData>,
    inputs_submitted: u32,
}

impl Default for LoopbackState {
    fn default() -> Self {
        Self {
            running: false,
            starting: false,
            server: false,
            local_player: None,
            default_players: DEFAULT_PLAYERS,
            start_ticks: 1,
            fail_next_start: None,
            next_object: 1,
            objects: HashMap::new(),
            player_objects: HashMap::new(),
            events: VecDeque::new(),
            last_input: None,
            inputs_submitted: 0,
        }
    }
}

//=== LoopbackRunner ======================================================

/// Shared handle to an in-process session. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct LoopbackRunner {
    state: Rc<RefCell<LoopbackState>>,
}

impl LoopbackRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of in-progress polls before a session start completes.
    pub fn with_start_ticks(self, ticks: u32) -> Self {
        self.state.borrow_mut().start_ticks = ticks;
        self
    }

    pub fn with_default_players(self, players: u32) -> Self {
        self.state.borrow_mut().default_players = players;
        self
    }

    /// Makes the next `start_game` fail with `reason`.
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_next_start = Some(reason.into());
    }

    //--- Simulation -------------------------------------------------------

    /// Queues a join event for a remote player.
    pub fn join_remote(&self, player: PlayerRef) {
        let mut state = self.state.borrow_mut();
        if state.running {
            state.events.push_back(RunnerEvent::PlayerJoined(player));
        }
    }

    /// Queues a leave event for a remote player.
    pub fn disconnect(&self, player: PlayerRef) {
        let mut state = self.state.borrow_mut();
        if state.running {
            state.events.push_back(RunnerEvent::PlayerLeft(player));
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn local_player(&self) -> Option<PlayerRef> {
        self.state.borrow().local_player
    }

    pub fn object_count(&self) -> usize {
        self.state.borrow().objects.len()
    }

    pub fn player_object(&self, player: PlayerRef) -> Option<NetworkObjectId> {
        self.state.borrow().player_objects.get(&player).copied()
    }

    pub fn avatar_position(&self, object: NetworkObjectId) -> Option<Vec3> {
        self.state.borrow().objects.get(&object).map(|(_, position)| *position)
    }

    pub fn last_input(&self) -> Option<NetworkInputData> {
        self.state.borrow().last_input
    }

    pub fn inputs_submitted(&self) -> u32 {
        self.state.borrow().inputs_submitted
    }
}

impl NetworkRunner for LoopbackRunner {
    fn start_game(&mut self, mode: GameMode) -> Result<Box<dyn AsyncOperation>, NetworkError> {
        let mut state = self.state.borrow_mut();
        if state.running || state.starting {
            return Err(NetworkError::AlreadyRunning);
        }

        state.starting = true;
        debug!("Loopback session starting in {:?} mode", mode);

        Ok(Box::new(LoopbackStart {
            state: Rc::clone(&self.state),
            mode,
            remaining: state.start_ticks,
            outcome: None,
        }))
    }

    fn leave(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.running && !state.starting {
            return;
        }

        state.running = false;
        state.starting = false;
        state.local_player = None;
        state.objects.clear();
        state.player_objects.clear();
        state.events.clear();
        info!("Left loopback session");
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    fn is_server(&self) -> bool {
        let state = self.state.borrow();
        state.running && state.server
    }

    fn default_players(&self) -> u32 {
        self.state.borrow().default_players
    }

    fn spawn_avatar(&mut self, position: Vec3, owner: PlayerRef) -> Result<NetworkObjectId, NetworkError> {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return Err(NetworkError::NotRunning);
        }

        let id = NetworkObjectId(state.next_object);
        state.next_object += 1;
        state.objects.insert(id, (owner, position));
        Ok(id)
    }

    fn despawn(&mut self, object: NetworkObjectId) -> Result<(), NetworkError> {
        let mut state = self.state.borrow_mut();
        if !state.running {
            return Err(NetworkError::NotRunning);
        }

        let (owner, _) = state
            .objects
            .remove(&object)
            .ok_or(NetworkError::UnknownObject(object))?;

        if state.player_objects.get(&owner) == Some(&object) {
            state.player_objects.remove(&owner);
        }
        Ok(())
    }

    fn set_player_object(&mut self, player: PlayerRef, object: NetworkObjectId) -> Result<(), NetworkError> {
        let mut state = self.state.borrow_mut();
        if !state.objects.contains_key(&object) {
            return Err(NetworkError::UnknownObject(object));
        }
        state.player_objects.insert(player, object);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<RunnerEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }

    fn submit_input(&mut self, input: NetworkInputData) {
        let mut state = self.state.borrow_mut();
        if state.running {
            state.last_input = Some(input);
            state.inputs_submitted += 1;
        }
    }
}

//=== LoopbackStart =======================================================

struct LoopbackStart {
    state: Rc<RefCell<LoopbackState>>,
    mode: GameMode,
    remaining: u32,
    outcome: Option<OperationStatus>,
}

impl LoopbackStart {
    fn finish(&mut self) -> OperationStatus {
        let mut state = self.state.borrow_mut();
        if !state.starting {
            return OperationStatus::Failed("session start was abandoned".to_string());
        }
        state.starting = false;

        if let Some(reason) = state.fail_next_start.take() {
            return OperationStatus::Failed(reason);
        }

        let (server, local) = match self.mode {
            GameMode::Client => (false, CLIENT_PLAYER),
            GameMode::Single | GameMode::Host | GameMode::AutoHostOrClient => (true, HOST_PLAYER),
        };

        state.running = true;
        state.server = server;
        state.local_player = Some(local);
        state.events.push_back(RunnerEvent::PlayerJoined(local));

        info!("Loopback session started as {} ({:?})", local, self.mode);
        OperationStatus::Completed
    }
}

impl AsyncOperation for LoopbackStart {
    fn poll_status(&mut self) -> OperationStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            return OperationStatus::InProgress;
        }

        let outcome = self.finish();
        self.outcome = Some(outcome.clone());
        outcome
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
