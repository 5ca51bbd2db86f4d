//=========================================================================
// Player Spawner
//=========================================================================
//
// Spawns one avatar per joining player on the peer with state authority
// and despawns it when the player leaves.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use glam::Vec3;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{NetworkError, NetworkObjectId, NetworkRunner, PlayerRef, RunnerEvent};

//=== Constants ===========================================================

const SPAWN_SPACING: f32 = 3.0;
const SPAWN_HEIGHT: f32 = 1.0;

//=== PlayerSpawner =======================================================

#[derive(Debug, Default)]
pub struct PlayerSpawner {
    avatars: HashMap<PlayerRef, NetworkObjectId>,
}

impl PlayerSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Avatar spawned for `player`, if any.
    pub fn avatar_of(&self, player: PlayerRef) -> Option<NetworkObjectId> {
        self.avatars.get(&player).copied()
    }

    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }

    /// Spawn slot for `player`: one column every few units along +X.
    pub fn spawn_position(player: PlayerRef, default_players: u32) -> Vec3 {
        let slot = player.raw() % default_players.max(1);
        Vec3::new(slot as f32 * SPAWN_SPACING, SPAWN_HEIGHT, 0.0)
    }

    pub fn handle_event(&mut self, runner: &mut dyn NetworkRunner, event: RunnerEvent) -> Result<(), NetworkError> {
        match event {
            RunnerEvent::PlayerJoined(player) => self.on_player_joined(runner, player),
            RunnerEvent::PlayerLeft(player) => self.on_player_left(runner, player),
        }
    }

    fn on_player_joined(&mut self, runner: &mut dyn NetworkRunner, player: PlayerRef) -> Result<(), NetworkError> {
        if !runner.is_server() {
            return Ok(());
        }
        if self.avatars.contains_key(&player) {
            debug!("{} already has an avatar", player);
            return Ok(());
        }

        let position = Self::spawn_position(player, runner.default_players());
        let avatar = runner.spawn_avatar(position, player)?;
        runner.set_player_object(player, avatar)?;
        self.avatars.insert(player, avatar);

        info!("Spawned {} for {} at {}", avatar, player, position);
        Ok(())
    }

    fn on_player_left(&mut self, runner: &mut dyn NetworkRunner, player: PlayerRef) -> Result<(), NetworkError> {
        let Some(avatar) = self.avatars.remove(&player) else {
            return Ok(());
        };

        runner.despawn(avatar)?;
        info!("Despawned {} of {}", avatar, player);
        Ok(())
    }

    /// Forgets every avatar without despawning; the session owned them.
    pub fn clear(&mut self) {
        self.avatars.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{GameMode, LoopbackRunner};
    use crate::core::task::OperationStatus;

    fn running_host() -> LoopbackRunner {
        let mut runner = LoopbackRunner::new().with_start_ticks(0);
        let mut start = runner.start_game(GameMode::Host).unwrap();
        assert_eq!(start.poll_status(), OperationStatus::Completed);
        runner.poll_events();
        runner
    }

    #[test]
    fn spawn_positions_wrap_around_player_slots() {
        assert_eq!(PlayerSpawner::spawn_position(PlayerRef(0), 4), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(PlayerSpawner::spawn_position(PlayerRef(2), 4), Vec3::new(6.0, 1.0, 0.0));
        assert_eq!(PlayerSpawner::spawn_position(PlayerRef(5), 4), Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(PlayerSpawner::spawn_position(PlayerRef(7), 0), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn join_spawns_and_leave_despawns() {
        let mut runner = running_host();
        let mut spawner = PlayerSpawner::new();

        spawner.handle_event(&mut runner, RunnerEvent::PlayerJoined(PlayerRef(1))).unwrap();
        let avatar = spawner.avatar_of(PlayerRef(1)).unwrap();
        assert_eq!(runner.player_object(PlayerRef(1)), Some(avatar));
        assert_eq!(runner.avatar_position(avatar), Some(Vec3::new(3.0, 1.0, 0.0)));

        spawner.handle_event(&mut runner, RunnerEvent::PlayerLeft(PlayerRef(1))).unwrap();
        assert_eq!(spawner.avatar_count(), 0);
        assert_eq!(runner.avatar_position(avatar), None);
    }

    #[test]
    fn duplicate_join_spawns_once() {
        let mut runner = running_host();
        let mut spawner = PlayerSpawner::new();

        for _ in 0..2 {
            spawner.handle_event(&mut runner, RunnerEvent::PlayerJoined(PlayerRef(3))).unwrap();
        }
        assert_eq!(runner.object_count(), 1);
    }

    #[test]
    fn clients_do_not_spawn() {
        let mut runner = LoopbackRunner::new().with_start_ticks(0);
        runner.start_game(GameMode::Client).unwrap().poll_status();
        let mut spawner = PlayerSpawner::new();

        spawner.handle_event(&mut runner, RunnerEvent::PlayerJoined(PlayerRef(2))).unwrap();
        assert_eq!(spawner.avatar_count(), 0);
        assert_eq!(runner.object_count(), 0);
    }

    #[test]
    fn unknown_leave_is_ignored() {
        let mut runner = running_host();
        let mut spawner = PlayerSpawner::new();
        assert!(spawner.handle_event(&mut runner, RunnerEvent::PlayerLeft(PlayerRef(9))).is_ok());
    }
}
