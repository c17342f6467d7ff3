use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::PlayerEntity;

/// A squad member tracked during a pitch-board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name shown on the board.
    pub name: String,
    /// Optional jersey number.
    pub jersey_number: Option<u8>,
    /// Injured players never hold a position and are excluded from candidacy.
    pub injured: bool,
    /// Marks a temporary fill-in borrowed from another squad.
    pub fill_in: bool,
    /// Position codes this player may occupy; an empty set means any position.
    pub eligible_positions: Vec<String>,
    /// Currently held pitch position, `None` while on the bench.
    pub position: Option<String>,
    /// Seconds of play credited by confirmed substitutions.
    pub seconds_played: u64,
    /// Clock second at which the player last took the pitch.
    pub entered_at: Option<u64>,
}

impl Player {
    /// Whether the player currently occupies a pitch position.
    pub fn is_on_pitch(&self) -> bool {
        self.position.is_some()
    }

    /// Whether the player is eligible for `position` (empty set = wildcard).
    pub fn can_play(&self, position: &str) -> bool {
        self.eligible_positions.is_empty()
            || self.eligible_positions.iter().any(|code| code == position)
    }

    /// Playing time including the uncredited stretch of the current stint.
    pub fn seconds_played_at(&self, elapsed: u64) -> u64 {
        match self.entered_at {
            Some(entered) => self.seconds_played + elapsed.saturating_sub(entered),
            None => self.seconds_played,
        }
    }
}

/// Error returned when a roster mutation would break an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Referenced player id is not part of the roster.
    #[error("player `{0}` is not in the roster")]
    UnknownPlayer(Uuid),
    /// Target position is already held by another on-pitch player.
    #[error("position `{position}` is already held by player `{holder}`")]
    PositionOccupied {
        /// The contested position code.
        position: String,
        /// Id of the player currently holding it.
        holder: Uuid,
    },
    /// Injured players cannot take the pitch.
    #[error("player `{0}` is injured and cannot take the pitch")]
    Injured(Uuid),
    /// The player is on the bench but the operation needs them on the pitch.
    #[error("player `{0}` does not hold a pitch position")]
    NotOnPitch(Uuid),
}

/// Squad state for one session: who is on the pitch, who is on the bench.
///
/// Players keep their insertion order; the option engine relies on that order
/// for deterministic candidate enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: IndexMap<Uuid, Player>,
}

impl Roster {
    /// Build a roster, validating occupancy and injury invariants up front.
    pub fn from_players(players: Vec<Player>) -> Result<Self, RosterError> {
        let mut map = IndexMap::with_capacity(players.len());
        let mut holders: IndexMap<String, Uuid> = IndexMap::new();
        for player in players {
            if let Some(position) = &player.position {
                if player.injured {
                    return Err(RosterError::Injured(player.id));
                }
                if let Some(holder) = holders.get(position) {
                    return Err(RosterError::PositionOccupied {
                        position: position.clone(),
                        holder: *holder,
                    });
                }
                holders.insert(position.clone(), player.id);
            }
            map.insert(player.id, player);
        }
        Ok(Self { players: map })
    }

    /// Look up a player by id.
    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.get(&id)
    }

    /// All players in insertion order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Number of players in the roster.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster holds no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Benched players in insertion order.
    pub fn bench(&self) -> Vec<&Player> {
        self.players.values().filter(|p| !p.is_on_pitch()).collect()
    }

    /// On-pitch players in insertion order.
    pub fn on_pitch(&self) -> Vec<&Player> {
        self.players.values().filter(|p| p.is_on_pitch()).collect()
    }

    /// The player currently holding `position`, if any.
    pub fn holder_of(&self, position: &str) -> Option<&Player> {
        self.players
            .values()
            .find(|p| p.position.as_deref() == Some(position))
    }

    /// Place a player on `position`, moving them from the bench or from
    /// another position. Bench entries start a new playing stint at `elapsed`.
    pub fn place(&mut self, id: Uuid, position: String, elapsed: u64) -> Result<(), RosterError> {
        if let Some(holder) = self.holder_of(&position) {
            if holder.id != id {
                return Err(RosterError::PositionOccupied {
                    position,
                    holder: holder.id,
                });
            }
        }
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        if player.injured {
            return Err(RosterError::Injured(id));
        }
        if player.position.is_none() {
            player.entered_at = Some(elapsed);
        }
        player.position = Some(position);
        Ok(())
    }

    /// Move a player to the bench, crediting the finished stint.
    pub fn bench_player(&mut self, id: Uuid, elapsed: u64) -> Result<(), RosterError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        if player.position.is_none() {
            return Err(RosterError::NotOnPitch(id));
        }
        if let Some(entered) = player.entered_at.take() {
            player.seconds_played += elapsed.saturating_sub(entered);
        }
        player.position = None;
        Ok(())
    }

    /// Toggle the injury flag. Flagging an on-pitch player benches them first
    /// so the injured-never-on-pitch invariant holds. Returns whether the
    /// player was benched as a side effect.
    pub fn set_injured(
        &mut self,
        id: Uuid,
        injured: bool,
        elapsed: u64,
    ) -> Result<bool, RosterError> {
        let on_pitch = self
            .players
            .get(&id)
            .ok_or(RosterError::UnknownPlayer(id))?
            .is_on_pitch();
        let benched = injured && on_pitch;
        if benched {
            self.bench_player(id, elapsed)?;
        }
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        player.injured = injured;
        Ok(benched)
    }

    /// Toggle the temporary fill-in flag.
    pub fn set_fill_in(&mut self, id: Uuid, fill_in: bool) -> Result<(), RosterError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        player.fill_in = fill_in;
        Ok(())
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            jersey_number: value.jersey_number,
            injured: value.injured,
            fill_in: value.fill_in,
            eligible_positions: value.eligible_positions,
            position: value.position,
            seconds_played: value.seconds_played,
            entered_at: value.entered_at,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            jersey_number: value.jersey_number,
            injured: value.injured,
            fill_in: value.fill_in,
            eligible_positions: value.eligible_positions,
            position: value.position,
            seconds_played: value.seconds_played,
            entered_at: value.entered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, position: Option<&str>) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            jersey_number: None,
            injured: false,
            fill_in: false,
            eligible_positions: Vec::new(),
            position: position.map(str::to_string),
            seconds_played: 0,
            entered_at: position.map(|_| 0),
        }
    }

    #[test]
    fn rejects_double_occupancy_at_build_time() {
        let a = player("a", Some("GK"));
        let b = player("b", Some("GK"));
        let holder = a.id;
        let err = Roster::from_players(vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            RosterError::PositionOccupied {
                position: "GK".into(),
                holder,
            }
        );
    }

    #[test]
    fn rejects_injured_player_on_pitch_at_build_time() {
        let mut a = player("a", Some("CB"));
        a.injured = true;
        let id = a.id;
        assert_eq!(
            Roster::from_players(vec![a]).unwrap_err(),
            RosterError::Injured(id)
        );
    }

    #[test]
    fn place_rejects_occupied_position() {
        let a = player("a", Some("GK"));
        let b = player("b", None);
        let (a_id, b_id) = (a.id, b.id);
        let mut roster = Roster::from_players(vec![a, b]).unwrap();
        let err = roster.place(b_id, "GK".into(), 10).unwrap_err();
        assert_eq!(
            err,
            RosterError::PositionOccupied {
                position: "GK".into(),
                holder: a_id,
            }
        );
    }

    #[test]
    fn bench_credits_playing_time() {
        let a = player("a", Some("ST"));
        let id = a.id;
        let mut roster = Roster::from_players(vec![a]).unwrap();
        roster.bench_player(id, 600).unwrap();
        let benched = roster.player(id).unwrap();
        assert_eq!(benched.seconds_played, 600);
        assert_eq!(benched.position, None);
        assert_eq!(benched.entered_at, None);

        // A second stint starts counting from the new entry point.
        roster.place(id, "ST".into(), 900).unwrap();
        assert_eq!(roster.player(id).unwrap().seconds_played_at(1000), 700);
    }

    #[test]
    fn injuring_an_on_pitch_player_benches_them() {
        let a = player("a", Some("CB"));
        let id = a.id;
        let mut roster = Roster::from_players(vec![a]).unwrap();
        let benched = roster.set_injured(id, true, 120).unwrap();
        assert!(benched);
        let p = roster.player(id).unwrap();
        assert!(p.injured);
        assert_eq!(p.position, None);
        assert_eq!(p.seconds_played, 120);
        // And they cannot be placed again while injured.
        assert_eq!(
            roster.place(id, "CB".into(), 130).unwrap_err(),
            RosterError::Injured(id)
        );
    }

    #[test]
    fn moving_within_the_pitch_keeps_the_stint() {
        let mut a = player("a", Some("RB"));
        a.entered_at = Some(60);
        let id = a.id;
        let mut roster = Roster::from_players(vec![a]).unwrap();
        roster.place(id, "LB".into(), 300).unwrap();
        let p = roster.player(id).unwrap();
        assert_eq!(p.position.as_deref(), Some("LB"));
        assert_eq!(p.entered_at, Some(60));
    }

    #[test]
    fn wildcard_eligibility() {
        let mut a = player("a", None);
        assert!(a.can_play("GK"));
        a.eligible_positions = vec!["CB".into(), "RB".into()];
        assert!(a.can_play("RB"));
        assert!(!a.can_play("GK"));
    }
}
