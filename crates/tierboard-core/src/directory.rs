// Player directory: base roster plus user-added players, keyed by id.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::headshot::{self, IdLookup};
use crate::player::{unique_id_from_name, Player, Position};

/// All players known to the board.
///
/// The base roster is fixed at startup. Extra players (added by hand or
/// merged in from an import) are kept in insertion order so a ranking reset
/// can append them after the base order.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    base: Vec<Player>,
    extras: Vec<Player>,
    /// id -> (is_extra, index into the matching list)
    index: HashMap<String, (bool, usize)>,
    lookup: IdLookup,
}

impl PlayerDirectory {
    /// Build a directory from the seeded base roster. Later duplicates of an
    /// id are ignored.
    pub fn new(base_players: Vec<Player>) -> Self {
        let mut dir = PlayerDirectory::default();
        for player in base_players {
            if dir.index.contains_key(&player.id) {
                warn!("duplicate base player id '{}' ignored", player.id);
                continue;
            }
            dir.index.insert(player.id.clone(), (false, dir.base.len()));
            dir.base.push(player);
        }
        dir
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.index.get(id).map(|&(is_extra, i)| {
            if is_extra {
                &self.extras[i]
            } else {
                &self.base[i]
            }
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a player, if known.
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.get(id).map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.base.len() + self.extras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn base_players(&self) -> &[Player] {
        &self.base
    }

    pub fn extra_players(&self) -> &[Player] {
        &self.extras
    }

    /// Every known id, for slug disambiguation.
    pub fn taken_ids(&self) -> HashSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Register a new player under a slug derived from `name`.
    ///
    /// Returns the new id, or `None` if the trimmed name is empty.
    pub fn add_player(&mut self, name: &str, position: Position) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = unique_id_from_name(name, &self.taken_ids());
        self.insert_extra(Player::new(id.clone(), name, position));
        debug!(id = %id, %position, "added player");
        Some(id)
    }

    /// Merge imported players into the extras. Players whose id is already
    /// known keep their existing record. Returns how many were added.
    pub fn merge_players<I>(&mut self, players: I) -> usize
    where
        I: IntoIterator<Item = Player>,
    {
        let mut added = 0;
        for player in players {
            if self.contains(&player.id) {
                continue;
            }
            self.insert_extra(player);
            added += 1;
        }
        added
    }

    fn insert_extra(&mut self, player: Player) {
        self.index.insert(player.id.clone(), (true, self.extras.len()));
        self.extras.push(player);
    }

    /// Replace the headshot lookup table.
    pub fn set_lookup(&mut self, lookup: IdLookup) {
        self.lookup = lookup;
    }

    /// Display image URL for a player.
    ///
    /// A lookup hit on the normalized name wins; otherwise the player's own
    /// image reference is used, if any.
    pub fn image_url(&self, id: &str) -> Option<String> {
        let player = self.get(id)?;
        match self.lookup.get(&headshot::normalize_name(&player.name)) {
            Some(image_id) => headshot::headshot_url(image_id),
            None => player
                .image_ref
                .as_ref()
                .filter(|r| !r.is_empty())
                .cloned(),
        }
    }

    /// The default ranking: base roster order followed by extras in the
    /// order they were added.
    pub fn default_ranking(&self) -> Vec<String> {
        self.base
            .iter()
            .chain(self.extras.iter())
            .map(|p| p.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<Player> {
        vec![
            Player::new("josh-allen", "Josh Allen", Position::QB),
            Player::new("bijan-robinson", "Bijan Robinson", Position::RB),
        ]
    }

    #[test]
    fn lookup_by_id() {
        let dir = PlayerDirectory::new(base());
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get("josh-allen").unwrap().name, "Josh Allen");
        assert_eq!(dir.position_of("bijan-robinson"), Some(Position::RB));
        assert!(dir.get("nobody").is_none());
    }

    #[test]
    fn duplicate_base_ids_keep_first() {
        let mut players = base();
        players.push(Player::new("josh-allen", "Other Josh", Position::TE));
        let dir = PlayerDirectory::new(players);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.position_of("josh-allen"), Some(Position::QB));
    }

    #[test]
    fn add_player_disambiguates_against_base() {
        let mut dir = PlayerDirectory::new(base());
        let id = dir.add_player("  Josh Allen ", Position::QB).unwrap();
        assert_eq!(id, "josh-allen-2");
        assert_eq!(dir.get(&id).unwrap().name, "Josh Allen");
        assert_eq!(dir.extra_players().len(), 1);
    }

    #[test]
    fn add_player_rejects_blank_name() {
        let mut dir = PlayerDirectory::new(base());
        assert_eq!(dir.add_player("   ", Position::WR), None);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn merge_keeps_existing_records() {
        let mut dir = PlayerDirectory::new(base());
        let added = dir.merge_players(vec![
            Player::new("josh-allen", "Imported Josh", Position::QB),
            Player::new("new-guy", "New Guy", Position::TE),
        ]);
        assert_eq!(added, 1);
        assert_eq!(dir.get("josh-allen").unwrap().name, "Josh Allen");
        assert_eq!(dir.position_of("new-guy"), Some(Position::TE));
    }

    #[test]
    fn default_ranking_appends_extras() {
        let mut dir = PlayerDirectory::new(base());
        dir.add_player("Sam LaPorta", Position::TE);
        assert_eq!(
            dir.default_ranking(),
            vec!["josh-allen", "bijan-robinson", "sam-laporta"]
        );
    }

    #[test]
    fn image_url_prefers_lookup_then_own_ref() {
        let mut players = base();
        players[1].image_ref = Some("https://img.example/bijan.png".into());
        let mut dir = PlayerDirectory::new(players);

        assert_eq!(
            dir.image_url("bijan-robinson").as_deref(),
            Some("https://img.example/bijan.png")
        );
        assert_eq!(dir.image_url("josh-allen"), None);

        let mut lookup = IdLookup::new();
        lookup.insert("josh allen".into(), "3918298".into());
        dir.set_lookup(lookup);
        assert_eq!(
            dir.image_url("josh-allen").as_deref(),
            Some("https://a.espncdn.com/i/headshots/nfl/players/full/3918298.png")
        );
    }
}
