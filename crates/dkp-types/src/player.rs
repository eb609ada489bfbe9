//! Player records assembled from the roster and ledger sheets

use serde::{Deserialize, Serialize};

/// One guild member as seen by a single lookup.
///
/// Built fresh per call and dropped once the response is formatted. An empty
/// `name` means the player was not found on the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display-cased name as written on the roster
    pub name: String,
    /// Lower-cased class name
    pub class: String,
    pub rank: String,
    pub level: String,
    /// Free text copied from the ledger
    pub last_raid: String,
    /// Free text attendance ratio copied from the ledger
    pub attendance: String,
    pub points: u64,
}

impl Player {
    /// Identity key: trimmed, lower-cased name.
    pub fn identity(&self) -> String {
        identity_key(&self.name)
    }

    /// Whether the roster had a row for this player.
    pub fn is_known(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Identity key for an arbitrary name cell.
pub fn identity_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered players sharing a class keyword. Insertion order until ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGroup {
    players: Vec<Player>,
}

impl PlayerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    /// First player whose identity key matches `name`'s.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Player> {
        let key = identity_key(name);
        self.players.iter_mut().find(|p| p.identity() == key)
    }

    /// Sort by points, highest first. Ties keep their current order.
    pub fn rank_by_points(&mut self) {
        self.players.sort_by(|a, b| b.points.cmp(&a.points));
    }

    pub fn ranked(mut self) -> Self {
        self.rank_by_points();
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}

impl FromIterator<Player> for PlayerGroup {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PlayerGroup {
    type Item = Player;
    type IntoIter = std::vec::IntoIter<Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlayerGroup {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

/// Capitalize the first letter of every space-separated word, lower-case the rest.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Normalize user input to the form names are written in on the roster.
pub fn canonical_name(s: &str) -> String {
    title_case(s.trim())
}

/// Parse a point total cell. Thousands separators are stripped; anything that
/// is not a non-negative integer counts as zero.
pub fn parse_points(cell: &str) -> u64 {
    cell.trim().replace(',', "").parse::<u64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, points: u64) -> Player {
        Player {
            name: name.to_string(),
            points,
            ..Player::default()
        }
    }

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("gRUK"), "Gruk");
        assert_eq!(title_case("shadow knight"), "Shadow Knight");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_canonical_name_trims() {
        assert_eq!(canonical_name("  light  "), "Light");
    }

    #[test]
    fn test_parse_points_strips_commas() {
        assert_eq!(parse_points("1,200"), 1200);
        assert_eq!(parse_points(" 800 "), 800);
    }

    #[test]
    fn test_parse_points_coerces_garbage_to_zero() {
        assert_eq!(parse_points(""), 0);
        assert_eq!(parse_points("n/a"), 0);
        assert_eq!(parse_points("-15"), 0);
        assert_eq!(parse_points("12.5"), 0);
    }

    #[test]
    fn test_identity_is_case_insensitive() {
        assert_eq!(player(" Gruk ", 0).identity(), "gruk");
        assert!(player("Gruk", 0).is_known());
        assert!(!Player::default().is_known());
    }

    #[test]
    fn test_rank_by_points_descending() {
        let group: PlayerGroup = vec![player("Light", 800), player("Gruk", 1200)]
            .into_iter()
            .collect();
        let names: Vec<_> = group.ranked().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Gruk", "Light"]);
    }

    #[test]
    fn test_rank_by_points_is_stable() {
        let group: PlayerGroup = vec![
            player("A", 10),
            player("B", 50),
            player("C", 10),
            player("D", 10),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = group.ranked().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_find_mut_by_identity() {
        let mut group = PlayerGroup::new();
        group.push(player("Gruk", 0));
        group.find_mut("GRUK ").unwrap().points = 5;
        assert_eq!(group.iter().next().unwrap().points, 5);
        assert!(group.find_mut("Nobody").is_none());
    }

    #[test]
    fn test_player_serde() {
        let p = player("Gruk", 1200);
        let json = serde_json::to_string(&p).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
