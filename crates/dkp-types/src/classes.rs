//! Class keyword taxonomy
//!
//! Players ask for coarse groups ("cloth", "tank") as often as for a concrete
//! class. A keyword expands to the concrete class names it covers; anything
//! not in the table expands to itself so plain class names pass through.

/// Concrete class names covered by a group keyword, `None` for unknown keywords.
fn group_members(keyword: &str) -> Option<&'static [&'static str]> {
    let members: &'static [&'static str] = match keyword {
        "cloth" => &["enchanter", "magician", "necromancer", "wizard"],
        "leather" => &["beastlord", "druid", "monk"],
        "chain" => &["berserker", "ranger", "rogue", "shaman"],
        "plate" => &["bard", "cleric", "paladin", "shadow knight", "warrior"],
        "priest" => &["cleric", "druid", "shaman"],
        "melee" => &[
            "bard",
            "beastlord",
            "berserker",
            "monk",
            "paladin",
            "ranger",
            "rogue",
            "shadow knight",
            "warrior",
        ],
        "fist" => &["beastlord", "monk"],
        "thief" => &["bard", "rogue"],
        "knight" => &["paladin", "shadow knight"],
        "deathtouch" => &["ranger"],
        "tank" => &["warrior", "paladin", "shadow knight"],
        _ => return None,
    };
    Some(members)
}

/// Set of lower-cased class names a keyword resolved to. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSet {
    classes: Vec<String>,
}

impl ClassSet {
    /// Expand a keyword (case-insensitive, surrounding whitespace ignored).
    pub fn expand(keyword: &str) -> Self {
        let keyword = keyword.trim().to_lowercase();
        let classes = match group_members(&keyword) {
            Some(members) => members.iter().map(|c| c.to_string()).collect(),
            None => vec![keyword],
        };
        Self { classes }
    }

    /// Whether `class` (any case, untrimmed) belongs to the set.
    pub fn contains(&self, class: &str) -> bool {
        let class = class.trim().to_lowercase();
        self.classes.iter().any(|c| *c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
