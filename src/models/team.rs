//! Team members that tasks can be assigned to.

use serde::{Deserialize, Serialize};

use super::task::UNASSIGNED;

/// Colour used for people who are not configured team members (slate).
pub const FALLBACK_COLOR: Rgb = Rgb(0x64, 0x74, 0x8b);

/// A plain RGB colour, independent of any rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A configured team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    /// Avatar colour as `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TeamMember {
    pub fn new(name: &str, initials: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            initials: Some(initials.to_string()),
            color: Some(color.to_string()),
        }
    }
}

/// The default marketing team.
pub fn default_team() -> Vec<TeamMember> {
    vec![
        TeamMember::new("Rogeria", "Ro", "#003366"),
        TeamMember::new("Tiago", "Ti", "#4682B4"),
        TeamMember::new("Wallace", "Wa", "#006400"),
        TeamMember::new("Novo Colab", "NC", "#DAA520"),
    ]
}

/// Lookup helpers over the configured team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    members: Vec<TeamMember>,
}

impl Default for Team {
    fn default() -> Self {
        Self::new(default_team())
    }
}

impl Team {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn find(&self, name: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Names a task can be assigned to: every member, then the unassigned label.
    pub fn responsible_options(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.name.clone())
            .chain(std::iter::once(UNASSIGNED.to_string()))
            .collect()
    }

    /// Avatar initials for a responsible party.
    pub fn initials_for(&self, name: &str) -> String {
        self.find(name)
            .and_then(|m| m.initials.clone())
            .unwrap_or_else(|| initials_from_name(name))
    }

    /// Avatar colour for a responsible party.
    pub fn color_for(&self, name: &str) -> Rgb {
        self.find(name)
            .and_then(|m| m.color.as_deref())
            .and_then(Rgb::parse_hex)
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// First letter of each word, uppercased, at most two characters.
pub fn initials_from_name(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_from_name() {
        assert_eq!(initials_from_name("Maria Clara Souza"), "MC");
        assert_eq!(initials_from_name("ana"), "A");
        assert_eq!(initials_from_name("Não Atribuído"), "NA");
        assert_eq!(initials_from_name(""), "");
    }

    #[test]
    fn test_known_member_uses_configured_initials_and_color() {
        let team = Team::default();
        assert_eq!(team.initials_for("Novo Colab"), "NC");
        assert_eq!(team.color_for("Wallace"), Rgb(0x00, 0x64, 0x00));
    }

    #[test]
    fn test_unknown_member_falls_back() {
        let team = Team::default();
        assert_eq!(team.initials_for("Joana Dias"), "JD");
        assert_eq!(team.color_for("Joana Dias"), FALLBACK_COLOR);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#DAA520"), Some(Rgb(0xda, 0xa5, 0x20)));
        assert_eq!(Rgb::parse_hex("003366"), Some(Rgb(0x00, 0x33, 0x66)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_responsible_options_end_with_unassigned() {
        let options = Team::default().responsible_options();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0], "Rogeria");
        assert_eq!(options.last().map(String::as_str), Some(UNASSIGNED));
    }
}
