use std::collections::HashMap;

use crate::pgn::GameResult;

/// Win/draw/loss counts for one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticipantTally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl ParticipantTally {
    pub fn total(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

/// Per-participant tallies in order of first appearance.
///
/// Names are compared as written: "Stockfish" and "stockfish " are two
/// different participants.
#[derive(Debug, Clone, Default)]
pub struct Tallies {
    order: Vec<String>,
    by_name: HashMap<String, ParticipantTally>,
}

impl Tallies {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut ParticipantTally {
        if !self.by_name.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.by_name.entry(name.to_string()).or_default()
    }

    /// Fold one game result into both participants' tallies.
    ///
    /// Both names are registered even when the result is not tallied, so
    /// participant order follows the record file.
    pub fn record(&mut self, white: &str, black: &str, result: Option<GameResult>) {
        self.entry(white);
        self.entry(black);

        match result.filter(|result| result.is_final()) {
            Some(GameResult::WhiteWins) => {
                self.entry(white).wins += 1;
                self.entry(black).losses += 1;
            }
            Some(GameResult::BlackWins) => {
                self.entry(white).losses += 1;
                self.entry(black).wins += 1;
            }
            Some(GameResult::Draw) => {
                self.entry(white).draws += 1;
                self.entry(black).draws += 1;
            }
            _ => {}
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantTally> {
        self.by_name.get(name)
    }

    /// Participants in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParticipantTally)> {
        self.order
            .iter()
            .filter_map(move |name| self.by_name.get(name).map(|t| (name.as_str(), t)))
    }

    /// Participants with at least one tallied game
    pub fn tallied(&self) -> impl Iterator<Item = (&str, &ParticipantTally)> {
        self.iter().filter(|(_, tally)| tally.total() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_results_between_two_participants() {
        let mut tallies = Tallies::new();
        tallies.record("A", "B", Some(GameResult::WhiteWins));
        tallies.record("A", "B", Some(GameResult::BlackWins));
        tallies.record("A", "B", Some(GameResult::Draw));

        let expected = ParticipantTally { wins: 1, draws: 1, losses: 1 };
        assert_eq!(tallies.get("A"), Some(&expected));
        assert_eq!(tallies.get("B"), Some(&expected));
    }

    #[test]
    fn test_decisive_result_pairs_win_with_loss() {
        let mut tallies = Tallies::new();
        tallies.record("White", "Black", Some(GameResult::BlackWins));

        assert_eq!(tallies.get("White").unwrap().losses, 1);
        assert_eq!(tallies.get("Black").unwrap().wins, 1);
        let wins: u32 = tallies.iter().map(|(_, t)| t.wins).sum();
        let losses: u32 = tallies.iter().map(|(_, t)| t.losses).sum();
        assert_eq!(wins, losses);
    }

    #[test]
    fn test_untallied_results_register_names_only() {
        let mut tallies = Tallies::new();
        tallies.record("C", "D", Some(GameResult::Unfinished));
        tallies.record("E", "C", None);

        let names: Vec<&str> = tallies.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["C", "D", "E"]);
        assert_eq!(tallies.tallied().count(), 0);
    }

    #[test]
    fn test_names_are_not_normalized() {
        let mut tallies = Tallies::new();
        tallies.record("Engine", "engine", Some(GameResult::Draw));
        assert_eq!(tallies.iter().count(), 2);
        assert_eq!(tallies.get("Engine").unwrap().draws, 1);
        assert_eq!(tallies.get("engine").unwrap().draws, 1);
    }
}
