//! Placement resolution over playoff bracket match lists.
//!
//! The winners bracket yields the trophy case (1st/2nd/3rd), the losers
//! bracket the toilet bowl (last/second-to-last/third-to-last). Both walk
//! the same edge structure; the losers-bracket derivation is the mirror
//! image of the winners-bracket one.

use crate::{BracketMatch, BracketSource, Placements};

fn both_from_winners(m: &BracketMatch) -> bool {
    matches!(m.t1, Some(BracketSource::Winner(_))) && matches!(m.t2, Some(BracketSource::Winner(_)))
}

fn both_from_losers(m: &BracketMatch) -> bool {
    matches!(m.t1, Some(BracketSource::Loser(_))) && matches!(m.t2, Some(BracketSource::Loser(_)))
}

/// Derive 1st/2nd/3rd place from a season's winners bracket.
///
/// The finals is the match fed by both semifinal winners that has a decided
/// winner and loser. Third place comes from the consolation match fed by
/// both semifinal losers; when several qualify, the numerically largest
/// match id wins the tie-break (the highest-seeded consolation match is
/// scheduled last).
///
/// Returns `None` when the bracket is empty or nothing is decided yet, so
/// that bracket-less seasons produce no placement entry at all.
pub fn resolve_winners(matches: &[BracketMatch]) -> Option<Placements> {
    if matches.is_empty() {
        return None;
    }

    let mut placements = Placements::default();

    if let Some(finals) = matches
        .iter()
        .find(|m| both_from_winners(m) && m.winner.is_some() && m.loser.is_some())
    {
        placements.first = finals.winner;
        placements.second = finals.loser;
    }

    placements.third = matches
        .iter()
        .filter(|m| both_from_losers(m) && m.winner.is_some())
        .max_by_key(|m| m.match_id)
        .and_then(|m| m.winner);

    (!placements.is_empty()).then_some(placements)
}

/// Derive last/second-to-last/third-to-last from a season's losers bracket.
///
/// Symmetric to [`resolve_winners`]: the losers final is the match fed by
/// both semifinal losers with a decided outcome, and its *loser* finishes
/// last overall. Third-to-last is the *loser* of the max-match-id
/// consolation candidate, the final itself excluded.
pub fn resolve_losers(matches: &[BracketMatch]) -> Option<Placements> {
    if matches.is_empty() {
        return None;
    }

    let mut placements = Placements::default();

    let final_match = matches
        .iter()
        .find(|m| both_from_losers(m) && m.winner.is_some() && m.loser.is_some());

    if let Some(fin) = final_match {
        placements.first = fin.loser;
        placements.second = fin.winner;
    }

    let final_id = final_match.map(|m| m.match_id);
    placements.third = matches
        .iter()
        .filter(|m| both_from_losers(m) && m.winner.is_some() && Some(m.match_id) != final_id)
        .max_by_key(|m| m.match_id)
        .and_then(|m| m.loser);

    (!placements.is_empty()).then_some(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BracketSource::{Loser, Winner};

    fn m(
        match_id: u32,
        t1: Option<BracketSource>,
        t2: Option<BracketSource>,
        winner: Option<u32>,
        loser: Option<u32>,
    ) -> BracketMatch {
        BracketMatch {
            round: 2,
            match_id,
            winner,
            loser,
            t1,
            t2,
        }
    }

    #[test]
    fn winners_bracket_finals_and_max_id_consolation() {
        // Finals fed by both semifinal winners; two consolation candidates
        // fed by both semifinal losers. Highest match id takes third.
        let bracket = vec![
            m(3, Some(Winner(1)), Some(Winner(2)), Some(10), Some(20)),
            m(5, Some(Loser(1)), Some(Loser(2)), Some(30), None),
            m(7, Some(Loser(1)), Some(Loser(2)), Some(40), None),
        ];
        let p = resolve_winners(&bracket).unwrap();
        assert_eq!(p.first, Some(10));
        assert_eq!(p.second, Some(20));
        assert_eq!(p.third, Some(40));
    }

    #[test]
    fn winners_bracket_without_consolation_match() {
        let bracket = vec![m(3, Some(Winner(1)), Some(Winner(2)), Some(10), Some(20))];
        let p = resolve_winners(&bracket).unwrap();
        assert_eq!(p.first, Some(10));
        assert_eq!(p.second, Some(20));
        assert_eq!(p.third, None);
    }

    #[test]
    fn undecided_winners_bracket_yields_nothing() {
        // Finals scheduled but not played: no winner/loser recorded.
        let bracket = vec![m(3, Some(Winner(1)), Some(Winner(2)), None, None)];
        assert_eq!(resolve_winners(&bracket), None);
    }

    #[test]
    fn empty_bracket_yields_no_entry() {
        assert_eq!(resolve_winners(&[]), None);
        assert_eq!(resolve_losers(&[]), None);
    }

    #[test]
    fn losers_bracket_is_the_mirror_image() {
        // Losers final decides last and second-to-last; the max-id
        // consolation candidate's loser is third-to-last.
        let bracket = vec![
            m(1, Some(Loser(1)), Some(Loser(2)), Some(5), Some(6)),
            m(3, Some(Loser(3)), Some(Loser(4)), Some(9), Some(7)),
            m(9, Some(Loser(5)), Some(Loser(6)), Some(11), Some(8)),
        ];
        let p = resolve_losers(&bracket).unwrap();
        assert_eq!(p.first, Some(6));
        assert_eq!(p.second, Some(5));
        assert_eq!(p.third, Some(8));
    }

    #[test]
    fn losers_final_is_not_its_own_consolation_candidate() {
        // The final has the largest match id here; third-to-last must still
        // come from the remaining candidate, not the final itself.
        let bracket = vec![
            m(9, Some(Loser(1)), Some(Loser(2)), Some(5), Some(6)),
            m(3, Some(Loser(3)), Some(Loser(4)), Some(9), Some(7)),
        ];
        let p = resolve_losers(&bracket).unwrap();
        assert_eq!(p.first, Some(6));
        assert_eq!(p.second, Some(5));
        assert_eq!(p.third, Some(7));
    }

    #[test]
    fn direct_roster_seeds_do_not_qualify_as_finals() {
        // First-round matches are seeded directly and must never be read as
        // a finals pairing even when decided.
        let bracket = vec![
            m(1, Some(BracketSource::Roster(1)), Some(BracketSource::Roster(4)), Some(1), Some(4)),
            m(2, Some(BracketSource::Roster(2)), Some(BracketSource::Roster(3)), Some(3), Some(2)),
        ];
        assert_eq!(resolve_winners(&bracket), None);
    }
}
