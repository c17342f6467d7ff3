//! Pure substitution-option search.
//!
//! Given an outgoing on-pitch player, enumerates every legal way a bench
//! player can replace them: directly, or by displacing another on-pitch
//! player into the vacated position. The search is a pure function over the
//! supplied roster snapshots and returns all qualifying combinations in a
//! deterministic order (bench players outer, on-pitch players inner, both in
//! their existing order).

use uuid::Uuid;

use crate::state::roster::Player;

/// One legal substitution for an outgoing player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionOption {
    /// Bench player takes the outgoing player's position as-is.
    Direct {
        /// Bench player entering the pitch.
        incoming: Uuid,
        /// Position they enter on (the outgoing player's position).
        position: String,
    },
    /// Bench player enters by displacing another on-pitch player: `moved`
    /// shifts into the outgoing player's position and the bench player takes
    /// the position `moved` vacated.
    Swap {
        /// Bench player entering the pitch.
        incoming: Uuid,
        /// Position the bench player enters on (vacated by `moved`).
        entry_position: String,
        /// On-pitch player shifting positions to make the swap legal.
        moved: Uuid,
        /// Position `moved` shifts into (the outgoing player's position).
        moved_to: String,
    },
}

/// Compute every legal substitution option for `outgoing`.
///
/// Injured bench players are excluded entirely. An outgoing player without a
/// pitch position yields an empty list; an empty result is a meaningful
/// "no valid substitution", not an error.
pub fn compute_options(
    outgoing: &Player,
    bench: &[&Player],
    on_pitch: &[&Player],
) -> Vec<SubstitutionOption> {
    let Some(target) = outgoing.position.as_deref() else {
        return Vec::new();
    };

    let mut options = Vec::new();
    for candidate in bench {
        if candidate.injured || candidate.is_on_pitch() {
            continue;
        }
        if candidate.can_play(target) {
            options.push(SubstitutionOption::Direct {
                incoming: candidate.id,
                position: target.to_string(),
            });
            continue;
        }
        // Not directly eligible: look for an on-pitch player who can shift
        // into the vacated position while freeing one the candidate can play.
        for pivot in on_pitch {
            if pivot.id == outgoing.id || pivot.injured {
                continue;
            }
            let Some(pivot_position) = pivot.position.as_deref() else {
                continue;
            };
            if pivot_position == target {
                continue;
            }
            if pivot.can_play(target) && candidate.can_play(pivot_position) {
                options.push(SubstitutionOption::Swap {
                    incoming: candidate.id,
                    entry_position: pivot_position.to_string(),
                    moved: pivot.id,
                    moved_to: target.to_string(),
                });
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, position: Option<&str>, eligible: &[&str]) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            jersey_number: None,
            injured: false,
            fill_in: false,
            eligible_positions: eligible.iter().map(|p| p.to_string()).collect(),
            position: position.map(str::to_string),
            seconds_played: 0,
            entered_at: position.map(|_| 0),
        }
    }

    #[test]
    fn keeper_example_yields_one_direct_and_no_swap() {
        // Roster: GK out, CB on pitch, bench of a CB-only and a GK-only player.
        let keeper = player("keeper", Some("GK"), &[]);
        let centre_back = player("centre back", Some("CB"), &["CB"]);
        let bench_cb = player("bench cb", None, &["CB"]);
        let bench_gk = player("bench gk", None, &["GK"]);

        let on_pitch = vec![&keeper, &centre_back];
        let bench = vec![&bench_cb, &bench_gk];
        let options = compute_options(&keeper, &bench, &on_pitch);

        // The CB-only bench player cannot enter: the on-pitch CB is not
        // eligible for GK, so no swap chain exists either.
        assert_eq!(
            options,
            vec![SubstitutionOption::Direct {
                incoming: bench_gk.id,
                position: "GK".into(),
            }]
        );
    }

    #[test]
    fn wildcard_bench_player_is_a_direct_candidate() {
        let outgoing = player("out", Some("ST"), &["ST"]);
        let anyone = player("anyone", None, &[]);
        let options = compute_options(&outgoing, &[&anyone], &[&outgoing]);
        assert_eq!(
            options,
            vec![SubstitutionOption::Direct {
                incoming: anyone.id,
                position: "ST".into(),
            }]
        );
    }

    #[test]
    fn injured_bench_players_are_excluded() {
        let outgoing = player("out", Some("ST"), &[]);
        let mut hurt = player("hurt", None, &[]);
        hurt.injured = true;
        assert!(compute_options(&outgoing, &[&hurt], &[&outgoing]).is_empty());
    }

    #[test]
    fn benched_outgoing_player_yields_empty() {
        let outgoing = player("out", None, &[]);
        let sub = player("sub", None, &[]);
        assert!(compute_options(&outgoing, &[&sub], &[]).is_empty());
    }

    #[test]
    fn swap_chain_found_through_eligible_pivot() {
        // Outgoing winger; bench player can only play CM; the on-pitch CM can
        // cover the wing, so the bench player enters at CM.
        let winger = player("winger", Some("RW"), &["RW"]);
        let midfielder = player("midfielder", Some("CM"), &["CM", "RW"]);
        let bench = player("bench", None, &["CM"]);

        let options = compute_options(&winger, &[&bench], &[&winger, &midfielder]);
        assert_eq!(
            options,
            vec![SubstitutionOption::Swap {
                incoming: bench.id,
                entry_position: "CM".into(),
                moved: midfielder.id,
                moved_to: "RW".into(),
            }]
        );
    }

    #[test]
    fn direct_candidates_do_not_also_produce_swaps() {
        let outgoing = player("out", Some("RW"), &["RW"]);
        let midfielder = player("mid", Some("CM"), &["CM", "RW"]);
        // Eligible both directly and via the pivot; only the direct option is
        // returned.
        let bench = player("bench", None, &["RW", "CM"]);

        let options = compute_options(&outgoing, &[&bench], &[&outgoing, &midfielder]);
        assert_eq!(
            options,
            vec![SubstitutionOption::Direct {
                incoming: bench.id,
                position: "RW".into(),
            }]
        );
    }

    #[test]
    fn enumeration_order_is_bench_outer_pitch_inner() {
        let outgoing = player("out", Some("RW"), &["RW"]);
        let pivot_a = player("pivot a", Some("CM"), &["CM", "RW"]);
        let pivot_b = player("pivot b", Some("LB"), &["LB", "RW"]);
        let bench_one = player("bench one", None, &["CM", "LB"]);
        let bench_two = player("bench two", None, &["RW"]);

        let on_pitch = vec![&outgoing, &pivot_a, &pivot_b];
        let bench = vec![&bench_one, &bench_two];
        let options = compute_options(&outgoing, &bench, &on_pitch);

        assert_eq!(
            options,
            vec![
                SubstitutionOption::Swap {
                    incoming: bench_one.id,
                    entry_position: "CM".into(),
                    moved: pivot_a.id,
                    moved_to: "RW".into(),
                },
                SubstitutionOption::Swap {
                    incoming: bench_one.id,
                    entry_position: "LB".into(),
                    moved: pivot_b.id,
                    moved_to: "RW".into(),
                },
                SubstitutionOption::Direct {
                    incoming: bench_two.id,
                    position: "RW".into(),
                },
            ]
        );
    }
}
