//! Seating: who plays X, who plays O, and who watches.

use ultimate_game::Role;

use crate::LobbyConfig;

/// A member of a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub role: Role,
}

/// The result of [`assign_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Seat(Role),
    Rejected,
}

/// Picks a role for the next joiner.
///
/// Seats go by vacancy rather than by head count: X if nobody holds X,
/// else O if nobody holds O. With both taken the joiner becomes a
/// spectator if `policy` admits one, and is rejected otherwise.
pub fn assign_role(roster: &[Player], policy: &LobbyConfig) -> Admission {
    let holds = |role: Role| roster.iter().any(|p| p.role == role);

    if !holds(Role::X) {
        return Admission::Seat(Role::X);
    }
    if !holds(Role::O) {
        return Admission::Seat(Role::O);
    }

    let spectators = roster.iter().filter(|p| p.role == Role::Spectator).count();
    if policy.admits_spectator(spectators) {
        Admission::Seat(Role::Spectator)
    } else {
        Admission::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, role: Role) -> Player {
        Player {
            name: name.to_string(),
            role,
        }
    }

    #[test]
    fn test_first_two_get_x_then_o() {
        let policy = LobbyConfig::default();
        assert_eq!(assign_role(&[], &policy), Admission::Seat(Role::X));
        assert_eq!(
            assign_role(&[player("a", Role::X)], &policy),
            Admission::Seat(Role::O)
        );
    }

    #[test]
    fn test_third_rejected_by_default() {
        let roster = [player("a", Role::X), player("b", Role::O)];
        assert_eq!(assign_role(&roster, &LobbyConfig::default()), Admission::Rejected);
    }

    #[test]
    fn test_vacated_x_is_refilled() {
        // X left; one O remains. The next joiner must get X, not a second O.
        let roster = [player("b", Role::O)];
        assert_eq!(
            assign_role(&roster, &LobbyConfig::default()),
            Admission::Seat(Role::X)
        );
    }

    #[test]
    fn test_spectators_when_allowed() {
        let policy = LobbyConfig {
            allow_spectators: true,
            max_spectators: 1,
            ..LobbyConfig::default()
        };
        let mut roster = vec![player("a", Role::X), player("b", Role::O)];
        assert_eq!(assign_role(&roster, &policy), Admission::Seat(Role::Spectator));

        roster.push(player("c", Role::Spectator));
        assert_eq!(assign_role(&roster, &policy), Admission::Rejected);
    }

    #[test]
    fn test_seat_freed_while_spectating_goes_to_next_joiner() {
        let policy = LobbyConfig {
            allow_spectators: true,
            ..LobbyConfig::default()
        };
        let roster = [player("b", Role::O), player("c", Role::Spectator)];
        assert_eq!(assign_role(&roster, &policy), Admission::Seat(Role::X));
    }
}
