//! Per-game bookkeeping for a playing room.

use scrawl_protocol::{Modifier, Player, PlayerId, RoomSettings, TaskKind};

/// A player's starting slot, fixed for the whole game.
///
/// Name and avatar are copied at game start so a seat can still be filled
/// in after its player has left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player_id: PlayerId,
    pub name: String,
    pub avatar: String,
}

impl From<&Player> for Seat {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            avatar: player.avatar.clone(),
        }
    }
}

/// Whether a step is accepting submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tasks are out and the countdown is running.
    Collecting,
    /// Between steps, waiting for the next one to start.
    Paused,
}

/// The state of one game in one room.
#[derive(Debug, Clone)]
pub struct Round {
    pub seats: Vec<Seat>,
    /// Zero-based current step.
    pub step: usize,
    /// Always equal to the seat count: one full rotation.
    pub total_steps: usize,
    /// `submitted[seat]` is set once that seat's chain got this step's
    /// entry.
    submitted: Vec<bool>,
    /// One entry per step when modifiers are enabled.
    pub modifier_plan: Option<Vec<Option<Modifier>>>,
    pub phase: Phase,
}

impl Round {
    /// Starts a game at step 0. Submissions open with
    /// [`begin_step`](Self::begin_step).
    pub fn new(seats: Vec<Seat>, modifier_plan: Option<Vec<Option<Modifier>>>) -> Self {
        let total_steps = seats.len();
        Self {
            submitted: vec![false; total_steps],
            seats,
            step: 0,
            total_steps,
            modifier_plan,
            phase: Phase::Paused,
        }
    }

    /// Clears submissions and opens the current step.
    pub fn begin_step(&mut self) {
        self.submitted.iter_mut().for_each(|s| *s = false);
        self.phase = Phase::Collecting;
    }

    /// Closes the current step and moves to the next one.
    ///
    /// Returns `true` if that was the last step.
    pub fn advance(&mut self) -> bool {
        self.phase = Phase::Paused;
        self.step += 1;
        self.step >= self.total_steps
    }

    pub fn is_collecting(&self) -> bool {
        self.phase == Phase::Collecting
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player_id == player_id)
    }

    /// The chain a seat works on this step: `(seat + step) mod N`.
    pub fn chain_for(&self, seat: usize) -> usize {
        (seat + self.step) % self.seats.len()
    }

    pub fn task_kind(&self) -> TaskKind {
        TaskKind::for_step(self.step)
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        self.modifier_plan
            .as_ref()
            .and_then(|plan| plan.get(self.step))
            .and_then(Option::as_ref)
    }

    /// Seconds allowed for this step: the draw time on drawing steps,
    /// the guess time otherwise. Modifiers never change it.
    pub fn time_limit(&self, settings: &RoomSettings) -> u32 {
        if self.task_kind().is_drawing() {
            settings.draw_time
        } else {
            settings.guess_time
        }
    }

    pub fn has_submitted(&self, seat: usize) -> bool {
        self.submitted.get(seat).copied().unwrap_or(false)
    }

    pub fn mark_submitted(&mut self, seat: usize) {
        if let Some(slot) = self.submitted.get_mut(seat) {
            *slot = true;
        }
    }

    /// Seats that have not submitted this step.
    pub fn pending_seats(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.seats.len()).filter(|&seat| !self.submitted[seat])
    }

    /// `(submitted, total)` over the seats whose players are still
    /// present.
    pub fn progress(&self, is_present: impl Fn(PlayerId) -> bool) -> (usize, usize) {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| is_present(seat.player_id))
            .fold((0, 0), |(done, total), (i, _)| {
                (done + usize::from(self.submitted[i]), total + 1)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(n: u64) -> Vec<Seat> {
        (0..n)
            .map(|i| Seat {
                player_id: PlayerId(i),
                name: format!("p{i}"),
                avatar: "🐱".into(),
            })
            .collect()
    }

    fn settings() -> RoomSettings {
        RoomSettings {
            draw_time: 60,
            guess_time: 45,
            mode: "classic".into(),
            modifiers: true,
            max_players: 10,
            rounds: 1,
        }
    }

    #[test]
    fn test_every_seat_visits_every_chain_once() {
        for n in 3..9 {
            let mut round = Round::new(seats(n), None);
            let mut visits = vec![vec![0; n as usize]; n as usize];
            loop {
                for seat in 0..n as usize {
                    visits[seat][round.chain_for(seat)] += 1;
                }
                if round.advance() {
                    break;
                }
            }
            assert!(visits.iter().flatten().all(|&v| v == 1), "n = {n}");
        }
    }

    #[test]
    fn test_time_limit_by_parity() {
        let mut round = Round::new(seats(4), None);
        assert_eq!(round.time_limit(&settings()), 45);
        round.advance();
        assert_eq!(round.time_limit(&settings()), 60);
        round.advance();
        assert_eq!(round.time_limit(&settings()), 45);
    }

    #[test]
    fn test_speed_step_keeps_draw_time() {
        let speed = Modifier {
            id: "speed".into(),
            name: "Bomb".into(),
            icon: "💣".into(),
            description: "Only 15 seconds!".into(),
            color: None,
        };
        let mut round = Round::new(seats(3), Some(vec![None, Some(speed), None]));
        round.advance();
        assert_eq!(round.modifier().map(|m| m.id.as_str()), Some("speed"));
        assert_eq!(round.time_limit(&settings()), settings().draw_time);

        let mut slow = settings();
        slow.draw_time = 90;
        assert_eq!(round.time_limit(&slow), 90);
    }

    #[test]
    fn test_progress_counts_present_seats_only() {
        let mut round = Round::new(seats(4), None);
        round.begin_step();
        round.mark_submitted(0);
        round.mark_submitted(3);

        assert_eq!(round.progress(|_| true), (2, 4));
        assert_eq!(round.progress(|id| id != PlayerId(3)), (1, 3));
        assert_eq!(round.pending_seats().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_begin_step_resets_submissions() {
        let mut round = Round::new(seats(3), None);
        round.begin_step();
        round.mark_submitted(1);
        assert!(round.has_submitted(1));

        round.advance();
        assert!(!round.is_collecting());
        round.begin_step();
        assert!(round.is_collecting());
        assert!(!round.has_submitted(1));
    }
}
