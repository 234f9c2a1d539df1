use sevens_core::game::round::{RoundConfig, RoundPhase, RoundResult, RoundState, TurnAction};
use sevens_core::model::card::Card;
use sevens_core::model::deck::Deck;
use sevens_core::model::hand::Hand;
use sevens_core::model::player::PlayerId;
use sevens_core::model::rules::{is_playable, playable_indices};
use sevens_core::model::table::TableState;
use sevens_core::strategy::{Selection, Strategy};

/// Plays the highest-indexed legal card, or passes every `pass_every`-th turn
/// even when it could play.
struct Stubborn {
    turn: usize,
    pass_every: usize,
}

impl Strategy for Stubborn {
    fn initialize(&mut self, _player: PlayerId) {
        self.turn = 0;
    }

    fn select_card(&mut self, hand: &Hand, table: &TableState) -> Selection {
        self.turn += 1;
        if self.pass_every > 0 && self.turn % self.pass_every == 0 {
            return Selection::Pass;
        }
        playable_indices(hand, table)
            .last()
            .copied()
            .map_or(Selection::Pass, Selection::Play)
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

fn seats(players: usize, pass_every: usize) -> Vec<Box<dyn Strategy>> {
    (0..players)
        .map(|_| {
            Box::new(Stubborn {
                turn: 0,
                pass_every,
            }) as Box<dyn Strategy>
        })
        .collect()
}

fn cards_in_play(round: &RoundState) -> usize {
    round.hands().iter().map(Hand::len).sum::<usize>() + round.table().face_up_count()
}

#[test]
fn every_dealt_round_conserves_cards_and_terminates() {
    for seed in 0..40u64 {
        for players in [2usize, 3, 4, 6] {
            let deck = Deck::shuffled_with_seed(seed);
            let mut round =
                RoundState::deal(&deck, players, Card::DEFAULT_ANCHOR, RoundConfig::default())
                    .expect("deal");
            let mut strategies = seats(players, (seed % 4) as usize);
            let mut face_up = round.table().face_up_count();

            while !round.phase().is_terminal() {
                let before = *round.table();
                let report = round.step(&mut strategies).expect("step");
                assert_eq!(cards_in_play(&round), 52);

                match report.action {
                    TurnAction::Played(card) => {
                        assert!(is_playable(card, &before), "{card} was not legal");
                        assert_eq!(round.table().face_up_count(), face_up + 1);
                    }
                    TurnAction::Passed(_) => {
                        assert_eq!(round.table().face_up_count(), face_up);
                    }
                }
                face_up = round.table().face_up_count();
                assert!(round.turns() < 10_000, "round failed to terminate");
            }

            let outcome = round.outcome().expect("terminal round has an outcome");
            match outcome.result {
                RoundResult::Resolved { winner } => {
                    assert_eq!(round.phase(), RoundPhase::Resolved { winner });
                    assert_eq!(outcome.remaining[winner.index()], 0);
                    assert_eq!(
                        outcome.remaining.iter().filter(|&&left| left == 0).count(),
                        1
                    );
                }
                RoundResult::Blocked => {
                    assert!(outcome.remaining.iter().all(|&left| left > 0));
                }
            }
            assert_eq!(outcome.plays + outcome.passes, outcome.turns);
        }
    }
}

#[test]
fn finished_round_rejects_further_steps() {
    let deck = Deck::shuffled_with_seed(3);
    let mut round =
        RoundState::deal(&deck, 3, Card::DEFAULT_ANCHOR, RoundConfig::default()).expect("deal");
    let mut strategies = seats(3, 0);
    round.run(&mut strategies).expect("run");
    assert!(round.step(&mut strategies).is_err());
}
