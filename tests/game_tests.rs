//! Game loop, auto-battle and record tests with the built-in agents.

use std::sync::Arc;

use grid_tactics::agents::{HeuristicPlayer, MctsPlayer, MinimaxPlayer, RandomPlayer};
use grid_tactics::core::{Board, GameError, Team};
use grid_tactics::eval::MaterialEvaluator;
use grid_tactics::game::{auto_battle, BattleConfig, GameManager, GameRecord, ManagerConfig, Player};
use grid_tactics::mcts::{MCTSConfig, UndoBackend};
use grid_tactics::rules::outcome;

fn skirmish() -> Board {
    Board::from_map_str(include_str!("../maps/skirmish.map")).unwrap()
}

fn short_skirmish() -> Board {
    skirmish().with_turn_limit(6)
}

#[test]
fn test_random_vs_heuristic_finishes() {
    let mut manager = GameManager::new(skirmish(), Box::new(RandomPlayer::new(1)), Box::new(HeuristicPlayer::new(2)));
    let summary = manager.play().unwrap();

    assert_eq!(outcome(manager.board()), Some(summary.result));
    assert!(summary.turns <= manager.board().turn_limit());
    assert_eq!(summary.actions, manager.record().len());
    assert_eq!(summary.remaining_hp[Team::Red], manager.board().total_hp(Team::Red));
}

#[test]
fn test_record_replays_to_final_board() {
    let mut manager = GameManager::new(
        short_skirmish(),
        Box::new(HeuristicPlayer::new(5)),
        Box::new(MinimaxPlayer::new(1, Arc::new(MaterialEvaluator::default()))),
    );
    let summary = manager.play().unwrap();
    let record = manager.record().clone();

    assert_eq!(record.result, Some(summary.result));
    assert_eq!(record.replay().unwrap(), *manager.board());

    let decoded = GameRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded.replay().unwrap(), *manager.board());

    let path = std::env::temp_dir().join(format!("grid-tactics-record-{}.bin", std::process::id()));
    record.save(&path).unwrap();
    let loaded = GameRecord::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.len(), record.len());
    assert_eq!(loaded.replay().unwrap(), *manager.board());
}

#[test]
fn test_action_budget_aborts() {
    let config = ManagerConfig::default().with_max_actions(3);
    let mut manager =
        GameManager::new(skirmish(), Box::new(RandomPlayer::new(1)), Box::new(RandomPlayer::new(2))).with_config(config);
    assert!(matches!(manager.play(), Err(GameError::ActionBudget(3))));
}

#[test]
fn test_auto_battle_counts_sum_to_games() {
    let config = BattleConfig::default().with_games(6);
    let stats = auto_battle(&short_skirmish(), &config, |game| {
        let seed = u64::from(game);
        let red: Box<dyn Player> = Box::new(HeuristicPlayer::new(seed));
        let blue: Box<dyn Player> = Box::new(RandomPlayer::new(seed + 100));
        (red, blue)
    })
    .unwrap();

    assert_eq!(stats.games(), 6);
    assert_eq!(stats.red_wins + stats.blue_wins + stats.draws, 6);
    assert!(stats.turn_limit_games <= 6);
    let rates = stats.win_rate(Team::Red) + stats.win_rate(Team::Blue);
    assert!(rates <= 1.0 + 1e-9);
}

#[test]
fn test_mcts_player_completes_game() {
    let config = MCTSConfig::default().with_iterations(30).with_max_rollout_actions(40);
    let mut manager = GameManager::new(
        skirmish().with_turn_limit(3),
        Box::new(MctsPlayer::new(UndoBackend::new(), config)),
        Box::new(HeuristicPlayer::new(4)),
    );
    let summary = manager.play().unwrap();
    assert_eq!(manager.record().replay().unwrap(), *manager.board());
    assert!(summary.turns <= 3);
}
