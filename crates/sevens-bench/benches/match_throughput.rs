use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sevens_bot::registry::StrategyRegistry;
use sevens_core::game::match_state::{MatchConfig, MatchEngine};
use sevens_core::model::player::PlayerId;

fn play_match(registry: &StrategyRegistry, players: usize, seed: u64) -> usize {
    let mut engine = MatchEngine::new(MatchConfig::default().with_seed(seed));
    for player in PlayerId::range(players) {
        let locator = if player.index() % 2 == 0 {
            "greedy".to_string()
        } else {
            format!("random?seed={}", seed ^ player.index() as u64)
        };
        let strategy = registry.create(&locator).expect("builtin strategy");
        engine.register_strategy(player, strategy);
    }
    engine.play_match(players).expect("match completes").rounds as usize
}

fn match_throughput(c: &mut Criterion) {
    let registry = StrategyRegistry::with_builtins();
    let mut group = c.benchmark_group("match_throughput");
    for players in [2usize, 4, 7] {
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &players| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(play_match(&registry, players, seed))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, match_throughput);
criterion_main!(benches);
