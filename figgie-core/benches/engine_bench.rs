//! Criterion benchmarks for Figgie hot paths.
//!
//! Benchmarks:
//! 1. Full game (deal, 200-tick ceiling, scoring) at 4 and 5 players
//! 2. Action validation against a quoted book

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use figgie_core::domain::{Action, PlayerId, Suit};
use figgie_core::engine::{execute, run_game, validate, GameState};
use figgie_core::policy::{policy_fn, Policy, View};
use figgie_core::rules::GameRules;

// ── Helpers ──────────────────────────────────────────────────────────

fn random_action(rng: &mut StdRng) -> Action {
    let suit = Suit::ALL[rng.gen_range(0..4)];
    match rng.gen_range(0..5) {
        0 => Action::Pass,
        1 => Action::Bid { suit, price: rng.gen_range(1..30) },
        2 => Action::Ask { suit, price: rng.gen_range(1..30) },
        3 => Action::Buy { suit },
        _ => Action::Sell { suit },
    }
}

fn random_policies(n: usize, seed: u64) -> Vec<Box<dyn Policy>> {
    (0..n)
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed + i as u64);
            Box::new(policy_fn(format!("random{i}"), move |_: &View<'_>| {
                Ok(random_action(&mut rng))
            })) as Box<dyn Policy>
        })
        .collect()
}

// ── 1. Full game ─────────────────────────────────────────────────────

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");
    for players in [4usize, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &n| {
            b.iter(|| {
                let state = GameState::deal(n, GameRules::default(), &mut StdRng::seed_from_u64(7))
                    .expect("valid table");
                let result = run_game(state, random_policies(n, 7), StdRng::seed_from_u64(7), None)
                    .expect("seats match");
                black_box(result.scoring)
            })
        });
    }
    group.finish();
}

// ── 2. Validation ────────────────────────────────────────────────────

fn bench_validate(c: &mut Criterion) {
    let mut state = GameState::deal(4, GameRules::default(), &mut StdRng::seed_from_u64(1))
        .expect("valid table");
    // Quote every suit so validation walks the full rule set.
    for suit in Suit::ALL {
        let bid = Action::Bid { suit, price: 5 };
        if validate(&state, PlayerId(0), &bid).is_ok() {
            execute(&mut state, PlayerId(0), bid);
        }
        let ask = Action::Ask { suit, price: 15 };
        for seat in 1..4 {
            if validate(&state, PlayerId(seat), &ask).is_ok() {
                execute(&mut state, PlayerId(seat), ask);
                break;
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(2);
    let actions: Vec<(PlayerId, Action)> = (0..1024)
        .map(|_| (PlayerId(rng.gen_range(0..4)), random_action(&mut rng)))
        .collect();

    c.bench_function("validate_1024_actions", |b| {
        b.iter(|| {
            actions
                .iter()
                .filter(|(player, action)| validate(&state, *player, action).is_ok())
                .count()
        })
    });
}

criterion_group!(benches, bench_full_game, bench_validate);
criterion_main!(benches);
