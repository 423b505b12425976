/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use criterion::{BatchSize, BenchmarkId, Criterion};
use fairseat::prelude::*;
use fairseat::utils::current_time_secs;
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

const EVENT: &str = "Bench Expo";

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

/// An engine with one event of `seat_limit` seats and `users` regular users.
fn setup(rt: &Runtime, seat_limit: u32, users: usize) -> (Arc<RegistrationEngine>, Vec<UserId>) {
    let engine = Arc::new(RegistrationEngine::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(MockPaymentProcessor::new()),
        EngineConfig::default(),
    ));

    rt.block_on(async {
        let club = engine
            .add_user(NewUser::club("bench-club", "bench@upi"))
            .await
            .unwrap();
        let now = current_time_secs();
        engine
            .add_event(NewEvent {
                club_id: club,
                name: EVENT.to_string(),
                location: "Hall A".to_string(),
                categories: vec!["bench".to_string()],
                window: TimeWindow::new(now + 86_400, now + 90_000),
                seat_limit,
                price: 0,
            })
            .unwrap();

        let mut ids = Vec::with_capacity(users);
        for i in 0..users {
            ids.push(
                engine
                    .add_user(NewUser::regular(format!("user{i}")))
                    .await
                    .unwrap(),
            );
        }
        (engine, ids)
    })
}

pub fn bench_register(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("register");

    for users in [100, 1_000] {
        group.bench_with_input(BenchmarkId::new("half_waitlisted", users), &users, |b, &n| {
            b.iter_batched(
                || setup(&rt, (n / 2) as u32, n),
                |(engine, ids)| {
                    rt.block_on(async {
                        for id in ids {
                            black_box(engine.register(EVENT, id).await.ok());
                        }
                    });
                    engine
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

pub fn bench_cancel_cascade(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cancel_cascade");

    for users in [100, 1_000] {
        group.bench_with_input(BenchmarkId::new("cancel_all_confirmed", users), &users, |b, &n| {
            b.iter_batched(
                || {
                    let (engine, ids) = setup(&rt, (n / 2) as u32, n);
                    let confirmed: Vec<RegistrationId> = rt.block_on(async {
                        let mut confirmed = Vec::new();
                        for id in ids {
                            let admission = engine.register(EVENT, id).await.unwrap();
                            if admission.status == RegistrationStatus::Confirmed {
                                confirmed.push(admission.registration_id);
                            }
                        }
                        confirmed
                    });
                    (engine, confirmed)
                },
                |(engine, confirmed)| {
                    for id in confirmed {
                        black_box(engine.cancel(id).ok());
                    }
                    engine
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

pub fn bench_waiting_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("waiting_queue");
    let event = EventId::from(1);

    for size in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("push_then_drain", size), &size, |b, &n| {
            b.iter_batched(
                InMemoryStore::new,
                |store| {
                    for i in 0..n as u64 {
                        let registration = Registration::waiting(
                            RegistrationId::from(i + 1),
                            UserId::from(i + 1),
                            event,
                            i / 4,
                        );
                        store.push_waiting(registration).ok();
                    }
                    while let Some(head) = store.pop_waiting_head(event) {
                        black_box(head);
                    }
                    store
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_register(c);
    bench_cancel_cascade(c);
    bench_waiting_queue(c);
}
