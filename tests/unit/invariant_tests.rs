/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use fairseat::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_750_000_000;

    async fn engine_with_event(seat_limit: u32) -> (Arc<RegistrationEngine>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(NOW));
        let engine = RegistrationEngine::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MockPaymentProcessor::new()),
            EngineConfig::default(),
        )
        .with_clock(clock.clone());

        let club = engine
            .add_user(NewUser::club("music", "music@upi"))
            .await
            .unwrap();
        engine
            .add_event(NewEvent {
                club_id: club,
                name: "Open Mic".to_string(),
                location: "Amphitheatre".to_string(),
                categories: vec!["music".to_string()],
                window: TimeWindow::new(NOW + 7_200, NOW + 10_800),
                seat_limit,
                price: 0,
            })
            .unwrap();
        (Arc::new(engine), clock)
    }

    async fn register_many(
        engine: &RegistrationEngine,
        clock: &ManualClock,
        count: usize,
    ) -> Vec<Admission> {
        let mut admissions = Vec::new();
        for i in 0..count {
            let user = engine
                .add_user(NewUser::regular(format!("singer{i}")))
                .await
                .unwrap();
            clock.advance(1);
            admissions.push(engine.register("Open Mic", user).await.unwrap());
        }
        admissions
    }

    #[tokio::test]
    async fn test_promotions_follow_queue_order() {
        let (engine, clock) = engine_with_event(2).await;
        let admissions = register_many(&engine, &clock, 6).await;
        let waiting: Vec<RegistrationId> = admissions[2..]
            .iter()
            .map(|a| a.registration_id)
            .collect();

        let mut promoted = Vec::new();
        for admission in &admissions[..2] {
            promoted.extend(engine.cancel(admission.registration_id).unwrap().promoted);
        }
        for registration in &promoted {
            engine.approve(registration.id).unwrap();
        }
        let ids: Vec<RegistrationId> = promoted.iter().map(|r| r.id).collect();
        assert_eq!(ids, waiting[..2]);
    }

    #[tokio::test]
    async fn test_every_registration_lives_in_one_list() {
        let (engine, clock) = engine_with_event(3).await;
        let admissions = register_many(&engine, &clock, 8).await;
        engine.cancel(admissions[0].registration_id).unwrap();
        engine.cancel(admissions[5].registration_id).unwrap();
        clock.advance(7_200);
        engine.run_maintenance();

        let all = engine.list_registrations(None);
        let unique: HashSet<RegistrationId> = all.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), 6);
        for registration in &all {
            assert_eq!(engine.status(registration.id), registration.status());
        }
    }

    #[tokio::test]
    async fn test_confirmed_never_exceeds_limit() {
        let (engine, clock) = engine_with_event(2).await;
        let admissions = register_many(&engine, &clock, 10).await;

        for admission in &admissions {
            if let Ok(cancellation) = engine.cancel(admission.registration_id) {
                if let Some(promoted) = cancellation.promoted {
                    engine.approve(promoted.id).ok();
                }
            }
            let confirmed = engine
                .list_registrations(None)
                .iter()
                .filter(|r| r.status() == RegistrationStatus::Confirmed)
                .count();
            assert!(confirmed <= 2);
        }
    }

    #[tokio::test]
    async fn test_cancel_unknown_is_idempotent() {
        let (engine, clock) = engine_with_event(1).await;
        register_many(&engine, &clock, 3).await;
        let before = engine.list_registrations(None);

        for _ in 0..3 {
            let err = engine.cancel(RegistrationId::from(1)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(engine.list_registrations(None), before);
    }

    #[tokio::test]
    async fn test_listener_sees_every_transition_in_order() {
        let clock = Arc::new(ManualClock::new(NOW));
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut engine = RegistrationEngine::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MockPaymentProcessor::new()),
            EngineConfig::default(),
        )
        .with_clock(clock.clone());
        engine.add_listener(move |event: &LifecycleEvent| {
            sink.lock().unwrap().push(event.sequence_num);
        });

        let club = engine
            .add_user(NewUser::club("dance", "dance@upi"))
            .await
            .unwrap();
        engine
            .add_event(NewEvent {
                club_id: club,
                name: "Salsa".to_string(),
                location: "Gym".to_string(),
                categories: Vec::new(),
                window: TimeWindow::new(NOW + 3_600, NOW + 7_200),
                seat_limit: 1,
                price: 0,
            })
            .unwrap();
        let first = engine.add_user(NewUser::regular("x")).await.unwrap();
        let second = engine.add_user(NewUser::regular("y")).await.unwrap();
        let a = engine.register("Salsa", first).await.unwrap();
        engine.register("Salsa", second).await.unwrap();
        engine.cancel(a.registration_id).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }
}
