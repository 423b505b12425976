/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use fairseat::prelude::*;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_750_000_000;
    const HOUR: u64 = 3_600;

    struct Fair {
        engine: RegistrationEngine,
        clock: Arc<ManualClock>,
        user_a: UserId,
        user_b: UserId,
    }

    async fn fair() -> Fair {
        let clock = Arc::new(ManualClock::new(NOW));
        let engine = RegistrationEngine::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MockPaymentProcessor::new()),
            EngineConfig::default(),
        )
        .with_clock(clock.clone());

        let club = engine
            .add_user(NewUser::club("photography", "photo@upi"))
            .await
            .unwrap();
        let user_a = engine.add_user(NewUser::regular("a")).await.unwrap();
        let user_b = engine.add_user(NewUser::regular("b")).await.unwrap();

        for (name, start) in [("Photo Walk", NOW + 24 * HOUR), ("Darkroom", NOW + 25 * HOUR)] {
            engine
                .add_event(NewEvent {
                    club_id: club,
                    name: name.to_string(),
                    location: "Quad".to_string(),
                    categories: vec!["photography".to_string()],
                    window: TimeWindow::new(start, start + 2 * HOUR),
                    seat_limit: 1,
                    price: 0,
                })
                .unwrap();
        }

        Fair {
            engine,
            clock,
            user_a,
            user_b,
        }
    }

    /// Runs scenario A and returns the two registration ids.
    async fn scenario_a(fair: &Fair) -> (RegistrationId, RegistrationId) {
        let a = fair.engine.register("Photo Walk", fair.user_a).await.unwrap();
        let b = fair.engine.register("Photo Walk", fair.user_b).await.unwrap();
        (a.registration_id, b.registration_id)
    }

    #[tokio::test]
    async fn test_scenario_a_second_user_waits() {
        let fair = fair().await;
        let (a, b) = scenario_a(&fair).await;

        assert_eq!(fair.engine.status(a), RegistrationStatus::Confirmed);
        assert_eq!(fair.engine.status(b), RegistrationStatus::Waiting);
    }

    #[tokio::test]
    async fn test_scenario_b_cancel_promotes_waiting() {
        let fair = fair().await;
        let (a, b) = scenario_a(&fair).await;

        let cancellation = fair.engine.cancel(a).unwrap();
        assert_eq!(cancellation.promoted.map(|r| r.id), Some(b));
        assert_eq!(fair.engine.status(a), RegistrationStatus::NotFound);
        assert_eq!(fair.engine.status(b), RegistrationStatus::Pending);
    }

    #[tokio::test]
    async fn test_scenario_c_approve_within_ttl() {
        let fair = fair().await;
        let (a, b) = scenario_a(&fair).await;
        fair.engine.cancel(a).unwrap();
        fair.clock.advance(30 * 60);

        let approved = fair.engine.approve(b).unwrap();
        assert_eq!(approved.id, b);
        assert_eq!(fair.engine.status(b), RegistrationStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_scenario_d_stale_hold_is_not_found() {
        let fair = fair().await;
        let (a, b) = scenario_a(&fair).await;
        fair.engine.cancel(a).unwrap();
        fair.clock.advance(HOUR + 1);

        let err = fair.engine.approve(b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(fair.engine.status(b), RegistrationStatus::Waiting);
    }

    #[tokio::test]
    async fn test_scenario_e_overlap_is_conflict() {
        let fair = fair().await;
        fair.engine.register("Photo Walk", fair.user_a).await.unwrap();

        let err = fair
            .engine
            .register("Darkroom", fair.user_a)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            fair.engine.list_user_registrations(fair.user_a).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_register_then_status_round_trip() {
        let fair = fair().await;
        for user in [fair.user_a, fair.user_b] {
            let admission = fair.engine.register("Darkroom", user).await.unwrap();
            assert_eq!(
                fair.engine.status(admission.registration_id),
                admission.status
            );
        }
    }

    #[tokio::test]
    async fn test_results_wrap_into_envelope() {
        let fair = fair().await;
        let ok: Response<Admission> = fair.engine.register("Darkroom", fair.user_a).await.into();
        assert!(ok.is_ok());

        let failed: Response<Admission> =
            fair.engine.register("Missing", fair.user_a).await.into();
        let error = failed.error().unwrap();
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert!(error.message.contains("Missing"));
    }
}
