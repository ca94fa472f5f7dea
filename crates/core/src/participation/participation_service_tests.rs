#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::campaigns::{CampaignStatus, DistributionRule};
    use crate::errors::{Error, ValidationError};
    use crate::participation::memory_ledger::{join_request, SharedLedger};
    use crate::participation::{
        ParticipationError, ParticipationService, ParticipationServiceTrait, SettlementOutcome,
    };
    use crate::settlement::{SeededRandomSource, SettlementError};

    fn service_with(ledger: &SharedLedger) -> ParticipationService {
        ParticipationService::new(
            Arc::new(ledger.clone()),
            Arc::new(ledger.clone()),
            Arc::new(SeededRandomSource::new(7)),
        )
    }

    fn seeded_ledger(users: usize) -> SharedLedger {
        let ledger = SharedLedger::default();
        ledger.with(|l| {
            for idx in 0..users {
                l.add_user(&format!("u{}", idx));
            }
        });
        ledger
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_ledger() {
        let ledger = seeded_ledger(1);
        ledger.with(|l| {
            l.add_campaign("A", DistributionRule::Equal, 2000, 2, None);
        });
        let service = service_with(&ledger);

        let mut request = join_request("A", "u0");
        request.has_followed = false;
        let err = service.join_campaign(request).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidField { .. })
        ));
        assert!(service.list_participants("A").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_joins_for_last_slot() {
        let ledger = seeded_ledger(10);
        ledger.with(|l| {
            l.add_campaign("A", DistributionRule::Equal, 2000, 2, None);
        });
        let service = Arc::new(service_with(&ledger));
        service.join_campaign(join_request("A", "u0")).await.unwrap();

        let mut handles = Vec::new();
        for idx in 1..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .join_campaign(join_request("A", &format!("u{}", idx)))
                    .await
            }));
        }

        let mut completed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(outcome) => {
                    assert!(matches!(outcome.settlement, SettlementOutcome::Completed(_)));
                    completed += 1;
                }
                Err(Error::Participation(ParticipationError::CampaignNotActive { .. })) => {
                    rejected += 1
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(completed, 1);
        assert_eq!(rejected, 8);
        ledger.with(|l| {
            assert_eq!(l.status("A"), CampaignStatus::Completed);
            assert_eq!(l.total_credited(), 2000);
        });
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_joins_record_once() {
        let ledger = seeded_ledger(1);
        ledger.with(|l| {
            l.add_campaign("A", DistributionRule::Equal, 5000, 5, None);
        });
        let service = Arc::new(service_with(&ledger));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.join_campaign(join_request("A", "u0")).await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(service.list_participants("A").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settlement_lookup_and_retry() {
        let ledger = seeded_ledger(2);
        ledger.with(|l| {
            l.add_campaign("A", DistributionRule::Equal, 2000, 2, None);
            l.fail_credit_for = Some("u1".to_string());
        });
        let service = service_with(&ledger);

        service.join_campaign(join_request("A", "u0")).await.unwrap();
        let outcome = service.join_campaign(join_request("A", "u1")).await.unwrap();
        assert!(matches!(outcome.settlement, SettlementOutcome::Deferred { .. }));
        assert!(matches!(
            service.get_settlement("A").unwrap_err(),
            Error::NotFound(_)
        ));

        ledger.with(|l| l.fail_credit_for = None);
        let settlement = service.settle_campaign("A").await.unwrap();
        assert_eq!(settlement.total_distributed, 2000);
        assert_eq!(service.get_settlement("A").unwrap(), settlement);

        let err = service.settle_campaign("A").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Settlement(SettlementError::AlreadySettled(_))
        ));
    }

    #[test]
    fn test_listing_unknown_campaign_is_not_found() {
        let ledger = seeded_ledger(0);
        let service = service_with(&ledger);
        assert!(matches!(
            service.list_participants("nope").unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
