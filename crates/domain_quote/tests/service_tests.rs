//! Service-level tests: commit, print, cancel and export

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{AdapterHealth, QuoteId};
use domain_quote::{
    read_csv, write_csv, CommitMode, InMemoryQuoteLedger, QuoteError, QuoteLedger, QuoteStatus,
    WorkflowState,
};
use test_utils::{
    assert_money_eq, assert_state, client_name_strategy, ClientDetails, ClientFixtures,
    FailingLedger, FailingPrinter, GatedPrinter, ProductFixtures, QuoteRequestBuilder,
    RecordingPrinter, TestServiceBuilder, TEST_AGENT,
};

#[tokio::test]
async fn confirm_appends_one_quote_and_resets_the_session() {
    let ledger = Arc::new(InMemoryQuoteLedger::new());
    let service = TestServiceBuilder::new().with_ledger(ledger.clone()).build();
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    let quote = service.commit(session, CommitMode::Confirm).await.unwrap();

    assert_eq!(quote.id, QuoteId::from_sequence(1));
    assert_money_eq(&quote.amount, dec!(30000));
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert_eq!(quote.agent, TEST_AGENT);
    assert_eq!((quote.expires_at - quote.created_at).num_days(), 30);
    assert_eq!(ledger.len().await, 1);

    let handle = service.session(session).await.unwrap();
    let controller = handle.lock().await;
    assert_state(&controller, WorkflowState::Idle);
    assert!(controller.draft().is_none());
}

#[tokio::test]
async fn committing_twice_does_not_duplicate_the_quote() {
    let ledger = Arc::new(InMemoryQuoteLedger::new());
    let service = TestServiceBuilder::new().with_ledger(ledger.clone()).build();
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    service.commit(session, CommitMode::Confirm).await.unwrap();
    let second = service.commit(session, CommitMode::Confirm).await;

    assert!(matches!(second, Err(QuoteError::InvalidStateTransition { .. })));
    assert_eq!(ledger.len().await, 1);
}

#[tokio::test]
async fn concurrent_commits_from_one_summary_append_once() {
    let ledger = Arc::new(InMemoryQuoteLedger::new());
    let service = Arc::new(TestServiceBuilder::new().with_ledger(ledger.clone()).build());
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.commit(session, CommitMode::Confirm).await }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.commit(session, CommitMode::Confirm).await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(ledger.len().await, 1);
}

#[tokio::test]
async fn confirm_is_unreachable_without_submit() {
    let service = TestServiceBuilder::new().build();
    let (session, handle) = service.open_session().await;
    QuoteRequestBuilder::private_motor(dec!(600000))
        .apply(&mut *handle.lock().await)
        .unwrap();

    let result = service.commit(session, CommitMode::Confirm).await;
    assert!(matches!(result, Err(QuoteError::InvalidStateTransition { .. })));
    assert!(service.list_quotes().await.unwrap().is_empty());
}

#[tokio::test]
async fn print_and_confirm_prints_the_provisional_summary() {
    let printer = Arc::new(RecordingPrinter::new());
    let service = TestServiceBuilder::new().with_printer(printer.clone()).build();
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    service.commit(session, CommitMode::PrintAndConfirm).await.unwrap();

    let printed = printer.printed();
    assert_eq!(printed.len(), 1);
    assert_eq!(printed[0].client_name, "Jane");
    assert_money_eq(&printed[0].amount, dec!(30000));
}

#[tokio::test]
async fn print_failure_does_not_block_commit() {
    let service = TestServiceBuilder::new()
        .with_printer(Arc::new(FailingPrinter))
        .build();
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    let quote = service.commit(session, CommitMode::PrintAndConfirm).await.unwrap();
    assert_eq!(service.find_quote(quote.id).await.unwrap(), quote);
}

#[tokio::test]
async fn ledger_failure_returns_to_form_with_draft_intact() {
    let service = TestServiceBuilder::new()
        .with_ledger(Arc::new(FailingLedger))
        .build();
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    let result = service.commit(session, CommitMode::Confirm).await;
    assert!(matches!(result, Err(QuoteError::SubmissionTransportFailure(_))));

    let handle = service.session(session).await.unwrap();
    let mut controller = handle.lock().await;
    assert_state(&controller, WorkflowState::FormEntry);
    assert!(!controller.is_submitting());
    assert_eq!(controller.draft().unwrap().client_name(), "Jane");
    assert!(controller.submit().is_ok());
}

#[tokio::test]
async fn cancel_during_print_discards_the_commit() {
    let ledger = Arc::new(InMemoryQuoteLedger::new());
    let printer = Arc::new(GatedPrinter::new());
    let service = Arc::new(
        TestServiceBuilder::new()
            .with_ledger(ledger.clone())
            .with_printer(printer.clone())
            .build(),
    );
    let session = QuoteRequestBuilder::private_motor(dec!(600000))
        .submit_in(&service)
        .await
        .unwrap();

    let commit = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.commit(session, CommitMode::PrintAndConfirm).await }
    });

    printer.wait_until_printing().await;
    let handle = service.session(session).await.unwrap();
    handle.lock().await.cancel();
    printer.release();

    assert_eq!(commit.await.unwrap(), Err(QuoteError::SubmissionDiscarded));
    assert!(ledger.is_empty().await);
    assert_state(&*handle.lock().await, WorkflowState::Idle);
}

#[tokio::test]
async fn closed_sessions_are_gone() {
    let service = TestServiceBuilder::new().build();
    let (session, _) = service.open_session().await;
    assert_eq!(service.session_count().await, 1);

    service.close_session(session).await.unwrap();

    assert!(matches!(service.session(session).await, Err(QuoteError::SessionNotFound(_))));
    assert!(matches!(
        service.close_session(session).await,
        Err(QuoteError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn unknown_quote_is_not_found() {
    let service = TestServiceBuilder::new().build();
    let result = service.find_quote(QuoteId::from_sequence(404)).await;
    assert_eq!(result, Err(QuoteError::QuoteNotFound("QT-00404".to_string())));
}

#[tokio::test]
async fn ledger_outage_is_reported_as_unavailable() {
    let service = TestServiceBuilder::new()
        .with_ledger(Arc::new(FailingLedger))
        .with_printer(Arc::new(FailingPrinter))
        .build();

    assert!(matches!(service.list_quotes().await, Err(QuoteError::LedgerUnavailable(_))));
    let health = service.health().await;
    assert!(health.iter().all(|result| result.status == AdapterHealth::Unhealthy));
}

#[tokio::test]
async fn stats_and_export_follow_the_ledger() {
    let service = TestServiceBuilder::new().build();
    for (client, value) in [("Jane", dec!(600000)), ("John", dec!(800000))] {
        let session = QuoteRequestBuilder::private_motor(value)
            .with_client(ClientDetails {
                name: client.to_string(),
                ..ClientFixtures::jane()
            })
            .submit_in(&service)
            .await
            .unwrap();
        service.commit(session, CommitMode::Confirm).await.unwrap();
    }

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_quotes, 2);
    assert_money_eq(&stats.total_amount, dec!(70000));

    let csv = service.export_csv().await.unwrap();
    let rows = read_csv(&csv).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "QT-00002");
    assert_eq!(rows[0].client, "John");
    assert_eq!(rows[1].agent, TEST_AGENT);
}

fn rt() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn csv_round_trip_preserves_ledger_rows(
        entries in proptest::collection::vec((client_name_strategy(), 500_000i64..5_000_000i64), 0..6)
    ) {
        let ledger = InMemoryQuoteLedger::new();
        let quotes = rt().block_on(async {
            let service = TestServiceBuilder::new()
                .with_ledger(Arc::new(ledger.clone()))
                .build();
            for (name, value) in &entries {
                let session = QuoteRequestBuilder::private_motor((*value).into())
                    .with_client(ClientDetails { name: name.clone(), ..ClientFixtures::jane() })
                    .submit_in(&service)
                    .await
                    .unwrap();
                service.commit(session, CommitMode::Confirm).await.unwrap();
            }
            ledger.list().await.unwrap()
        });

        let rows = read_csv(&write_csv(&quotes).unwrap()).unwrap();

        prop_assert_eq!(rows.len(), quotes.len());
        for (row, quote) in rows.iter().zip(&quotes) {
            prop_assert_eq!(row.quote_id().unwrap(), quote.id);
            prop_assert_eq!(&row.client, &quote.client_name);
            prop_assert_eq!(&row.product, ProductFixtures::PRIVATE_MOTOR);
            prop_assert_eq!(row.amount().unwrap(), quote.amount.amount());
            prop_assert_eq!(row.status().unwrap(), quote.status);
        }
    }
}

mod session_expiry {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn idle_session_is_not_found_once_expired() {
        let service = TestServiceBuilder::new()
            .with_session_ttl(Duration::zero())
            .build();
        let (session, _) = service.open_session().await;

        let err = service.session(session).await.unwrap_err();

        assert_eq!(err, QuoteError::SessionNotFound(session.to_string()));
        assert_eq!(service.session_count().await, 0);
    }

    #[tokio::test]
    async fn opening_a_session_evicts_idle_ones() {
        let service = TestServiceBuilder::new()
            .with_session_ttl(Duration::zero())
            .build();
        for _ in 0..3 {
            service.open_session().await;
        }

        assert_eq!(service.session_count().await, 1);
        assert_eq!(service.evict_idle_sessions().await, 1);
        assert_eq!(service.session_count().await, 0);
    }

    #[tokio::test]
    async fn active_sessions_survive_a_sweep() {
        let service = TestServiceBuilder::new()
            .with_session_ttl(Duration::minutes(30))
            .build();
        let (session, _) = service.open_session().await;

        assert_eq!(service.evict_idle_sessions().await, 0);
        assert!(service.session(session).await.is_ok());
        assert_eq!(service.session_ttl(), Duration::minutes(30));
    }
}
