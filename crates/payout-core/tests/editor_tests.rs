use payout_core::commission::{CalculatorSettings, CommissionBasis, PaymentStatus, PayoutRecord};
use payout_core::editor::{EditOutcome, MemoryStore, PayoutEdit, PayoutEditor, PayoutStore};
use payout_core::{PayoutError, PayoutResult};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fresh_lead() -> PayoutRecord {
    // As handed over by lead finalisation: premium and context only
    PayoutRecord {
        id: Some("PO-2024-0117".into()),
        aggregator: Some("PolicyHub".into()),
        insurer: Some("Acme General".into()),
        policy_type: Some("Motor Comprehensive".into()),
        premium_amount: dec!(18000),
        ..Default::default()
    }
}

/// Store that refuses every save.
struct OfflineStore;

impl PayoutStore for OfflineStore {
    fn save(&mut self, _record: &PayoutRecord) -> PayoutResult<()> {
        Err(PayoutError::Persistence("backend unreachable".into()))
    }
}

// ===========================================================================
// Recompute on edit
// ===========================================================================

#[test]
fn test_every_input_edit_recomputes() {
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply(PayoutEdit::CommissionOn(CommissionBasis::Net));
    editor.apply(PayoutEdit::NetPremium(dec!(15000)));
    let outcome = editor.apply(PayoutEdit::CommissionRate(dec!(12)));

    assert!(outcome.input_changed);
    assert!(outcome.derived_written);
    let r = editor.record();
    assert_eq!(r.earning, dec!(1800));
    assert_eq!(r.tds, dec!(36));
    assert_eq!(r.amount_after_tds, dec!(1764));
    assert_eq!(r.net_profit, dec!(1764));

    editor.apply(PayoutEdit::BrokerPayment(dec!(500)));
    editor.apply(PayoutEdit::OtherExpense(dec!(64)));
    assert_eq!(editor.record().net_profit, dec!(1200));

    editor.apply(PayoutEdit::TdsRate(Some(dec!(10))));
    assert_eq!(editor.record().tds, dec!(180));
    assert_eq!(editor.record().net_profit, dec!(1056));
}

#[test]
fn test_switching_basis_changes_base() {
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply_all([
        PayoutEdit::OdPremium(dec!(12000)),
        PayoutEdit::TpPremium(dec!(6000)),
        PayoutEdit::OdPercentage(dec!(20)),
        PayoutEdit::TpPercentage(dec!(2.5)),
        PayoutEdit::CommissionRate(dec!(10)),
        PayoutEdit::CommissionOn(CommissionBasis::OdTp),
    ]);
    assert_eq!(editor.record().earning, dec!(2550));

    editor.apply(PayoutEdit::CommissionOn(CommissionBasis::Od));
    assert_eq!(editor.record().earning, dec!(1200));

    editor.apply(PayoutEdit::CommissionOn(CommissionBasis::from("Other")));
    assert_eq!(editor.record().earning, dec!(1800));
}

// ===========================================================================
// Write-back guard
// ===========================================================================

#[test]
fn test_refresh_on_stable_record_never_writes() {
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply(PayoutEdit::CommissionRate(dec!(7.5)));
    let before = editor.record().clone();
    let revision = editor.revision();

    for _ in 0..10 {
        let outcome = editor.refresh();
        assert_eq!(
            outcome,
            EditOutcome {
                input_changed: false,
                derived_written: false,
                revision,
            }
        );
    }
    assert_eq!(editor.record(), &before);
}

#[test]
fn test_repeating_same_edit_is_noop() {
    let mut editor = PayoutEditor::new(fresh_lead());
    let first = editor.apply(PayoutEdit::Discount(dec!(250)));
    let second = editor.apply(PayoutEdit::Discount(dec!(250)));
    assert!(first.input_changed);
    assert!(!second.input_changed);
    assert!(!second.derived_written);
    assert_eq!(first.revision, second.revision);
}

#[test]
fn test_cent_edit_recomputes_and_saves_exact_figures() {
    let mut store = MemoryStore::new();
    let mut editor = PayoutEditor::new(PayoutRecord {
        id: Some("PO-2024-0142".into()),
        commission_on: CommissionBasis::Net,
        net_premium: dec!(5000),
        commission_rate: dec!(10),
        tds_rate: Some(dec!(2)),
        ..Default::default()
    });
    assert_eq!(editor.record().net_profit, dec!(490));

    let outcome = editor.apply(PayoutEdit::Discount(dec!(0.01)));
    assert!(outcome.input_changed);
    assert!(outcome.derived_written);
    assert_eq!(editor.record().net_profit, dec!(489.99));

    editor.submit(&mut store).unwrap();
    let saved = store.latest("PO-2024-0142").unwrap();
    assert_eq!(saved.discount, dec!(0.01));
    assert_eq!(saved.net_profit, dec!(489.99));
}

#[test]
fn test_opt_in_tolerance_defers_small_moves_until_submit() {
    let settings = CalculatorSettings {
        net_profit_tolerance: dec!(0.01),
        ..Default::default()
    };
    let mut editor = PayoutEditor::with_settings(
        PayoutRecord {
            id: Some("PO-2024-0143".into()),
            commission_on: CommissionBasis::OnlinePoints,
            points: dec!(1000),
            tds_rate: Some(Decimal::ZERO),
            ..Default::default()
        },
        settings,
    );

    // Earning, TDS and post-TDS amount stay put; net profit moves by 0.005
    let outcome = editor.apply(PayoutEdit::OtherExpense(dec!(0.005)));
    assert!(outcome.input_changed);
    assert!(!outcome.derived_written);
    assert_eq!(editor.record().net_profit, dec!(1000));
    let revision = editor.revision();

    let mut store = MemoryStore::new();
    editor.submit(&mut store).unwrap();
    let saved = store.latest("PO-2024-0143").unwrap();
    assert_eq!(saved.net_profit, dec!(999.995));
    assert_eq!(
        saved.net_profit,
        saved.amount_after_tds - saved.total_expenses()
    );
    assert_eq!(editor.revision(), revision + 1);
}

#[test]
fn test_open_reports_stale_stored_figures() {
    let stale = PayoutRecord {
        commission_on: CommissionBasis::Net,
        net_premium: dec!(1000),
        commission_rate: dec!(10),
        tds_rate: Some(dec!(2)),
        earning: dec!(100),
        tds: dec!(2),
        amount_after_tds: dec!(98),
        net_profit: dec!(120),
        ..Default::default()
    };
    let (mut editor, opened) = PayoutEditor::open(stale, CalculatorSettings::default());
    assert_eq!(
        opened,
        EditOutcome {
            input_changed: false,
            derived_written: true,
            revision: 0,
        }
    );
    assert_eq!(editor.record().net_profit, dec!(98));
    assert!(editor.is_dirty());

    // Nothing left to correct once opened
    let outcome = editor.apply(PayoutEdit::Discount(Decimal::ZERO));
    assert!(!outcome.derived_written);

    let (_, reopened) = PayoutEditor::open(editor.into_record(), CalculatorSettings::default());
    assert!(!reopened.derived_written);
}

#[test]
fn test_clearing_tds_rate_restores_default() {
    let mut editor = PayoutEditor::new(PayoutRecord {
        commission_on: CommissionBasis::Net,
        net_premium: dec!(1000),
        commission_rate: dec!(10),
        tds_rate: Some(dec!(5)),
        ..Default::default()
    });
    assert_eq!(editor.record().tds, dec!(5));

    editor.apply(PayoutEdit::TdsRate(None));
    assert_eq!(editor.record().tds_rate, Some(dec!(2)));
    assert_eq!(editor.record().tds, dec!(2));
}

// ===========================================================================
// Submit
// ===========================================================================

#[test]
fn test_submit_saves_snapshot_and_clears_dirty() {
    let mut store = MemoryStore::new();
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply(PayoutEdit::CommissionRate(dec!(10)));
    assert!(editor.is_dirty());
    assert!(store.saved().is_empty());

    editor.submit(&mut store).unwrap();
    assert!(!editor.is_dirty());
    assert_eq!(store.saved().len(), 1);

    let saved = store.latest("PO-2024-0117").unwrap();
    assert_eq!(saved.earning, dec!(1800));
    assert_eq!(saved.tds_rate, Some(dec!(2)));
}

#[test]
fn test_edits_after_submit_not_persisted_until_resubmit() {
    let mut store = MemoryStore::new();
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply(PayoutEdit::CommissionRate(dec!(10)));
    editor.submit(&mut store).unwrap();

    editor.apply(PayoutEdit::PaymentReceived(PaymentStatus::Yes));
    assert!(editor.is_dirty());
    assert_eq!(
        store.latest("PO-2024-0117").unwrap().payment_received,
        PaymentStatus::No
    );

    editor.submit(&mut store).unwrap();
    assert_eq!(store.saved().len(), 2);
    assert_eq!(
        store.latest("PO-2024-0117").unwrap().payment_received,
        PaymentStatus::Yes
    );
}

#[test]
fn test_failed_submit_keeps_record_dirty() {
    let mut editor = PayoutEditor::new(fresh_lead());
    editor.apply(PayoutEdit::CommissionRate(dec!(10)));
    let err = editor.submit(&mut OfflineStore).unwrap_err();
    assert!(matches!(err, PayoutError::Persistence(_)));
    assert!(editor.is_dirty());
}
