use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::edit::PayoutEdit;
use super::store::PayoutStore;
use crate::commission::{CalculatorSettings, CommissionCalculator, PayoutRecord};
use crate::types::Money;
use crate::PayoutResult;

/// What one call to [`PayoutEditor::apply`] or [`PayoutEditor::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOutcome {
    /// The targeted input actually took a new value
    pub input_changed: bool,
    /// Derived fields (or the persisted TDS default) were written back
    pub derived_written: bool,
    pub revision: u64,
}

/// Owns one payout record while an admin edits it.
///
/// Every input edit re-runs the calculator. Derived fields are written back
/// only when they differ from what the record holds, so repeated refreshes of
/// an unchanged record never mutate it. Nothing is persisted until
/// [`submit`](PayoutEditor::submit).
#[derive(Debug, Clone)]
pub struct PayoutEditor {
    record: PayoutRecord,
    calculator: CommissionCalculator,
    revision: u64,
    dirty: bool,
}

impl PayoutEditor {
    pub fn new(record: PayoutRecord) -> Self {
        Self::with_settings(record, CalculatorSettings::default())
    }

    pub fn with_settings(record: PayoutRecord, settings: CalculatorSettings) -> Self {
        Self::open(record, settings).0
    }

    /// Open a record for editing. Stale derived fields or a missing TDS rate
    /// on the incoming record are corrected immediately; the returned outcome
    /// reports that write so a host can re-render.
    pub fn open(record: PayoutRecord, settings: CalculatorSettings) -> (Self, EditOutcome) {
        let mut editor = Self {
            record,
            calculator: CommissionCalculator::new(settings),
            revision: 0,
            dirty: false,
        };
        let derived_written = editor.sync(editor.tolerance());
        editor.dirty = derived_written;
        let outcome = EditOutcome {
            input_changed: false,
            derived_written,
            revision: editor.revision,
        };
        (editor, outcome)
    }

    pub fn record(&self) -> &PayoutRecord {
        &self.record
    }

    pub fn into_record(self) -> PayoutRecord {
        self.record
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Holds changes not yet handed to a store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn apply(&mut self, edit: PayoutEdit) -> EditOutcome {
        if !edit.apply_to(&mut self.record) {
            trace!(field = edit.field(), "edit left value unchanged");
            return EditOutcome {
                input_changed: false,
                derived_written: false,
                revision: self.revision,
            };
        }

        self.revision += 1;
        self.dirty = true;
        let derived_written = edit.triggers_recompute() && self.sync(self.tolerance());
        debug!(
            field = edit.field(),
            revision = self.revision,
            derived_written,
            "payout edit applied"
        );

        EditOutcome {
            input_changed: true,
            derived_written,
            revision: self.revision,
        }
    }

    pub fn apply_all<I>(&mut self, edits: I) -> Vec<EditOutcome>
    where
        I: IntoIterator<Item = PayoutEdit>,
    {
        edits.into_iter().map(|edit| self.apply(edit)).collect()
    }

    /// Re-run the calculator without an edit.
    pub fn refresh(&mut self) -> EditOutcome {
        let derived_written = self.sync(self.tolerance());
        if derived_written {
            self.revision += 1;
            self.dirty = true;
        }
        EditOutcome {
            input_changed: false,
            derived_written,
            revision: self.revision,
        }
    }

    /// Save through `store` and clear the dirty flag. Derived figures are
    /// reconciled exactly first, whatever the editing tolerance. On failure
    /// the record stays dirty.
    pub fn submit<S: PayoutStore + ?Sized>(&mut self, store: &mut S) -> PayoutResult<()> {
        if self.sync(Decimal::ZERO) {
            self.revision += 1;
        }
        store.save(&self.record)?;
        self.dirty = false;
        info!(
            id = self.record.id.as_deref().unwrap_or("-"),
            revision = self.revision,
            net_profit = %self.record.net_profit,
            "payout record saved"
        );
        Ok(())
    }

    fn tolerance(&self) -> Money {
        self.calculator.settings().net_profit_tolerance
    }

    /// Recompute and write back only what changed. Returns whether anything
    /// was written.
    fn sync(&mut self, tolerance: Money) -> bool {
        let figures = self.calculator.derive_figures(&self.record);
        let tds_rate = self.calculator.effective_tds_rate(&self.record);

        let persist_rate = self.record.tds_rate != Some(tds_rate);
        let figures_changed = figures.differs_from(&self.record.figures(), tolerance);

        if persist_rate {
            self.record.tds_rate = Some(tds_rate);
        }
        if figures_changed {
            self.record.write_figures(&figures);
        }
        persist_rate || figures_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::CommissionBasis;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_editor_corrects_stale_figures() {
        let record = PayoutRecord {
            commission_on: CommissionBasis::Net,
            net_premium: dec!(1000),
            commission_rate: dec!(10),
            earning: dec!(999),
            ..Default::default()
        };
        let editor = PayoutEditor::new(record);
        assert!(editor.is_dirty());
        assert_eq!(editor.record().earning, dec!(100));
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_open_reports_initial_correction() {
        let record = PayoutRecord {
            commission_on: CommissionBasis::Net,
            net_premium: dec!(1000),
            commission_rate: dec!(10),
            tds_rate: None,
            ..Default::default()
        };
        let (editor, outcome) = PayoutEditor::open(record, CalculatorSettings::default());
        assert!(outcome.derived_written);
        assert!(!outcome.input_changed);
        assert_eq!(editor.record().tds_rate, Some(dec!(2)));

        let (_, again) = PayoutEditor::open(editor.into_record(), CalculatorSettings::default());
        assert!(!again.derived_written);
    }

    #[test]
    fn test_payment_status_skips_recompute() {
        let mut editor = PayoutEditor::new(PayoutRecord::default());
        let outcome = editor.apply(PayoutEdit::PaymentReceived(
            crate::commission::PaymentStatus::Yes,
        ));
        assert!(outcome.input_changed);
        assert!(!outcome.derived_written);
        assert_eq!(outcome.revision, 1);
    }
}
