use crate::core::loan::LoanTerms;
use crate::domain::model::{LineItemKey, MonthlyPayment};

/// Monthly PMI factor applied to the loan amount when equity is below 20%.
const PMI_ANNUAL_RATE: f64 = 0.005;
/// Equity threshold (percent of price) at which PMI is waived.
const PMI_WAIVER_PERCENT: f64 = 20.0;
/// Homeowners insurance as an annual fraction of the purchase price.
const INSURANCE_ANNUAL_RATE: f64 = 0.003;

/// Standard fixed-rate annuity payment over `months` payments.
/// `annual_rate_percent` of 0 degenerates to straight-line repayment.
pub fn principal_and_interest(loan_amount: f64, annual_rate_percent: f64, months: u32) -> f64 {
    let r = annual_rate_percent / 100.0 / 12.0;
    let n = f64::from(months);
    if r == 0.0 {
        return loan_amount / n;
    }
    loan_amount * (r * (1.0 + r).powf(n)) / ((1.0 + r).powf(n) - 1.0)
}

enum EditState {
    Committed,
    Editing { key: LineItemKey, pending: String },
}

/// Six-part monthly payment breakdown with per-item user overrides.
///
/// Defaults are derived once from the loan terms; afterwards the six values
/// are independent scalars. Every committed change pushes the full snapshot
/// to the registered observer, synchronously and exactly once. At most one
/// item can be mid-edit at any time.
pub struct PaymentModel {
    items: [f64; 6],
    edit: EditState,
    observer: Option<Box<dyn FnMut(&MonthlyPayment)>>,
}

impl PaymentModel {
    /// Computes the default breakdown for the given terms.
    pub fn new(terms: &LoanTerms) -> Self {
        let loan_amount = terms.loan_amount();
        let price = terms.purchase_price();

        let mortgage_insurance = if terms.down_payment_percent() < PMI_WAIVER_PERCENT {
            loan_amount * PMI_ANNUAL_RATE / 12.0
        } else {
            0.0
        };

        let items = [
            principal_and_interest(
                loan_amount,
                terms.annual_interest_rate_percent(),
                terms.amortization_months(),
            ),
            mortgage_insurance,
            price * terms.property_tax_rate_annual() / 12.0,
            price * INSURANCE_ANNUAL_RATE / 12.0,
            0.0,
            terms.base_utilities_estimate(),
        ];

        Self {
            items,
            edit: EditState::Committed,
            observer: None,
        }
    }

    /// Registers the single observer, replacing any previous one, and pushes
    /// the current snapshot to it immediately.
    pub fn set_observer(&mut self, observer: impl FnMut(&MonthlyPayment) + 'static) {
        let mut observer: Box<dyn FnMut(&MonthlyPayment)> = Box::new(observer);
        observer(&self.snapshot());
        self.observer = Some(observer);
    }

    /// Pure read of the current breakdown.
    pub fn snapshot(&self) -> MonthlyPayment {
        MonthlyPayment {
            principal_and_interest: self.items[0],
            mortgage_insurance: self.items[1],
            property_taxes: self.items[2],
            homeowners_insurance: self.items[3],
            hoa_fees: self.items[4],
            utilities: self.items[5],
            total: self.items.iter().sum(),
        }
    }

    /// One-shot edit: parse `raw` and replace the item's value. A value that
    /// does not parse to a finite number is rejected locally; the previous
    /// value is retained and the observer is not invoked. Returns the
    /// (possibly unchanged) snapshot either way.
    pub fn set_line_item(&mut self, key: LineItemKey, raw: &str) -> MonthlyPayment {
        match parse_amount(raw) {
            Some(value) => {
                if self.editing_key() == Some(key) {
                    self.edit = EditState::Committed;
                }
                self.commit(key, value);
            }
            None => {
                tracing::debug!("Rejected edit for {}: '{}'", key.as_str(), raw);
            }
        }
        self.snapshot()
    }

    /// Opens an edit for `key`, seeding the pending text with the current
    /// value at zero decimal places. An edit already open on another item is
    /// implicitly cancelled.
    pub fn begin_edit(&mut self, key: LineItemKey) {
        let pending = format!("{:.0}", self.items[key.index()]);
        self.edit = EditState::Editing { key, pending };
    }

    /// Replaces the pending text of the open edit. No-op when nothing is
    /// being edited.
    pub fn update_pending(&mut self, text: impl Into<String>) {
        if let EditState::Editing { pending, .. } = &mut self.edit {
            *pending = text.into();
        }
    }

    /// Confirms the open edit. Valid pending text replaces the item's value,
    /// notifies the observer and returns the new snapshot. Invalid text
    /// leaves the edit open and returns `None`; so does a confirm with no
    /// edit in progress.
    pub fn commit_edit(&mut self) -> Option<MonthlyPayment> {
        let (key, value) = match &self.edit {
            EditState::Editing { key, pending } => (*key, parse_amount(pending)?),
            EditState::Committed => return None,
        };
        self.edit = EditState::Committed;
        self.commit(key, value);
        Some(self.snapshot())
    }

    /// Discards the open edit without changing the item or notifying.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Committed;
    }

    /// The item currently being edited, if any.
    pub fn editing_key(&self) -> Option<LineItemKey> {
        match &self.edit {
            EditState::Editing { key, .. } => Some(*key),
            EditState::Committed => None,
        }
    }

    pub fn pending_text(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing { pending, .. } => Some(pending),
            EditState::Committed => None,
        }
    }

    fn commit(&mut self, key: LineItemKey, value: f64) {
        self.items[key.index()] = value;
        let snapshot = self.snapshot();
        if let Some(observer) = &mut self.observer {
            observer(&snapshot);
        }
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
