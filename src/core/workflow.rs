//! The conversion form session: list loading, submission and result state.

use super::config::FormConfig;
use super::form::{Field, FormSchema, FormValues, ValidationErrors};
use super::gateway::ConversionGateway;
use super::model::{ConversionResult, CryptoAsset, FiatCurrency, FormState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service converted the amount; the result is now displayed.
    Converted(ConversionResult),
    /// Validation failed; nothing was sent.
    Invalid(ValidationErrors),
    /// The service answered with an application-level error.
    Rejected,
    /// The request never produced a usable response.
    Failed,
    /// A previous submission is still in flight.
    Busy,
}

#[derive(Debug)]
struct FormData {
    state: FormState,
    fiat_list: Vec<FiatCurrency>,
    crypto_list: Vec<CryptoAsset>,
    values: FormValues,
    result: Option<ConversionResult>,
    last_error: Option<String>,
    field_errors: ValidationErrors,
}

impl FormData {
    fn new(values: FormValues) -> Self {
        Self {
            state: FormState::Idle,
            fiat_list: Vec::new(),
            crypto_list: Vec::new(),
            values,
            result: None,
            last_error: None,
            field_errors: ValidationErrors::default(),
        }
    }
}

struct Shared {
    data: Mutex<FormData>,
    state_tx: watch::Sender<FormState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FormData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, data: &mut FormData, state: FormState) {
        debug!("Form state {} -> {}", data.state, state);
        data.state = state;
        self.state_tx.send_replace(state);
    }
}

/// A mounted conversion form.
///
/// Background list fetches only hold a weak reference to the form state and
/// are aborted when the form is unmounted or dropped, so a late response can
/// never write into a torn-down form.
pub struct ConvertorForm {
    gateway: Arc<dyn ConversionGateway>,
    schema: FormSchema,
    shared: Arc<Shared>,
    tasks: JoinSet<()>,
}

impl ConvertorForm {
    pub fn new(gateway: Arc<dyn ConversionGateway>, config: &FormConfig) -> Self {
        let (state_tx, _) = watch::channel(FormState::Idle);
        let data = FormData::new(FormValues::new(&config.default_currency));
        Self {
            gateway,
            schema: FormSchema::new(config.min_amount),
            shared: Arc::new(Shared {
                data: Mutex::new(data),
                state_tx,
            }),
            tasks: JoinSet::new(),
        }
    }

    /// Starts both list fetches. Each one updates its own list whenever it
    /// completes; a failed fetch leaves that list empty.
    pub fn mount(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        let weak = Arc::downgrade(&self.shared);
        self.tasks.spawn(async move {
            let list = gateway.fetch_fiat_list().await;
            update_if_mounted(&weak, "fiat", |data| {
                if let Some(list) = list {
                    data.fiat_list = list;
                }
            });
        });

        let gateway = Arc::clone(&self.gateway);
        let weak = Arc::downgrade(&self.shared);
        self.tasks.spawn(async move {
            let list = gateway.fetch_crypto_list().await;
            update_if_mounted(&weak, "crypto", |data| {
                if let Some(list) = list {
                    data.crypto_list = list;
                }
            });
        });
    }

    /// Waits until every list fetch started by [`mount`](Self::mount) settled.
    pub async fn wait_for_lists(&mut self) {
        while let Some(res) = self.tasks.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "List fetch task failed");
            }
        }
    }

    /// Tears the form down, cancelling outstanding fetches.
    pub fn unmount(mut self) {
        self.tasks.abort_all();
        debug!("Form unmounted");
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state(&self) -> FormState {
        self.shared.lock().state
    }

    pub fn fiat_list(&self) -> Vec<FiatCurrency> {
        self.shared.lock().fiat_list.clone()
    }

    pub fn crypto_list(&self) -> Vec<CryptoAsset> {
        self.shared.lock().crypto_list.clone()
    }

    pub fn values(&self) -> FormValues {
        self.shared.lock().values.clone()
    }

    pub fn set_value(&self, field: Field, value: impl Into<String>) {
        self.shared.lock().values.set(field, value);
    }

    pub fn result(&self) -> Option<ConversionResult> {
        self.shared.lock().result.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.shared.lock().last_error.clone()
    }

    pub fn field_errors(&self) -> ValidationErrors {
        self.shared.lock().field_errors.clone()
    }

    /// Validates the current values and, if they pass, performs exactly one
    /// conversion call.
    ///
    /// The amount is reset only after a successful conversion. On any failure
    /// the previous result stays displayed.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut data = self.shared.lock();
            if data.state != FormState::Idle {
                debug!("Submission ignored while {}", data.state);
                return SubmitOutcome::Busy;
            }

            match self
                .schema
                .validate(&data.values, &data.crypto_list, &data.fiat_list)
            {
                Ok(request) => {
                    data.field_errors = ValidationErrors::default();
                    data.last_error = None;
                    self.shared.set_state(&mut data, FormState::Loading);
                    request
                }
                Err(errors) => {
                    debug!(errors = %errors, "Form validation failed");
                    data.field_errors = errors.clone();
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        // Dropping this future mid-call must not leave the form stuck in Loading
        let guard = LoadingGuard::new(&self.shared);
        let outcome = self.gateway.convert(&request).await;

        let mut data = self.shared.lock();
        guard.disarm();
        match outcome {
            Ok(Some(result)) => {
                info!(
                    "Converted {} {} to {} {}",
                    request.amount, request.cryptocurrency_symbol, result.converted_amount, result.fiat_symbol
                );
                data.result = Some(result.clone());
                data.values.reset_amount();
                self.shared.set_state(&mut data, FormState::Idle);
                SubmitOutcome::Converted(result)
            }
            Ok(None) => {
                data.last_error = Some(format!(
                    "Could not convert {} to {}",
                    request.cryptocurrency_symbol, request.fiat_symbol
                ));
                self.shared.set_state(&mut data, FormState::Error);
                self.shared.set_state(&mut data, FormState::Idle);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Conversion request failed");
                data.last_error = Some("The conversion service is unavailable".to_string());
                self.shared.set_state(&mut data, FormState::Error);
                self.shared.set_state(&mut data, FormState::Idle);
                SubmitOutcome::Failed
            }
        }
    }
}

/// Returns an abandoned submission to [`FormState::Idle`] unless disarmed.
struct LoadingGuard {
    shared: Weak<Shared>,
    armed: bool,
}

impl LoadingGuard {
    fn new(shared: &Arc<Shared>) -> Self {
        Self {
            shared: Arc::downgrade(shared),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            let mut data = shared.lock();
            if data.state == FormState::Loading {
                debug!("Submission cancelled before the service answered");
                shared.set_state(&mut data, FormState::Idle);
            }
        }
    }
}

fn update_if_mounted(weak: &Weak<Shared>, list: &str, update: impl FnOnce(&mut FormData)) {
    match weak.upgrade() {
        Some(shared) => {
            let mut data = shared.lock();
            update(&mut data);
            debug!("Updated {} list", list);
        }
        None => debug!("Form already unmounted, discarding {} list", list),
    }
}
