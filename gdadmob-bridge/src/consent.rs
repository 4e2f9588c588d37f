//! User consent (UMP) adapter.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};
use crate::main_thread::{lock, MainThread};
use crate::model::AdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Unknown,
    Required,
    NotRequired,
    Obtained,
}

impl ConsentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsentStatus::Unknown => "UNKNOWN",
            ConsentStatus::Required => "REQUIRED",
            ConsentStatus::NotRequired => "NOT_REQUIRED",
            ConsentStatus::Obtained => "OBTAINED",
        }
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine dictionary for a consent info update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentRequestParameters {
    pub tag_for_under_age_of_consent: bool,
    /// `EEA`, `NOT_EEA` or unset.
    pub debug_geography: Option<String>,
    pub test_device_hashed_ids: Vec<String>,
}

impl ConsentRequestParameters {
    pub fn from_dictionary(value: Value) -> BridgeResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

pub type ConsentCallback = Box<dyn FnOnce(BridgeResult<()>) + Send + 'static>;

/// A loaded form. It can be presented more than once.
pub trait ConsentForm: Send {
    fn present(&mut self, done: Box<dyn FnOnce(Option<AdError>) + Send + 'static>);
}

/// The SDK's consent information and form loading.
pub trait ConsentProvider: Send + Sync {
    fn status(&self) -> ConsentStatus;
    fn is_form_available(&self) -> bool;
    fn reset(&self);
    fn request_info_update(
        &self,
        parameters: &ConsentRequestParameters,
        done: Box<dyn FnOnce(Option<AdError>) + Send + 'static>,
    );
    fn load_form(
        &self,
        done: Box<dyn FnOnce(Result<Box<dyn ConsentForm>, AdError>) + Send + 'static>,
    );
}

pub struct ConsentManager {
    provider: Arc<dyn ConsentProvider>,
    main: Arc<dyn MainThread>,
    form: Arc<Mutex<Option<Box<dyn ConsentForm>>>>,
}

impl ConsentManager {
    pub fn new(provider: Arc<dyn ConsentProvider>, main: Arc<dyn MainThread>) -> Self {
        Self {
            provider,
            main,
            form: Arc::new(Mutex::new(None)),
        }
    }

    pub fn consent_status(&self) -> ConsentStatus {
        self.provider.status()
    }

    pub fn is_form_available(&self) -> bool {
        self.provider.is_form_available()
    }

    pub fn has_loaded_form(&self) -> bool {
        lock(&self.form).is_some()
    }

    pub fn reset(&self) {
        debug!("Resetting consent information");
        self.provider.reset();
    }

    pub fn request_consent_info_update(
        &self,
        parameters: &ConsentRequestParameters,
        completion: ConsentCallback,
    ) {
        self.provider.request_info_update(
            parameters,
            Box::new(move |error| completion(error.map_or(Ok(()), |e| Err(BridgeError::Sdk(e))))),
        );
    }

    /// Loads a form on the main thread and keeps it for [`Self::show_form`].
    pub fn load_form(&self, completion: ConsentCallback) {
        let provider = self.provider.clone();
        let slot = self.form.clone();
        self.main.dispatch(Box::new(move || {
            provider.load_form(Box::new(move |result| match result {
                Ok(form) => {
                    *lock(&slot) = Some(form);
                    completion(Ok(()));
                }
                Err(error) => completion(Err(BridgeError::Sdk(error))),
            }));
        }));
    }

    /// Presents the loaded form on the main thread. The form stays loaded
    /// afterwards, so it can be shown again; without one the completion
    /// receives [`BridgeError::FormNotLoaded`].
    pub fn show_form(&self, completion: ConsentCallback) {
        let slot = self.form.clone();
        self.main.dispatch(Box::new(move || {
            // out of the slot while presenting, so callbacks may reach the manager
            let form = lock(&slot).take();
            let Some(mut form) = form else {
                completion(Err(BridgeError::FormNotLoaded));
                return;
            };
            form.present(Box::new(move |error| {
                completion(error.map_or(Ok(()), |e| Err(BridgeError::Sdk(e))))
            }));
            // a form loaded meanwhile replaces this one
            let mut slot = lock(&slot);
            if slot.is_none() {
                *slot = Some(form);
            }
        }));
    }
}

impl fmt::Debug for ConsentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentManager")
            .field("form_loaded", &self.has_loaded_form())
            .finish()
    }
}

/// Form error dictionary; success is code 0 with an empty message.
pub fn form_error_dictionary(error: Option<&AdError>) -> Value {
    match error {
        Some(e) => json!({ "code": e.code, "message": e.message }),
        None => json!({ "code": 0, "message": "" }),
    }
}
