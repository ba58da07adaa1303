//! Recording fakes for the outbound seams
//!
//! Every fake keeps what it was asked to do so tests can assert on the exact
//! sequence of sends, deletions, submissions and payment checks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use signal_ui_bot::models::{CryptoPayment, MessageRef, PaymentStatus, Plan};
use signal_ui_bot::services::payment::PaymentProvider;
use signal_ui_bot::services::signal::{WorkItem, WorkSink};
use signal_ui_bot::services::{CryptoPaymentStub, Keyboard, Messenger};
use signal_ui_bot::utils::errors::{Result, UiBotError};

/// A message captured by [`MockMessenger`]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: MessageRef,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl SentMessage {
    pub fn actions(&self) -> Vec<String> {
        self.keyboard
            .as_ref()
            .map(|k| k.actions().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.keyboard.as_ref().is_some_and(|k| k.has_action(action))
    }
}

/// Messenger that records traffic instead of calling Telegram
pub struct MockMessenger {
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<MessageRef>>,
    next_message_id: AtomicI32,
    fail_deletes: AtomicBool,
    fail_sends: AtomicBool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_message_id: AtomicI32::new(100),
            fail_deletes: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        }
    }

    /// Make every following delete fail as if the message were too old
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every following send fail as if Telegram were unreachable
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> SentMessage {
        self.sent().last().cloned().expect("nothing was sent")
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
        self.deleted.lock().unwrap().clear();
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) -> Result<MessageRef> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(UiBotError::Gateway("Network unreachable".to_string()));
        }
        let message = MessageRef::new(chat_id, self.next_message_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().unwrap().push(SentMessage {
            message,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(message)
    }

    async fn delete_message(&self, message: MessageRef) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(UiBotError::Gateway("Bad Request: message can't be deleted".to_string()));
        }
        self.deleted.lock().unwrap().push(message);
        Ok(())
    }
}

/// Work sink that keeps submitted items in memory
pub struct RecordingSink {
    items: Mutex<Vec<WorkItem>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn items(&self) -> Vec<WorkItem> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkSink for RecordingSink {
    async fn submit(&self, item: &WorkItem) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UiBotError::ServiceUnavailable("sink is down".to_string()));
        }
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UiBotError::ServiceUnavailable("sink is down".to_string()));
        }
        Ok(())
    }
}

/// Payment provider whose statuses are set by the test
pub struct ScriptedPayments {
    stub: CryptoPaymentStub,
    statuses: Mutex<HashMap<String, PaymentStatus>>,
    created: Mutex<Vec<CryptoPayment>>,
}

impl ScriptedPayments {
    pub fn new(stub: CryptoPaymentStub) -> Self {
        Self {
            stub,
            statuses: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, payment_id: &str, status: PaymentStatus) {
        self.statuses.lock().unwrap().insert(payment_id.to_string(), status);
    }

    pub fn created(&self) -> Vec<CryptoPayment> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedPayments {
    async fn create_payment(&self, user_id: i64, plan: Plan, amount: f64, currency: &str) -> Result<CryptoPayment> {
        let payment = self.stub.create_payment(user_id, plan, amount, currency).await?;
        self.created.lock().unwrap().push(payment.clone());
        Ok(payment)
    }

    async fn check_status(&self, payment_id: &str) -> Result<PaymentStatus> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(payment_id)
            .copied()
            .unwrap_or(PaymentStatus::Pending))
    }
}
