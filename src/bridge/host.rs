use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::{
    error::{MenuSyncError, Result},
    menu::{HostCall, MenuHost, MenuItemSpec, TabHost, TabInfo},
    messages::{ContentMessage, ExtensionView},
};

use super::protocol::{HostMethod, Outbound};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

type ReplySender = oneshot::Sender<std::result::Result<Value, String>>;

/// Host capabilities backed by the browser on the other end of the native-messaging
/// channel. Calls are queued for the writer task as they are issued and complete
/// when the matching reply frame arrives.
pub struct NativeBridge {
    next_request: AtomicU64,
    pending: Mutex<HashMap<u64, ReplySender>>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl NativeBridge {
    /// The bridge plus the queue the writer task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (outbound, queue) = mpsc::unbounded_channel();
        let bridge = Self {
            next_request: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            outbound,
        };
        (bridge, queue)
    }

    /// Hand a reply frame to the call waiting for it.
    pub fn complete(&self, request_id: u64, outcome: std::result::Result<Value, String>) {
        match self.lock_pending().remove(&request_id) {
            Some(waiter) => {
                let _ = waiter.send(outcome);
            }
            None => log_debug!("reply for unknown request {request_id}"),
        }
    }

    /// Fail every call still waiting for a reply.
    pub fn close(&self) {
        self.lock_pending().clear();
    }

    pub fn pending_calls(&self) -> usize {
        self.lock_pending().len()
    }

    fn call(&self, label: String, method: HostMethod) -> HostCall<Value> {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let (waiter, reply) = oneshot::channel();
        self.lock_pending().insert(request_id, waiter);

        if self
            .outbound
            .send(Outbound::Call { request_id, method })
            .is_err()
        {
            self.lock_pending().remove(&request_id);
            return Box::pin(async { Err(unreachable_error("bridge writer stopped")) });
        }

        Box::pin(async move {
            match reply.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(message)) => Err(MenuSyncError::HostApi { id: label, message }),
                Err(_) => Err(unreachable_error("bridge closed before the reply arrived")),
            }
        })
    }

    fn notify(&self, method: HostMethod) -> Result<()> {
        self.outbound
            .send(Outbound::Notify { method })
            .map_err(|_| unreachable_error("bridge writer stopped"))
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<u64, ReplySender>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MenuHost for NativeBridge {
    fn create(&self, item: MenuItemSpec) -> HostCall<String> {
        let id = item.id.clone();
        let call = self.call(id.clone(), HostMethod::MenusCreate(item));
        Box::pin(async move {
            let registered = call.await?;
            Ok(registered.as_str().map(str::to_string).unwrap_or(id))
        })
    }

    fn remove(&self, id: &str) -> HostCall<()> {
        let call = self.call(id.to_string(), HostMethod::MenusRemove { id: id.to_string() });
        Box::pin(async move {
            call.await?;
            Ok(())
        })
    }
}

#[async_trait]
impl TabHost for NativeBridge {
    async fn get_tab(&self, tab_id: i64) -> Result<TabInfo> {
        let label = format!("tabs.get({tab_id})");
        let value = self.call(label.clone(), HostMethod::TabsGet { tab_id }).await?;
        parse_reply(label, value)
    }

    async fn current_window_tabs(&self) -> Result<Vec<TabInfo>> {
        let label = "windows.getCurrent".to_string();
        let value = self.call(label.clone(), HostMethod::WindowsCurrentTabs).await?;
        parse_reply(label, value)
    }

    async fn send_message(&self, tab_id: i64, message: ContentMessage) -> Result<()> {
        self.notify(HostMethod::TabsSendMessage { tab_id, message })
    }

    async fn open_view(&self, view: ExtensionView) -> Result<()> {
        self.notify(HostMethod::OpenView { view })
    }
}

fn parse_reply<T: DeserializeOwned>(label: String, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| MenuSyncError::HostApi {
        id: label,
        message: format!("unexpected reply shape: {err}"),
    })
}

fn unreachable_error(message: &str) -> MenuSyncError {
    MenuSyncError::HostUnreachable(message.to_string())
}
