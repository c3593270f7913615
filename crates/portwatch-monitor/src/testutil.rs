//! Scripted fakes for the feed and notifier seams.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use lettre::message::Mailbox;

use portwatch_core::{
    AlertFilters, BannerEvent, KnownService, MonitorConfig, NotificationConfig, RegisteredAlert,
    ServiceIdentity,
};
use portwatch_intel::{AccountProfile, EventStream, IntelError, IntelFeed};
use portwatch_notify::{error::Result as NotifyResult, Notifier, NotifyError};

pub(crate) fn identity(ip: &str, port: u16, transport: &str) -> ServiceIdentity {
    ServiceIdentity {
        ip: ip.to_string(),
        port,
        transport: transport.to_string(),
    }
}

pub(crate) fn banner(ip: &str, port: u16, transport: &str, title: Option<&str>) -> BannerEvent {
    BannerEvent {
        ip: ip.to_string(),
        port,
        transport: transport.to_string(),
        title: title.map(String::from),
        timestamp: None,
        opts: serde_json::Value::Null,
    }
}

pub(crate) fn sample_config() -> MonitorConfig {
    MonitorConfig {
        api_key: "test-key".to_string(),
        watch_ranges: BTreeMap::from([
            ("dmz".to_string(), "198.51.100.0/24".to_string()),
            ("office".to_string(), "203.0.113.0/24".to_string()),
        ]),
        notification: NotificationConfig {
            server: "mail.example.com".to_string(),
            from: "portwatch@example.com".to_string(),
            to: vec!["secops@example.com".to_string()],
        },
        known: Vec::new(),
    }
}

// ── Notifier fake ─────────────────────────────────────────────────

/// Records every discovery dispatch; optionally fails each send.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    /// Identities of dispatched discoveries, as `transport://ip:port`.
    pub sent: Rc<RefCell<Vec<String>>>,
    pub startups: Cell<usize>,
    pub fail: bool,
}

impl Notifier for RecordingNotifier {
    async fn notify_discovery(&self, event: &BannerEvent) -> NotifyResult<()> {
        self.sent
            .borrow_mut()
            .push(format!("{}://{}:{}", event.transport, event.ip, event.port));
        if self.fail {
            return Err(fake_notify_error());
        }
        Ok(())
    }

    async fn notify_startup(&self, _known: &[KnownService], _learning: bool) -> NotifyResult<()> {
        self.startups.set(self.startups.get() + 1);
        if self.fail {
            return Err(fake_notify_error());
        }
        Ok(())
    }
}

fn fake_notify_error() -> NotifyError {
    NotifyError::Address("missing-at-sign".parse::<Mailbox>().unwrap_err())
}

// ── Feed fake ─────────────────────────────────────────────────────

/// Scripted stand-in for the remote feed. Alert state lives behind
/// `Rc`/`RefCell` so tests can observe it after handing the fake to a
/// monitor.
#[derive(Default)]
pub(crate) struct ScriptedIntel {
    pub alerts: RefCell<Vec<RegisteredAlert>>,
    /// (name, networks) per create call, in order.
    pub created: Rc<RefCell<Vec<(String, Vec<String>)>>>,
    pub streams: RefCell<VecDeque<ScriptedStream>>,
    pub opens: Rc<Cell<usize>>,
    pub fail_list: bool,
    pub fail_create: bool,
}

impl ScriptedIntel {
    pub fn seed_alert(&self, name: &str, networks: &[&str]) {
        let mut alerts = self.alerts.borrow_mut();
        let id = format!("seed-{}", alerts.len());
        alerts.push(RegisteredAlert {
            id,
            name: name.to_string(),
            filters: AlertFilters {
                ip: networks.iter().map(|s| s.to_string()).collect(),
            },
        });
    }

    pub fn push_stream(&self, events: Vec<BannerEvent>) {
        self.streams.borrow_mut().push_back(ScriptedStream {
            events: events.into(),
            fault_at_end: false,
        });
    }

    /// A stream that yields its events, then a transport fault.
    pub fn push_stream_with_fault(&self, events: Vec<BannerEvent>) {
        self.streams.borrow_mut().push_back(ScriptedStream {
            events: events.into(),
            fault_at_end: true,
        });
    }
}

fn unavailable(body: &str) -> IntelError {
    IntelError::Api {
        status: 503,
        body: body.to_string(),
    }
}

impl IntelFeed for ScriptedIntel {
    type Stream = ScriptedStream;

    async fn list_alerts(&self) -> Result<Vec<RegisteredAlert>, IntelError> {
        if self.fail_list {
            return Err(unavailable("alert list unavailable"));
        }
        Ok(self.alerts.borrow().clone())
    }

    async fn create_alert(
        &self,
        name: &str,
        networks: &[String],
        _expires_secs: u64,
    ) -> Result<String, IntelError> {
        if self.fail_create {
            return Err(unavailable("alert creation unavailable"));
        }
        let id = format!("alert-{}", self.created.borrow().len());
        self.created
            .borrow_mut()
            .push((name.to_string(), networks.to_vec()));
        self.alerts.borrow_mut().push(RegisteredAlert {
            id: id.clone(),
            name: name.to_string(),
            filters: AlertFilters {
                ip: networks.to_vec(),
            },
        });
        Ok(id)
    }

    async fn account_profile(&self) -> Result<AccountProfile, IntelError> {
        Ok(AccountProfile {
            display_name: Some("scripted".to_string()),
            member: true,
            credits: 100,
            created: None,
        })
    }

    async fn open_event_stream(&self) -> Result<ScriptedStream, IntelError> {
        self.opens.set(self.opens.get() + 1);
        self.streams
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| unavailable("firehose unavailable"))
    }
}

pub(crate) struct ScriptedStream {
    events: VecDeque<BannerEvent>,
    fault_at_end: bool,
}

impl EventStream for ScriptedStream {
    async fn next_event(&mut self) -> Option<Result<BannerEvent, IntelError>> {
        if let Some(event) = self.events.pop_front() {
            return Some(Ok(event));
        }
        if self.fault_at_end {
            self.fault_at_end = false;
            return Some(Err(unavailable("connection reset by peer")));
        }
        None
    }
}
