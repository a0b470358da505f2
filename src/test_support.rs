//! Test doubles shared by the unit tests.

use crate::clock::Clock;
use crate::events::{EventSink, SpotsEvent};
use crate::provider::client::ScheduleProvider;
use crate::provider::error::ProviderError;
use crate::types::schedule_window::ScheduleWindow;
use crate::types::spot_record::SpotRecord;
use crate::types::week_bucket::WeekBucket;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SpotsEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SpotsEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SpotsEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn at_unix(secs: i64) -> Self {
        Self::at(DateTime::from_timestamp(secs, 0).unwrap())
    }

    pub fn set_unix(&self, secs: i64) {
        *self.now.lock().unwrap() = DateTime::from_timestamp(secs, 0).unwrap();
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// What a [`ScriptedProvider`] answers with.
pub enum Reply {
    Body(String),
    Unreachable,
}

/// Provider double that replays scripted replies (the last one repeats) and records
/// every window it was asked for.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<String>>,
    windows: Mutex<Vec<ScheduleWindow>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            windows: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn always(body: impl Into<String>) -> Self {
        Self::new(vec![Reply::Body(body.into())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn windows(&self) -> Vec<ScheduleWindow> {
        self.windows.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Option<String> {
        let mut replies = self.replies.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match replies.pop_front() {
            Some(Reply::Body(body)) => {
                *last = Some(body.clone());
                Some(body)
            }
            Some(Reply::Unreachable) => {
                *last = None;
                None
            }
            None => last.clone(),
        }
    }
}

impl ScheduleProvider for ScriptedProvider {
    async fn fetch(&self, window: &ScheduleWindow) -> Result<Vec<u8>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().unwrap().push(*window);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.next_reply() {
            Some(body) => Ok(body.into_bytes()),
            None => Err(unreachable_error().await),
        }
    }
}

// A genuine reqwest error: nothing listens on the discard port.
async fn unreachable_error() -> ProviderError {
    let url = "http://127.0.0.1:9/json.php".to_string();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let error = client.get(&url).send().await.unwrap_err();
    ProviderError::NetworkRequest(url, error)
}

/// A provider row with the required cells in their feed positions.
pub fn provider_row(date: &str, time: &str, title: &str, spots: &str, id: &str) -> Value {
    json!([
        date,
        time,
        title,
        "Cycle",
        "Jane D.",
        "",
        "",
        "Studio 2",
        "Elk River",
        format!(
            "<a data-date=\"11/20/2020\" class=\"descGXP\" alt=\"{id}\" href= \"javascript://\"{id}\">Description</a><br>\
             <a class=\"signUpGXP\" textmsg=\"{spots}\" alt=\"{id}\" href=\"https://www.groupexpro.com/gxp/reservations/start/index/{id}\">Sign Up</a>"
        ),
    ])
}

/// Wraps rows the way the provider frames its response.
pub fn provider_body(rows: &[Value]) -> String {
    format!("({})", json!({ "aaData": rows, "iTotalRecords": rows.len() }))
}

pub fn sample_bucket() -> WeekBucket {
    let mut bucket = WeekBucket::default();
    bucket.push(
        NaiveDate::from_ymd_opt(2020, 11, 23).unwrap(),
        SpotRecord::new("10 SPOTS LEFT", "11938371"),
    );
    bucket
}
