#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tidings::{HandlerDescriptor, HandlerTable, Introspect, testing::CallLog};

// ============================================================================
// Test Targets
// ============================================================================

/// Records `"{id}:{tag}"` for every notification it receives.
pub struct Recorder {
    pub id: &'static str,
    pub log: CallLog,
}

impl Recorder {
    pub fn new(id: &'static str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            id,
            log: log.clone(),
        })
    }

    fn record(&self, tag: &str) {
        self.log.record(format!("{}:{tag}", self.id));
    }
}

impl Introspect for Recorder {
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
        HandlerTable::new(target)
            .on("A", "on_a", &[], |t: Arc<Self>, (): ()| async move { t.record("A") })
            .on("B", "on_b", &[], |t: Arc<Self>, (): ()| async move { t.record("B") })
            .on("X", "on_x", &[], |t: Arc<Self>, (): ()| async move { t.record("X") })
            .build()
    }
}

/// Records the profile fields it was handed.
pub struct ProfileSink {
    pub log: CallLog,
}

impl ProfileSink {
    pub fn new(log: &CallLog) -> Arc<Self> {
        Arc::new(Self { log: log.clone() })
    }
}

impl Introspect for ProfileSink {
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
        HandlerTable::new(target)
            .on(
                "profile.updated",
                "on_profile",
                &["name", "age"],
                |t: Arc<Self>, (name, age): (String, i64)| async move {
                    t.log.record(format!("{name}/{age}"));
                },
            )
            .build()
    }
}

/// Takes the age as text, so it accepts any `age` the standard adapter can
/// format.
pub struct TextualSink {
    pub log: CallLog,
}

impl TextualSink {
    pub fn new(log: &CallLog) -> Arc<Self> {
        Arc::new(Self { log: log.clone() })
    }
}

impl Introspect for TextualSink {
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
        HandlerTable::new(target)
            .on(
                "profile.updated",
                "on_profile_text",
                &["name", "age"],
                |t: Arc<Self>, (name, age): (String, String)| async move {
                    t.log.record(format!("text {name}/{age}"));
                },
            )
            .build()
    }
}

/// Counts how often its single tag fired.
pub struct Tally {
    pub tag: String,
    pub hits: AtomicUsize,
}

impl Tally {
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            hits: AtomicUsize::new(0),
        })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Introspect for Tally {
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
        HandlerTable::new(target)
            .on(target.tag.clone(), "hit", &[], |t: Arc<Self>, (): ()| async move {
                t.hits.fetch_add(1, Ordering::SeqCst);
            })
            .build()
    }
}

/// Fails or panics on demand.
pub struct Faulty;

fn explode() {
    panic!("handler exploded")
}

impl Introspect for Faulty {
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
        HandlerTable::new(target)
            .on("X", "refuse", &[], |_t: Arc<Self>, (): ()| async move {
                Err::<(), _>(std::io::Error::other("refused"))
            })
            .on("X", "explode", &[], |_t: Arc<Self>, (): ()| async move { explode() })
            .build()
    }
}
