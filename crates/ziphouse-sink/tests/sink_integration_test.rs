//! Sink Integration Tests
//!
//! Drives a full sink instance the way a host pipeline would: repeated
//! `process()` calls against an in-process channel, a day change mid-stream,
//! and shutdown, validating the on-disk layout with a standard ZIP reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use zip::ZipArchive;
use ziphouse_sink::{
    ArchiveSink, DayClock, MemoryChannel, SinkRecord, SinkStatus,
};
use ziphouse_storage::{ArchiveRegistry, CapacityProbe, LocationSelector};

#[derive(Clone)]
struct SwitchableClock(Arc<Mutex<String>>);

impl SwitchableClock {
    fn at(day: &str) -> Self {
        Self(Arc::new(Mutex::new(day.to_string())))
    }

    fn advance_to(&self, day: &str) {
        *self.0.lock().unwrap() = day.to_string();
    }
}

impl DayClock for SwitchableClock {
    fn today(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

struct AlwaysAvailable;

impl CapacityProbe for AlwaysAvailable {
    fn is_available(&self, _root: &Path) -> bool {
        true
    }
}

fn read_entry(path: &Path, name: &str) -> String {
    let file = File::open(path).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut contents = String::new();
    entry.read_to_string(&mut contents).unwrap();
    contents
}

fn build_sink(
    root: &Path,
    day: &str,
    channel: MemoryChannel,
) -> (ArchiveSink<MemoryChannel>, SwitchableClock) {
    let selector = LocationSelector::new(vec![root.to_path_buf()], Box::new(AlwaysAvailable));
    let registry = ArchiveRegistry::new(selector, day.to_string(), true);
    let clock = SwitchableClock::at(day);
    let sink = ArchiveSink::with_registry("it-sink", channel, registry, Box::new(clock.clone()));
    (sink, clock)
}

#[test]
fn drains_a_mixed_topic_stream_into_per_topic_archives() {
    let tmp = TempDir::new().unwrap();
    let channel = MemoryChannel::new();
    for i in 0..10 {
        let topic = if i % 2 == 0 { "orders" } else { "clicks" };
        channel.push(SinkRecord::new(topic, format!("r{i}").into_bytes()));
    }
    let (mut sink, _clock) = build_sink(tmp.path(), "20240101", channel.clone());

    // Drive like a host: poll until the channel reports empty.
    while sink.process().unwrap() == SinkStatus::Ready {}
    assert!(channel.is_empty());
    sink.stop();

    assert_eq!(
        read_entry(&tmp.path().join("20240101/orders.zip"), "orders"),
        "r0\nr2\nr4\nr6\nr8\n"
    );
    assert_eq!(
        read_entry(&tmp.path().join("20240101/clicks.zip"), "clicks"),
        "r1\nr3\nr5\nr7\nr9\n"
    );
}

#[test]
fn day_change_mid_stream_splits_archives_by_day() {
    let tmp = TempDir::new().unwrap();
    let channel = MemoryChannel::new();
    channel.push(SinkRecord::new("orders", &b"jan-1"[..]));
    channel.push(SinkRecord::new("orders", &b"jan-2"[..]));
    let (mut sink, clock) = build_sink(tmp.path(), "20240101", channel);

    assert_eq!(sink.process().unwrap(), SinkStatus::Ready);
    clock.advance_to("20240102");
    assert_eq!(sink.process().unwrap(), SinkStatus::Ready);
    sink.stop();

    assert_eq!(
        read_entry(&tmp.path().join("20240101/orders.zip"), "orders"),
        "jan-1\n"
    );
    assert_eq!(
        read_entry(&tmp.path().join("20240102/orders.zip"), "orders"),
        "jan-2\n"
    );
}

#[test]
fn stop_finalizes_archives_for_standard_readers() {
    let tmp = TempDir::new().unwrap();
    let channel = MemoryChannel::new();
    channel.push(SinkRecord::new("orders", &b"payload"[..]));
    let (mut sink, _clock) = build_sink(tmp.path(), "20240101", channel);

    assert_eq!(sink.process().unwrap(), SinkStatus::Ready);
    sink.stop();

    let path = tmp.path().join("20240101/orders.zip");
    let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(read_entry(&path, "orders"), "payload\n");
}
