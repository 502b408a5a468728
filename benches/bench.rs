use cbor_data::{event::SemanticTag, parser::CborParser, sink::EventSink, source::SliceSource};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{random, thread_rng, Rng};

fn name() -> String {
    let mut arr = [0 as char; 8];
    thread_rng().fill(&mut arr[..]);
    let mut s = String::new();
    s.extend(arr.iter());
    s
}

/// Encode a small WorkStopped-event-shaped document with `serde_cbor`, since this crate
/// designs no encoder of its own.
fn create_doc() -> Vec<u8> {
    use std::collections::BTreeMap;
    let mut map = BTreeMap::new();
    map.insert("type", serde_cbor::Value::Text("WorkStopped".into()));
    map.insert("byWhom", serde_cbor::Value::Text(name()));
    map.insert("pause", serde_cbor::Value::Bool(false));
    map.insert(
        "workers",
        serde_cbor::Value::Array(vec![
            serde_cbor::Value::Text(name()),
            serde_cbor::Value::Text(name()),
            serde_cbor::Value::Text(name()),
        ]),
    );
    map.insert("started", serde_cbor::Value::Integer(random::<u32>() as i128));
    map.insert("stopped", serde_cbor::Value::Integer(random::<u32>() as i128));
    let value: serde_cbor::Value =
        serde_cbor::Value::Map(map.into_iter().map(|(k, v)| (serde_cbor::Value::Text(k.into()), v)).collect());
    serde_cbor::to_vec(&value).unwrap()
}

#[derive(Default)]
struct CountSink(usize);
impl EventSink for CountSink {
    fn uint64_value(&mut self, _value: u64, _tag: SemanticTag) -> bool {
        self.0 += 1;
        true
    }
    fn string_value(&mut self, _value: &str, _tag: SemanticTag) -> bool {
        self.0 += 1;
        true
    }
}

fn decode_full(c: &mut Criterion) {
    c.bench_function("decode full document", |b| {
        b.iter_batched_ref(
            create_doc,
            |bytes| {
                let mut parser = CborParser::new(SliceSource::new(&bytes[..]));
                let mut sink = CountSink::default();
                parser.parse(&mut sink).unwrap();
                sink.0
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn cursor_pull(c: &mut Criterion) {
    use cbor_data::Cursor;
    c.bench_function("cursor pull all events", |b| {
        b.iter_batched_ref(
            create_doc,
            |bytes| {
                let mut cur = Cursor::new(CborParser::new(SliceSource::new(&bytes[..])));
                let mut n = 0;
                while cur.next().unwrap().is_some() {
                    n += 1;
                }
                n
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, decode_full, cursor_pull);
criterion_main!(benches);
