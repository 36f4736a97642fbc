use cbor_json_bridge::{CborValue, from_slice, project};
use codspeed_criterion_compat::{Criterion, black_box, criterion_group, criterion_main};

fn sample_document(entries: usize) -> Vec<u8> {
    // {"k<i>": [i, h'<i>', 1.5, "text\n"], ...}
    let value = CborValue::Map(
        (0..entries)
            .map(|i| {
                (
                    CborValue::Text(format!("k{i}")),
                    CborValue::Array(vec![
                        CborValue::Unsigned(i as u64),
                        CborValue::Bytes((i as u32).to_be_bytes().to_vec()),
                        CborValue::Float(1.5),
                        CborValue::from("text\n"),
                    ]),
                )
            })
            .collect(),
    );
    encode(&value)
}

// Just enough of an encoder to build inputs for the benchmarks.
fn encode(value: &CborValue) -> Vec<u8> {
    fn header(out: &mut Vec<u8>, major: u8, n: u64) {
        if n < 24 {
            out.push((major << 5) | n as u8);
        } else if n < 256 {
            out.extend_from_slice(&[(major << 5) | 24, n as u8]);
        } else if n < 65536 {
            out.push((major << 5) | 25);
            out.extend_from_slice(&(n as u16).to_be_bytes());
        } else if n < 4294967296 {
            out.push((major << 5) | 26);
            out.extend_from_slice(&(n as u32).to_be_bytes());
        } else {
            out.push((major << 5) | 27);
            out.extend_from_slice(&n.to_be_bytes());
        }
    }

    fn walk(out: &mut Vec<u8>, value: &CborValue) {
        match value {
            CborValue::Unsigned(n) => header(out, 0, *n),
            CborValue::Negative(n) => header(out, 1, *n),
            CborValue::Bytes(b) => {
                header(out, 2, b.len() as u64);
                out.extend_from_slice(b);
            }
            CborValue::Text(s) => {
                header(out, 3, s.len() as u64);
                out.extend_from_slice(s.as_bytes());
            }
            CborValue::Array(items) => {
                header(out, 4, items.len() as u64);
                items.iter().for_each(|item| walk(out, item));
            }
            CborValue::Map(entries) => {
                header(out, 5, entries.len() as u64);
                for (k, v) in entries {
                    walk(out, k);
                    walk(out, v);
                }
            }
            CborValue::Tag(tag, inner) => {
                header(out, 6, *tag);
                walk(out, inner);
            }
            CborValue::Float(f) => {
                out.push(0xfb);
                out.extend_from_slice(&f.to_bits().to_be_bytes());
            }
            CborValue::Bool(false) => out.push(0xf4),
            CborValue::Bool(true) => out.push(0xf5),
            CborValue::Null => out.push(0xf6),
            CborValue::Undefined => out.push(0xf7),
            CborValue::Simple(code) => header(out, 7, *code as u64),
        }
    }

    let mut out = Vec::new();
    walk(&mut out, value);
    out
}

fn bench_decode(c: &mut Criterion) {
    let small = sample_document(16);
    let large = sample_document(10_000);

    c.bench_function("decode_small_map", |b| {
        b.iter(|| from_slice(black_box(&small)).unwrap())
    });
    c.bench_function("decode_large_map", |b| {
        b.iter(|| from_slice(black_box(&large)).unwrap())
    });
}

fn bench_project(c: &mut Criterion) {
    let small = from_slice(&sample_document(16)).unwrap();
    let large = from_slice(&sample_document(10_000)).unwrap();
    let bytes = CborValue::Bytes(vec![0xab; 1024 * 1024]);

    c.bench_function("project_small_map", |b| b.iter(|| project(black_box(&small))));
    c.bench_function("project_large_map", |b| b.iter(|| project(black_box(&large))));
    c.bench_function("project_1mb_bytes", |b| b.iter(|| project(black_box(&bytes))));
}

criterion_group!(benches, bench_decode, bench_project);
criterion_main!(benches);
