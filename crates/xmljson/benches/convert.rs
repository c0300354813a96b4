#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xmljson::{json, json_to_xml, xml, xml_to_json, Element};

fn records(count: usize) -> String {
    let mut out = String::from("<records>");
    for i in 0..count {
        out.push_str(&format!(
            "<record><id>{i}</id><name>item {i}</name><tags><tag>a</tag><tag>b</tag></tags></record>"
        ));
    }
    out.push_str("</records>");
    out
}

fn bench_xml_to_json(c: &mut Criterion) {
    let input = records(1_000);
    let doc = xml::from_str(&input).unwrap();

    c.bench_function("parse_xml", |b| {
        b.iter(|| xml::from_str(black_box(&input)).unwrap())
    });

    c.bench_function("xml_to_json", |b| {
        b.iter(|| xml_to_json(black_box(&doc)).unwrap())
    });
}

fn bench_json_to_xml(c: &mut Criterion) {
    let input = json::to_string(&xml_to_json(&xml::from_str(&records(1_000)).unwrap()).unwrap())
        .unwrap();
    let value = json::from_str(&input).unwrap();

    c.bench_function("parse_json", |b| {
        b.iter(|| json::from_str(black_box(&input)).unwrap())
    });

    c.bench_function("json_to_xml", |b| {
        b.iter(|| {
            let mut root = Element::new("root");
            json_to_xml(black_box(&value), &mut root).unwrap();
            root
        })
    });
}

criterion_group!(benches, bench_xml_to_json, bench_json_to_xml);
criterion_main!(benches);
