//! Property tests for the universal invariant spec §8 leads with: feeding a
//! document in arbitrary chunk sizes must dispatch the exact same sequence
//! of handler calls as feeding it in one shot (S7's chunk-boundary
//! requirement, generalized across every token kind rather than just a
//! trailing number).
//!
//! Grounded on the teacher's own `property_partition.rs`: build a
//! `serde_json::Value`, render it, split the rendered text at arbitrary
//! `quickcheck`-supplied points, and compare the handler trace against a
//! single-shot parse. Iteration count scales down under CI exactly as the
//! teacher's property test does, via `is_ci`.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use quickcheck::{QuickCheck, TestResult};
use serde_json::json;
use streamsax::json::Parser;

fn trace_of(chunks: &[&str]) -> Vec<String> {
    let events = Rc::new(RefCell::new(Vec::<String>::new()));
    let e_open = events.clone();
    let e_close = events.clone();
    let e_aopen = events.clone();
    let e_aclose = events.clone();
    let e_key = events.clone();
    let e_str = events.clone();
    let e_bool = events.clone();
    let e_null = events.clone();
    let e_int = events.clone();
    let e_float = events.clone();

    let mut parser = Parser::builder()
        .on_object_open(move || {
            e_open.borrow_mut().push("{".into());
            Ok(true)
        })
        .on_object_close(move || {
            e_close.borrow_mut().push("}".into());
            Ok(true)
        })
        .on_array_open(move || {
            e_aopen.borrow_mut().push("[".into());
            Ok(true)
        })
        .on_array_close(move || {
            e_aclose.borrow_mut().push("]".into());
            Ok(true)
        })
        .on_object_key(move |k| {
            e_key.borrow_mut().push(format!("k:{}", k.to_string_lossy()));
            Ok(true)
        })
        .on_string_value(move |v| {
            e_str.borrow_mut().push(format!("s:{}", v.to_string_lossy()));
            Ok(true)
        })
        .on_boolean(move |v| {
            e_bool.borrow_mut().push(format!("b:{v}"));
            Ok(true)
        })
        .on_null(move || {
            e_null.borrow_mut().push("n".into());
            Ok(true)
        })
        .on_integer(move |v| {
            e_int.borrow_mut().push(format!("i:{v}"));
            Ok(true)
        })
        .on_floating(move |v| {
            e_float.borrow_mut().push(format!("f:{v}"));
            Ok(true)
        })
        .build()
        .unwrap();

    common::feed_chunks(&mut parser, chunks).unwrap();
    Rc::try_unwrap(events).unwrap().into_inner()
}

/// Builds a moderately nested JSON value out of a small seed so quickcheck
/// can shrink failures usefully without generating pathologically deep
/// documents.
fn sample_value(seed: u8) -> serde_json::Value {
    match seed % 6 {
        0 => json!(null),
        1 => json!(seed % 2 == 0),
        2 => json!(i64::from(seed) - 128),
        3 => json!(format!("text-{seed}")),
        4 => json!([seed, seed.wrapping_add(1), seed.wrapping_add(2)]),
        _ => json!({ "a": seed, "b": [seed, seed], "c": { "d": seed % 2 == 0 } }),
    }
}

#[test]
fn chunk_boundary_invariance_quickcheck() {
    fn prop(seed: u8, splits: Vec<usize>) -> TestResult {
        let value = sample_value(seed);
        let rendered = value.to_string();
        if rendered.is_empty() {
            return TestResult::discard();
        }

        let single = trace_of(&[rendered.as_str()]);

        let chars: Vec<char> = rendered.chars().collect();
        let mut pieces: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut remaining = chars.len();
        for s in splits {
            if remaining == 0 {
                break;
            }
            let size = 1 + (s % remaining);
            let end = idx + size;
            pieces.push(chars[idx..end].iter().collect());
            idx = end;
            remaining -= size;
        }
        if remaining > 0 {
            pieces.push(chars[idx..].iter().collect());
        }
        let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();

        let chunked = trace_of(&refs);
        TestResult::from_bool(chunked == single)
    }

    let tests = if is_ci::cached() { 2_000 } else { 200 };
    QuickCheck::new().tests(tests).quickcheck(prop as fn(u8, Vec<usize>) -> TestResult);
}

#[test]
fn every_split_point_of_a_fixed_document_matches_single_shot() {
    let input = r#"{"a":[1,-2,3.5,"x\ny",null,true,false],"b":{"c":"d","e":[]}}"#;
    let single = trace_of(&[input]);
    for parts in 1..=input.len() {
        let chunks = common::produce_chunks(input, parts);
        let chunked = trace_of(&chunks);
        assert_eq!(chunked, single, "diverged when split into {parts} parts");
    }
}

#[test]
fn chunked_number_requires_finish_to_flush_s7() {
    let floats = Rc::new(RefCell::new(Vec::<f64>::new()));
    let f1 = floats.clone();
    let mut parser = Parser::builder()
        .on_floating(move |v| {
            f1.borrow_mut().push(v);
            Ok(true)
        })
        .build()
        .unwrap();

    for chunk in ["3", ".", "1", "4"] {
        let mut window = streamsax::json::ByteWindow::new(chunk.as_bytes());
        parser.parse(&mut window).unwrap();
    }
    assert!(floats.borrow().is_empty());
    assert!(parser.finish().unwrap());
    assert_eq!(*floats.borrow(), vec![3.14]);
}
