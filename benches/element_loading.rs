//! Benchmarks for reading element payloads off disk, comparing ASCII vs.
//! binary encodings and fixed-size vs. list-bearing elements.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ply_stream::Reader;
use std::io::Cursor;

fn generate_binary_mesh(vertex_count: usize) -> Vec<u8> {
    let header = format!(
        "ply\nformat binary_little_endian 1.0\n\
         element vertex {vertex_count}\n\
         property float x\nproperty float y\nproperty float z\n\
         property float nx\nproperty float ny\nproperty float nz\n\
         end_header\n"
    );
    let mut data = header.into_bytes();
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        data.extend_from_slice(&base.to_le_bytes());
        data.extend_from_slice(&(base + 1.0).to_le_bytes());
        data.extend_from_slice(&(base + 2.0).to_le_bytes());
        data.extend_from_slice(&0.0f32.to_le_bytes());
        data.extend_from_slice(&0.0f32.to_le_bytes());
        data.extend_from_slice(&1.0f32.to_le_bytes());
    }
    data
}

fn generate_ascii_mesh(vertex_count: usize) -> Vec<u8> {
    let mut text = format!(
        "ply\nformat ascii 1.0\n\
         element vertex {vertex_count}\n\
         property float x\nproperty float y\nproperty float z\n\
         end_header\n"
    );
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        text.push_str(&format!("{} {} {}\n", base, base + 1.0, base + 2.0));
    }
    text.into_bytes()
}

fn generate_triangle_mesh(face_count: usize) -> Vec<u8> {
    let mut data = format!(
        "ply\nformat binary_little_endian 1.0\n\
         element face {face_count}\n\
         property list uchar int vertex_indices\n\
         end_header\n"
    )
    .into_bytes();
    for i in 0..face_count {
        data.push(3u8);
        data.extend_from_slice(&(i as i32).to_le_bytes());
        data.extend_from_slice(&((i + 1) as i32).to_le_bytes());
        data.extend_from_slice(&((i + 2) as i32).to_le_bytes());
    }
    data
}

fn bench_binary_vs_ascii(c: &mut Criterion) {
    let vertex_count = 5_000;
    let binary_data = generate_binary_mesh(vertex_count);
    let ascii_data = generate_ascii_mesh(vertex_count);

    let mut group = c.benchmark_group("load_vertex_5k");
    group.bench_function("binary", |b| {
        b.iter(|| {
            let mut reader = Reader::from_reader(Cursor::new(black_box(binary_data.clone())));
            reader.load_element().unwrap();
            black_box(reader.element_data());
        })
    });
    group.bench_function("ascii", |b| {
        b.iter(|| {
            let mut reader = Reader::from_reader(Cursor::new(black_box(ascii_data.clone())));
            reader.load_element().unwrap();
            black_box(reader.element_data());
        })
    });
    group.finish();
}

fn bench_list_element_loading(c: &mut Criterion) {
    let face_data = generate_triangle_mesh(10_000);
    c.bench_function("load_face_list_10k", |b| {
        b.iter(|| {
            let mut reader = Reader::from_reader(Cursor::new(black_box(face_data.clone())));
            reader.load_element().unwrap();
            black_box(reader.element_data());
        })
    });
}

fn bench_skip_vs_load(c: &mut Criterion) {
    let binary_data = generate_binary_mesh(20_000);

    let mut group = c.benchmark_group("skip_vs_load_20k");
    group.bench_function("load", |b| {
        b.iter(|| {
            let mut reader = Reader::from_reader(Cursor::new(black_box(binary_data.clone())));
            reader.load_element().unwrap();
        })
    });
    group.bench_function("skip", |b| {
        b.iter(|| {
            let mut reader = Reader::from_reader(Cursor::new(black_box(binary_data.clone())));
            reader.next_element().unwrap();
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_binary_vs_ascii,
    bench_list_element_loading,
    bench_skip_vs_load
);
criterion_main!(benches);
