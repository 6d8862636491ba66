//! `perf <file...> [--assume-triangles]`: loads each file and reports
//! per-file elapsed time. With `--assume-triangles`, treats the file as a
//! triangle mesh (a `vertex` element with `x`/`y`/`z`, a `face` element
//! whose first list property is fanned into triangles) and exercises the
//! extraction/triangulation path instead of a generic element walk.

use ply_stream::Reader;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let mut paths = Vec::new();
    let mut assume_triangles = false;
    for arg in env::args().skip(1) {
        if arg == "--assume-triangles" {
            assume_triangles = true;
        } else {
            paths.push(arg);
        }
    }

    if paths.is_empty() {
        eprintln!("usage: perf <file...> [--assume-triangles]");
        return ExitCode::FAILURE;
    }

    let mut any_failed = false;
    for path in &paths {
        let ok = if assume_triangles {
            run_triangle_mesh(path)
        } else {
            run_generic_walk(path)
        };
        if !ok {
            any_failed = true;
        }
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_generic_walk(path: &str) -> bool {
    let start = Instant::now();
    let mut reader = Reader::open(path);
    if !reader.valid() {
        eprintln!("{path}: not a readable PLY file");
        return false;
    }

    let mut rows_loaded = 0u64;
    while reader.has_element() {
        let count = reader.element().unwrap().count as u64;
        if reader.load_element().is_err() {
            eprintln!("{path}: failed while loading an element");
            return false;
        }
        rows_loaded += count;
        if reader.next_element().is_err() {
            eprintln!("{path}: failed while advancing past an element");
            return false;
        }
    }

    let elapsed = start.elapsed();
    println!(
        "{path}: {rows_loaded} rows across {} elements in {:.3}ms",
        reader.num_elements(),
        elapsed.as_secs_f64() * 1000.0
    );
    true
}

fn run_triangle_mesh(path: &str) -> bool {
    let start = Instant::now();
    let mut reader = Reader::open(path);
    if !reader.valid() {
        eprintln!("{path}: not a readable PLY file");
        return false;
    }
    if reader.find_element(b"vertex").is_none() {
        eprintln!("{path}: no `vertex` element");
        return false;
    }
    if reader.find_element(b"face").is_none() {
        eprintln!("{path}: no `face` element");
        return false;
    }

    let mut positions = Vec::new();
    let mut vertex_count = 0usize;
    let mut triangles_total = 0u64;

    while reader.has_element() {
        let name = reader.element().unwrap().name.clone();
        if reader.load_element().is_err() {
            eprintln!("{path}: failed while loading `{}`", String::from_utf8_lossy(&name));
            return false;
        }

        if name == b"vertex" {
            vertex_count = reader.element().unwrap().count;
            let data = reader.element_data().unwrap().to_vec();
            positions = vec![0.0f32; vertex_count * 3];
            if !reader
                .element()
                .unwrap()
                .extract_scalar_tuple(&[b"x", b"y", b"z"], &data, &mut positions)
            {
                eprintln!("{path}: `vertex` element is missing x/y/z");
                return false;
            }
        } else if name == b"face" {
            let face = reader.element().unwrap();
            let Some(list_prop) = (0..face.properties.len()).find(|&i| face.properties[i].is_list()) else {
                eprintln!("{path}: `face` element has no list property");
                return false;
            };
            let mut tri_idx = Vec::new();
            let Some(tris) = face.extract_triangles(list_prop, &positions, vertex_count as u32, &mut tri_idx) else {
                eprintln!("{path}: failed to triangulate `face`");
                return false;
            };
            triangles_total += tris as u64;
        }

        if reader.next_element().is_err() {
            eprintln!("{path}: failed while advancing past an element");
            return false;
        }
    }

    let elapsed = start.elapsed();
    println!(
        "{path}: {vertex_count} vertices, {triangles_total} triangles in {:.3}ms",
        elapsed.as_secs_f64() * 1000.0
    );
    true
}
