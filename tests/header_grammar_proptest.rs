//! Property-based coverage of the header grammar and the triangulator's
//! triangle-count invariant, generating random-but-valid inputs rather than
//! hand-picked cases.

use proptest::prelude::*;
use ply_stream::header::parse_header;
use ply_stream::byte_reader::ByteReader;
use ply_stream::triangulate_polygon;
use std::io::Cursor;

fn scalar_type_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("char"),
        Just("uchar"),
        Just("short"),
        Just("ushort"),
        Just("int"),
        Just("uint"),
        Just("float"),
        Just("double"),
    ]
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z_0-9]{0,12}".prop_map(|s| s)
}

proptest! {
    /// Any header built from the grammar's own building blocks parses back
    /// with the same element count, property count, and list-ness.
    #[test]
    fn arbitrary_valid_headers_parse_without_error(
        element_count in 0u32..20,
        props in proptest::collection::vec((scalar_type_name(), ident(), proptest::bool::ANY), 1..6),
        name in ident(),
    ) {
        let mut text = format!("ply\nformat ascii 1.0\nelement {name} {element_count}\n");
        let mut expected_list_flags = Vec::new();
        for (i, (ty, pname, is_list)) in props.iter().enumerate() {
            let pname = format!("{pname}_{i}");
            if *is_list {
                text.push_str(&format!("property list uchar {ty} {pname}\n"));
            } else {
                text.push_str(&format!("property {ty} {pname}\n"));
            }
            expected_list_flags.push(*is_list);
        }
        text.push_str("end_header\n");

        let mut reader = ByteReader::new(Cursor::new(text.into_bytes()), 256);
        let header = parse_header(&mut reader).unwrap();

        prop_assert_eq!(header.elements.len(), 1);
        let elem = &header.elements[0];
        prop_assert_eq!(elem.count, element_count as usize);
        prop_assert_eq!(elem.properties.len(), props.len());
        for (prop, expected_list) in elem.properties.iter().zip(expected_list_flags) {
            prop_assert_eq!(prop.is_list(), expected_list);
        }
    }

    /// `triangulate_polygon` always returns `n - 2` triangles for a convex
    /// regular n-gon with every index in range, for any `n` in `[3, 24]`.
    #[test]
    fn triangulate_polygon_always_yields_n_minus_two_for_convex_regular_polygons(n in 3usize..24) {
        let verts: Vec<f32> = (0..n)
            .flat_map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                [a.cos(), a.sin(), 0.0]
            })
            .collect();
        let idx: Vec<i32> = (0..n as i32).collect();
        let mut out = vec![0i32; (n - 2) * 3];
        let tris = triangulate_polygon(n, &verts, n as u32, &idx, &mut out);
        prop_assert_eq!(tris, n - 2);
    }
}
